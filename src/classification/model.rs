//! 書き出し済みの二値分類モデル (ロジスティック回帰 / 多項ナイーブベイズ)。
use serde::Deserialize;

use super::NewsLabel;
use super::features::FeatureVector;
use crate::error::InferenceError;

/// 学習済み分類器の能力。
pub trait Classifier: Send + Sync {
    /// # Errors
    /// 特徴量の次元がモデルと一致しない場合など。
    fn predict(&self, features: &FeatureVector) -> Result<NewsLabel, InferenceError>;

    /// `[P(REAL), P(FAKE)]` を返す。
    ///
    /// # Errors
    /// 特徴量の次元がモデルと一致しない場合など。
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError>;
}

fn dot(features: &FeatureVector, weights: &[f64]) -> Result<f64, InferenceError> {
    if features.dim() != weights.len() {
        return Err(InferenceError::DimensionMismatch {
            expected: weights.len(),
            actual: features.dim(),
        });
    }
    Ok(features
        .iter()
        .map(|(index, value)| value * weights[index])
        .sum())
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    fn decision(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        Ok(dot(features, &self.coef)? + self.intercept)
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &FeatureVector) -> Result<NewsLabel, InferenceError> {
        let z = self.decision(features)?;
        Ok(if z > 0.0 {
            NewsLabel::Fake
        } else {
            NewsLabel::Real
        })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        let fake = sigmoid(self.decision(features)?);
        Ok([1.0 - fake, fake])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultinomialNb {
    /// `[REAL, FAKE]` の順。
    pub class_log_prior: [f64; 2],
    pub feature_log_prob: [Vec<f64>; 2],
}

impl MultinomialNb {
    fn joint_log_likelihood(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        Ok([
            self.class_log_prior[0] + dot(features, &self.feature_log_prob[0])?,
            self.class_log_prior[1] + dot(features, &self.feature_log_prob[1])?,
        ])
    }
}

impl Classifier for MultinomialNb {
    fn predict(&self, features: &FeatureVector) -> Result<NewsLabel, InferenceError> {
        let [real, fake] = self.joint_log_likelihood(features)?;
        // 同点は先頭クラス (REAL)
        Ok(if fake > real {
            NewsLabel::Fake
        } else {
            NewsLabel::Real
        })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        let [real, fake] = self.joint_log_likelihood(features)?;
        let max = real.max(fake);
        let log_norm = max + ((real - max).exp() + (fake - max).exp()).ln();
        Ok([(real - log_norm).exp(), (fake - log_norm).exp()])
    }
}

/// アーティファクトの `classifier` 節。`kind` で実装を選ぶ。
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierModel {
    LogisticRegression(LogisticRegression),
    MultinomialNb(MultinomialNb),
}

impl ClassifierModel {
    /// ベクトライザの次元と重みの形が合っているか検証する。
    ///
    /// # Errors
    /// 形の不一致や非有限の重みがあれば説明文を返す。
    pub fn validate(&self, dimension: usize) -> Result<(), String> {
        match self {
            Self::LogisticRegression(model) => {
                check_weights("coef", &model.coef, dimension)?;
                if !model.intercept.is_finite() {
                    return Err("intercept must be finite".into());
                }
            }
            Self::MultinomialNb(model) => {
                for row in &model.feature_log_prob {
                    check_weights("feature_log_prob", row, dimension)?;
                }
                if model.class_log_prior.iter().any(|prior| !prior.is_finite()) {
                    return Err("class_log_prior must be finite".into());
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic_regression",
            Self::MultinomialNb(_) => "multinomial_nb",
        }
    }
}

fn check_weights(name: &str, weights: &[f64], dimension: usize) -> Result<(), String> {
    if weights.len() != dimension {
        return Err(format!(
            "{name} has {} weights but the vectorizer has {dimension} features",
            weights.len()
        ));
    }
    if weights.iter().any(|weight| !weight.is_finite()) {
        return Err(format!("{name} weights must be finite"));
    }
    Ok(())
}

impl Classifier for ClassifierModel {
    fn predict(&self, features: &FeatureVector) -> Result<NewsLabel, InferenceError> {
        match self {
            Self::LogisticRegression(model) => model.predict(features),
            Self::MultinomialNb(model) => model.predict(features),
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        match self {
            Self::LogisticRegression(model) => model.predict_proba(features),
            Self::MultinomialNb(model) => model.predict_proba(features),
        }
    }
}
