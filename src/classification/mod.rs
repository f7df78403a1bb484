//! 記事の真偽判定のための正規化・特徴量・分類モデル。
use std::fmt;

use serde::Serialize;

use crate::error::InferenceError;

pub mod features;
pub mod model;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use features::{FeatureVector, TfidfVectorizer, Vectorizer};
pub use model::{Classifier, ClassifierModel};
pub use stemmer::{PorterStemmer, StemmerMode};
pub use tokenizer::{NormalizedText, TextNormalizer};

/// 分類器のラベル。学習時のクラス値は REAL = 0, FAKE = 1。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NewsLabel {
    Real,
    Fake,
}

impl NewsLabel {
    /// 確率ベクトル上の位置 (= クラス値)。
    #[must_use]
    pub fn class_index(self) -> usize {
        match self {
            Self::Real => 0,
            Self::Fake => 1,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Real => "REAL",
            Self::Fake => "FAKE",
        }
    }
}

impl fmt::Display for NewsLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 判定結果。保存はしない。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: NewsLabel,
    pub confidence: f64,
}

impl Prediction {
    /// `The news is FAKE (Confidence: 87.34%)`
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "The news is {} (Confidence: {:.2}%)",
            self.label,
            self.confidence * 100.0
        )
    }
}

/// 予測ラベルに対応する確率を信頼度とする。
///
/// 最大確率ではなく、あくまでラベルの位置で引く。較正された二値分類器なら両者は一致するが、
/// 一致しないモデルでも出力を変えないためにこの規則を守る。
///
/// # Errors
/// 確率が NaN または `[0, 1]` の範囲外なら [`InferenceError::InvalidProbabilities`]。
pub fn resolve_confidence(
    label: NewsLabel,
    probabilities: [f64; 2],
) -> Result<Prediction, InferenceError> {
    if probabilities.iter().any(|p| !(0.0..=1.0).contains(p)) {
        return Err(InferenceError::InvalidProbabilities(probabilities));
    }
    Ok(Prediction {
        label,
        confidence: probabilities[label.class_index()],
    })
}

/// ベクトルを分類し、信頼度を解決する。
///
/// # Errors
/// 分類器の失敗、または不正な確率ベクトル。
pub fn classify(
    classifier: &dyn Classifier,
    features: &FeatureVector,
) -> Result<Prediction, InferenceError> {
    let label = classifier.predict(features)?;
    let probabilities = classifier.predict_proba(features)?;
    resolve_confidence(label, probabilities)
}
