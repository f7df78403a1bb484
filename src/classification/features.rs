//! 正規化済みテキストから TF-IDF 特徴量を計算する。
use rustc_hash::FxHashMap;
use serde::Deserialize;
use sprs::CsVec;

use crate::error::InferenceError;

/// 疎な特徴量ベクトル。次元は学習時に確定した語彙サイズ。
pub type FeatureVector = CsVec<f64>;

/// 学習済みベクトライザの能力。
pub trait Vectorizer: Send + Sync {
    /// 語彙サイズ。
    fn dimension(&self) -> usize;

    /// 語彙にない語は黙って捨てる。
    ///
    /// # Errors
    /// 実装固有の失敗があれば [`InferenceError`] を返す。
    fn transform(&self, normalized: &str) -> Result<FeatureVector, InferenceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowNorm {
    #[default]
    L2,
    L1,
    None,
}

/// 書き出された TF-IDF パラメータ。
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfParams {
    pub vocabulary: FxHashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_use_idf")]
    pub use_idf: bool,
    #[serde(default)]
    pub norm: RowNorm,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_min_token_len() -> usize {
    2
}

fn default_use_idf() -> bool {
    true
}

impl TfidfParams {
    /// # Errors
    /// 語彙と IDF の整合性が取れていない場合は説明文を返す。
    pub fn validate(&self) -> Result<(), String> {
        if self.vocabulary.is_empty() {
            return Err("vectorizer vocabulary is empty".into());
        }
        let dimension = self.idf.len();
        let mut seen = vec![false; dimension];
        for (term, &index) in &self.vocabulary {
            if index >= dimension {
                return Err(format!(
                    "vocabulary index {index} for '{term}' out of range for {dimension} idf weights"
                ));
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(format!("vocabulary index {index} assigned twice"));
            }
        }
        if self.idf.iter().any(|weight| !weight.is_finite()) {
            return Err("idf weights must be finite".into());
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    params: TfidfParams,
}

impl TfidfVectorizer {
    /// 検証済みのパラメータから構築する。
    ///
    /// # Errors
    /// [`TfidfParams::validate`] が失敗した場合。
    pub fn new(params: TfidfParams) -> Result<Self, String> {
        params.validate()?;
        Ok(Self { params })
    }

    fn analyze(&self, normalized: &str) -> Vec<String> {
        let words: Vec<&str> = normalized
            .split_whitespace()
            .filter(|word| word.chars().count() >= self.params.min_token_len)
            .collect();
        let (min_n, max_n) = self.params.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > words.len() {
                break;
            }
            terms.extend(words.windows(n).map(|window| window.join(" ")));
        }
        terms
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.params.idf.len()
    }

    fn transform(&self, normalized: &str) -> Result<FeatureVector, InferenceError> {
        let mut counts: FxHashMap<usize, f64> = FxHashMap::default();
        for term in self.analyze(normalized) {
            if let Some(&index) = self.params.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts.into_iter().collect();
        entries.sort_unstable_by_key(|(index, _)| *index);
        for (index, value) in &mut entries {
            if self.params.sublinear_tf {
                *value = 1.0 + value.ln();
            }
            if self.params.use_idf {
                *value *= self.params.idf[*index];
            }
        }

        let norm = match self.params.norm {
            RowNorm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            RowNorm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            RowNorm::None => 1.0,
        };
        if norm > 0.0 {
            for (_, value) in &mut entries {
                *value /= norm;
            }
        }

        let (indices, data): (Vec<usize>, Vec<f64>) = entries.into_iter().unzip();
        Ok(CsVec::new(self.dimension(), indices, data))
    }
}
