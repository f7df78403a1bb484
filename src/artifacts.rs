//! 学習済みベクトライザと分類器の読み込み。
//!
//! 起動時に一度だけ読み込み、プロセス終了まで読み取り専用で共有する。
//! 読み込みや検証に失敗した場合はリクエストを受け付けずに終了する。
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::classification::{
    Classifier, ClassifierModel, StemmerMode, TfidfVectorizer, Vectorizer, features::TfidfParams,
};

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read model artifact {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
struct ArtifactFile {
    format_version: u32,
    #[serde(default)]
    stemmer: Option<StemmerMode>,
    vectorizer: TfidfParams,
    classifier: ClassifierModel,
}

/// ベクトライザと分類器の組。
#[derive(Clone)]
pub struct ModelArtifacts {
    vectorizer: Arc<dyn Vectorizer>,
    classifier: Arc<dyn Classifier>,
    stemmer: Option<StemmerMode>,
}

impl std::fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("feature_dim", &self.vectorizer.dimension())
            .field("stemmer", &self.stemmer)
            .finish_non_exhaustive()
    }
}

impl ModelArtifacts {
    /// 任意の実装から組み立てる。テストではスタブを差し込む。
    #[must_use]
    pub fn new(vectorizer: Arc<dyn Vectorizer>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            vectorizer,
            classifier,
            stemmer: None,
        }
    }

    /// ファイルから読み込み、検証する。
    ///
    /// # Errors
    /// ファイルが存在しない・読めない・JSON として不正・形が合わない場合は [`ArtifactError`]。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ArtifactError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ArtifactError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let artifacts = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            feature_dim = artifacts.feature_dim(),
            "model artifacts loaded"
        );
        Ok(artifacts)
    }

    /// # Errors
    /// JSON として不正、または形が合わない場合。
    pub fn from_json_str(raw: &str) -> Result<Self, ArtifactError> {
        let file: ArtifactFile = serde_json::from_str(raw)?;
        if file.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ArtifactError::Invalid(format!(
                "unsupported format_version {} (expected {SUPPORTED_FORMAT_VERSION})",
                file.format_version
            )));
        }
        let vectorizer = TfidfVectorizer::new(file.vectorizer).map_err(ArtifactError::Invalid)?;
        file.classifier
            .validate(vectorizer.dimension())
            .map_err(ArtifactError::Invalid)?;
        info!(
            classifier = file.classifier.kind(),
            feature_dim = vectorizer.dimension(),
            "model artifact validated"
        );

        Ok(Self {
            vectorizer: Arc::new(vectorizer),
            classifier: Arc::new(file.classifier),
            stemmer: file.stemmer,
        })
    }

    #[must_use]
    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    #[must_use]
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    #[must_use]
    pub fn feature_dim(&self) -> usize {
        self.vectorizer.dimension()
    }

    /// 学習時に使われたステマーのモード (記録されていれば)。
    #[must_use]
    pub fn stemmer(&self) -> Option<StemmerMode> {
        self.stemmer
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = include_str!("../resources/sample_model.json");

    #[test]
    fn sample_bundle_loads() {
        let artifacts = ModelArtifacts::from_json_str(SAMPLE).expect("sample");
        assert_eq!(artifacts.feature_dim(), 24);
        assert_eq!(artifacts.stemmer(), Some(StemmerMode::Nltk));
    }

    #[test]
    fn missing_file_is_not_found() {
        let error = ModelArtifacts::load("/missing/model.json").unwrap_err();
        assert!(matches!(error, ArtifactError::NotFound { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write sample");
        let artifacts = ModelArtifacts::load(file.path()).expect("load from disk");
        assert_eq!(artifacts.feature_dim(), 24);
    }

    #[test]
    fn corrupt_json_is_a_parse_error() {
        let error = ModelArtifacts::from_json_str("{ not json").unwrap_err();
        assert!(matches!(error, ArtifactError::Parse(_)));
    }

    #[test]
    fn rejects_unknown_format_version() {
        let raw = SAMPLE.replacen("\"format_version\": 1", "\"format_version\": 2", 1);
        let error = ModelArtifacts::from_json_str(&raw).unwrap_err();
        assert!(matches!(error, ArtifactError::Invalid(_)));
    }

    #[test]
    fn rejects_classifier_with_wrong_width() {
        let raw = r#"{
            "format_version": 1,
            "vectorizer": { "vocabulary": { "elect": 0, "hoax": 1 }, "idf": [1.0, 2.0] },
            "classifier": { "kind": "logistic_regression", "coef": [0.5], "intercept": 0.0 }
        }"#;
        let error = ModelArtifacts::from_json_str(raw).unwrap_err();
        assert!(error.to_string().contains("coef has 1 weights"));
    }
}
