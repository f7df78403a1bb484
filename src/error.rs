//! リクエスト単位のエラーと、その分類。
use thiserror::Error;

/// 推論中の失敗。共有アーティファクトの状態は変更しない。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("classifier returned invalid probabilities {0:?}")]
    InvalidProbabilities([f64; 2]),
    #[error("{0}")]
    Backend(String),
}

/// パイプライン境界で返すエラー。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("missing required field: '{0}'")]
    MissingField(&'static str),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// エラーの種類。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力の欠落や不正な形式。呼び出し側の問題。
    Input,
    /// 正規化・ベクトル化・分類中の失敗。
    Inference,
}

impl PipelineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField(_) | Self::InvalidRequest(_) => ErrorKind::Input,
            Self::Inference(_) => ErrorKind::Inference,
        }
    }
}
