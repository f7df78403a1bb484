//! 1件の記事を 正規化 → ベクトル化 → 分類 → 信頼度解決 の順に処理する。
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    artifacts::ModelArtifacts,
    classification::{self, Prediction, StemmerMode, TextNormalizer},
    error::PipelineError,
};

/// リクエストから受け取ったままの入力。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsSubmission {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// 必須項目が揃った入力。中身は空でもよい。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,
    pub author: String,
}

impl NewsItem {
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// 著者、タイトルの順に連結する (学習データと同じ順)。
    #[must_use]
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.author, self.title)
    }
}

impl TryFrom<NewsSubmission> for NewsItem {
    type Error = PipelineError;

    fn try_from(submission: NewsSubmission) -> Result<Self, Self::Error> {
        let NewsSubmission { title, author } = submission;
        let title = title.ok_or(PipelineError::MissingField("title"))?;
        let author = author.ok_or(PipelineError::MissingField("author"))?;
        Ok(Self { title, author })
    }
}

/// リクエスト間で共有する推論パイプライン。状態は持たない。
#[derive(Debug)]
pub struct NewsPipeline {
    normalizer: TextNormalizer,
    artifacts: ModelArtifacts,
    log_normalized: bool,
}

impl NewsPipeline {
    #[must_use]
    pub fn new(artifacts: ModelArtifacts, stemmer_mode: StemmerMode) -> Self {
        let normalizer = TextNormalizer::new(stemmer_mode);
        if let Some(fitted) = artifacts.stemmer()
            && fitted != normalizer.stemmer_mode()
        {
            warn!(
                configured = %normalizer.stemmer_mode(),
                fitted = %fitted,
                "stemmer mode differs from the one used to fit the vocabulary"
            );
        }
        Self {
            normalizer,
            artifacts,
            log_normalized: false,
        }
    }

    /// 正規化後のテキストを debug ログに出す。
    #[must_use]
    pub fn with_normalized_logging(mut self, enabled: bool) -> Self {
        self.log_normalized = enabled;
        self
    }

    #[must_use]
    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    /// 未検証の入力を判定する。
    ///
    /// # Errors
    /// 項目の欠落は [`PipelineError::MissingField`]、推論失敗は [`PipelineError::Inference`]。
    pub fn predict_submission(
        &self,
        submission: NewsSubmission,
    ) -> Result<Prediction, PipelineError> {
        let item = NewsItem::try_from(submission)?;
        self.predict(&item)
    }

    /// # Errors
    /// ベクトル化・分類の失敗は [`PipelineError::Inference`]。
    pub fn predict(&self, item: &NewsItem) -> Result<Prediction, PipelineError> {
        let normalized = self.normalizer.normalize(&item.combined_text());
        if self.log_normalized {
            debug!(
                normalized = %normalized.normalized,
                tokens = normalized.tokens.len(),
                "normalized news item"
            );
        }
        let features = self
            .artifacts
            .vectorizer()
            .transform(&normalized.normalized)?;
        let prediction = classification::classify(self.artifacts.classifier(), &features)?;
        Ok(prediction)
    }
}

/// 利用者に見せる1行の文字列へ変換する。
#[must_use]
pub fn prediction_text(outcome: &Result<Prediction, PipelineError>) -> String {
    match outcome {
        Ok(prediction) => prediction.message(),
        Err(error) => format!("An error occurred: {error}"),
    }
}
