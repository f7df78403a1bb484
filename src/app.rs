use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;

use crate::{
    artifacts::ModelArtifacts, config::Config, observability::Telemetry, pipeline::NewsPipeline,
};

#[derive(Clone)]
pub(crate) struct AppState {
    registry: Arc<ComponentRegistry>,
}

/// 起動時に一度だけ組み立て、以後は読み取り専用で共有する依存一式。
pub struct ComponentRegistry {
    telemetry: Telemetry,
    pipeline: Arc<NewsPipeline>,
}

impl AppState {
    pub(crate) fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub(crate) fn telemetry(&self) -> &Telemetry {
        &self.registry.telemetry
    }

    pub(crate) fn pipeline(&self) -> Arc<NewsPipeline> {
        Arc::clone(&self.registry.pipeline)
    }
}

impl ComponentRegistry {
    /// 設定からアーティファクトを読み込み、共有レジストリを構築する。
    ///
    /// # Errors
    /// アーティファクトが存在しない・壊れている場合や、Telemetry の初期化に失敗した場合。
    pub fn build(config: Config) -> Result<Self> {
        let path = config.model_path();
        let artifacts = ModelArtifacts::load(path)
            .with_context(|| format!("failed to load model artifacts from {}", path.display()))?;
        Self::with_artifacts(config, artifacts)
    }

    /// 読み込み済みのアーティファクトから構築する。テストではスタブを渡す。
    ///
    /// # Errors
    /// Telemetry の初期化に失敗した場合。
    pub fn with_artifacts(config: Config, artifacts: ModelArtifacts) -> Result<Self> {
        let telemetry = Telemetry::new().context("failed to initialize telemetry")?;
        let pipeline = NewsPipeline::new(artifacts, config.stemmer_mode())
            .with_normalized_logging(config.log_predictions());

        Ok(Self {
            telemetry,
            pipeline: Arc::new(pipeline),
        })
    }
}

pub fn build_router(registry: ComponentRegistry) -> Router {
    let state = AppState::new(registry);
    crate::api::router(state)
}
