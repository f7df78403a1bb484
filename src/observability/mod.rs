pub(crate) mod metrics;
pub mod tracing;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use prometheus::{Encoder, Registry, TextEncoder};

use self::metrics::Metrics;
use crate::{
    classification::{NewsLabel, Prediction},
    error::{ErrorKind, PipelineError},
};

/// メトリクスを管理する構造体。レジストリはプロセス全体ではなくこのインスタンスが持つ。
#[derive(Debug, Clone)]
pub struct Telemetry {
    registry: Arc<Registry>,
    metrics: Arc<Metrics>,
}

impl Telemetry {
    /// 新しいTelemetryインスタンスを作成し、メトリクスを登録する。
    ///
    /// # Errors
    /// メトリクスの登録に失敗した場合。
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let metrics = Arc::new(Metrics::new(Arc::clone(&registry))?);
        Ok(Self { registry, metrics })
    }

    /// メトリクスへのアクセスを提供する。
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// 1件の判定結果を記録する。
    pub fn record_outcome(&self, outcome: &Result<Prediction, PipelineError>, elapsed: Duration) {
        self.metrics
            .pipeline_duration
            .observe(elapsed.as_secs_f64());
        match outcome {
            Ok(prediction) => match prediction.label {
                NewsLabel::Fake => self.metrics.predictions_fake.inc(),
                NewsLabel::Real => self.metrics.predictions_real.inc(),
            },
            Err(error) => match error.kind() {
                ErrorKind::Input => self.metrics.input_failures.inc(),
                ErrorKind::Inference => self.metrics.inference_failures.inc(),
            },
        }
    }

    /// 準備完了チェックを記録する。
    pub fn record_ready_check(&self) {
        ::tracing::debug!("service readiness check");
    }

    /// 生存チェックを記録する。
    pub fn record_live_check(&self) {
        ::tracing::debug!("service liveness check");
    }

    /// Prometheusメトリクスをレンダリングする。
    #[must_use]
    pub fn render_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        String::from_utf8(buffer).unwrap_or_default()
    }
}
