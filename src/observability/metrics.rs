//! Prometheusメトリクス定義。
use prometheus::{
    Counter, Histogram, Registry, exponential_buckets, register_counter_with_registry,
    register_histogram_with_registry,
};
use std::sync::Arc;

/// メトリクスコレクター。
#[derive(Debug, Clone)]
pub struct Metrics {
    // カウンター
    pub predictions_fake: Counter,
    pub predictions_real: Counter,
    pub input_failures: Counter,
    pub inference_failures: Counter,

    // ヒストグラム
    pub pipeline_duration: Histogram,
}

impl Metrics {
    /// 新しいメトリクスコレクターを作成する。
    ///
    /// # Errors
    /// 同じ名前のメトリクスがレジストリに登録済みの場合。
    pub fn new(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        Ok(Self {
            predictions_fake: register_counter_with_registry!(
                "veracity_predictions_fake_total",
                "Total number of items classified as FAKE",
                registry
            )?,
            predictions_real: register_counter_with_registry!(
                "veracity_predictions_real_total",
                "Total number of items classified as REAL",
                registry
            )?,
            input_failures: register_counter_with_registry!(
                "veracity_input_failures_total",
                "Total number of requests rejected for missing fields",
                registry
            )?,
            inference_failures: register_counter_with_registry!(
                "veracity_inference_failures_total",
                "Total number of requests that failed during inference",
                registry
            )?,
            pipeline_duration: register_histogram_with_registry!(
                "veracity_pipeline_duration_seconds",
                "Duration of normalize, vectorize and classify for one item",
                exponential_buckets(0.000_05, 2.0, 14)?,
                registry
            )?,
        })
    }
}
