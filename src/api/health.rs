use axum::{Json, extract::State};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) struct HealthReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    feature_dim: Option<usize>,
}

// アーティファクトは起動時に検証済みなので、ここまで来れば常に ready。
pub(crate) async fn ready(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_ready_check();
    Json(HealthReport {
        status: "ready",
        feature_dim: Some(state.pipeline().artifacts().feature_dim()),
    })
}

pub(crate) async fn live(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_live_check();
    Json(HealthReport {
        status: "live",
        feature_dim: None,
    })
}
