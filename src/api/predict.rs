use std::time::Instant;

use axum::{
    Form, Json,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    app::AppState,
    classification::NewsLabel,
    error::{ErrorKind, PipelineError},
    pipeline::{NewsSubmission, prediction_text},
};

#[derive(Debug, Serialize)]
struct PredictionResponse {
    prediction_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<NewsLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
}

pub(crate) async fn predict_form(
    State(state): State<AppState>,
    submission: Result<Form<NewsSubmission>, FormRejection>,
) -> Response {
    let submission = submission
        .map(|Form(submission)| submission)
        .map_err(|rejection| PipelineError::InvalidRequest(rejection.body_text()));
    respond(&state, submission)
}

pub(crate) async fn predict_json(
    State(state): State<AppState>,
    submission: Result<Json<NewsSubmission>, JsonRejection>,
) -> Response {
    let submission = submission
        .map(|Json(submission)| submission)
        .map_err(|rejection| PipelineError::InvalidRequest(rejection.body_text()));
    respond(&state, submission)
}

fn respond(state: &AppState, submission: Result<NewsSubmission, PipelineError>) -> Response {
    let started = Instant::now();
    let pipeline = state.pipeline();
    let outcome = submission.and_then(|raw| pipeline.predict_submission(raw));
    state.telemetry().record_outcome(&outcome, started.elapsed());

    let text = prediction_text(&outcome);
    match outcome {
        Ok(prediction) => {
            info!(
                label = %prediction.label,
                confidence = prediction.confidence,
                "news item classified"
            );
            let body = Json(PredictionResponse {
                prediction_text: text,
                label: Some(prediction.label),
                confidence: Some(prediction.confidence),
            });
            (StatusCode::OK, body).into_response()
        }
        Err(error) => {
            let status = match error.kind() {
                ErrorKind::Input => StatusCode::BAD_REQUEST,
                ErrorKind::Inference => StatusCode::INTERNAL_SERVER_ERROR,
            };
            warn!(%error, status = status.as_u16(), "news item classification failed");
            let body = Json(PredictionResponse {
                prediction_text: text,
                label: None,
                confidence: None,
            });
            (status, body).into_response()
        }
    }
}
