use crate::{Error, relay::NormalizedResult};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct TryOnResponse {
    pub output: String,
    pub masked: Value,
}

impl From<NormalizedResult> for TryOnResponse {
    fn from(result: NormalizedResult) -> Self {
        Self {
            output: result.output,
            masked: result.masked,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            warn!("Rejected try-on request: {}", self);
            StatusCode::BAD_REQUEST
        } else {
            error!("Error in /tryon route: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
