//! Route table and the response shapes shared by every resource.

mod doctors;
mod health;
mod patients;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use clinic_core::{ClinicService, DbResult, Fetch, Outcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::error::ApiResult;

pub use doctors::doctor_routes;
pub use health::health_routes;
pub use patients::patient_routes;

pub const SUCCESS: &str = "Success";
pub const FAILED: &str = "Failed";
pub const NOT_FOUND: &str = "Not found";

/// Build the full application router.
pub fn router(service: ClinicService) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(patient_routes(service.clone()))
        .merge(doctor_routes(service))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// `{"message": ...}` body used by every mutation and error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Name filters for `/patients/search` and `/doctors/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A mutation outcome as an HTTP reply: 200 Success or 400 Failed.
///
/// Rejected payloads and zero-row updates/deletes share the 400 reply.
pub struct OutcomeReply(pub Outcome);

impl IntoResponse for OutcomeReply {
    fn into_response(self) -> Response {
        if self.0.is_success() {
            (StatusCode::OK, Json(MessageResponse::new(SUCCESS))).into_response()
        } else {
            (StatusCode::BAD_REQUEST, Json(MessageResponse::new(FAILED))).into_response()
        }
    }
}

/// A lookup result: 200 with the record, 404 when missing, 400 for a bad id.
pub struct FetchReply<T>(pub Fetch<T>);

impl<T: Serialize> IntoResponse for FetchReply<T> {
    fn into_response(self) -> Response {
        match self.0 {
            Fetch::Found(record) => (StatusCode::OK, Json(record)).into_response(),
            Fetch::NotFound => {
                (StatusCode::NOT_FOUND, Json(MessageResponse::new(NOT_FOUND))).into_response()
            }
            Fetch::Rejected => {
                (StatusCode::BAD_REQUEST, Json(MessageResponse::new(FAILED))).into_response()
            }
        }
    }
}

/// A search result: 200 with matches, 400 when no filter was given.
pub struct SearchReply<T>(pub Option<Vec<T>>);

impl<T: Serialize> IntoResponse for SearchReply<T> {
    fn into_response(self) -> Response {
        match self.0 {
            Some(rows) => (StatusCode::OK, Json(rows)).into_response(),
            None => (StatusCode::BAD_REQUEST, Json(MessageResponse::new(FAILED))).into_response(),
        }
    }
}

/// Parse a request body leniently. Anything that is not JSON becomes
/// `Value::Null`, which every validator rejects.
pub(crate) fn parse_payload(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// Run blocking service work off the async executor.
pub(crate) async fn blocking<T, F>(service: ClinicService, work: F) -> ApiResult<T>
where
    F: FnOnce(&ClinicService) -> DbResult<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || work(&service)).await?;
    Ok(result?)
}
