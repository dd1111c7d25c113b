use std::io;
use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use movelead_config::ConfigError;
use movelead_domain::{ErrorBody, FieldError, FieldErrorsBody};

/// Client-facing text of every 500. The failure itself is only logged, or
/// attached as `detail` outside production.
pub const UPSTREAM_UNAVAILABLE: &str = "Upstream service unavailable.";

/// Failures while handling one `POST /proxy` call.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("request body is not a JSON lead: {0}")]
    MalformedBody(#[source] serde_json::Error),
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),
    #[error("upstream responded with status {status} {details}")]
    UpstreamStatus { status: u16, details: String },
    #[error("upstream request failed: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("upstream response could not be decoded: {0}")]
    UpstreamBody(#[source] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MalformedBody(_) | RelayError::Invalid(_) => StatusCode::BAD_REQUEST,
            RelayError::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            RelayError::Unreachable(_) | RelayError::UpstreamBody(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the JSON error response. Internal detail is attached only when
    /// `expose_detail` is set.
    pub fn into_response_with_detail(self, expose_detail: bool) -> Response {
        let status = self.status();
        match self {
            RelayError::MalformedBody(err) => {
                warn!(error = %err, "rejecting unreadable body");
                let error = FieldError::new("body", "Request body must be a JSON object.");
                (status, Json(FieldErrorsBody { errors: vec![error] })).into_response()
            }
            RelayError::Invalid(errors) => {
                (status, Json(FieldErrorsBody { errors })).into_response()
            }
            RelayError::UpstreamStatus {
                status: upstream,
                details,
            } => {
                warn!(status = upstream, %details, "upstream rejected the lead");
                let mut body = ErrorBody::new("API request failed");
                body.details = Some(details);
                body.status = Some(upstream);
                (status, Json(body)).into_response()
            }
            other => {
                error!(error = %other, "relay failure");
                let mut body = ErrorBody::new("Failed to fetch movers");
                body.message = Some(UPSTREAM_UNAVAILABLE.to_string());
                if expose_detail {
                    body.detail = Some(format!("{other:?}"));
                }
                (status, Json(body)).into_response()
            }
        }
    }
}

/// Reasons the relay could not start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not build the upstream HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("server stopped: {0}")]
    Serve(#[source] io::Error),
}
