//! HTTP mapping for domain errors.
//!
//! Handlers return [`ApiResult`]; Actix calls [`ResponseError`] to turn the
//! domain [`Error`] into a JSON envelope with a status derived from its code.
//! Extractor failures (malformed JSON, bad query strings, bad path segments)
//! are routed through the same envelope via the `*_error_handler` functions
//! registered on the app.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER, TraceId};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

/// Attach the current request's trace id when the error has none yet.
fn with_current_trace(error: &Error) -> Error {
    match (error.trace_id(), TraceId::current()) {
        (None, Some(trace_id)) => error.clone().with_trace_id(trace_id.to_string()),
        _ => error.clone(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let traced = with_current_trace(self);
        if matches!(traced.code(), ErrorCode::InternalError) {
            error!(
                trace_id = traced.trace_id().unwrap_or_default(),
                message = traced.message(),
                "internal error returned to client"
            );
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = traced.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(&traced))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Body deserialisation failures become `invalid_request` envelopes.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let error = match &err {
        JsonPayloadError::ContentType => {
            Error::invalid_request("request body must be application/json")
        }
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            Error::invalid_request("request body is too large")
        }
        other => Error::invalid_request("request body is not valid JSON")
            .with_details(json!({ "reason": other.to_string(), "code": "invalid_body" })),
    };
    error.into()
}

/// Query string failures become `invalid_request` envelopes.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("query string is not valid")
        .with_details(json!({ "reason": err.to_string(), "code": "invalid_query" }))
        .into()
}

/// Path segment failures become `invalid_request` envelopes.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("path parameter is not valid")
        .with_details(json!({ "reason": err.to_string(), "code": "invalid_path" }))
        .into()
}

#[cfg(test)]
mod tests;
