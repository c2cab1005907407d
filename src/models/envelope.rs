//! Gateway invocation envelopes

use std::borrow::Cow;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult, ErrorResponse, INVALID_BODY, MISSING_BODY};

/// Request envelope handed over by the gateway. Extra gateway fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    /// Serialized JSON object carrying `operation` and its fields
    #[serde(default)]
    pub body: Option<String>,
    /// Set by gateways that base64-encode the body
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl RequestEnvelope {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            is_base64_encoded: false,
        }
    }

    /// Body text, base64-decoded when flagged
    pub fn decoded_body(&self) -> AppResult<Cow<'_, str>> {
        let body = self
            .body
            .as_deref()
            .ok_or_else(|| AppError::bad_request(MISSING_BODY))?;

        if !self.is_base64_encoded {
            return Ok(Cow::Borrowed(body));
        }

        let bytes = STANDARD
            .decode(body)
            .map_err(|_| AppError::bad_request(INVALID_BODY))?;
        String::from_utf8(bytes)
            .map(Cow::Owned)
            .map_err(|_| AppError::bad_request(INVALID_BODY))
    }
}

/// Response envelope returned to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    /// Serialized JSON object: `message` on success, `error` on failure
    pub body: String,
}

impl ResponseEnvelope {
    /// 200 envelope around a success payload
    pub fn ok(body: Value) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            body: body.to_string(),
        }
    }

    /// 200 envelope carrying only a message
    pub fn message(message: &str) -> Self {
        Self::ok(json!({ "message": message }))
    }

    pub fn from_error(err: &AppError) -> Self {
        Self {
            status_code: err.status_code().as_u16(),
            body: json!({ "error": ErrorResponse::from(err).error }).to_string(),
        }
    }

    /// Parsed body
    #[cfg(test)]
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}
