//! HTTP error responses.
//!
//! Every failure is rendered as `{ "ok": false, "error": "<message>" }`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{domain::ValueObjectError, usecase::MessageError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Message(#[from] MessageError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Message(error) => match error {
                MessageError::NotParticipant | MessageError::NotAuthorized => {
                    StatusCode::FORBIDDEN
                }
                MessageError::MessageNotFound
                | MessageError::ChatNotFound
                | MessageError::NotificationNotFound => StatusCode::NOT_FOUND,
                MessageError::InvalidContent(_)
                | MessageError::InvalidQuery(_)
                | MessageError::InvalidExpiration => StatusCode::BAD_REQUEST,
                MessageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(error: ValueObjectError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        let body = serde_json::json!({
            "ok": false,
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
