use application::ApplicationError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn unprocessable(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, code, message)
    }

    pub fn store_unavailable() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "STORE_UNAVAILABLE",
            "storage is temporarily unavailable",
        )
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Domain(DomainError::InvalidArgument { field, reason }) => {
                ApiError::unprocessable("INVALID_ARGUMENT", format!("{field}: {reason}"))
            }
            ApplicationError::Domain(DomainError::ParticipantAlreadyExists) => ApiError::new(
                StatusCode::CONFLICT,
                "PARTICIPANT_EXISTS",
                "participant already present",
            ),
            ApplicationError::Domain(DomainError::ParticipantNotFound) => ApiError::new(
                StatusCode::NOT_FOUND,
                "PARTICIPANT_NOT_FOUND",
                "participant not found",
            ),
            ApplicationError::Domain(DomainError::UnknownSender) => {
                ApiError::unprocessable("UNKNOWN_SENDER", "sender is not in the room")
            }
            ApplicationError::Repository(err) => {
                // 内部细节只写日志，不返回给调用方
                tracing::error!(error = %err, "存储访问失败");
                ApiError::store_unavailable()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::unprocessable("INVALID_BODY", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
