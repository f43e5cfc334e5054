use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Email not verified")]
    Unverified,

    #[error("Invalid verification code")]
    InvalidCode,

    #[error("Poll is not active")]
    Inactive,

    #[error("Already voted")]
    AlreadyVoted,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload | AppError::InvalidCode | AppError::Inactive => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Unverified => StatusCode::FORBIDDEN,
            AppError::AlreadyVoted => StatusCode::CONFLICT,
        };

        (status, self.to_string()).into_response()
    }
}
