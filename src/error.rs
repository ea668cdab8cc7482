use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::validator::FieldError;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("{} validation error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("no interest rate with id {0}")]
    NotFound(i64),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("stored rate {id} is unreadable: {reason}")]
    CorruptRecord { id: i64, reason: String },
}

impl ResponseError for RateError {
    fn status_code(&self) -> StatusCode {
        match self {
            RateError::Validation(_) => StatusCode::BAD_REQUEST,
            RateError::NotFound(_) => StatusCode::NOT_FOUND,
            RateError::Storage(_) | RateError::CorruptRecord { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            RateError::Validation(errors) => {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                HttpResponse::BadRequest().json(messages)
            }
            RateError::NotFound(_) => HttpResponse::NotFound().finish(),
            RateError::Storage(_) | RateError::CorruptRecord { .. } => {
                log::error!("{self}");
                HttpResponse::InternalServerError().json("An internal error occurred.")
            }
        }
    }
}
