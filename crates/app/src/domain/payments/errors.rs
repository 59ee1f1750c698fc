//! Payments service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::promotions::{PromotionsServiceError, evaluation::Rejection};

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("payment not found")]
    NotFound,

    #[error("payment already exists")]
    AlreadyExists,

    #[error("package not found")]
    PackageNotFound,

    #[error("package is not available for purchase")]
    PackageUnavailable,

    #[error("promotion rejected: {0}")]
    PromotionRejected(Rejection),

    #[error("notification signature is invalid")]
    InvalidSignature,

    #[error("notification amount does not match payment")]
    AmountMismatch,

    #[error("invalid data")]
    InvalidData,

    #[error("promotion error")]
    Promotion(#[source] PromotionsServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::PackageNotFound,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

impl From<PromotionsServiceError> for PaymentsServiceError {
    fn from(error: PromotionsServiceError) -> Self {
        match error {
            PromotionsServiceError::PackageNotFound => Self::PackageNotFound,
            other => Self::Promotion(other),
        }
    }
}
