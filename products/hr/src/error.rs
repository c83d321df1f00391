use platform_api::ApiError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum HrError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("csv export failed: {0}")]
    Export(#[from] csv::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HrResult<T> = Result<T, HrError>;

impl HrError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        HrError::NotFound { entity, id }
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        HrError::Validation(ValidationErrors::single(field, message))
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            HrError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HrError::NotFound { .. })
    }

    /// Turn a unique-constraint violation into a field error.
    pub(crate) fn from_unique(err: DbErr, field: &str, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => HrError::invalid(field, message),
            _ => HrError::Database(err),
        }
    }
}

impl From<HrError> for ApiError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::Validation(errors) => ApiError::Validation(errors.messages()),
            HrError::NotFound { .. } => ApiError::NotFound,
            other => ApiError::internal(anyhow::Error::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_field_messages() {
        let api: ApiError = HrError::invalid("emp_code", "Employee code already exists").into();
        match api {
            ApiError::Validation(details) => {
                assert_eq!(details, vec!["emp_code: Employee code already exists"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn database_errors_become_internal() {
        let api: ApiError = HrError::Database(DbErr::Custom("locked".into())).into();
        assert_eq!(api.code(), "INTERNAL");
        assert!(!api.public_message().contains("locked"));
    }

    #[test]
    fn not_found_keeps_entity_in_message() {
        let err = HrError::not_found("employee", 7);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "employee 7 not found");
    }
}
