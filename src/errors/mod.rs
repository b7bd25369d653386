use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::constants::{CODE_PERSISTENCE_FAILED, ERR_DB_CONNECTION_FAILED};
use crate::models::ErrorResponse;

#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    Unauthorized { code: String, message: String },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    InternalServerError { code: String, message: String },
    ServiceUnavailable { code: String, message: String },
    ValidationError { code: String, errors: Vec<String> },
}

impl ApiError {
    /// Machine-readable error code carried by every variant.
    pub fn code(&self) -> &str {
        match self {
            ApiError::BadRequest { code, .. }
            | ApiError::Unauthorized { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Conflict { code, .. }
            | ApiError::InternalServerError { code, .. }
            | ApiError::ServiceUnavailable { code, .. }
            | ApiError::ValidationError { code, .. } => code,
        }
    }

    /// Prefix the message of a storage failure with the operation that failed.
    ///
    /// Domain errors (not found, relationship violations, validation) pass
    /// through untouched so callers can still match on them.
    pub fn context(self, operation: &str) -> Self {
        match self {
            ApiError::InternalServerError { code, message } => ApiError::InternalServerError {
                code,
                message: format!("{}: {}", operation, message),
            },
            ApiError::ServiceUnavailable { code, message } => ApiError::ServiceUnavailable {
                code,
                message: format!("{}: {}", operation, message),
            },
            other => other,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::NotFound { message, .. }
            | ApiError::Conflict { message, .. }
            | ApiError::InternalServerError { message, .. }
            | ApiError::ServiceUnavailable { message, .. } => message.clone(),
            ApiError::ValidationError { .. } => "Validation failed".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest { code, message } => {
                write!(f, "Bad Request [{}]: {}", code, message)
            }
            ApiError::Unauthorized { code, message } => {
                write!(f, "Unauthorized [{}]: {}", code, message)
            }
            ApiError::NotFound { code, message } => {
                write!(f, "Not Found [{}]: {}", code, message)
            }
            ApiError::Conflict { code, message } => {
                write!(f, "Conflict [{}]: {}", code, message)
            }
            ApiError::InternalServerError { code, message } => {
                write!(f, "Internal Server Error [{}]: {}", code, message)
            }
            ApiError::ServiceUnavailable { code, message } => {
                write!(f, "Service Unavailable [{}]: {}", code, message)
            }
            ApiError::ValidationError { code, errors } => {
                write!(f, "Validation Error [{}]: {:?}", code, errors)
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } | ApiError::ValidationError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let errors = match self {
            ApiError::ValidationError { errors, .. } => Some(errors.clone()),
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            code: self.code().to_string(),
            message: self.message(),
            errors,
        })
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        ApiError::InternalServerError {
            code: CODE_PERSISTENCE_FAILED.to_string(),
            message: err.to_string(),
        }
    }
}

/// Build the error returned when the connector cannot reach the store.
pub fn connection_error(code: &str, cause: impl fmt::Display) -> ApiError {
    ApiError::ServiceUnavailable {
        code: code.to_string(),
        message: format!("{}: {}", ERR_DB_CONNECTION_FAILED, cause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CODE_SELF_FOLLOW, CODE_USER_NOT_FOUND};

    #[test]
    fn test_context_prefixes_storage_failures() {
        let err = ApiError::InternalServerError {
            code: CODE_PERSISTENCE_FAILED.to_string(),
            message: "socket closed".to_string(),
        }
        .context("Failed to fetch user");

        assert_eq!(err.code(), CODE_PERSISTENCE_FAILED);
        assert_eq!(
            err.to_string(),
            "Internal Server Error [PERSISTENCE_FAILED]: Failed to fetch user: socket closed"
        );
    }

    #[test]
    fn test_context_leaves_domain_errors_alone() {
        let err = ApiError::NotFound {
            code: CODE_USER_NOT_FOUND.to_string(),
            message: "User not found".to_string(),
        }
        .context("Error in following the user");

        assert_eq!(err.to_string(), "Not Found [USER_NOT_FOUND]: User not found");
    }

    #[test]
    fn test_status_codes() {
        let self_follow = ApiError::BadRequest {
            code: CODE_SELF_FOLLOW.to_string(),
            message: "User cannot follow itself".to_string(),
        };
        assert_eq!(self_follow.status_code(), StatusCode::BAD_REQUEST);

        let unavailable = connection_error("DB_NOT_CONNECTED", "no uri");
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(unavailable.code(), "DB_NOT_CONNECTED");
    }
}
