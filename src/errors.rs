//! # Error Handling
//!
//! Every failure in the request pipeline ends up as an [`ApiError`]. This covers
//! body decoding, invalid filters, database errors and hooks that veto a write.
//! The error renders as the failure envelope with a matching HTTP status:
//!
//! ```json
//! {"error":1,"msg":"an abnormal rollback occurred"}
//! ```
//!
//! Database errors are logged through `tracing` and replaced with a generic
//! message before they reach the client.
//!
//! ## Usage in hooks
//!
//! ```rust,ignore
//! Mix::<user::Entity, FindOneBody>::new().tx_next(|_txn, _subject| {
//!     Box::pin(async move { Err(ApiError::rollback("quota exceeded")) })
//! })
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use std::fmt;

use crate::envelope::Failure;

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - no record matched the effective predicate
    NotFound {
        /// Resource name (e.g. "user")
        resource: String,
    },

    /// 400 Bad Request - undecodable body or invalid query input
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 409 Conflict - unique constraint violation
    Conflict {
        /// User-facing error message
        message: String,
    },

    /// 400 Bad Request - a transaction hook vetoed the operation
    ///
    /// The message is sent to the client exactly as the hook wrote it.
    Rejected {
        /// Message returned by the hook
        message: String,
    },

    /// 500 Internal Server Error - database error (details logged, not exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },

    /// 500 Internal Server Error - generic internal error
    Internal {
        /// User-facing generic message
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },

    /// Custom error with specific status code
    Custom {
        /// HTTP status code
        status: StatusCode,
        /// User-facing message
        message: String,
    },
}

impl ApiError {
    /// Create a 404 Not Found error for a resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Abort the enclosing write transaction with `message`.
    ///
    /// Intended for `tx_next` hooks: the transaction is rolled back and the
    /// client receives `message` verbatim.
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(ApiError::rollback("an abnormal rollback occurred"));
    /// ```
    pub fn rollback(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Create a 500 Internal Server Error from a database error
    ///
    /// The database error details are logged but NOT sent to the user.
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// Create a 500 Internal Server Error with optional details
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// Create a custom error with specific status code
    pub fn custom(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Custom {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } | Self::Rejected { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Custom { status, .. } => *status,
        }
    }

    /// User-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource } => format!("{resource} not found"),
            Self::BadRequest { message }
            | Self::Conflict { message }
            | Self::Rejected { message }
            | Self::Database { message, .. }
            | Self::Internal { message, .. }
            | Self::Custom { message, .. } => message.clone(),
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let message = self.user_message();
        (status, Json(Failure::new(&message))).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Convert `SeaORM` `DbErr` to `ApiError`
///
/// - `DbErr::RecordNotFound` → 404 Not Found
/// - unique constraint violations → 409 Conflict
/// - everything else → 500, logged internally and sanitized for users
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        if let DbErr::RecordNotFound(msg) = &err {
            let resource = msg.split_whitespace().next().unwrap_or("Resource");
            return Self::not_found(resource);
        }
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::debug!(detail = %detail, "Unique constraint violated");
            return Self::conflict("Duplicate record");
        }
        Self::database(err)
    }
}
