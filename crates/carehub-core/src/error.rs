//! The error type shared by every CareHub crate.
//!
//! Repositories, services and the auth crate all return [`AppError`]; the
//! API crate turns its [`ErrorKind`] into an HTTP status and a response body.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxedCause = Box<dyn StdError + Send + Sync>;

/// Failure categories. Each maps to one machine-readable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    /// Missing, malformed or expired credentials.
    Authentication,
    /// Authenticated, but lacking the authority or hospital context.
    Authorization,
    Validation,
    /// Duplicate record or a state transition the record does not allow.
    Conflict,
    Internal,
    Database,
    Configuration,
    Serialization,
    /// A collaborator outside the process, such as the mail relay.
    ExternalService,
    ServiceUnavailable,
}

impl ErrorKind {
    /// Value of the `error` field in response bodies.
    pub fn code(&self) -> &'static str {
        use ErrorKind::*;
        match self {
            NotFound => "NOT_FOUND",
            Authentication => "UNAUTHORIZED",
            Authorization => "FORBIDDEN",
            Validation => "VALIDATION_ERROR",
            Conflict => "CONFLICT",
            Internal => "INTERNAL_ERROR",
            Database => "DATABASE_ERROR",
            Configuration => "CONFIGURATION_ERROR",
            Serialization => "SERIALIZATION_ERROR",
            ExternalService => "EXTERNAL_SERVICE_ERROR",
            ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A categorized failure with a caller-facing message.
///
/// The optional cause is kept for logging only and never reaches a client.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<BoxedCause>,
}

macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )*
    };
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the lower-level error that caused this one.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(kind, message)
        }
    }

    kind_constructors! {
        not_found => NotFound;
        /// 401: the caller could not be identified.
        authentication => Authentication;
        /// 403: the caller is known but may not do this.
        authorization => Authorization;
        validation => Validation;
        /// 409: duplicates and illegal status changes.
        conflict => Conflict;
        internal => Internal;
        database => Database;
        configuration => Configuration;
        external_service => ExternalService;
        service_unavailable => ServiceUnavailable;
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl Clone for AppError {
    /// The cause is not `Clone`; copies carry kind and message only.
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let message = format!("Malformed JSON: {err}");
        Self::with_source(ErrorKind::Serialization, message, err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let message = format!("I/O failure: {err}");
        Self::with_source(ErrorKind::Internal, message, err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        let message = format!("Invalid configuration: {err}");
        Self::with_source(ErrorKind::Configuration, message, err)
    }
}
