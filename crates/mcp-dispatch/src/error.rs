//! Error taxonomy for registration, validation, and dispatch.

use crate::schema::SchemaType;
use crate::types::Category;

/// Structural mismatch between a request's arguments and a declared schema.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing required argument `{path}`")]
    MissingRequired { path: String },

    #[error("argument `{path}` must be of type {expected}, got {found}")]
    TypeMismatch {
        path: String,
        expected: SchemaType,
        found: &'static str,
    },

    #[error("argument `{path}` must be one of {allowed}")]
    NotAllowedEnum { path: String, allowed: String },

    #[error("unexpected argument `{path}`")]
    UnexpectedProperty { path: String },
}

impl ValidationError {
    /// Dotted path of the offending argument (`arguments` for the root).
    pub fn path(&self) -> &str {
        match self {
            ValidationError::MissingRequired { path }
            | ValidationError::TypeMismatch { path, .. }
            | ValidationError::NotAllowedEnum { path, .. }
            | ValidationError::UnexpectedProperty { path } => path,
        }
    }
}

/// Failure reported by a handler body.
#[derive(thiserror::Error, Debug, Clone)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        HandlerError::InvalidArguments(e.to_string())
    }
}

/// Every failure the dispatcher can report. None of these end a session.
#[derive(thiserror::Error, Debug, Clone)]
pub enum DispatchError {
    #[error("unknown capability `{0}`")]
    UnknownCapability(String),

    #[error("invalid arguments: {0}")]
    Validation(#[from] ValidationError),

    #[error("handler failed: {0}")]
    HandlerFailure(String),

    #[error("server not initialized: send `initialize` first")]
    NotInitialized,

    #[error("resource not found: {0}")]
    ResourceNotFound(String),
}

/// Discriminant of a [`DispatchError`], kept on error envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownCapability,
    Validation,
    HandlerFailure,
    NotInitialized,
    ResourceNotFound,
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnknownCapability(_) => ErrorKind::UnknownCapability,
            DispatchError::Validation(_) => ErrorKind::Validation,
            DispatchError::HandlerFailure(_) => ErrorKind::HandlerFailure,
            DispatchError::NotInitialized => ErrorKind::NotInitialized,
            DispatchError::ResourceNotFound(_) => ErrorKind::ResourceNotFound,
        }
    }
}

impl From<HandlerError> for DispatchError {
    fn from(e: HandlerError) -> Self {
        DispatchError::HandlerFailure(e.to_string())
    }
}

/// Construction-time errors. These are fatal: a server never starts with them.
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("duplicate {category} `{name}`")]
    Duplicate { category: Category, name: String },

    #[error("{category} `{name}` has no handler")]
    MissingHandler { category: Category, name: String },

    #[error("handler for {category} `{name}` has no descriptor")]
    MissingDescriptor { category: Category, name: String },

    #[error("invalid schema for {category} `{name}`: {reason}")]
    InvalidSchema {
        category: Category,
        name: String,
        reason: String,
    },
}

/// Convenience result type.
pub type DispatchResult<T> = Result<T, DispatchError>;
