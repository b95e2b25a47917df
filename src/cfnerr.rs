//! Classified handler failures.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CloudFormation handler error codes, serialized by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerErrorCode {
    NotUpdatable,
    InvalidRequest,
    AccessDenied,
    InvalidCredentials,
    AlreadyExists,
    NotFound,
    ResourceConflict,
    Throttling,
    ServiceLimitExceeded,
    NotStabilized,
    GeneralServiceException,
    ServiceInternalError,
    NetworkFailure,
    #[default]
    InternalFailure,
    InvalidTypeConfiguration,
    HandlerInternalFailure,
    NonCompliant,
    Unknown,
    UnsupportedTarget,
}

impl HandlerErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotUpdatable => "NotUpdatable",
            Self::InvalidRequest => "InvalidRequest",
            Self::AccessDenied => "AccessDenied",
            Self::InvalidCredentials => "InvalidCredentials",
            Self::AlreadyExists => "AlreadyExists",
            Self::NotFound => "NotFound",
            Self::ResourceConflict => "ResourceConflict",
            Self::Throttling => "Throttling",
            Self::ServiceLimitExceeded => "ServiceLimitExceeded",
            Self::NotStabilized => "NotStabilized",
            Self::GeneralServiceException => "GeneralServiceException",
            Self::ServiceInternalError => "ServiceInternalError",
            Self::NetworkFailure => "NetworkFailure",
            Self::InternalFailure => "InternalFailure",
            Self::InvalidTypeConfiguration => "InvalidTypeConfiguration",
            Self::HandlerInternalFailure => "HandlerInternalFailure",
            Self::NonCompliant => "NonCompliant",
            Self::Unknown => "Unknown",
            Self::UnsupportedTarget => "UnsupportedTarget",
        }
    }
}

impl fmt::Display for HandlerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error that carries the code reported back to CloudFormation.
#[derive(Error, Debug)]
#[error("{code}: {message}")]
pub struct HandlerError {
    code: HandlerErrorCode,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl HandlerError {
    pub fn new(code: HandlerErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), source: None }
    }

    /// Classify `source`; its text becomes the message.
    pub fn wrap(code: HandlerErrorCode, source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self { code, message: source.to_string(), source: Some(source) }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(HandlerErrorCode::InternalFailure, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(HandlerErrorCode::InvalidRequest, message)
    }

    pub fn code(&self) -> HandlerErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The first classified error in `err`'s chain.
    pub fn find(err: &anyhow::Error) -> Option<&HandlerError> {
        err.chain().find_map(|cause| cause.downcast_ref::<HandlerError>())
    }
}
