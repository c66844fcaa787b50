//! Engine-wide error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by engine components.
///
/// Every variant describes either a broken asset pipeline or a composition
/// mistake. Per-frame operations never produce these; they surface while
/// resources load or while featurables are prepared.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A resource could not be read from disk.
    #[error("failed to read resource {}: {source}", path.display())]
    Io {
        /// Location that was being read.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: std::io::Error,
    },
    /// A resource could not be decoded as an image.
    #[error("failed to decode image {}: {source}", path.display())]
    Image {
        /// Location of the image resource.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },
    /// A resource was syntactically malformed.
    #[error("malformed resource {resource}: {message}")]
    Parse {
        /// Logical name of the resource.
        resource: String,
        /// Description of the problem.
        message: String,
    },
    /// A resource parsed but carried values the engine cannot accept.
    #[error("invalid configuration in {resource}: {message}")]
    InvalidConfig {
        /// Logical name of the resource.
        resource: String,
        /// Description of the problem.
        message: String,
    },
    /// A service was requested from a registry that never received it.
    #[error("service {0} is not registered")]
    MissingService(&'static str),
    /// A featurable received two features of the same capability.
    #[error("feature {0} is already registered")]
    DuplicateFeature(&'static str),
    /// A featurable lacks a capability another feature depends on.
    #[error("featurable {featurable} is missing required feature {feature}")]
    MissingFeature {
        /// Numeric identifier of the featurable.
        featurable: u32,
        /// Type name of the missing feature.
        feature: &'static str,
    },
    /// A factory tag was requested that nobody registered.
    #[error("no factory registered for {0}")]
    UnknownFactory(String),
}

impl EngineError {
    /// Builds a [`EngineError::Parse`] for the named resource.
    #[must_use]
    pub fn parse(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Builds a [`EngineError::InvalidConfig`] for the named resource.
    #[must_use]
    pub fn invalid(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            resource: resource.into(),
            message: message.into(),
        }
    }
}

/// Result alias used across the engine crates.
pub type Result<T> = std::result::Result<T, EngineError>;
