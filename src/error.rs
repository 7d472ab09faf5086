// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Errors raised by the network and bundle layers.
//!
//! None of these reach the user. Transport failures turn into empty result
//! sets, malformed bootstrap payloads turn into remote mode. The variants
//! exist so the degraded paths can log what actually went wrong.

use std::fmt;

/// Why an index bundle was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleError {
    /// Bundle declares a format version we don't understand.
    UnsupportedVersion { found: u32, supported: u32 },
    /// A document has an empty `uri`, so a hit could never link anywhere.
    MissingUri { position: usize },
    /// Two documents share the same `uri`.
    DuplicateUri { uri: String },
}

impl fmt::Display for BundleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleError::UnsupportedVersion { found, supported } => {
                write!(
                    f,
                    "bundle version {} is not supported (expected {})",
                    found, supported
                )
            }
            BundleError::MissingUri { position } => {
                write!(f, "document at position {} has no uri", position)
            }
            BundleError::DuplicateUri { uri } => {
                write!(f, "uri '{}' appears more than once", uri)
            }
        }
    }
}

impl std::error::Error for BundleError {}

/// Error type for everything that talks to the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The request never produced a response (DNS, TLS, reset, timeout).
    Transport { url: String, message: String },
    /// The server answered with a non-success status.
    Status { url: String, status: u16 },
    /// The response body was not the JSON shape we expected.
    Malformed { what: &'static str, message: String },
    /// The index bundle parsed but failed validation.
    InvalidBundle(BundleError),
    /// Configuration is unusable (e.g. blank access key).
    Config(String),
}

impl SearchError {
    pub fn malformed(what: &'static str, err: impl fmt::Display) -> Self {
        SearchError::Malformed {
            what,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Transport { url, message } => {
                write!(f, "request to {} failed: {}", url, message)
            }
            SearchError::Status { url, status } => {
                write!(f, "request to {} returned status {}", url, status)
            }
            SearchError::Malformed { what, message } => {
                write!(f, "malformed {}: {}", what, message)
            }
            SearchError::InvalidBundle(err) => write!(f, "invalid index bundle: {}", err),
            SearchError::Config(message) => write!(f, "invalid config: {}", message),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::InvalidBundle(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BundleError> for SearchError {
    fn from(err: BundleError) -> Self {
        SearchError::InvalidBundle(err)
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
