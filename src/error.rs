// src/error.rs

//! Unified error handling for the publisher.

use std::fmt;

use thiserror::Error;

/// Result type alias for publisher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Sitemap serialization failed
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::errors::serialize::SeError),

    /// Sitemap could not be read back
    #[error("XML parse error: {0}")]
    XmlRead(#[from] quick_xml::errors::serialize::DeError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error (missing template, bad config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote page could not be fetched or was unusable
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error with the offending URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

/// Why a single extracted field came back empty.
///
/// Field-level failures never abort a crawl; callers fall back to an empty
/// string but can still tell "absent" apart from "present but unparseable".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The element or value was not there at all
    #[error("{field} is missing")]
    Missing { field: &'static str },

    /// The value was there but did not have the expected shape
    #[error("{field} is malformed: {value:?}")]
    Malformed { field: &'static str, value: String },
}

impl FieldError {
    pub fn missing(field: &'static str) -> Self {
        Self::Missing { field }
    }

    pub fn malformed(field: &'static str, value: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            value: value.into(),
        }
    }
}
