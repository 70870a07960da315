/*!
 * Error types for the vttlate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// Whether the response arrived but could not be used
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }
}

/// Errors that can occur during translation of one document
///
/// None of these escape the pipeline; they are recorded in the outcome
/// and logged, and the affected lines keep their source text.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Network error, timeout or non-success response from the translation service
    #[error("Translation unavailable: {0}")]
    Unavailable(#[source] ProviderError),

    /// Response body did not have the expected shape
    #[error("Malformed translation response: {0}")]
    MalformedResponse(String),

    /// Response had a different number of entries than the request
    #[error("Translation count mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Number of lines sent
        expected: usize,
        /// Number of translations received
        actual: usize,
    },
}

impl From<ProviderError> for TranslationError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::ParseError(message) => Self::MalformedResponse(message),
            other => Self::Unavailable(other),
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// The raw subtitle document could not be obtained
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        Self::Fetch(error.to_string())
    }
}
