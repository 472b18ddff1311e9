/*!
 * Error types for the syncraft application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. The `Display` text of
 * the input errors is what a caller shows in place of a rendered script.
 */

use thiserror::Error;

/// Errors that can occur when working with the proofreading service APIs
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

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status into the matching variant
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Errors that can occur while parsing pasted script text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// No line of the input matches the time-range grammar
    #[error("Error: no convertible timecode was found in the input.")]
    NoTimecode,
}

/// Errors that can occur while reading an editor project file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectFileError {
    /// The document is not well-formed markup
    #[error("Error: failed to parse the XML file. The file is corrupted or not in the expected format. ({0})")]
    Malformed(String),

    /// The document parsed but carried no clip with decodable caption text
    #[error("Error: no usable caption data was found in the XML file.")]
    NoCaptions,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from script parsing
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Error from project file parsing
    #[error("Project file error: {0}")]
    ProjectFile(#[from] ProjectFileError),

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
