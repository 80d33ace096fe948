use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    /// An error occurred while making an HTTP request.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Only http and https transfers are supported.
    #[error("Unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    /// Failed to create or write the destination file.
    #[error("File system error: {0}")]
    FileSystem(#[from] io::Error),

    /// General error for unexpected scenarios.
    #[error("Unexpected error: {0}")]
    General(String),
}

impl DownloadError {
    /// Create a `DownloadError::General` with a custom message.
    pub fn general(msg: impl Into<String>) -> Self {
        DownloadError::General(msg.into())
    }
}
