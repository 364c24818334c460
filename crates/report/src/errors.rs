use thiserror::Error;

/// Error types that can occur while configuring an error-reporting hook.
///
/// A reporter returns one of these from [`crate::Reporter::configure`] when it
/// refuses the configuration it was handed.
#[derive(Debug, Error)]
pub enum Error {
    /// The hook configuration carried no API key.
    #[error("api key is required")]
    MissingApiKey,

    /// The API key is not 32 hexadecimal characters.
    #[error("api key must be 32 hexadecimal characters, got {0:?}")]
    InvalidApiKey(String),

    /// A general error raised by a custom reporter implementation.
    #[error("error {0}")]
    Other(#[from] anyhow::Error),
}
