use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Message returned to callers when a required image is missing.
pub const MISSING_INPUT_MESSAGE: &str = "Envie os arquivos 'human' e 'garment'";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{}", MISSING_INPUT_MESSAGE)]
    MissingInput,

    #[error("Unexpected result format: {0}")]
    UnexpectedResultShape(String),

    /// Failure reported by, or while talking to, the remote inference
    /// provider. Displays the underlying message unchanged.
    #[error("{0}")]
    Remote(String),

    #[error("Invalid multipart request: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    pub fn unexpected_shape(msg: impl Into<String>) -> Self {
        Self::UnexpectedResultShape(msg.into())
    }

    /// True for errors caused by the caller's request rather than the relay.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingInput)
    }
}
