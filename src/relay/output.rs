use crate::{Error, Result, gradio::RemoteValue};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::path::PathBuf;

pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// The composite image in one of the representations the remote model
/// may return.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputImage {
    LocalFile(PathBuf),
    Encoded(String),
    Bytes(Vec<u8>),
}

impl OutputImage {
    /// A string naming an existing file is treated as a file reference;
    /// any other string is already-encoded content.
    pub async fn classify(value: RemoteValue) -> Result<Self> {
        match value {
            RemoteValue::Text(s) => {
                if is_local_file(&s).await {
                    Ok(Self::LocalFile(PathBuf::from(s)))
                } else {
                    Ok(Self::Encoded(s))
                }
            }
            RemoteValue::Bytes(bytes) => Ok(Self::Bytes(bytes)),
            other => Err(Error::unexpected_shape(format!(
                "expected a file path, string or bytes, got {}",
                other.kind()
            ))),
        }
    }

    pub async fn into_data_uri(self) -> Result<String> {
        match self {
            Self::LocalFile(path) => {
                let bytes = tokio::fs::read(&path).await?;
                Ok(encode_png(&bytes))
            }
            Self::Encoded(s) if s.starts_with("data:") => Ok(s),
            Self::Encoded(s) => Ok(format!("{}{}", DATA_URI_PREFIX, s)),
            Self::Bytes(bytes) => Ok(encode_png(&bytes)),
        }
    }
}

async fn is_local_file(s: &str) -> bool {
    tokio::fs::metadata(s)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

pub fn encode_png(bytes: &[u8]) -> String {
    format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(bytes))
}
