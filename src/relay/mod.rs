mod output;
mod staging;

pub use output::{DATA_URI_PREFIX, OutputImage, encode_png};
pub use staging::StagedImage;

use crate::{
    Error, Result,
    gradio::{RemoteResult, RemoteValue, TryOnClient, TryOnRequest},
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_DESCRIPTION: &str = "T-shirt";

/// Fields of a try-on submission as received from the caller.
#[derive(Debug, Clone, Default)]
pub struct TryOnInput {
    pub human: Option<Vec<u8>>,
    pub garment: Option<Vec<u8>>,
    pub description: Option<String>,
}

/// The remote result reduced to the shape returned to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub output: String,
    pub masked: Value,
}

/// Stages uploads, calls the remote model and normalizes its answer.
/// One instance is shared by all request handlers.
pub struct Relay {
    client: Arc<dyn TryOnClient>,
    staging_dir: PathBuf,
}

impl Relay {
    pub fn new(client: Arc<dyn TryOnClient>, staging_dir: Option<PathBuf>) -> Result<Self> {
        let staging_dir = match staging_dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                dir
            }
            None => std::env::temp_dir(),
        };

        Ok(Self {
            client,
            staging_dir,
        })
    }

    pub fn staging_dir(&self) -> &std::path::Path {
        &self.staging_dir
    }

    pub async fn try_on(&self, input: TryOnInput) -> Result<NormalizedResult> {
        let (human, garment) = match (input.human, input.garment) {
            (Some(human), Some(garment)) => (human, garment),
            _ => return Err(Error::MissingInput),
        };
        let description = input
            .description
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        info!("Processing try-on request for garment: {}", description);

        let mut human_file = StagedImage::stage(&self.staging_dir, &human).await?;
        let mut garment_file = StagedImage::stage(&self.staging_dir, &garment).await?;

        debug!(
            "Staged human ({} bytes) and garment ({} bytes)",
            human_file.size_bytes(),
            garment_file.size_bytes()
        );

        let request = TryOnRequest::new(human_file.path(), garment_file.path(), description);
        let result = self.client.try_on(request).await;

        human_file.cleanup();
        garment_file.cleanup();

        normalize(result?).await
    }
}

/// Converts the first result element to a data URI and passes the second
/// through as `masked`.
pub async fn normalize(result: RemoteResult) -> Result<NormalizedResult> {
    let mut values = result.into_iter();

    let first = values
        .next()
        .ok_or_else(|| Error::unexpected_shape("remote result is empty"))?;
    debug!("Remote output is a {}", first.kind());

    let output = OutputImage::classify(first).await?.into_data_uri().await?;
    let masked = values.next().map(RemoteValue::into_json).unwrap_or(Value::Null);

    Ok(NormalizedResult { output, masked })
}
