use crate::Result;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{trace, warn};

/// An uploaded image written to a uniquely named `.jpg` file. The file is
/// removed by [`StagedImage::cleanup`] or, failing that, when dropped.
#[derive(Debug)]
pub struct StagedImage {
    path: PathBuf,
    guard: Option<TempPath>,
    size_bytes: usize,
}

impl StagedImage {
    pub async fn stage(dir: &Path, bytes: &[u8]) -> Result<Self> {
        let guard = tempfile::Builder::new()
            .prefix("tryon-")
            .suffix(".jpg")
            .tempfile_in(dir)?
            .into_temp_path();

        tokio::fs::write(&guard, bytes).await?;

        let path = guard.to_path_buf();
        trace!("Staged {} bytes at {}", bytes.len(), path.display());

        Ok(Self {
            path,
            guard: Some(guard),
            size_bytes: bytes.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Deletes the file. Safe to call more than once.
    pub fn cleanup(&mut self) {
        if let Some(guard) = self.guard.take() {
            if let Err(e) = guard.close() {
                warn!("Failed to remove staged file {}: {}", self.path.display(), e);
            }
        }
    }
}

impl Drop for StagedImage {
    fn drop(&mut self) {
        self.cleanup();
    }
}
