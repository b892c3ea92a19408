//! Temporary on-disk copies of uploads
//!
//! The transcription client needs a file handle, so every accepted upload
//! is written to its own temporary file first. The file lives exactly as
//! long as the [`StagedUpload`] value: dropping it on any path, including
//! cancellation of the request future, removes the file. Removal errors
//! are ignored.

use std::path::Path;

use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

const PREFIX: &str = "voxrelay-";

/// An upload written to a uniquely named temporary file
#[derive(Debug)]
pub struct StagedUpload {
    path: TempPath,
    len: u64,
}

impl StagedUpload {
    /// Write `bytes` in full to a new temporary file
    ///
    /// The file is created in `dir`, or the OS temp dir when `None`. Writes
    /// go through the handle returned by the exclusive create, never
    /// through the path, so a cancelled write cannot recreate a removed file.
    pub async fn write(dir: Option<&Path>, suffix: &str, bytes: &[u8]) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX).suffix(suffix);

        let named = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        let (file, path) = named.into_parts();

        let mut file = tokio::fs::File::from_std(file);
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "upload staged");

        Ok(Self {
            path,
            len: bytes.len() as u64,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name component, used as the upload name towards the provider
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned())
    }

    /// Number of bytes staged
    pub const fn len(&self) -> u64 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Open a fresh read handle on the staged file
    pub async fn open(&self) -> std::io::Result<tokio::fs::File> {
        tokio::fs::File::open(&self.path).await
    }

    /// Remove the file now instead of at drop
    pub fn discard(self) {
        let path = self.path.to_path_buf();
        if let Err(e) = self.path.close() {
            tracing::debug!(path = %path.display(), "ignoring staged file removal error: {e}");
        }
    }
}
