//! Read and write access to the configuration document
//!
//! Every call goes to disk; nothing is cached besides the resolved path.
//! No lock is taken around file access, so concurrent saves are
//! last-writer-wins and a read racing a truncating save may see partial
//! content.

use crate::error::ApiError;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use windsp_config::{ConfigLocator, WriteMode};

pub const JSON_CONTENT_TYPE: &str = "application/json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Raw bytes of the configuration document, tagged as JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    bytes: Bytes,
}

impl ConfigDocument {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl IntoResponse for ConfigDocument {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], self.bytes).into_response()
    }
}

/// Read and write operations over the located document
#[derive(Debug, Clone)]
pub struct ConfigEndpoint {
    locator: Arc<ConfigLocator>,
    write_mode: WriteMode,
}

impl ConfigEndpoint {
    pub fn new(locator: Arc<ConfigLocator>, write_mode: WriteMode) -> Self {
        Self {
            locator,
            write_mode,
        }
    }

    pub fn locator(&self) -> &ConfigLocator {
        &self.locator
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Read the whole document
    pub async fn read(&self) -> Result<ConfigDocument, ApiError> {
        let location = self.locator.resolve()?;
        let bytes = tokio::fs::read(location.path())
            .await
            .map_err(|e| ApiError::io(location.path(), e))?;

        debug!("Read {} bytes from {}", bytes.len(), location.display());
        Ok(ConfigDocument::new(bytes))
    }

    /// Replace the whole document with `content`
    pub async fn write(&self, content: &[u8]) -> Result<(), ApiError> {
        let location = self.locator.resolve()?;
        let path = location.path();

        let result = match self.write_mode {
            WriteMode::Truncate => overwrite(path, content).await,
            WriteMode::Atomic => replace_atomically(path, content).await,
        };
        result.map_err(|e| ApiError::io(path, e))?;

        info!("Saved {} bytes to {}", content.len(), location.display());
        Ok(())
    }
}

/// Truncate `path` and write `content`. A failure partway leaves whatever the
/// filesystem kept.
async fn overwrite(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let file = tokio::fs::File::create(path).await?;
    write_and_release(file, content).await
}

/// Write a sibling temp file and rename it over the document. Symlinks are
/// followed so the rename lands on the real file and the link is kept.
async fn replace_atomically(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let target = match tokio::fs::canonicalize(path).await {
        Ok(target) => target,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e),
    };
    let temp = temp_path_for(&target);

    let result = async {
        let file = tokio::fs::File::create(&temp).await?;
        write_and_release(file, content).await?;
        tokio::fs::rename(&temp, &target).await
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&temp).await;
    }
    result
}

/// Write everything and flush. The writer is owned so it is dropped, and the
/// handle closed, on success and on every error path.
async fn write_and_release<W>(mut writer: W, content: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(content).await?;
    writer.flush().await?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
}
