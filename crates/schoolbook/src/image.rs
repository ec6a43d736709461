//! Image selection and data-URL previews.
//!
//! Selecting a file starts a background read on the Tokio runtime. Each
//! selection bumps a generation counter, and a finished read is only
//! installed if its generation is still current, so the latest selection
//! always wins. The add-school form awaits [`ImagePreview::settle`] before
//! building a record, which closes the window where a submission could race
//! an in-flight read.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default upper bound on an uploaded image, in bytes.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Map a file extension to an image mime type.
#[must_use]
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}

/// Encode bytes as a `data:` URL.
#[must_use]
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Read an image file and encode it as a data-URL.
///
/// # Errors
///
/// Returns an error if the extension is not a known image type, the file
/// exceeds `max_bytes`, or the file cannot be read.
pub async fn read_data_url(path: PathBuf, max_bytes: u64) -> Result<String> {
    let mime = mime_for_path(&path).ok_or_else(|| Error::UnsupportedImage { path: path.clone() })?;

    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| Error::image_read(&path, e.to_string()))?;
    if !metadata.is_file() {
        return Err(Error::image_read(&path, "not a regular file"));
    }
    if metadata.len() > max_bytes {
        return Err(Error::ImageTooLarge {
            path,
            size: metadata.len(),
            limit: max_bytes,
        });
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| Error::image_read(&path, e.to_string()))?;
    debug!(path = %path.display(), bytes = bytes.len(), mime, "Read image");
    Ok(encode_data_url(mime, &bytes))
}

#[derive(Debug)]
struct PendingRead {
    generation: u64,
    path: PathBuf,
    handle: JoinHandle<Result<String>>,
}

/// Preview state for the form's image field.
#[derive(Debug)]
pub struct ImagePreview {
    max_bytes: u64,
    generation: u64,
    pending: Option<PendingRead>,
    data_url: Option<String>,
    last_error: Option<String>,
}

impl Default for ImagePreview {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGE_BYTES)
    }
}

impl ImagePreview {
    /// Create an empty preview that accepts images up to `max_bytes`.
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            generation: 0,
            pending: None,
            data_url: None,
            last_error: None,
        }
    }

    /// Start reading `path` in the background.
    ///
    /// Any read still in flight is abandoned. The current preview stays
    /// visible until the new read completes.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn select(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.generation += 1;
        if let Some(stale) = self.pending.take() {
            debug!(path = %stale.path.display(), "Abandoning superseded image read");
            stale.handle.abort();
        }

        debug!(path = %path.display(), generation = self.generation, "Reading image");
        let handle = tokio::spawn(read_data_url(path.clone(), self.max_bytes));
        self.pending = Some(PendingRead {
            generation: self.generation,
            path,
            handle,
        });
    }

    /// Whether a read is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The current preview, if any.
    #[must_use]
    pub fn data_url(&self) -> Option<&str> {
        self.data_url.as_deref()
    }

    /// Message from the most recent failed read.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Wait for any in-flight read and install its result.
    ///
    /// A failed read clears the preview and records the error.
    pub async fn settle(&mut self) -> Option<&str> {
        if let Some(pending) = self.pending.take() {
            let outcome = pending.handle.await;
            if pending.generation != self.generation {
                debug!(generation = pending.generation, "Discarding stale image read");
            } else {
                match outcome {
                    Ok(Ok(url)) => {
                        self.data_url = Some(url);
                        self.last_error = None;
                    }
                    Ok(Err(e)) => {
                        warn!(path = %pending.path.display(), error = %e, "Image read failed");
                        self.data_url = None;
                        self.last_error = Some(e.to_string());
                    }
                    Err(e) => {
                        warn!(path = %pending.path.display(), error = %e, "Image read task failed");
                        self.data_url = None;
                        self.last_error = Some(e.to_string());
                    }
                }
            }
        }
        self.data_url.as_deref()
    }

    /// Drop the preview and abandon any in-flight read.
    pub fn clear(&mut self) {
        self.generation += 1;
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
        self.data_url = None;
        self.last_error = None;
    }
}
