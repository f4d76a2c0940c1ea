//! Portrait handling: image sniffing, `data:` URL encoding and the choice between
//! inline and blob-stored portraits.

use crate::core::{Result, TrackerError};
use crate::storage::{BlobRef, BlobStore};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use std::sync::Arc;
use tracing::warn;

/// Detects the image type from magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") && bytes.len() > 14 {
        Some("image/bmp")
    } else {
        None
    }
}

/// Encodes image bytes as a `data:` URL. Non-image input yields `None`.
pub fn encode_data_url(bytes: &[u8]) -> Option<String> {
    let mime = sniff_mime(bytes)?;
    Some(format!("data:{};base64,{}", mime, B64.encode(bytes)))
}

/// Splits a base64 `data:` URL into its mime type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| TrackerError::validation("portrait is not a data URL"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| TrackerError::validation("data URL has no payload"))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| TrackerError::validation("data URL is not base64 encoded"))?;
    let bytes = B64
        .decode(payload)
        .map_err(|e| TrackerError::validation(format!("invalid base64 payload: {e}")))?;
    Ok((mime.to_string(), bytes))
}

/// Where accepted portraits end up.
#[derive(Clone)]
pub enum PortraitSink {
    /// Embed the image in the record as a `data:` URL.
    Inline,
    /// Store the bytes in a blob store and keep only the reference.
    Blob(Arc<dyn BlobStore>),
}

impl PortraitSink {
    /// Turns uploaded bytes into the reference to attach to a record.
    ///
    /// Returns `Ok(None)` when the bytes are not an image; the caller attaches
    /// nothing and carries on with the rest of the edit.
    pub async fn prepare(&self, bytes: Vec<u8>) -> Result<Option<String>> {
        let Some(mime) = sniff_mime(&bytes) else {
            warn!(len = bytes.len(), "upload is not a recognised image, skipping portrait");
            return Ok(None);
        };

        match self {
            PortraitSink::Inline => Ok(encode_data_url(&bytes)),
            PortraitSink::Blob(store) => {
                let reference = store.store(bytes).await?;
                tracing::debug!(%reference, mime, "portrait stored as blob");
                Ok(Some(reference.to_string()))
            }
        }
    }

    /// Resolves a stored reference back to `(mime, bytes)` for display.
    ///
    /// Anything that is neither a blob reference nor a readable `data:` URL (an
    /// external link, say) is reported as `NotFound`.
    pub async fn resolve(&self, reference: &str) -> Result<(String, Vec<u8>)> {
        if BlobRef::is_blob_reference(reference) {
            let PortraitSink::Blob(store) = self else {
                return Err(TrackerError::not_found(reference));
            };
            let bytes = store.fetch(reference.parse()?).await?;
            let mime = sniff_mime(&bytes).unwrap_or("application/octet-stream");
            return Ok((mime.to_string(), bytes));
        }
        decode_data_url(reference).map_err(|err| {
            warn!(error = %err, "portrait reference cannot be served");
            TrackerError::not_found(format!("portrait '{}'", preview(reference)))
        })
    }
}

fn preview(reference: &str) -> String {
    reference.chars().take(32).collect()
}

impl std::fmt::Debug for PortraitSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortraitSink::Inline => f.write_str("Inline"),
            PortraitSink::Blob(_) => f.write_str("Blob"),
        }
    }
}
