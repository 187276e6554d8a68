//! Reversible compression of text snapshots stored in page history.
//!
//! Blobs are LZ4 block-compressed with the uncompressed length prepended as a
//! little-endian `u32`, so `decode(encode(t)) == t` for every string `t`.

use crate::error::CoreError;

/// Upper bound on the decoded size of a single blob (64 MiB).
///
/// The prepended length is checked against this before allocating, so a
/// corrupted header cannot trigger a huge allocation.
pub const MAX_DECODED_LEN: usize = 64 * 1024 * 1024;

/// Compress `text` into a history blob.
pub fn encode(text: &str) -> Result<Vec<u8>, CoreError> {
    if text.len() > MAX_DECODED_LEN {
        return Err(CoreError::Codec(format!(
            "Text of {} bytes exceeds the {MAX_DECODED_LEN} byte snapshot limit",
            text.len()
        )));
    }
    Ok(lz4_flex::compress_prepend_size(text.as_bytes()))
}

/// Decompress a history blob back into text.
///
/// Fails with [`CoreError::Codec`] when the blob is truncated, corrupted, or
/// does not decode to valid UTF-8.
pub fn decode(blob: &[u8]) -> Result<String, CoreError> {
    let header: [u8; 4] = blob
        .get(..4)
        .and_then(|h| h.try_into().ok())
        .ok_or_else(|| CoreError::Codec("Blob is shorter than its length header".into()))?;
    let declared = u32::from_le_bytes(header) as usize;
    if declared > MAX_DECODED_LEN {
        return Err(CoreError::Codec(format!(
            "Blob declares {declared} bytes, above the {MAX_DECODED_LEN} byte limit"
        )));
    }

    let bytes = lz4_flex::decompress_size_prepended(blob)
        .map_err(|e| CoreError::Codec(format!("Decompression failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| CoreError::Codec(format!("Invalid UTF-8: {e}")))
}
