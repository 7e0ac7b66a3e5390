// src/core/gzip.rs
use std::io::Read;

use flate2::read::MultiGzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, thiserror::Error)]
pub enum GzipError {
    #[error("Malformed gzip stream: {0}")]
    MalformedGzipStream(String),
}

/// Inflate a gzip payload. Concatenated members are inflated back to back.
/// Anything that does not start with a gzip header is rejected rather than
/// passed through.
pub fn decompress_gzip(bytes: &[u8]) -> Result<Vec<u8>, GzipError> {
    if bytes.len() < GZIP_MAGIC.len() || bytes[..2] != GZIP_MAGIC {
        return Err(GzipError::MalformedGzipStream(format!(
            "missing gzip header ({} bytes)",
            bytes.len()
        )));
    }

    // Compressed CSV usually inflates 5-10x
    let mut out = Vec::with_capacity(bytes.len().saturating_mul(6));
    MultiGzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| GzipError::MalformedGzipStream(e.to_string()))?;
    Ok(out)
}
