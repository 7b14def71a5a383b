//! LZMA decompression of replay frame data
//!
//! The stream starts with the classic `.lzma` header: 5 bytes of codec
//! properties followed by the decompressed size as a little-endian u64.

use crate::error::{Error, Result};

use super::binary::ReplayField;

const PROPERTIES_LEN: usize = 5;
const HEADER_LEN: usize = PROPERTIES_LEN + 8;
/// Declared size meaning "read until the end-of-stream marker"
const UNKNOWN_SIZE: u64 = u64::MAX;

/// Decompress an LZMA stream, requiring exactly the declared output size
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < PROPERTIES_LEN {
        return Err(Error::TruncatedReplay {
            field: ReplayField::RawData,
            needed: PROPERTIES_LEN,
            remaining: data.len(),
        });
    }

    let declared = declared_size(data);
    let mut input = data;
    let mut output = Vec::new();
    lzma_rs::lzma_decompress(&mut input, &mut output).map_err(|e| Error::InvalidReplayField {
        field: ReplayField::RawData,
        message: format!("LZMA decompression failed: {}", e),
    })?;

    if let Some(expected) = declared {
        if expected != UNKNOWN_SIZE && output.len() as u64 != expected {
            return Err(Error::InvalidReplayField {
                field: ReplayField::RawData,
                message: format!(
                    "LZMA stream declared {} bytes but produced {}",
                    expected,
                    output.len()
                ),
            });
        }
    }

    tracing::trace!(
        "Decompressed {} bytes of frame data into {} bytes",
        data.len(),
        output.len()
    );
    Ok(output)
}

fn declared_size(data: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = data.get(PROPERTIES_LEN..HEADER_LEN)?.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}

/// Compress `text` with its size written to the header
#[cfg(test)]
pub(crate) fn compress(text: &[u8]) -> Vec<u8> {
    let mut input = text;
    let mut output = Vec::new();
    let options = lzma_rs::compress::Options {
        unpacked_size: lzma_rs::compress::UnpackedSize::WriteToHeader(Some(text.len() as u64)),
    };
    lzma_rs::lzma_compress_with_options(&mut input, &mut output, &options).unwrap();
    output
}
