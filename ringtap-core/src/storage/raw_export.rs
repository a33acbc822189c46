//! Raw sample export.
//!
//! Output format: for each frame, one sample per channel in channel
//! order (left, right), as little-endian f32 — no header, no metadata,
//! written in capture order. The layout is byte-exact so existing
//! consumers of the raw dump keep working.

use std::fs;
use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::models::error::CaptureError;
use crate::storage::block_store::BlockStore;

/// Serialize every block in the store, in order, to `sink`.
///
/// Writes exactly `filled` frames from the open tail block and full
/// capacity from every closed block. Returns the number of bytes
/// written. An empty store writes nothing and returns 0.
///
/// Streaming-write design: on failure, bytes already written are not
/// rolled back.
pub fn write_store<W: Write>(store: &BlockStore, sink: &mut W) -> Result<u64, CaptureError> {
    let mut written = 0u64;
    let mut scratch: Vec<u8> = Vec::new();

    for block in store.blocks() {
        let samples = block.samples();
        scratch.clear();
        scratch.reserve(samples.len() * 4);
        for &sample in samples {
            scratch.extend_from_slice(&sample.to_le_bytes());
        }
        sink.write_all(&scratch)
            .map_err(|e| CaptureError::Io(format!("write failed: {}", e)))?;
        written += scratch.len() as u64;
    }

    sink.flush()
        .map_err(|e| CaptureError::Io(format!("flush failed: {}", e)))?;
    Ok(written)
}

/// Compute the SHA-256 hex digest of a file.
pub fn sha256_file(path: &Path) -> Result<String, CaptureError> {
    let data = fs::read(path)
        .map_err(|e| CaptureError::Io(format!("failed to read file for checksum: {}", e)))?;
    let digest = Sha256::digest(&data);
    Ok(hex_encode(&digest))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::frame::Frame;

    #[test]
    fn empty_store_writes_nothing() {
        let store = BlockStore::new(4, 1);
        let mut out = Vec::new();
        let written = write_store(&store, &mut out).unwrap();
        assert_eq!(written, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn mono_dump_is_le_f32_in_order() {
        let mut store = BlockStore::new(4, 1);
        for i in 1..=5 {
            store.append(Frame::mono(i as f32));
        }

        let mut out = Vec::new();
        let written = write_store(&store, &mut out).unwrap();
        assert_eq!(written, 5 * 4);

        let mut expected = Vec::new();
        for i in 1..=5 {
            expected.extend_from_slice(&(i as f32).to_le_bytes());
        }
        assert_eq!(out, expected);
    }

    #[test]
    fn stereo_dump_interleaves_channels() {
        let mut store = BlockStore::new(2, 2);
        store.append(Frame::stereo(0.5, -0.5));
        store.append(Frame::stereo(0.25, -0.25));
        store.append(Frame::stereo(0.125, -0.125));

        let mut out = Vec::new();
        write_store(&store, &mut out).unwrap();

        let mut expected = Vec::new();
        for s in [0.5f32, -0.5, 0.25, -0.25, 0.125, -0.125] {
            expected.extend_from_slice(&s.to_le_bytes());
        }
        assert_eq!(out, expected);
    }

    #[test]
    fn hex_digest_shape() {
        let digest = hex_encode(&[0x00, 0xff, 0x10]);
        assert_eq!(digest, "00ff10");
    }
}
