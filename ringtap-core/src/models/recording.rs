use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Metadata describing an exported recording.
///
/// Serializable for the JSON sidecar written next to the raw dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub created_at: String,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Frames present in the export.
    pub frames: u64,
    /// Frames dropped at the ring buffer under overrun.
    pub dropped_frames: u64,
    /// SHA-256 hex digest of the exported file.
    pub checksum: String,
    pub file_path: String,
}

impl RecordingMetadata {
    pub fn new(
        duration_secs: f64,
        sample_rate: u32,
        channels: u16,
        frames: u64,
        dropped_frames: u64,
        checksum: &str,
        file_path: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            duration_secs,
            sample_rate,
            channels,
            frames,
            dropped_frames,
            checksum: checksum.to_string(),
            file_path: file_path.to_string(),
        }
    }
}

/// Result of a successful path export.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSummary {
    pub file_path: PathBuf,
    pub bytes_written: u64,
    pub metadata: RecordingMetadata,
}
