use std::fs;
use std::path::Path;

use crate::models::error::CaptureError;
use crate::models::recording::RecordingMetadata;

/// Write recording metadata as a JSON sidecar file.
///
/// Creates `{recording_path}.metadata.json` alongside the raw dump.
pub fn write_metadata(
    metadata: &RecordingMetadata,
    recording_path: &Path,
) -> Result<(), CaptureError> {
    let metadata_path = sidecar_path(recording_path);
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| CaptureError::Io(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&metadata_path, json)
        .map_err(|e| CaptureError::Io(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read recording metadata from a JSON sidecar file.
pub fn read_metadata(recording_path: &Path) -> Result<RecordingMetadata, CaptureError> {
    let metadata_path = sidecar_path(recording_path);
    let json = fs::read_to_string(&metadata_path)
        .map_err(|e| CaptureError::Io(format!("failed to read metadata: {}", e)))?;
    let metadata: RecordingMetadata = serde_json::from_str(&json)
        .map_err(|e| CaptureError::Io(format!("failed to parse metadata: {}", e)))?;
    Ok(metadata)
}

fn sidecar_path(recording_path: &Path) -> std::path::PathBuf {
    let mut name = recording_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".metadata.json");
    recording_path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_keeps_original_extension() {
        let path = sidecar_path(Path::new("/tmp/take1.raw"));
        assert_eq!(path, Path::new("/tmp/take1.raw.metadata.json"));
    }

    #[test]
    fn roundtrip() {
        let dir = std::env::temp_dir().join(format!("ringtap-meta-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let recording = dir.join("take.raw");

        let metadata = RecordingMetadata::new(1.5, 44100, 2, 66150, 0, "abc123", "take.raw");
        write_metadata(&metadata, &recording).unwrap();
        let back = read_metadata(&recording).unwrap();
        assert_eq!(back, metadata);

        fs::remove_dir_all(&dir).unwrap();
    }
}
