//! Persisting transcripts next to their audio file.

use anyhow::anyhow;
use std::path::{Path, PathBuf};

use crate::transcription::ResponseFormat;

/// Sibling path of `audio_path` with the extension swapped for the format's.
///
/// `/tmp/audio/sample.mp3` becomes `/tmp/audio/sample.txt`.
pub fn output_path(audio_path: &Path, format: ResponseFormat) -> PathBuf {
    audio_path.with_extension(format.extension())
}

/// Writes `text` as UTF-8 next to the audio file, replacing any earlier result.
///
/// # Errors
/// - If the file cannot be created or written (permissions, disk full, bad path)
pub fn save_transcript(
    text: &str,
    audio_path: &Path,
    format: ResponseFormat,
) -> anyhow::Result<PathBuf> {
    let path = output_path(audio_path, format);
    std::fs::write(&path, text)
        .map_err(|e| anyhow!("Failed to write to file '{}': {e}", path.display()))?;
    tracing::debug!("Transcribed text written to file: {}", path.display());
    Ok(path)
}
