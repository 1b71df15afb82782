//! Run settings assembled from command-line flags and environment variables.
//!
//! Nothing is persisted: every run builds one [`Settings`] value and hands it
//! down the pipeline.

use std::path::PathBuf;
use std::time::Duration;

use crate::credentials::DEFAULT_KEY_FILE;
use crate::transcription::{
    ResponseFormat, Task, TranscriptionConfig, TranscriptionModel, DEFAULT_TIMEOUT,
};

/// Default overall request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT.as_secs();

/// Everything a single run needs.
#[derive(Debug, Clone)]
pub struct Settings {
    /// File holding the bearer token
    pub key_file: PathBuf,
    /// Options passed to the API client
    pub transcription: TranscriptionConfig,
}

impl Settings {
    pub fn new(
        key_file: PathBuf,
        model: TranscriptionModel,
        api_base: String,
        timeout_secs: u64,
        translate: bool,
        srt: bool,
    ) -> Self {
        Self {
            key_file,
            transcription: TranscriptionConfig {
                model,
                task: if translate { Task::Translate } else { Task::Transcribe },
                format: if srt { ResponseFormat::Srt } else { ResponseFormat::Json },
                api_base,
                timeout: Duration::from_secs(timeout_secs),
            },
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            transcription: TranscriptionConfig::default(),
        }
    }
}

/// Clap value parser for `--model`.
pub fn parse_model(s: &str) -> Result<TranscriptionModel, String> {
    TranscriptionModel::from_id(s).ok_or_else(|| {
        format!(
            "unknown model '{s}' (expected one of: {})",
            TranscriptionModel::available_ids().join(", ")
        )
    })
}
