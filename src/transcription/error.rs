use std::path::PathBuf;

/// Everything that can end a transcription attempt.
#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("audio file not found: {}", path.display())]
    AudioNotFound { path: PathBuf },

    #[error("failed to read audio file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("API key is empty")]
    EmptyCredential,

    #[error("{0}")]
    UnsupportedOption(String),

    #[error("{0}")]
    Network(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("failed to parse API response: {0}")]
    MalformedResponse(String),

    #[error("no transcription text in API response")]
    MissingText,
}

impl TranscribeError {
    /// True for failures raised before any request left the machine.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            TranscribeError::AudioNotFound { .. }
                | TranscribeError::Io { .. }
                | TranscribeError::EmptyCredential
                | TranscribeError::UnsupportedOption(_)
        )
    }
}
