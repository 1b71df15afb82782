//! Transcription model definitions and request options.
//!
//! Defines the OpenAI speech-to-text models this tool can drive, together with
//! the task (transcribe or translate) and the response format to ask for.

/// Represents a supported transcription model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranscriptionModel {
    /// OpenAI Whisper model
    #[default]
    Whisper1,
    /// OpenAI GPT-4o Transcribe model (best accuracy)
    Gpt4oTranscribe,
    /// OpenAI GPT-4o Mini Transcribe model (faster, lighter)
    Gpt4oMiniTranscribe,
}

impl TranscriptionModel {
    /// Returns the model identifier, which is also the name sent to the API
    pub fn id(&self) -> &'static str {
        match self {
            TranscriptionModel::Whisper1 => "whisper-1",
            TranscriptionModel::Gpt4oTranscribe => "gpt-4o-transcribe",
            TranscriptionModel::Gpt4oMiniTranscribe => "gpt-4o-mini-transcribe",
        }
    }

    /// Returns a human-readable description of the model
    pub fn description(&self) -> &'static str {
        match self {
            TranscriptionModel::Whisper1 => "Whisper",
            TranscriptionModel::Gpt4oTranscribe => "GPT-4o Transcribe (best accuracy)",
            TranscriptionModel::Gpt4oMiniTranscribe => "GPT-4o Mini Transcribe (faster, lighter)",
        }
    }

    /// Only whisper-1 is served by the translations endpoint.
    pub fn supports_task(&self, task: Task) -> bool {
        match task {
            Task::Transcribe => true,
            Task::Translate => *self == TranscriptionModel::Whisper1,
        }
    }

    /// The gpt-4o family answers with json or text only.
    pub fn supports_format(&self, format: ResponseFormat) -> bool {
        match format {
            ResponseFormat::Json => true,
            ResponseFormat::Srt => *self == TranscriptionModel::Whisper1,
        }
    }

    /// Parses a model ID string into a TranscriptionModel
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "whisper-1" | "whisper" => Some(TranscriptionModel::Whisper1),
            "gpt-4o-transcribe" => Some(TranscriptionModel::Gpt4oTranscribe),
            "gpt-4o-mini-transcribe" => Some(TranscriptionModel::Gpt4oMiniTranscribe),
            _ => None,
        }
    }

    /// Returns all available models
    pub fn all() -> &'static [Self] {
        &[
            TranscriptionModel::Whisper1,
            TranscriptionModel::Gpt4oTranscribe,
            TranscriptionModel::Gpt4oMiniTranscribe,
        ]
    }

    /// Returns all available model IDs
    pub fn available_ids() -> Vec<&'static str> {
        Self::all().iter().map(|m| m.id()).collect()
    }
}

impl std::fmt::Display for TranscriptionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// What the API should do with the audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Task {
    /// Transcribe in the spoken language
    #[default]
    Transcribe,
    /// Transcribe and translate into English
    Translate,
}

impl Task {
    /// Endpoint path relative to the API base URL
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            Task::Transcribe => "audio/transcriptions",
            Task::Translate => "audio/translations",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Task::Transcribe => "transcription",
            Task::Translate => "translation",
        }
    }
}

/// Shape of the API response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// `{"text": "..."}`
    #[default]
    Json,
    /// Plain SubRip subtitle document
    Srt,
}

impl ResponseFormat {
    pub fn id(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Srt => "srt",
        }
    }

    /// Extension of the file the result is saved to
    pub fn extension(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "txt",
            ResponseFormat::Srt => "srt",
        }
    }
}
