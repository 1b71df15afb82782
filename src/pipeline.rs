//! The transcription run: prompt, load key, upload, echo, save.
//!
//! Each step hands its result to the next explicitly. The prompt is injected
//! and the API base comes from [`Settings`], so a run can be driven without a
//! terminal or the real API.

use console::style;
use std::path::PathBuf;

use crate::config::Settings;
use crate::credentials::load_credential;
use crate::output::save_transcript;
use crate::prompt::{resolve_audio_path, PathPrompt};
use crate::transcription::{TranscribeError, TranscriptionClient};

/// How a run ended.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Transcript echoed and written to the given file
    Saved(PathBuf),
    /// Transcript echoed but the output file could not be written
    NotSaved,
    /// The API call failed or returned no text
    TranscriptionFailed,
    /// The options cannot be served by the chosen model
    InvalidOptions,
    /// The path could not be read or does not name an existing file
    InvalidPath,
    /// No usable API key
    MissingCredential,
}

impl RunOutcome {
    /// Process exit code for this outcome.
    ///
    /// Only problems with local inputs are non-zero; a failed upload or write
    /// has already been reported and the user simply re-runs.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Saved(_) | RunOutcome::NotSaved | RunOutcome::TranscriptionFailed => 0,
            RunOutcome::InvalidPath | RunOutcome::MissingCredential => 1,
            RunOutcome::InvalidOptions => 2,
        }
    }
}

/// Executes one transcription run.
pub async fn run(settings: &Settings, prompt: &mut dyn PathPrompt) -> RunOutcome {
    let client = match TranscriptionClient::new(settings.transcription.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Invalid options: {e}");
            eprintln!("{}", style(e).red().bold());
            return RunOutcome::InvalidOptions;
        }
    };

    let audio_path = match prompt.ask_path().and_then(|raw| resolve_audio_path(&raw)) {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Invalid audio path: {e}");
            eprintln!("{}", style(e).red().bold());
            return RunOutcome::InvalidPath;
        }
    };
    tracing::info!("Transcribing file: {}", audio_path.display());

    let Some(credential) = load_credential(&settings.key_file) else {
        return RunOutcome::MissingCredential;
    };

    let config = client.config();
    tracing::info!(
        "Requesting {} with {} [{}] ({} output)",
        config.task.name(),
        config.model.id(),
        config.model.description(),
        config.format.id()
    );

    let text = match client.transcribe(&credential, &audio_path).await {
        Ok(text) => text,
        Err(e) => {
            match &e {
                TranscribeError::Api { status, .. } => {
                    tracing::error!("Transcription failed with HTTP {status}: {e}")
                }
                _ if e.is_local() => tracing::error!("Transcription not attempted: {e}"),
                _ => tracing::error!("Transcription failed: {e}"),
            }
            eprintln!(
                "{}",
                style(format!("Transcription failed: {e}")).red().bold()
            );
            return RunOutcome::TranscriptionFailed;
        }
    };

    println!("{text}");

    match save_transcript(&text, &audio_path, config.format) {
        Ok(path) => {
            tracing::info!("Transcription saved to {}", path.display());
            println!(
                "{}",
                style(format!("Transcription saved to {}", path.display()))
                    .green()
                    .bold()
            );
            RunOutcome::Saved(path)
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{}", style(e).red().bold());
            RunOutcome::NotSaved
        }
    }
}
