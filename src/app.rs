//! Application orchestration.
//!
//! Parses command-line flags, sets up logging, and runs the interactive
//! transcription pipeline.

use crate::config::{parse_model, Settings, DEFAULT_TIMEOUT_SECS};
use crate::credentials::DEFAULT_KEY_FILE;
use crate::logging;
use crate::pipeline;
use crate::prompt::ConsolePrompt;
use crate::transcription::{TranscriptionModel, DEFAULT_API_BASE};
use clap::Parser;
use console::style;
use std::path::PathBuf;

/// Transcribe an audio file with the OpenAI speech-to-text API
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(version)]
#[command(long_about = "Transcribe an audio file with the OpenAI speech-to-text API.\n\nYou are asked for the path of the audio file. The transcript is printed and\nsaved next to it with a .txt extension (.srt with --srt).\n\nEXAMPLES:\n    # Transcribe using the key in ./openai.priv\n    $ scribe\n\n    # Translate to English and save subtitles\n    $ scribe --translate --srt\n\n    # Use a newer model and a key stored elsewhere\n    $ scribe --model gpt-4o-transcribe --key-file ~/.secrets/openai.priv")]
#[command(
    after_help = "FILES:\n    API key:            ./openai.priv (override with --key-file)\n    Logs:               ~/.local/state/scribe/scribe.log.*"
)]
struct Cli {
    /// File containing the OpenAI API key
    #[arg(long, value_name = "PATH", env = "SCRIBE_KEY_FILE", default_value = DEFAULT_KEY_FILE)]
    key_file: PathBuf,

    /// Model to transcribe with (whisper-1, gpt-4o-transcribe, gpt-4o-mini-transcribe)
    #[arg(long, value_name = "ID", env = "SCRIBE_MODEL", default_value = "whisper-1", value_parser = parse_model)]
    model: TranscriptionModel,

    /// Base URL of the API
    #[arg(long, value_name = "URL", env = "SCRIBE_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", env = "SCRIBE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Translate the speech into English instead of transcribing it
    #[arg(long)]
    translate: bool,

    /// Request SubRip subtitles and save them as .srt
    #[arg(long)]
    srt: bool,
}

impl Cli {
    fn into_settings(self) -> Settings {
        Settings::new(
            self.key_file,
            self.model,
            self.api_base,
            self.timeout,
            self.translate,
            self.srt,
        )
    }
}

/// Runs the application and returns the process exit code.
///
/// # Exit Codes
/// - 0: Transcription attempted (saved, or failure already reported)
/// - 1: Audio path or API key unusable
/// - 2: Usage error (invalid arguments or option combination)
///
/// # Errors
/// - If logging initialization fails
/// - If the Ctrl-C handler cannot be installed
pub async fn run() -> Result<i32, anyhow::Error> {
    let settings = Cli::parse().into_settings();

    let log_guard = logging::init_logging()?;
    tracing::info!("=== scribe {} ===", env!("CARGO_PKG_VERSION"));

    let mut prompt = ConsolePrompt::install()?;

    println!("{}", style("scribe").cyan().bold());

    let outcome = pipeline::run(&settings, &mut prompt).await;
    tracing::info!("Run finished: {outcome:?}");

    // Flush buffered log lines before the caller exits.
    drop(log_guard);
    Ok(outcome.exit_code())
}
