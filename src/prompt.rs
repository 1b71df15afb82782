//! Interactive input of the audio file path.
//!
//! The prompt sits behind [`PathPrompt`] so the pipeline can run headlessly
//! with an injected path.

use anyhow::anyhow;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Exit code used when Ctrl-C interrupts work outside the prompt.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Source of the audio file path typed by the user.
pub trait PathPrompt {
    fn ask_path(&mut self) -> anyhow::Result<String>;
}

/// Asks for the path on the terminal.
///
/// While the question is on screen Ctrl-C is left to cliclack, which shows
/// its own cancel message. Anywhere else Ctrl-C ends the process.
pub struct ConsolePrompt {
    prompting: Arc<AtomicBool>,
}

impl ConsolePrompt {
    /// Installs the process-wide Ctrl-C handler.
    ///
    /// # Errors
    /// - If a Ctrl-C handler is already installed
    pub fn install() -> anyhow::Result<Self> {
        let prompting = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&prompting);
        ctrlc::set_handler(move || {
            if !interrupt_is_handled_by_prompt(&flag) {
                tracing::warn!("Interrupted by Ctrl-C");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })
        .map_err(|e| anyhow!("Failed to set Ctrl-C handler: {e}"))?;

        Ok(Self { prompting })
    }
}

fn interrupt_is_handled_by_prompt(prompting: &AtomicBool) -> bool {
    prompting.load(Ordering::SeqCst)
}

impl PathPrompt for ConsolePrompt {
    fn ask_path(&mut self) -> anyhow::Result<String> {
        self.prompting.store(true, Ordering::SeqCst);
        let answer: std::io::Result<String> = cliclack::input("Audio file to transcribe:")
            .placeholder("recording.mp3")
            .interact();
        self.prompting.store(false, Ordering::SeqCst);

        answer.map_err(|e| anyhow!("Path input cancelled: {e}"))
    }
}

/// Turns user input into an absolute path to an existing file.
///
/// Surrounding whitespace and one pair of matching quotes (as left by
/// drag-and-drop into a terminal) are stripped.
///
/// # Errors
/// - If the input is empty
/// - If nothing exists at the path
/// - If the path is not a regular file
pub fn resolve_audio_path(raw: &str) -> anyhow::Result<PathBuf> {
    let trimmed = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed);

    if unquoted.is_empty() {
        return Err(anyhow!("No file path given"));
    }

    let path = std::fs::canonicalize(unquoted)
        .map_err(|e| anyhow!("File does not exist: {unquoted} ({e})"))?;

    if !path.is_file() {
        return Err(anyhow!("Not a file: {}", path.display()));
    }

    Ok(path)
}
