//! Transcription service for audio-to-text conversion.
//!
//! Sends a local audio file to the OpenAI speech-to-text API and returns the
//! text it produced.

pub mod client;
pub mod error;
pub mod model;

pub use client::{TranscriptionClient, TranscriptionConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
pub use error::TranscribeError;
pub use model::{ResponseFormat, Task, TranscriptionModel};
