//! API credential loading.
//!
//! The bearer token lives in a plain text file next to where the tool is run.
//! Loading never fails loudly: problems are reported and the caller only sees
//! whether a usable token is available.

use console::style;
use reqwest::header::HeaderValue;
use std::fmt;
use std::io;
use std::path::Path;

/// Default name of the file holding the OpenAI API key.
pub const DEFAULT_KEY_FILE: &str = "openai.priv";

/// A bearer token. Formatting it never reveals more than a short prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

/// Why a token cannot be used.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCredential {
    #[error("key is empty")]
    Empty,
    #[error("key contains characters not allowed in an HTTP header (line breaks or control characters)")]
    NotHeaderSafe,
}

impl Credential {
    /// Wraps a token after trimming it.
    ///
    /// The token must survive being sent as `Authorization: Bearer <token>`.
    pub fn new(token: impl Into<String>) -> Result<Self, InvalidCredential> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(InvalidCredential::Empty);
        }
        if HeaderValue::from_str(&format!("Bearer {token}")).is_err() {
            return Err(InvalidCredential::NotHeaderSafe);
        }
        Ok(Self(token))
    }

    /// The raw token, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(3).collect();
        format!("{prefix}… ({} chars)", self.0.chars().count())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.redacted()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

/// Reads the bearer token from `path`.
///
/// Returns `None` if the file is missing, unreadable, blank, or holds a token
/// that cannot go into a header. The reason is
/// logged and echoed to stderr.
pub fn load_credential(path: &Path) -> Option<Credential> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::error!("Key file not found: {}", path.display());
            eprintln!(
                "{}",
                style(format!("Key not found: {}", path.display())).red().bold()
            );
            return None;
        }
        Err(e) => {
            tracing::error!("Failed to read key file {}: {e}", path.display());
            eprintln!(
                "{}",
                style(format!("Could not read key file {}: {e}", path.display()))
                    .red()
                    .bold()
            );
            return None;
        }
    };

    match Credential::new(contents) {
        Ok(credential) => {
            tracing::debug!("Key read from {}: {credential}", path.display());
            Some(credential)
        }
        Err(e) => {
            tracing::error!("Unusable key file {}: {e}", path.display());
            eprintln!(
                "{}",
                style(format!("Invalid key in {}: {e}", path.display()))
                    .red()
                    .bold()
            );
            None
        }
    }
}
