//! OpenAI speech-to-text API client.
//!
//! Uploads one audio file per call as `multipart/form-data` with bearer token
//! authentication and extracts the transcript from the response.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::error::TranscribeError;
use super::model::{ResponseFormat, Task, TranscriptionModel};
use crate::credentials::Credential;

/// Default base URL of the OpenAI REST API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Content type announced for the uploaded audio, whatever its real encoding.
const AUDIO_MIME: &str = "audio/mpeg";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default overall request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Successful JSON response body. `text` stays loosely typed so a missing or
/// non-string value can be told apart from a body that is not JSON at all.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<serde_json::Value>,
}

/// Options for transcription requests
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    /// The model to use
    pub model: TranscriptionModel,
    /// Transcribe or translate
    pub task: Task,
    /// Response format to request
    pub format: ResponseFormat,
    /// Base URL the endpoint path is appended to
    pub api_base: String,
    /// Overall request timeout
    pub timeout: Duration,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: TranscriptionModel::default(),
            task: Task::default(),
            format: ResponseFormat::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TranscriptionConfig {
    /// Full URL of the endpoint for the configured task.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.task.endpoint_path()
        )
    }

    /// Rejects model/task/format combinations the API does not serve.
    pub fn validate(&self) -> Result<(), TranscribeError> {
        if !self.model.supports_task(self.task) {
            return Err(TranscribeError::UnsupportedOption(format!(
                "{} does not support {}; use whisper-1",
                self.model,
                self.task.name()
            )));
        }
        if !self.model.supports_format(self.format) {
            return Err(TranscribeError::UnsupportedOption(format!(
                "{} cannot return {} output; use whisper-1",
                self.model,
                self.format.id()
            )));
        }
        Ok(())
    }
}

/// Client for the OpenAI audio endpoints.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    http: reqwest::Client,
    config: TranscriptionConfig,
}

impl TranscriptionClient {
    /// Builds a client with the configured timeouts.
    ///
    /// # Errors
    /// - If the options are an unsupported combination
    /// - If the HTTP client cannot be constructed
    pub fn new(config: TranscriptionConfig) -> Result<Self, TranscribeError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TranscribeError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &TranscriptionConfig {
        &self.config
    }

    /// Uploads `audio_path` and returns the transcript.
    ///
    /// No request is sent when the file is missing or the credential is blank.
    ///
    /// # Errors
    /// - If the audio file does not exist or cannot be read
    /// - If the API request fails due to network issues (connection, timeout)
    /// - If the API returns an HTTP error (401 for invalid key, 429 for rate limit, etc.)
    /// - If the response has no usable `text`
    pub async fn transcribe(
        &self,
        credential: &Credential,
        audio_path: &Path,
    ) -> Result<String, TranscribeError> {
        if !audio_path.exists() {
            tracing::error!("Path does not exist for file to transcribe: {}", audio_path.display());
            return Err(TranscribeError::AudioNotFound {
                path: audio_path.to_path_buf(),
            });
        }
        if credential.expose().trim().is_empty() {
            return Err(TranscribeError::EmptyCredential);
        }

        let audio_data = std::fs::read(audio_path).map_err(|source| TranscribeError::Io {
            path: audio_path.to_path_buf(),
            source,
        })?;
        let audio_len = audio_data.len();

        let file_name = audio_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let file_part = reqwest::multipart::Part::bytes(audio_data)
            .file_name(file_name.clone())
            .mime_str(AUDIO_MIME)
            .map_err(|e| TranscribeError::Network(format!("Failed to create file part for upload: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .text("model", self.config.model.id())
            .part("file", file_part);

        let url = self.config.endpoint();

        tracing::debug!(
            "OpenAI API Call:\n  URL: {}?response_format={}\n  Method: POST\n  Headers:\n    Authorization: Bearer <redacted>\n    Content-Type: multipart/form-data; boundary={}\n  Body parameters: model={}, file={} ({} bytes)",
            url,
            self.config.format.id(),
            form.boundary(),
            self.config.model.id(),
            file_name,
            audio_len
        );

        let response = self
            .http
            .post(&url)
            .query(&[("response_format", self.config.format.id())])
            .bearer_auth(credential.expose())
            .multipart(form)
            .send()
            .await
            .map_err(describe_send_error)?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let human_readable = match status.as_u16() {
                401 => "OpenAI API key is invalid or expired. Check the key file.".to_string(),
                403 => "You don't have permission to use OpenAI's API. Check your API key and account status.".to_string(),
                429 => "Too many requests to OpenAI. You've hit the API rate limit. Please wait and try again.".to_string(),
                500 | 502 | 503 | 504 => "OpenAI API server is experiencing issues. Please try again later.".to_string(),
                _ => format!("OpenAI API error (status {status}): {error_body}"),
            };
            tracing::error!("OpenAI API returned {status}: {error_body}");
            return Err(TranscribeError::Api {
                status: status.as_u16(),
                message: human_readable,
            });
        }

        let text = match self.config.format {
            ResponseFormat::Json => {
                let transcription: TranscriptionResponse =
                    response.json().await.map_err(describe_body_error)?;
                usable_text(transcription)?
            }
            ResponseFormat::Srt => response.text().await.map_err(describe_body_error)?,
        };

        if text.trim().is_empty() {
            return Err(TranscribeError::MissingText);
        }

        tracing::debug!(
            "OpenAI API Response:\n  Status: Success\n  Transcription length: {} characters",
            text.len()
        );

        Ok(text)
    }
}

fn describe_send_error(e: reqwest::Error) -> TranscribeError {
    let error_msg = if e.is_connect() {
        "Failed to connect to OpenAI API server. Check your internet connection.".to_string()
    } else if e.is_timeout() {
        "Request to OpenAI timed out. The API server is not responding.".to_string()
    } else if e.is_builder() {
        format!("Failed to build OpenAI API request: {e}. This may be a configuration error.")
    } else {
        format!("OpenAI network error: {e}")
    };
    tracing::error!("{error_msg}");
    TranscribeError::Network(error_msg)
}

fn describe_body_error(e: reqwest::Error) -> TranscribeError {
    if e.is_decode() {
        TranscribeError::MalformedResponse(e.to_string())
    } else {
        describe_send_error(e)
    }
}

/// The transcript, if the response carries one as a string.
fn usable_text(response: TranscriptionResponse) -> Result<String, TranscribeError> {
    match response.text {
        Some(serde_json::Value::String(text)) => Ok(text),
        _ => Err(TranscribeError::MissingText),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{header, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "sk-test-token";

    fn client_for(server: &MockServer) -> TranscriptionClient {
        TranscriptionClient::new(TranscriptionConfig {
            api_base: server.uri(),
            ..TranscriptionConfig::default()
        })
        .unwrap()
    }

    fn credential() -> Credential {
        Credential::new(TOKEN).unwrap()
    }

    fn audio_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("sample.mp3");
        std::fs::write(&path, b"fake mp3 bytes").unwrap();
        path
    }

    #[tokio::test]
    async fn test_returns_text_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(query_param("response_format", "json"))
            .and(header("authorization", "Bearer sk-test-token"))
            .and(header_regex(
                "content-type",
                "^multipart/form-data; boundary=[0-9a-f-]+$",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "hello world"})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let text = client_for(&server)
            .transcribe(&credential(), &audio_file(&dir))
            .await
            .unwrap();
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn test_request_body_has_model_then_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "ok"})))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        client_for(&server)
            .transcribe(&credential(), &audio_file(&dir))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        let content_type = request.headers.get("content-type").unwrap().to_str().unwrap();
        let boundary = content_type.split("boundary=").nth(1).unwrap();
        let body = String::from_utf8_lossy(&request.body);

        assert_eq!(body.matches(&format!("--{boundary}\r\n")).count(), 2);
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
        let model_at = body.find("name=\"model\"\r\n\r\nwhisper-1\r\n").unwrap();
        let file_at = body
            .find("name=\"file\"; filename=\"sample.mp3\"\r\nContent-Type: audio/mpeg\r\n\r\nfake mp3 bytes\r\n")
            .unwrap();
        assert!(model_at < file_at);
    }

    #[tokio::test]
    async fn test_each_upload_gets_fresh_boundary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "ok"})))
            .expect(2)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let client = client_for(&server);
        let audio = audio_file(&dir);
        client.transcribe(&credential(), &audio).await.unwrap();
        client.transcribe(&credential(), &audio).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let boundaries: Vec<String> = requests
            .iter()
            .map(|r| {
                let content_type = r.headers.get("content-type").unwrap().to_str().unwrap();
                content_type.split("boundary=").nth(1).unwrap().to_string()
            })
            .collect();
        assert_eq!(boundaries.len(), 2);
        assert_ne!(boundaries[0], boundaries[1]);
    }

    #[tokio::test]
    async fn test_non_string_text_is_missing_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": 42})))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let err = client_for(&server)
            .transcribe(&credential(), &audio_file(&dir))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscribeError::MissingText));
    }

    #[tokio::test]
    async fn test_missing_text_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let err = client_for(&server)
            .transcribe(&credential(), &audio_file(&dir))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscribeError::MissingText));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let err = client_for(&server)
            .transcribe(&credential(), &audio_file(&dir))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscribeError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_audio_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "x"})))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let err = client_for(&server)
            .transcribe(&credential(), &dir.path().join("absent.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscribeError::AudioNotFound { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_is_reported_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": {"message": "Incorrect API key provided"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let err = client_for(&server)
            .transcribe(&credential(), &audio_file(&dir))
            .await
            .unwrap_err();
        match err {
            TranscribeError::Api { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("invalid or expired"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_translation_with_srt_returns_raw_body() {
        let server = MockServer::start().await;
        let srt = "1\n00:00:00,000 --> 00:00:01,000\nhello\n";
        Mock::given(method("POST"))
            .and(path("/audio/translations"))
            .and(query_param("response_format", "srt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(srt))
            .expect(1)
            .mount(&server)
            .await;

        let client = TranscriptionClient::new(TranscriptionConfig {
            api_base: server.uri(),
            task: Task::Translate,
            format: ResponseFormat::Srt,
            ..TranscriptionConfig::default()
        })
        .unwrap();

        let dir = tempdir().unwrap();
        let text = client
            .transcribe(&credential(), &audio_file(&dir))
            .await
            .unwrap();
        assert_eq!(text, srt);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Bind then release a port so nothing is listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let api_base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = TranscriptionClient::new(TranscriptionConfig {
            api_base,
            ..TranscriptionConfig::default()
        })
        .unwrap();

        let dir = tempdir().unwrap();
        let err = client
            .transcribe(&credential(), &audio_file(&dir))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscribeError::Network(_)));
    }

    #[test]
    fn test_unsupported_combination_rejected() {
        let err = TranscriptionClient::new(TranscriptionConfig {
            model: TranscriptionModel::Gpt4oTranscribe,
            task: Task::Translate,
            ..TranscriptionConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, TranscribeError::UnsupportedOption(_)));
    }

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let config = TranscriptionConfig {
            api_base: "https://api.openai.com/v1/".to_string(),
            ..TranscriptionConfig::default()
        };
        assert_eq!(
            config.endpoint(),
            "https://api.openai.com/v1/audio/transcriptions"
        );
    }
}
