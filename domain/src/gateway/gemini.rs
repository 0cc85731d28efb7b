//! Generative Language API client.
//!
//! Implements the `tutor_ai` generation provider over the `generateContent` REST
//! endpoint, translating HTTP failures into the provider error taxonomy so rate
//! limits can be retried by the caller.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use async_trait::async_trait;
use log::*;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use service::config::Config;
use tutor_ai::traits::generation::Provider;
use tutor_ai::types::generation::Request;
use tutor_ai::Error as AiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated.
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|part| part.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Generative Language API client
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new client with the given API key and base URL
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut header_value = reqwest::header::HeaderValue::from_str(api_key).map_err(|e| {
            warn!("Failed to create API key header: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Invalid API key format".to_string(),
                )),
            }
        })?;
        header_value.set_sensitive(true);
        headers.insert("x-goog-api-key", header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let api_key = config.gemini_api_key().ok_or_else(|| {
            warn!("Failed to get Gemini API key from config");
            Error::config()
        })?;

        Self::new(&api_key, config.gemini_base_url())
    }
}

#[async_trait]
impl Provider for Client {
    async fn generate(&self, request: Request) -> Result<String, AiError> {
        if !request.has_valid_model() {
            warn!("Refusing generateContent call for model {:?}", request.model);
            return Err(AiError::Configuration(format!(
                "Invalid model name: {}",
                request.model
            )));
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            system_instruction: request.system_instruction.as_deref().map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
        };

        debug!("Calling generateContent on {}", request.model);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Generative Language API: {e:?}");
                if e.is_timeout() {
                    AiError::Timeout(e.to_string())
                } else {
                    AiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(status, response).await);
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse generateContent response: {e:?}");
            AiError::Deserialization(e.to_string())
        })?;

        payload
            .into_text()
            .ok_or_else(|| AiError::Provider("Model returned no candidate text".to_string()))
    }

    fn provider_id(&self) -> &'static str {
        "gemini"
    }
}

async fn error_for_status(status: StatusCode, response: reqwest::Response) -> AiError {
    let retry_after_seconds = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0);
    let error_text = response.text().await.unwrap_or_default();
    warn!("Generative Language API returned {status}: {error_text}");

    match status {
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited {
            retry_after_seconds,
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiError::Authentication(error_text),
        _ => AiError::Provider(format!("{status}: {error_text}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const MODEL_PATH: &str = "/models/gemini-2.0-flash-exp:generateContent";

    fn client(server: &Server) -> Client {
        Client::new("test_api_key_123", &server.url()).unwrap()
    }

    fn request() -> Request {
        Request::new("gemini-2.0-flash-exp", "What is a qubit?")
    }

    #[test]
    fn from_config_requires_an_api_key() {
        let config = Config::parse_from(["session_assist"]);
        if config.gemini_api_key().is_none() {
            assert!(Client::from_config(&config).is_err());
        }

        let config = Config::parse_from(["session_assist", "--gemini-api-key", "abc"]);
        assert!(Client::from_config(&config).is_ok());
    }

    #[tokio::test]
    async fn returns_the_first_candidate_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", MODEL_PATH)
            .match_header("x-goog-api-key", "test_api_key_123")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"role": "user", "parts": [{"text": "What is a qubit?"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{"content": {"parts": [
                        {"text": "A qubit is "},
                        {"text": "a quantum bit."}
                    ]}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = client(&server).generate(request()).await.unwrap();

        assert_eq!(text, "A qubit is a quantum bit.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn system_instructions_are_sent_separately() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", MODEL_PATH)
            .match_body(Matcher::PartialJson(json!({
                "systemInstruction": {"parts": [{"text": "Be brief."}]}
            })))
            .with_status(200)
            .with_body(json!({"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}).to_string())
            .create_async()
            .await;

        let result = client(&server)
            .generate(request().with_system_instruction("Be brief."))
            .await;

        assert_eq!(result.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limited() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", MODEL_PATH)
            .with_status(429)
            .with_header("retry-after", "7")
            .with_body("Resource has been exhausted")
            .create_async()
            .await;

        let err = client(&server).generate(request()).await.unwrap_err();

        assert!(matches!(
            err,
            AiError::RateLimited {
                retry_after_seconds: 7
            }
        ));
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn rejected_keys_map_to_authentication() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", MODEL_PATH)
            .with_status(403)
            .with_body("API key not valid")
            .create_async()
            .await;

        let err = client(&server).generate(request()).await.unwrap_err();

        assert!(matches!(err, AiError::Authentication(_)));
        assert!(!err.is_rate_limited());
    }

    #[tokio::test]
    async fn unsafe_model_names_never_reach_the_api() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = client(&server)
            .generate(Request::new("../../files?x=", "What is a qubit?"))
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Configuration(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_candidates_are_a_provider_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", MODEL_PATH)
            .with_status(200)
            .with_body(json!({"candidates": []}).to_string())
            .create_async()
            .await;

        let err = client(&server).generate(request()).await.unwrap_err();

        assert!(matches!(err, AiError::Provider(_)));
    }
}
