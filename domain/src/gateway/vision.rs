//! Cloud Vision API client for label, object and text detection.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use async_trait::async_trait;
use log::*;
use serde::Deserialize;
use serde_json::json;
use service::config::Config;
use tutor_ai::traits::annotation::Provider;
use tutor_ai::types::annotation::Annotation;
use tutor_ai::Error as AiError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnnotateResponse {
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ImageResponse {
    label_annotations: Vec<EntityAnnotation>,
    localized_object_annotations: Vec<LocalizedObject>,
    text_annotations: Vec<EntityAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EntityAnnotation {
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocalizedObject {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Status {
    message: String,
}

/// Cloud Vision API client
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new Cloud Vision client with the given API key and base URL
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
        let api_key = config.vision_api_key().ok_or_else(|| {
            warn!("Failed to get Cloud Vision API key from config");
            Error::config()
        })?;

        Self::new(&api_key, config.vision_base_url())
    }
}

#[async_trait]
impl Provider for Client {
    async fn annotate(&self, image_base64: &str) -> Result<Annotation, AiError> {
        let url = format!("{}/images:annotate", self.base_url);
        let body = json!({
            "requests": [{
                "image": {"content": image_base64},
                "features": [
                    {"type": "LABEL_DETECTION", "maxResults": 10},
                    {"type": "OBJECT_LOCALIZATION", "maxResults": 10},
                    {"type": "TEXT_DETECTION", "maxResults": 5}
                ]
            }]
        });

        debug!("Annotating {} bytes of base64 image data", image_base64.len());

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Cloud Vision API: {e:?}");
                AiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Cloud Vision API returned {status}: {error_text}");
            return Err(match status.as_u16() {
                429 => AiError::RateLimited {
                    retry_after_seconds: 0,
                },
                401 | 403 => AiError::Authentication(error_text),
                _ => AiError::Provider(format!("{status}: {error_text}")),
            });
        }

        let payload: AnnotateResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Cloud Vision response: {e:?}");
            AiError::Deserialization(e.to_string())
        })?;

        let image = payload
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| AiError::Provider("No response from Vision API".to_string()))?;

        if let Some(status) = image.error {
            return Err(AiError::Provider(status.message));
        }

        Ok(Annotation {
            labels: image
                .label_annotations
                .into_iter()
                .map(|label| label.description)
                .collect(),
            objects: image
                .localized_object_annotations
                .into_iter()
                .map(|object| object.name)
                .collect(),
            // The first text annotation holds the full detected text.
            text: image
                .text_annotations
                .into_iter()
                .next()
                .map(|text| text.description)
                .unwrap_or_default(),
        })
    }

    fn provider_id(&self) -> &'static str {
        "cloud_vision"
    }
}
