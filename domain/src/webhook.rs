//! Conversational agent webhook: record the student's turn, generate teaching
//! guidance for it and shape the reply the agent platform expects.
//!
//! The agent platform must always get a well formed reply, so `Orchestrator::handle`
//! never returns an error. Failures are logged and reported through the
//! `WebhookOutcome` variant instead.

use crate::conversation::{render_history, ConversationSeed, ConversationStore};
use crate::error::Error;
use crate::suggestion::{FallbackReason, Suggestion, SuggestionGenerator, SuggestionOutcome};
use crate::turn::Turn;
use log::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const DEFAULT_INTENT: &str = "No Intent";
pub const DEFAULT_PAGE: &str = "Unknown Page";

/// Reply text when the turn couldn't be processed at all.
pub const APOLOGY: &str =
    "That's an interesting question! Let me think about the best way to explain this...";

/// Reply text when a suggestion came back without a response to say.
pub const EMPTY_RESPONSE_REPLACEMENT: &str = "Let me help you understand that better.";

/// Inbound webhook payload. Every field is optional and a field of the wrong shape is
/// treated as missing rather than rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookRequest {
    #[serde(deserialize_with = "lenient")]
    pub session_info: Option<SessionInfo>,
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub intent_info: Option<IntentInfo>,
    #[serde(deserialize_with = "lenient")]
    pub page_info: Option<PageInfo>,
    #[serde(deserialize_with = "lenient")]
    pub messages: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    /// Path-like session name, e.g. "projects/p/locations/l/agents/a/sessions/abc123".
    #[serde(deserialize_with = "lenient")]
    pub session: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntentInfo {
    #[serde(deserialize_with = "lenient")]
    pub display_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    #[serde(deserialize_with = "lenient")]
    pub display_name: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl WebhookRequest {
    /// Reads a raw request body. Anything that isn't a JSON object yields an empty request.
    pub fn from_slice(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|err| {
            warn!("Unreadable webhook body, continuing with defaults: {err}");
            WebhookRequest::default()
        })
    }
}

/// The fields of a webhook request the workflow acts on, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    pub session_id: String,
    pub intent: String,
    pub page: String,
    pub query: String,
    pub confidence: f64,
    pub parameters: Map<String, Value>,
}

impl From<&WebhookRequest> for ParsedRequest {
    fn from(request: &WebhookRequest) -> Self {
        let session_info = request.session_info.clone().unwrap_or_default();

        let session_id = session_info
            .session
            .as_deref()
            .and_then(|session| session.rsplit('/').next())
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(generated_session_id);

        let intent_info = request.intent_info.clone().unwrap_or_default();
        let intent = non_empty(intent_info.display_name).unwrap_or_else(|| DEFAULT_INTENT.into());
        let page = non_empty(request.page_info.clone().and_then(|page| page.display_name))
            .unwrap_or_else(|| DEFAULT_PAGE.into());

        let query = non_empty(request.text.clone())
            .or_else(|| {
                let first = request.messages.as_ref()?.first()?;
                non_empty(first.pointer("/text/text/0")?.as_str().map(str::to_string))
            })
            .unwrap_or_default();

        ParsedRequest {
            session_id,
            intent,
            page,
            query,
            confidence: intent_info.confidence.unwrap_or(0.0),
            parameters: session_info.parameters.unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn generated_session_id() -> String {
    format!("session-{}", chrono::Utc::now().timestamp_millis())
}

/// Reply body for the agent platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_response: FulfillmentResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_info: Option<ReplySessionInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentResponse {
    pub messages: Vec<ResponseMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub text: MessageText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageText {
    pub text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplySessionInfo {
    pub parameters: Map<String, Value>,
}

impl WebhookResponse {
    fn text(text: impl Into<String>) -> Self {
        WebhookResponse {
            fulfillment_response: FulfillmentResponse {
                messages: vec![ResponseMessage {
                    text: MessageText {
                        text: vec![text.into()],
                    },
                }],
            },
            session_info: None,
        }
    }

    pub fn apology() -> Self {
        Self::text(APOLOGY)
    }

    /// Replies with the suggestion's response and hands its action and assessment
    /// back to the platform alongside the inbound session parameters.
    pub fn from_suggestion(suggestion: &Suggestion, inbound: &Map<String, Value>) -> Self {
        let reply = if suggestion.suggested_response.is_empty() {
            EMPTY_RESPONSE_REPLACEMENT
        } else {
            suggestion.suggested_response.as_str()
        };

        let mut parameters = inbound.clone();
        parameters.insert(
            "teachingSuggestion".to_string(),
            Value::String(suggestion.next_best_action.clone()),
        );
        parameters.insert(
            "learningLevel".to_string(),
            Value::String(suggestion.learning_assessment.clone()),
        );

        WebhookResponse {
            session_info: Some(ReplySessionInfo { parameters }),
            ..Self::text(reply)
        }
    }

    /// The visible reply, `fulfillmentResponse.messages[0].text.text[0]`.
    pub fn reply_text(&self) -> &str {
        self.fulfillment_response
            .messages
            .first()
            .and_then(|message| message.text.text.first())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Which path a webhook call took. Every variant carries the reply to send.
#[derive(Debug)]
pub enum WebhookOutcome {
    /// The model produced the suggestion.
    Success(WebhookResponse),
    /// The turn was stored but the suggestion is the static fallback.
    RecoveredFallback {
        response: WebhookResponse,
        reason: FallbackReason,
    },
    /// Storage failed; the reply is the generic apology.
    LoggedError {
        response: WebhookResponse,
        error: Error,
    },
}

impl WebhookOutcome {
    pub fn response(&self) -> &WebhookResponse {
        match self {
            WebhookOutcome::Success(response) => response,
            WebhookOutcome::RecoveredFallback { response, .. } => response,
            WebhookOutcome::LoggedError { response, .. } => response,
        }
    }

    pub fn into_response(self) -> WebhookResponse {
        match self {
            WebhookOutcome::Success(response) => response,
            WebhookOutcome::RecoveredFallback { response, .. } => response,
            WebhookOutcome::LoggedError { response, .. } => response,
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn ConversationStore>,
    generator: SuggestionGenerator,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn ConversationStore>, generator: SuggestionGenerator) -> Self {
        Self { store, generator }
    }

    pub async fn handle(&self, request: &WebhookRequest) -> WebhookOutcome {
        let parsed = ParsedRequest::from(request);
        info!(
            "Webhook turn for session: {}, intent: {}, page: {}",
            parsed.session_id, parsed.intent, parsed.page
        );
        debug!("Student query: {}", parsed.query);

        match self.process(&parsed).await {
            Ok(SuggestionOutcome::Generated(suggestion)) => {
                debug!("Teaching suggestion: {}", suggestion.next_best_action);
                WebhookOutcome::Success(WebhookResponse::from_suggestion(
                    &suggestion,
                    &parsed.parameters,
                ))
            }
            Ok(SuggestionOutcome::Fallback { suggestion, reason }) => {
                WebhookOutcome::RecoveredFallback {
                    response: WebhookResponse::from_suggestion(&suggestion, &parsed.parameters),
                    reason,
                }
            }
            Err(error) => {
                error!(
                    "Webhook failed for session {}: {error}",
                    parsed.session_id
                );
                WebhookOutcome::LoggedError {
                    response: WebhookResponse::apology(),
                    error,
                }
            }
        }
    }

    async fn process(&self, parsed: &ParsedRequest) -> Result<SuggestionOutcome, Error> {
        let history = self
            .store
            .find(&parsed.session_id)
            .await?
            .map(|conversation| render_history(&conversation.turns.0))
            .unwrap_or_default();

        let turn = Turn::from_customer(
            parsed.query.as_str(),
            parsed.intent.as_str(),
            parsed.page.as_str(),
            parsed.confidence,
            parsed.parameters.clone(),
        );
        let seed = ConversationSeed {
            channel: crate::DEFAULT_CHANNEL.to_string(),
            metadata: Map::new(),
        };
        self.store
            .append_turn(&parsed.session_id, turn, seed)
            .await?;

        let current = format!("Student: {}", parsed.query);
        let conversation_text = if history.is_empty() {
            current
        } else {
            format!("{history}\n{current}")
        };

        let outcome = self.generator.generate(&conversation_text).await;
        self.store
            .save_suggestion(&parsed.session_id, outcome.suggestion().clone())
            .await?;

        Ok(outcome)
    }
}
