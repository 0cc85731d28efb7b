//! RingCentral REST client for placing calls and opening video meetings.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::config::Config;

pub const DEFAULT_MEETING_NAME: &str = "Educational Session";
pub const DEFAULT_MEETING_TYPE: &str = "Instant";

/// Call status reported when RingCentral doesn't include one.
pub const DEFAULT_CALL_STATUS: &str = "InProgress";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhoneNumber<'a> {
    phone_number: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RingOutRequest<'a> {
    from: PhoneNumber<'a>,
    to: PhoneNumber<'a>,
    play_prompt: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMeetingRequest<'a> {
    topic: &'a str,
    meeting_type: &'a str,
    allow_join_before_host: bool,
    start_host_video: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RingOutResponse {
    status: Option<RingOutStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RingOutStatus {
    call_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MeetingResponse {
    id: Option<Value>,
    join_uri: Option<String>,
    links: Option<MeetingLinks>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MeetingLinks {
    join_uri: Option<String>,
}

/// A newly created video meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meeting {
    pub join_url: Option<String>,
    pub meeting_id: Option<String>,
}

/// RingCentral API client
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new RingCentral client with the given user JWT and platform server URL
    pub fn new(user_jwt: &str, server_url: &str) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let auth_value = format!("Bearer {}", user_jwt);
        let mut header_value =
            reqwest::header::HeaderValue::from_str(&auth_value).map_err(|e| {
                warn!("Failed to create auth header: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                        "Invalid access token format".to_string(),
                    )),
                }
            })?;
        header_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/restapi/v1.0/account/~/extension/~",
                server_url.trim_end_matches('/')
            ),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let user_jwt = config.ringcentral_user_jwt().ok_or_else(|| {
            warn!("Failed to get RingCentral user JWT from config");
            Error::config()
        })?;

        Self::new(&user_jwt, config.ringcentral_server_url())
    }

    /// Ring `from_number` first, then connect it to `to_number`. Returns the call status.
    pub async fn ring_out(&self, from_number: &str, to_number: &str) -> Result<String, Error> {
        let url = format!("{}/ring-out", self.base_url);
        let request = RingOutRequest {
            from: PhoneNumber {
                phone_number: from_number,
            },
            to: PhoneNumber {
                phone_number: to_number,
            },
            play_prompt: true,
        };

        info!("Placing RingOut call");
        let response = self.post(&url, &request).await?;

        if !response.status().is_success() {
            return Err(api_error(response, "Call failed").await);
        }

        let data: RingOutResponse = parse(response).await?;
        let status = data
            .status
            .and_then(|status| status.call_status)
            .unwrap_or_else(|| DEFAULT_CALL_STATUS.to_string());
        debug!("RingOut call status: {status}");

        Ok(status)
    }

    pub async fn create_meeting(
        &self,
        meeting_name: &str,
        meeting_type: &str,
    ) -> Result<Meeting, Error> {
        let url = format!("{}/meeting", self.base_url);
        let request = CreateMeetingRequest {
            topic: meeting_name,
            meeting_type,
            allow_join_before_host: true,
            start_host_video: true,
        };

        info!("Creating {meeting_type} RingCentral meeting: {meeting_name}");
        let response = self.post(&url, &request).await?;

        if !response.status().is_success() {
            return Err(api_error(response, "Failed to create meeting").await);
        }

        let data: MeetingResponse = parse(response).await?;
        let meeting_id = data.id.map(|id| match id {
            Value::String(id) => id,
            other => other.to_string(),
        });

        Ok(Meeting {
            join_url: data.links.and_then(|links| links.join_uri).or(data.join_uri),
            meeting_id,
        })
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, Error> {
        self.client.post(url).json(body).send().await.map_err(|e| {
            warn!("Failed to reach RingCentral: {e:?}");
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        })
    }
}

async fn parse<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T, Error> {
    response.json().await.map_err(|e| {
        warn!("Failed to parse RingCentral response: {e:?}");
        Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                "Invalid response from RingCentral".to_string(),
            )),
        }
    })
}

/// RingCentral puts a human readable reason in the `message` field of error bodies.
async fn api_error(response: reqwest::Response, default_message: &str) -> Error {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or_default();
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(default_message)
        .to_string();
    warn!("RingCentral API returned {status}: {message}");

    Error::external(message)
}
