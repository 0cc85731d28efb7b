use crate::{controller::health_check_controller, params, AppState};
use axum::{
    routing::{get, post},
    Router,
};

use crate::controller::{
    chatbot_controller, conversation_controller, email_controller, image_controller,
    ringcentral_controller, summary_controller, video_controller, webhook_controller,
    whatsapp_controller,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Session Assist API"
        ),
        paths(
            chatbot_controller::chat,
            conversation_controller::index,
            conversation_controller::transcript,
            conversation_controller::attach_audio_transcript,
            email_controller::send,
            health_check_controller::health_check,
            image_controller::analyze,
            ringcentral_controller::call,
            ringcentral_controller::video,
            summary_controller::create,
            video_controller::create,
            webhook_controller::fulfill,
            whatsapp_controller::share,
        ),
        components(
            schemas(
                domain::conversations::Model,
                domain::suggestion::Suggestion,
                domain::turn::Turn,
                params::conversation::ConversationsResponse,
                params::conversation::TranscriptResponse,
                params::conversation::AttachAudioTranscriptParams,
            )
        ),
        tags(
            (name = "session_assist", description = "Educational session assistant API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(ai_routes(app_state.clone()))
        .merge(communication_routes(app_state.clone()))
        .merge(conversation_routes(app_state.clone()))
        .merge(health_routes())
        .merge(webhook_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn conversation_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/conversations", get(conversation_controller::index))
        .route(
            "/conversations/{session_id}/audio-transcript",
            post(conversation_controller::attach_audio_transcript),
        )
        .route("/transcript", get(conversation_controller::transcript))
        .with_state(app_state)
}

fn ai_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/analyze-image", post(image_controller::analyze))
        .route("/chatbot", post(chatbot_controller::chat))
        .route("/generate-summary", post(summary_controller::create))
        .route("/generate-video", post(video_controller::create))
        .with_state(app_state)
}

fn communication_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/ringcentral-call", post(ringcentral_controller::call))
        .route("/ringcentral-video", post(ringcentral_controller::video))
        .route("/send-email", post(email_controller::send))
        .route("/send-whatsapp", post(whatsapp_controller::share))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn webhook_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook_controller::fulfill))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use clap::Parser;
    use domain::conversation::{ConversationStore, InMemoryConversationStore};
    use domain::conversation_status::ConversationStatus;
    use domain::conversations::Model;
    use domain::generation_provider::MockProvider;
    use domain::turn::Turns;
    use domain::webhook::APOLOGY;
    use domain::ProviderError;
    use serde_json::{json, Value};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    const QUBIT_SUGGESTION: &str = r#"Here you go:
{"nextBestAction": "Use a coin analogy", "suggestedResponse": "A qubit is like a spinning coin.", "learningAssessment": "Beginner", "keyQuestions": ["What is a bit?"], "topicsToExplore": ["Superposition"]}"#;

    fn test_config() -> Config {
        Config::parse_from(["session_assist"])
    }

    fn answering(text: &'static str) -> MockProvider {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .returning(move |_| Ok(text.to_string()));
        provider.expect_provider_id().return_const("mock");
        provider
    }

    fn app(config: Config, store: Arc<InMemoryConversationStore>, provider: MockProvider) -> Router {
        define_routes(AppState::with_store(
            config,
            store,
            Arc::new(provider),
            None,
        ))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn qubit_turn() -> Value {
        json!({
            "sessionInfo": {
                "session": "projects/p/locations/l/agents/a/sessions/abc123",
                "parameters": {"grade": "10"}
            },
            "text": "What is a qubit?",
            "intentInfo": {"displayName": "ask.concept", "confidence": 0.92},
            "pageInfo": {"displayName": "Physics"}
        })
    }

    fn audio_only_conversation(session_id: &str) -> Model {
        let now = Utc::now().fixed_offset();
        Model {
            session_id: session_id.to_string(),
            start_time: now,
            last_update: now,
            status: ConversationStatus::Completed,
            channel: domain::AUDIO_CHANNEL.to_string(),
            turns: Turns::default(),
            latest_suggestions: None,
            suggestions_updated: None,
            metadata: json!({}),
            has_audio: true,
            audio_file_url: Some("gs://recordings/abc.wav".to_string()),
            audio_transcript: Some(
                "Instructor: Today we study qubits.\n\nStudent: What is one?\nNoise".to_string(),
            ),
            audio_transcribed_at: Some(now),
        }
    }

    #[test]
    fn api_doc_describes_the_webhook_body_as_json() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let request_body = &doc["paths"]["/webhook"]["post"]["requestBody"];

        assert!(request_body["content"]["application/json"].is_object());
    }

    #[tokio::test]
    async fn unrouted_paths_never_serve_working_directory_files() {
        for uri in ["/.env", "/Cargo.toml", "/src/lib.rs"] {
            let store = Arc::new(InMemoryConversationStore::new());
            let response = app(test_config(), store, MockProvider::new())
                .oneshot(get(uri))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let store = Arc::new(InMemoryConversationStore::new());
        let response = app(test_config(), store, MockProvider::new())
            .oneshot(get("/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn webhook_turn_is_answered_and_shows_up_in_the_transcript() {
        let store = Arc::new(InMemoryConversationStore::new());
        let router = app(test_config(), Arc::clone(&store), answering(QUBIT_SUGGESTION));

        let response = router
            .clone()
            .oneshot(post_json("/webhook", qubit_turn()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let reply = json_body(response).await;
        assert_eq!(
            reply["fulfillmentResponse"]["messages"][0]["text"]["text"][0],
            "A qubit is like a spinning coin."
        );
        assert_eq!(reply["sessionInfo"]["parameters"]["grade"], "10");
        assert_eq!(reply["sessionInfo"]["parameters"]["learningLevel"], "Beginner");

        let response = router
            .oneshot(get("/transcript?sessionId=abc123"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let transcript = json_body(response).await;
        assert_eq!(
            transcript["messages"],
            json!([{"role": "student", "speaker": "Student", "text": "What is a qubit?"}])
        );
        assert_eq!(transcript["suggestions"]["nextBestAction"], "Use a coin analogy");
    }

    #[tokio::test]
    async fn webhook_rejects_a_wrong_secret() {
        let store = Arc::new(InMemoryConversationStore::new());
        let mut provider = MockProvider::new();
        provider.expect_generate().never();
        let config = test_config().set_webhook_secret(Some("s3cr3t".to_string()));

        let mut request = post_json("/webhook", qubit_turn());
        request
            .headers_mut()
            .insert("x-webhook-secret", "guess".parse().unwrap());
        let response = app(config, Arc::clone(&store), provider)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(store.list_recent(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn webhook_accepts_the_configured_secret() {
        let store = Arc::new(InMemoryConversationStore::new());
        let config = test_config().set_webhook_secret(Some("s3cr3t".to_string()));

        let mut request = post_json("/webhook", qubit_turn());
        request
            .headers_mut()
            .insert("x-webhook-secret", "s3cr3t".parse().unwrap());
        let response = app(config, store, answering(QUBIT_SUGGESTION))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_webhook_bodies_still_get_a_reply() {
        let store = Arc::new(InMemoryConversationStore::new());
        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(test_config(), store, answering("no json here"))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let reply = json_body(response).await;
        assert!(reply["fulfillmentResponse"]["messages"][0]["text"]["text"][0].is_string());
    }

    #[tokio::test]
    async fn transcript_requires_a_known_session() {
        let store = Arc::new(InMemoryConversationStore::new());
        let router = app(test_config(), store, MockProvider::new());

        let missing = router.clone().oneshot(get("/transcript")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        let body = json_body(missing).await;
        assert_eq!(body["error"], "sessionId required");
        assert_eq!(body["messages"], json!([]));

        let unknown = router
            .oneshot(get("/transcript?sessionId=nope"))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        let body = json_body(unknown).await;
        assert_eq!(body["error"], "Session not found");
        assert_eq!(body["messages"], json!([]));
    }

    #[tokio::test]
    async fn transcript_parses_the_audio_transcript_lines() {
        let store = Arc::new(InMemoryConversationStore::new());
        store.insert(audio_only_conversation("rec1")).await;

        let response = app(test_config(), store, MockProvider::new())
            .oneshot(get("/transcript?sessionId=rec1"))
            .await
            .unwrap();

        let transcript = json_body(response).await;
        assert_eq!(
            transcript["messages"],
            json!([
                {"role": "instructor", "speaker": "Instructor", "text": "Today we study qubits."},
                {"role": "student", "speaker": "Student", "text": "What is one?"}
            ])
        );
        assert_eq!(transcript["suggestions"], json!({}));
    }

    #[tokio::test]
    async fn conversations_lists_recent_sessions() {
        let store = Arc::new(InMemoryConversationStore::new());
        store.insert(audio_only_conversation("rec1")).await;

        let response = app(test_config(), store, MockProvider::new())
            .oneshot(get("/conversations"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["conversations"][0]["sessionId"], "rec1");
        assert_eq!(body["conversations"][0]["status"], "completed");
        assert_eq!(body["conversations"][0]["hasAudio"], true);
        assert_eq!(body["conversations"][0]["messageCount"], 0);
    }

    #[tokio::test]
    async fn audio_transcripts_create_completed_conversations() {
        let store = Arc::new(InMemoryConversationStore::new());
        let body = json!({
            "audioFileUrl": "gs://recordings/new.wav",
            "words": [
                {"word": "What", "speakerTag": 1},
                {"word": "is", "speakerTag": 1},
                {"word": "entanglement?", "speakerTag": 1},
                {"word": "Good", "speakerTag": 2},
                {"word": "question.", "speakerTag": 2}
            ]
        });

        let response = app(test_config(), Arc::clone(&store), MockProvider::new())
            .oneshot(post_json("/conversations/rec2/audio-transcript", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "completed");
        assert_eq!(
            body["audioTranscript"],
            "Student: What is entanglement?\nInstructor: Good question."
        );
        assert!(store.find("rec2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn summaries_validate_the_session() {
        let store = Arc::new(InMemoryConversationStore::new());
        let mut provider = MockProvider::new();
        provider.expect_generate().never();
        let router = app(test_config(), store, provider);

        let missing = router
            .clone()
            .oneshot(post_json("/generate-summary", json!({})))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let unknown = router
            .oneshot(post_json("/generate-summary", json!({"sessionId": "nope"})))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn summaries_are_generated_from_the_transcript() {
        let store = Arc::new(InMemoryConversationStore::new());
        store.insert(audio_only_conversation("rec1")).await;

        let response = app(test_config(), store, answering("Qubits were introduced."))
            .oneshot(post_json("/generate-summary", json!({"sessionId": "rec1"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"success": true, "summary": "Qubits were introduced."})
        );
    }

    #[tokio::test]
    async fn chatbot_rejects_blank_messages() {
        let store = Arc::new(InMemoryConversationStore::new());
        let mut provider = MockProvider::new();
        provider.expect_generate().never();

        let response = app(test_config(), store, provider)
            .oneshot(post_json("/chatbot", json!({"message": "  "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"response": "Please provide a message."})
        );
    }

    #[tokio::test]
    async fn chatbot_failures_hide_the_cause() {
        let store = Arc::new(InMemoryConversationStore::new());
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .returning(|_| Err(ProviderError::Provider("boom".to_string())));

        let response = app(test_config(), store, provider)
            .oneshot(post_json("/chatbot", json!({"message": "Explain gates"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"success": false, "response": "Error processing request"})
        );
    }

    #[tokio::test]
    async fn whatsapp_links_need_a_phone_number() {
        let store = Arc::new(InMemoryConversationStore::new());
        let router = app(test_config(), store, MockProvider::new());

        let rejected = router
            .clone()
            .oneshot(post_json("/send-whatsapp", json!({"phoneNumber": "call me"})))
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

        let response = router
            .oneshot(post_json(
                "/send-whatsapp",
                json!({"phoneNumber": "98765 43210", "message": "Hi"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["phoneNumber"], "+919876543210");
        assert_eq!(body["whatsappUrl"], "https://wa.me/919876543210?text=Hi");
    }

    #[tokio::test]
    async fn video_preview_returns_only_the_prompt() {
        let store = Arc::new(InMemoryConversationStore::new());

        let response = app(test_config(), store, MockProvider::new())
            .oneshot(post_json(
                "/generate-video",
                json!({"sessionId": "abc123", "transcript": "Qubits use superposition", "previewOnly": true}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Prompt generated for preview");
        assert!(body["videoPrompt"]
            .as_str()
            .unwrap()
            .contains("8-second educational video"));
        assert!(body.get("outputPath").is_none());
    }

    #[tokio::test]
    async fn video_plans_name_the_output_location() {
        let store = Arc::new(InMemoryConversationStore::new());

        let response = app(test_config(), store, MockProvider::new())
            .oneshot(post_json(
                "/generate-video",
                json!({"sessionId": "abc123", "customPrompt": "Animate a qubit"}),
            ))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["videoPrompt"], "Animate a qubit");
        assert!(body["outputPath"]
            .as_str()
            .unwrap()
            .starts_with("gs://session-assist-videos/abc123_"));
        assert_eq!(body["instructions"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn image_analysis_without_a_provider_is_a_server_error() {
        let store = Arc::new(InMemoryConversationStore::new());

        let response = app(test_config(), store, MockProvider::new())
            .oneshot(post_json("/analyze-image", json!({"image": "aGVsbG8="})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn generation_failures_reply_with_fallback_guidance() {
        let store = Arc::new(InMemoryConversationStore::new());
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .returning(|_| Err(ProviderError::Provider("model unavailable".to_string())));
        provider.expect_provider_id().return_const("mock");

        let response = app(test_config(), store, provider)
            .oneshot(post_json("/webhook", qubit_turn()))
            .await
            .unwrap();

        let reply = json_body(response).await;
        let text = &reply["fulfillmentResponse"]["messages"][0]["text"]["text"][0];
        assert_ne!(text, APOLOGY);
        assert_eq!(
            text,
            "That's a great question! Let me explain that concept in more detail..."
        );
    }
}
