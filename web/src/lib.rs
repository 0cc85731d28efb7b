use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use domain::annotation_provider::Provider as AnnotationProvider;
use domain::conversation::{ConversationStore, DbConversationStore};
use domain::generation_provider::Provider as GenerationProvider;
use domain::suggestion::SuggestionGenerator;
use domain::webhook::Orchestrator;
use log::*;
use service::config::Config;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

mod controller;
mod error;
mod params;
pub(crate) mod router;

pub use error::{Error, Result};

/// Everything a request handler may need: configuration, the conversation store and
/// the AI providers. Cloning is cheap, every client sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ConversationStore>,
    pub generation: Arc<dyn GenerationProvider>,
    /// Image annotation is optional; without a key `/analyze-image` reports a config error.
    pub annotation: Option<Arc<dyn AnnotationProvider>>,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Wires the domain clients over the database backed conversation store.
    pub fn new(
        service_state: service::AppState,
        generation: Arc<dyn GenerationProvider>,
        annotation: Option<Arc<dyn AnnotationProvider>>,
    ) -> Self {
        let store = Arc::new(DbConversationStore::new(Arc::clone(
            &service_state.database_connection,
        )));
        Self::with_store(service_state.config, store, generation, annotation)
    }

    pub fn with_store(
        config: Config,
        store: Arc<dyn ConversationStore>,
        generation: Arc<dyn GenerationProvider>,
        annotation: Option<Arc<dyn AnnotationProvider>>,
    ) -> Self {
        let generator = SuggestionGenerator::new(
            Arc::clone(&generation),
            config.gemini_model(),
            config.ai_max_attempts,
        );
        let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&store), generator));

        Self {
            config,
            store,
            generation,
            annotation,
            orchestrator,
        }
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state.config.interface.as_deref().unwrap_or("127.0.0.1");
    let server_url = format!("{host}:{}", app_state.config.port);
    info!("Server starting... listening for connections on http://{server_url}");

    let allowed_origins = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(err) => {
                warn!("Ignoring unparsable CORS origin {origin}: {err:?}");
                None
            }
        })
        .collect::<Vec<HeaderValue>>();
    info!("CORS allowed origins: {:?}", app_state.config.allowed_origins);

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(allowed_origins));

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    axum::serve(
        listener,
        router::define_routes(app_state).layer(cors_layer),
    )
    .await
}
