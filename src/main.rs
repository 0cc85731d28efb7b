use domain::annotation_provider::Provider as AnnotationProvider;
use domain::gateway::{gemini, vision};
use log::{error, info, warn};
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!(
        "Starting session assist [{}] with log level {}",
        config.runtime_env(),
        config.log_level_filter
    );

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(db.as_ref(), None).await {
        error!("Failed to apply database migrations: {e}");
        std::process::exit(1);
    }

    let generation = match gemini::Client::from_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("A generation API key is required to answer webhook turns: {e}");
            std::process::exit(1);
        }
    };

    let annotation: Option<Arc<dyn AnnotationProvider>> = match vision::Client::from_config(&config)
    {
        Ok(client) => Some(Arc::new(client)),
        Err(_) => {
            warn!("No Cloud Vision API key configured, image analysis is disabled");
            None
        }
    };

    let service_state = service::AppState::new(config, &db);
    let app_state = web::AppState::new(service_state, generation, annotation);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
