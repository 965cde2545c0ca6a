mod classifier;
mod config;
mod error;
mod imaging;
mod routes;
mod upload;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use classifier::{Classifier, TorchClassifier};
use config::AppConfig;
use routes::configure_routes;
use std::env;
use std::fs;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    fs::create_dir_all(&config.uploads_dir)?;

    let classifier = TorchClassifier::load(&config.model_path).map_err(|e| {
        log::error!("Failed to load model at startup: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    log::info!("Model loaded successfully from {}", config.model_path.display());

    let classifier: Arc<dyn Classifier> = Arc::new(classifier);
    let classifier = web::Data::from(classifier);

    let bind_address = format!("0.0.0.0:{}", config.port);
    log::info!("Starting server on {}", bind_address);

    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(config.clone())
            .app_data(classifier.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
