mod config;
mod constants;
mod database;
mod errors;
mod handlers;
mod middleware;
mod models;
mod openapi;
mod repositories;
mod routes;
mod services;
mod utils;
mod validators;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info, warn};

use crate::config::CONFIG;
use crate::database::DbConnector;
use crate::middleware::create_follow_rate_limiter_config;
use crate::repositories::{ThreadRepository, ThreadStore, UserRepository, UserStore};
use crate::services::{ThreadService, UserService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment variables and logger
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Connect to MongoDB
    let connector = Arc::new(DbConnector::new(
        CONFIG.mongodb_uri.clone(),
        &CONFIG.database_name,
    ));
    connector.connect().await.map_err(|e| {
        error!("Failed to connect to MongoDB: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
    })?;

    let user_store: Arc<dyn UserStore> = Arc::new(UserRepository::new(connector.clone()));
    let thread_store: Arc<dyn ThreadStore> = Arc::new(ThreadRepository::new(connector.clone()));

    if connector.is_connected() {
        if let Err(e) = user_store.create_indexes().await {
            warn!("Failed to create user indexes: {}", e);
        }
        if let Err(e) = thread_store.create_indexes().await {
            warn!("Failed to create thread indexes: {}", e);
        }
        info!("Connected to MongoDB successfully!");
    }

    // Initialize services
    let user_service = web::Data::new(UserService::new(user_store.clone(), thread_store.clone()));
    let thread_service = web::Data::new(ThreadService::new(user_store, thread_store));
    let connector_data = web::Data::new(connector.clone());
    let follow_limiter = create_follow_rate_limiter_config();

    // Start HTTP server
    let server_addr = format!("{}:{}", CONFIG.server_host, CONFIG.server_port);
    info!("Starting server at http://{}", server_addr);

    HttpServer::new(move || {
        let follow_limiter = follow_limiter.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(user_service.clone())
            .app_data(thread_service.clone())
            .app_data(connector_data.clone())
            .configure(move |cfg| routes::configure_routes(cfg, &follow_limiter))
    })
    .bind(&server_addr)?
    .run()
    .await?;

    connector.shutdown().await;
    Ok(())
}
