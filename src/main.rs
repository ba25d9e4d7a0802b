use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use blog_site::comment::service::CommentService;
use blog_site::config::{AppConfig, StorageBackend};
use blog_site::database::db::Database;
use blog_site::database::{BlogStore, MemoryStore, MongoStore};
use blog_site::middleware::error_handler::error_handlers;
use blog_site::post::post_service::PostService;
use blog_site::router::index::routes;
use blog_site::share::service::ShareService;
use blog_site::utils::email::{EmailService, LogMailer, MailTransport};
use blog_site::utils::slug::SlugGenerator;
use dotenv::dotenv;
use env_logger::Env;
use log::{info, warn};

async fn build_store(config: &AppConfig) -> std::io::Result<Arc<dyn BlogStore>> {
    match config.storage {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Mongo => {
            let database = Database::init(&config.mongodb_uri)
                .await
                .map_err(|e| std::io::Error::other(format!("Failed to connect to MongoDB: {}", e)))?;

            let store = MongoStore::new(&database.client, &config.mongodb_database);
            store
                .ensure_indexes()
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;

            Ok(Arc::new(store))
        }
    }
}

fn build_mailer() -> Arc<dyn MailTransport> {
    match EmailService::new() {
        Ok(service) => Arc::new(service),
        Err(e) => {
            warn!("SMTP not configured ({}); shared posts will only be logged", e);
            Arc::new(LogMailer)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    // compiles the slug pattern once for the whole process
    let slugs = SlugGenerator::new().map_err(std::io::Error::other)?;

    let store = build_store(&config).await?;
    let post_service = web::Data::new(PostService::new(store.clone(), slugs, config.page_size));
    let comment_service = web::Data::new(CommentService::new(store));
    let share_service = web::Data::new(ShareService::new(build_mailer(), &config.base_url));

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(post_service.clone())
            .app_data(comment_service.clone())
            .app_data(share_service.clone())
            .configure(routes)
            .wrap(error_handlers())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
