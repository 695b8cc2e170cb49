use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::{str::FromStr, sync::Arc};

use crate::config::app_config::AppConfig;
use crate::handlers::alert_handler::BroadcastSender;
use crate::logger::init_logger;
use crate::services::alert_service::AlertService;
use crate::services::dispatch_service::DispatchService;
use crate::services::interaction_service::InteractionService;
use crate::services::push_service::{FcmClient, PushProvider};
use crate::services::trigger_service::{event_bus, TriggerWorker};
use crate::services::user_service::UserService;

mod app;
mod config;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

async fn setup_database(database_url: &str) -> Pool<Sqlite> {
    // Crear la carpeta del archivo SQLite si no existe
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .expect("No se pudo crear el directorio de la base de datos");
            }
        }
    }

    log::info!("Conectando a SQLite en {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .expect("DATABASE_URL inválido")
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("No se pudo conectar a la base de datos SQLite.")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = AppConfig::from_env().expect("Configuración inválida");

    let db_pool = setup_database(&config.database_url).await;

    // Bus del trigger "on create"
    let (events_tx, events_rx) = event_bus();

    let alert_service = AlertService::new(db_pool.clone(), events_tx);
    if let Err(e) = alert_service.run_migrations().await {
        panic!("Fallo en migraciones: {:?}", e);
    }

    let user_service = UserService::new(db_pool.clone());
    let interaction_service = InteractionService::new(db_pool.clone());

    let push: Arc<dyn PushProvider> =
        Arc::new(FcmClient::new(&config.fcm).expect("No se pudo inicializar FcmClient"));
    let dispatch_service =
        DispatchService::new(alert_service.clone(), push, Arc::new(config.push.clone()));

    let trigger = TriggerWorker::new(dispatch_service, events_rx).spawn();

    let sender = BroadcastSender(config.broadcast_sender_name.clone());

    log::info!("Levantando servidor en {}:{}", config.host, config.port);
    let result = HttpServer::new(move || {
        App::new()
            .wrap(app::cors())
            .app_data(web::Data::new(alert_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(interaction_service.clone()))
            .app_data(web::Data::new(sender.clone()))
            .configure(app::init_app)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    log::info!("Servidor detenido, esperando dispatches pendientes...");
    trigger.shutdown().await;
    result
}
