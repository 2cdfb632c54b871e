// src/main.rs

use actix_web::web;
use analysis_server::service::AnalysisService;
use completion_service::client::{CompletionClient, CompletionConfig};
use quote_service::client::QuoteClient;
use std::io;
use std::sync::Arc;

const DEFAULT_PORT: u16 = 3000;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = CompletionConfig::from_env()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    let completion = CompletionClient::new(config)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

    let service = web::Data::new(AnalysisService::new(
        Arc::new(completion),
        Arc::new(QuoteClient::new()),
    ));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    log::info!("Stock Analysis API listening on port {port}");
    analysis_server::run_server(service, port).await
}
