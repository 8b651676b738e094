// server/src/main.rs

// Declare modules for the application
mod config;
mod coupon;
mod db;
mod errors;
mod flows;
mod messages;
mod models;
mod pricing;
mod services;
mod state;
mod sweeper;
mod web;

use crate::config::AppConfig;
use crate::services::email::BrevoMailer;
use crate::services::imaging::HostedImageUploader;
use crate::services::notify::WhatsAppSender;
use crate::services::razorpay::RazorpayGateway;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting medikart server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Initialize Database Pool
  let db_pool = match MySqlPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  // Build the order workflows once; handlers run them per request.
  let flows = Arc::new(flows::build_flows());

  // Create AppState with the concrete vendor adapters.
  let app_state = AppState {
    db_pool: db_pool.clone(),
    flows,
    config: app_config.clone(),
    gateway: Arc::new(RazorpayGateway::new(&app_config)),
    notifier: Arc::new(WhatsAppSender::new(&app_config)),
    mailer: Arc::new(BrevoMailer::new(&app_config)),
    image_host: Arc::new(HostedImageUploader::new(&app_config)),
  };

  // Background sweep for abandoned online payments.
  sweeper::spawn(app_state.clone());

  // Configure and Start Actix Web Server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::routes::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
