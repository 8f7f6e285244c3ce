// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, build the scored corpus, start HTTP server

mod config;
mod context;
mod errors;
mod handlers;
mod models;
mod services;

use std::io;
use std::path::Path;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

use config::Config;
use context::{brussels_config, CityContext};
use services::{build_corpus, validate_weights, CorpusHandle, CorpusSources};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting foodmap-ranking service...");
    log::info!("Environment: {}", config.environment);

    // 4. Structural invariants and city context fail loudly at start
    if let Err(e) = validate_weights() {
        log::error!("Scoring weight table invalid: {}", e);
        std::process::exit(1);
    }
    let ctx = match CityContext::from_config(brussels_config()) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("City context invalid: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Loaded city context for {}", ctx.city_name);

    // 5. Build the initial corpus snapshot
    let handle = web::Data::new(CorpusHandle::empty());
    if Path::new(&config.data_path).exists() {
        let sources = CorpusSources::load(&config);
        match build_corpus(&config, &ctx, &sources) {
            Ok(corpus) => handle.swap(corpus),
            Err(e) => {
                // Bad data is a build failure, not something to serve around
                log::error!("Corpus build failed: {:#}", e);
                std::process::exit(1);
            }
        }
    } else {
        log::warn!(
            "No data file at {}; serving 'unavailable' until a rebuild",
            config.data_path
        );
    }

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    log::info!("Listening on {}", server_addr);

    let config_data = web::Data::new(config);
    let ctx_data = web::Data::new(ctx);

    HttpServer::new(move || {
        App::new()
            // Application state (config, context, corpus snapshot)
            .app_data(config_data.clone())
            .app_data(ctx_data.clone())
            .app_data(handle.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::restaurants_config)
            .configure(handlers::cells_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
