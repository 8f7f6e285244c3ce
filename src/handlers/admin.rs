// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for corpus rebuilds
// PURPOSE: Rebuild the scored corpus out-of-band and swap the snapshot

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;

use crate::config::Config;
use crate::context::CityContext;
use crate::errors::FoodMapError;
use crate::services::{build_corpus, CorpusHandle, CorpusSources};

/// Response for the rebuild endpoint
#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub message: String,
    pub total_restaurants: usize,
    pub cell_count: usize,
}

/// Verify the admin token header
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), FoodMapError> {
    let provided = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|v| v.to_str().ok());
    if provided == Some(config.admin_token.as_str()) {
        Ok(())
    } else {
        Err(FoodMapError::Unauthorized)
    }
}

/// POST /admin/rebuild
/// Rebuild the corpus from the configured data file and atomically swap
/// the served snapshot
///
/// DOCUMENTATION: Requires admin authentication via X-Admin-Token header.
/// Queries in flight keep the previous generation until the swap.
pub async fn rebuild(
    req: HttpRequest,
    config: web::Data<Config>,
    ctx: web::Data<CityContext>,
    handle: web::Data<CorpusHandle>,
) -> Result<impl Responder, FoodMapError> {
    verify_admin_token(&req, &config)?;

    log::info!("Admin rebuild requested");

    let build_config = config.clone();
    let build_ctx = ctx.clone();
    let corpus = web::block(move || {
        let sources = CorpusSources::load(&build_config);
        build_corpus(&build_config, &build_ctx, &sources)
    })
    .await
    .map_err(|e| FoodMapError::DataError(e.to_string()))?
    .map_err(|e| FoodMapError::DataError(e.to_string()))?;

    let response = RebuildResponse {
        message: "corpus rebuilt".to_string(),
        total_restaurants: corpus.summary.total_restaurants,
        cell_count: corpus.cells.len(),
    };
    handle.swap(corpus);

    Ok(HttpResponse::Ok().json(response))
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/admin").route("/rebuild", web::post().to(rebuild)));
}
