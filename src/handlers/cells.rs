// src/handlers/cells.rs
// DOCUMENTATION: Spatial cell export endpoint
// PURPOSE: Serve hex-cell aggregates as GeoJSON for map rendering

use actix_web::{web, HttpResponse, Responder};

use crate::errors::FoodMapError;
use crate::services::{cells_to_geojson, CorpusHandle};

/// GET /api/cells
/// Feature collection of hex polygons with per-cell aggregates
pub async fn list_cells(handle: web::Data<CorpusHandle>) -> Result<impl Responder, FoodMapError> {
    let corpus = handle.get()?;
    let collection = cells_to_geojson(&corpus.cells);
    Ok(HttpResponse::Ok().json(collection))
}

/// Configuration for cell routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/cells", web::get().to(list_cells));
}
