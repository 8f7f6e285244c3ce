// src/handlers/restaurants.rs
// DOCUMENTATION: HTTP handlers for the scored-corpus query surface
// PURPOSE: Parse filters, query the snapshot, return rows

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::context::CityContext;
use crate::errors::FoodMapError;
use crate::services::{CorpusHandle, RestaurantQuery};

/// GET /api/restaurants
/// Filterable, sortable view over the scored corpus
pub async fn list_restaurants(
    handle: web::Data<CorpusHandle>,
    query: web::Query<RestaurantQuery>,
) -> Result<impl Responder, FoodMapError> {
    let corpus = handle.get()?;
    let rows = corpus.query(&query.into_inner())?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Query parameters for the gems endpoint
#[derive(Debug, Deserialize)]
pub struct GemsQuery {
    pub limit: Option<i64>,
}

/// GET /api/gems
/// Most undervalued records by baseline residual
pub async fn list_gems(
    handle: web::Data<CorpusHandle>,
    query: web::Query<GemsQuery>,
) -> Result<impl Responder, FoodMapError> {
    let corpus = handle.get()?;
    let gems = corpus.gems(query.limit.unwrap_or(50));
    Ok(HttpResponse::Ok().json(gems))
}

/// GET /api/districts
/// Per-district aggregates
pub async fn list_districts(
    handle: web::Data<CorpusHandle>,
) -> Result<impl Responder, FoodMapError> {
    let corpus = handle.get()?;
    Ok(HttpResponse::Ok().json(corpus.district_stats()))
}

/// GET /api/summary
/// Corpus summary statistics
pub async fn summary(handle: web::Data<CorpusHandle>) -> Result<impl Responder, FoodMapError> {
    let corpus = handle.get()?;
    Ok(HttpResponse::Ok().json(&corpus.summary))
}

/// GET /api/city
/// Static city-context metadata for the map front-end
pub async fn city_info(ctx: web::Data<CityContext>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "city": ctx.city_name.as_str(),
        "country": ctx.country.as_str(),
        "center": { "lat": ctx.center.0, "lng": ctx.center.1 },
        "default_zoom": ctx.default_zoom,
        "tourist_epicenter": {
            "lat": ctx.tourist_epicenter.0,
            "lng": ctx.tourist_epicenter.1,
            "name": ctx.tourist_epicenter_name.as_str(),
        },
        "expat_center": {
            "lat": ctx.expat_center.0,
            "lng": ctx.expat_center.1,
            "name": ctx.expat_center_name.as_str(),
        },
        "districts": ctx.districts(),
        "neighborhoods": ctx.neighborhoods(),
        "community_source": ctx.community_source.clone(),
        "timezone": ctx.timezone.as_str(),
    }))
}

/// Configuration for restaurant routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/restaurants", web::get().to(list_restaurants))
            .route("/gems", web::get().to(list_gems))
            .route("/districts", web::get().to(list_districts))
            .route("/summary", web::get().to(summary))
            .route("/city", web::get().to(city_info)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_queries_before_build_report_unavailable() {
        let handle = web::Data::new(CorpusHandle::empty());
        let app = test::init_service(App::new().app_data(handle).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/restaurants").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "CORPUS_UNAVAILABLE");
        assert!(body["error"]["hint"].as_str().unwrap().contains("rebuild"));
    }
}
