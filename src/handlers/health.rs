// src/handlers/health.rs
// DOCUMENTATION: Health check endpoint
// PURPOSE: Liveness probe plus corpus readiness

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::services::CorpusHandle;

/// GET /health
/// Service liveness and corpus readiness
pub async fn health(handle: web::Data<CorpusHandle>) -> impl Responder {
    let corpus = handle.get().ok();
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "foodmap-ranking",
        "corpus_ready": corpus.is_some(),
        "restaurants": corpus.as_ref().map(|c| c.summary.total_restaurants),
        "built_at": corpus.as_ref().map(|c| c.summary.built_at.to_rfc3339()),
    }))
}

/// Configuration for health routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_health_reports_corpus_readiness() {
        let handle = web::Data::new(CorpusHandle::empty());
        let app = test::init_service(App::new().app_data(handle).configure(config)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["corpus_ready"], false);
    }
}
