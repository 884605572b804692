use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use crate::store::{JobRegistry, PublicationJob, VideoJob};

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    publications: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    videos: Option<usize>,
}

/// Health check endpoint
///
/// Reports how many jobs each in-memory registry holds.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(
    publications: web::Data<JobRegistry<PublicationJob>>,
    videos: web::Data<JobRegistry<VideoJob>>,
) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        publications: Some(publications.total().await),
        videos: Some(videos.total().await),
    })
}

/// Liveness check endpoint
///
/// Simple check that the process is alive.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive",
        publications: None,
        videos: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config.service(health_check).service(liveness_check);
}
