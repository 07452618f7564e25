use actix_web::{
    HttpResponse, Responder,
    web::{Data, ServiceConfig, get, resource},
};
use serde::Serialize;
use tracing::error;

use crate::api::job::JobService;
use crate::db::store::JobStore;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// General health check including database connectivity.
/// Use for load balancers and uptime monitors.
async fn health_check<S: JobStore + 'static>(service: Data<JobService<S>>) -> impl Responder {
    match service.store().ping().await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            error: None,
        }),
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy".to_string(),
                database: "disconnected".to_string(),
                error: Some(format!("Database error: {}", e)),
            })
        }
    }
}

/// Readiness check endpoint
///
/// Returns 503 while the database is unreachable so the instance is taken
/// out of rotation until it recovers.
async fn readiness_check<S: JobStore + 'static>(service: Data<JobService<S>>) -> impl Responder {
    match service.store().ping().await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: "ready".to_string(),
            database: "connected".to_string(),
            error: None,
        }),
        Err(e) => {
            error!("Readiness check failed: database unavailable: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "not_ready".to_string(),
                database: "disconnected".to_string(),
                error: Some(format!("Database unavailable: {}", e)),
            })
        }
    }
}

/// Liveness check endpoint. Does not touch the database.
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        database: "not_checked".to_string(),
        error: None,
    })
}

pub fn health_config<S: JobStore + 'static>(config: &mut ServiceConfig) {
    config
        .service(resource("/health").route(get().to(health_check::<S>)))
        .service(resource("/ready").route(get().to(readiness_check::<S>)))
        .service(resource("/live").route(get().to(liveness_check)));
}
