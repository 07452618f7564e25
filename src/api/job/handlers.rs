use actix_web::{
    HttpResponse,
    web::{Data, Path, Query, ServiceConfig, delete, get, patch, post, resource, scope},
};
use actix_web_validator::Json;

use crate::api::auth::Identity;
use crate::db::store::JobStore;
use super::dto::JobResponse;
use super::models::{CreateJob, UpdateJob};
use super::query::ListJobsParams;
use super::service::{JobService, ServiceError};

async fn list_jobs<S: JobStore + 'static>(
    service: Data<JobService<S>>,
    identity: Identity,
    query: Query<Vec<(String, String)>>,
) -> Result<HttpResponse, ServiceError> {
    let params = ListJobsParams::from_pairs(query.into_inner());
    let list = service.list_jobs(&identity, &params).await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn show_stats<S: JobStore + 'static>(
    service: Data<JobService<S>>,
    identity: Identity,
) -> Result<HttpResponse, ServiceError> {
    let stats = service.job_stats(&identity).await?;
    Ok(HttpResponse::Ok().json(stats))
}

async fn get_job<S: JobStore + 'static>(
    service: Data<JobService<S>>,
    identity: Identity,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JobResponse { job }))
}

async fn create_job<S: JobStore + 'static>(
    service: Data<JobService<S>>,
    identity: Identity,
    job: Json<CreateJob>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.create_job(&identity, job.into_inner()).await?;
    Ok(HttpResponse::Created().json(JobResponse { job }))
}

async fn update_job<S: JobStore + 'static>(
    service: Data<JobService<S>>,
    identity: Identity,
    path: Path<i32>,
    job: Json<UpdateJob>,
) -> Result<HttpResponse, ServiceError> {
    let job = service
        .update_job(&identity, path.into_inner(), job.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(JobResponse { job }))
}

async fn delete_job<S: JobStore + 'static>(
    service: Data<JobService<S>>,
    identity: Identity,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    service.delete_job(&identity, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mount the job routes under `/api/v1/jobs`
///
/// `/stats` is registered before `/{id}` so it is not captured as an id.
pub fn job_config<S: JobStore + 'static>(config: &mut ServiceConfig) {
    config.service(
        scope("/api/v1/jobs")
            .service(
                resource("")
                    .route(get().to(list_jobs::<S>))
                    .route(post().to(create_job::<S>)),
            )
            .service(resource("/stats").route(get().to(show_stats::<S>)))
            .service(
                resource("/{id}")
                    .route(get().to(get_job::<S>))
                    .route(patch().to(update_job::<S>))
                    .route(delete().to(delete_job::<S>)),
            ),
    );
}
