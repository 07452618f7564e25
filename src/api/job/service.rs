use std::fmt;
use std::str::FromStr;

use actix_web::{HttpResponse, ResponseError};
use tracing::{error, info, warn};
use validator::Validate;

use crate::api::auth::Identity;
use crate::api::validation::{flat_messages, ErrorResponse};
use crate::db::models::{JobChanges, JobRow, NewJob};
use crate::db::store::JobStore;
use super::dto::{JobList, JobStats};
use super::models::{CreateJob, UpdateJob};
use super::pagination::Pagination;
use super::query::{JobQuery, ListJobsParams};
use super::stats;

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(sqlx::Error),

    /// Validation failed
    ValidationError(String),

    /// No job with this id belongs to the caller
    NotFound(i32),

    /// Demo accounts cannot modify data
    DemoUser,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(id) => write!(f, "No job with id {}", id),
            ServiceError::DemoUser => write!(f, "Demo user. Read only!"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                })
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": format!("No job with id {}", id)}),
                })
            }
            ServiceError::DemoUser => {
                warn!("Demo user attempted a write");
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Bad request".to_string(),
                    fields: serde_json::json!({"message": "Demo user. Read only!"}),
                })
            }
        }
    }
}

/// Which fields an update must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateValidation {
    /// Only company and position are required
    #[default]
    Lenient,
    /// Status, job type and location are required as well
    Strict,
}

impl FromStr for UpdateValidation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(UpdateValidation::Lenient),
            "strict" => Ok(UpdateValidation::Strict),
            other => Err(format!(
                "Unknown update validation mode '{}' (expected 'lenient' or 'strict')",
                other
            )),
        }
    }
}

/// Job handling knobs taken from configuration
#[derive(Debug, Clone)]
pub struct JobSettings {
    /// Location stored when a new job does not name one
    pub default_location: String,
    pub update_validation: UpdateValidation,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            default_location: "my city".to_string(),
            update_validation: UpdateValidation::default(),
        }
    }
}

/// Job service containing business logic
///
/// Every operation takes the caller identity explicitly and scopes its
/// store access to records that caller owns.
pub struct JobService<S> {
    store: S,
    settings: JobSettings,
}

impl<S: JobStore> JobService<S> {
    pub fn new(store: S, settings: JobSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// List one page of the caller's jobs
    ///
    /// The page and the total are computed from the same predicate; the
    /// total ignores pagination.
    pub async fn list_jobs(
        &self,
        identity: &Identity,
        params: &ListJobsParams,
    ) -> Result<JobList, ServiceError> {
        let query = JobQuery::from_params(identity, params);
        let page = Pagination::from_params(params.page.as_deref(), params.limit.as_deref());

        let jobs = self
            .store
            .find(&query, &page)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let total_jobs = self
            .store
            .count(&query)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(
            "Service: Listed {} of {} jobs for user={} (page {})",
            jobs.len(),
            total_jobs,
            identity.user_id,
            page.page()
        );

        Ok(JobList {
            jobs,
            total_jobs,
            num_of_pages: page.num_of_pages(total_jobs),
        })
    }

    /// Status summary and recent monthly series for the caller
    pub async fn job_stats(&self, identity: &Identity) -> Result<JobStats, ServiceError> {
        let status_groups = self
            .store
            .status_counts(&identity.user_id)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let month_groups = self
            .store
            .monthly_counts(&identity.user_id)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(JobStats {
            default_stats: stats::default_stats(&status_groups),
            monthly_applications: stats::monthly_applications(month_groups),
        })
    }

    pub async fn get_job(&self, identity: &Identity, id: i32) -> Result<JobRow, ServiceError> {
        self.store
            .find_owned(id, &identity.user_id)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Create a job owned by the caller
    ///
    /// # Business Logic
    /// - Rejects demo users
    /// - Trims and validates company/position
    /// - Fills defaults for status, job type and location
    /// - Owner is always the caller
    pub async fn create_job(
        &self,
        identity: &Identity,
        input: CreateJob,
    ) -> Result<JobRow, ServiceError> {
        ensure_writable(identity)?;

        let input = input.normalized();
        validate(&input)?;

        info!(
            "Service: Creating job company={}, position={} for user={}",
            input.company, input.position, identity.user_id
        );

        let new_job = NewJob {
            company: input.company,
            position: input.position,
            status: input.status.unwrap_or_default(),
            job_type: input.job_type.unwrap_or_default(),
            job_location: input
                .job_location
                .unwrap_or_else(|| self.settings.default_location.clone()),
            created_by: identity.user_id.clone(),
        };

        let row = self
            .store
            .insert(&new_job)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!("Service: Job created successfully with id={}", row.id);
        Ok(row)
    }

    pub async fn update_job(
        &self,
        identity: &Identity,
        id: i32,
        input: UpdateJob,
    ) -> Result<JobRow, ServiceError> {
        ensure_writable(identity)?;

        let input = input.normalized();
        validate(&input)?;

        if self.settings.update_validation == UpdateValidation::Strict
            && (input.status.is_none() || input.job_type.is_none() || input.job_location.is_none())
        {
            return Err(ServiceError::ValidationError(
                "Please provide all values".to_string(),
            ));
        }

        let changes = JobChanges {
            company: input.company,
            position: input.position,
            status: input.status,
            job_type: input.job_type,
            job_location: input.job_location,
        };

        let row = self
            .store
            .update_owned(id, &identity.user_id, &changes)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::NotFound(id))?;

        info!("Service: Job {} updated by user={}", id, identity.user_id);
        Ok(row)
    }

    pub async fn delete_job(&self, identity: &Identity, id: i32) -> Result<(), ServiceError> {
        ensure_writable(identity)?;

        self.store
            .delete_owned(id, &identity.user_id)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::NotFound(id))?;

        info!("Service: Job {} deleted by user={}", id, identity.user_id);
        Ok(())
    }
}

fn ensure_writable(identity: &Identity) -> Result<(), ServiceError> {
    if identity.test_user {
        return Err(ServiceError::DemoUser);
    }
    Ok(())
}

fn validate<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|errors| ServiceError::ValidationError(flat_messages(&errors).join("; ")))
}
