use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::api::job::models::{JobStatus, JobType};

/// Database representation of a job application with all fields
///
/// `status` and `job_type` are kept as the stored text so that grouping
/// works on whatever is actually in the table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: i32,
    pub company: String,
    pub position: String,
    pub status: String,
    pub job_type: String,
    pub job_location: String,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fully resolved values for an insert. The owner always comes from the
/// caller identity, never from the request body.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub job_type: JobType,
    pub job_location: String,
    pub created_by: String,
}

/// Changes applied by an update. `None` keeps the stored value.
#[derive(Debug, Clone)]
pub struct JobChanges {
    pub company: String,
    pub position: String,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
    pub job_location: Option<String>,
}

/// One `GROUP BY status` bucket
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// One `GROUP BY (year, month)` bucket over `created_at`
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct MonthCount {
    pub year: i32,
    pub month: i32,
    pub count: i64,
}
