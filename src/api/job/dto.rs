use serde::{Deserialize, Serialize};

use crate::api::job::stats::{DefaultStats, MonthlyApplication};
use crate::db::models::JobRow;

/// Response carrying a single job
#[derive(Serialize, Deserialize, Debug)]
pub struct JobResponse {
    pub job: JobRow,
}

/// One page of the caller's jobs plus totals over the whole filtered set
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JobList {
    pub jobs: Vec<JobRow>,
    pub total_jobs: i64,
    pub num_of_pages: i64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub default_stats: DefaultStats,
    pub monthly_applications: Vec<MonthlyApplication>,
}
