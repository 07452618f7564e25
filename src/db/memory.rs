use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{Datelike, NaiveDateTime, Utc};

use crate::api::job::pagination::Pagination;
use crate::api::job::query::JobQuery;
use crate::db::models::{JobChanges, JobRow, MonthCount, NewJob, StatusCount};
use crate::db::store::JobStore;

#[derive(Default)]
struct State {
    next_id: i32,
    rows: Vec<JobRow>,
}

/// In-process job store evaluating queries with the same semantics as the
/// PostgreSQL repository
#[derive(Default)]
pub struct MemoryJobStore {
    state: Mutex<State>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with an explicit creation time
    pub fn insert_at(&self, job: &NewJob, created_at: NaiveDateTime) -> JobRow {
        self.push_row(JobRow {
            id: 0,
            company: job.company.clone(),
            position: job.position.clone(),
            status: job.status.as_str().to_string(),
            job_type: job.job_type.as_str().to_string(),
            job_location: job.job_location.clone(),
            created_by: job.created_by.clone(),
            created_at,
            updated_at: created_at,
        })
    }

    /// Store a raw row as-is apart from assigning its id
    pub fn push_row(&self, mut row: JobRow) -> JobRow {
        let mut state = self.state.lock().expect("memory store poisoned");
        state.next_id += 1;
        row.id = state.next_id;
        state.rows.push(row.clone());
        row
    }

    pub fn len(&self) -> usize {
        self.state.lock().expect("memory store poisoned").rows.len()
    }
}

impl JobStore for MemoryJobStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn find(&self, query: &JobQuery, page: &Pagination) -> Result<Vec<JobRow>, sqlx::Error> {
        let state = self.state.lock().expect("memory store poisoned");
        let mut rows: Vec<JobRow> = state
            .rows
            .iter()
            .filter(|row| query.matches(row))
            .cloned()
            .collect();

        if let Some(sort) = query.sort {
            rows.sort_by(|a, b| sort.compare(a, b));
        }

        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self, query: &JobQuery) -> Result<i64, sqlx::Error> {
        let state = self.state.lock().expect("memory store poisoned");
        Ok(state.rows.iter().filter(|row| query.matches(row)).count() as i64)
    }

    async fn insert(&self, job: &NewJob) -> Result<JobRow, sqlx::Error> {
        Ok(self.insert_at(job, Utc::now().naive_utc()))
    }

    async fn find_owned(&self, id: i32, owner: &str) -> Result<Option<JobRow>, sqlx::Error> {
        let state = self.state.lock().expect("memory store poisoned");
        Ok(state
            .rows
            .iter()
            .find(|row| row.id == id && row.created_by == owner)
            .cloned())
    }

    async fn update_owned(
        &self,
        id: i32,
        owner: &str,
        changes: &JobChanges,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        let mut state = self.state.lock().expect("memory store poisoned");
        let Some(row) = state
            .rows
            .iter_mut()
            .find(|row| row.id == id && row.created_by == owner)
        else {
            return Ok(None);
        };

        row.company = changes.company.clone();
        row.position = changes.position.clone();
        if let Some(status) = changes.status {
            row.status = status.as_str().to_string();
        }
        if let Some(job_type) = changes.job_type {
            row.job_type = job_type.as_str().to_string();
        }
        if let Some(location) = &changes.job_location {
            row.job_location = location.clone();
        }
        row.updated_at = Utc::now().naive_utc();
        Ok(Some(row.clone()))
    }

    async fn delete_owned(&self, id: i32, owner: &str) -> Result<Option<JobRow>, sqlx::Error> {
        let mut state = self.state.lock().expect("memory store poisoned");
        let position = state
            .rows
            .iter()
            .position(|row| row.id == id && row.created_by == owner);
        Ok(position.map(|index| state.rows.remove(index)))
    }

    async fn status_counts(&self, owner: &str) -> Result<Vec<StatusCount>, sqlx::Error> {
        let state = self.state.lock().expect("memory store poisoned");
        let mut groups: BTreeMap<&str, i64> = BTreeMap::new();
        for row in state.rows.iter().filter(|row| row.created_by == owner) {
            *groups.entry(row.status.as_str()).or_default() += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count,
            })
            .collect())
    }

    async fn monthly_counts(&self, owner: &str) -> Result<Vec<MonthCount>, sqlx::Error> {
        let state = self.state.lock().expect("memory store poisoned");
        let mut groups: BTreeMap<(i32, i32), i64> = BTreeMap::new();
        for row in state.rows.iter().filter(|row| row.created_by == owner) {
            let key = (row.created_at.year(), row.created_at.month() as i32);
            *groups.entry(key).or_default() += 1;
        }
        Ok(groups
            .into_iter()
            .map(|((year, month), count)| MonthCount { year, month, count })
            .collect())
    }
}
