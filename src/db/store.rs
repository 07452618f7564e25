use crate::api::job::pagination::Pagination;
use crate::api::job::query::JobQuery;
use crate::db::models::{JobChanges, JobRow, MonthCount, NewJob, StatusCount};

/// Persistence operations the job service needs.
///
/// Every single-record method takes the owner and must apply it inside the
/// query itself, so a record owned by someone else is indistinguishable from
/// a missing one.
pub trait JobStore {
    /// Cheap connectivity probe used by the health endpoints
    async fn ping(&self) -> Result<(), sqlx::Error>;

    /// Records matching `query`, ordered by its sort and windowed by `page`
    async fn find(&self, query: &JobQuery, page: &Pagination) -> Result<Vec<JobRow>, sqlx::Error>;

    /// Number of records matching `query`, ignoring pagination
    async fn count(&self, query: &JobQuery) -> Result<i64, sqlx::Error>;

    async fn insert(&self, job: &NewJob) -> Result<JobRow, sqlx::Error>;

    async fn find_owned(&self, id: i32, owner: &str) -> Result<Option<JobRow>, sqlx::Error>;

    async fn update_owned(
        &self,
        id: i32,
        owner: &str,
        changes: &JobChanges,
    ) -> Result<Option<JobRow>, sqlx::Error>;

    /// Hard delete. Returns the removed record, or `None` when nothing matched.
    async fn delete_owned(&self, id: i32, owner: &str) -> Result<Option<JobRow>, sqlx::Error>;

    /// Record counts per stored status string for one owner
    async fn status_counts(&self, owner: &str) -> Result<Vec<StatusCount>, sqlx::Error>;

    /// Record counts per creation (year, month) for one owner, in no particular order
    async fn monthly_counts(&self, owner: &str) -> Result<Vec<MonthCount>, sqlx::Error>;
}
