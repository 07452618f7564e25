use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;

use crate::api::job::pagination::Pagination;
use crate::api::job::query::{JobQuery, JobSort};
use crate::db::models::{JobChanges, JobRow, MonthCount, NewJob, StatusCount};
use crate::db::store::JobStore;

const JOB_COLUMNS: &str =
    "id, company, position, status, job_type, job_location, created_by, created_at, updated_at";

/// Timestamps are stored as UTC wall-clock time in `TIMESTAMP` columns,
/// independent of the session's TimeZone setting
const UTC_NOW: &str = "NOW() AT TIME ZONE 'UTC'";

/// PostgreSQL-backed job repository
#[derive(Clone)]
pub struct PgJobStore {
    pool: Pool<Postgres>,
}

impl PgJobStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Escape `%`, `_` and `\` so the search term is matched literally by ILIKE
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append the WHERE clause for `query`. The owner constraint is always present.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, query: &JobQuery) {
    builder
        .push(" WHERE created_by = ")
        .push_bind(query.owner.clone());

    if let Some(search) = &query.search {
        builder
            .push(" AND position ILIKE ")
            .push_bind(format!("%{}%", escape_like(search)));
    }
    if let Some(status) = &query.status {
        builder.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(job_type) = &query.job_type {
        builder.push(" AND job_type = ").push_bind(job_type.clone());
    }
}

fn insert_sql() -> String {
    format!(
        r#"
        INSERT INTO jobs (company, position, status, job_type, job_location, created_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, {now}, {now})
        RETURNING {columns}
        "#,
        now = UTC_NOW,
        columns = JOB_COLUMNS
    )
}

fn update_sql() -> String {
    format!(
        r#"
        UPDATE jobs
        SET company = $3,
            position = $4,
            status = COALESCE($5, status),
            job_type = COALESCE($6, job_type),
            job_location = COALESCE($7, job_location),
            updated_at = {now}
        WHERE id = $1 AND created_by = $2
        RETURNING {columns}
        "#,
        now = UTC_NOW,
        columns = JOB_COLUMNS
    )
}

fn order_clause(sort: Option<JobSort>) -> &'static str {
    // Positions compare bytewise so the order matches the in-process comparator
    match sort {
        Some(JobSort::Latest) => " ORDER BY created_at DESC, id DESC",
        Some(JobSort::Oldest) => " ORDER BY created_at ASC, id ASC",
        Some(JobSort::AToZ) => " ORDER BY position COLLATE \"C\" ASC, id ASC",
        Some(JobSort::ZToA) => " ORDER BY position COLLATE \"C\" DESC, id DESC",
        None => " ORDER BY id ASC",
    }
}

impl JobStore for PgJobStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find(&self, query: &JobQuery, page: &Pagination) -> Result<Vec<JobRow>, sqlx::Error> {
        debug!(
            "Finding jobs: owner={}, search={:?}, status={:?}, job_type={:?}, sort={:?}, skip={}, limit={}",
            query.owner,
            query.search,
            query.status,
            query.job_type,
            query.sort,
            page.skip(),
            page.limit()
        );

        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM jobs", JOB_COLUMNS));
        push_filter(&mut builder, query);
        builder.push(order_clause(query.sort));
        builder
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.skip());

        let rows = builder
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!("Found {} jobs", rows.len());
        Ok(rows)
    }

    async fn count(&self, query: &JobQuery) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_filter(&mut builder, query);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
    }

    async fn insert(&self, job: &NewJob) -> Result<JobRow, sqlx::Error> {
        debug!(
            "Creating job: company={}, position={}, status={}, owner={}",
            job.company,
            job.position,
            job.status.as_str(),
            job.created_by
        );

        let row = sqlx::query_as::<_, JobRow>(&insert_sql())
        .bind(&job.company)
        .bind(&job.position)
        .bind(job.status.as_str())
        .bind(job.job_type.as_str())
        .bind(&job.job_location)
        .bind(&job.created_by)
        .fetch_one(&self.pool)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    async fn find_owned(&self, id: i32, owner: &str) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs WHERE id = $1 AND created_by = $2",
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_owned(
        &self,
        id: i32,
        owner: &str,
        changes: &JobChanges,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Updating job: id={}, owner={}", id, owner);

        sqlx::query_as::<_, JobRow>(&update_sql())
        .bind(id)
        .bind(owner)
        .bind(&changes.company)
        .bind(&changes.position)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.job_type.map(|t| t.as_str()))
        .bind(changes.job_location.as_deref())
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_owned(&self, id: i32, owner: &str) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Deleting job: id={}, owner={}", id, owner);

        sqlx::query_as::<_, JobRow>(&format!(
            "DELETE FROM jobs WHERE id = $1 AND created_by = $2 RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
    }

    async fn status_counts(&self, owner: &str) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM jobs
            WHERE created_by = $1
            GROUP BY status
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
    }

    async fn monthly_counts(&self, owner: &str) -> Result<Vec<MonthCount>, sqlx::Error> {
        sqlx::query_as::<_, MonthCount>(
            r#"
            SELECT EXTRACT(YEAR FROM created_at)::INT AS year,
                   EXTRACT(MONTH FROM created_at)::INT AS month,
                   COUNT(*) AS count
            FROM jobs
            WHERE created_by = $1
            GROUP BY 1, 2
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
    }
}
