use std::cmp::Ordering;

use crate::api::auth::Identity;
use crate::db::models::JobRow;

/// Filter value meaning "no constraint" for status and job type
pub const ALL: &str = "all";

/// Raw list parameters as they arrive on the query string
#[derive(Debug, Default, Clone)]
pub struct ListJobsParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub job_type: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListJobsParams {
    /// Collect decoded query pairs. When a key repeats, the first value wins;
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search" => &mut params.search,
                "status" => &mut params.status,
                "jobType" => &mut params.job_type,
                "sort" => &mut params.sort,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSort {
    /// Newest first
    Latest,
    Oldest,
    /// Position ascending
    AToZ,
    ZToA,
}

impl JobSort {
    /// Only the four literal values are recognized; anything else means no ordering
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "latest" => Some(JobSort::Latest),
            "oldest" => Some(JobSort::Oldest),
            "a-z" => Some(JobSort::AToZ),
            "z-a" => Some(JobSort::ZToA),
            _ => None,
        }
    }

    pub fn compare(&self, a: &JobRow, b: &JobRow) -> Ordering {
        match self {
            JobSort::Latest => b.created_at.cmp(&a.created_at),
            JobSort::Oldest => a.created_at.cmp(&b.created_at),
            JobSort::AToZ => a.position.as_bytes().cmp(b.position.as_bytes()),
            JobSort::ZToA => b.position.as_bytes().cmp(a.position.as_bytes()),
        }
    }
}

/// Filter predicate plus ordering for a list request.
///
/// `owner` is mandatory. Status and job type are compared against the stored
/// text, so an unrecognized value is still a constraint and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub owner: String,
    pub search: Option<String>,
    pub status: Option<String>,
    pub job_type: Option<String>,
    pub sort: Option<JobSort>,
}

impl JobQuery {
    /// Every record of one owner, in default order
    pub fn owned_by(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            search: None,
            status: None,
            job_type: None,
            sort: None,
        }
    }

    pub fn from_params(identity: &Identity, params: &ListJobsParams) -> Self {
        Self {
            search: params.search.clone().filter(|s| !s.is_empty()),
            status: equality_constraint(params.status.as_deref()),
            job_type: equality_constraint(params.job_type.as_deref()),
            sort: params.sort.as_deref().and_then(JobSort::parse),
            ..Self::owned_by(&identity.user_id)
        }
    }

    pub fn matches(&self, row: &JobRow) -> bool {
        if row.created_by != self.owner {
            return false;
        }
        if let Some(search) = &self.search {
            if !row.position.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &row.status != status {
                return false;
            }
        }
        if let Some(job_type) = &self.job_type {
            if &row.job_type != job_type {
                return false;
            }
        }
        true
    }
}

fn equality_constraint(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty() && *v != ALL)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(id: i32, owner: &str, position: &str, status: &str, day: u32) -> JobRow {
        let created_at = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        JobRow {
            id,
            company: "Acme".to_string(),
            position: position.to_string(),
            status: status.to_string(),
            job_type: "full-time".to_string(),
            job_location: "my city".to_string(),
            created_by: owner.to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    fn params(pairs: &[(&str, &str)]) -> ListJobsParams {
        ListJobsParams::from_pairs(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        )
    }

    #[test]
    fn all_sentinel_is_no_constraint() {
        let identity = Identity::new("alice");
        let with_all = JobQuery::from_params(&identity, &params(&[("status", "all"), ("jobType", "all")]));
        let without = JobQuery::from_params(&identity, &ListJobsParams::default());
        assert_eq!(with_all, without);
        assert_eq!(without, JobQuery::owned_by("alice"));
    }

    #[test]
    fn unknown_status_matches_nothing() {
        let query = JobQuery::from_params(&Identity::new("alice"), &params(&[("status", "hired")]));
        assert_eq!(query.status.as_deref(), Some("hired"));
        assert!(!query.matches(&row(1, "alice", "Engineer", "pending", 1)));
    }

    #[test]
    fn search_is_case_insensitive_substring_on_position() {
        let query = JobQuery::from_params(&Identity::new("alice"), &params(&[("search", "ENG")]));
        assert!(query.matches(&row(1, "alice", "Senior Engineer", "pending", 1)));
        assert!(!query.matches(&row(2, "alice", "Analyst", "pending", 1)));
        assert!(!query.matches(&row(3, "bob", "Engineer", "pending", 1)));
    }

    #[test]
    fn empty_search_is_ignored() {
        let query = JobQuery::from_params(&Identity::new("alice"), &params(&[("search", "")]));
        assert_eq!(query.search, None);
    }

    #[test]
    fn only_literal_sort_values_are_recognized() {
        assert_eq!(JobSort::parse("latest"), Some(JobSort::Latest));
        assert_eq!(JobSort::parse("z-a"), Some(JobSort::ZToA));
        assert_eq!(JobSort::parse("Latest"), None);
        assert_eq!(JobSort::parse("newest"), None);
    }

    #[test]
    fn z_a_orders_positions_descending() {
        let mut rows = vec![
            row(1, "alice", "Engineer", "pending", 1),
            row(2, "alice", "Analyst", "pending", 2),
            row(3, "alice", "Director", "pending", 3),
        ];
        rows.sort_by(|a, b| JobSort::ZToA.compare(a, b));
        let positions: Vec<&str> = rows.iter().map(|r| r.position.as_str()).collect();
        assert_eq!(positions, ["Engineer", "Director", "Analyst"]);
    }

    #[test]
    fn latest_orders_newest_first() {
        let mut rows = vec![
            row(1, "alice", "A", "pending", 1),
            row(2, "alice", "B", "pending", 9),
            row(3, "alice", "C", "pending", 5),
        ];
        rows.sort_by(|a, b| JobSort::Latest.compare(a, b));
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, [2, 3, 1]);
    }

    #[test]
    fn job_type_is_an_equality_constraint() {
        let remote = JobRow {
            job_type: "remote".to_string(),
            ..row(1, "alice", "Engineer", "pending", 1)
        };
        let full_time = row(2, "alice", "Engineer", "pending", 1);

        let query = JobQuery::from_params(&Identity::new("alice"), &params(&[("jobType", "remote")]));
        assert!(query.matches(&remote));
        assert!(!query.matches(&full_time));

        let query = JobQuery::from_params(&Identity::new("alice"), &params(&[("jobType", "contract")]));
        assert!(!query.matches(&remote));
        assert!(!query.matches(&full_time));
    }

    #[test]
    fn oldest_orders_earliest_first() {
        let mut rows = vec![
            row(1, "alice", "A", "pending", 7),
            row(2, "alice", "B", "pending", 2),
            row(3, "alice", "C", "pending", 4),
        ];
        rows.sort_by(|a, b| JobSort::Oldest.compare(a, b));
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, [2, 3, 1]);
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let params = params(&[
            ("status", "declined"),
            ("status", "pending"),
            ("jobType", "remote"),
            ("limit", "5"),
            ("limit", "50"),
            ("createdBy", "mallory"),
        ]);
        assert_eq!(params.status.as_deref(), Some("declined"));
        assert_eq!(params.job_type.as_deref(), Some("remote"));
        assert_eq!(params.limit.as_deref(), Some("5"));
        assert_eq!(params.page, None);
    }
}
