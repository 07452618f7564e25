use chrono::NaiveDate;
use serde::Serialize;

use crate::api::job::models::JobStatus;
use crate::db::models::{MonthCount, StatusCount};

/// How many of the most recent creation months are reported
pub const MONTHS_SHOWN: usize = 6;

/// Per-status totals; always carries all three keys
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DefaultStats {
    pub pending: i64,
    pub interview: i64,
    pub declined: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyApplication {
    /// "Mon YYYY", e.g. "Aug 2024"
    pub date: String,
    pub count: i64,
}

/// Reshape status groups into the fixed summary. Statuses outside the
/// known set are dropped.
pub fn default_stats(groups: &[StatusCount]) -> DefaultStats {
    let mut stats = DefaultStats::default();
    for group in groups {
        match JobStatus::parse(&group.status) {
            Some(JobStatus::Pending) => stats.pending = group.count,
            Some(JobStatus::Interview) => stats.interview = group.count,
            Some(JobStatus::Declined) => stats.declined = group.count,
            None => {}
        }
    }
    stats
}

/// Keep the most recent `MONTHS_SHOWN` (year, month) groups and return them
/// oldest first.
pub fn monthly_applications(mut groups: Vec<MonthCount>) -> Vec<MonthlyApplication> {
    groups.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
    groups.truncate(MONTHS_SHOWN);

    groups
        .into_iter()
        .rev()
        .map(|group| MonthlyApplication {
            date: month_label(group.year, group.month),
            count: group.count,
        })
        .collect()
}

fn month_label(year: i32, month: i32) -> String {
    u32::try_from(month)
        .ok()
        .and_then(|m| NaiveDate::from_ymd_opt(year, m, 1))
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{:02} {}", month, year))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: &str, count: i64) -> StatusCount {
        StatusCount {
            status: status.to_string(),
            count,
        }
    }

    fn month(year: i32, month: i32, count: i64) -> MonthCount {
        MonthCount { year, month, count }
    }

    #[test]
    fn missing_statuses_default_to_zero() {
        let stats = default_stats(&[status("pending", 2), status("interview", 1)]);
        assert_eq!(
            stats,
            DefaultStats {
                pending: 2,
                interview: 1,
                declined: 0
            }
        );
    }

    #[test]
    fn unknown_statuses_are_dropped() {
        let stats = default_stats(&[status("archived", 4), status("Declined", 1), status("declined", 3)]);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.declined, 3);
    }

    #[test]
    fn summary_serializes_all_three_keys() {
        let value = serde_json::to_value(default_stats(&[])).unwrap();
        assert_eq!(value, serde_json::json!({"pending": 0, "interview": 0, "declined": 0}));
    }

    #[test]
    fn keeps_six_most_recent_months_in_chronological_order() {
        let groups = vec![
            month(2023, 11, 1),
            month(2024, 3, 2),
            month(2023, 12, 5),
            month(2024, 1, 1),
            month(2023, 9, 7),
            month(2024, 2, 4),
            month(2023, 10, 3),
        ];

        let series = monthly_applications(groups);
        let labels: Vec<&str> = series.iter().map(|m| m.date.as_str()).collect();
        assert_eq!(
            labels,
            ["Oct 2023", "Nov 2023", "Dec 2023", "Jan 2024", "Feb 2024", "Mar 2024"]
        );
        assert_eq!(series[0].count, 3);
        assert_eq!(series[5].count, 2);
    }

    #[test]
    fn fewer_than_six_months_are_all_kept() {
        let series = monthly_applications(vec![month(2024, 8, 2), month(2024, 7, 1)]);
        assert_eq!(
            series,
            vec![
                MonthlyApplication {
                    date: "Jul 2024".to_string(),
                    count: 1
                },
                MonthlyApplication {
                    date: "Aug 2024".to_string(),
                    count: 2
                },
            ]
        );
        assert!(monthly_applications(Vec::new()).is_empty());
    }
}
