use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Where an application currently stands
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Interview,
    Declined,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::Pending, JobStatus::Interview, JobStatus::Declined];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Interview => "interview",
            JobStatus::Declined => "declined",
        }
    }

    /// Exact, case-sensitive match against the stored representation
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Remote,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Remote => "remote",
            JobType::Internship => "internship",
        }
    }
}

/// Request body for creating a job application
///
/// Unknown fields (including any attempt to set the owner) are ignored.
/// Free-text fields are trimmed while decoding, so the length bounds apply
/// to the trimmed values.
#[derive(Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJob {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Company must be between 1 and 50 characters"
    ))]
    #[serde(deserialize_with = "trimmed")]
    pub company: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Position must be between 1 and 100 characters"
    ))]
    #[serde(deserialize_with = "trimmed")]
    pub position: String,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
    #[serde(default, deserialize_with = "trimmed_location")]
    pub job_location: Option<String>,
}

impl CreateJob {
    /// Trim free-text fields; a blank location counts as absent
    pub fn normalized(self) -> Self {
        Self {
            company: self.company.trim().to_string(),
            position: self.position.trim().to_string(),
            job_location: normalize_location(self.job_location),
            ..self
        }
    }
}

/// Request body for updating a job application
#[derive(Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJob {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Company must be between 1 and 50 characters"
    ))]
    #[serde(deserialize_with = "trimmed")]
    pub company: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Position must be between 1 and 100 characters"
    ))]
    #[serde(deserialize_with = "trimmed")]
    pub position: String,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
    #[serde(default, deserialize_with = "trimmed_location")]
    pub job_location: Option<String>,
}

impl UpdateJob {
    pub fn normalized(self) -> Self {
        Self {
            company: self.company.trim().to_string(),
            position: self.position.trim().to_string(),
            job_location: normalize_location(self.job_location),
            ..self
        }
    }
}

fn normalize_location(location: Option<String>) -> Option<String> {
    location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

fn trimmed_location<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer).map(normalize_location)
}
