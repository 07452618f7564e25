pub mod dto;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod query;
pub mod service;
pub mod stats;

// Re-export commonly used types
pub use service::{JobService, JobSettings, UpdateValidation};
