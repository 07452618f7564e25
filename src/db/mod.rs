pub mod connection;
pub mod job_repository;
#[cfg(test)]
pub mod memory;
pub mod migrations;
pub mod models;
pub mod store;

pub use job_repository::PgJobStore;
