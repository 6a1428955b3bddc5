//! Port contracts for project tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by tracker services.

pub mod repository;

pub use repository::{TrackerRepository, TrackerRepositoryError, TrackerRepositoryResult};

#[cfg(test)]
pub use repository::MockTrackerRepository;
