//! In-memory adapters for tracker persistence.

mod repository;

pub use repository::InMemoryTrackerRepository;
