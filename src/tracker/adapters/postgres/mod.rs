//! `PostgreSQL` adapters for tracker persistence.

mod models;
mod repository;
mod schema;

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;

pub use repository::{PostgresTrackerRepository, TrackerPgPool};

/// DDL creating the `projects`, `sprints`, and `tasks` tables.
///
/// Every statement is idempotent, so applying it to an initialised database
/// is a no-op.
pub const SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_tracker_tables/up.sql");

/// Applies [`SCHEMA_SQL`] on `connection`.
///
/// # Errors
///
/// Returns the diesel error raised by the first failing statement.
pub fn apply_schema(connection: &mut PgConnection) -> diesel::QueryResult<()> {
    connection.batch_execute(SCHEMA_SQL)
}
