//! Shared test helpers for `PostgreSQL` integration tests.

use std::sync::Arc;

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::{Connection, PgConnection};
use mockable::DefaultClock;
use rstest::fixture;
use sprintboard::tracker::{
    adapters::postgres::{PostgresTrackerRepository, TrackerPgPool, apply_schema},
    domain::{OwnerIdentity, RequestContext},
    services::TrackerService,
};
use uuid::Uuid;

pub use super::cluster::BoxError;
use super::cluster::{PostgresCluster, TemporaryDatabase, postgres_cluster};

/// Template database holding the migrated tracker schema.
pub const TEMPLATE_DB: &str = "sprintboard_test_template";

/// Service type backed by `PostgreSQL`.
pub type PgService = TrackerService<PostgresTrackerRepository, DefaultClock>;

/// Repository and service sharing one pool over a private database.
pub struct PgContext {
    pub repository: Arc<PostgresTrackerRepository>,
    pub service: PgService,
    // Declared last so the pool above closes before the database is dropped.
    _database: TemporaryDatabase,
}

/// Creates the schema template once per cluster.
///
/// # Errors
///
/// Returns an error if the template cannot be created or migrated.
pub fn ensure_template(cluster: PostgresCluster) -> Result<(), BoxError> {
    cluster.ensure_template(TEMPLATE_DB, |url| {
        let mut connection = PgConnection::establish(url)?;
        apply_schema(&mut connection)?;
        Ok(())
    })
}

/// Provides a repository over a fresh database cloned from the template.
#[fixture]
pub async fn context(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> Result<PgContext, BoxError> {
    let cluster = postgres_cluster?;
    let database = tokio::task::spawn_blocking(move || {
        ensure_template(cluster)?;
        cluster.temporary_database(TEMPLATE_DB)
    })
    .await??;

    let manager = ConnectionManager::<PgConnection>::new(database.url());
    let pool: TrackerPgPool = Pool::builder().max_size(2).build(manager)?;
    let repository = Arc::new(PostgresTrackerRepository::new(pool));
    let service = TrackerService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    Ok(PgContext {
        repository,
        service,
        _database: database,
    })
}

/// Returns an owner identity no other test uses.
///
/// # Errors
///
/// Returns an error if the generated identity is rejected.
pub fn unique_owner(label: &str) -> Result<OwnerIdentity, BoxError> {
    Ok(OwnerIdentity::new(format!("{label}-{}@example.com", Uuid::new_v4()))?)
}

/// Builds a request context for a fresh owner.
///
/// # Errors
///
/// Returns an error if the generated identity is rejected.
pub fn unique_context(label: &str) -> Result<RequestContext, BoxError> {
    Ok(RequestContext::authenticated(unique_owner(label)?))
}
