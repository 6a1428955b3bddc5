//! Environment needed before `bootstrap_for_tests` runs.

use super::BoxError;
use super::settings::open_parent;
use crate::test_helpers::EnvChange;
use pg_embedded_setup_unpriv::{ExecutionPrivileges, detect_execution_privileges};
use std::ffi::OsString;
use std::net::TcpListener;
use std::path::{Path, PathBuf};

const WORKER_ENV: &str = "PG_EMBEDDED_WORKER";
const PORT_ENV: &str = "PG_PORT";
const WORKER_NAME: &str = "pg_worker";

/// Returns the variables to set while bootstrapping the cluster.
///
/// A free port is reserved unless `PG_PORT` is already set. Under root the
/// `pg_worker` binary is copied somewhere the unprivileged account can execute
/// it and exported as `PG_EMBEDDED_WORKER`.
pub fn bootstrap_env() -> Result<Vec<EnvChange>, BoxError> {
    let mut changes: Vec<EnvChange> = Vec::new();
    if std::env::var_os(PORT_ENV).is_none() {
        changes.push((OsString::from(PORT_ENV), Some(OsString::from(free_port()?))));
    }

    let needs_worker = matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && std::env::var_os(WORKER_ENV).is_none();
    if needs_worker {
        let source = locate_worker()
            .ok_or_else(|| format!("{WORKER_NAME} binary not found and {WORKER_ENV} is unset"))?;
        let prepared = publish_worker(&source)?;
        changes.push((OsString::from(WORKER_ENV), Some(prepared.into_os_string())));
    }
    Ok(changes)
}

fn free_port() -> Result<String, BoxError> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port().to_string())
}

fn locate_worker() -> Option<PathBuf> {
    option_env!("CARGO_BIN_EXE_pg_worker")
        .map(PathBuf::from)
        .filter(|path| path.is_file())
        .or_else(worker_beside_test_binary)
        .or_else(worker_on_path)
}

fn worker_beside_test_binary() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let profile_dir = exe.parent()?.parent()?;
    let candidate = profile_dir.join(WORKER_NAME);
    candidate.is_file().then_some(candidate)
}

fn worker_on_path() -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(WORKER_NAME))
        .find(|candidate| candidate.is_file())
}

/// Copies the worker into the temp directory with world-executable mode.
fn publish_worker(source: &Path) -> Result<PathBuf, BoxError> {
    let destination =
        std::env::temp_dir().join(format!("sprintboard_{WORKER_NAME}_{}", std::process::id()));
    let (source_dir, source_name) = open_parent(source)?;
    let (destination_dir, destination_name) = open_parent(&destination)?;

    if destination_dir.exists(destination_name) {
        destination_dir.remove_file(destination_name)?;
    }
    source_dir.copy(source_name, &destination_dir, destination_name)?;

    #[cfg(unix)]
    {
        use cap_std::fs::{Permissions, PermissionsExt};
        destination_dir.set_permissions(destination_name, Permissions::from_mode(0o755))?;
    }
    Ok(destination)
}
