//! Runs embedded `PostgreSQL` lifecycle steps on behalf of a root test runner.
//!
//! Usage:
//!
//! ```text
//! pg_worker <setup|start|stop> <payload-path>
//! ```
//!
//! The payload is a JSON [`WorkerPayload`] written by
//! `pg-embed-setup-unpriv`. When started as root the worker switches to the
//! `nobody` account before touching the cluster, since `initdb` and
//! `postgres` refuse to run as the superuser.

#[cfg(unix)]
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use nix::unistd::{Uid, User, initgroups, setgid, setuid};
#[cfg(unix)]
use pg_embedded_setup_unpriv::ambient_dir_and_path;
#[cfg(unix)]
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
#[cfg(unix)]
use postgresql_embedded::{PostgreSQL, Status};
#[cfg(unix)]
use std::ffi::CString;
#[cfg(unix)]
use std::io::Read;
#[cfg(unix)]
use thiserror::Error;


/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(unix)]
const UNPRIVILEGED_USER: &str = "nobody";

/// Failures reported by the worker process.
#[cfg(unix)]
#[derive(Debug, Error)]
enum WorkerError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("failed to read payload {path}: {source}")]
    PayloadRead {
        path: Utf8PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("failed to parse payload: {0}")]
    PayloadParse(#[from] serde_json::Error),
    #[error("invalid cluster settings: {0}")]
    Settings(String),
    #[error("failed to switch to user '{user}': {reason}")]
    Demote { user: String, reason: String },
    #[error("failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("{operation} failed: {reason}")]
    Lifecycle {
        operation: &'static str,
        reason: String,
    },
}

/// Lifecycle step requested by the caller.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Setup,
    Start,
    Stop,
}

#[cfg(unix)]
impl Operation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

#[cfg(unix)]
impl TryFrom<&str> for Operation {
    type Error = WorkerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(WorkerError::Usage(format!(
                "unknown operation '{other}', expected setup, start, or stop"
            ))),
        }
    }
}

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    let args = std::env::args_os()
        .map(|arg| {
            arg.into_string()
                .map_err(|_| WorkerError::Usage("arguments must be valid UTF-8".to_owned()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let (operation, payload_path) = parse_args(args.iter().skip(1).map(String::as_str))?;
    run(operation, &payload_path)?;
    Ok(())
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker only runs on Unix hosts".into())
}

#[cfg(unix)]
fn parse_args<'a>(
    mut args: impl Iterator<Item = &'a str>,
) -> Result<(Operation, Utf8PathBuf), WorkerError> {
    let operation = args
        .next()
        .ok_or_else(|| WorkerError::Usage("missing operation".to_owned()))
        .and_then(Operation::try_from)?;
    let payload_path = args
        .next()
        .map(Utf8PathBuf::from)
        .ok_or_else(|| WorkerError::Usage("missing payload path".to_owned()))?;
    if let Some(extra) = args.next() {
        return Err(WorkerError::Usage(format!("unexpected argument '{extra}'")));
    }
    Ok((operation, payload_path))
}

#[cfg(unix)]
fn run(operation: Operation, payload_path: &Utf8Path) -> Result<(), WorkerError> {
    let payload = read_payload(payload_path)?;
    demote_if_root(UNPRIVILEGED_USER)?;
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| WorkerError::Settings(err.to_string()))?;
    apply_environment(&payload.environment);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::Runtime)?;
    let mut postgres = PostgreSQL::new(settings);
    runtime.block_on(async {
        match operation {
            Operation::Setup => {
                postgres.setup().await.map_err(lifecycle(operation))?;
                start_unless_running(&mut postgres, operation).await
            }
            Operation::Start => start_unless_running(&mut postgres, operation).await,
            Operation::Stop => postgres.stop().await.map_err(lifecycle(operation)),
        }
    })?;

    // Dropping the handle would stop the server this process just started.
    if operation != Operation::Stop {
        std::mem::forget(postgres);
    }
    Ok(())
}

#[cfg(unix)]
async fn start_unless_running(
    postgres: &mut PostgreSQL,
    operation: Operation,
) -> Result<(), WorkerError> {
    if matches!(postgres.status(), Status::Started) {
        return Ok(());
    }
    postgres.start().await.map_err(lifecycle(operation))
}

#[cfg(unix)]
fn lifecycle<E: std::fmt::Display>(operation: Operation) -> impl Fn(E) -> WorkerError {
    move |err| WorkerError::Lifecycle {
        operation: operation.as_str(),
        reason: err.to_string(),
    }
}

#[cfg(unix)]
fn read_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
    let read_error = |source: BoxError| WorkerError::PayloadRead {
        path: path.to_owned(),
        source,
    };
    let (dir, relative) = ambient_dir_and_path(path).map_err(|err| read_error(err.into()))?;
    let mut file = dir
        .open(relative.as_std_path())
        .map_err(|err| read_error(err.into()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|err| read_error(err.into()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(unix)]
fn demote_if_root(username: &str) -> Result<(), WorkerError> {
    if !Uid::effective().is_root() {
        return Ok(());
    }
    let demote_error = |reason: String| WorkerError::Demote {
        user: username.to_owned(),
        reason,
    };

    let user = User::from_name(username)
        .map_err(|err| demote_error(err.to_string()))?
        .ok_or_else(|| demote_error("no such user".to_owned()))?;
    let name = CString::new(user.name.as_str()).map_err(|err| demote_error(err.to_string()))?;
    initgroups(&name, user.gid).map_err(|err| demote_error(err.to_string()))?;
    setgid(user.gid).map_err(|err| demote_error(err.to_string()))?;
    setuid(user.uid).map_err(|err| demote_error(err.to_string()))?;

    // SAFETY: no other threads exist yet; the runtime is built afterwards.
    unsafe {
        std::env::set_var("HOME", &user.dir);
        std::env::set_var("USER", &user.name);
        std::env::set_var("LOGNAME", &user.name);
    }
    Ok(())
}

#[cfg(unix)]
fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
    for (key, value) in environment {
        // SAFETY: no other threads exist yet; the runtime is built afterwards.
        unsafe {
            match value {
                Some(secret) => std::env::set_var(key, secret.expose()),
                None => std::env::remove_var(key),
            }
        }
    }
}
