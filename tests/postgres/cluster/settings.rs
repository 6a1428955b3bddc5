//! Reconciles bootstrap settings with what the running cluster actually uses.

use super::BoxError;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use postgresql_embedded::Settings;
use std::io::ErrorKind;
use std::path::Path;

/// Line of `postmaster.pid` holding the listening port.
const PID_FILE_PORT_LINE: usize = 3;

/// Replaces the generated password with the one `initdb` was given.
pub fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    let Some(contents) = read_optional(&settings.password_file)? else {
        return Ok(());
    };
    let password = contents.trim_end();
    if !password.is_empty() {
        password.clone_into(&mut settings.password);
    }
    Ok(())
}

/// Picks up the port the postmaster bound, which may differ from the request.
pub fn sync_port_from_pid(settings: &mut Settings) -> Result<(), BoxError> {
    let Some(contents) = read_optional(&settings.data_dir.join("postmaster.pid"))? else {
        return Ok(());
    };
    if let Some(port) = contents
        .lines()
        .nth(PID_FILE_PORT_LINE)
        .and_then(|line| line.trim().parse::<u16>().ok())
    {
        settings.port = port;
    }
    Ok(())
}

fn read_optional(path: &Path) -> Result<Option<String>, BoxError> {
    let (dir, file_name) = open_parent(path)?;
    match dir.read_to_string(file_name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Opens the directory containing `path` and returns it with the file name.
pub fn open_parent(path: &Path) -> Result<(Dir, &Path), BoxError> {
    let file_name = path
        .file_name()
        .map(Path::new)
        .ok_or_else(|| format!("{} has no file name", path.display()))?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}
