//! # Project Files
//!
//! `.ild` files are pretty-printed JSON of a [`Project`]. Saves go through a
//! sibling `.ild.tmp` that is synced and then renamed over the target, so a
//! crash mid-write leaves the previous file intact. A `.ild.lock` sidecar,
//! held with an OS exclusive lock, keeps two sessions from writing the same
//! project.
//!
//! ```rust,no_run
//! use ild_core::file_io::{load_project, save_project, FileLock};
//! use std::path::Path;
//!
//! let path = Path::new("girders.ild");
//! let _lock = FileLock::acquire(path, "jane")?;
//! let mut project = load_project(path)?;
//! project.touch();
//! save_project(&project, path)?;
//! # Ok::<(), ild_core::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Locks older than this are considered abandoned
const STALE_LOCK_HOURS: i64 = 24;

/// Who holds a project, as written into the sidecar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    pub user_id: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    fn is_stale(&self) -> bool {
        Utc::now() - self.locked_at > Duration::hours(STALE_LOCK_HOURS)
    }
}

/// Exclusive hold on a project file. Dropping it removes the sidecar.
#[derive(Debug)]
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    // Keeps the OS lock alive
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Take the lock for `path`, failing with [`CalcError::FileLocked`] when
    /// another live session holds it.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = sidecar(path, "lock");
        if let Some(holder) = read_holder(&lock_path) {
            if !holder.is_stale() {
                return Err(locked_by(path, &holder));
            }
            warn!(path = %path.display(), holder = %holder.user_id, "replacing stale lock");
        }

        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| io_error("create lock", &lock_path, e))?;
        handle
            .try_lock_exclusive()
            .map_err(|_| CalcError::file_locked(path.display().to_string(), "another process", "unknown"))?;

        let info = LockInfo::new(user_id);
        let body = to_json(&info)?;
        handle
            .write_all(body.as_bytes())
            .and_then(|_| handle.sync_all())
            .map_err(|e| io_error("write lock", &lock_path, e))?;

        debug!(path = %path.display(), user = %info.user_id, "lock acquired");
        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current live holder of `path`, if any
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_holder(&sidecar(path, "lock")).filter(|holder| !holder.is_stale())
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Write `project` to `path` atomically.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let body = to_json(project)?;
    let tmp_path = sidecar(path, "tmp");

    let written = File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(body.as_bytes())?;
            file.sync_all()
        })
        .map_err(|e| io_error("write temp file", &tmp_path, e));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error("replace", path, e));
    }

    debug!(path = %path.display(), cases = project.case_count(), "project saved");
    Ok(())
}

/// Read a project, rejecting files written by a newer schema.
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path).map_err(|e| io_error("read", path, e))?;
    let project: Project = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("{} is not a valid project: {}", path.display(), e),
    })?;
    check_schema(&project.meta.version)?;

    debug!(path = %path.display(), cases = project.case_count(), "project loaded");
    Ok(project)
}

/// Load a project together with whoever currently holds its lock.
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Same major, and within 0.x no newer minor than ours
fn check_schema(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let (file_major, file_minor) = major_minor(file_version).ok_or_else(mismatch)?;
    let (major, minor) = major_minor(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}

fn major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().map_or(Some(0), |p| p.parse().ok())?;
    Some((major, minor))
}

/// `job.ild` -> `job.ild.<suffix>`
fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn read_holder(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn locked_by(path: &Path, holder: &LockInfo) -> CalcError {
    CalcError::file_locked(
        path.display().to_string(),
        format!("{} (pid {})", holder.user_id, holder.pid),
        holder.locked_at.to_rfc3339(),
    )
}

fn io_error(operation: &str, path: &Path, e: std::io::Error) -> CalcError {
    CalcError::file_error(operation, path.display().to_string(), e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> CalcResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })
}
