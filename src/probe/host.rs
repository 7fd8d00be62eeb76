// ABOUTME: Prober backed by the real host: PATH lookup, tokio subprocesses, access(2).
// ABOUTME: Each call is a single attempt; nothing is retried or cached.

use super::{PermissionVerdict, Prober};
use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Host policy for spawning subprocesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubprocessPolicy {
    #[default]
    Allow,
    Deny,
}

/// Find `binary` on `search_path` (or `$PATH` when `None`).
pub fn locate_binary(binary: &str, search_path: Option<&OsString>) -> Result<PathBuf, which::Error> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    match search_path {
        Some(paths) => which::which_in(binary, Some(paths), cwd),
        None => which::which(binary),
    }
}

/// Prober that inspects the machine this process runs on.
#[derive(Debug, Clone, Default)]
pub struct HostProber {
    policy: SubprocessPolicy,
    search_path: Option<OsString>,
}

impl HostProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(mut self, policy: SubprocessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Look binaries up in `paths` instead of `$PATH`.
    pub fn search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    fn effective_search_path(&self) -> Option<OsString> {
        self.search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))
    }
}

#[async_trait]
impl Prober for HostProber {
    fn subprocess_permission(&self) -> PermissionVerdict {
        if self.policy == SubprocessPolicy::Deny {
            return PermissionVerdict::denied("subprocess execution is disabled by policy");
        }

        match self.effective_search_path() {
            Some(_) => PermissionVerdict::granted(),
            None => PermissionVerdict::error(
                "cannot query subprocess permission: no search path configured and PATH is unset",
            ),
        }
    }

    fn binary_search_path(&self) -> Option<OsString> {
        self.search_path.clone()
    }

    async fn subprocess_capability(&self, binary: &str, args: &[String]) -> PermissionVerdict {
        let permission = self.subprocess_permission();
        if !permission.is_granted() {
            return permission;
        }

        let program = match locate_binary(binary, self.search_path.as_ref()) {
            Ok(program) => program,
            Err(e) => {
                tracing::debug!(binary, "binary not found: {}", e);
                return PermissionVerdict::unavailable(format!("{binary} not found: {e}"));
            }
        };

        let spawned = Command::new(&program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => return classify_spawn_error(binary, e),
        };

        match child.wait().await {
            Ok(status) => {
                tracing::debug!(binary, ?args, code = ?status.code(), "capability probe exited");
                PermissionVerdict::granted().with_exit_code(status.code())
            }
            Err(e) => PermissionVerdict::error(format!("failed waiting for {binary}: {e}")),
        }
    }

    async fn read_permission(&self, path: &Path) -> PermissionVerdict {
        let target = path.to_path_buf();
        let verdict = match tokio::task::spawn_blocking(move || check_read(&target)).await {
            Ok(verdict) => verdict,
            Err(e) => PermissionVerdict::error(format!("read probe did not complete: {e}")),
        };
        tracing::debug!(path = %path.display(), state = %verdict.state, "read probe");
        verdict.with_path(path)
    }
}

fn classify_spawn_error(binary: &str, e: io::Error) -> PermissionVerdict {
    match e.kind() {
        io::ErrorKind::NotFound => PermissionVerdict::unavailable(format!("{binary} not found: {e}")),
        io::ErrorKind::PermissionDenied => {
            PermissionVerdict::denied(format!("not allowed to run {binary}: {e}"))
        }
        _ => PermissionVerdict::error(format!("failed to spawn {binary}: {e}")),
    }
}

#[cfg(unix)]
fn check_read(path: &Path) -> PermissionVerdict {
    use nix::errno::Errno;
    use nix::unistd::{AccessFlags, access};

    match access(path, AccessFlags::R_OK) {
        Ok(()) => PermissionVerdict::granted(),
        Err(Errno::EACCES) | Err(Errno::EPERM) => PermissionVerdict::denied("read access denied"),
        Err(Errno::ENOENT) | Err(Errno::ENOTDIR) => {
            PermissionVerdict::unavailable("path does not exist")
        }
        Err(errno) => PermissionVerdict::error(format!("read access check failed: {errno}")),
    }
}

#[cfg(not(unix))]
fn check_read(path: &Path) -> PermissionVerdict {
    match std::fs::File::open(path) {
        Ok(_file) => PermissionVerdict::granted(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            PermissionVerdict::unavailable("path does not exist")
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            PermissionVerdict::denied("read access denied")
        }
        Err(e) => PermissionVerdict::error(format!("read access check failed: {e}")),
    }
}
