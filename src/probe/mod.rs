// ABOUTME: Permission prober for subprocess and filesystem capabilities.
// ABOUTME: Answers "may this process run X / read Y" without mutating host state.

mod host;
mod verdict;

pub use host::{HostProber, SubprocessPolicy, locate_binary};
pub use verdict::{PermissionState, PermissionVerdict};

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Capability queries consulted by the resolver and the CLI client guard.
///
/// [`Prober::subprocess_capability`] really spawns the binary, so it must not
/// be called in a loop.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Whether this process may spawn subprocesses at all. Spawns nothing.
    fn subprocess_permission(&self) -> PermissionVerdict;

    /// Where binaries are looked up; `None` means `$PATH`.
    ///
    /// Anything that runs a binary the prober vetted must look it up here.
    fn binary_search_path(&self) -> Option<OsString> {
        None
    }

    /// Spawn `binary args`, discard its output and wait for it.
    ///
    /// A process that ran is `Granted` whatever its exit code; the code is
    /// kept on the verdict.
    async fn subprocess_capability(&self, binary: &str, args: &[String]) -> PermissionVerdict;

    /// Whether `path` is readable. The verdict always records `path`.
    async fn read_permission(&self, path: &Path) -> PermissionVerdict;

    /// [`Prober::read_permission`] for each path, concurrently, in input order.
    ///
    /// Empty on platforms without Unix domain sockets.
    async fn read_permissions(&self, paths: &[PathBuf]) -> Vec<PermissionVerdict> {
        if !cfg!(unix) {
            return Vec::new();
        }
        futures::future::join_all(paths.iter().map(|path| self.read_permission(path))).await
    }
}
