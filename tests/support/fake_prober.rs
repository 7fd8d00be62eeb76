// ABOUTME: Scripted Prober that records every call it receives.
// ABOUTME: Lets resolver and client tests assert exactly which probes ran and in what order.

use async_trait::async_trait;
use hatch::probe::{PermissionVerdict, Prober};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Permission,
    Capability(String, Vec<String>),
    Read(PathBuf),
}

pub struct FakeProber {
    permission: PermissionVerdict,
    capability: PermissionVerdict,
    readable: HashMap<PathBuf, PermissionVerdict>,
    delays: HashMap<PathBuf, Duration>,
    search_path: Option<OsString>,
    calls: Mutex<Vec<Call>>,
}

impl FakeProber {
    /// Subprocesses allowed, every binary present, nothing readable.
    pub fn new() -> Self {
        Self {
            permission: PermissionVerdict::granted(),
            capability: PermissionVerdict::granted().with_exit_code(Some(0)),
            readable: HashMap::new(),
            delays: HashMap::new(),
            search_path: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn permission(mut self, verdict: PermissionVerdict) -> Self {
        self.permission = verdict;
        self
    }

    /// Verdict returned for every capability probe.
    pub fn capability(mut self, verdict: PermissionVerdict) -> Self {
        self.capability = verdict;
        self
    }

    pub fn without_binaries(self) -> Self {
        self.capability(PermissionVerdict::unavailable("executable not found"))
    }

    pub fn readable(mut self, path: impl Into<PathBuf>) -> Self {
        self.readable.insert(path.into(), PermissionVerdict::granted());
        self
    }

    pub fn unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.readable
            .insert(path.into(), PermissionVerdict::denied("read access denied"));
        self
    }

    /// Delay the read probe for `path` so completion order differs from call order.
    pub fn slow(mut self, path: impl Into<PathBuf>, delay: Duration) -> Self {
        self.delays.insert(path.into(), delay);
        self
    }

    /// Where clients holding this prober look binaries up.
    pub fn search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn reads(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Read(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn capability_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Capability(..)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Prober for FakeProber {
    fn subprocess_permission(&self) -> PermissionVerdict {
        self.record(Call::Permission);
        self.permission.clone()
    }

    fn binary_search_path(&self) -> Option<OsString> {
        self.search_path.clone()
    }

    async fn subprocess_capability(&self, binary: &str, args: &[String]) -> PermissionVerdict {
        self.record(Call::Capability(binary.to_string(), args.to_vec()));
        self.capability.clone()
    }

    async fn read_permission(&self, path: &Path) -> PermissionVerdict {
        self.record(Call::Read(path.to_path_buf()));
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        self.readable
            .get(path)
            .cloned()
            .unwrap_or_else(|| PermissionVerdict::unavailable("path does not exist"))
            .with_path(path)
    }
}
