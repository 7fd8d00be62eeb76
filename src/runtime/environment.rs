// ABOUTME: Snapshot of the process environment used for socket-path defaulting.
// ABOUTME: Reads UID, HOME, KUBECONFIG and in-cluster markers once.

use std::path::PathBuf;

/// Environment inputs consulted when building socket candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnv {
    pub uid: Option<String>,
    pub home: Option<PathBuf>,
    /// `KUBECONFIG` override.
    pub kubeconfig: Option<PathBuf>,
    /// Running inside a Kubernetes pod.
    pub in_cluster: bool,
}

impl HostEnv {
    pub fn from_process() -> Self {
        Self {
            uid: current_uid(),
            home: non_empty_var("HOME").map(PathBuf::from),
            kubeconfig: non_empty_var("KUBECONFIG")
                .and_then(|value| std::env::split_paths(&value).find(|p| !p.as_os_str().is_empty())),
            in_cluster: non_empty_var("KUBERNETES_SERVICE_HOST").is_some(),
        }
    }

    /// `$KUBECONFIG`, else `$HOME/.kube/config`.
    pub fn kubeconfig_path(&self) -> Option<PathBuf> {
        self.kubeconfig
            .clone()
            .or_else(|| self.home.as_ref().map(|home| home.join(".kube").join("config")))
    }

    pub fn rootless_podman_socket(&self) -> Option<PathBuf> {
        self.uid
            .as_ref()
            .map(|uid| PathBuf::from(format!("/run/user/{}/podman/podman.sock", uid)))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn current_uid() -> Option<String> {
    non_empty_var("UID").or_else(|| {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}
