// ABOUTME: RuntimeIdentity and PlatformKind, the output of platform detection.
// ABOUTME: Includes string parsing for config files, env overrides and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The container engine family present on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeIdentity {
    Docker,
    Podman,
    Kubernetes,
    Containerd,
    #[serde(rename = "cri-o", alias = "crio")]
    CriO,
    #[serde(alias = "lxc")]
    Lxd,
    /// Nothing to manage: every operation is a no-op.
    #[serde(alias = "none")]
    Host,
}

impl RuntimeIdentity {
    pub const ALL: [RuntimeIdentity; 7] = [
        RuntimeIdentity::Docker,
        RuntimeIdentity::Podman,
        RuntimeIdentity::Kubernetes,
        RuntimeIdentity::Containerd,
        RuntimeIdentity::CriO,
        RuntimeIdentity::Lxd,
        RuntimeIdentity::Host,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeIdentity::Docker => "docker",
            RuntimeIdentity::Podman => "podman",
            RuntimeIdentity::Kubernetes => "kubernetes",
            RuntimeIdentity::Containerd => "containerd",
            RuntimeIdentity::CriO => "cri-o",
            RuntimeIdentity::Lxd => "lxd",
            RuntimeIdentity::Host => "host",
        }
    }

    pub fn is_host(&self) -> bool {
        matches!(self, RuntimeIdentity::Host)
    }

    pub fn platform_kind(&self) -> PlatformKind {
        match self {
            RuntimeIdentity::Kubernetes => PlatformKind::Kubernetes,
            RuntimeIdentity::Host => PlatformKind::Host,
            _ => PlatformKind::Standalone,
        }
    }
}

impl fmt::Display for RuntimeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown runtime: {0} (expected docker, podman, kubernetes, containerd, cri-o, lxd or host)")]
pub struct ParseRuntimeIdentityError(pub String);

impl FromStr for RuntimeIdentity {
    type Err = ParseRuntimeIdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docker" => Ok(RuntimeIdentity::Docker),
            "podman" => Ok(RuntimeIdentity::Podman),
            "kubernetes" | "k8s" => Ok(RuntimeIdentity::Kubernetes),
            "containerd" => Ok(RuntimeIdentity::Containerd),
            "cri-o" | "crio" => Ok(RuntimeIdentity::CriO),
            "lxd" | "lxc" => Ok(RuntimeIdentity::Lxd),
            "host" | "none" => Ok(RuntimeIdentity::Host),
            _ => Err(ParseRuntimeIdentityError(s.to_string())),
        }
    }
}

/// What kind of platform the process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Standalone,
    Kubernetes,
    Host,
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlatformKind::Standalone => "standalone",
            PlatformKind::Kubernetes => "kubernetes",
            PlatformKind::Host => "host",
        };
        f.write_str(s)
    }
}

/// One classification of "what is running here", produced once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub platform: PlatformKind,
    pub identity: RuntimeIdentity,
}

impl Detection {
    pub fn of(identity: RuntimeIdentity) -> Self {
        Self {
            platform: identity.platform_kind(),
            identity,
        }
    }
}
