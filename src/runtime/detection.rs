// ABOUTME: Platform detection: classifies the host as Kubernetes, a standalone engine, or bare.
// ABOUTME: Honors explicit overrides before looking at binaries, sockets and kubeconfig.

use super::environment::HostEnv;
use super::identity::{Detection, ParseRuntimeIdentityError, PlatformKind, RuntimeIdentity};
use super::registry;
use crate::probe::locate_binary;
use std::ffi::OsString;
use std::path::Path;

/// Environment variable that forces the runtime identity.
pub const RUNTIME_ENV_VAR: &str = "HATCH_RUNTIME";

/// Standalone engines in detection priority order.
const STANDALONE_ORDER: [RuntimeIdentity; 5] = [
    RuntimeIdentity::Podman,
    RuntimeIdentity::Docker,
    RuntimeIdentity::Containerd,
    RuntimeIdentity::CriO,
    RuntimeIdentity::Lxd,
];

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("invalid {RUNTIME_ENV_VAR} override: {0}")]
    InvalidOverride(#[from] ParseRuntimeIdentityError),
}

/// Detect the platform, honoring overrides.
///
/// Precedence: `HATCH_RUNTIME`, then `configured`, then auto-detection.
pub fn detect_runtime(
    configured: Option<RuntimeIdentity>,
    env: &HostEnv,
    search_path: Option<&OsString>,
) -> Result<Detection, DetectionError> {
    if let Ok(value) = std::env::var(RUNTIME_ENV_VAR)
        && !value.trim().is_empty()
    {
        let identity: RuntimeIdentity = value.parse()?;
        tracing::debug!(%identity, "runtime forced by {}", RUNTIME_ENV_VAR);
        return Ok(Detection::of(identity));
    }

    if let Some(identity) = configured {
        tracing::debug!(%identity, "runtime forced by configuration");
        return Ok(Detection::of(identity));
    }

    Ok(detect_local(env, search_path))
}

/// Auto-detect against the real filesystem and search path.
pub fn detect_local(env: &HostEnv, search_path: Option<&OsString>) -> Detection {
    detect_with(
        env,
        |binary| locate_binary(binary, search_path).is_ok(),
        |path| path.exists(),
    )
}

/// Auto-detect with injectable lookups.
///
/// Detection order:
/// 1. In-cluster Kubernetes (`KUBERNETES_SERVICE_HOST`)
/// 2. Podman, Docker, containerd, CRI-O, LXD: CLI binary or socket present
/// 3. A kubeconfig file
/// 4. Bare host
pub fn detect_with(
    env: &HostEnv,
    binary_present: impl Fn(&str) -> bool,
    path_exists: impl Fn(&Path) -> bool,
) -> Detection {
    if env.in_cluster {
        return Detection {
            platform: PlatformKind::Kubernetes,
            identity: RuntimeIdentity::Kubernetes,
        };
    }

    for identity in STANDALONE_ORDER {
        let profile = registry::profile(identity);
        if binary_present(profile.binary)
            || profile
                .socket_candidates(env)
                .iter()
                .any(|candidate| path_exists(&candidate.path))
        {
            tracing::debug!(%identity, "detected standalone engine");
            return Detection {
                platform: PlatformKind::Standalone,
                identity,
            };
        }
    }

    if env.kubeconfig_path().is_some_and(|path| path_exists(&path)) {
        return Detection {
            platform: PlatformKind::Kubernetes,
            identity: RuntimeIdentity::Kubernetes,
        };
    }

    tracing::debug!("no container engine detected, treating as bare host");
    Detection {
        platform: PlatformKind::Host,
        identity: RuntimeIdentity::Host,
    }
}
