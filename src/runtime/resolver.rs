// ABOUTME: Transport resolver: picks exactly one TransportCandidate for a runtime, or fails.
// ABOUTME: CLI is strictly preferred; sockets are tried in registration order only when the binary is absent.

use super::environment::HostEnv;
use super::identity::RuntimeIdentity;
use super::registry;
use super::transport::TransportCandidate;
use crate::probe::{PermissionState, PermissionVerdict, Prober};
use std::path::PathBuf;

/// Where a runtime can be reached.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Bare host; there is nothing to manage.
    Host,
    Bound {
        identity: RuntimeIdentity,
        transport: TransportCandidate,
    },
}

impl Resolution {
    pub fn identity(&self) -> RuntimeIdentity {
        match self {
            Resolution::Host => RuntimeIdentity::Host,
            Resolution::Bound { identity, .. } => *identity,
        }
    }

    pub fn transport(&self) -> Option<&TransportCandidate> {
        match self {
            Resolution::Host => None,
            Resolution::Bound { transport, .. } => Some(transport),
        }
    }
}

/// Resolution failures. Both are fatal: no degraded client is ever built.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot reach {identity}: subprocess permission is {verdict}")]
    PermissionMissing {
        identity: RuntimeIdentity,
        verdict: PermissionVerdict,
    },

    #[error(
        "nothing reachable for {identity}: `{binary}` CLI not found and none of {} socket candidate(s) readable{}",
        .attempted.len(),
        describe_paths(.attempted)
    )]
    NothingReachable {
        identity: RuntimeIdentity,
        binary: &'static str,
        attempted: Vec<PathBuf>,
        verdicts: Vec<PermissionVerdict>,
    },
}

fn describe_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return String::new();
    }
    let joined = paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(" ({joined})")
}

/// Decides how to reach a runtime using a [`Prober`].
pub struct TransportResolver<'a> {
    prober: &'a dyn Prober,
    env: &'a HostEnv,
}

impl<'a> TransportResolver<'a> {
    pub fn new(prober: &'a dyn Prober, env: &'a HostEnv) -> Self {
        Self { prober, env }
    }

    /// Resolve `identity` to a single transport.
    ///
    /// 1. `host` resolves immediately, without probing anything.
    /// 2. Subprocess permission must be granted, even for socket transports.
    /// 3. The canonical CLI binary is used if it is present at all; only a
    ///    "not found" presence probe counts as absent.
    /// 4. Otherwise the first readable socket candidate, by registration
    ///    order, is used.
    pub async fn resolve(&self, identity: RuntimeIdentity) -> Result<Resolution, ResolveError> {
        if identity.is_host() {
            tracing::debug!("host platform, skipping transport probes");
            return Ok(Resolution::Host);
        }

        let permission = self.prober.subprocess_permission();
        if !permission.is_granted() {
            tracing::debug!(%identity, verdict = %permission, "subprocess permission missing");
            return Err(ResolveError::PermissionMissing {
                identity,
                verdict: permission,
            });
        }

        let profile = registry::profile(identity);
        let presence = self
            .prober
            .subprocess_capability(profile.binary, &profile.presence_args())
            .await;

        if presence.state != PermissionState::Unavailable {
            tracing::info!(%identity, binary = profile.binary, "resolved CLI transport");
            return Ok(Resolution::Bound {
                identity,
                transport: TransportCandidate::Cli {
                    binary: profile.binary,
                },
            });
        }

        let candidates = profile.socket_candidates(self.env);
        let attempted: Vec<PathBuf> = candidates.iter().map(|c| c.path.clone()).collect();
        tracing::debug!(
            %identity,
            binary = profile.binary,
            candidates = attempted.len(),
            "CLI absent, probing sockets"
        );

        let verdicts = self.prober.read_permissions(&attempted).await;
        match first_granted(candidates, &verdicts) {
            Some(socket) => {
                tracing::info!(%identity, path = %socket.path.display(), "resolved socket transport");
                Ok(Resolution::Bound {
                    identity,
                    transport: TransportCandidate::Socket(socket),
                })
            }
            None => Err(ResolveError::NothingReachable {
                identity,
                binary: profile.binary,
                attempted,
                verdicts,
            }),
        }
    }
}

/// First candidate whose verdict is granted, by candidate order.
///
/// Candidates without a verdict (e.g. the prober reported nothing) are
/// never selected.
pub fn first_granted<T>(candidates: Vec<T>, verdicts: &[PermissionVerdict]) -> Option<T> {
    candidates
        .into_iter()
        .zip(verdicts)
        .find(|(_, verdict)| verdict.is_granted())
        .map(|(candidate, _)| candidate)
}
