// ABOUTME: Static per-runtime table: CLI binary, argument builders, socket candidates.
// ABOUTME: Built once per process and never mutated; lookups fall back to the Docker profile.

use super::environment::HostEnv;
use super::identity::RuntimeIdentity;
use super::operation::{
    ArgvBuilder, Operation, RequestBuilder, RequestDescriptor, Unsupported, unsupported_request,
};
use super::transport::SocketCandidate;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Identity whose profile is used when the table has no entry.
pub const DEFAULT_IDENTITY: RuntimeIdentity = RuntimeIdentity::Docker;

const LXD_STATE_TIMEOUT_SECS: u64 = 30;

/// Where a socket candidate lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketLocation {
    Fixed(&'static str),
    /// `/run/user/$UID/podman/podman.sock`
    RootlessPodman,
    /// `$KUBECONFIG` or `$HOME/.kube/config`
    Kubeconfig,
}

impl SocketLocation {
    pub fn resolve(&self, env: &HostEnv) -> Option<PathBuf> {
        match self {
            SocketLocation::Fixed(path) => Some(PathBuf::from(path)),
            SocketLocation::RootlessPodman => env.rootless_podman_socket(),
            SocketLocation::Kubeconfig => env.kubeconfig_path(),
        }
    }
}

/// One registered socket transport.
pub struct SocketSpec {
    pub location: SocketLocation,
    pub request: RequestBuilder,
}

/// Everything needed to reach one engine family.
pub struct RuntimeProfile {
    pub identity: RuntimeIdentity,
    pub binary: &'static str,
    /// Cheap invocation used to test for the binary.
    pub presence_args: &'static [&'static str],
    pub argv: ArgvBuilder,
    /// In preference order.
    pub sockets: &'static [SocketSpec],
}

impl RuntimeProfile {
    pub fn presence_args(&self) -> Vec<String> {
        self.presence_args.iter().map(|s| s.to_string()).collect()
    }

    /// Socket candidates in registration order. Locations that cannot be
    /// resolved in `env` are skipped.
    pub fn socket_candidates(&self, env: &HostEnv) -> Vec<SocketCandidate> {
        self.sockets
            .iter()
            .filter_map(|spec| {
                spec.location.resolve(env).map(|path| SocketCandidate {
                    path,
                    request: spec.request,
                })
            })
            .collect()
    }
}

static DOCKER: RuntimeProfile = RuntimeProfile {
    identity: RuntimeIdentity::Docker,
    binary: "docker",
    presence_args: &["--version"],
    argv: docker_argv,
    sockets: &[SocketSpec {
        location: SocketLocation::Fixed("/var/run/docker.sock"),
        request: docker_request,
    }],
};

static PODMAN: RuntimeProfile = RuntimeProfile {
    identity: RuntimeIdentity::Podman,
    binary: "podman",
    presence_args: &["--version"],
    argv: docker_argv,
    sockets: &[
        SocketSpec {
            location: SocketLocation::RootlessPodman,
            request: docker_request,
        },
        SocketSpec {
            location: SocketLocation::Fixed("/run/podman/podman.sock"),
            request: docker_request,
        },
    ],
};

static KUBERNETES: RuntimeProfile = RuntimeProfile {
    identity: RuntimeIdentity::Kubernetes,
    binary: "kubectl",
    presence_args: &["version", "--client"],
    argv: kubectl_argv,
    sockets: &[SocketSpec {
        location: SocketLocation::Kubeconfig,
        request: unsupported_request,
    }],
};

static CONTAINERD: RuntimeProfile = RuntimeProfile {
    identity: RuntimeIdentity::Containerd,
    binary: "ctr",
    presence_args: &["--version"],
    argv: ctr_argv,
    // gRPC only.
    sockets: &[SocketSpec {
        location: SocketLocation::Fixed("/run/containerd/containerd.sock"),
        request: unsupported_request,
    }],
};

static CRIO: RuntimeProfile = RuntimeProfile {
    identity: RuntimeIdentity::CriO,
    binary: "crictl",
    presence_args: &["--version"],
    argv: crictl_argv,
    sockets: &[SocketSpec {
        location: SocketLocation::Fixed("/var/run/crio/crio.sock"),
        request: crio_request,
    }],
};

static LXD: RuntimeProfile = RuntimeProfile {
    identity: RuntimeIdentity::Lxd,
    binary: "lxc",
    presence_args: &["--version"],
    argv: lxc_argv,
    sockets: &[
        SocketSpec {
            location: SocketLocation::Fixed("/var/snap/lxd/common/lxd/unix.socket"),
            request: lxd_request,
        },
        SocketSpec {
            location: SocketLocation::Fixed("/var/lib/lxd/unix.socket"),
            request: lxd_request,
        },
    ],
};

static PROFILES: LazyLock<HashMap<RuntimeIdentity, &'static RuntimeProfile>> =
    LazyLock::new(|| {
        [&DOCKER, &PODMAN, &KUBERNETES, &CONTAINERD, &CRIO, &LXD]
            .into_iter()
            .map(|profile| (profile.identity, profile))
            .collect()
    });

/// Profile for `identity`, or the [`DEFAULT_IDENTITY`] profile when the
/// table has no entry.
pub fn profile(identity: RuntimeIdentity) -> &'static RuntimeProfile {
    match PROFILES.get(&identity) {
        Some(profile) => profile,
        None => {
            tracing::warn!(
                %identity,
                fallback = %DEFAULT_IDENTITY,
                "no runtime profile registered, using fallback"
            );
            &DOCKER
        }
    }
}

/// Whether `identity` has its own table entry.
pub fn is_registered(identity: RuntimeIdentity) -> bool {
    PROFILES.contains_key(&identity)
}

fn argv<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

// =============================================================================
// CLI argument builders
// =============================================================================

/// `docker` and `podman` share a command line.
fn docker_argv(op: &Operation<'_>) -> Option<Vec<String>> {
    let args = match op {
        Operation::Status(name) => argv(["inspect", name.as_str()]),
        Operation::Start(name) => argv(["start", name.as_str()]),
        Operation::Stop(name) => argv(["stop", name.as_str()]),
        Operation::Create { name, image } => {
            argv(["create", "--name", name.as_str(), image.as_str()])
        }
        Operation::List => argv(["ps", "--all", "--no-trunc"]),
        Operation::Inspect(name) => argv(["inspect", "--type", "container", name.as_str()]),
        Operation::Restart(name) => argv(["restart", name.as_str()]),
        Operation::Remove(name) => argv(["rm", "--force", name.as_str()]),
        Operation::Logs(name) => argv(["logs", name.as_str()]),
    };
    Some(args)
}

/// Pods have no stopped state, so start/stop/restart have no equivalent.
fn kubectl_argv(op: &Operation<'_>) -> Option<Vec<String>> {
    match op {
        Operation::Status(name) | Operation::Inspect(name) => {
            Some(argv(["get", "pod", name.as_str(), "--output", "json"]))
        }
        Operation::Create { name, image } => Some(argv([
            "run",
            name.as_str(),
            "--image",
            image.as_str(),
            "--restart",
            "Never",
        ])),
        Operation::List => Some(argv(["get", "pods", "--output", "json"])),
        Operation::Remove(name) => Some(argv(["delete", "pod", name.as_str()])),
        Operation::Logs(name) => Some(argv(["logs", name.as_str()])),
        Operation::Start(_) | Operation::Stop(_) | Operation::Restart(_) => None,
    }
}

fn ctr_argv(op: &Operation<'_>) -> Option<Vec<String>> {
    match op {
        Operation::Status(name) | Operation::Inspect(name) => {
            Some(argv(["containers", "info", name.as_str()]))
        }
        Operation::Start(name) => Some(argv(["tasks", "start", "--detach", name.as_str()])),
        Operation::Stop(name) => Some(argv(["tasks", "kill", name.as_str()])),
        Operation::Create { name, image } => Some(argv([
            "containers",
            "create",
            image.as_str(),
            name.as_str(),
        ])),
        Operation::List => Some(argv(["containers", "list"])),
        Operation::Remove(name) => Some(argv(["containers", "delete", name.as_str()])),
        Operation::Restart(_) | Operation::Logs(_) => None,
    }
}

/// `crictl create` needs pod sandbox config files, which a name and an image
/// cannot describe.
fn crictl_argv(op: &Operation<'_>) -> Option<Vec<String>> {
    match op {
        Operation::Status(name) => Some(argv(["inspect", name.as_str()])),
        Operation::Inspect(name) => Some(argv(["inspect", "--output", "json", name.as_str()])),
        Operation::Start(name) => Some(argv(["start", name.as_str()])),
        Operation::Stop(name) => Some(argv(["stop", name.as_str()])),
        Operation::List => Some(argv(["ps", "--all"])),
        Operation::Remove(name) => Some(argv(["rm", name.as_str()])),
        Operation::Logs(name) => Some(argv(["logs", name.as_str()])),
        Operation::Create { .. } | Operation::Restart(_) => None,
    }
}

fn lxc_argv(op: &Operation<'_>) -> Option<Vec<String>> {
    let args = match op {
        Operation::Status(name) => argv(["info", name.as_str()]),
        Operation::Start(name) => argv(["start", name.as_str()]),
        Operation::Stop(name) => argv(["stop", name.as_str()]),
        Operation::Create { name, image } => argv(["init", image.as_str(), name.as_str()]),
        Operation::List => argv(["list", "--format", "json"]),
        Operation::Inspect(name) => argv(["config", "show", name.as_str(), "--expanded"]),
        Operation::Restart(name) => argv(["restart", name.as_str()]),
        Operation::Remove(name) => argv(["delete", "--force", name.as_str()]),
        Operation::Logs(name) => argv(["info", "--show-log", name.as_str()]),
    };
    Some(args)
}

// =============================================================================
// Socket request builders
// =============================================================================

/// Docker Engine API, also served by Podman's compatibility layer.
fn docker_request(op: &Operation<'_>) -> Result<RequestDescriptor, Unsupported> {
    let request = match op {
        Operation::Status(name) | Operation::Inspect(name) => {
            RequestDescriptor::get(format!("/containers/{}/json", segment(name.as_str())))
        }
        Operation::Start(name) => {
            RequestDescriptor::post(format!("/containers/{}/start", segment(name.as_str())))
        }
        Operation::Stop(name) => {
            RequestDescriptor::post(format!("/containers/{}/stop", segment(name.as_str())))
        }
        Operation::Create { name, image } => RequestDescriptor::post(format!(
            "/containers/create?name={}",
            segment(name.as_str())
        ))
        .json(json!({ "Image": image.as_str() })),
        Operation::List => RequestDescriptor::get("/containers/json?all=true"),
        Operation::Restart(name) => {
            RequestDescriptor::post(format!("/containers/{}/restart", segment(name.as_str())))
        }
        Operation::Remove(name) => {
            RequestDescriptor::delete(format!("/containers/{}?force=true", segment(name.as_str())))
        }
        Operation::Logs(name) => RequestDescriptor::get(format!(
            "/containers/{}/logs?stdout=true&stderr=true",
            segment(name.as_str())
        )),
    };
    Ok(request)
}

/// CRI-O's socket answers container info over HTTP; lifecycle calls are gRPC.
fn crio_request(op: &Operation<'_>) -> Result<RequestDescriptor, Unsupported> {
    match op {
        Operation::Status(name) | Operation::Inspect(name) => Ok(RequestDescriptor::get(format!(
            "/containers/{}",
            segment(name.as_str())
        ))),
        _ => Err(Unsupported::of(op)),
    }
}

fn lxd_request(op: &Operation<'_>) -> Result<RequestDescriptor, Unsupported> {
    let state_change = |name: &str, action: &str| {
        RequestDescriptor::put(format!("/1.0/instances/{}/state", segment(name)))
            .json(json!({ "action": action, "timeout": LXD_STATE_TIMEOUT_SECS }))
    };

    let request = match op {
        Operation::Status(name) => {
            RequestDescriptor::get(format!("/1.0/instances/{}/state", segment(name.as_str())))
        }
        Operation::Start(name) => state_change(name.as_str(), "start"),
        Operation::Stop(name) => state_change(name.as_str(), "stop"),
        Operation::Restart(name) => state_change(name.as_str(), "restart"),
        Operation::Create { name, image } => RequestDescriptor::post("/1.0/instances").json(json!({
            "name": name.as_str(),
            "source": { "type": "image", "alias": image.as_str() },
        })),
        Operation::List => RequestDescriptor::get("/1.0/instances?recursion=1"),
        Operation::Inspect(name) => {
            RequestDescriptor::get(format!("/1.0/instances/{}", segment(name.as_str())))
        }
        Operation::Remove(name) => {
            RequestDescriptor::delete(format!("/1.0/instances/{}", segment(name.as_str())))
        }
        Operation::Logs(name) => {
            RequestDescriptor::get(format!("/1.0/instances/{}/logs", segment(name.as_str())))
        }
    };
    Ok(request)
}
