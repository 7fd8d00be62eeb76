// ABOUTME: Integration tests for lifecycle clients over noop, CLI and socket transports.
// ABOUTME: Uses fake binaries, a fake engine socket and a scripted prober.

mod support;

use hatch::probe::{HostProber, PermissionVerdict};
use hatch::runtime::registry;
use hatch::runtime::{
    CliClient, ClientFactory, ClientSettings, ErrorKind, HostEnv, LifecycleClient, LifecycleError,
    Operation, OperationKind, PreflightPolicy, ResolveError, RuntimeIdentity, SocketCandidate,
    SocketClient, TransportKind,
};
use hatch::types::{ContainerName, ImageRef};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use support::fake_bin::FakeBin;
use support::fake_engine::FakeEngine;
use support::fake_prober::{Call, FakeProber};
use tempfile::TempDir;

const DOCKER_SCRIPT: &str = r#"case "$1" in
  --version) exit 0 ;;
  inspect) echo '[{"State":{"Status":"running"}}]' ;;
  logs) sleep 5 ;;
esac"#;

fn dev_env() -> HostEnv {
    HostEnv {
        uid: Some("1000".to_string()),
        home: Some(PathBuf::from("/home/dev")),
        kubeconfig: None,
        in_cluster: false,
    }
}

fn name(s: &str) -> ContainerName {
    ContainerName::new(s).unwrap()
}

fn image(s: &str) -> ImageRef {
    ImageRef::parse(s).unwrap()
}

fn all_operations<'a>(name: &'a ContainerName, image: &'a ImageRef) -> Vec<Operation<'a>> {
    vec![
        Operation::Status(name),
        Operation::Start(name),
        Operation::Stop(name),
        Operation::Create { name, image },
        Operation::List,
        Operation::Inspect(name),
        Operation::Restart(name),
        Operation::Remove(name),
        Operation::Logs(name),
    ]
}

fn cli_factory(bin: &FakeBin, preflight: PreflightPolicy) -> ClientFactory {
    let prober = HostProber::new().search_path(bin.search_path());
    ClientFactory::new(Arc::new(prober), dev_env()).settings(ClientSettings { preflight })
}

fn docker_socket(path: PathBuf) -> SocketCandidate {
    SocketCandidate {
        path,
        request: registry::profile(RuntimeIdentity::Docker).sockets[0].request,
    }
}

// =============================================================================
// Host
// =============================================================================

#[tokio::test]
async fn host_client_succeeds_at_everything() {
    support::init_tracing();
    let prober = Arc::new(FakeProber::new());
    let factory = ClientFactory::new(prober.clone(), dev_env());

    let client = factory.resolve(RuntimeIdentity::Host).await.unwrap();
    assert_eq!(client.identity(), RuntimeIdentity::Host);
    assert_eq!(client.transport(), TransportKind::Noop);

    let (abc, nginx) = (name("abc"), image("nginx:latest"));
    for op in all_operations(&abc, &nginx) {
        let output = client.execute(op).await.unwrap();
        assert_eq!(output.operation, op.kind());
        assert!(output.success);
        assert_eq!(output.status, 0);
        assert!(output.output.is_empty());
    }

    assert!(prober.calls().is_empty());
}

// =============================================================================
// CLI
// =============================================================================

/// Test: status("abc") on docker runs the guard and then the call, both on the same argv.
#[tokio::test]
async fn cli_status_guards_then_runs_exact_argv() {
    let bin = FakeBin::new();
    bin.install("docker", DOCKER_SCRIPT);

    let client = cli_factory(&bin, PreflightPolicy::Always)
        .resolve(RuntimeIdentity::Docker)
        .await
        .unwrap();
    assert_eq!(client.transport(), TransportKind::Cli);

    let output = client.status(&name("abc")).await.unwrap();

    assert!(output.success);
    assert_eq!(output.status, 0);
    assert_eq!(output.operation, OperationKind::Status);
    assert!(output.text().contains("running"));
    assert_eq!(
        bin.invocations(),
        vec!["--version", "inspect abc", "inspect abc"]
    );
}

#[tokio::test]
async fn cli_preflight_never_skips_guard() {
    let bin = FakeBin::new();
    bin.install("docker", DOCKER_SCRIPT);

    let client = cli_factory(&bin, PreflightPolicy::Never)
        .resolve(RuntimeIdentity::Docker)
        .await
        .unwrap();
    client.status(&name("abc")).await.unwrap();

    assert_eq!(bin.invocations(), vec!["--version", "inspect abc"]);
}

/// Test: with default settings the call runs the binary resolution found.
#[tokio::test]
async fn cli_call_runs_binary_found_by_resolution() {
    let bin = FakeBin::new();
    bin.install(
        "docker",
        "case \"$1\" in\n  --version) exit 0 ;;\n  inspect) echo ok ;;\nesac",
    );

    let prober = HostProber::new().search_path(bin.search_path());
    let client = ClientFactory::new(Arc::new(prober), HostEnv::default())
        .resolve(RuntimeIdentity::Docker)
        .await
        .unwrap();
    let output = client.status(&name("abc")).await.unwrap();

    assert!(output.success);
    assert_eq!(output.text().trim(), "ok");
    assert_eq!(
        bin.invocations(),
        vec!["--version", "inspect abc", "inspect abc"]
    );
}

/// Test: a guard that exits non-zero passes; the call itself reports the failure.
#[tokio::test]
async fn cli_failure_is_output_not_error() {
    let bin = FakeBin::new();
    bin.install(
        "docker",
        "case \"$1\" in\n  --version) exit 0 ;;\n  *) echo 'Error: No such object: abc' >&2; exit 1 ;;\nesac",
    );

    let client = cli_factory(&bin, PreflightPolicy::Always)
        .resolve(RuntimeIdentity::Docker)
        .await
        .unwrap();
    let output = client.start(&name("abc")).await.unwrap();

    assert!(!output.success);
    assert_eq!(output.status, 1);
    assert!(output.text().contains("No such object"));
    assert_eq!(bin.invocations(), vec!["--version", "start abc", "start abc"]);

    let err = output.into_result().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn cli_create_passes_name_and_image() {
    let bin = FakeBin::new();
    bin.install("podman", "echo f00");

    let client = cli_factory(&bin, PreflightPolicy::Never)
        .resolve(RuntimeIdentity::Podman)
        .await
        .unwrap();
    let output = client
        .create(&name("web"), &image("docker.io/library/nginx:1.27"))
        .await
        .unwrap();

    assert_eq!(output.text().trim(), "f00");
    assert_eq!(
        bin.invocations(),
        vec!["--version", "create --name web docker.io/library/nginx:1.27"]
    );
}

fn guarded_docker_client(prober: FakeProber) -> (CliClient, Arc<FakeProber>, TempDir) {
    // Empty search path: reaching the real call would report Unavailable.
    let empty = TempDir::new().unwrap();
    let prober = Arc::new(prober.search_path(empty.path().as_os_str()));
    let client = CliClient::new(
        RuntimeIdentity::Docker,
        "docker",
        registry::profile(RuntimeIdentity::Docker).argv,
        prober.clone(),
    );
    (client, prober, empty)
}

#[tokio::test]
async fn guard_denied_is_permission_denied() {
    let (client, prober, _dir) =
        guarded_docker_client(FakeProber::new().capability(PermissionVerdict::denied("nope")));

    let err = client.status(&name("abc")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(err.operation(), OperationKind::Status);
    assert_eq!(
        prober.calls(),
        vec![Call::Capability(
            "docker".to_string(),
            vec!["inspect".to_string(), "abc".to_string()]
        )]
    );
}

#[tokio::test]
async fn guard_unavailable_is_unavailable() {
    let (client, _prober, _dir) = guarded_docker_client(FakeProber::new().without_binaries());

    let err = client.stop(&name("abc")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn guard_error_is_transport() {
    let (client, _prober, _dir) =
        guarded_docker_client(FakeProber::new().capability(PermissionVerdict::error("wait failed")));

    let err = client.remove(&name("abc")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

/// Test: a binary that vanished after resolution surfaces as Unavailable.
#[tokio::test]
async fn missing_binary_at_call_time_is_unavailable() {
    let (client, _prober, _dir) = guarded_docker_client(FakeProber::new());

    let err = client.list().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(err.operation(), OperationKind::List);
}

/// Test: unsupported operations fail before any probe or subprocess.
#[tokio::test]
async fn unsupported_cli_operations_do_no_io() {
    let prober = Arc::new(FakeProber::new());
    let factory = ClientFactory::new(prober.clone(), dev_env());
    let (abc, nginx) = (name("abc"), image("nginx:latest"));

    let crio = factory.resolve(RuntimeIdentity::CriO).await.unwrap();
    let kubernetes = factory.resolve(RuntimeIdentity::Kubernetes).await.unwrap();
    prober.clear();

    let err = crio.create(&abc, &nginx).await.unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::Unsupported {
            operation: OperationKind::Create,
            identity: RuntimeIdentity::CriO
        }
    ));

    for op in [Operation::Start(&abc), Operation::Stop(&abc), Operation::Restart(&abc)] {
        let err = kubernetes.execute(op).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
        assert_eq!(err.operation(), op.kind());
    }

    assert!(prober.calls().is_empty());
}

#[tokio::test]
async fn dropped_cli_call_returns_promptly() {
    let bin = FakeBin::new();
    bin.install("docker", DOCKER_SCRIPT);

    let client = cli_factory(&bin, PreflightPolicy::Never)
        .resolve(RuntimeIdentity::Docker)
        .await
        .unwrap();

    let abc = name("abc");
    let started = Instant::now();
    let result = tokio::time::timeout(Duration::from_millis(200), client.logs(&abc)).await;

    assert!(result.is_err(), "logs should still be running");
    assert!(started.elapsed() < Duration::from_secs(3));
}

// =============================================================================
// Socket
// =============================================================================

#[tokio::test]
async fn factory_binds_socket_when_cli_absent() {
    let prober = Arc::new(
        FakeProber::new()
            .without_binaries()
            .readable("/var/run/docker.sock"),
    );
    let factory = ClientFactory::new(prober, dev_env());

    let client = factory.resolve(RuntimeIdentity::Docker).await.unwrap();

    assert_eq!(client.identity(), RuntimeIdentity::Docker);
    assert_eq!(client.transport(), TransportKind::Socket);
}

#[tokio::test]
async fn factory_propagates_resolution_failure() {
    let prober = Arc::new(FakeProber::new().without_binaries());
    let factory = ClientFactory::new(prober, dev_env());

    let err = factory.resolve(RuntimeIdentity::Docker).await.unwrap_err();

    assert!(matches!(err, ResolveError::NothingReachable { .. }));
}

/// Test: create on a docker socket posts the container spec.
#[tokio::test]
async fn socket_create_posts_container_spec() {
    let engine = FakeEngine::spawn(201, r#"{"Id":"f00","Warnings":[]}"#).await;
    let client = SocketClient::new(RuntimeIdentity::Docker, docker_socket(engine.path.clone()));

    let output = client
        .create(&name("abc"), &image("nginx:latest"))
        .await
        .unwrap();

    assert!(output.success);
    assert_eq!(output.status, 201);
    assert!(output.text().contains("f00"));

    let requests = engine.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/containers/create?name=abc");
    assert_eq!(requests[0].header("content-type"), Some("application/json"));
    assert_eq!(requests[0].json(), json!({ "Image": "nginx:latest" }));
}

#[tokio::test]
async fn socket_status_is_bodyless_get() {
    let engine = FakeEngine::spawn(200, r#"{"State":{"Status":"running"}}"#).await;
    let client = SocketClient::new(RuntimeIdentity::Podman, docker_socket(engine.path.clone()));

    let output = client.status(&name("abc")).await.unwrap();

    assert!(output.success);
    let requests = engine.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].target, "/containers/abc/json");
    assert!(requests[0].body.is_empty());
}

/// Test: an engine rejection is unsuccessful output, not an error.
#[tokio::test]
async fn socket_rejection_is_unsuccessful_output() {
    let engine = FakeEngine::spawn(404, r#"{"message":"No such container: abc"}"#).await;
    let client = SocketClient::new(RuntimeIdentity::Docker, docker_socket(engine.path.clone()));

    let output = client.start(&name("abc")).await.unwrap();

    assert!(!output.success);
    assert_eq!(output.status, 404);
    assert_eq!(engine.requests()[0].target, "/containers/abc/start");

    let err = output.into_result().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(err.to_string().contains("No such container"));
}

#[tokio::test]
async fn socket_connect_failure_is_transport_error() {
    let dir = TempDir::new().unwrap();
    let client = SocketClient::new(
        RuntimeIdentity::Docker,
        docker_socket(dir.path().join("gone.sock")),
    );

    let err = client.list().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("gone.sock"));
}

#[tokio::test]
async fn lxd_socket_changes_state_with_put() {
    let engine = FakeEngine::spawn(202, r#"{"type":"async","status":"Operation created"}"#).await;
    let client = SocketClient::new(
        RuntimeIdentity::Lxd,
        SocketCandidate {
            path: engine.path.clone(),
            request: registry::profile(RuntimeIdentity::Lxd).sockets[0].request,
        },
    );

    let output = client.restart(&name("abc")).await.unwrap();

    assert!(output.success);
    let requests = engine.requests();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].target, "/1.0/instances/abc/state");
    assert_eq!(
        requests[0].json(),
        json!({ "action": "restart", "timeout": 30 })
    );
}

#[test]
fn crio_socket_only_reads() {
    let client = SocketClient::new(
        RuntimeIdentity::CriO,
        SocketCandidate {
            path: PathBuf::from("/var/run/crio/crio.sock"),
            request: registry::profile(RuntimeIdentity::CriO).sockets[0].request,
        },
    );
    let abc = name("abc");

    let status = client.build_request(&Operation::Status(&abc)).unwrap();
    assert_eq!(status.url, "/containers/abc");

    let err = client.build_request(&Operation::Start(&abc)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}

/// Test: a kubeconfig "socket" binds, but every operation is unsupported.
#[tokio::test]
async fn kubernetes_socket_client_supports_nothing() {
    let prober = Arc::new(
        FakeProber::new()
            .without_binaries()
            .readable("/home/dev/.kube/config"),
    );
    let factory = ClientFactory::new(prober.clone(), dev_env());

    let client = factory.resolve(RuntimeIdentity::Kubernetes).await.unwrap();
    assert_eq!(client.transport(), TransportKind::Socket);
    prober.clear();

    let (abc, nginx) = (name("abc"), image("nginx:latest"));
    for op in all_operations(&abc, &nginx) {
        let err = client.execute(op).await.unwrap_err();
        assert!(
            matches!(
                err,
                LifecycleError::Unsupported {
                    identity: RuntimeIdentity::Kubernetes,
                    ..
                }
            ),
            "{} should be unsupported, got {err:?}",
            op.kind()
        );
    }

    assert!(prober.calls().is_empty());
}
