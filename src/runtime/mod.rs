// ABOUTME: Container runtime detection, transport resolution and lifecycle clients.
// ABOUTME: Detector → TransportResolver (consults the prober) → ClientFactory → LifecycleClient.

pub mod client;
mod detection;
mod environment;
mod error;
mod identity;
pub mod operation;
pub mod registry;
mod resolver;
mod transport;

pub use client::{
    ClientFactory, ClientSettings, CliClient, ErrorKind, LifecycleClient, LifecycleError,
    NoopClient, OperationOutput, PreflightPolicy, SocketClient, resolve,
};
pub use detection::{DetectionError, RUNTIME_ENV_VAR, detect_local, detect_runtime, detect_with};
pub use environment::HostEnv;
pub use error::{RuntimeError, RuntimeErrorKind};
pub use identity::{Detection, ParseRuntimeIdentityError, PlatformKind, RuntimeIdentity};
pub use operation::{Method, Operation, OperationKind, RequestDescriptor, Unsupported};
pub use resolver::{Resolution, ResolveError, TransportResolver, first_granted};
pub use transport::{SocketCandidate, TransportCandidate, TransportKind};
