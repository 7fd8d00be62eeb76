// ABOUTME: LifecycleClient, the uniform operation set every resolved transport exposes.
// ABOUTME: Also defines the normalized output shape and the lifecycle error taxonomy.

mod cli;
mod factory;
mod noop;
pub(crate) mod sealed;
mod socket;

pub use cli::{CliClient, PreflightPolicy};
pub use factory::{ClientFactory, ClientSettings, resolve};
pub use noop::NoopClient;
pub use socket::SocketClient;

use super::identity::RuntimeIdentity;
use super::operation::{Operation, OperationKind};
use super::transport::TransportKind;
use crate::types::{ContainerName, ImageRef};
use async_trait::async_trait;
use bytes::Bytes;
use sealed::Sealed;
use std::borrow::Cow;
use std::fmt;

/// Container lifecycle operations bound to one resolved transport.
///
/// Clients hold no state between calls besides their transport, so one
/// failed call never affects the next. Nothing here retries or times out;
/// drop the future to cancel an in-flight call.
#[async_trait]
pub trait LifecycleClient: Sealed + fmt::Debug + Send + Sync {
    fn identity(&self) -> RuntimeIdentity;

    fn transport(&self) -> TransportKind;

    /// Run one operation. Engine-level rejections come back as
    /// `Ok` with `success == false`.
    async fn execute(&self, op: Operation<'_>) -> Result<OperationOutput, LifecycleError>;

    async fn status(&self, name: &ContainerName) -> Result<OperationOutput, LifecycleError> {
        self.execute(Operation::Status(name)).await
    }

    async fn start(&self, name: &ContainerName) -> Result<OperationOutput, LifecycleError> {
        self.execute(Operation::Start(name)).await
    }

    async fn stop(&self, name: &ContainerName) -> Result<OperationOutput, LifecycleError> {
        self.execute(Operation::Stop(name)).await
    }

    async fn create(
        &self,
        name: &ContainerName,
        image: &ImageRef,
    ) -> Result<OperationOutput, LifecycleError> {
        self.execute(Operation::Create { name, image }).await
    }

    async fn list(&self) -> Result<OperationOutput, LifecycleError> {
        self.execute(Operation::List).await
    }

    async fn inspect(&self, name: &ContainerName) -> Result<OperationOutput, LifecycleError> {
        self.execute(Operation::Inspect(name)).await
    }

    async fn restart(&self, name: &ContainerName) -> Result<OperationOutput, LifecycleError> {
        self.execute(Operation::Restart(name)).await
    }

    async fn remove(&self, name: &ContainerName) -> Result<OperationOutput, LifecycleError> {
        self.execute(Operation::Remove(name)).await
    }

    async fn logs(&self, name: &ContainerName) -> Result<OperationOutput, LifecycleError> {
        self.execute(Operation::Logs(name)).await
    }
}

/// Normalized result of an operation, whatever the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutput {
    pub operation: OperationKind,
    /// Process exit code (-1 if killed by a signal) or HTTP status.
    pub status: i32,
    pub success: bool,
    /// stdout (stderr on failure) for CLI transports, response body for sockets.
    pub output: Bytes,
}

impl OperationOutput {
    pub fn noop(operation: OperationKind) -> Self {
        Self {
            operation,
            status: 0,
            success: true,
            output: Bytes::new(),
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }

    /// Turn `success == false` into [`LifecycleError::Protocol`].
    pub fn into_result(self) -> Result<Self, LifecycleError> {
        if self.success {
            Ok(self)
        } else {
            Err(LifecycleError::Protocol {
                operation: self.operation,
                status: self.status,
                body: self.text().trim().to_string(),
            })
        }
    }
}

/// Failure classes of a lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PermissionDenied,
    /// Binary or socket not found.
    Unavailable,
    /// I/O failure talking to a reachable transport.
    Transport,
    UnsupportedOperation,
    /// The engine answered with a non-success result.
    Protocol,
}

/// Errors from a single lifecycle call. The client stays usable afterwards.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("permission denied running {binary} for {operation}: {message}")]
    PermissionDenied {
        operation: OperationKind,
        binary: String,
        message: String,
    },

    #[error("{operation} unavailable: {message}")]
    Unavailable {
        operation: OperationKind,
        message: String,
    },

    #[error("transport error during {operation}: {message}")]
    Transport {
        operation: OperationKind,
        message: String,
    },

    #[error("{operation} is not supported on {identity}")]
    Unsupported {
        operation: OperationKind,
        identity: RuntimeIdentity,
    },

    #[error("{operation} rejected with status {status}: {body}")]
    Protocol {
        operation: OperationKind,
        status: i32,
        body: String,
    },
}

impl LifecycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            LifecycleError::Unavailable { .. } => ErrorKind::Unavailable,
            LifecycleError::Transport { .. } => ErrorKind::Transport,
            LifecycleError::Unsupported { .. } => ErrorKind::UnsupportedOperation,
            LifecycleError::Protocol { .. } => ErrorKind::Protocol,
        }
    }

    pub fn operation(&self) -> OperationKind {
        match self {
            LifecycleError::PermissionDenied { operation, .. }
            | LifecycleError::Unavailable { operation, .. }
            | LifecycleError::Transport { operation, .. }
            | LifecycleError::Unsupported { operation, .. }
            | LifecycleError::Protocol { operation, .. } => *operation,
        }
    }

    pub(crate) fn transport(operation: OperationKind, message: impl fmt::Display) -> Self {
        LifecycleError::Transport {
            operation,
            message: message.to_string(),
        }
    }
}
