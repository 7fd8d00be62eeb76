// ABOUTME: Client that drives an engine through its CLI binary.
// ABOUTME: Each operation builds an argv, runs the capability guard for that argv, then invokes it.

use super::sealed::Sealed;
use super::{LifecycleClient, LifecycleError, OperationOutput};
use crate::probe::{PermissionState, PermissionVerdict, Prober, locate_binary};
use crate::runtime::identity::RuntimeIdentity;
use crate::runtime::operation::{ArgvBuilder, Operation, OperationKind};
use crate::runtime::transport::TransportKind;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use std::fmt;
use std::io;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;

/// Whether CLI operations re-probe their exact argv before running it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreflightPolicy {
    /// Re-probe before every call. Verdicts are never cached.
    #[default]
    Always,
    Never,
}

pub struct CliClient {
    identity: RuntimeIdentity,
    binary: &'static str,
    argv: ArgvBuilder,
    prober: Arc<dyn Prober>,
    preflight: PreflightPolicy,
}

impl CliClient {
    pub fn new(
        identity: RuntimeIdentity,
        binary: &'static str,
        argv: ArgvBuilder,
        prober: Arc<dyn Prober>,
    ) -> Self {
        Self {
            identity,
            binary,
            argv,
            prober,
            preflight: PreflightPolicy::default(),
        }
    }

    pub fn preflight(mut self, preflight: PreflightPolicy) -> Self {
        self.preflight = preflight;
        self
    }

    pub fn binary(&self) -> &'static str {
        self.binary
    }

    /// Argument vector for `op`, or `Unsupported` if the engine has none.
    pub fn build_args(&self, op: &Operation<'_>) -> Result<Vec<String>, LifecycleError> {
        (self.argv)(op).ok_or(LifecycleError::Unsupported {
            operation: op.kind(),
            identity: self.identity,
        })
    }

    /// Check that `args` may be run right now.
    ///
    /// A probe that ran and exited non-zero passes: the guard only answers
    /// "can this be invoked", and the real call reports its own failure.
    pub async fn guard(
        &self,
        operation: OperationKind,
        args: &[String],
    ) -> Result<PermissionVerdict, LifecycleError> {
        let verdict = self.prober.subprocess_capability(self.binary, args).await;
        match verdict.state {
            PermissionState::Granted => Ok(verdict),
            PermissionState::Denied => Err(LifecycleError::PermissionDenied {
                operation,
                binary: self.binary.to_string(),
                message: verdict.to_string(),
            }),
            PermissionState::Unavailable => Err(LifecycleError::Unavailable {
                operation,
                message: verdict.to_string(),
            }),
            PermissionState::Error => Err(LifecycleError::transport(operation, verdict)),
        }
    }

    /// Run the binary with `args` and normalize its result.
    ///
    /// The binary is looked up on the prober's search path, so the program
    /// that runs is the one the guard vetted.
    pub async fn invoke(
        &self,
        operation: OperationKind,
        args: &[String],
    ) -> Result<OperationOutput, LifecycleError> {
        let search_path = self.prober.binary_search_path();
        let program = locate_binary(self.binary, search_path.as_ref()).map_err(|e| {
            LifecycleError::Unavailable {
                operation,
                message: format!("{} not found: {}", self.binary, e),
            }
        })?;

        tracing::debug!(binary = self.binary, ?args, "invoking");

        let output = Command::new(&program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.map_spawn_error(operation, e))?;

        let success = output.status.success();
        let status = output.status.code().unwrap_or(-1);
        if !success {
            tracing::debug!(binary = self.binary, status, "command failed");
        }

        Ok(OperationOutput {
            operation,
            status,
            success,
            output: Bytes::from(if success { output.stdout } else { output.stderr }),
        })
    }

    fn map_spawn_error(&self, operation: OperationKind, e: io::Error) -> LifecycleError {
        match e.kind() {
            io::ErrorKind::NotFound => LifecycleError::Unavailable {
                operation,
                message: format!("{} not found: {}", self.binary, e),
            },
            io::ErrorKind::PermissionDenied => LifecycleError::PermissionDenied {
                operation,
                binary: self.binary.to_string(),
                message: e.to_string(),
            },
            _ => LifecycleError::transport(operation, format!("failed to run {}: {}", self.binary, e)),
        }
    }
}

impl fmt::Debug for CliClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliClient")
            .field("identity", &self.identity)
            .field("binary", &self.binary)
            .field("preflight", &self.preflight)
            .finish_non_exhaustive()
    }
}

impl Sealed for CliClient {}

#[async_trait]
impl LifecycleClient for CliClient {
    fn identity(&self) -> RuntimeIdentity {
        self.identity
    }

    fn transport(&self) -> TransportKind {
        TransportKind::Cli
    }

    async fn execute(&self, op: Operation<'_>) -> Result<OperationOutput, LifecycleError> {
        let operation = op.kind();
        tracing::debug!(
            identity = %self.identity,
            %operation,
            target = op.target().map(|name| name.as_str()),
            "cli operation"
        );
        let args = self.build_args(&op)?;

        if self.preflight == PreflightPolicy::Always {
            self.guard(operation, &args).await?;
        }

        self.invoke(operation, &args).await
    }
}
