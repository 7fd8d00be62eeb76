// ABOUTME: Client for the bare-host platform, where there is nothing to manage.
// ABOUTME: Every operation succeeds immediately without touching processes or sockets.

use super::sealed::Sealed;
use super::{LifecycleClient, LifecycleError, OperationOutput};
use crate::runtime::identity::RuntimeIdentity;
use crate::runtime::operation::Operation;
use crate::runtime::transport::TransportKind;
use async_trait::async_trait;

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClient;

impl Sealed for NoopClient {}

#[async_trait]
impl LifecycleClient for NoopClient {
    fn identity(&self) -> RuntimeIdentity {
        RuntimeIdentity::Host
    }

    fn transport(&self) -> TransportKind {
        TransportKind::Noop
    }

    async fn execute(&self, op: Operation<'_>) -> Result<OperationOutput, LifecycleError> {
        Ok(OperationOutput::noop(op.kind()))
    }
}
