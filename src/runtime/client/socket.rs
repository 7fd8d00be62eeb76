// ABOUTME: Client that speaks HTTP/1.1 to an engine over its Unix domain socket.
// ABOUTME: Non-2xx answers are returned as unsuccessful output; only I/O failures are errors.

use super::sealed::Sealed;
use super::{LifecycleClient, LifecycleError, OperationOutput};
use crate::runtime::identity::RuntimeIdentity;
use crate::runtime::operation::{Operation, OperationKind, RequestDescriptor};
use crate::runtime::transport::{SocketCandidate, TransportKind};
use async_trait::async_trait;
use std::path::Path;

/// One connection per request; no pooling, no retries.
#[derive(Debug, Clone)]
pub struct SocketClient {
    identity: RuntimeIdentity,
    socket: SocketCandidate,
}

impl SocketClient {
    pub fn new(identity: RuntimeIdentity, socket: SocketCandidate) -> Self {
        Self { identity, socket }
    }

    pub fn path(&self) -> &Path {
        &self.socket.path
    }

    /// Request for `op`, or `Unsupported` before any I/O happens.
    pub fn build_request(&self, op: &Operation<'_>) -> Result<RequestDescriptor, LifecycleError> {
        (self.socket.request)(op).map_err(|unsupported| LifecycleError::Unsupported {
            operation: unsupported.operation,
            identity: self.identity,
        })
    }

    #[cfg(unix)]
    async fn send(
        &self,
        operation: OperationKind,
        request: &RequestDescriptor,
    ) -> Result<OperationOutput, LifecycleError> {
        use bytes::Bytes;
        use http_body_util::{BodyExt, Full};
        use hyper_util::rt::TokioIo;
        use tokio::net::UnixStream;

        let fail = |context: &str, e: &dyn std::fmt::Display| {
            LifecycleError::transport(
                operation,
                format!("{} ({}): {}", context, self.socket.path.display(), e),
            )
        };

        let stream = UnixStream::connect(&self.socket.path)
            .await
            .map_err(|e| fail("failed to connect to socket", &e))?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| fail("HTTP handshake failed", &e))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("socket connection error: {}", e);
            }
        });

        let body = match &request.body {
            Some(json) => Bytes::from(
                serde_json::to_vec(json).map_err(|e| fail("failed to encode body", &e))?,
            ),
            None => Bytes::new(),
        };

        let mut builder = hyper::Request::builder()
            .method(request.method.as_str())
            .uri(&request.url)
            .header("Host", "localhost");
        if request.body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        let req = builder
            .body(Full::new(body))
            .map_err(|e| fail("failed to build request", &e))?;

        tracing::debug!(method = %request.method, url = %request.url, "sending socket request");

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| fail("request failed", &e))?;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| fail("failed to read response", &e))?
            .to_bytes();

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %request.url, "engine rejected request");
        }

        Ok(OperationOutput {
            operation,
            status: i32::from(status.as_u16()),
            success: status.is_success(),
            output: body,
        })
    }

    #[cfg(not(unix))]
    async fn send(
        &self,
        operation: OperationKind,
        _request: &RequestDescriptor,
    ) -> Result<OperationOutput, LifecycleError> {
        Err(LifecycleError::transport(
            operation,
            "Unix domain sockets are not available on this platform",
        ))
    }
}

impl Sealed for SocketClient {}

#[async_trait]
impl LifecycleClient for SocketClient {
    fn identity(&self) -> RuntimeIdentity {
        self.identity
    }

    fn transport(&self) -> TransportKind {
        TransportKind::Socket
    }

    async fn execute(&self, op: Operation<'_>) -> Result<OperationOutput, LifecycleError> {
        let request = self.build_request(&op)?;
        self.send(op.kind(), &request).await
    }
}
