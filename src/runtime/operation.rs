// ABOUTME: The uniform lifecycle operation set and its transport descriptors.
// ABOUTME: Builders map an Operation to a CLI argument vector or an HTTP request, with no side effects.

use crate::types::{ContainerName, ImageRef};
use std::fmt;

/// Which lifecycle operation, without its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Status,
    Start,
    Stop,
    Create,
    List,
    Inspect,
    Restart,
    Remove,
    Logs,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Status => "status",
            OperationKind::Start => "start",
            OperationKind::Stop => "stop",
            OperationKind::Create => "create",
            OperationKind::List => "list",
            OperationKind::Inspect => "inspect",
            OperationKind::Restart => "restart",
            OperationKind::Remove => "remove",
            OperationKind::Logs => "logs",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle operation together with its arguments.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    Status(&'a ContainerName),
    Start(&'a ContainerName),
    Stop(&'a ContainerName),
    Create {
        name: &'a ContainerName,
        image: &'a ImageRef,
    },
    List,
    Inspect(&'a ContainerName),
    Restart(&'a ContainerName),
    Remove(&'a ContainerName),
    Logs(&'a ContainerName),
}

impl Operation<'_> {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Status(_) => OperationKind::Status,
            Operation::Start(_) => OperationKind::Start,
            Operation::Stop(_) => OperationKind::Stop,
            Operation::Create { .. } => OperationKind::Create,
            Operation::List => OperationKind::List,
            Operation::Inspect(_) => OperationKind::Inspect,
            Operation::Restart(_) => OperationKind::Restart,
            Operation::Remove(_) => OperationKind::Remove,
            Operation::Logs(_) => OperationKind::Logs,
        }
    }

    /// The container this operation targets, if any.
    pub fn target(&self) -> Option<&ContainerName> {
        match self {
            Operation::Status(name)
            | Operation::Start(name)
            | Operation::Stop(name)
            | Operation::Inspect(name)
            | Operation::Restart(name)
            | Operation::Remove(name)
            | Operation::Logs(name) => Some(*name),
            Operation::Create { name, .. } => Some(*name),
            Operation::List => None,
        }
    }
}

/// HTTP method of a socket request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to send over a socket transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path and query, e.g. `/containers/create?name=web`.
    pub url: String,
    pub body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: None,
        }
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            body: None,
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            body: None,
        }
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Marker returned by a builder for an operation the engine cannot perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{operation} is not supported on this platform")]
pub struct Unsupported {
    pub operation: OperationKind,
}

impl Unsupported {
    pub fn of(op: &Operation<'_>) -> Self {
        Self {
            operation: op.kind(),
        }
    }
}

/// Builds a CLI argument vector; `None` when the operation is unsupported.
pub type ArgvBuilder = fn(&Operation<'_>) -> Option<Vec<String>>;

/// Builds a socket request, or reports that the operation is unsupported.
pub type RequestBuilder = fn(&Operation<'_>) -> Result<RequestDescriptor, Unsupported>;

/// Builder for engines whose socket speaks no request/response API we use.
pub fn unsupported_request(op: &Operation<'_>) -> Result<RequestDescriptor, Unsupported> {
    Err(Unsupported::of(op))
}
