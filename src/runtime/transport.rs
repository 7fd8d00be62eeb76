// ABOUTME: TransportCandidate: one concrete way (CLI binary or socket) to reach an engine.
// ABOUTME: A resolved client is bound to exactly one of these for its lifetime.

use super::operation::RequestBuilder;
use std::fmt;
use std::path::{Path, PathBuf};

/// A socket path plus the builder that turns operations into requests on it.
#[derive(Clone)]
pub struct SocketCandidate {
    pub path: PathBuf,
    pub request: RequestBuilder,
}

impl fmt::Debug for SocketCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketCandidate")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// One way to reach a runtime.
#[derive(Debug, Clone)]
pub enum TransportCandidate {
    Cli { binary: &'static str },
    Socket(SocketCandidate),
}

impl TransportCandidate {
    pub fn kind(&self) -> TransportKind {
        match self {
            TransportCandidate::Cli { .. } => TransportKind::Cli,
            TransportCandidate::Socket(_) => TransportKind::Socket,
        }
    }

    pub fn binary(&self) -> Option<&'static str> {
        match self {
            TransportCandidate::Cli { binary } => Some(binary),
            TransportCandidate::Socket(_) => None,
        }
    }

    pub fn socket_path(&self) -> Option<&Path> {
        match self {
            TransportCandidate::Cli { .. } => None,
            TransportCandidate::Socket(socket) => Some(&socket.path),
        }
    }
}

impl fmt::Display for TransportCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCandidate::Cli { binary } => write!(f, "cli {}", binary),
            TransportCandidate::Socket(socket) => write!(f, "socket {}", socket.path.display()),
        }
    }
}

/// Transport a client talks over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Host platform; nothing is contacted.
    Noop,
    Cli,
    Socket,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportKind::Noop => "noop",
            TransportKind::Cli => "cli",
            TransportKind::Socket => "socket",
        };
        f.write_str(s)
    }
}
