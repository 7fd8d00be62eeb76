// ABOUTME: PermissionVerdict, the outcome of one capability probe.
// ABOUTME: Carries the state plus optional diagnostics (message, probed path, exit code).

use std::fmt;
use std::path::PathBuf;

/// Outcome class of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionState {
    Granted,
    Denied,
    /// The binary or path does not exist.
    Unavailable,
    /// The probe itself failed.
    Error,
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Unavailable => "unavailable",
            PermissionState::Error => "error",
        };
        f.write_str(s)
    }
}

/// Result of probing one capability. Never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionVerdict {
    pub state: PermissionState,
    pub message: Option<String>,
    /// Set for path-based probes.
    pub path: Option<PathBuf>,
    /// Set when a subprocess was spawned and exited normally.
    pub exit_code: Option<i32>,
}

impl PermissionVerdict {
    fn with_state(state: PermissionState, message: Option<String>) -> Self {
        Self {
            state,
            message,
            path: None,
            exit_code: None,
        }
    }

    pub fn granted() -> Self {
        Self::with_state(PermissionState::Granted, None)
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self::with_state(PermissionState::Denied, Some(message.into()))
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::with_state(PermissionState::Unavailable, Some(message.into()))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_state(PermissionState::Error, Some(message.into()))
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_exit_code(mut self, code: Option<i32>) -> Self {
        self.exit_code = code;
        self
    }

    pub fn is_granted(&self) -> bool {
        self.state == PermissionState::Granted
    }
}

impl fmt::Display for PermissionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        if let Some(ref path) = self.path {
            write!(f, " ({})", path.display())?;
        }
        Ok(())
    }
}
