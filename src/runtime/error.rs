// ABOUTME: Runtime error types with SNAFU pattern.
// ABOUTME: Unifies detection and transport-resolution errors for programmatic handling.

use snafu::Snafu;

use super::detection::DetectionError;
use super::resolver::ResolveError;

/// Unified error for detection and resolution failures.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("runtime detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("runtime resolution failed: {source}"))]
    Resolution { source: ResolveError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// A runtime override could not be parsed.
    InvalidOverride,
    /// Subprocess permission is not granted.
    PermissionMissing,
    /// Neither the CLI nor any socket candidate is reachable.
    NothingReachable,
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Detection { source } => match source {
                DetectionError::InvalidOverride(_) => RuntimeErrorKind::InvalidOverride,
            },
            RuntimeError::Resolution { source } => match source {
                ResolveError::PermissionMissing { .. } => RuntimeErrorKind::PermissionMissing,
                ResolveError::NothingReachable { .. } => RuntimeErrorKind::NothingReachable,
            },
        }
    }

    /// Binary and socket paths that were tried, if resolution found nothing.
    pub fn attempted(&self) -> Option<(&'static str, &[std::path::PathBuf])> {
        match self {
            RuntimeError::Resolution {
                source: ResolveError::NothingReachable {
                    binary, attempted, ..
                },
            } => Some((*binary, attempted.as_slice())),
            _ => None,
        }
    }
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}

impl From<ResolveError> for RuntimeError {
    fn from(source: ResolveError) -> Self {
        RuntimeError::Resolution { source }
    }
}
