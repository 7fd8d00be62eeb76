// ABOUTME: Validated container identifier accepted by every lifecycle operation.
// ABOUTME: Covers names and hex IDs across Docker, Podman, Kubernetes, containerd, CRI-O and LXD.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MAX_LEN: usize = 253;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerNameError {
    #[error("container name cannot be empty")]
    Empty,

    #[error("container name exceeds maximum length of {MAX_LEN} characters")]
    TooLong,

    #[error("container name must start with a letter or digit")]
    InvalidStart,

    #[error("invalid character in container name: '{0}'")]
    InvalidChar(char),
}

/// A container name or ID.
///
/// Accepts ASCII letters, digits, `_`, `.` and `-`, starting with a letter
/// or digit, which every supported engine allows in a name.
/// Anything that could change the meaning of a CLI argument vector or a URL
/// path segment (whitespace, `/`, `?`, a leading `-`) is rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(value: &str) -> Result<Self, ContainerNameError> {
        let first = value.chars().next().ok_or(ContainerNameError::Empty)?;

        if value.len() > MAX_LEN {
            return Err(ContainerNameError::TooLong);
        }

        if !first.is_ascii_alphanumeric() {
            return Err(ContainerNameError::InvalidStart);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '_' | '.' | '-'))
        {
            return Err(ContainerNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ContainerName {
    type Err = ContainerNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
