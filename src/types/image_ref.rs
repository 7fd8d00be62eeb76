// ABOUTME: Image reference validation for create operations.
// ABOUTME: Keeps the reference verbatim so each engine receives exactly what the caller wrote.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0:?}")]
    InvalidChar(char),

    #[error("image reference cannot start with '-': {0}")]
    LeadingDash(String),
}

/// An image reference such as `nginx:latest`, `ghcr.io/org/app@sha256:...`
/// or an LXD alias like `images:alpine/3.19`.
///
/// Engines disagree on image syntax, so no defaulting or normalization is
/// applied. Validation only rules out input that would be unsafe to place in
/// an argument vector or a JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        if input.starts_with('-') {
            return Err(ParseImageRefError::LeadingDash(input.to_string()));
        }

        if let Some(c) = input.chars().find(|c| {
            !c.is_ascii_alphanumeric() && !matches!(c, '/' | ':' | '.' | '-' | '_' | '@')
        }) {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ImageRef {
    type Err = ParseImageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
