// ABOUTME: Configuration types and parsing for hatch.yml.
// ABOUTME: Discovers the file in a directory; a missing file means defaults.

use crate::error::{Error, Result};
use crate::probe::{HostProber, SubprocessPolicy};
use crate::runtime::{ClientSettings, PreflightPolicy, RuntimeIdentity};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "hatch.yml";
pub const CONFIG_FILENAME_ALT: &str = "hatch.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".hatch/config.yml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Skip detection and use this runtime.
    #[serde(default)]
    pub runtime: Option<RuntimeIdentity>,

    #[serde(default)]
    pub subprocess: SubprocessPolicy,

    #[serde(default)]
    pub preflight: PreflightPolicy,

    /// PATH-style list of directories to find CLI binaries in.
    #[serde(default)]
    pub search_path: Option<String>,

    /// Upper bound the binary puts on a single operation.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// First config file present in `dir`.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        [CONFIG_FILENAME, CONFIG_FILENAME_ALT, CONFIG_FILENAME_DIR]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the config file in `dir`, or defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        match Self::find(dir) {
            Some(path) => Self::load(&path),
            None => {
                tracing::debug!(dir = %dir.display(), "no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(ref paths) = self.search_path
            && paths.trim().is_empty()
        {
            return Err(Error::InvalidConfig(
                "search_path cannot be empty".to_string(),
            ));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::InvalidConfig("timeout must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn search_path(&self) -> Option<OsString> {
        self.search_path.as_ref().map(OsString::from)
    }

    pub fn prober(&self) -> HostProber {
        let prober = HostProber::new().policy(self.subprocess);
        match self.search_path() {
            Some(paths) => prober.search_path(paths),
            None => prober,
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            preflight: self.preflight,
        }
    }
}
