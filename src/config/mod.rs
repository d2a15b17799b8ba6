// ABOUTME: Configuration types and loading for registry-prune.
// ABOUTME: Reads YAML files or GitHub Actions inputs and applies CLI overrides.

mod env_value;

pub use env_value::EnvValue;

use crate::error::{Error, Result};
use crate::registry::{DEFAULT_REGION, RegistrySettings, StaticCredentials};
use crate::types::RepositoryName;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "registry-prune.yml";
pub const CONFIG_FILENAME_ALT: &str = "registry-prune.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".registry-prune/config.yml";

pub const INPUT_REGION: &str = "aws-region";
pub const INPUT_ACCESS_KEY_ID: &str = "aws-access-key-id";
pub const INPUT_SECRET_ACCESS_KEY: &str = "aws-secret-access-key";
pub const INPUT_REPOSITORY: &str = "repository-name";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_repository")]
    pub repository: RepositoryName,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,

    /// Per-operation timeout handed to the registry client.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Where to append the markdown step summary.
    #[serde(default)]
    pub summary_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    pub access_key_id: EnvValue,
    pub secret_access_key: EnvValue,
}

/// Values given on the command line, which win over file or input values.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repository: Option<String>,
    pub region: Option<String>,
    pub summary_file: Option<PathBuf>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_max_attempts() -> u32 {
    3
}

impl Config {
    /// Minimal configuration for one repository.
    pub fn new(repository: RepositoryName) -> Self {
        Config {
            repository,
            region: default_region(),
            credentials: None,
            timeout: None,
            max_attempts: default_max_attempts(),
            summary_file: None,
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Build from action inputs looked up by name (e.g. `repository-name`).
    ///
    /// Blank inputs count as unset. Credentials must be given together or not
    /// at all; without them the default provider chain applies.
    pub fn from_inputs<F>(input: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            input(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let repository = get(INPUT_REPOSITORY)
            .ok_or_else(|| Error::MissingInput(INPUT_REPOSITORY.to_string()))?;
        let repository = RepositoryName::new(&repository)
            .map_err(|e| Error::InvalidConfig(format!("{INPUT_REPOSITORY}: {e}")))?;

        let credentials = match (get(INPUT_ACCESS_KEY_ID), get(INPUT_SECRET_ACCESS_KEY)) {
            (Some(access_key_id), Some(secret_access_key)) => Some(CredentialsConfig {
                access_key_id: EnvValue::Literal(access_key_id),
                secret_access_key: EnvValue::Literal(secret_access_key),
            }),
            (None, None) => None,
            _ => {
                return Err(Error::InvalidConfig(format!(
                    "{INPUT_ACCESS_KEY_ID} and {INPUT_SECRET_ACCESS_KEY} must be set together"
                )));
            }
        };

        let mut config = Config::new(repository);
        if let Some(region) = get(INPUT_REGION) {
            config.region = region;
        }
        config.credentials = credentials;
        Ok(config)
    }

    /// Build from the `INPUT_*` variables a GitHub Actions runner sets.
    pub fn from_action_inputs() -> Result<Self> {
        Self::from_inputs(|name| std::env::var(action_input_var(name)).ok())
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(ref repository) = overrides.repository {
            self.repository =
                RepositoryName::new(repository).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        }
        if let Some(region) = overrides.region {
            self.region = region;
        }
        if overrides.summary_file.is_some() {
            self.summary_file = overrides.summary_file;
        }
        Ok(self)
    }

    /// Resolve credentials and produce client settings.
    pub fn registry_settings(&self) -> Result<RegistrySettings> {
        if self.region.trim().is_empty() {
            return Err(Error::InvalidConfig("region cannot be empty".to_string()));
        }

        let credentials = match self.credentials {
            Some(ref creds) => Some(StaticCredentials {
                access_key_id: creds.access_key_id.resolve()?,
                secret_access_key: creds.secret_access_key.resolve()?,
            }),
            None => None,
        };

        Ok(RegistrySettings {
            region: self.region.clone(),
            credentials,
            timeout: self.timeout,
            max_attempts: self.max_attempts,
        })
    }
}

/// Environment variable holding a GitHub Actions input.
pub fn action_input_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

fn deserialize_repository<'de, D>(deserializer: D) -> std::result::Result<RepositoryName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    RepositoryName::new(&s).map_err(serde::de::Error::custom)
}
