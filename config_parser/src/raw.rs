use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use shared::constants::{DEFAULT_MAX_BODY_SIZE, DEFAULT_ROUTE_PATH};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Variable<'a> {
    Env(&'a str),
}

/// Values written as `${{ env.NAME }}` are taken from the environment when the file is loaded.
pub(crate) trait ReplaceVariables {
    const VARIABLE_PREFIX: &'static str = "${{";
    const VARIABLE_SUFFIX: &'static str = "}}";

    fn get_inner(value: &str) -> Result<Option<Variable<'_>>> {
        let Some(inner) = value
            .trim()
            .strip_prefix(Self::VARIABLE_PREFIX)
            .and_then(|item| item.strip_suffix(Self::VARIABLE_SUFFIX))
            .map(|item| item.trim())
        else {
            return Ok(None);
        };

        match inner.strip_prefix("env.") {
            Some(env_key) if !env_key.is_empty() => Ok(Some(Variable::Env(env_key))),
            _ => bail!("Unknown variable: {:?}", inner),
        }
    }

    fn replace_value(value: &mut String) -> Result<()> {
        if let Some(variable) = Self::get_inner(value.as_str())? {
            let replace_with = match variable {
                Variable::Env(env_key) => std::env::var(env_key).with_context(|| {
                    format!(
                        "Could not find an environment variable with the name: '{}'",
                        env_key
                    )
                })?,
            };

            *value = replace_with;
        }

        Ok(())
    }

    fn replace(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub enum ConfigVersion {
    V1_0Beta,
}

impl Display for ConfigVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigVersion::V1_0Beta => write!(f, "1.0-beta"),
        }
    }
}

impl FromStr for ConfigVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1.0-beta" => Ok(ConfigVersion::V1_0Beta),
            _ => bail!("Unknown version: {}", s),
        }
    }
}

fn default_max_body_size() -> u64 {
    DEFAULT_MAX_BODY_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_path() -> String {
    DEFAULT_ROUTE_PATH.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port the receiver listens on.
    pub expose: u16,
    /// Where `send` delivers payloads to.
    pub uri: Option<String>,
    #[serde(default = "default_max_body_size")]
    pub max_body_size: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ReplaceVariables for Config {
    fn replace(&mut self) -> Result<()> {
        if let Some(uri) = &mut self.uri {
            Self::replace_value(uri)?;
        }

        Self::replace_value(&mut self.log_level)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    #[serde(default = "default_path")]
    pub path: String,
    pub secret: String,
}

impl ReplaceVariables for Route {
    fn replace(&mut self) -> Result<()> {
        if Self::get_inner(&self.path)?.is_some() {
            bail!("The route path can't be taken from a variable");
        }

        Self::replace_value(&mut self.secret)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub version: ConfigVersion,
    pub config: Config,
    pub route: Route,
}

impl ConfigFile {
    pub fn parse(path: impl AsRef<Path>) -> Result<ConfigFile> {
        let path = path.as_ref();
        let config_file = std::fs::File::open(path)
            .with_context(|| format!("Could not open the config file {}", path.display()))?;

        Self::parse_from_reader(config_file)
    }

    pub fn parse_from_reader<R: std::io::Read>(reader: R) -> Result<ConfigFile> {
        let config = serde_yaml::from_reader(reader)?;

        Ok(config)
    }

    pub fn populate_env_variables(&mut self) -> Result<()> {
        self.config.replace()?;
        self.route.replace()?;

        Ok(())
    }
}
