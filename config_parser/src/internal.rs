use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use derivative::Derivative;
use tracing::level_filters::LevelFilter;
use webhook_signature::{SharedSecret, Signer, Verifier};

use crate::raw::{ConfigFile, ConfigVersion, Route};

#[derive(Debug, Clone)]
pub struct ConfigInternal {
    pub expose: u16,
    pub uri: Option<String>,
    pub max_body_size: u64,
    pub log_level: LevelFilter,
}

/// The route with its secret turned into ready to use keys.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct RouteInternal {
    pub path: String,

    #[derivative(Debug = "ignore")]
    pub signer: Signer,
    #[derivative(Debug = "ignore")]
    pub verifier: Verifier,
}

impl RouteInternal {
    fn from_route(value: Route) -> Result<RouteInternal> {
        if !value.path.starts_with('/') {
            anyhow::bail!("The route path has to start with '/', got '{}'", value.path);
        }

        let secret = SharedSecret::new(value.secret.as_bytes())
            .context("Invalid secret for the route")?;

        Ok(RouteInternal {
            path: value.path,
            signer: Signer::new(&secret)?,
            verifier: Verifier::new(&secret)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConfigFileInternal {
    pub version: ConfigVersion,
    pub config: ConfigInternal,
    pub route: RouteInternal,
}

/// Loads `env_file`, or the first `.env` found from the working directory upwards when `None`.
///
/// Variables that are already set are not overwritten. A missing file is not an error.
pub fn load_env_file(env_file: Option<&Path>) -> Result<Option<PathBuf>> {
    let loaded = match env_file {
        Some(env_file) => dotenv::from_path(env_file).map(|_| env_file.to_path_buf()),
        None => dotenv::dotenv(),
    };

    match loaded {
        Ok(env_file) => {
            tracing::info!("Loaded environment from {}", env_file.display());

            Ok(Some(env_file))
        }
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err).context("Could not load the .env file"),
    }
}

impl ConfigFileInternal {
    /// Loads the environment file, parses the config at `path` and resolves all variables.
    pub fn load(path: impl AsRef<Path>, env_file: Option<&Path>) -> Result<ConfigFileInternal> {
        load_env_file(env_file)?;

        let mut config_file = ConfigFile::parse(path)?;
        config_file.populate_env_variables()?;

        Self::from_config(config_file)
    }

    pub fn from_config(value: ConfigFile) -> Result<ConfigFileInternal> {
        let log_level = value
            .config
            .log_level
            .parse::<LevelFilter>()
            .with_context(|| format!("Unknown log level: '{}'", value.config.log_level))?;

        Ok(ConfigFileInternal {
            version: value.version,
            config: ConfigInternal {
                expose: value.config.expose,
                uri: value.config.uri,
                max_body_size: value.config.max_body_size,
                log_level,
            },
            route: RouteInternal::from_route(value.route)?,
        })
    }
}
