use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config_parser::internal::ConfigFileInternal;
use hyper::Uri;
use shared::Payload;
use tracing::level_filters::LevelFilter;
use webhook_signature::SharedSecret;

mod client;
mod server;
mod setup;

#[derive(Parser, Debug)]
#[command(name = "webhook_handler")]
#[command(about = "Send and receive HMAC-SHA256 signed webhooks")]
struct Cli {
    /// Path to the config file
    #[arg(long, short, global = true, default_value = "./webhook_handler.yml")]
    config: PathBuf,

    /// Environment file to load before the config, defaults to the first `.env` found
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Accept signed webhooks on the configured route
    Serve,
    /// Sign a JSON payload and post it to `config.uri`
    Send {
        /// File containing a JSON object
        payload: PathBuf,
    },
    /// Print the signature of a JSON payload
    Sign {
        /// File containing a JSON object
        payload: PathBuf,
    },
    /// Print a new random shared secret
    GenerateSecret,
}

async fn read_payload(path: &Path) -> Result<Payload> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Could not read the payload file {}", path.display()))?;

    Payload::from_slice(&raw)
        .with_context(|| format!("{} doesn't contain a JSON object", path.display()))
}

fn load_config(cli: &Cli, log_level: &setup::LogLevel) -> Result<ConfigFileInternal> {
    let config = ConfigFileInternal::load(&cli.config, cli.env_file.as_deref())?;
    log_level.set(config.config.log_level)?;

    tracing::debug!(?config, "Loaded config");

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = setup::init_tracing(LevelFilter::INFO)?;

    match &cli.command {
        Commands::Serve => {
            let config = load_config(&cli, &log_level)?;

            server::start(Arc::new(config)).await
        }
        Commands::Send { payload } => {
            let config = load_config(&cli, &log_level)?;
            let uri = config
                .config
                .uri
                .as_deref()
                .context("`config.uri` has to be set to send a webhook")?
                .parse::<Uri>()?;
            let payload = read_payload(payload).await?;

            let delivery = client::send(&uri, &config.route.signer, &payload).await?;
            if !delivery.status.is_success() {
                bail!(
                    "The webhook was rejected with status {}: {}",
                    delivery.status,
                    String::from_utf8_lossy(&delivery.body)
                );
            }

            println!("Webhook sent, response: {}", delivery.status);

            Ok(())
        }
        Commands::Sign { payload } => {
            let config = load_config(&cli, &log_level)?;
            let payload = read_payload(payload).await?;
            let signed = config.route.signer.sign_payload(&payload)?;

            println!("{}", signed.signature);

            Ok(())
        }
        Commands::GenerateSecret => {
            let secret = SharedSecret::generate();
            println!("{}", String::from_utf8_lossy(secret.expose()));

            Ok(())
        }
    }
}
