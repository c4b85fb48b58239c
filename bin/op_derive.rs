use std::collections::HashMap;
use std::time::Duration;

use clap::Parser;
use eyre::Result;
use figment::{providers::Serialized, value::Value};

use op_derive::config::BeaconConfig;
use op_derive::runner::Runner;
use op_derive::ssz::PayloadVersion;
use op_derive::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::logging::init(cli.verbose)?;
    if cli.metrics {
        telemetry::metrics::init()?;
    }

    let config = cli.to_config()?;
    let version = if cli.capella {
        PayloadVersion::Capella
    } else {
        PayloadVersion::Bellatrix
    };

    let runner = Runner::from_config(config, version);
    runner.run(Duration::from_secs(cli.poll_interval)).await;

    Ok(())
}

#[derive(Parser)]
#[clap(name = "op-derive", about = "Decodes L2 execution payloads from L1 blob sidecars")]
pub struct Cli {
    /// Base URL of the L1 beacon node's HTTP API.
    #[clap(long, env = "OP_DERIVE_BEACON_URL")]
    beacon_url: Option<String>,
    /// Path to a TOML config file layered under CLI flags and environment variables.
    #[clap(long, default_value_t = default_config_path())]
    config_path: String,
    /// Decode payloads as Capella (with withdrawals) rather than Bellatrix.
    #[clap(long)]
    capella: bool,
    /// Seconds between polls of the advancing L1 head.
    #[clap(long, default_value = "12")]
    poll_interval: u64,
    /// Enable debug-level logging.
    #[clap(short, long)]
    verbose: bool,
    /// Start the Prometheus metrics server on port 9200.
    #[clap(long)]
    metrics: bool,
}

impl Cli {
    fn to_config(&self) -> Result<BeaconConfig> {
        let mut overrides = HashMap::new();
        if let Some(beacon_url) = &self.beacon_url {
            overrides.insert("beacon_url", Value::from(beacon_url.clone()));
        }

        let config = BeaconConfig::load(
            std::path::Path::new(&self.config_path),
            Serialized::from(overrides, "default".to_string()),
        )?;
        Ok(config)
    }
}

fn default_config_path() -> String {
    let dir = dirs::home_dir().unwrap_or_default().join(".op-derive/config.toml");
    dir.to_str().unwrap_or_default().to_string()
}
