use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use provider_registry_gateway::config::GatewayConfig;
use provider_registry_gateway::gateway::server::run_server;
use provider_registry_gateway::logging::{self, LogFormat};

#[derive(Parser)]
#[command(name = "provider-registry-gateway")]
#[command(version, about = "Caching registry gateway for Terraform providers")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration file
    #[arg(long)]
    listen: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.log_format);

    let mut config = GatewayConfig::load(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    info!("Starting provider-registry-gateway {}", env!("CARGO_PKG_VERSION"));

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run_server(config))
}
