use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lanshare::auth::HASH_COST;
use lanshare::server::{self, ServerConfig};
use lanshare::{Config, StartupError};

#[derive(Parser, Debug)]
#[command(name = "lanshare")]
#[command(about = "Share the current directory over HTTP on the local network")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "LANSHARE_PORT", default_value = "5000")]
    port: u16,

    /// Require this password (HTTP Basic auth, any username)
    #[arg(long, env = "LANSHARE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Directory to serve
    #[arg(short, long, env = "LANSHARE_ROOT", default_value = ".")]
    root: PathBuf,

    /// Address to bind to instead of the discovered LAN address
    #[arg(short, long, env = "LANSHARE_BIND")]
    bind: Option<IpAddr>,

    /// Enable verbose logging
    #[arg(short, long, env = "LANSHARE_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "LANSHARE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "lanshare=debug,tower_http=debug"
    } else {
        "lanshare=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    // Load config from file if provided, otherwise use defaults
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let root_dir = server::resolve_root(&cli.root)?;

    let mut server_config = ServerConfig::new(cli.port, root_dir);
    server_config.bind = cli.bind;

    server::start(server_config, config, cli.password, HASH_COST).await
}
