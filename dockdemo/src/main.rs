use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dockdemo::config::{self, Overrides};
use dockdemo::state::AppState;
use dockdemo_core::lifecycle::BoxError;
use dockdemo_core::{init_tracing, DemoConfig, LogFormat};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "dockdemo", version, about = "Demo HTTP service with in-memory user CRUD")]
struct Cli {
    /// Configuration profile (overridden by DOCKDEMO_PROFILE)
    #[arg(long, default_value = "dev")]
    profile: String,

    /// Bind address, overrides `host`
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides `port`
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding application.yaml and .env files
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // No-op when run() already installed the subscriber.
            init_tracing(LogFormat::Pretty, "info");
            error!(error = %e, "dockdemo failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    let raw = DemoConfig::load_from(&cli.config_dir, &cli.profile)?;
    let overrides = Overrides {
        host: cli.host,
        port: cli.port,
    };
    let config = config::resolve(raw, &overrides)?;

    init_tracing(config.log_format, config.log_filter());
    info!(
        profile = config.profile(),
        app = %config.app_name,
        debug = config.debug,
        "starting dockdemo"
    );
    if config.uses_default_secret() && !config.debug {
        warn!("SECRET_KEY is not set; using the development default outside debug mode");
    }

    let addr = config.addr();
    let state = AppState::from_config(config);

    dockdemo::app(state)
        .on_start(|state: AppState| async move {
            let users = state.users.count().await;
            info!(users, "user store ready");
            Ok::<(), BoxError>(())
        })
        .on_stop(|| async {
            info!("dockdemo stopped");
        })
        .serve(&addr)
        .await
}
