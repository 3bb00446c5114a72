use std::{env, path::PathBuf, process};

use anyhow::Context;
use tally::{
    init,
    server::{cors_layer, router, AppState},
    utils::build_info,
};
use tally_config::{model::BIND_ENV, ConfigManager};

enum Command {
    Serve { config: Option<PathBuf> },
    Version,
    Help,
}

fn main() {
    let command = match parse_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    let result = match command {
        Command::Version => {
            println!("{}", build_info::describe());
            Ok(())
        }
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Serve { config } => serve(config),
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(Command::Version),
            "--help" | "-h" => return Ok(Command::Help),
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--config requires a path".to_string())?;
                config = Some(PathBuf::from(path));
            }
            other => return Err(format!("unrecognized argument `{other}`")),
        }
    }
    Ok(Command::Serve { config })
}

fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let manager = ConfigManager::locate(config_path).context("locating configuration")?;
    let mut config = manager
        .load()
        .with_context(|| format!("loading {}", manager.config_path().display()))?;
    config.override_bind_address(env::var(BIND_ENV).ok());

    init(&config.log_filter);
    tracing::info!(
        config = %manager.config_path().display(),
        data_dir = %config.resolve_data_dir().display(),
        "configuration loaded"
    );

    let cors = cors_layer(config.cors_allow_origin.as_deref())
        .context("invalid cors_allow_origin")?;
    let app = router(AppState::from_config(&config), cors);

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&config.bind_address)
            .await
            .with_context(|| format!("binding {}", config.bind_address))?;
        tracing::info!(address = %config.bind_address, "listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

const USAGE: &str = "Usage: tally_server [--config <path>]

Options:
  -c, --config <path>  configuration file (default: $TALLY_CONFIG or ~/.tally/config/config.json)
  -V, --version        print build information
  -h, --help           print this help

Environment:
  TALLY_HOME   base directory for configuration
  TALLY_BIND   overrides bind_address
  RUST_LOG     overrides log_filter";
