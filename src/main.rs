use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use viewport_lazyload::application::{Scenario, SimulateUseCase};
use viewport_lazyload::infrastructure::{AppConfig, CliArgs, ConfigStore, load_page, load_scenario};
use viewport_lazyload::presentation::render;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<(AppConfig, ConfigStore)> {
    let store = ConfigStore::locate(args.config.clone())?;
    let mut config = store.load().wrap_err("Failed to load configuration")?;
    config.merge_with_args(args);
    Ok((config, store))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let (config, store) = load_config(&args)?;
    init_logging(&config)?;

    info!(version = viewport_lazyload::VERSION, "Starting {}", viewport_lazyload::NAME);
    debug!(path = %store.path().display(), "Configuration loaded");

    let page = load_page(&args.page, config.page.viewport_height)
        .await
        .wrap_err("Failed to load page")?;
    let scenario = match &args.scenario {
        Some(path) => load_scenario(path)
            .await
            .wrap_err("Failed to load scenario")?,
        None => Scenario::default(),
    };

    let report = SimulateUseCase::new(config.loader.clone())
        .execute(Arc::new(page), &scenario)
        .wrap_err("Simulation failed")?;

    print!("{}", render(&report, config.format)?);
    Ok(())
}
