mod application;
mod config;
mod infrastructure;

use anyhow::Result;
use config::get_config;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use application::service::BinningService;
use infrastructure::{
    catalog::SketchDirCatalog, dashing::DashingEngine, reporter::FileReporter,
};

fn setup_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.parse()?)
        .from_env_lossy();

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = get_config()?;
    setup_tracing(&config.logging.level)?;
    tracing::info!("Configuration loaded successfully");
    tracing::debug!(?config, "Full application configuration");

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.binning.num_threads)
        .build_global()?;

    let engine = DashingEngine::new(&config);
    let catalog = SketchDirCatalog::new(&config);
    let reporter = FileReporter::new(&config);

    let service = BinningService::new(engine, catalog, reporter, config.binning.num_bins);

    if let Err(e) = service.run() {
        tracing::error!("Binning run finished with an error: {:?}", e);
        std::process::exit(1);
    }

    tracing::info!("Binning completed successfully!");
    Ok(())
}
