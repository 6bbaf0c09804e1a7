use project_root::get_project_root;

use clap::Parser;
use figment::{
    Figment,
    providers::{Format, Toml},
};

use std::path::PathBuf;

/// A single, unified struct holding all application settings.
/// It is deserialized from the TOML file merged with CLI arguments.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
    pub catalog: CatalogConfig,
    pub binning: BinningConfig,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct PathsConfig {
    /// Directory of presketched genome files.
    pub sketches_dir: PathBuf,
    /// Scratch area for intermediate union sketches.
    pub scratch_dir: PathBuf,
    pub output_dir: PathBuf,
    pub completion_dir: PathBuf,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct CatalogConfig {
    /// File extension of sketch files in `sketches_dir`.
    pub sketch_extension: String,
    /// File-name tokens describing sketch-construction parameters, skipped
    /// when deriving a genome's canonical name. A naming convention of the
    /// upstream sketching stage, not an algorithmic invariant.
    pub reserved_tokens: Vec<String>,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct BinningConfig {
    pub num_bins: usize,
    pub run_id: String,
    pub num_threads: usize,
}

/// Parses command-line arguments using the clap derive macro.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of bins to partition the genome catalog into.
    pub num_bins: usize,

    /// Run identifier keying the output artifacts.
    pub run_id: String,

    #[arg(short, long)]
    pub num_threads: Option<usize>,

    #[arg(long)]
    pub sketches_dir: Option<PathBuf>,
}

/// Loads configuration from the TOML file and merges it with CLI arguments.
pub fn get_config() -> anyhow::Result<Config> {
    let cli = Cli::parse();

    let config_path = get_project_root()?.join("config/settings.toml");
    let mut figment = Figment::new()
        .merge(Toml::file(config_path))
        .merge(("binning.num_bins", cli.num_bins))
        .merge(("binning.run_id", cli.run_id.as_str()));

    if let Some(cli_threads) = cli.num_threads {
        figment = figment.merge(("binning.num_threads", cli_threads));
    }
    if let Some(sketches_dir) = &cli.sketches_dir {
        figment = figment.merge(("paths.sketches_dir", sketches_dir));
    }

    let mut config: Config = figment.extract()?;

    anyhow::ensure!(
        config.binning.num_bins >= 1,
        "number of bins must be at least 1"
    );

    if config.binning.num_threads == 0 {
        let num_threads = std::thread::available_parallelism()?.get();
        config.binning.num_threads = num_threads;
    }

    Ok(config)
}
