use anyhow::{Context, Result};

use genome_bin_core::Bin;

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::application::ports::ResultReporter;
use crate::config::Config;

/// An adapter that implements the `ResultReporter` port.
///
/// Writes one line per bin in index order to
/// `<output_dir>/<run_id>_bin_assignment.txt` and drops an empty
/// completion marker `<completion_dir>/<run_id>_binned.done` for the
/// downstream stage.
pub struct FileReporter {
    output_dir: PathBuf,
    completion_dir: PathBuf,
    run_id: String,
}

impl FileReporter {
    /// Creates a new `FileReporter` with the application config.
    pub fn new(config: &Config) -> Self {
        Self::with_dirs(
            config.paths.output_dir.clone(),
            config.paths.completion_dir.clone(),
            config.binning.run_id.clone(),
        )
    }

    pub fn with_dirs(output_dir: PathBuf, completion_dir: PathBuf, run_id: String) -> Self {
        Self {
            output_dir,
            completion_dir,
            run_id,
        }
    }
}

impl ResultReporter for FileReporter {
    fn write_assignments<S>(&self, bins: &[Bin<S>]) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating output dir {}", self.output_dir.display()))?;

        let mut report = String::new();
        for (index, bin) in bins.iter().enumerate() {
            writeln!(
                report,
                "Bin {}: {}; Cardinality: {}",
                index,
                bin.members.join(", "),
                bin.cardinality
            )?;
        }

        let path = self
            .output_dir
            .join(format!("{}_bin_assignment.txt", self.run_id));
        std::fs::write(&path, report)
            .with_context(|| format!("writing bin assignments to {}", path.display()))?;
        tracing::info!("Bin assignments saved to {:?}", path);

        Ok(())
    }

    fn mark_complete(&self) -> Result<()> {
        std::fs::create_dir_all(&self.completion_dir)
            .with_context(|| format!("creating completion dir {}", self.completion_dir.display()))?;

        let path = self
            .completion_dir
            .join(format!("{}_binned.done", self.run_id));
        std::fs::write(&path, b"").with_context(|| format!("touching {}", path.display()))?;

        Ok(())
    }
}
