use anyhow::{Context, Result};
use rayon::prelude::*;

use genome_bin_core::{GenomeItem, SketchEngine};

use std::path::{Path, PathBuf};

use crate::application::ports::GenomeCatalog;
use crate::config::Config;
use crate::infrastructure::dashing::{DashingEngine, SketchFile};

/// An adapter that implements the `GenomeCatalog` port over a directory
/// of presketched genome files.
///
/// Discovery order is lexicographic by file path so that identical inputs
/// produce identical runs. Cardinality queries are independent of each
/// other and fan out across the rayon pool; the collected items keep
/// discovery order.
pub struct SketchDirCatalog {
    sketches_dir: PathBuf,
    sketch_extension: String,
    reserved_tokens: Vec<String>,
}

impl SketchDirCatalog {
    /// Creates a new `SketchDirCatalog` from the application config.
    pub fn new(config: &Config) -> Self {
        Self {
            sketches_dir: config.paths.sketches_dir.clone(),
            sketch_extension: config.catalog.sketch_extension.clone(),
            reserved_tokens: config.catalog.reserved_tokens.clone(),
        }
    }
}

impl GenomeCatalog<DashingEngine> for SketchDirCatalog {
    fn collect(&self, engine: &DashingEngine) -> Result<Vec<GenomeItem<SketchFile>>> {
        let paths = list_sketches(&self.sketches_dir, &self.sketch_extension)?;
        tracing::debug!(sketches = paths.len(), "Catalog discovered sketch files");

        paths
            .par_iter()
            .map(|path| {
                let name = canonical_name(file_name(path)?, &self.reserved_tokens);
                let sketch = SketchFile::source(path.clone());
                let cardinality = engine.cardinality(&sketch)?;
                Ok(GenomeItem {
                    name,
                    sketch,
                    cardinality,
                })
            })
            .collect()
    }
}

/// Sketch files under `dir` with the given extension, sorted
/// lexicographically by path.
fn list_sketches(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading sketches directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == extension) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("non-unicode sketch file name: {}", path.display()))
}

/// Derives a genome's canonical name from its sketch file name.
///
/// The file name is split on dots and the first token not in the reserved
/// vocabulary wins. When every token is reserved, the raw file name is
/// returned unchanged; a fallback, not an error.
///
/// `SAMEA897824.fa.gz.w.31.spacing.10.hll` -> `SAMEA897824`
pub fn canonical_name(file_name: &str, reserved_tokens: &[String]) -> String {
    file_name
        .split('.')
        .find(|token| !reserved_tokens.iter().any(|reserved| reserved == token))
        .map(str::to_owned)
        .unwrap_or_else(|| file_name.to_owned())
}
