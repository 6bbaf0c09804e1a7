use anyhow::{Context, Result, ensure};
use tempfile::TempPath;

use genome_bin_core::SketchEngine;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::Config;

// --- Sketch Handles ---

/// An opaque handle to an on-disk HLL sketch.
///
/// Source sketches point into the catalog directory and are never
/// touched. Every union result lives in its own scratch file owned by a
/// `TempPath`, so it is deleted on every exit path and cannot collide
/// with another partitioning run merging concurrently.
#[derive(Debug)]
pub enum SketchFile {
    Source(PathBuf),
    Scratch(TempPath),
}

impl SketchFile {
    pub fn source(path: PathBuf) -> Self {
        Self::Source(path)
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Source(path) => path,
            Self::Scratch(temp) => temp,
        }
    }
}

// --- Engine Adapter ---

/// An adapter that implements the `SketchEngine` capability over the
/// external `dashing` binary, which built the sketches upstream.
pub struct DashingEngine {
    scratch_dir: PathBuf,
}

impl DashingEngine {
    /// Creates a new `DashingEngine` with the application config.
    pub fn new(config: &Config) -> Self {
        Self {
            scratch_dir: config.paths.scratch_dir.clone(),
        }
    }
}

impl SketchEngine for DashingEngine {
    type Sketch = SketchFile;

    /// `dashing card --presketched <file>`; the estimate is the last
    /// tab-separated field of stdout.
    fn cardinality(&self, sketch: &Self::Sketch) -> Result<f64> {
        let output = Command::new("dashing")
            .args(["card", "--presketched"])
            .arg(sketch.path())
            .output()
            .context("running `dashing card`")?;
        ensure!(
            output.status.success(),
            "`dashing card` failed on {}: {}",
            sketch.path().display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );

        parse_cardinality(&String::from_utf8_lossy(&output.stdout))
            .with_context(|| format!("parsing estimate for {}", sketch.path().display()))
    }

    /// `dashing union -o <scratch> <a> <b>`.
    fn union(&self, a: &Self::Sketch, b: &Self::Sketch) -> Result<Self::Sketch> {
        std::fs::create_dir_all(&self.scratch_dir)
            .with_context(|| format!("creating scratch dir {}", self.scratch_dir.display()))?;
        let scratch = tempfile::Builder::new()
            .prefix("union_")
            .suffix(".hll")
            .tempfile_in(&self.scratch_dir)?
            .into_temp_path();

        let output = Command::new("dashing")
            .args(["union", "-o"])
            .arg(scratch.as_os_str())
            .arg(a.path())
            .arg(b.path())
            .stdout(Stdio::null())
            .output()
            .context("running `dashing union`")?;
        ensure!(
            output.status.success(),
            "`dashing union` failed on {} + {}: {}",
            a.path().display(),
            b.path().display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );

        Ok(SketchFile::Scratch(scratch))
    }
}

fn parse_cardinality(stdout: &str) -> Result<f64> {
    let field = stdout
        .trim()
        .rsplit('\t')
        .next()
        .context("empty `dashing card` output")?;
    let estimate: f64 = field
        .trim()
        .parse()
        .with_context(|| format!("unexpected `dashing card` field: {field:?}"))?;
    ensure!(
        estimate >= 0.0 && estimate.is_finite(),
        "negative or non-finite estimate: {estimate}"
    );
    Ok(estimate)
}
