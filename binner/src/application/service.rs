use genome_bin_core::{SketchEngine, partition};

use super::ports::{GenomeCatalog, ResultReporter};

/// The main application service that orchestrates a binning run.
/// It is generic over the catalog and reporter ports and the sketch
/// engine, allowing for dependency injection.
pub struct BinningService<E, C, R> {
    engine: E,
    catalog: C,
    reporter: R,
    num_bins: usize,
}

impl<E, C, R> BinningService<E, C, R>
where
    E: SketchEngine,
    C: GenomeCatalog<E>,
    R: ResultReporter,
{
    /// Creates a new service with concrete implementations of the ports.
    pub fn new(engine: E, catalog: C, reporter: R, num_bins: usize) -> Self {
        Self {
            engine,
            catalog,
            reporter,
            num_bins,
        }
    }

    /// Executes the entire binning pipeline.
    pub fn run(&self) -> anyhow::Result<()> {
        tracing::info!("Starting Stage 1: Catalog collection");
        let items = self.catalog.collect(&self.engine)?;
        tracing::info!(genomes = items.len(), "Stage 1: Catalog collection finished");

        tracing::info!(num_bins = self.num_bins, "Starting Stage 2: Greedy partitioning");
        let bins = partition(&self.engine, items, self.num_bins)?;
        for (index, bin) in bins.iter().enumerate() {
            tracing::debug!(
                bin = index,
                genomes = bin.members.len(),
                cardinality = bin.cardinality,
                "Bin assembled"
            );
        }
        tracing::info!("Stage 2: Greedy partitioning finished");

        tracing::info!("Starting Stage 3: Reporting");
        self.reporter.write_assignments(&bins)?;
        self.reporter.mark_complete()?;
        tracing::info!("Stage 3: Reporting finished");

        Ok(())
    }
}
