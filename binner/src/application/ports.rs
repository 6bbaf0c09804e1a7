use genome_bin_core::{Bin, GenomeItem, SketchEngine};

/// A contract for a service that discovers genome sketches, derives their
/// canonical names and obtains per-genome cardinality estimates.
pub trait GenomeCatalog<E: SketchEngine> {
    /// Items in deterministic discovery order.
    fn collect(&self, engine: &E) -> anyhow::Result<Vec<GenomeItem<E::Sketch>>>;
}

/// A contract for a service that persists bin assignments and signals
/// completion to the downstream stage.
pub trait ResultReporter {
    fn write_assignments<S>(&self, bins: &[Bin<S>]) -> anyhow::Result<()>;
    fn mark_complete(&self) -> anyhow::Result<()>;
}
