use crate::item::{Bin, GenomeItem};
use crate::sketch::SketchEngine;

/// Greedy multiway number partitioning over mergeable sketches.
///
/// Genomes are processed from largest to smallest estimated cardinality,
/// each joining the bin with the smallest current union estimate. Placing
/// the large genomes first keeps a late large genome from wrecking the
/// balance, the classical justification for largest-first greedy
/// partitioning. Bin totals are re-estimated from the merged sketch after
/// every assignment, so overlap between genomes is never double counted.
///
/// Returns exactly `num_bins` bins forming an exact partition of the
/// input set. Empty input yields `num_bins` empty bins. Any engine
/// failure aborts the run; no partial result is returned.
pub fn partition<E: SketchEngine>(
    engine: &E,
    mut items: Vec<GenomeItem<E::Sketch>>,
    num_bins: usize,
) -> anyhow::Result<Vec<Bin<E::Sketch>>> {
    anyhow::ensure!(num_bins >= 1, "number of bins must be at least 1");

    // Stable sort: genomes with equal cardinality keep their discovery
    // order, which keeps assignments reproducible across runs.
    items.sort_by(|a, b| b.cardinality.total_cmp(&a.cardinality));

    let mut bins: Vec<Bin<E::Sketch>> = (0..num_bins).map(|_| Bin::empty()).collect();
    let mut items = items.into_iter();

    // Seed phase: the largest genomes claim one bin each.
    for bin in bins.iter_mut() {
        let Some(item) = items.next() else { break };
        bin.cardinality = item.cardinality;
        bin.sketch = Some(item.sketch);
        bin.members.push(item.name);
    }

    // Greedy phase: every remaining genome joins the smallest bin.
    for item in items {
        let target = smallest_bin(&bins);
        let bin = &mut bins[target];
        let merged = match bin.sketch.take() {
            Some(current) => engine.union(&current, &item.sketch)?,
            // Only reachable if a bin was never seeded; the union with
            // an empty bin is the genome itself.
            None => item.sketch,
        };
        bin.cardinality = engine.cardinality(&merged)?;
        bin.sketch = Some(merged);
        bin.members.push(item.name);
    }

    Ok(bins)
}

/// Index of the bin with the smallest union estimate; ties go to the
/// lowest index.
fn smallest_bin<S>(bins: &[Bin<S>]) -> usize {
    let mut target = 0;
    for (index, bin) in bins.iter().enumerate().skip(1) {
        if bin.cardinality < bins[target].cardinality {
            target = index;
        }
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::MemoryEngine;

    use std::collections::HashSet;
    use std::ops::Range;

    /// Exact reference engine over plain element sets.
    struct ExactEngine;

    impl SketchEngine for ExactEngine {
        type Sketch = HashSet<u64>;

        fn cardinality(&self, sketch: &Self::Sketch) -> anyhow::Result<f64> {
            Ok(sketch.len() as f64)
        }

        fn union(&self, a: &Self::Sketch, b: &Self::Sketch) -> anyhow::Result<Self::Sketch> {
            Ok(a.union(b).copied().collect())
        }
    }

    /// Engine whose union always fails, for error propagation checks.
    struct BrokenEngine;

    impl SketchEngine for BrokenEngine {
        type Sketch = HashSet<u64>;

        fn cardinality(&self, sketch: &Self::Sketch) -> anyhow::Result<f64> {
            Ok(sketch.len() as f64)
        }

        fn union(&self, _: &Self::Sketch, _: &Self::Sketch) -> anyhow::Result<Self::Sketch> {
            anyhow::bail!("sketch engine unavailable")
        }
    }

    fn item(name: &str, elements: Range<u64>) -> GenomeItem<HashSet<u64>> {
        let sketch: HashSet<u64> = elements.collect();
        let cardinality = sketch.len() as f64;
        GenomeItem {
            name: name.to_owned(),
            sketch,
            cardinality,
        }
    }

    fn members(bin: &Bin<HashSet<u64>>) -> Vec<&str> {
        bin.members.iter().map(String::as_str).collect()
    }

    #[test]
    fn balances_disjoint_genomes() {
        // Seed: a -> bin 0 (100), b -> bin 1 (90).
        // c (50) joins bin 1 (min 90) -> 140; d (10) joins bin 0 (min 100) -> 110.
        let items = vec![
            item("a", 0..100),
            item("b", 100..190),
            item("c", 190..240),
            item("d", 240..250),
        ];

        let bins = partition(&ExactEngine, items, 2).unwrap();

        assert_eq!(members(&bins[0]), ["a", "d"]);
        assert_eq!(bins[0].cardinality, 110.0);
        assert_eq!(members(&bins[1]), ["b", "c"]);
        assert_eq!(bins[1].cardinality, 140.0);
    }

    #[test]
    fn sorts_largest_first_regardless_of_discovery_order() {
        let items = vec![
            item("d", 240..250),
            item("c", 190..240),
            item("a", 0..100),
            item("b", 100..190),
        ];

        let bins = partition(&ExactEngine, items, 2).unwrap();

        assert_eq!(members(&bins[0]), ["a", "d"]);
        assert_eq!(members(&bins[1]), ["b", "c"]);
    }

    #[test]
    fn overlap_is_not_summed() {
        // 80 of b's 100 elements are already in a.
        let items = vec![item("a", 0..100), item("b", 20..120)];

        let bins = partition(&ExactEngine, items, 1).unwrap();

        assert_eq!(members(&bins[0]), ["a", "b"]);
        assert_eq!(bins[0].cardinality, 120.0);
    }

    #[test]
    fn every_genome_lands_in_exactly_one_bin() {
        let items: Vec<_> = (0..23)
            .map(|i| item(&format!("g{i}"), (i * 7)..(i * 7 + 3 + i % 5)))
            .collect();
        let names: HashSet<String> = items.iter().map(|i| i.name.clone()).collect();

        let bins = partition(&ExactEngine, items, 4).unwrap();

        assert_eq!(bins.len(), 4);
        let mut seen = HashSet::new();
        for bin in &bins {
            for name in &bin.members {
                assert!(seen.insert(name.clone()), "{name} assigned twice");
            }
        }
        assert_eq!(seen, names);
    }

    #[test]
    fn one_genome_per_bin_when_counts_match() {
        let items = vec![item("a", 0..30), item("b", 30..50), item("c", 50..60)];

        let bins = partition(&ExactEngine, items, 3).unwrap();

        assert_eq!(members(&bins[0]), ["a"]);
        assert_eq!(bins[0].cardinality, 30.0);
        assert_eq!(members(&bins[1]), ["b"]);
        assert_eq!(bins[1].cardinality, 20.0);
        assert_eq!(members(&bins[2]), ["c"]);
        assert_eq!(bins[2].cardinality, 10.0);
    }

    #[test]
    fn surplus_bins_stay_empty() {
        let items = vec![item("a", 0..10)];

        let bins = partition(&ExactEngine, items, 3).unwrap();

        assert_eq!(members(&bins[0]), ["a"]);
        assert!(bins[1].members.is_empty());
        assert!(bins[1].sketch.is_none());
        assert_eq!(bins[1].cardinality, 0.0);
        assert!(bins[2].members.is_empty());
        assert_eq!(bins[2].cardinality, 0.0);
    }

    #[test]
    fn empty_input_yields_empty_bins() {
        let bins = partition(&ExactEngine, Vec::new(), 3).unwrap();

        assert_eq!(bins.len(), 3);
        for bin in &bins {
            assert!(bin.members.is_empty());
            assert!(bin.sketch.is_none());
            assert_eq!(bin.cardinality, 0.0);
        }
    }

    #[test]
    fn zero_bins_is_rejected() {
        let result = partition(&ExactEngine, vec![item("a", 0..10)], 0);
        assert!(result.is_err());
    }

    #[test]
    fn equal_minimum_goes_to_lowest_bin_index() {
        // Seeds leave both bins at 10; the tie must go to bin 0.
        let items = vec![item("a", 0..10), item("b", 10..20), item("c", 20..25)];

        let bins = partition(&ExactEngine, items, 2).unwrap();

        assert_eq!(members(&bins[0]), ["a", "c"]);
        assert_eq!(members(&bins[1]), ["b"]);
    }

    #[test]
    fn equal_cardinality_keeps_discovery_order() {
        let items = vec![item("x", 0..10), item("y", 10..20), item("z", 20..30)];

        let bins = partition(&ExactEngine, items, 3).unwrap();

        assert_eq!(members(&bins[0]), ["x"]);
        assert_eq!(members(&bins[1]), ["y"]);
        assert_eq!(members(&bins[2]), ["z"]);
    }

    #[test]
    fn union_failure_aborts_the_run() {
        let items = vec![item("a", 0..20), item("b", 20..30), item("c", 30..35)];

        let result = partition(&BrokenEngine, items, 2);

        let error = result.unwrap_err();
        assert!(error.to_string().contains("sketch engine unavailable"));
    }

    #[test]
    fn works_against_the_memory_engine() {
        // Small sets keep the estimator in its exact representation.
        let make = |name: &str, range: Range<u64>| {
            let sketch = MemoryEngine::sketch_of(range);
            let cardinality = sketch.estimate() as f64;
            GenomeItem {
                name: name.to_owned(),
                sketch,
                cardinality,
            }
        };
        let items = vec![
            make("a", 0..40),
            make("b", 40..70),
            make("c", 60..80),
        ];

        let bins = partition(&MemoryEngine, items, 2).unwrap();

        // c overlaps b by 10 elements: bin 1 ends at 40, not 50.
        assert_eq!(bins[0].members, ["a"]);
        assert_eq!(bins[0].cardinality, 40.0);
        assert_eq!(bins[1].members, ["b", "c"]);
        assert_eq!(bins[1].cardinality, 40.0);
    }
}
