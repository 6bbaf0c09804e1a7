use cardinality_estimator::estimator::CardinalityEstimator;

/// A contract for an external cardinality estimator.
///
/// Sketches are opaque mergeable summaries of a multiset's distinct
/// content. Both operations are blocking and fallible; any failure is
/// fatal to the partitioning run that issued the call.
pub trait SketchEngine {
    type Sketch;

    /// Estimated distinct-element count of `sketch`.
    ///
    /// Deterministic for a fixed sketch; approximate, with the bounded
    /// relative error inherent to the estimator.
    fn cardinality(&self, sketch: &Self::Sketch) -> anyhow::Result<f64>;

    /// Summary of the union of the multisets summarized by `a` and `b`.
    ///
    /// Commutative; the union with an empty sketch is an identity.
    fn union(&self, a: &Self::Sketch, b: &Self::Sketch) -> anyhow::Result<Self::Sketch>;
}

/// In-memory engine backed by the `cardinality-estimator` crate.
///
/// Exact for small sets (up to the crate's array representation), then
/// HyperLogLog++ beyond. Exists to show the partitioner is estimator
/// agnostic and to drive tests without an external sketching binary.
pub struct MemoryEngine;

impl SketchEngine for MemoryEngine {
    type Sketch = CardinalityEstimator<u64>;

    fn cardinality(&self, sketch: &Self::Sketch) -> anyhow::Result<f64> {
        Ok(sketch.estimate() as f64)
    }

    fn union(&self, a: &Self::Sketch, b: &Self::Sketch) -> anyhow::Result<Self::Sketch> {
        let mut merged = CardinalityEstimator::new();
        merged.merge(a);
        merged.merge(b);
        Ok(merged)
    }
}

impl MemoryEngine {
    /// Builds a sketch over the given elements.
    pub fn sketch_of(elements: impl IntoIterator<Item = u64>) -> CardinalityEstimator<u64> {
        let mut sketch = CardinalityEstimator::new();
        for element in elements {
            sketch.insert(&element);
        }
        sketch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_counts_shared_content_once() {
        let engine = MemoryEngine;
        let a = MemoryEngine::sketch_of(0..100);
        let b = MemoryEngine::sketch_of(80..120);

        let merged = engine.union(&a, &b).unwrap();
        assert_eq!(engine.cardinality(&merged).unwrap(), 120.0);
    }

    #[test]
    fn union_with_empty_is_identity() {
        let engine = MemoryEngine;
        let a = MemoryEngine::sketch_of(0..50);
        let empty = MemoryEngine::sketch_of(std::iter::empty());

        let merged = engine.union(&a, &empty).unwrap();
        assert_eq!(engine.cardinality(&merged).unwrap(), 50.0);
    }
}
