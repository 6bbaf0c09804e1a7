/// A genome reduced to its canonical name and a mergeable sketch of its
/// distinct content.
#[derive(Debug, Clone)]
pub struct GenomeItem<S> {
    pub name: String,
    pub sketch: S,
    /// Estimated distinct-element count represented by `sketch`.
    pub cardinality: f64,
}

/// A partition slot accumulating genomes through sketch unions.
///
/// `cardinality` is always re-estimated from the current `sketch`; it is
/// never a sum of member cardinalities, so shared content between members
/// is not double counted.
#[derive(Debug, Clone)]
pub struct Bin<S> {
    /// Member names in assignment order.
    pub members: Vec<String>,
    /// Union sketch of all members; `None` while the bin is empty.
    pub sketch: Option<S>,
    pub cardinality: f64,
}

impl<S> Bin<S> {
    pub fn empty() -> Self {
        Self {
            members: Vec::new(),
            sketch: None,
            cardinality: 0.0,
        }
    }
}

impl<S> Default for Bin<S> {
    fn default() -> Self {
        Self::empty()
    }
}
