pub mod item;
pub mod partition;
pub mod sketch;

pub use item::{Bin, GenomeItem};
pub use partition::partition;
pub use sketch::{MemoryEngine, SketchEngine};
