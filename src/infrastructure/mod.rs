pub mod batch_store;
pub mod random_source;

pub use batch_store::{BatchStore, FileBatchStore, MemoryBatchStore};
pub use random_source::{RandomSource, SequenceRandom, StdRandom};
