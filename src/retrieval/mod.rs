pub mod index;

pub use index::{IndexEntry, RetrievalIndex, ScoredMatch};
