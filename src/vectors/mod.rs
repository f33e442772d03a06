pub mod file;
pub mod gcs;
pub mod store;

pub use file::FileVectorStore;
pub use gcs::GcsVectorStore;
pub use store::{to_index_entries, VectorMap, VectorRecord, VectorStore};
