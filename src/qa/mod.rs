pub mod engine;
pub mod synthesizer;

pub use engine::{Answer, QaEngine, SourceRef};
