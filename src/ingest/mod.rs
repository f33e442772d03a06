pub mod drive;
pub mod pipeline;
pub mod source;

pub use drive::GoogleDriveSource;
pub use pipeline::{IngestFailure, IngestOutcome, IngestReport};
pub use source::{Document, DocumentRef, DocumentSource};
