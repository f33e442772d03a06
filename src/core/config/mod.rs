pub mod settings;
pub mod validation;

pub use settings::{
    DriveSettings, GcsSettings, OpenAiSettings, RetrievalSettings, ServerSettings, Settings,
    SlackSettings,
};
