use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::validation;
use crate::core::errors::ConfigError;

/// Validated application configuration. Constructed once at startup; every
/// component receives what it needs from here instead of reading files or
/// globals on its own.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai: OpenAiSettings,
    pub gcs: GcsSettings,
    pub google_drive: Option<DriveSettings>,
    pub slack: Option<SlackSettings>,
    pub system_prompt: String,
    pub retrieval: RetrievalSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct GcsSettings {
    pub bucket_name: String,
    pub document_vectors_file: String,
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DriveSettings {
    pub folder_id: String,
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SlackSettings {
    pub bot_token: String,
    pub allowed_channels: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub log_dir: PathBuf,
}

impl Settings {
    /// Loads and validates the configuration file. All validation problems
    /// are collected and reported together in a single error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        let raw: RawSettings =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let issues = validation::validate(&raw);
        if !issues.is_empty() {
            return Err(ConfigError::Invalid { issues });
        }

        let openai = raw.openai.unwrap_or_default();
        let gcs = raw.gcs.unwrap_or_default();
        let retrieval = raw.retrieval.unwrap_or_default();
        let server = raw.server.unwrap_or_default();

        Ok(Settings {
            openai: OpenAiSettings {
                api_key: openai.api_key.unwrap_or_default(),
                base_url: openai
                    .base_url
                    .unwrap_or_else(|| "https://api.openai.com".to_string())
                    .trim_end_matches('/')
                    .to_string(),
                embedding_model: openai.embedding_model.unwrap_or_default(),
                chat_model: openai.chat_model.unwrap_or_default(),
                request_timeout_secs: openai.request_timeout_secs.unwrap_or(60),
            },
            gcs: GcsSettings {
                bucket_name: gcs.bucket_name.unwrap_or_default(),
                document_vectors_file: gcs.document_vectors_file.unwrap_or_default(),
                auth_token: gcs.auth_token,
            },
            google_drive: raw.google_drive.map(|drive| DriveSettings {
                folder_id: drive.folder_id.unwrap_or_default(),
                auth_token: drive.auth_token,
            }),
            slack: raw.slack.map(|slack| SlackSettings {
                bot_token: slack.bot_token.unwrap_or_default(),
                allowed_channels: slack.allowed_channels.unwrap_or_default(),
            }),
            system_prompt: raw.system_prompt.unwrap_or_default(),
            retrieval: RetrievalSettings {
                top_k: retrieval.top_k.unwrap_or(1),
            },
            server: ServerSettings {
                host: server.host.unwrap_or_else(|| "127.0.0.1".to_string()),
                port: server.port.unwrap_or(8787),
                cors_allowed_origins: server.cors_allowed_origins.unwrap_or_default(),
                log_dir: PathBuf::from(server.log_dir.unwrap_or_else(|| "logs".to_string())),
            },
        })
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = env::var("DOCENT_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    PathBuf::from("config.yml")
}

/// Unvalidated mirror of the config file. Everything is optional here so a
/// single pass can report every missing or malformed key instead of failing
/// on the first one.
#[derive(Debug, Default, Deserialize)]
pub struct RawSettings {
    pub openai: Option<RawOpenAi>,
    pub gcs: Option<RawGcs>,
    pub google_drive: Option<RawDrive>,
    pub slack: Option<RawSlack>,
    pub system_prompt: Option<String>,
    pub retrieval: Option<RawRetrieval>,
    pub server: Option<RawServer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawOpenAi {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub embedding_model: Option<String>,
    pub chat_model: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawGcs {
    pub bucket_name: Option<String>,
    pub document_vectors_file: Option<String>,
    pub auth_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDrive {
    pub folder_id: Option<String>,
    pub auth_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSlack {
    pub bot_token: Option<String>,
    pub allowed_channels: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRetrieval {
    pub top_k: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawServer {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub log_dir: Option<String>,
}
