use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::source::{Document, DocumentRef, DocumentSource};
use crate::core::config::DriveSettings;
use crate::core::errors::AppError;

const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Google Drive folder as a document source. Lists the Google Docs in the
/// configured folder and exports each one as plain text.
#[derive(Clone)]
pub struct GoogleDriveSource {
    settings: DriveSettings,
    client: Client,
}

#[derive(Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Deserialize)]
struct FileEntry {
    id: String,
    name: String,
}

impl GoogleDriveSource {
    pub fn new(settings: DriveSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.settings.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl DocumentSource for GoogleDriveSource {
    async fn list(&self) -> Result<Vec<DocumentRef>, AppError> {
        let query = format!(
            "'{}' in parents and mimeType='application/vnd.google-apps.document'",
            self.settings.folder_id
        );
        let url = format!(
            "{DRIVE_BASE_URL}/files?q={}&spaces=drive&fields=files(id,name)",
            urlencoding::encode(&query)
        );

        let res = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| AppError::DocumentSource(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::DocumentSource(format!(
                "listing folder {} failed: {status}: {text}",
                self.settings.folder_id
            )));
        }

        let payload: FileListResponse = res
            .json()
            .await
            .map_err(|e| AppError::DocumentSource(e.to_string()))?;

        Ok(payload
            .files
            .into_iter()
            .map(|file| DocumentRef {
                id: file.id,
                name: file.name,
            })
            .collect())
    }

    async fn fetch(&self, doc: &DocumentRef) -> Result<Document, AppError> {
        let url = format!(
            "{DRIVE_BASE_URL}/files/{}/export?mimeType=text/plain",
            urlencoding::encode(&doc.id)
        );

        let res = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| AppError::DocumentSource(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::DocumentSource(format!(
                "exporting document {} failed: {status}: {text}",
                doc.id
            )));
        }

        let content = res
            .text()
            .await
            .map_err(|e| AppError::DocumentSource(e.to_string()))?;

        Ok(Document {
            id: doc.id.clone(),
            name: doc.name.clone(),
            content,
            source_url: Some(format!("https://docs.google.com/document/d/{}/edit", doc.id)),
        })
    }
}
