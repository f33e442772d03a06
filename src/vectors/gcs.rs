use async_trait::async_trait;
use reqwest::Client;

use super::store::{VectorMap, VectorStore};
use crate::core::config::GcsSettings;
use crate::core::errors::AppError;

const GCS_BASE_URL: &str = "https://storage.googleapis.com";

/// Google Cloud Storage blob store, spoken to over the JSON API. The bucket
/// object holds the whole serialized vector mapping; saves replace it.
#[derive(Clone)]
pub struct GcsVectorStore {
    settings: GcsSettings,
    client: Client,
}

impl GcsVectorStore {
    pub fn new(settings: GcsSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    fn download_url(&self) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            GCS_BASE_URL,
            urlencoding::encode(&self.settings.bucket_name),
            urlencoding::encode(&self.settings.document_vectors_file),
        )
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            GCS_BASE_URL,
            urlencoding::encode(&self.settings.bucket_name),
            urlencoding::encode(&self.settings.document_vectors_file),
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.settings.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl VectorStore for GcsVectorStore {
    async fn load(&self) -> Result<VectorMap, AppError> {
        let res = self
            .authorize(self.client.get(self.download_url()))
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "downloading gs://{}/{} failed: {status}: {text}",
                self.settings.bucket_name, self.settings.document_vectors_file
            )));
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Storage(format!(
                "gs://{}/{} is not a valid vector mapping: {e}",
                self.settings.bucket_name, self.settings.document_vectors_file
            ))
        })
    }

    async fn save(&self, vectors: &VectorMap) -> Result<(), AppError> {
        let payload = serde_json::to_vec(vectors).map_err(AppError::internal)?;

        let res = self
            .authorize(self.client.post(self.upload_url()))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "uploading gs://{}/{} failed: {status}: {text}",
                self.settings.bucket_name, self.settings.document_vectors_file
            )));
        }

        tracing::info!(
            "Saved {} document vectors to gs://{}/{}",
            vectors.len(),
            self.settings.bucket_name,
            self.settings.document_vectors_file
        );
        Ok(())
    }
}
