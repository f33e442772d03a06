mod core;
mod ingest;
mod llm;
mod qa;
mod retrieval;
mod server;
mod slack;
mod state;
mod vector_math;
mod vectors;

use std::env;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use crate::core::config::Settings;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    core::logging::init(&settings.server.log_dir);

    if env::args().nth(1).as_deref() == Some("ingest") {
        return ingest_once(settings).await;
    }

    let state = AppState::initialize(settings).await?;

    let bind_addr = format!(
        "{}:{}",
        state.settings.server.host, state.settings.server.port
    );
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// One-shot ingestion run: vectorize the configured Drive folder, persist
/// the mapping, print the report, exit.
async fn ingest_once(settings: Settings) -> anyhow::Result<()> {
    use crate::ingest::{pipeline, GoogleDriveSource};
    use crate::llm::OpenAiProvider;
    use crate::vectors::GcsVectorStore;

    let drive = settings
        .google_drive
        .clone()
        .context("google_drive.folder_id must be configured to ingest")?;
    let source = GoogleDriveSource::new(drive);
    let llm = OpenAiProvider::new(settings.openai.clone())?;
    let store = GcsVectorStore::new(settings.gcs.clone());

    let outcome = pipeline::run(&source, &llm, &store).await?;
    println!("{}", serde_json::to_string_pretty(&outcome.report)?);

    Ok(())
}
