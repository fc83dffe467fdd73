//! Web server for resolving uploaded error screenshots.
//!
//! Routes:
//! - `POST /upload_image`: multipart upload (`image` field), returns
//!   `{ocr_text, response}`
//! - `GET /health`: collaborator availability

mod handlers;
mod routes;

pub use handlers::IMAGE_FIELD;
pub use routes::{create_router, MAX_UPLOAD_BYTES};

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::knowledge::KnowledgeBaseLookup;
use crate::ocr::OcrBackend;
use crate::pipeline::ResolutionPipeline;

/// Shared state for the web server.
///
/// Everything here is immutable; requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub ocr: Arc<dyn OcrBackend>,
    pub knowledge: Arc<dyn KnowledgeBaseLookup>,
    pub pipeline: Arc<ResolutionPipeline>,
}

impl AppState {
    pub fn new(
        ocr: Arc<dyn OcrBackend>,
        knowledge: Arc<dyn KnowledgeBaseLookup>,
        pipeline: ResolutionPipeline,
    ) -> Self {
        Self {
            ocr,
            knowledge,
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let knowledge = settings.knowledge_base().map_err(anyhow::Error::msg)?;
        Ok(Self::new(
            Arc::new(settings.ocr_backend()),
            knowledge,
            settings.pipeline(),
        ))
    }
}

/// Start the web server.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
