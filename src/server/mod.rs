//! HTTP surface.
//!
//! ## Endpoints
//!
//! - `GET /`, `GET /admin`, `GET /static/{*path}`: pages, scripts and generated audio
//! - `GET /voices`: specialized then general voices, tagged with a category
//! - `POST /pronounce`: full pipeline, one pronunciation
//! - `POST /pronounce/all`: full pipeline, one pronunciation per specialized voice
//! - `POST /pronounce/general`: full pipeline, one pronunciation per general voice
//! - `GET|POST /api/names`, `PUT /api/names/{id}/status`, `PUT /api/names/{id}/update`
//! - `POST /api/bulk-process`: pipeline per name, ingesting results into the store

pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::pipeline::Pipeline;
use crate::store::NameStore;

pub use error::ApiError;

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub store: Arc<NameStore>,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            store: Arc::new(NameStore::new()),
            static_dir: Arc::new(static_dir.into()),
        }
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/admin", get(routes::admin))
        .route("/static/{*path}", get(routes::static_file))
        .route("/voices", get(routes::list_voices))
        .route("/pronounce", post(routes::pronounce))
        .route("/pronounce/all", post(routes::pronounce_all))
        .route("/pronounce/general", post(routes::pronounce_general))
        .route("/api/names", get(routes::list_names).post(routes::create_name))
        .route("/api/names/{id}/status", put(routes::update_status))
        .route("/api/names/{id}/update", put(routes::update_record))
        .route("/api/bulk-process", post(routes::bulk_process))
        .with_state(state)
}

/// The pronunciation service running on a background tokio task.
pub struct PronounceServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl PronounceServer {
    /// Bind `bind_addr` (port `0` picks a free port) and start serving.
    pub async fn start(state: AppState, bind_addr: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind(bind_addr).await?;
        let addr = listener.local_addr()?;
        let app = router(state);

        log::info!("Pronunciation service listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("Pronunciation service error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait until the server task ends.
    pub async fn wait(&mut self) {
        let _ = (&mut self.handle).await;
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for PronounceServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
