use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::fixtures::ServiceFixture;
use crate::handlers::{self, RecordedSubmission, RequestCounts, ServiceState, SharedState};

/// Build the mock router over the given state.
fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/chat", post(handlers::submit))
        .route("/api/status/{session_id}", get(handlers::status))
        .route("/api/result/{session_id}", get(handlers::result))
        .route("/api/slides/{session_id}/content", get(handlers::slide_content))
        .route("/api/cancel/{session_id}", post(handlers::cancel))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// A running mock service bound to a local port.
pub struct MockService {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    state: SharedState,
}

impl MockService {
    /// Start on an ephemeral port of 127.0.0.1.
    pub async fn start(fixture: ServiceFixture) -> anyhow::Result<Self> {
        Self::start_on("127.0.0.1:0", fixture).await
    }

    pub async fn start_on(addr: &str, fixture: ServiceFixture) -> anyhow::Result<Self> {
        let state = Arc::new(Mutex::new(ServiceState::new(fixture)));
        let app = router(state.clone());

        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        log::info!("Mock Paper2Slides service listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                    log::info!("Mock service shutting down");
                })
                .await;
            if let Err(e) = result {
                log::error!("Mock service error: {}", e);
            }
        });

        Ok(Self {
            addr,
            shutdown_tx,
            state,
        })
    }

    /// Base URL, e.g. `http://127.0.0.1:40213`.
    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.state.lock().unwrap().cancelled.clone()
    }

    pub fn request_counts(&self) -> RequestCounts {
        self.state.lock().unwrap().counts
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock service already stopped");
        }
    }

    /// Serve until the task is cancelled or the process is interrupted.
    pub async fn run_until_ctrl_c(self) -> anyhow::Result<()> {
        tokio::signal::ctrl_c().await?;
        log::info!("Interrupted, stopping mock service on {}", self.addr);
        self.shutdown().await;
        Ok(())
    }
}
