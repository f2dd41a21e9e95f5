pub mod page;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

use crate::companion::{Companion, Stage};
use page::Page;

#[derive(Clone)]
struct WebState {
    companion: Arc<Companion>,
    page: Arc<Page>,
}

#[derive(Debug, Deserialize)]
struct AskForm {
    #[serde(default)]
    question: String,
}

/// Template failures become a bare 500.
struct RenderError(tera::Error);

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error!(error = ?self.0, "page render failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
    }
}

pub fn router(companion: Arc<Companion>) -> Result<Router> {
    let page = Page::new().context("Failed to compile page template")?;
    let state = WebState {
        companion,
        page: Arc::new(page),
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Ok(Router::new()
        .route("/", get(index).post(ask))
        .layer(trace_layer)
        .with_state(state))
}

async fn index(State(state): State<WebState>) -> Result<Html<String>, RenderError> {
    state.page.render("", None).map(Html).map_err(RenderError)
}

async fn ask(
    State(state): State<WebState>,
    Form(form): Form<AskForm>,
) -> Result<Html<String>, RenderError> {
    let stage = state.companion.submit(&form.question).await;
    let shown = match &stage {
        Stage::Idle { .. } => None,
        other => Some(other),
    };
    state
        .page
        .render(&form.question, shown)
        .map(Html)
        .map_err(RenderError)
}

/// Serve the page until Ctrl+C.
pub async fn serve(addr: SocketAddr, companion: Arc<Companion>) -> Result<()> {
    let app = router(companion)?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    info!("Web UI listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Web UI stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}
