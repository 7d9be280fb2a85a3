mod config;
mod pages;

use crate::config::ServerConfig;
use crate::pages::PageError;
use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Json, Router};
use dotenvy::Error as DotenvError;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::service_fn;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

struct AppState {
    config: ServerConfig,
}

#[derive(Debug, Deserialize)]
struct MarkdownRequest {
    markdown: String,
}

#[derive(Debug, Serialize)]
struct MarkdownResponse {
    html: String,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: &'static str,
    limit_bytes: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env_files();
    configure_tracing();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    if !config.pages_dir.is_dir() {
        warn!(
            target: "pages",
            pages_dir = %config.pages_dir.display(),
            msg = "pages directory missing; /pages requests will 404"
        );
    }
    info!(
        static_dir = %config.static_dir.display(),
        pages_dir = %config.pages_dir.display(),
        base_path = %config.site.base_path,
        msg = "site configured"
    );

    let addr = config.addr;
    let router = build_router(Arc::new(AppState { config }));

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind TCP listener")?;
    let bound = listener
        .local_addr()
        .context("Failed to read listener address")?;
    info!(
        listening = %bound,
        version = SERVER_VERSION,
        commit = server_commit(),
        msg = "server ready"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let static_root = Arc::new(state.config.static_dir.clone());
    let static_service = service_fn(move |req: Request<Body>| {
        let dir =
            ServeDir::new(static_root.as_ref().clone()).append_index_html_on_directories(true);
        async move {
            match dir.oneshot(req).await {
                Ok(response) => Ok::<Response, Infallible>(response.into_response()),
                Err(err) => Ok((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Static file error: {err}"),
                )
                    .into_response()),
            }
        }
    });

    Router::new()
        .route("/api/markdown", post(handle_markdown))
        .route("/pages/:name", get(handle_page))
        .with_state(state)
        .fallback_service(static_service)
        .layer(TraceLayer::new_for_http())
}

fn server_commit() -> &'static str {
    option_env!("GIT_COMMIT_HASH").unwrap_or("unknown")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("msg" = "shutdown signal received");
}

fn configure_tracing() {
    let default_filter = "info";
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn load_env_files() {
    fn load(file: &str) {
        match dotenvy::from_filename(file) {
            Ok(_) => {}
            Err(DotenvError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => eprintln!("Warning: unable to load {file}: {err}"),
        }
    }

    load(".env.local");
    load(".env");
}

async fn handle_markdown(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MarkdownRequest>,
) -> Response {
    let limit = state.config.max_markdown_bytes;
    if payload.markdown.len() > limit {
        warn!(
            target: "api",
            bytes = payload.markdown.len(),
            limit,
            msg = "markdown payload rejected"
        );
        let body = ApiError {
            error: "markdown_too_large",
            limit_bytes: limit,
        };
        return (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response();
    }

    let html = meander::to_html(&payload.markdown);
    info!(
        target: "api",
        bytes = payload.markdown.len(),
        html_bytes = html.len(),
        msg = "markdown rendered"
    );
    Json(MarkdownResponse { html }).into_response()
}

async fn handle_page(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Html<String>, PageError> {
    let markdown = pages::load_page(&state.config.pages_dir, &name).await?;
    let html = pages::render_page(&state.config.site, &name, &markdown);
    info!(target: "pages", page = %name, bytes = markdown.len(), msg = "page rendered");
    Ok(Html(html))
}
