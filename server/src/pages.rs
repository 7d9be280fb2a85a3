use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use meander::SiteConfig;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

const PAGE_EXTENSION: &str = "md";

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("invalid page name {0:?}")]
    InvalidName(String),
    #[error("page {0:?} not found")]
    NotFound(String),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PageError {
    fn status(&self) -> StatusCode {
        match self {
            PageError::InvalidName(_) => StatusCode::BAD_REQUEST,
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(target: "pages", error = %self, msg = "page rendering failed");
        } else {
            warn!(target: "pages", error = %self, msg = "page request rejected");
        }
        let body = match &self {
            PageError::Io { .. } => "Page could not be read".to_string(),
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}

/// Page names map straight onto file names, so only a flat, conservative
/// alphabet is accepted.
pub fn page_path(pages_dir: &Path, name: &str) -> Result<PathBuf, PageError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if !valid {
        return Err(PageError::InvalidName(name.to_string()));
    }
    Ok(pages_dir.join(format!("{name}.{PAGE_EXTENSION}")))
}

pub async fn load_page(pages_dir: &Path, name: &str) -> Result<String, PageError> {
    let path = page_path(pages_dir, name)?;
    match tokio::fs::read_to_string(&path).await {
        Ok(markdown) => Ok(markdown),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            Err(PageError::NotFound(name.to_string()))
        }
        Err(source) => Err(PageError::Io { path, source }),
    }
}

pub fn render_page(site: &SiteConfig, name: &str, markdown: &str) -> String {
    let title = page_title(markdown).unwrap_or(name);
    site.page(title, &meander::to_html(markdown))
}

/// First heading line of the document, without its `#` markers.
fn page_title(markdown: &str) -> Option<&str> {
    markdown
        .lines()
        .find(|line| line.starts_with('#'))
        .map(|line| line.trim_start_matches('#').trim())
        .filter(|title| !title.is_empty())
}
