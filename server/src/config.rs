use anyhow::{anyhow, Context, Result};
use meander::SiteConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_MAX_MARKDOWN_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub max_markdown_bytes: usize,
    pub site: SiteConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {value:?}"))?,
            None => DEFAULT_PORT,
        };
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .context("Invalid HOST/PORT combination")?;

        let static_dir =
            PathBuf::from(lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()));
        let pages_dir = lookup("PAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| static_dir.join("pages"));

        let max_markdown_bytes = match lookup("MAX_MARKDOWN_BYTES") {
            Some(value) => value.parse::<usize>().with_context(|| {
                format!("MAX_MARKDOWN_BYTES must be a byte count, got {value:?}")
            })?,
            None => DEFAULT_MAX_MARKDOWN_BYTES,
        };
        if max_markdown_bytes == 0 {
            return Err(anyhow!("MAX_MARKDOWN_BYTES must be greater than zero"));
        }

        let mut site = SiteConfig::new(&lookup("SITE_BASE_PATH").unwrap_or_default());
        if let Some(title) = lookup("SITE_TITLE") {
            site.title = title;
        }
        if let Some(tagline) = lookup("SITE_TAGLINE") {
            site.tagline = tagline;
        }
        if let Some(copyright) = lookup("SITE_COPYRIGHT") {
            site.copyright = copyright;
        }

        Ok(Self {
            addr,
            static_dir,
            pages_dir,
            max_markdown_bytes,
            site,
        })
    }
}
