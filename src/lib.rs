//! wbdl: a single-site web archiver
//!
//! This crate crawls one website from a seed URL, mirrors every same-origin
//! page it can reach onto disk under a path derived from the page URL, and
//! packages the resulting folder into a ZIP archive.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for wbdl operations
///
/// Each phase of the pipeline has its own variant so callers can tell a
/// failed crawl apart from a crawl that succeeded but could not be packaged.
#[derive(Debug, Error)]
pub enum WbdlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl failed: {0}")]
    Crawl(#[from] CrawlError),

    #[error("Archive failed: {0}")]
    Archive(#[from] ArchiveError),
}

/// Errors raised while traversing and mirroring a site
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(#[from] UrlError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP error for {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Crawl task failed: {0}")]
    Task(String),
}

/// Errors raised by the compression step
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Archive source is not a directory: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Compression task failed: {0}")]
    Task(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for wbdl operations
pub type Result<T> = std::result::Result<T, WbdlError>;

/// Result type alias for crawl operations
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

/// Result type alias for archive operations
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::crawl;
pub use output::{
    archive_website, ArchiveOutput, Compressor, RunIdGenerator, UuidGenerator, ZipCompressor,
};
pub use crate::url::{classify_path, resolve_link, to_archive_path, CrawlTarget, PathKind};
