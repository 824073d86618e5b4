//! Output module: the archive pipeline
//!
//! This module handles:
//! - Laying out the run folder for one archive
//! - Running the crawl into it
//! - Packaging the mirrored site with a [`Compressor`]
//! - Recording crawl statistics

mod archiver;
pub mod stats;

pub use archiver::ZipCompressor;
pub use stats::{print_statistics, CrawlStatistics};

use crate::config::Config;
use crate::crawler::crawl;
use crate::url::CrawlTarget;
use crate::{ArchiveError, CrawlError, WbdlError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Packs a directory into a single archive file
pub trait Compressor: Send + Sync {
    /// Writes the contents of `source` into an archive at `destination`
    fn compress(&self, source: &Path, destination: &Path) -> Result<(), ArchiveError>;
}

/// Supplies the unique, filesystem-safe name of each run folder
pub trait RunIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUID v4 run ids
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl RunIdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl<F> RunIdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}

/// Everything a finished archive run produced
#[derive(Debug, Clone)]
pub struct ArchiveOutput {
    /// Identifier naming the run folder
    pub run_id: String,
    /// `<output-dir>/<run id>`, holding the site folder and the archive
    pub run_dir: PathBuf,
    /// The mirrored site (the crawl's archive root)
    pub site_dir: PathBuf,
    /// The packaged archive file
    pub archive_path: PathBuf,
    /// Statistics of the crawl
    pub stats: CrawlStatistics,
}

/// Crawls a website and packages it into a ZIP archive
///
/// Layout, relative to `config.output.output_dir`:
///
/// ```text
/// <run id>/
///     <host>/          mirrored pages
///     <host>.zip       the archive
/// ```
///
/// The compressor runs once, on the blocking thread pool, and only after the
/// crawl succeeded. With `keep-folder = false` the mirrored pages are removed
/// once packed.
///
/// # Errors
///
/// * `WbdlError::Crawl` - the seed is invalid or a page failed; no archive is
///   produced and the partial site folder is left on disk
/// * `WbdlError::Archive` - every page was saved but packaging failed
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use wbdl::config::Config;
/// use wbdl::output::{archive_website, UuidGenerator, ZipCompressor};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let output = archive_website(
///     "https://example.net",
///     &Config::default(),
///     &UuidGenerator,
///     Arc::new(ZipCompressor::default()),
/// )
/// .await?;
/// println!("Archive at {}", output.archive_path.display());
/// # Ok(())
/// # }
/// ```
pub async fn archive_website(
    seed: &str,
    config: &Config,
    ids: &dyn RunIdGenerator,
    compressor: Arc<dyn Compressor>,
) -> Result<ArchiveOutput, WbdlError> {
    let target = CrawlTarget::parse(seed).map_err(CrawlError::from)?;

    let run_id = ids.next_id();
    let run_dir = config.output.output_dir.join(&run_id);
    let site_dir = run_dir.join(target.host());
    let archive_path = run_dir.join(format!("{}.zip", target.host()));

    let stats = match crawl(&target, &site_dir, config).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Error downloading pages: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = compress_blocking(compressor, &site_dir, &archive_path).await {
        tracing::error!("Error generating zip archive: {}", e);
        return Err(e.into());
    }
    tracing::info!("Archive written to {}", archive_path.display());

    if !config.output.keep_folder {
        tokio::fs::remove_dir_all(&site_dir)
            .await
            .map_err(|source| ArchiveError::Io {
                path: site_dir.clone(),
                source,
            })?;
        tracing::debug!("Removed site folder {}", site_dir.display());
    }

    Ok(ArchiveOutput {
        run_id,
        run_dir,
        site_dir,
        archive_path,
        stats,
    })
}

/// Runs the compressor off the async worker threads
async fn compress_blocking(
    compressor: Arc<dyn Compressor>,
    source: &Path,
    destination: &Path,
) -> Result<(), ArchiveError> {
    let source = source.to_path_buf();
    let destination = destination.to_path_buf();

    tokio::task::spawn_blocking(move || compressor.compress(&source, &destination))
        .await
        .map_err(|e| ArchiveError::Task(e.to_string()))?
}
