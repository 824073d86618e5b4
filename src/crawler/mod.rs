//! Crawler module for web page fetching and mirroring
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing and link extraction
//! - The shared visited-set
//! - Worker pool coordination

mod coordinator;
mod fetcher;
mod parser;
mod visited;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use parser::{parse_html, ParsedPage};

use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::url::CrawlTarget;
use crate::CrawlError;
use std::path::Path;

/// Runs a complete crawl of one site
///
/// Every same-origin page reachable from `seed` is fetched once and written
/// under `archive_root` at the path given by
/// [`to_archive_path`](crate::url::to_archive_path).
///
/// # Arguments
///
/// * `seed` - The page the crawl starts from
/// * `archive_root` - Directory the site is mirrored into
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl completed successfully
/// * `Err(CrawlError)` - A page could not be fetched or written; whatever was
///   written before the failure is left in place
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use wbdl::config::Config;
/// use wbdl::crawler::crawl;
/// use wbdl::url::CrawlTarget;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seed = CrawlTarget::parse("https://example.net")?;
/// let stats = crawl(&seed, Path::new("./example.net"), &Config::default()).await?;
/// println!("{} pages saved", stats.pages_written);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    seed: &CrawlTarget,
    archive_root: &Path,
    config: &Config,
) -> Result<CrawlStatistics, CrawlError> {
    let coordinator = Coordinator::new(config, archive_root)?;
    coordinator.run(seed.clone()).await
}
