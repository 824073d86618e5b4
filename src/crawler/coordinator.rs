//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns the frontier and a bounded pool of worker tasks.
//! Each worker fetches one page, writes it under the archive root and hands
//! back the hrefs it found. The coordinator resolves those hrefs, claims
//! their archive paths in the shared visited-set and queues the new ones.
//!
//! A path is claimed before its page is queued, so no page is ever queued,
//! fetched or written twice. Relative links resolve from the site root.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::parse_html;
use crate::crawler::visited::VisitedSet;
use crate::output::CrawlStatistics;
use crate::url::{resolve_link, to_archive_path, CrawlTarget};
use crate::CrawlError;
use reqwest::Client;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

/// How often (in pages) progress is logged
const PROGRESS_INTERVAL: u64 = 10;

/// A page waiting in the frontier
#[derive(Debug, Clone)]
struct QueuedPage {
    target: CrawlTarget,
    path: PathBuf,
}

/// What a worker reports back after saving a page
#[derive(Debug)]
struct SavedPage {
    target: CrawlTarget,
    links: Vec<String>,
    bytes_written: u64,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    client: Client,
    root: PathBuf,
    visited: Arc<VisitedSet>,
    max_concurrent: usize,
}

impl Coordinator {
    /// Creates a coordinator that mirrors pages under `root`
    ///
    /// # Errors
    ///
    /// * `CrawlError::Client` - the HTTP client could not be built
    pub fn new(config: &Config, root: impl Into<PathBuf>) -> Result<Self, CrawlError> {
        let client = build_http_client(config).map_err(CrawlError::Client)?;

        Ok(Self {
            client,
            root: root.into(),
            visited: Arc::new(VisitedSet::new()),
            max_concurrent: config.crawler.max_concurrent_fetches.max(1) as usize,
        })
    }

    /// Crawls everything reachable from `seed` on the same origin
    ///
    /// Runs until the frontier is empty and every worker has finished. The
    /// first fetch or filesystem error cancels the remaining workers and is
    /// returned; pages saved before that stay on disk.
    pub async fn run(&self, seed: CrawlTarget) -> Result<CrawlStatistics, CrawlError> {
        tracing::info!(
            "Starting crawl of {} into {}",
            seed,
            self.root.display()
        );

        let mut stats = CrawlStatistics::start();
        let mut frontier = VecDeque::new();

        let seed_path = to_archive_path(&self.root, seed.url());
        self.visited.insert(seed_path.clone());
        frontier.push_back(QueuedPage {
            target: seed,
            path: seed_path,
        });

        let mut workers = JoinSet::new();

        loop {
            // Top up in-flight workers from the frontier
            while workers.len() < self.max_concurrent {
                let Some(page) = frontier.pop_front() else {
                    break;
                };
                workers.spawn(save_page(self.client.clone(), page));
            }

            let Some(joined) = workers.join_next().await else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            let saved = match joined {
                Ok(Ok(saved)) => saved,
                Ok(Err(e)) => {
                    tracing::error!("Aborting crawl: {}", e);
                    cancel_workers(&mut workers).await;
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!("Crawl worker failed: {}", e);
                    cancel_workers(&mut workers).await;
                    return Err(CrawlError::Task(e.to_string()));
                }
            };

            stats.record_page(saved.bytes_written);
            self.enqueue_links(&saved, &mut frontier, &mut stats);

            if stats.pages_written % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} pages saved, {} in frontier, {} in flight",
                    stats.pages_written,
                    frontier.len(),
                    workers.len()
                );
            }
        }

        stats.finish();
        tracing::info!(
            "Crawl completed: {} pages, {} bytes, {} paths claimed",
            stats.pages_written,
            stats.bytes_written,
            self.visited.len()
        );

        Ok(stats)
    }

    /// Queues every same-origin link of `saved` whose archive path is new
    fn enqueue_links(
        &self,
        saved: &SavedPage,
        frontier: &mut VecDeque<QueuedPage>,
        stats: &mut CrawlStatistics,
    ) {
        for href in &saved.links {
            let target = match resolve_link(saved.target.url(), href)
                .map(CrawlTarget::from_url)
            {
                Some(Ok(target)) => target,
                _ => {
                    tracing::trace!("Skipping link {:?} on {}", href, saved.target);
                    stats.links_rejected += 1;
                    continue;
                }
            };

            let path = to_archive_path(&self.root, target.url());
            if self.visited.insert(path.clone()) {
                tracing::debug!("Queued {}", target);
                stats.links_followed += 1;
                frontier.push_back(QueuedPage { target, path });
            } else {
                stats.links_skipped += 1;
            }
        }
    }
}

/// Fetches one page, writes it to its archive path and extracts its links
async fn save_page(client: Client, page: QueuedPage) -> Result<SavedPage, CrawlError> {
    let fetched = fetch_page(&client, page.target.url()).await?;

    if let Some(folder) = page.path.parent() {
        tokio::fs::create_dir_all(folder)
            .await
            .map_err(|source| CrawlError::Filesystem {
                path: folder.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(&page.path, &fetched.body)
        .await
        .map_err(|source| CrawlError::Filesystem {
            path: page.path.clone(),
            source,
        })?;

    let parsed = parse_html(&String::from_utf8_lossy(&fetched.body));

    tracing::debug!(
        "Saved {} -> {} (status {}, {}, {} links, title {:?})",
        fetched.final_url,
        page.path.display(),
        fetched.status_code,
        fetched.content_type.as_deref().unwrap_or("no content-type"),
        parsed.links.len(),
        parsed.title
    );

    Ok(SavedPage {
        target: page.target,
        links: parsed.links,
        bytes_written: fetched.body.len() as u64,
    })
}

/// Aborts in-flight workers and waits for their tasks to end
///
/// A file write already handed to the blocking pool is not interrupted, so
/// a page in the middle of being saved may still land on disk.
async fn cancel_workers(workers: &mut JoinSet<Result<SavedPage, CrawlError>>) {
    workers.abort_all();
    while workers.join_next().await.is_some() {}
}
