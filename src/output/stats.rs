//! Statistics collected during a crawl run

use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished, if it did
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of pages fetched and written to disk
    pub pages_written: u64,

    /// Total size of all written pages
    pub bytes_written: u64,

    /// Links queued for fetching
    pub links_followed: u64,

    /// Links dropped as empty, unresolvable or cross-origin
    pub links_rejected: u64,

    /// Links pointing at an archive path that was already claimed
    pub links_skipped: u64,
}

impl CrawlStatistics {
    /// Starts a new statistics record stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_written: 0,
            bytes_written: 0,
            links_followed: 0,
            links_rejected: 0,
            links_skipped: 0,
        }
    }

    pub fn record_page(&mut self, bytes: u64) {
        self.pages_written += 1;
        self.bytes_written += bytes;
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the crawl in milliseconds, once finished
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds())
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(ms) = stats.duration_ms() {
        println!("  Duration: {:.1}s", ms as f64 / 1000.0);
    }
    println!();

    println!("  Pages saved: {}", stats.pages_written);
    println!("  Bytes saved: {}", stats.bytes_written);
    println!();

    let total_links = stats.links_followed + stats.links_rejected + stats.links_skipped;
    println!("Links ({} total):", total_links);
    println!("  Followed: {}", stats.links_followed);
    println!("  Already visited: {}", stats.links_skipped);
    println!("  Rejected: {}", stats.links_rejected);
}
