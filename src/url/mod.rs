//! URL handling module for wbdl
//!
//! This module provides crawl target construction, same-origin link
//! resolution, and the mapping from page URLs to archive file paths.
//! Everything here is pure; the crawler calls into it for every URL it sees.

mod path;
mod resolve;
mod target;

// Re-export main functions
pub use path::{classify_path, to_archive_path};
pub use resolve::resolve_link;
pub use target::CrawlTarget;

/// How a URL path is mapped onto the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// Path names a webpage file (`.html`, `.php`, ...) and is saved as-is
    Page,
    /// Anything else; saved as `index.html` inside a directory of that name
    Directory,
}

impl PathKind {
    /// Returns true if the path needs an `index.html` suffix
    pub fn needs_index(&self) -> bool {
        matches!(self, Self::Directory)
    }
}
