use crate::url::PathKind;
use std::path::{Path, PathBuf};
use url::Url;

/// File name used for URLs that do not name a webpage file
const INDEX_FILE: &str = "index.html";

/// Extensions that mark a path segment as a webpage file
const PAGE_EXTENSIONS: &[&str] = &["php", "php3", "asp", "aspx", "cfm", "cfml"];

/// Optional one-letter prefixes accepted in front of `htm`/`html`
/// (`dhtml`, `shtml`, `xhtml`, ...)
const HTML_PREFIXES: &[char] = &['d', 'j', 'm', 'p', 'r', 's', 'x', 'z'];

/// Classifies a URL path as a webpage file or a directory-like path
///
/// A path is a `Page` when its final segment ends in a webpage extension:
/// `htm`/`html` with an optional prefix letter from `djmprsxz`, `php`,
/// `php3`, `asp`, `aspx`, `cfm` or `cfml`. Matching is case-insensitive.
///
/// # Examples
///
/// ```
/// use wbdl::url::{classify_path, PathKind};
///
/// assert_eq!(classify_path("/a/b/page.html"), PathKind::Page);
/// assert_eq!(classify_path("/a/b/"), PathKind::Directory);
/// assert_eq!(classify_path("/a/b"), PathKind::Directory);
/// ```
pub fn classify_path(pathname: &str) -> PathKind {
    let segment = pathname.rsplit('/').next().unwrap_or_default();

    match segment.rsplit_once('.') {
        Some((_, ext)) if is_page_extension(ext) => PathKind::Page,
        _ => PathKind::Directory,
    }
}

fn is_page_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();

    if PAGE_EXTENSIONS.contains(&ext.as_str()) {
        return true;
    }

    let stem = match ext.strip_prefix(HTML_PREFIXES) {
        Some(rest) => rest,
        None => ext.as_str(),
    };
    stem == "htm" || stem == "html"
}

/// Maps a URL to the file it is archived under
///
/// Webpage paths are kept as-is; every other path gets an `index.html`
/// appended. Empty segments are dropped, so `/blog` and `/blog/` share
/// `blog/index.html`. Segments stay percent-encoded and keep their case.
/// Query and fragment never take part in the mapping.
///
/// # Arguments
///
/// * `root` - The archive root directory
/// * `url` - The absolute page URL
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use url::Url;
/// use wbdl::url::to_archive_path;
///
/// let root = Path::new("/tmp/site");
/// let url = Url::parse("https://example.net/blog/").unwrap();
/// assert_eq!(to_archive_path(root, &url), Path::new("/tmp/site/blog/index.html"));
/// ```
pub fn to_archive_path(root: &Path, url: &Url) -> PathBuf {
    let pathname = url.path();
    let mut path = root.to_path_buf();

    for segment in pathname.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }

    if classify_path(pathname).needs_index() {
        path.push(INDEX_FILE);
    }

    path
}
