use url::Url;

/// Resolves a hyperlink against the origin of `base` into an absolute
/// same-origin URL
///
/// Only the scheme, host and port of `base` are used: relative hrefs resolve
/// from the site root, so `page.html` found on `/dir/index.html` becomes
/// `/page.html`.
///
/// Returns `None` (the link is skipped, not an error) when:
/// - the href is empty or only whitespace
/// - the href cannot be resolved
/// - the resolved URL's origin differs from `base`'s origin in scheme, host
///   or port (`mailto:`, `javascript:` and other opaque origins never match)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wbdl::url::resolve_link;
///
/// let base = Url::parse("https://a.test/dir/").unwrap();
/// let resolved = resolve_link(&base, "../x.html").unwrap();
/// assert_eq!(resolved.as_str(), "https://a.test/x.html");
///
/// let resolved = resolve_link(&base, "x.html").unwrap();
/// assert_eq!(resolved.as_str(), "https://a.test/x.html");
///
/// assert!(resolve_link(&base, "https://b.test/x").is_none());
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let mut site_root = base.clone();
    site_root.set_path("/");
    site_root.set_query(None);
    site_root.set_fragment(None);

    let resolved = site_root.join(href).ok()?;

    if resolved.origin() != base.origin() {
        return None;
    }

    Some(resolved)
}
