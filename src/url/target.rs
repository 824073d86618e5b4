use crate::UrlError;
use url::Url;

/// A page to fetch during a crawl
///
/// Holds an absolute http(s) URL with its query and fragment removed, so two
/// links that differ only after the path lead to the same fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTarget {
    url: Url,
}

impl CrawlTarget {
    /// Parses a seed URL string into a crawl target
    ///
    /// # Errors
    ///
    /// * `UrlError::Parse` - the string is not an absolute URL
    /// * `UrlError::InvalidScheme` - the scheme is not `http` or `https`
    /// * `UrlError::MissingDomain` - the URL has no host
    ///
    /// # Examples
    ///
    /// ```
    /// use wbdl::url::CrawlTarget;
    ///
    /// let target = CrawlTarget::parse("https://example.net/docs/?page=2#intro").unwrap();
    /// assert_eq!(target.as_str(), "https://example.net/docs/");
    /// ```
    pub fn parse(url_str: &str) -> Result<Self, UrlError> {
        let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(url)
    }

    /// Builds a crawl target from an already parsed URL
    pub fn from_url(mut url: Url) -> Result<Self, UrlError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::MissingDomain);
        }

        url.set_query(None);
        url.set_fragment(None);

        Ok(Self { url })
    }

    /// The URL that gets fetched
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Lowercase host name, used to name the archive folder
    pub fn host(&self) -> &str {
        // from_url guarantees a host
        self.url.host_str().unwrap_or_default()
    }
}

impl std::fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}
