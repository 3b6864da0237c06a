use crate::UrlError;
use url::Url;

/// Schemes that never lead to a fetchable document
const NON_NAVIGABLE_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes an absolute URL for use as a dedup key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an HTTP(S) scheme
/// 3. Require a host (the `url` crate already lowercases it)
/// 4. Remove the fragment, which never changes the fetched document
///
/// Paths and query strings are kept as-is: resource sites commonly serve
/// distinct files that differ only in case or query.
///
/// # Examples
///
/// ```
/// use hdl_harvest::url::normalize_url;
///
/// let url = normalize_url("https://WWW.ASIC-WORLD.COM/verilog/index.html#top").unwrap();
/// assert_eq!(url.as_str(), "https://www.asic-world.com/verilog/index.html");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Resolves an anchor `href` against the page it was found on
///
/// Returns an error for empty, fragment-only and non-navigable references
/// (`javascript:`, `mailto:`, `tel:`, `data:`), and for anything that does
/// not resolve to an HTTP(S) URL with a host.
pub fn resolve_href(base: &Url, href: &str) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Parse("empty reference".to_string()));
    }

    if href.starts_with('#') {
        return Err(UrlError::Parse("fragment-only reference".to_string()));
    }

    let lowered = href.to_ascii_lowercase();
    if let Some(prefix) = NON_NAVIGABLE_PREFIXES
        .iter()
        .find(|prefix| lowered.starts_with(*prefix))
    {
        return Err(UrlError::InvalidScheme(prefix.trim_end_matches(':').to_string()));
    }

    let joined = base
        .join(href)
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(joined)
}

fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}
