use url::Url;

/// Extracts the host of a URL in canonical form
///
/// The host is lowercased and a trailing root dot (`example.com.`) is dropped
/// so it can be compared directly against the configured domain filter.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hdl_harvest::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Asic-World.com/verilog/").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.asic-world.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .map(|h| h.trim_end_matches('.').to_lowercase())
        .filter(|h| !h.is_empty())
}

/// Returns the last path segment of a URL, used as the resource filename
///
/// Returns `None` when the path ends in `/` or has no segments.
pub fn last_path_segment(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
