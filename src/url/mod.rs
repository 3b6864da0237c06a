//! URL handling module for hdl-harvest
//!
//! This module provides href resolution, URL normalization, host extraction
//! and the label-boundary domain filter used by the link classifier.

mod domain;
mod matcher;
mod normalize;

pub use domain::{extract_domain, last_path_segment};
pub use matcher::matches_domain;
pub use normalize::{normalize_url, resolve_href};

use url::Url;

/// Returns true when the URL's host passes the domain filter
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hdl_harvest::url::is_within_domain;
///
/// let url = Url::parse("https://www.asic-world.com/code/adder.v").unwrap();
/// assert!(is_within_domain(&url, "asic-world.com"));
/// ```
pub fn is_within_domain(url: &Url, domain: &str) -> bool {
    extract_domain(url).is_some_and(|host| matches_domain(domain, &host))
}

/// Returns true when the URL path ends with `suffix`, ignoring ASCII case
pub fn path_has_suffix(url: &Url, suffix: &str) -> bool {
    let path = url.path();
    path.len() >= suffix.len()
        && path.is_char_boundary(path.len() - suffix.len())
        && path[path.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
