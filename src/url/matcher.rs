/// Checks whether a host belongs to the configured domain
///
/// A host matches when it equals the domain or ends with `.<domain>`, so the
/// comparison always falls on a label boundary. Plain substring containment is
/// not enough: `evil-asic-world.com.attacker.net` contains `asic-world.com`
/// but belongs to `attacker.net`.
///
/// Both sides are compared case-insensitively and a trailing root dot is
/// ignored.
///
/// # Examples
///
/// ```
/// use hdl_harvest::url::matches_domain;
///
/// assert!(matches_domain("asic-world.com", "asic-world.com"));
/// assert!(matches_domain("asic-world.com", "www.asic-world.com"));
/// assert!(!matches_domain("asic-world.com", "notasic-world.com"));
/// assert!(!matches_domain("asic-world.com", "asic-world.com.evil.example"));
/// ```
pub fn matches_domain(domain: &str, host: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    if domain.is_empty() || host.is_empty() {
        return false;
    }

    host == domain
        || host
            .strip_suffix(&domain)
            .is_some_and(|prefix| prefix.ends_with('.') && prefix.len() > 1)
}
