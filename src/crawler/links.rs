//! Link classification
//!
//! Splits the anchors found on one page into resource links, page links and
//! ignored links. Anchors that cannot be resolved, or that leave the
//! configured domain, are dropped and only counted.

use crate::config::CrawlerConfig;
use crate::crawler::parser::parse_html;
use crate::url::{extract_domain, matches_domain, path_has_suffix, resolve_href};
use crate::UrlError;
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Bucket a same-domain URL falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Target file to harvest
    Resource,
    /// Navigable page to crawl
    Page,
    /// Same-domain link of no interest (images, archives, ...)
    Ignored,
}

/// Why an anchor was dropped before bucketing
#[derive(Debug, Error)]
pub enum LinkRejection {
    #[error("malformed or non-navigable link: {0}")]
    Malformed(#[from] UrlError),

    #[error("host {host} is outside the crawl domain")]
    OffDomain { host: String },
}

/// Result of classifying every anchor on a page
///
/// Each anchor lands in exactly one of the fields: one of the three URL
/// buckets, or one of the drop counters.
#[derive(Debug, Clone, Default)]
pub struct LinkPartition {
    pub resources: Vec<Url>,
    pub pages: Vec<Url>,
    pub ignored: Vec<Url>,
    pub malformed: usize,
    pub off_domain: usize,
    /// Anchors resolving to a URL already seen on the same page
    pub duplicates: usize,
}

impl LinkPartition {
    /// Total number of anchors accounted for
    pub fn total(&self) -> usize {
        self.resources.len()
            + self.pages.len()
            + self.ignored.len()
            + self.malformed
            + self.off_domain
            + self.duplicates
    }
}

/// Classifies anchors against the domain filter and extension rules
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    domain: String,
    resource_extension: String,
    page_extensions: Vec<String>,
}

impl LinkClassifier {
    pub fn new(
        domain: impl Into<String>,
        resource_extension: impl Into<String>,
        page_extensions: Vec<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            resource_extension: resource_extension.into(),
            page_extensions,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.domain.clone(),
            config.resource_extension.clone(),
            config.page_extensions.clone(),
        )
    }

    /// Resolves `href` against `base` and applies the domain filter
    pub fn admit(&self, base: &Url, href: &str) -> Result<Url, LinkRejection> {
        let url = resolve_href(base, href)?;
        let host = extract_domain(&url).ok_or(UrlError::MissingDomain)?;

        if !matches_domain(&self.domain, &host) {
            return Err(LinkRejection::OffDomain { host });
        }

        Ok(url)
    }

    /// Buckets an admitted URL by its path
    pub fn kind_of(&self, url: &Url) -> LinkKind {
        if path_has_suffix(url, &self.resource_extension) {
            LinkKind::Resource
        } else if url.path().ends_with('/')
            || self
                .page_extensions
                .iter()
                .any(|ext| path_has_suffix(url, ext))
        {
            LinkKind::Page
        } else {
            LinkKind::Ignored
        }
    }

    /// Classifies raw hrefs found on the page at `base`
    pub fn classify_hrefs<I, T>(&self, base: &Url, hrefs: I) -> LinkPartition
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut partition = LinkPartition::default();
        let mut seen = HashSet::new();

        for href in hrefs {
            let url = match self.admit(base, href.as_ref()) {
                Ok(url) => url,
                Err(LinkRejection::Malformed(_)) => {
                    partition.malformed += 1;
                    continue;
                }
                Err(LinkRejection::OffDomain { host }) => {
                    tracing::trace!(host = %host, "Dropping off-domain link");
                    partition.off_domain += 1;
                    continue;
                }
            };

            if !seen.insert(url.as_str().to_string()) {
                partition.duplicates += 1;
                continue;
            }

            match self.kind_of(&url) {
                LinkKind::Resource => partition.resources.push(url),
                LinkKind::Page => partition.pages.push(url),
                LinkKind::Ignored => partition.ignored.push(url),
            }
        }

        partition
    }

    /// Parses `html` and classifies its anchors
    pub fn classify_page(&self, base: &Url, html: &str) -> LinkPartition {
        self.classify_hrefs(base, parse_html(html).hrefs)
    }
}
