//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlTask`: a unit of frontier work (page URL plus BFS depth)
//! - `CrawlRegistry`: visited pages and discovered resources for one crawl

mod registry;

pub use registry::CrawlRegistry;

use url::Url;

/// A page waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,

    /// Link distance from the seed (the seed is depth 0)
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    /// The task for a page linked from this one
    pub fn child(&self, url: Url) -> Self {
        Self {
            url,
            depth: self.depth + 1,
        }
    }
}
