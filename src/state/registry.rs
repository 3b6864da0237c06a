use crate::storage::{ResourceSink, StorageResult};
use std::collections::HashSet;

/// Dedup state for one crawl invocation
///
/// Tracks the pages already dequeued (the visited set) and the resource URLs
/// discovered so far. The two sets are independent: a resource URL is never
/// crawled as a page. Every newly registered resource is written to the sink
/// before `register_resource` returns.
#[derive(Debug)]
pub struct CrawlRegistry<S> {
    visited: HashSet<String>,
    resources: HashSet<String>,
    sink: S,
}

impl<S: ResourceSink> CrawlRegistry<S> {
    pub fn new(sink: S) -> Self {
        Self {
            visited: HashSet::new(),
            resources: HashSet::new(),
            sink,
        }
    }

    /// Seeds the resource set with URLs persisted by an earlier run
    ///
    /// Seeded URLs are not written to the sink again. Returns how many were
    /// new to the registry.
    pub fn seed_resources<I, T>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        urls.into_iter()
            .map(Into::into)
            .filter(|url| self.resources.insert(url.clone()))
            .count()
    }

    /// Marks a page as visited; returns true if it was not visited before
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Registers a resource URL; returns true if it was new
    ///
    /// A new URL is persisted before it enters the in-memory set, so a failed
    /// write leaves it unregistered and a later rediscovery will retry.
    pub fn register_resource(&mut self, url: &str) -> StorageResult<bool> {
        if self.resources.contains(url) {
            return Ok(false);
        }
        self.sink.persist_resource(url)?;
        self.resources.insert(url.to_string());
        Ok(true)
    }

    pub fn is_known_resource(&self, url: &str) -> bool {
        self.resources.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
