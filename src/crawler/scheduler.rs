//! Frontier queue for the breadth-first crawl
//!
//! This module handles:
//! - FIFO ordering of pending pages (strict BFS)
//! - The depth bound
//! - The visited check at enqueue time (cheap filter) and at dequeue time
//!   (authoritative, catches pages linked from several parents)

use crate::state::{CrawlRegistry, CrawlTask};
use crate::storage::ResourceSink;
use std::collections::VecDeque;
use url::Url;

/// Pending pages in breadth-first order
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<CrawlTask>,
    max_depth: u32,
}

impl Frontier {
    pub fn new(max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            max_depth,
        }
    }

    /// Appends a task; tasks beyond the depth bound are refused
    pub fn push(&mut self, task: CrawlTask) -> bool {
        if task.depth > self.max_depth {
            return false;
        }
        self.queue.push_back(task);
        true
    }

    /// Enqueues every page linked from `parent` that is not yet visited
    ///
    /// Returns the number of tasks added.
    pub fn enqueue_children<S, I>(
        &mut self,
        parent: &CrawlTask,
        links: I,
        registry: &CrawlRegistry<S>,
    ) -> usize
    where
        S: ResourceSink,
        I: IntoIterator<Item = Url>,
    {
        let mut added = 0;
        for link in links {
            if registry.is_visited(link.as_str()) {
                continue;
            }
            if self.push(parent.child(link)) {
                added += 1;
            }
        }
        added
    }

    /// Pops the next task that should be fetched and marks it visited
    ///
    /// Tasks beyond the depth bound or already visited are discarded without
    /// side effects. Returns `None` once the queue is exhausted.
    pub fn pop_next<S: ResourceSink>(
        &mut self,
        registry: &mut CrawlRegistry<S>,
    ) -> Option<CrawlTask> {
        while let Some(task) = self.queue.pop_front() {
            if task.depth > self.max_depth {
                tracing::trace!(url = %task.url, depth = task.depth, "Discarding task beyond max depth");
                continue;
            }

            if !registry.mark_visited(task.url.as_str()) {
                tracing::trace!(url = %task.url, "Discarding already visited page");
                continue;
            }

            return Some(task);
        }

        None
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Returns the number of tasks waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
