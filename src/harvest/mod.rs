//! Harvest module for turning resource links into dataset records
//!
//! This module contains the harvest stage, including:
//! - The keyword relevance policy
//! - Prompt derivation and record emission
//! - The fetch/classify/emit loop over the resource-link store

mod emitter;
mod harvester;
mod relevance;

pub use emitter::{derive_prompt, title_case, DatasetEmitter};
pub use harvester::{run_harvest, Harvester};
pub use relevance::{
    is_relevant, MatchSource, Rejection, RelevancePolicy, Verdict, DEFAULT_EXCLUDE_KEYWORDS,
    DEFAULT_INCLUDE_KEYWORDS, DEFAULT_MIN_CONTENT_LENGTH,
};
