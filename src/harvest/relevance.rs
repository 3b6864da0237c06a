//! Keyword relevance classification
//!
//! A resource is judged from its filename and content alone:
//!
//! 0. Trimmed content shorter than the minimum length is rejected.
//! 1. Exclude tier: any exclude keyword inside the lowercased filename
//!    rejects it. Exclusion always wins over inclusion.
//! 2. Include tier: any include keyword inside the lowercased filename, or
//!    any include keyword appearing as a whole word in the content, accepts
//!    it. Otherwise it is rejected.
//!
//! Classification is pure: no I/O, no clock.

use crate::config::HarvestConfig;
use crate::ConfigError;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;
use thiserror::Error;

/// Filename markers of testbenches and simulation helpers
pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &[
    "tb", "test", "wave", "bench", "stimulus", "driver", "monitor", "checker",
];

/// Vocabulary of synthesizable circuit primitives
pub const DEFAULT_INCLUDE_KEYWORDS: &[&str] = &[
    "and",
    "or",
    "nand",
    "nor",
    "xor",
    "xnor",
    "not",
    "gate",
    "adder",
    "subtractor",
    "multiplier",
    "counter",
    "mux",
    "decoder",
    "encoder",
    "flipflop",
    "latch",
    "register",
    "fsm",
    "alu",
    "comparator",
];

/// Default minimum content length, in characters
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 30;

/// Where an include keyword was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Filename,
    Content,
}

/// Why a resource was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("content too short ({length} < {minimum} characters)")]
    ContentTooShort { length: usize, minimum: usize },

    #[error("filename contains excluded keyword '{keyword}'")]
    Excluded { keyword: String },

    #[error("no include keyword in filename or content")]
    NotRelevant,
}

/// Outcome of classifying one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted {
        keyword: String,
        matched_on: MatchSource,
    },
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The keyword that decided the verdict, if any
    pub fn matched_keyword(&self) -> Option<&str> {
        match self {
            Self::Accepted { keyword, .. } => Some(keyword),
            Self::Rejected(Rejection::Excluded { keyword }) => Some(keyword),
            Self::Rejected(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct IncludeKeyword {
    word: String,
    whole_word: Regex,
}

/// Compiled two-tier keyword policy
#[derive(Debug, Clone)]
pub struct RelevancePolicy {
    exclude: Vec<String>,
    include: Vec<IncludeKeyword>,
    min_content_length: usize,
}

impl RelevancePolicy {
    /// Builds a policy; keywords are matched case-insensitively
    ///
    /// Blank keywords are ignored.
    pub fn new<I, E, T, U>(
        exclude: E,
        include: I,
        min_content_length: usize,
    ) -> Result<Self, ConfigError>
    where
        E: IntoIterator<Item = T>,
        T: AsRef<str>,
        I: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        let exclude = exclude
            .into_iter()
            .map(|kw| kw.as_ref().trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();

        let include = include
            .into_iter()
            .map(|kw| kw.as_ref().trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .map(|word| -> Result<IncludeKeyword, ConfigError> {
                let whole_word = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(&word)))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        ConfigError::Validation(format!("Invalid include keyword '{}': {}", word, e))
                    })?;
                Ok(IncludeKeyword { word, whole_word })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            exclude,
            include,
            min_content_length,
        })
    }

    pub fn from_config(config: &HarvestConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.exclude_keywords,
            &config.include_keywords,
            config.min_content_length,
        )
    }

    /// The built-in keyword lists and length threshold
    pub fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<RelevancePolicy> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Self::new(
                DEFAULT_EXCLUDE_KEYWORDS,
                DEFAULT_INCLUDE_KEYWORDS,
                DEFAULT_MIN_CONTENT_LENGTH,
            )
            .expect("escaped built-in keywords always compile")
        })
    }

    pub fn min_content_length(&self) -> usize {
        self.min_content_length
    }

    /// Classifies a resource by filename and content
    pub fn classify(&self, filename: &str, content: &str) -> Verdict {
        let length = content.trim().chars().count();
        if length == 0 || length < self.min_content_length {
            return Verdict::Rejected(Rejection::ContentTooShort {
                length,
                minimum: self.min_content_length,
            });
        }

        let name = filename.to_lowercase();

        if let Some(keyword) = self.exclude.iter().find(|kw| name.contains(kw.as_str())) {
            return Verdict::Rejected(Rejection::Excluded {
                keyword: keyword.clone(),
            });
        }

        if let Some(kw) = self.include.iter().find(|kw| name.contains(&kw.word)) {
            return Verdict::Accepted {
                keyword: kw.word.clone(),
                matched_on: MatchSource::Filename,
            };
        }

        if let Some(kw) = self.include.iter().find(|kw| kw.whole_word.is_match(content)) {
            return Verdict::Accepted {
                keyword: kw.word.clone(),
                matched_on: MatchSource::Content,
            };
        }

        Verdict::Rejected(Rejection::NotRelevant)
    }
}

/// Classifies with the built-in policy and returns only the decision
///
/// # Examples
///
/// ```
/// use hdl_harvest::is_relevant;
///
/// assert!(!is_relevant("adder_tb.v", "module adder_tb; reg a, b; adder dut(a, b); endmodule"));
/// assert!(is_relevant("nand_gate.v", "module nand_gate(a, b, y); input a, b; output y; endmodule"));
/// ```
pub fn is_relevant(filename: &str, content: &str) -> bool {
    RelevancePolicy::builtin()
        .classify(filename, content)
        .is_accepted()
}
