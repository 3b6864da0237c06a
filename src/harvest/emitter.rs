//! Dataset record construction and emission

use crate::config::HarvestConfig;
use crate::storage::{DatasetRecord, Provenance, RecordSink, StorageResult};
use chrono::Utc;
use url::Url;

/// Characters in a filename that separate words
const SEPARATORS: &[char] = &['_', '-'];

/// Title-cases `text`: a letter is uppercased when the character before it
/// is not a letter, and lowercased otherwise
///
/// ```
/// use hdl_harvest::harvest::title_case;
///
/// assert_eq!(title_case("half adder"), "Half Adder");
/// assert_eq!(title_case("4bit counter"), "4Bit Counter");
/// assert_eq!(title_case("ALU"), "Alu");
/// ```
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if prev_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_is_letter = c.is_alphabetic();
    }

    out
}

/// Derives the prompt sentence for a resource filename
///
/// Strips `extension` (case-insensitively), turns separators into spaces,
/// title-cases the result and substitutes it for `{title}` in `template`.
///
/// ```
/// use hdl_harvest::harvest::derive_prompt;
///
/// assert_eq!(
///     derive_prompt("half_adder.v", ".v", "Write Verilog code for {title}."),
///     "Write Verilog code for Half Adder."
/// );
/// ```
pub fn derive_prompt(filename: &str, extension: &str, template: &str) -> String {
    let stem = strip_suffix_ignore_case(filename, extension);
    let words = stem
        .split(SEPARATORS)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    template.replace("{title}", &title_case(&words))
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> &'a str {
    let cut = text.len().wrapping_sub(suffix.len());
    if suffix.is_empty()
        || text.len() < suffix.len()
        || !text.is_char_boundary(cut)
        || !text[cut..].eq_ignore_ascii_case(suffix)
    {
        return text;
    }
    &text[..cut]
}

/// Turns accepted resources into dataset records and writes them out
#[derive(Debug)]
pub struct DatasetEmitter<S> {
    sink: S,
    resource_extension: String,
    prompt_template: String,
    source_tag: String,
    category_tag: String,
    emitted: usize,
}

impl<S: RecordSink> DatasetEmitter<S> {
    pub fn new(sink: S, config: &HarvestConfig, resource_extension: impl Into<String>) -> Self {
        Self {
            sink,
            resource_extension: resource_extension.into(),
            prompt_template: config.prompt_template.clone(),
            source_tag: config.source_tag.clone(),
            category_tag: config.category_tag.clone(),
            emitted: 0,
        }
    }

    /// Builds the record for an accepted resource
    pub fn build_record(&self, url: &Url, filename: &str, content: &str) -> DatasetRecord {
        DatasetRecord {
            source_url: url.to_string(),
            filename: filename.to_string(),
            prompt: derive_prompt(filename, &self.resource_extension, &self.prompt_template),
            content: content.to_string(),
            provenance: Provenance {
                origin: url.origin().ascii_serialization(),
                source: self.source_tag.clone(),
                category: self.category_tag.clone(),
                harvested_at: Utc::now(),
            },
        }
    }

    /// Writes one record to the sink immediately
    pub fn emit(&mut self, record: &DatasetRecord) -> StorageResult<()> {
        self.sink.append_record(record)?;
        self.emitted += 1;
        Ok(())
    }

    /// Number of records written by this emitter
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
