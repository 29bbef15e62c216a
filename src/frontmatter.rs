//! Frontmatter extraction.
//!
//! A document may open with a sentinel-delimited metadata block: YAML
//! between two `---` lines, or JSON between two `;;;` lines. Extraction
//! runs once, when a file is ingested into the input collection; a
//! sentinel appearing later in the body is literal content.
//!
//! Malformed blocks never surface as errors. The document is reported as
//! having no frontmatter and is kept byte-for-byte untouched.

use crate::file::FileRecord;
use crate::value::{Metadata, Value, yaml_key_to_string};

/// Sentinel opening a YAML frontmatter block.
const YAML_SENTINEL: &str = "---";

/// Sentinel opening a JSON frontmatter block.
const JSON_SENTINEL: &str = ";;;";

/// A successfully extracted frontmatter block.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    /// Parsed metadata entries, in document order.
    pub metadata: Metadata,
    /// The document text after the closing sentinel.
    pub body: String,
}

/// Try to extract a frontmatter block from the start of `document`.
///
/// Returns `None` when no sentinel opens the document or the block fails
/// to parse; in either case the caller keeps the document unchanged.
pub fn try_extract(document: &str) -> Option<Extracted> {
    if document.starts_with(YAML_SENTINEL) {
        extract_with(document, YAML_SENTINEL, parse_yaml_mapping)
    } else if document.starts_with(JSON_SENTINEL) {
        extract_with(document, JSON_SENTINEL, parse_json_object)
    } else {
        None
    }
}

/// Run extraction on a record in place.
///
/// On success, extracted keys merge into the record's metadata
/// (overwriting same-named keys) and the content becomes the body.
/// Returns whether a block was found.
pub fn apply(record: &mut FileRecord) -> bool {
    match try_extract(&record.content) {
        Some(extracted) => {
            for (key, value) in extracted.metadata {
                record.metadata.insert(key, value);
            }
            record.content = extracted.body;
            true
        }
        None => false,
    }
}

/// Shared split-and-parse algorithm for both sentinels.
///
/// The document splits on the literal sentinel: the part before the first
/// sentinel must be empty, the second part is the metadata block, and
/// everything from the third part on is rejoined (sentinel as separator)
/// as the body.
fn extract_with(
    document: &str,
    sentinel: &str,
    parse: impl Fn(&str) -> Option<Metadata>,
) -> Option<Extracted> {
    let parts: Vec<&str> = document.split(sentinel).collect();
    if parts.len() < 3 || !parts[0].is_empty() {
        return None;
    }

    let metadata = parse(parts[1].trim())?;
    let body = parts[2..].join(sentinel);

    Some(Extracted {
        metadata,
        body: body.trim_start().to_owned(),
    })
}

/// Parse a YAML mapping; `None` on any failure.
fn parse_yaml_mapping(block: &str) -> Option<Metadata> {
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(block).ok()?;

    let mut metadata = Metadata::new();
    for (key, value) in mapping {
        // A structured key has no string form; reject the whole block
        let key = yaml_key_to_string(&key)?;
        metadata.insert(key, Value::from(value));
    }
    Some(metadata)
}

/// Parse a JSON object; `None` on any failure.
fn parse_json_object(block: &str) -> Option<Metadata> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(block).ok()?;

    let mut metadata = Metadata::new();
    for (key, value) in object {
        metadata.insert(key, Value::from(value));
    }
    Some(metadata)
}

// ============================================================================
// Tests
// ============================================================================
