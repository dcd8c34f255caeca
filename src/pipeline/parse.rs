//! Response parsing: one model response string → one schema-shaped record.
//!
//! ## Why line prefixes instead of structured output?
//!
//! Local models answer the evaluation prompt as loosely formatted text:
//! usually the numbered `"N. Field: value"` lines they were asked for, but
//! interleaved with bullet points, commentary, and the occasional reformatted
//! field. Demanding strict JSON would turn every such response into a hard
//! failure. Matching each line against the schema's numbered prefixes
//! tolerates that variability, and everything that matches nothing lands in
//! the Supporting Information overflow field instead of being dropped —
//! lossy in placement, never in content.
//!
//! Parsing therefore **never fails**: the worst response yields a record with
//! every canonical field empty and the whole text in the overflow field. It
//! is also pure — same input, same record, no state between calls.

use crate::output::ExtractionRecord;
use crate::schema::FieldSchema;
use std::collections::BTreeMap;

/// Parse a model response into a record conforming to `schema`.
///
/// Line rules, applied in order of appearance:
/// - a line starting with a field's `"N. Label:"` prefix sets that field to
///   the trimmed text after the colon; the first occurrence wins and later
///   duplicate lines for the same field are dropped (one record per field);
/// - for the overflow field the prefix line *replaces* whatever unmatched
///   text had accumulated so far — it is the canonical open of that field;
/// - any other non-blank line is appended to the overflow field,
///   space-separated, with a single leading bullet marker stripped;
/// - blank lines are skipped.
pub fn parse_response(schema: &FieldSchema, response: &str) -> ExtractionRecord {
    let mut record = ExtractionRecord::new(schema);
    let mut seen = vec![false; schema.len()];
    let overflow_idx = schema.index_of(schema.overflow());
    let prefixes: Vec<String> = schema.fields().iter().map(|f| schema.prefix(f)).collect();

    for line in response.lines() {
        match match_field_line(&prefixes, line) {
            Some((idx, value)) => {
                if !seen[idx] {
                    seen[idx] = true;
                    record.set_index(idx, value);
                }
                // Duplicate prefix lines are dropped: one record per field.
            }
            None => {
                let text = strip_bullet(line.trim());
                if text.is_empty() {
                    continue;
                }
                let current = record.value_at(overflow_idx);
                let appended = if current.is_empty() {
                    text.to_string()
                } else {
                    format!("{current} {text}")
                };
                record.set_index(overflow_idx, appended);
            }
        }
    }

    record
}

/// Parse a response into raw `key: value` pairs with no schema at all.
///
/// Every line containing a colon contributes one pair: key before the first
/// colon, value after, both trimmed. Keys that trim to empty are dropped, and
/// the first occurrence of a key wins, matching the canonical parser's
/// duplicate policy. There is no overflow field and no fixed key set — this
/// is an explicitly separate mode for exploratory runs where the standard
/// schema is not expected to match, never a fallback of [`parse_response`].
pub fn parse_generic(response: &str) -> BTreeMap<String, String> {
    let mut pairs = BTreeMap::new();
    for line in response.lines() {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            pairs
                .entry(key.to_string())
                .or_insert_with(|| value.trim().to_string());
        }
    }
    pairs
}

/// If `line` opens with a recognised field prefix, return the field's schema
/// index and the trimmed text after the prefix's colon.
fn match_field_line(prefixes: &[String], line: &str) -> Option<(usize, String)> {
    prefixes.iter().enumerate().find_map(|(idx, prefix)| {
        line.strip_prefix(prefix.as_str())
            .map(|rest| (idx, rest.trim().to_string()))
    })
}

/// Strip one leading bullet marker (`- `, `* `, `• `) from an already-trimmed
/// line, so list items contribute their content, not their markup.
fn strip_bullet(line: &str) -> &str {
    for marker in ["-", "*", "•"] {
        if let Some(rest) = line.strip_prefix(marker) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    line
}
