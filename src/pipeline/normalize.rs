//! Response normalisation: deterministic cleanup of raw model output.
//!
//! Local models occasionally dress their answer up in ways that are harmless
//! to a human reader but would pollute the parsed record:
//!
//! - wrapping the whole response in ` ``` ` fences, so the fence lines would
//!   be swept into the overflow field;
//! - Windows-style `\r\n` line endings, leaving a trailing `\r` on every
//!   parsed value;
//! - invisible Unicode (zero-width spaces, BOM) pasted through from the
//!   source document.
//!
//! Each rule is a pure `&str → String` pass with no shared state. The parser
//! itself stays untouched by any of this — it accepts arbitrary text; these
//! passes just keep model artefacts out of the output columns.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalisation rules to a raw model response.
///
/// Rules (applied in order):
/// 1. Strip one outer code fence wrapping the whole response
/// 2. Normalise line endings (CRLF → LF)
/// 3. Remove invisible Unicode (zero-width spaces, BOM, word joiner)
pub fn normalize_response(input: &str) -> String {
    let s = strip_outer_fences(input);
    let s = normalize_line_endings(&s);
    remove_invisible_chars(&s)
}

// ── Rule 1: Strip one outer code fence ───────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\n(.*)\n```\s*$").unwrap());

fn strip_outer_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalize_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Remove invisible Unicode ─────────────────────────────────────────

const INVISIBLE: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

fn remove_invisible_chars(input: &str) -> String {
    if input.contains(INVISIBLE) {
        input.replace(INVISIBLE, "")
    } else {
        input.to_string()
    }
}
