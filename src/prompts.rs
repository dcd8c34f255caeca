//! The evaluation prompt sent to the model for each document.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the field enumeration is generated from
//!    [`FieldSchema`], so the prompt and the response parser can never drift
//!    apart: the model is asked for exactly the lines the parser recognises.
//!
//! 2. **Testability** — unit tests inspect the prompt directly without
//!    running a model.
//!
//! Callers can override the instruction preamble via
//! [`crate::config::BatchConfig::preamble`]; the constants here are used
//! when no override is provided.

use crate::schema::FieldSchema;

/// Default instruction preamble, scoring scale included.
pub const DEFAULT_PREAMBLE: &str = "Please analyze the following CV and extract the mandatory \
information in a structured format. Provide scores for Generative AI Experience and AI/ML \
Experience based on the following scale: 1 - Exposed, 2 - Hands-on, 3 - Worked on advanced \
areas such as Agentic RAG, Evals, etc.\n\nAnswer each field on its own line, exactly in the \
numbered \"N. Field: value\" form listed below.";

/// Parenthetical hint appended to a field's prompt line, keyed by canonical
/// name. Fields without an entry are listed bare.
fn field_hint(canonical: &str) -> Option<&'static str> {
    match canonical {
        "Supporting Information" => Some("(e.g., certifications, internships, projects)"),
        _ => None,
    }
}

/// Build the full evaluation prompt for one document.
///
/// Layout (fixed): instruction preamble, the enumerated field list with
/// hints, then the literal extracted document text. Pure function of its
/// inputs — no global prompt state anywhere in the crate.
pub fn build_prompt(schema: &FieldSchema, preamble: &str, document_text: &str) -> String {
    let mut prompt = String::with_capacity(preamble.len() + document_text.len() + 512);
    prompt.push_str(preamble);
    prompt.push_str("\n\nMandatory Fields:\n");
    for field in schema.fields() {
        prompt.push_str(&format!("{}. {}", field.ordinal, field.label));
        if let Some(hint) = field_hint(field.canonical) {
            prompt.push(' ');
            prompt.push_str(hint);
        }
        prompt.push('\n');
    }
    prompt.push_str("\nHere is the CV text:\n\n");
    prompt.push_str(document_text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_field_in_order() {
        let schema = FieldSchema::standard();
        let prompt = build_prompt(&schema, DEFAULT_PREAMBLE, "some cv text");

        let mut last = 0;
        for field in schema.fields() {
            let line = format!("{}. {}", field.ordinal, field.label);
            let pos = prompt.find(&line).unwrap_or_else(|| {
                panic!("prompt missing field line: {line}");
            });
            assert!(pos > last, "field lines out of order at: {line}");
            last = pos;
        }
    }

    #[test]
    fn prompt_ends_with_document_text() {
        let schema = FieldSchema::standard();
        let prompt = build_prompt(&schema, DEFAULT_PREAMBLE, "THE DOCUMENT BODY");
        assert!(prompt.ends_with("THE DOCUMENT BODY"));
        // The scale definition precedes the field list, which precedes the text.
        let scale = prompt.find("1 - Exposed").unwrap();
        let fields = prompt.find("Mandatory Fields:").unwrap();
        let body = prompt.find("THE DOCUMENT BODY").unwrap();
        assert!(scale < fields && fields < body);
    }

    #[test]
    fn supporting_information_keeps_its_hint() {
        let schema = FieldSchema::standard();
        let prompt = build_prompt(&schema, DEFAULT_PREAMBLE, "");
        assert!(prompt.contains("11. Supporting Information (e.g., certifications, internships, projects)"));
    }

    #[test]
    fn custom_preamble_replaces_the_default() {
        let schema = FieldSchema::standard();
        let prompt = build_prompt(&schema, "Rate this resume.", "text");
        assert!(prompt.starts_with("Rate this resume."));
        assert!(!prompt.contains("1 - Exposed"));
    }
}
