//! Result types: per-document records and the assembled batch result.

use crate::error::DocumentError;
use crate::schema::FieldSchema;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One screened document, normalised to the fixed schema.
///
/// Holds exactly the canonical fields of the schema it was created from —
/// no more, no fewer — in schema order, every value defaulting to the empty
/// string. The optional `source_id` (usually the file name) exists only for
/// traceability; it is not a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    source_id: Option<String>,
    /// `(canonical name, value)` pairs in schema order.
    values: Vec<(&'static str, String)>,
}

impl ExtractionRecord {
    /// An all-empty record for `schema`.
    pub fn new(schema: &FieldSchema) -> Self {
        Self {
            source_id: None,
            values: schema
                .fields()
                .iter()
                .map(|f| (f.canonical, String::new()))
                .collect(),
        }
    }

    /// The value of a canonical field, or `None` for names outside the schema.
    pub fn get(&self, canonical: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| *name == canonical)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrite a field value by schema position.
    pub(crate) fn set_index(&mut self, index: usize, value: String) {
        self.values[index].1 = value;
    }

    /// Read a field value by schema position.
    pub(crate) fn value_at(&self, index: usize) -> &str {
        &self.values[index].1
    }

    /// `(canonical name, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
    }

    /// Document identifier, when stamped by the processor.
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    pub(crate) fn set_source_id(&mut self, source_id: impl Into<String>) {
        self.source_id = Some(source_id.into());
    }
}

// Hand-written so JSON keeps schema order and the source id rides along as a
// plain extra key instead of nesting the fields one level down.
impl Serialize for ExtractionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.source_id.is_some());
        let mut map = serializer.serialize_map(Some(self.values.len() + extra))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        if let Some(ref id) = self.source_id {
            map.serialize_entry("Source File", id)?;
        }
        map.end()
    }
}

/// A document the batch could not screen, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    /// Document identifier (file name).
    pub source_id: String,
    /// What went wrong.
    pub reason: DocumentError,
}

/// Counters and timings for one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    /// Documents discovered in the input set.
    pub total_documents: usize,
    /// Documents that produced a record.
    pub succeeded: usize,
    /// Documents that failed extraction or invocation.
    pub failed: usize,
    /// Wall-clock time for the whole batch.
    pub total_duration_ms: u64,
}

/// Everything a batch run produced.
///
/// `records` and `failures` are both ordered by the original input position
/// of their documents, even when the batch ran with `concurrency > 1`.
#[derive(Debug, Serialize)]
pub struct BatchResult {
    /// One record per successfully screened document, in input order.
    pub records: Vec<ExtractionRecord>,
    /// One entry per failed document, in input order.
    pub failures: Vec<DocumentFailure>,
    /// Run counters.
    pub stats: BatchStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_all_empty() {
        let schema = FieldSchema::standard();
        let record = ExtractionRecord::new(&schema);
        assert_eq!(record.fields().count(), 11);
        assert!(record.fields().all(|(_, v)| v.is_empty()));
        assert_eq!(record.get("Name"), Some(""));
        assert!(record.source_id().is_none());
    }

    #[test]
    fn get_rejects_names_outside_the_schema() {
        let schema = FieldSchema::standard();
        let record = ExtractionRecord::new(&schema);
        assert_eq!(record.get("Cover Letter"), None);
    }

    #[test]
    fn json_keeps_schema_order_and_appends_source_file() {
        let schema = FieldSchema::standard();
        let mut record = ExtractionRecord::new(&schema);
        record.set_index(0, "Jane Doe".into());
        record.set_source_id("jane.pdf");

        let json = serde_json::to_string(&record).unwrap();
        let name_pos = json.find("\"Name\"").unwrap();
        let skills_pos = json.find("\"Key Skills\"").unwrap();
        let source_pos = json.find("\"Source File\"").unwrap();
        assert!(name_pos < skills_pos && skills_pos < source_pos);
        assert!(json.contains("\"Jane Doe\""));
        assert!(json.contains("\"jane.pdf\""));
    }

    #[test]
    fn json_omits_source_file_when_unset() {
        let schema = FieldSchema::standard();
        let record = ExtractionRecord::new(&schema);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("Source File"));
    }
}
