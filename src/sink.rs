//! CSV sink: write the batch's records as a fixed-column table.
//!
//! Columns are the schema's canonical fields, in schema order, optionally
//! followed by a `Source File` column for traceability. The write is atomic
//! (temp file in the target directory, then rename) so a failed run never
//! leaves a truncated CSV where a previous good one stood.

use crate::error::PipelineError;
use crate::output::ExtractionRecord;
use crate::schema::FieldSchema;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write `records` to a CSV file at `path`.
///
/// Every record is assumed to conform to `schema` (the pipeline guarantees
/// this by construction). With `include_source` the file gains a trailing
/// `Source File` column; records without a source id leave it empty.
pub fn write_csv(
    records: &[ExtractionRecord],
    schema: &FieldSchema,
    path: &Path,
    include_source: bool,
) -> Result<(), PipelineError> {
    let write_failed = |detail: String| PipelineError::OutputWriteFailed {
        path: path.to_path_buf(),
        detail,
    };

    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = parent {
        std::fs::create_dir_all(dir).map_err(|e| write_failed(e.to_string()))?;
    }

    let tmp = match parent {
        Some(dir) => tempfile::NamedTempFile::new_in(dir),
        None => tempfile::NamedTempFile::new_in("."),
    }
    .map_err(|e| write_failed(e.to_string()))?;

    let mut writer = csv::Writer::from_writer(tmp);

    let mut header: Vec<&str> = schema.fields().iter().map(|f| f.canonical).collect();
    if include_source {
        header.push("Source File");
    }
    writer
        .write_record(&header)
        .map_err(|e| write_failed(e.to_string()))?;

    for record in records {
        let mut row: Vec<&str> = record.fields().map(|(_, value)| value).collect();
        if include_source {
            row.push(record.source_id().unwrap_or(""));
        }
        writer
            .write_record(&row)
            .map_err(|e| write_failed(e.to_string()))?;
    }

    writer.flush().map_err(|e| write_failed(e.to_string()))?;
    let mut file = writer
        .into_inner()
        .map_err(|e| write_failed(e.to_string()))?;
    file.flush().map_err(|e| write_failed(e.to_string()))?;
    file.persist(path)
        .map_err(|e| write_failed(e.to_string()))?;

    info!(rows = records.len(), path = %path.display(), "wrote CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse::parse_response;

    fn sample_record(schema: &FieldSchema, name: &str, source: &str) -> ExtractionRecord {
        let mut record = parse_response(schema, &format!("1. Name: {name}"));
        record.set_source_id(source);
        record
    }

    #[test]
    fn header_and_rows_round_trip() {
        let schema = FieldSchema::standard();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let records = vec![
            sample_record(&schema, "Jane Doe", "jane.pdf"),
            sample_record(&schema, "Bob Roe", "bob.pdf"),
        ];
        write_csv(&records, &schema, &path, true).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 12);
        assert_eq!(&headers[0], "Name");
        assert_eq!(&headers[10], "Supporting Information");
        assert_eq!(&headers[11], "Source File");

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Jane Doe");
        assert_eq!(&rows[0][11], "jane.pdf");
        assert_eq!(&rows[1][0], "Bob Roe");
    }

    #[test]
    fn source_column_is_optional() {
        let schema = FieldSchema::standard();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.csv");

        write_csv(&[sample_record(&schema, "Jane", "jane.pdf")], &schema, &path, false).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 11);
    }

    #[test]
    fn commas_and_newlines_in_values_survive_quoting() {
        let schema = FieldSchema::standard();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.csv");

        let record = parse_response(&schema, "8. Key Skills: Rust, Python, \"SQL\"");
        write_csv(&[record], &schema, &path, false).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[7], "Rust, Python, \"SQL\"");
    }

    #[test]
    fn unwritable_target_is_output_write_failed() {
        let schema = FieldSchema::standard();
        let dir = tempfile::tempdir().unwrap();
        // A plain file where a directory is needed makes the parent unusable.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"in the way").unwrap();

        let err = write_csv(&[], &schema, &blocker.join("out.csv"), true).unwrap_err();
        assert!(matches!(err, PipelineError::OutputWriteFailed { .. }));
    }

    #[test]
    fn existing_file_is_replaced_atomically() {
        let schema = FieldSchema::standard();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale contents").unwrap();

        write_csv(&[sample_record(&schema, "Jane", "jane.pdf")], &schema, &path, true).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Jane"));
        assert!(!contents.contains("stale contents"));
    }
}
