//! The fixed output schema for a screening run.
//!
//! Every record produced by the pipeline has exactly these fields, in this
//! order, no matter what the model actually returned. The schema doubles as
//! the line recogniser for the response parser: a response line belongs to a
//! field when it starts with that field's numbered prefix
//! (`"{ordinal}. {label}:"`), which is also how the fields are enumerated in
//! the evaluation prompt — the model is asked to answer in the same shape it
//! was asked in.
//!
//! The last field, Supporting Information, is the **overflow field**: any
//! non-empty response line that matches no recognised prefix is folded into
//! it instead of being dropped. Model responses routinely contain bullet
//! points, commentary, or reformatted field lines; losing them silently would
//! defeat the point of the pipeline.

/// One column of the output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// 1-based position, used in the line prefix and the prompt enumeration.
    pub ordinal: usize,
    /// The label the model is asked to echo back (`"3. University:"`).
    pub label: &'static str,
    /// The canonical column name in records and CSV output.
    pub canonical: &'static str,
}

/// The ordered set of canonical fields. Immutable once built.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    fields: &'static [Field],
}

/// The eleven screening fields, prompt order = column order.
const STANDARD_FIELDS: &[Field] = &[
    Field { ordinal: 1, label: "Name", canonical: "Name" },
    Field { ordinal: 2, label: "Contact Details", canonical: "Contact Details" },
    Field { ordinal: 3, label: "University", canonical: "University" },
    Field { ordinal: 4, label: "Year of Study", canonical: "Year of Study" },
    Field { ordinal: 5, label: "Course", canonical: "Course" },
    Field { ordinal: 6, label: "Discipline", canonical: "Discipline" },
    Field { ordinal: 7, label: "CGPA/Percentage", canonical: "CGPA/Percentage" },
    Field { ordinal: 8, label: "Key Skills", canonical: "Key Skills" },
    Field { ordinal: 9, label: "Gen AI Experience Score", canonical: "Gen AI Experience Score" },
    Field { ordinal: 10, label: "AI/ML Experience Score", canonical: "AI/ML Experience Score" },
    Field {
        ordinal: 11,
        label: "Supporting Information",
        canonical: "Supporting Information",
    },
];

impl FieldSchema {
    /// The standard 11-field CV screening schema.
    pub fn standard() -> Self {
        Self {
            fields: STANDARD_FIELDS,
        }
    }

    /// All fields, in output order.
    pub fn fields(&self) -> &[Field] {
        self.fields
    }

    /// Number of fields (overflow included).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The exact prefix a response line must start with to be recognised as
    /// `field`, colon included: `"9. Gen AI Experience Score:"`.
    pub fn prefix(&self, field: &Field) -> String {
        format!("{}. {}:", field.ordinal, field.label)
    }

    /// The overflow field (last in the schema).
    pub fn overflow(&self) -> &Field {
        self.fields
            .last()
            .expect("schema always has at least one field")
    }

    /// Look up a field by its canonical column name.
    pub fn by_canonical(&self, canonical: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.canonical == canonical)
    }

    /// Position of `field` in the schema order.
    pub(crate) fn index_of(&self, field: &Field) -> usize {
        field.ordinal - 1
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::standard()
    }
}
