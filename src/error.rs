//! Error types for the ACH engine.
//!
//! Two shapes reach callers: [`FieldError`] for a single field failing a
//! context-free rule, and [`BatchError`] / [`FileError`] for rules spanning
//! several fields or records. Decoding wraps either in [`AchError::Parse`]
//! with the 1-based line number.

use std::fmt;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, AchError>;

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Mandatory field is empty or holds only its default value.
    Inclusion,
    /// Record type discriminator does not match the record.
    RecordType,
    /// Addenda type code does not match the variant.
    TypeCode,
    /// Numeric field contains a non-digit.
    Numeric,
    /// Alphanumeric field contains a non-printable character.
    Alphanumeric,
    /// Line is not exactly one record long.
    Length,
    /// Value does not fit the field width.
    TooLarge,
    /// Value is outside the enumerated set for the field.
    InvalidValue,
    /// Not a US state or territory code.
    State,
    /// Malformed date.
    Date,
    /// Malformed time of day.
    Time,
    /// Check digit disagrees with the routing number.
    CheckDigit,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FieldErrorKind::Inclusion => "field inclusion",
            FieldErrorKind::RecordType => "invalid record type",
            FieldErrorKind::TypeCode => "invalid addenda type code",
            FieldErrorKind::Numeric => "not numeric",
            FieldErrorKind::Alphanumeric => "not alphanumeric",
            FieldErrorKind::Length => "invalid record length",
            FieldErrorKind::TooLarge => "value exceeds field width",
            FieldErrorKind::InvalidValue => "invalid value",
            FieldErrorKind::State => "invalid US state or territory",
            FieldErrorKind::Date => "invalid date",
            FieldErrorKind::Time => "invalid time",
            FieldErrorKind::CheckDigit => "check digit does not match routing number",
        };
        f.write_str(msg)
    }
}

/// A single field failed a local rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field_name} {value:?}: {kind}")]
pub struct FieldError {
    pub field_name: &'static str,
    pub value: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field_name: &'static str, value: impl ToString, kind: FieldErrorKind) -> Self {
        FieldError {
            field_name,
            value: value.to_string(),
            kind,
        }
    }

    /// The mandatory field `field_name` holds its default value.
    pub fn inclusion(field_name: &'static str, value: impl ToString) -> Self {
        FieldError::new(field_name, value, FieldErrorKind::Inclusion)
    }
}

/// A rule spanning several fields or records of one batch was violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("batch #{batch_number} {field_name}: {msg}")]
pub struct BatchError {
    pub batch_number: u32,
    pub field_name: &'static str,
    pub msg: String,
}

impl BatchError {
    pub fn new(batch_number: u32, field_name: &'static str, msg: impl Into<String>) -> Self {
        BatchError {
            batch_number,
            field_name,
            msg: msg.into(),
        }
    }
}

/// A rule spanning the batches of a file was violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("file {field_name}: {msg}")]
pub struct FileError {
    pub field_name: &'static str,
    pub msg: String,
}

impl FileError {
    pub fn new(field_name: &'static str, msg: impl Into<String>) -> Self {
        FileError {
            field_name,
            msg: msg.into(),
        }
    }
}

/// Errors that can occur while decoding, building, validating or encoding.
#[derive(Error, Debug)]
pub enum AchError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    File(#[from] FileError),

    /// Decoding failed at a specific line.
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: Box<AchError>,
    },

    /// Failed to read input or write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: ach-engine <file.ach>")]
    MissingArgument,
}

impl AchError {
    pub(crate) fn at_line(line: usize, err: AchError) -> Self {
        match err {
            AchError::Parse { .. } => err,
            other => AchError::Parse {
                line,
                source: Box::new(other),
            },
        }
    }

    /// Name of the offending field, looking through parse positions.
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            AchError::Field(e) => Some(e.field_name),
            AchError::Batch(e) => Some(e.field_name),
            AchError::File(e) => Some(e.field_name),
            AchError::Parse { source, .. } => source.field_name(),
            _ => None,
        }
    }

    /// The field-level error, if this is one.
    pub fn as_field_error(&self) -> Option<&FieldError> {
        match self {
            AchError::Field(e) => Some(e),
            AchError::Parse { source, .. } => source.as_field_error(),
            _ => None,
        }
    }

    /// The line number for decode errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            AchError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_through_parse_position() {
        let err = AchError::at_line(3, FieldError::inclusion("TerminalCity", "").into());
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.field_name(), Some("TerminalCity"));
        assert_eq!(
            err.as_field_error().map(|e| e.kind),
            Some(FieldErrorKind::Inclusion)
        );
    }

    #[test]
    fn test_nested_positions_keep_innermost_line() {
        let inner = AchError::at_line(7, BatchError::new(1, "EntryHash", "mismatch").into());
        let outer = AchError::at_line(9, inner);
        assert_eq!(outer.line(), Some(7));
    }

    #[test]
    fn test_display_messages() {
        let err = FieldError::inclusion("TerminalState", "");
        assert_eq!(err.to_string(), "TerminalState \"\": field inclusion");

        let err = BatchError::new(2, "TransactionCode", "27 not allowed");
        assert_eq!(err.to_string(), "batch #2 TransactionCode: 27 not allowed");
    }
}
