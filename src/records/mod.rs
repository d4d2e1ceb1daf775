//! Typed NACHA records.
//!
//! Every record declares its fixed layout as an ordered list of [`Field`]s
//! covering the whole line, and parses and renders itself through the field
//! codec in that order.

mod addenda;
mod batch_control;
mod batch_header;
mod entry_detail;
mod file_control;
mod file_header;

pub use addenda::{Addenda, Addenda02, Addenda05, Addenda99, AddendaType};
pub use batch_control::BatchControl;
pub use batch_header::BatchHeader;
pub use entry_detail::EntryDetail;
pub use file_control::FileControl;
pub use file_header::FileHeader;

use crate::error::{FieldError, FieldErrorKind, Result};
use crate::field::{Field, FieldReader};
use chrono::{NaiveDate, NaiveTime};

pub(crate) const RECORD_TYPE: Field = Field::alpha("RecordType", 1);

/// Common behaviour of all fixed-width records.
pub trait Record: Sized {
    /// First character of every line of this record type.
    const RECORD_TYPE: &'static str;

    /// Ordered fields making up exactly one line.
    const LAYOUT: &'static [Field];

    /// Decodes one line, checking length, discriminators and mandatory fields.
    fn parse(line: &str) -> Result<Self>;

    /// Encodes the record back into one line.
    fn render(&self) -> Result<String>;

    /// Checks per-field domain rules that need no other record.
    fn validate(&self) -> Result<()>;
}

/// Opens a reader on `line` and consumes the record type discriminator.
pub(crate) fn open<'a>(line: &'a str, record_type: &str) -> std::result::Result<FieldReader<'a>, FieldError> {
    let mut reader = FieldReader::new(line)?;
    reader.literal(&RECORD_TYPE, record_type, FieldErrorKind::RecordType)?;
    Ok(reader)
}

/// Checks a `YYMMDD` date.
pub(crate) fn check_date(field: &Field, value: &str) -> std::result::Result<(), FieldError> {
    if value.len() == 6 && NaiveDate::parse_from_str(value, "%y%m%d").is_ok() {
        Ok(())
    } else {
        Err(FieldError::new(field.name, value, FieldErrorKind::Date))
    }
}

/// Checks an `MMDD` date; any day valid in a leap year is accepted.
pub(crate) fn check_month_day(field: &Field, value: &str) -> std::result::Result<(), FieldError> {
    let leap_year = format!("2000{}", value);
    if value.len() == 4 && NaiveDate::parse_from_str(&leap_year, "%Y%m%d").is_ok() {
        Ok(())
    } else {
        Err(FieldError::new(field.name, value, FieldErrorKind::Date))
    }
}

/// Checks an `HHMM` time of day.
pub(crate) fn check_time(field: &Field, value: &str) -> std::result::Result<(), FieldError> {
    if value.len() == 4 && NaiveTime::parse_from_str(value, "%H%M").is_ok() {
        Ok(())
    } else {
        Err(FieldError::new(field.name, value, FieldErrorKind::Time))
    }
}
