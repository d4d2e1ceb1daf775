//! File Header record (type `1`).

use super::{check_date, check_time, open, Record, RECORD_TYPE};
use crate::error::{FieldError, FieldErrorKind, Result};
use crate::field::{check_alphanumeric, require, Field, FieldWriter};
use chrono::NaiveDateTime;

const PRIORITY_CODE: Field = Field::numeric("PriorityCode", 2);
const IMMEDIATE_DESTINATION: Field = Field::alpha("ImmediateDestination", 10);
const IMMEDIATE_ORIGIN: Field = Field::alpha("ImmediateOrigin", 10);
const FILE_CREATION_DATE: Field = Field::alpha("FileCreationDate", 6);
const FILE_CREATION_TIME: Field = Field::alpha("FileCreationTime", 4);
const FILE_ID_MODIFIER: Field = Field::alpha("FileIDModifier", 1);
const RECORD_SIZE: Field = Field::numeric("RecordSize", 3);
const BLOCKING_FACTOR: Field = Field::numeric("BlockingFactor", 2);
const FORMAT_CODE: Field = Field::numeric("FormatCode", 1);
const IMMEDIATE_DESTINATION_NAME: Field = Field::alpha("ImmediateDestinationName", 23);
const IMMEDIATE_ORIGIN_NAME: Field = Field::alpha("ImmediateOriginName", 23);
const REFERENCE_CODE: Field = Field::alpha("ReferenceCode", 8);

/// Identifies the sending and receiving points of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub priority_code: u8,
    /// Routing number of the receiving point, conventionally `" "` + 9 digits.
    pub immediate_destination: String,
    /// Routing number or company identifier of the sending point.
    pub immediate_origin: String,
    /// `YYMMDD`
    pub file_creation_date: String,
    /// `HHMM`, may be blank.
    pub file_creation_time: String,
    /// Distinguishes files created on the same date (`A`-`Z`, `0`-`9`).
    pub file_id_modifier: String,
    pub immediate_destination_name: String,
    pub immediate_origin_name: String,
    pub reference_code: String,
}

impl FileHeader {
    pub const RECORD_SIZE: u64 = 94;
    pub const BLOCKING_FACTOR: u64 = 10;
    pub const FORMAT_CODE: u64 = 1;

    /// Creates a header with fixed fields set and everything else blank.
    pub fn new() -> Self {
        FileHeader {
            priority_code: 1,
            immediate_destination: String::new(),
            immediate_origin: String::new(),
            file_creation_date: String::new(),
            file_creation_time: String::new(),
            file_id_modifier: "A".to_string(),
            immediate_destination_name: String::new(),
            immediate_origin_name: String::new(),
            reference_code: String::new(),
        }
    }

    /// Sets the destination from a 9-digit routing number, adding the leading blank.
    pub fn set_immediate_destination(&mut self, routing: &str) {
        self.immediate_destination = pad_routing(routing);
    }

    /// Sets the origin from a 9-digit routing number, adding the leading blank.
    pub fn set_immediate_origin(&mut self, routing: &str) {
        self.immediate_origin = pad_routing(routing);
    }

    pub fn set_file_creation(&mut self, created: NaiveDateTime) {
        self.file_creation_date = created.format("%y%m%d").to_string();
        self.file_creation_time = created.format("%H%M").to_string();
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

fn pad_routing(routing: &str) -> String {
    let routing = routing.trim();
    if routing.len() == 9 {
        format!(" {}", routing)
    } else {
        routing.to_string()
    }
}

fn check_routing(field: &Field, value: &str) -> std::result::Result<(), FieldError> {
    require(field, value)?;
    let trimmed = value.trim_start();
    if trimmed.bytes().all(|b| b.is_ascii_digit()) && (9..=10).contains(&trimmed.len()) {
        Ok(())
    } else {
        Err(FieldError::new(field.name, value, FieldErrorKind::Numeric))
    }
}

impl Record for FileHeader {
    const RECORD_TYPE: &'static str = "1";

    const LAYOUT: &'static [Field] = &[
        RECORD_TYPE,
        PRIORITY_CODE,
        IMMEDIATE_DESTINATION,
        IMMEDIATE_ORIGIN,
        FILE_CREATION_DATE,
        FILE_CREATION_TIME,
        FILE_ID_MODIFIER,
        RECORD_SIZE,
        BLOCKING_FACTOR,
        FORMAT_CODE,
        IMMEDIATE_DESTINATION_NAME,
        IMMEDIATE_ORIGIN_NAME,
        REFERENCE_CODE,
    ];

    fn parse(line: &str) -> Result<Self> {
        let mut r = open(line, Self::RECORD_TYPE)?;
        let priority_code = r.numeric_as(&PRIORITY_CODE)?;
        let immediate_destination = r.alpha(&IMMEDIATE_DESTINATION)?;
        let immediate_origin = r.alpha(&IMMEDIATE_ORIGIN)?;
        let file_creation_date = r.alpha(&FILE_CREATION_DATE)?;
        let file_creation_time = r.alpha(&FILE_CREATION_TIME)?;
        let file_id_modifier = r.alpha(&FILE_ID_MODIFIER)?;
        r.literal(&RECORD_SIZE, "094", FieldErrorKind::InvalidValue)?;
        r.literal(&BLOCKING_FACTOR, "10", FieldErrorKind::InvalidValue)?;
        r.literal(&FORMAT_CODE, "1", FieldErrorKind::InvalidValue)?;
        let header = FileHeader {
            priority_code,
            immediate_destination,
            immediate_origin,
            file_creation_date,
            file_creation_time,
            file_id_modifier,
            immediate_destination_name: r.alpha(&IMMEDIATE_DESTINATION_NAME)?,
            immediate_origin_name: r.alpha(&IMMEDIATE_ORIGIN_NAME)?,
            reference_code: r.alpha(&REFERENCE_CODE)?,
        };
        require(&IMMEDIATE_DESTINATION, &header.immediate_destination)?;
        require(&IMMEDIATE_ORIGIN, &header.immediate_origin)?;
        require(&FILE_CREATION_DATE, &header.file_creation_date)?;
        Ok(header)
    }

    fn render(&self) -> Result<String> {
        let mut w = FieldWriter::new();
        w.alpha(&RECORD_TYPE, Self::RECORD_TYPE)?
            .numeric(&PRIORITY_CODE, u64::from(self.priority_code))?
            .alpha(&IMMEDIATE_DESTINATION, &self.immediate_destination)?
            .alpha(&IMMEDIATE_ORIGIN, &self.immediate_origin)?
            .alpha(&FILE_CREATION_DATE, &self.file_creation_date)?
            .alpha(&FILE_CREATION_TIME, &self.file_creation_time)?
            .alpha(&FILE_ID_MODIFIER, &self.file_id_modifier)?
            .numeric(&RECORD_SIZE, Self::RECORD_SIZE)?
            .numeric(&BLOCKING_FACTOR, Self::BLOCKING_FACTOR)?
            .numeric(&FORMAT_CODE, Self::FORMAT_CODE)?
            .alpha(&IMMEDIATE_DESTINATION_NAME, &self.immediate_destination_name)?
            .alpha(&IMMEDIATE_ORIGIN_NAME, &self.immediate_origin_name)?
            .alpha(&REFERENCE_CODE, &self.reference_code)?;
        Ok(w.finish()?)
    }

    fn validate(&self) -> Result<()> {
        if self.priority_code != 1 {
            return Err(FieldError::new(
                PRIORITY_CODE.name,
                self.priority_code,
                FieldErrorKind::InvalidValue,
            )
            .into());
        }
        check_routing(&IMMEDIATE_DESTINATION, &self.immediate_destination)?;
        require(&IMMEDIATE_ORIGIN, &self.immediate_origin)?;
        check_alphanumeric(&IMMEDIATE_ORIGIN, &self.immediate_origin)?;
        check_date(&FILE_CREATION_DATE, &self.file_creation_date)?;
        if !self.file_creation_time.trim().is_empty() {
            check_time(&FILE_CREATION_TIME, &self.file_creation_time)?;
        }
        require(&FILE_ID_MODIFIER, &self.file_id_modifier)?;
        let modifier_ok = self.file_id_modifier.len() == 1
            && self
                .file_id_modifier
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !modifier_ok {
            return Err(FieldError::new(
                FILE_ID_MODIFIER.name,
                &self.file_id_modifier,
                FieldErrorKind::InvalidValue,
            )
            .into());
        }
        check_alphanumeric(&IMMEDIATE_DESTINATION_NAME, &self.immediate_destination_name)?;
        check_alphanumeric(&IMMEDIATE_ORIGIN_NAME, &self.immediate_origin_name)?;
        check_alphanumeric(&REFERENCE_CODE, &self.reference_code)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const LINE: &str = "101 031300012 2313801041908161055A094101Federal Reserve Bank   My Bank Name           12345678";

    fn mock_file_header() -> FileHeader {
        let mut header = FileHeader::new();
        header.set_immediate_destination("031300012");
        header.set_immediate_origin("231380104");
        let created = NaiveDate::from_ymd_opt(2019, 8, 16)
            .and_then(|d| d.and_hms_opt(10, 55, 0))
            .unwrap();
        header.set_file_creation(created);
        header.immediate_destination_name = "Federal Reserve Bank".to_string();
        header.immediate_origin_name = "My Bank Name".to_string();
        header.reference_code = "12345678".to_string();
        header
    }

    #[test]
    fn test_mock_file_header_validates() {
        mock_file_header().validate().unwrap();
    }

    #[test]
    fn test_parse_known_line() {
        let header = FileHeader::parse(LINE).unwrap();
        assert_eq!(header.priority_code, 1);
        assert_eq!(header.immediate_destination, " 031300012");
        assert_eq!(header.immediate_origin, " 231380104");
        assert_eq!(header.file_creation_date, "190816");
        assert_eq!(header.file_creation_time, "1055");
        assert_eq!(header.file_id_modifier, "A");
        assert_eq!(header.immediate_destination_name, "Federal Reserve Bank");
        assert_eq!(header.render().unwrap(), LINE);
    }

    #[test]
    fn test_builder_matches_known_line() {
        assert_eq!(mock_file_header().render().unwrap(), LINE);
    }

    #[test]
    fn test_parse_rejects_wrong_record_size() {
        let line = LINE.replacen("094101", "095101", 1);
        let err = FileHeader::parse(&line).unwrap_err();
        assert_eq!(err.field_name(), Some("RecordSize"));
    }

    #[test]
    fn test_parse_rejects_wrong_record_type() {
        let line = format!("5{}", &LINE[1..]);
        let err = FileHeader::parse(&line).unwrap_err();
        assert_eq!(
            err.as_field_error().map(|e| e.kind),
            Some(FieldErrorKind::RecordType)
        );
    }

    #[test]
    fn test_validate_file_id_modifier() {
        let mut header = mock_file_header();
        header.file_id_modifier = "a".to_string();
        assert_eq!(header.validate().unwrap_err().field_name(), Some("FileIDModifier"));

        header.file_id_modifier = String::new();
        let err = header.validate().unwrap_err();
        assert_eq!(err.as_field_error().map(|e| e.kind), Some(FieldErrorKind::Inclusion));
    }

    #[test]
    fn test_validate_destination() {
        let mut header = mock_file_header();
        header.immediate_destination = " 0313A0012".to_string();
        assert_eq!(
            header.validate().unwrap_err().field_name(),
            Some("ImmediateDestination")
        );
    }

    #[test]
    fn test_validate_creation_date() {
        let mut header = mock_file_header();
        header.file_creation_date = "191332".to_string();
        assert_eq!(
            header.validate().unwrap_err().field_name(),
            Some("FileCreationDate")
        );
    }
}
