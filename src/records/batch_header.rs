//! Batch Header record (type `5`).

use super::{check_date, open, Record, RECORD_TYPE};
use crate::codes::ServiceClassCode;
use crate::error::{FieldError, FieldErrorKind, Result};
use crate::field::{check_alphanumeric, check_numeric, require, Field, FieldWriter};
use crate::sec::SecCode;
use chrono::NaiveDate;

const SERVICE_CLASS_CODE: Field = Field::numeric("ServiceClassCode", 3);
const COMPANY_NAME: Field = Field::alpha("CompanyName", 16);
const COMPANY_DISCRETIONARY_DATA: Field = Field::alpha("CompanyDiscretionaryData", 20);
const COMPANY_IDENTIFICATION: Field = Field::alpha("CompanyIdentification", 10);
const STANDARD_ENTRY_CLASS_CODE: Field = Field::alpha("StandardEntryClassCode", 3);
const COMPANY_ENTRY_DESCRIPTION: Field = Field::alpha("CompanyEntryDescription", 10);
const COMPANY_DESCRIPTIVE_DATE: Field = Field::alpha("CompanyDescriptiveDate", 6);
const EFFECTIVE_ENTRY_DATE: Field = Field::alpha("EffectiveEntryDate", 6);
const SETTLEMENT_DATE: Field = Field::alpha("SettlementDate", 3);
const ORIGINATOR_STATUS_CODE: Field = Field::numeric("OriginatorStatusCode", 1);
const ODFI_IDENTIFICATION: Field = Field::numeric("ODFIIdentification", 8);
const BATCH_NUMBER: Field = Field::numeric("BatchNumber", 7);

/// Describes the originator and the entries that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchHeader {
    /// Raw service class code; see [`BatchHeader::service_class`].
    pub service_class_code: u16,
    pub company_name: String,
    pub company_discretionary_data: String,
    pub company_identification: String,
    pub standard_entry_class_code: String,
    pub company_entry_description: String,
    pub company_descriptive_date: String,
    /// `YYMMDD`
    pub effective_entry_date: String,
    /// Julian day inserted by the ACH operator; blank on origination.
    pub settlement_date: String,
    pub originator_status_code: u8,
    pub odfi_identification: u32,
    pub batch_number: u32,
}

impl BatchHeader {
    pub fn new(service_class: ServiceClassCode, sec: SecCode) -> Self {
        BatchHeader {
            service_class_code: service_class.code(),
            company_name: String::new(),
            company_discretionary_data: String::new(),
            company_identification: String::new(),
            standard_entry_class_code: sec.as_str().to_string(),
            company_entry_description: String::new(),
            company_descriptive_date: String::new(),
            effective_entry_date: String::new(),
            settlement_date: String::new(),
            originator_status_code: 1,
            odfi_identification: 0,
            batch_number: 1,
        }
    }

    pub fn set_effective_entry_date(&mut self, date: NaiveDate) {
        self.effective_entry_date = date.format("%y%m%d").to_string();
    }

    pub fn service_class(&self) -> std::result::Result<ServiceClassCode, FieldError> {
        ServiceClassCode::parse(self.service_class_code)
    }

    pub fn sec_code(&self) -> std::result::Result<SecCode, FieldError> {
        self.standard_entry_class_code.parse()
    }
}

impl Record for BatchHeader {
    const RECORD_TYPE: &'static str = "5";

    const LAYOUT: &'static [Field] = &[
        RECORD_TYPE,
        SERVICE_CLASS_CODE,
        COMPANY_NAME,
        COMPANY_DISCRETIONARY_DATA,
        COMPANY_IDENTIFICATION,
        STANDARD_ENTRY_CLASS_CODE,
        COMPANY_ENTRY_DESCRIPTION,
        COMPANY_DESCRIPTIVE_DATE,
        EFFECTIVE_ENTRY_DATE,
        SETTLEMENT_DATE,
        ORIGINATOR_STATUS_CODE,
        ODFI_IDENTIFICATION,
        BATCH_NUMBER,
    ];

    fn parse(line: &str) -> Result<Self> {
        let mut r = open(line, Self::RECORD_TYPE)?;
        let header = BatchHeader {
            service_class_code: r.numeric_as(&SERVICE_CLASS_CODE)?,
            company_name: r.alpha(&COMPANY_NAME)?,
            company_discretionary_data: r.alpha(&COMPANY_DISCRETIONARY_DATA)?,
            company_identification: r.alpha(&COMPANY_IDENTIFICATION)?,
            standard_entry_class_code: r.alpha(&STANDARD_ENTRY_CLASS_CODE)?,
            company_entry_description: r.alpha(&COMPANY_ENTRY_DESCRIPTION)?,
            company_descriptive_date: r.alpha(&COMPANY_DESCRIPTIVE_DATE)?,
            effective_entry_date: r.alpha(&EFFECTIVE_ENTRY_DATE)?,
            settlement_date: r.alpha(&SETTLEMENT_DATE)?,
            originator_status_code: r.numeric_as(&ORIGINATOR_STATUS_CODE)?,
            odfi_identification: r.numeric_as(&ODFI_IDENTIFICATION)?,
            batch_number: r.numeric_as(&BATCH_NUMBER)?,
        };
        header.check_inclusion()?;
        Ok(header)
    }

    fn render(&self) -> Result<String> {
        let mut w = FieldWriter::new();
        w.alpha(&RECORD_TYPE, Self::RECORD_TYPE)?
            .numeric(&SERVICE_CLASS_CODE, u64::from(self.service_class_code))?
            .alpha(&COMPANY_NAME, &self.company_name)?
            .alpha(&COMPANY_DISCRETIONARY_DATA, &self.company_discretionary_data)?
            .alpha(&COMPANY_IDENTIFICATION, &self.company_identification)?
            .alpha(&STANDARD_ENTRY_CLASS_CODE, &self.standard_entry_class_code)?
            .alpha(&COMPANY_ENTRY_DESCRIPTION, &self.company_entry_description)?
            .alpha(&COMPANY_DESCRIPTIVE_DATE, &self.company_descriptive_date)?
            .alpha(&EFFECTIVE_ENTRY_DATE, &self.effective_entry_date)?
            .alpha(&SETTLEMENT_DATE, &self.settlement_date)?
            .numeric(&ORIGINATOR_STATUS_CODE, u64::from(self.originator_status_code))?
            .numeric(&ODFI_IDENTIFICATION, u64::from(self.odfi_identification))?
            .numeric(&BATCH_NUMBER, u64::from(self.batch_number))?;
        Ok(w.finish()?)
    }

    fn validate(&self) -> Result<()> {
        self.check_inclusion()?;
        self.service_class()?;
        self.sec_code()?;
        check_alphanumeric(&COMPANY_NAME, &self.company_name)?;
        check_alphanumeric(&COMPANY_DISCRETIONARY_DATA, &self.company_discretionary_data)?;
        check_alphanumeric(&COMPANY_IDENTIFICATION, &self.company_identification)?;
        check_alphanumeric(&COMPANY_ENTRY_DESCRIPTION, &self.company_entry_description)?;
        check_alphanumeric(&COMPANY_DESCRIPTIVE_DATE, &self.company_descriptive_date)?;
        check_alphanumeric(&SETTLEMENT_DATE, &self.settlement_date)?;
        check_date(&EFFECTIVE_ENTRY_DATE, &self.effective_entry_date)?;
        if self.originator_status_code > 2 {
            return Err(FieldError::new(
                ORIGINATOR_STATUS_CODE.name,
                self.originator_status_code,
                FieldErrorKind::InvalidValue,
            )
            .into());
        }
        check_numeric(&ODFI_IDENTIFICATION, u64::from(self.odfi_identification))?;
        check_numeric(&BATCH_NUMBER, u64::from(self.batch_number))?;
        Ok(())
    }
}

impl BatchHeader {
    fn check_inclusion(&self) -> std::result::Result<(), FieldError> {
        if self.service_class_code == 0 {
            return Err(FieldError::inclusion(
                SERVICE_CLASS_CODE.name,
                self.service_class_code,
            ));
        }
        require(&COMPANY_NAME, &self.company_name)?;
        require(&COMPANY_IDENTIFICATION, &self.company_identification)?;
        require(&STANDARD_ENTRY_CLASS_CODE, &self.standard_entry_class_code)?;
        require(&COMPANY_ENTRY_DESCRIPTION, &self.company_entry_description)?;
        if self.odfi_identification == 0 {
            return Err(FieldError::inclusion(
                ODFI_IDENTIFICATION.name,
                self.odfi_identification,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "5225Merchant with AT                    231380104 MTECASH WITHD      190816   1231380100000001";

    fn mock_batch_header() -> BatchHeader {
        let mut header = BatchHeader::new(ServiceClassCode::DebitsOnly, SecCode::Mte);
        header.company_name = "Merchant with ATM".to_string();
        header.company_identification = "231380104".to_string();
        header.company_entry_description = "CASH WITHDRAW".to_string();
        header.set_effective_entry_date(NaiveDate::from_ymd_opt(2019, 8, 16).unwrap());
        header.odfi_identification = 23138010;
        header
    }

    #[test]
    fn test_mock_batch_header_validates() {
        mock_batch_header().validate().unwrap();
    }

    #[test]
    fn test_render_truncates_long_text() {
        let line = mock_batch_header().render().unwrap();
        assert_eq!(line, LINE);
    }

    #[test]
    fn test_parse_round_trip() {
        let header = BatchHeader::parse(LINE).unwrap();
        assert_eq!(header.service_class().unwrap(), ServiceClassCode::DebitsOnly);
        assert_eq!(header.sec_code().unwrap(), SecCode::Mte);
        assert_eq!(header.company_name, "Merchant with AT");
        assert_eq!(header.odfi_identification, 23138010);
        assert_eq!(header.batch_number, 1);
        assert_eq!(header.render().unwrap(), LINE);
    }

    #[test]
    fn test_zero_service_class_is_inclusion_error() {
        let mut header = mock_batch_header();
        header.service_class_code = 0;
        let err = header.validate().unwrap_err();
        assert_eq!(err.field_name(), Some("ServiceClassCode"));
        assert_eq!(err.as_field_error().map(|e| e.kind), Some(FieldErrorKind::Inclusion));
    }

    #[test]
    fn test_unknown_service_class() {
        let mut header = mock_batch_header();
        header.service_class_code = 201;
        assert_eq!(
            header.validate().unwrap_err().field_name(),
            Some("ServiceClassCode")
        );
    }

    #[test]
    fn test_unknown_sec_code() {
        let mut header = mock_batch_header();
        header.standard_entry_class_code = "XYZ".to_string();
        assert_eq!(
            header.validate().unwrap_err().field_name(),
            Some("StandardEntryClassCode")
        );
    }

    #[test]
    fn test_company_name_required() {
        let mut header = mock_batch_header();
        header.company_name = "   ".to_string();
        let err = header.validate().unwrap_err();
        assert_eq!(err.field_name(), Some("CompanyName"));
    }

    #[test]
    fn test_effective_entry_date_format() {
        let mut header = mock_batch_header();
        header.effective_entry_date = "190230".to_string();
        assert_eq!(
            header.validate().unwrap_err().field_name(),
            Some("EffectiveEntryDate")
        );
    }

    #[test]
    fn test_originator_status_code_range() {
        let mut header = mock_batch_header();
        header.originator_status_code = 3;
        assert_eq!(
            header.validate().unwrap_err().field_name(),
            Some("OriginatorStatusCode")
        );
    }
}
