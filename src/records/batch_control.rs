//! Batch Control record (type `8`).
//!
//! Every total here is derived from the batch's entries. Values are only
//! written by the batch engine or copied verbatim from decoded text.

use super::{open, Record, RECORD_TYPE};
use crate::error::{FieldError, Result};
use crate::field::{check_alphanumeric, check_numeric, Field, FieldWriter};

const SERVICE_CLASS_CODE: Field = Field::numeric("ServiceClassCode", 3);
pub(crate) const ENTRY_ADDENDA_COUNT: Field = Field::numeric("EntryAddendaCount", 6);
pub(crate) const ENTRY_HASH: Field = Field::numeric("EntryHash", 10);
pub(crate) const TOTAL_DEBIT: Field = Field::numeric("TotalDebitEntryDollarAmount", 12);
pub(crate) const TOTAL_CREDIT: Field = Field::numeric("TotalCreditEntryDollarAmount", 12);
const COMPANY_IDENTIFICATION: Field = Field::alpha("CompanyIdentification", 10);
const MESSAGE_AUTHENTICATION_CODE: Field = Field::alpha("MessageAuthenticationCode", 19);
const RESERVED: Field = Field::alpha("Reserved", 6);
const ODFI_IDENTIFICATION: Field = Field::numeric("ODFIIdentification", 8);
const BATCH_NUMBER: Field = Field::numeric("BatchNumber", 7);

/// Summary of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchControl {
    pub(crate) service_class_code: u16,
    pub(crate) entry_addenda_count: u32,
    pub(crate) entry_hash: u64,
    pub(crate) total_debit: u64,
    pub(crate) total_credit: u64,
    pub(crate) company_identification: String,
    pub(crate) message_authentication_code: String,
    pub(crate) reserved: String,
    pub(crate) odfi_identification: u32,
    pub(crate) batch_number: u32,
}

impl BatchControl {
    pub fn service_class_code(&self) -> u16 {
        self.service_class_code
    }

    /// Entries plus addenda in the batch.
    pub fn entry_addenda_count(&self) -> u32 {
        self.entry_addenda_count
    }

    /// Low-order 10 digits of the summed RDFI identifiers.
    pub fn entry_hash(&self) -> u64 {
        self.entry_hash
    }

    pub fn total_debit(&self) -> u64 {
        self.total_debit
    }

    pub fn total_credit(&self) -> u64 {
        self.total_credit
    }

    pub fn company_identification(&self) -> &str {
        &self.company_identification
    }

    pub fn message_authentication_code(&self) -> &str {
        &self.message_authentication_code
    }

    pub fn odfi_identification(&self) -> u32 {
        self.odfi_identification
    }

    pub fn batch_number(&self) -> u32 {
        self.batch_number
    }
}

impl Record for BatchControl {
    const RECORD_TYPE: &'static str = "8";

    const LAYOUT: &'static [Field] = &[
        RECORD_TYPE,
        SERVICE_CLASS_CODE,
        ENTRY_ADDENDA_COUNT,
        ENTRY_HASH,
        TOTAL_DEBIT,
        TOTAL_CREDIT,
        COMPANY_IDENTIFICATION,
        MESSAGE_AUTHENTICATION_CODE,
        RESERVED,
        ODFI_IDENTIFICATION,
        BATCH_NUMBER,
    ];

    fn parse(line: &str) -> Result<Self> {
        let mut r = open(line, Self::RECORD_TYPE)?;
        let control = BatchControl {
            service_class_code: r.numeric_as(&SERVICE_CLASS_CODE)?,
            entry_addenda_count: r.numeric_as(&ENTRY_ADDENDA_COUNT)?,
            entry_hash: r.numeric(&ENTRY_HASH)?,
            total_debit: r.numeric(&TOTAL_DEBIT)?,
            total_credit: r.numeric(&TOTAL_CREDIT)?,
            company_identification: r.alpha(&COMPANY_IDENTIFICATION)?,
            message_authentication_code: r.alpha(&MESSAGE_AUTHENTICATION_CODE)?,
            reserved: r.alpha(&RESERVED)?,
            odfi_identification: r.numeric_as(&ODFI_IDENTIFICATION)?,
            batch_number: r.numeric_as(&BATCH_NUMBER)?,
        };
        if control.service_class_code == 0 {
            return Err(FieldError::inclusion(SERVICE_CLASS_CODE.name, 0).into());
        }
        Ok(control)
    }

    fn render(&self) -> Result<String> {
        let mut w = FieldWriter::new();
        w.alpha(&RECORD_TYPE, Self::RECORD_TYPE)?
            .numeric(&SERVICE_CLASS_CODE, u64::from(self.service_class_code))?
            .numeric(&ENTRY_ADDENDA_COUNT, u64::from(self.entry_addenda_count))?
            .numeric(&ENTRY_HASH, self.entry_hash)?
            .numeric(&TOTAL_DEBIT, self.total_debit)?
            .numeric(&TOTAL_CREDIT, self.total_credit)?
            .alpha(&COMPANY_IDENTIFICATION, &self.company_identification)?
            .alpha(&MESSAGE_AUTHENTICATION_CODE, &self.message_authentication_code)?
            .alpha(&RESERVED, &self.reserved)?
            .numeric(&ODFI_IDENTIFICATION, u64::from(self.odfi_identification))?
            .numeric(&BATCH_NUMBER, u64::from(self.batch_number))?;
        Ok(w.finish()?)
    }

    fn validate(&self) -> Result<()> {
        if self.service_class_code == 0 {
            return Err(FieldError::inclusion(SERVICE_CLASS_CODE.name, 0).into());
        }
        check_numeric(&ENTRY_ADDENDA_COUNT, u64::from(self.entry_addenda_count))?;
        check_numeric(&ENTRY_HASH, self.entry_hash)?;
        check_numeric(&TOTAL_DEBIT, self.total_debit)?;
        check_numeric(&TOTAL_CREDIT, self.total_credit)?;
        check_alphanumeric(&COMPANY_IDENTIFICATION, &self.company_identification)?;
        check_alphanumeric(&MESSAGE_AUTHENTICATION_CODE, &self.message_authentication_code)?;
        check_numeric(&ODFI_IDENTIFICATION, u64::from(self.odfi_identification))?;
        check_numeric(&BATCH_NUMBER, u64::from(self.batch_number))?;
        Ok(())
    }
}
