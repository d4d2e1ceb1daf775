//! File Control record (type `9`).
//!
//! Aggregates over all batch controls of a file. Like [`BatchControl`],
//! values come either from the file engine or verbatim from decoded text.
//!
//! [`BatchControl`]: super::BatchControl

use super::{open, Record, RECORD_TYPE};
use crate::error::Result;
use crate::field::{check_numeric, Field, FieldWriter};

pub(crate) const BATCH_COUNT: Field = Field::numeric("BatchCount", 6);
pub(crate) const BLOCK_COUNT: Field = Field::numeric("BlockCount", 6);
pub(crate) const ENTRY_ADDENDA_COUNT: Field = Field::numeric("EntryAddendaCount", 8);
pub(crate) const ENTRY_HASH: Field = Field::numeric("EntryHash", 10);
pub(crate) const TOTAL_DEBIT: Field = Field::numeric("TotalDebitEntryDollarAmountInFile", 12);
pub(crate) const TOTAL_CREDIT: Field = Field::numeric("TotalCreditEntryDollarAmountInFile", 12);
const RESERVED: Field = Field::alpha("Reserved", 39);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileControl {
    pub(crate) batch_count: u32,
    pub(crate) block_count: u32,
    pub(crate) entry_addenda_count: u32,
    pub(crate) entry_hash: u64,
    pub(crate) total_debit: u64,
    pub(crate) total_credit: u64,
    pub(crate) reserved: String,
}

impl FileControl {
    pub fn batch_count(&self) -> u32 {
        self.batch_count
    }

    pub fn block_count(&self) -> u32 {
        self.block_count
    }

    pub fn entry_addenda_count(&self) -> u32 {
        self.entry_addenda_count
    }

    pub fn entry_hash(&self) -> u64 {
        self.entry_hash
    }

    pub fn total_debit(&self) -> u64 {
        self.total_debit
    }

    pub fn total_credit(&self) -> u64 {
        self.total_credit
    }

    pub fn reserved(&self) -> &str {
        &self.reserved
    }
}

impl Record for FileControl {
    const RECORD_TYPE: &'static str = "9";

    const LAYOUT: &'static [Field] = &[
        RECORD_TYPE,
        BATCH_COUNT,
        BLOCK_COUNT,
        ENTRY_ADDENDA_COUNT,
        ENTRY_HASH,
        TOTAL_DEBIT,
        TOTAL_CREDIT,
        RESERVED,
    ];

    fn parse(line: &str) -> Result<Self> {
        let mut r = open(line, Self::RECORD_TYPE)?;
        Ok(FileControl {
            batch_count: r.numeric_as(&BATCH_COUNT)?,
            block_count: r.numeric_as(&BLOCK_COUNT)?,
            entry_addenda_count: r.numeric_as(&ENTRY_ADDENDA_COUNT)?,
            entry_hash: r.numeric(&ENTRY_HASH)?,
            total_debit: r.numeric(&TOTAL_DEBIT)?,
            total_credit: r.numeric(&TOTAL_CREDIT)?,
            reserved: r.alpha(&RESERVED)?,
        })
    }

    fn render(&self) -> Result<String> {
        let mut w = FieldWriter::new();
        w.alpha(&RECORD_TYPE, Self::RECORD_TYPE)?
            .numeric(&BATCH_COUNT, u64::from(self.batch_count))?
            .numeric(&BLOCK_COUNT, u64::from(self.block_count))?
            .numeric(&ENTRY_ADDENDA_COUNT, u64::from(self.entry_addenda_count))?
            .numeric(&ENTRY_HASH, self.entry_hash)?
            .numeric(&TOTAL_DEBIT, self.total_debit)?
            .numeric(&TOTAL_CREDIT, self.total_credit)?
            .alpha(&RESERVED, &self.reserved)?;
        Ok(w.finish()?)
    }

    fn validate(&self) -> Result<()> {
        check_numeric(&BATCH_COUNT, u64::from(self.batch_count))?;
        check_numeric(&BLOCK_COUNT, u64::from(self.block_count))?;
        check_numeric(&ENTRY_ADDENDA_COUNT, u64::from(self.entry_addenda_count))?;
        check_numeric(&ENTRY_HASH, self.entry_hash)?;
        check_numeric(&TOTAL_DEBIT, self.total_debit)?;
        check_numeric(&TOTAL_CREDIT, self.total_credit)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrorKind;

    const LINE: &str = "9000001000001000000010005320001000000010500000000000000                                       ";

    #[test]
    fn test_parse_file_control() {
        let record = FileControl::parse(LINE).unwrap();
        assert_eq!(record.batch_count(), 1);
        assert_eq!(record.block_count(), 1);
        assert_eq!(record.entry_addenda_count(), 1);
        assert_eq!(record.entry_hash(), 5320001);
        assert_eq!(record.total_debit(), 10500);
        assert_eq!(record.total_credit(), 0);
        assert_eq!(record.reserved(), "");
    }

    #[test]
    fn test_file_control_string() {
        let record = FileControl::parse(LINE).unwrap();
        let rendered = record.render().unwrap();
        assert_eq!(rendered, LINE);
        assert_eq!(&rendered[1..7], "000001");
        assert_eq!(&rendered[7..13], "000001");
        assert_eq!(&rendered[13..21], "00000001");
        assert_eq!(&rendered[21..31], "0005320001");
        assert_eq!(&rendered[31..43], "000000010500");
        assert_eq!(&rendered[43..55], "000000000000");
    }

    #[test]
    fn test_parse_rejects_wrong_record_type() {
        let line = format!("8{}", &LINE[1..]);
        let err = FileControl::parse(&line).unwrap_err();
        assert_eq!(err.field_name(), Some("RecordType"));
        assert_eq!(
            err.as_field_error().map(|e| e.kind),
            Some(FieldErrorKind::RecordType)
        );
    }

    #[test]
    fn test_parse_rejects_short_line() {
        let err = FileControl::parse(LINE.trim_end()).unwrap_err();
        assert_eq!(err.as_field_error().map(|e| e.kind), Some(FieldErrorKind::Length));
    }
}
