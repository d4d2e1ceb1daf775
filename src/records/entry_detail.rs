//! Entry Detail record (type `6`).

use super::{open, Addenda, Addenda02, Addenda05, Addenda99, Record, RECORD_TYPE};
use crate::codes::{routing_check_digit, TransactionCode};
use crate::error::{FieldError, FieldErrorKind, Result};
use crate::field::{check_alphanumeric, check_numeric, require, Field, FieldWriter};

const TRANSACTION_CODE: Field = Field::numeric("TransactionCode", 2);
const RDFI_IDENTIFICATION: Field = Field::numeric("RDFIIdentification", 8);
const CHECK_DIGIT: Field = Field::numeric("CheckDigit", 1);
const DFI_ACCOUNT_NUMBER: Field = Field::alpha("DFIAccountNumber", 17);
const AMOUNT: Field = Field::numeric("Amount", 10);
const IDENTIFICATION_NUMBER: Field = Field::alpha("IdentificationNumber", 15);
const INDIVIDUAL_NAME: Field = Field::alpha("IndividualName", 22);
const DISCRETIONARY_DATA: Field = Field::alpha("DiscretionaryData", 2);
const ADDENDA_RECORD_INDICATOR: Field = Field::numeric("AddendaRecordIndicator", 1);
const TRACE_NUMBER: Field = Field::numeric("TraceNumber", 15);

/// Width of the sequence part of a trace number.
const TRACE_SEQUENCE_MODULUS: u64 = 10_000_000;

/// One payment instruction and the addenda it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetail {
    pub transaction_code: u8,
    /// First 8 digits of the receiving bank's routing number.
    pub rdfi_identification: u32,
    pub check_digit: u8,
    pub dfi_account_number: String,
    /// Minor currency units.
    pub amount: u64,
    pub identification_number: String,
    /// Receiver name, or receiving company name for corporate classes.
    pub individual_name: String,
    pub discretionary_data: String,
    pub addenda_record_indicator: u8,
    /// ODFI routing prefix followed by a 7-digit sequence number.
    pub trace_number: u64,
    /// Addenda records in file order.
    pub addenda: Vec<Addenda>,
}

impl EntryDetail {
    pub fn new(transaction_code: u8) -> Self {
        EntryDetail {
            transaction_code,
            rdfi_identification: 0,
            check_digit: 0,
            dfi_account_number: String::new(),
            amount: 0,
            identification_number: String::new(),
            individual_name: String::new(),
            discretionary_data: String::new(),
            addenda_record_indicator: 0,
            trace_number: 0,
            addenda: Vec::new(),
        }
    }

    /// Sets the RDFI from an 8- or 9-digit routing number.
    ///
    /// With 8 digits the check digit is computed; with 9 the last digit is
    /// taken as given and checked later by [`Record::validate`].
    pub fn set_rdfi(&mut self, routing: &str) -> std::result::Result<(), FieldError> {
        let routing = routing.trim();
        let valid = matches!(routing.len(), 8 | 9) && routing.bytes().all(|b| b.is_ascii_digit());
        if !valid {
            return Err(FieldError::new(
                RDFI_IDENTIFICATION.name,
                routing,
                FieldErrorKind::Numeric,
            ));
        }
        let (prefix, digit) = routing.split_at(8);
        self.rdfi_identification = prefix
            .parse()
            .map_err(|_| FieldError::new(RDFI_IDENTIFICATION.name, routing, FieldErrorKind::Numeric))?;
        self.check_digit = match digit.bytes().next() {
            Some(b) => b - b'0',
            None => routing_check_digit(self.rdfi_identification),
        };
        Ok(())
    }

    /// Builds the trace number from the ODFI routing prefix and a sequence.
    ///
    /// Addenda already attached follow the new trace number.
    pub fn set_trace_number(&mut self, odfi_identification: u32, sequence: u32) {
        self.trace_number = u64::from(odfi_identification) * TRACE_SEQUENCE_MODULUS
            + u64::from(sequence) % TRACE_SEQUENCE_MODULUS;
        let (trace, entry_sequence) = (self.trace_number, self.trace_sequence());
        for addenda in &mut self.addenda {
            match addenda {
                Addenda::Addenda02(a) => a.trace_number = trace,
                Addenda::Addenda05(a) => a.entry_detail_sequence_number = entry_sequence,
                Addenda::Addenda99(a) => a.trace_number = trace,
            }
        }
    }

    /// The receiving company name shares the individual name slot.
    pub fn set_receiving_company(&mut self, name: &str) {
        self.individual_name = name.to_string();
    }

    /// ODFI routing prefix of the trace number.
    pub fn trace_odfi(&self) -> u64 {
        self.trace_number / TRACE_SEQUENCE_MODULUS
    }

    /// Sequence part of the trace number.
    pub fn trace_sequence(&self) -> u32 {
        (self.trace_number % TRACE_SEQUENCE_MODULUS) as u32
    }

    pub fn transaction(&self) -> std::result::Result<TransactionCode, FieldError> {
        TransactionCode::parse(self.transaction_code)
    }

    /// Appends an Addenda02 carrying this entry's trace number.
    pub fn add_addenda02(&mut self, mut addenda: Addenda02) {
        addenda.trace_number = self.trace_number;
        self.push_addenda(Addenda::Addenda02(addenda));
    }

    /// Appends an Addenda05, numbering it after the ones already present.
    pub fn add_addenda05(&mut self, mut addenda: Addenda05) {
        let count = self
            .addenda
            .iter()
            .filter(|a| matches!(a, Addenda::Addenda05(_)))
            .count();
        addenda.sequence_number = (count + 1) as u16;
        addenda.entry_detail_sequence_number = self.trace_sequence();
        self.push_addenda(Addenda::Addenda05(addenda));
    }

    pub fn add_addenda99(&mut self, mut addenda: Addenda99) {
        addenda.trace_number = self.trace_number;
        self.push_addenda(Addenda::Addenda99(addenda));
    }

    fn push_addenda(&mut self, addenda: Addenda) {
        self.addenda.push(addenda);
        self.addenda_record_indicator = 1;
    }

    /// Lines this entry occupies, itself included.
    pub fn line_count(&self) -> usize {
        1 + self.addenda.len()
    }
}

impl Record for EntryDetail {
    const RECORD_TYPE: &'static str = "6";

    const LAYOUT: &'static [Field] = &[
        RECORD_TYPE,
        TRANSACTION_CODE,
        RDFI_IDENTIFICATION,
        CHECK_DIGIT,
        DFI_ACCOUNT_NUMBER,
        AMOUNT,
        IDENTIFICATION_NUMBER,
        INDIVIDUAL_NAME,
        DISCRETIONARY_DATA,
        ADDENDA_RECORD_INDICATOR,
        TRACE_NUMBER,
    ];

    fn parse(line: &str) -> Result<Self> {
        let mut r = open(line, Self::RECORD_TYPE)?;
        let entry = EntryDetail {
            transaction_code: r.numeric_as(&TRANSACTION_CODE)?,
            rdfi_identification: r.numeric_as(&RDFI_IDENTIFICATION)?,
            check_digit: r.numeric_as(&CHECK_DIGIT)?,
            dfi_account_number: r.alpha(&DFI_ACCOUNT_NUMBER)?,
            amount: r.numeric(&AMOUNT)?,
            identification_number: r.alpha(&IDENTIFICATION_NUMBER)?,
            individual_name: r.alpha(&INDIVIDUAL_NAME)?,
            discretionary_data: r.alpha(&DISCRETIONARY_DATA)?,
            addenda_record_indicator: r.numeric_as(&ADDENDA_RECORD_INDICATOR)?,
            trace_number: r.numeric(&TRACE_NUMBER)?,
            addenda: Vec::new(),
        };
        entry.check_inclusion()?;
        Ok(entry)
    }

    fn render(&self) -> Result<String> {
        let mut w = FieldWriter::new();
        w.alpha(&RECORD_TYPE, Self::RECORD_TYPE)?
            .numeric(&TRANSACTION_CODE, u64::from(self.transaction_code))?
            .numeric(&RDFI_IDENTIFICATION, u64::from(self.rdfi_identification))?
            .numeric(&CHECK_DIGIT, u64::from(self.check_digit))?
            .alpha(&DFI_ACCOUNT_NUMBER, &self.dfi_account_number)?
            .numeric(&AMOUNT, self.amount)?
            .alpha(&IDENTIFICATION_NUMBER, &self.identification_number)?
            .alpha(&INDIVIDUAL_NAME, &self.individual_name)?
            .alpha(&DISCRETIONARY_DATA, &self.discretionary_data)?
            .numeric(&ADDENDA_RECORD_INDICATOR, u64::from(self.addenda_record_indicator))?
            .numeric(&TRACE_NUMBER, self.trace_number)?;
        Ok(w.finish()?)
    }

    fn validate(&self) -> Result<()> {
        self.check_inclusion()?;
        self.transaction()?;
        check_numeric(&RDFI_IDENTIFICATION, u64::from(self.rdfi_identification))?;
        if self.check_digit != routing_check_digit(self.rdfi_identification) {
            return Err(FieldError::new(
                CHECK_DIGIT.name,
                self.check_digit,
                FieldErrorKind::CheckDigit,
            )
            .into());
        }
        check_alphanumeric(&DFI_ACCOUNT_NUMBER, &self.dfi_account_number)?;
        check_numeric(&AMOUNT, self.amount)?;
        check_alphanumeric(&IDENTIFICATION_NUMBER, &self.identification_number)?;
        check_alphanumeric(&INDIVIDUAL_NAME, &self.individual_name)?;
        check_alphanumeric(&DISCRETIONARY_DATA, &self.discretionary_data)?;
        if self.addenda_record_indicator > 1 {
            return Err(FieldError::new(
                ADDENDA_RECORD_INDICATOR.name,
                self.addenda_record_indicator,
                FieldErrorKind::InvalidValue,
            )
            .into());
        }
        check_numeric(&TRACE_NUMBER, self.trace_number)?;
        Ok(())
    }
}

impl EntryDetail {
    fn check_inclusion(&self) -> std::result::Result<(), FieldError> {
        if self.transaction_code == 0 {
            return Err(FieldError::inclusion(TRANSACTION_CODE.name, self.transaction_code));
        }
        if self.rdfi_identification == 0 {
            return Err(FieldError::inclusion(
                RDFI_IDENTIFICATION.name,
                self.rdfi_identification,
            ));
        }
        require(&DFI_ACCOUNT_NUMBER, &self.dfi_account_number)?;
        if self.trace_number == 0 {
            return Err(FieldError::inclusion(TRACE_NUMBER.name, self.trace_number));
        }
        Ok(())
    }
}
