//! Addenda records (type `7`), one variant per addenda type code.

use super::{check_date, check_month_day, open, Record, RECORD_TYPE};
use crate::codes::is_us_state;
use crate::error::{FieldError, FieldErrorKind, Result};
use crate::field::{
    check_alphanumeric, check_numeric, require, Field, FieldReader, FieldWriter,
};

const TYPE_CODE: Field = Field::alpha("TypeCode", 2);
const TRACE_NUMBER: Field = Field::numeric("TraceNumber", 15);

/// Closed set of addenda type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddendaType {
    /// Point-of-sale terminal information.
    Addenda02,
    /// Payment related information.
    Addenda05,
    /// Return.
    Addenda99,
}

impl AddendaType {
    pub const fn code(self) -> &'static str {
        match self {
            AddendaType::Addenda02 => "02",
            AddendaType::Addenda05 => "05",
            AddendaType::Addenda99 => "99",
        }
    }

    /// Name used when reporting a violation for this variant.
    pub const fn name(self) -> &'static str {
        match self {
            AddendaType::Addenda02 => "Addenda02",
            AddendaType::Addenda05 => "Addenda05",
            AddendaType::Addenda99 => "Addenda99",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "02" => Some(AddendaType::Addenda02),
            "05" => Some(AddendaType::Addenda05),
            "99" => Some(AddendaType::Addenda99),
            _ => None,
        }
    }
}

/// An addenda record attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addenda {
    Addenda02(Addenda02),
    Addenda05(Addenda05),
    Addenda99(Addenda99),
}

impl Addenda {
    pub fn addenda_type(&self) -> AddendaType {
        match self {
            Addenda::Addenda02(_) => AddendaType::Addenda02,
            Addenda::Addenda05(_) => AddendaType::Addenda05,
            Addenda::Addenda99(_) => AddendaType::Addenda99,
        }
    }

    /// Copy of the owning entry's trace number, for variants that carry one.
    pub fn trace_number(&self) -> Option<u64> {
        match self {
            Addenda::Addenda02(a) => Some(a.trace_number),
            Addenda::Addenda05(_) => None,
            Addenda::Addenda99(a) => Some(a.trace_number),
        }
    }

    /// Decodes any addenda line, selecting the variant from its type code.
    pub fn parse(line: &str) -> Result<Self> {
        let mut r = open(line, "7")?;
        let code = r.alpha(&TYPE_CODE)?;
        match AddendaType::from_code(&code) {
            Some(AddendaType::Addenda02) => Ok(Addenda::Addenda02(Addenda02::parse(line)?)),
            Some(AddendaType::Addenda05) => Ok(Addenda::Addenda05(Addenda05::parse(line)?)),
            Some(AddendaType::Addenda99) => Ok(Addenda::Addenda99(Addenda99::parse(line)?)),
            None => Err(FieldError::new(TYPE_CODE.name, code, FieldErrorKind::TypeCode).into()),
        }
    }

    pub fn render(&self) -> Result<String> {
        match self {
            Addenda::Addenda02(a) => a.render(),
            Addenda::Addenda05(a) => a.render(),
            Addenda::Addenda99(a) => a.render(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Addenda::Addenda02(a) => a.validate(),
            Addenda::Addenda05(a) => a.validate(),
            Addenda::Addenda99(a) => a.validate(),
        }
    }
}

fn open_addenda<'a>(line: &'a str, kind: AddendaType) -> std::result::Result<FieldReader<'a>, FieldError> {
    let mut r = open(line, "7")?;
    r.literal(&TYPE_CODE, kind.code(), FieldErrorKind::TypeCode)?;
    Ok(r)
}

fn writer(kind: AddendaType) -> std::result::Result<FieldWriter, FieldError> {
    let mut w = FieldWriter::new();
    w.alpha(&RECORD_TYPE, "7")?.alpha(&TYPE_CODE, kind.code())?;
    Ok(w)
}

// Addenda02

const REFERENCE_INFORMATION_ONE: Field = Field::alpha("ReferenceInformationOne", 7);
const REFERENCE_INFORMATION_TWO: Field = Field::alpha("ReferenceInformationTwo", 3);
const TERMINAL_IDENTIFICATION_CODE: Field = Field::alpha("TerminalIdentificationCode", 6);
const TRANSACTION_SERIAL_NUMBER: Field = Field::alpha("TransactionSerialNumber", 6);
const TRANSACTION_DATE: Field = Field::alpha("TransactionDate", 4);
const AUTHORIZATION_CODE_OR_EXPIRE_DATE: Field =
    Field::alpha("AuthorizationCodeOrExpireDate", 6);
const TERMINAL_LOCATION: Field = Field::alpha("TerminalLocation", 27);
const TERMINAL_CITY: Field = Field::alpha("TerminalCity", 15);
const TERMINAL_STATE: Field = Field::alpha("TerminalState", 2);

/// Terminal information for MTE, POS and SHR entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Addenda02 {
    pub reference_information_one: String,
    pub reference_information_two: String,
    pub terminal_identification_code: String,
    pub transaction_serial_number: String,
    /// `MMDD`
    pub transaction_date: String,
    pub authorization_code_or_expire_date: String,
    pub terminal_location: String,
    pub terminal_city: String,
    pub terminal_state: String,
    pub trace_number: u64,
}

impl Addenda02 {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_inclusion(&self) -> std::result::Result<(), FieldError> {
        require(&TERMINAL_IDENTIFICATION_CODE, &self.terminal_identification_code)?;
        require(&TRANSACTION_SERIAL_NUMBER, &self.transaction_serial_number)?;
        require(&TRANSACTION_DATE, &self.transaction_date)?;
        require(&TERMINAL_LOCATION, &self.terminal_location)?;
        require(&TERMINAL_CITY, &self.terminal_city)?;
        require(&TERMINAL_STATE, &self.terminal_state)?;
        Ok(())
    }
}

impl Record for Addenda02 {
    const RECORD_TYPE: &'static str = "7";

    const LAYOUT: &'static [Field] = &[
        RECORD_TYPE,
        TYPE_CODE,
        REFERENCE_INFORMATION_ONE,
        REFERENCE_INFORMATION_TWO,
        TERMINAL_IDENTIFICATION_CODE,
        TRANSACTION_SERIAL_NUMBER,
        TRANSACTION_DATE,
        AUTHORIZATION_CODE_OR_EXPIRE_DATE,
        TERMINAL_LOCATION,
        TERMINAL_CITY,
        TERMINAL_STATE,
        TRACE_NUMBER,
    ];

    fn parse(line: &str) -> Result<Self> {
        let mut r = open_addenda(line, AddendaType::Addenda02)?;
        let addenda = Addenda02 {
            reference_information_one: r.alpha(&REFERENCE_INFORMATION_ONE)?,
            reference_information_two: r.alpha(&REFERENCE_INFORMATION_TWO)?,
            terminal_identification_code: r.alpha(&TERMINAL_IDENTIFICATION_CODE)?,
            transaction_serial_number: r.alpha(&TRANSACTION_SERIAL_NUMBER)?,
            transaction_date: r.alpha(&TRANSACTION_DATE)?,
            authorization_code_or_expire_date: r.alpha(&AUTHORIZATION_CODE_OR_EXPIRE_DATE)?,
            terminal_location: r.alpha(&TERMINAL_LOCATION)?,
            terminal_city: r.alpha(&TERMINAL_CITY)?,
            terminal_state: r.alpha(&TERMINAL_STATE)?,
            trace_number: r.numeric(&TRACE_NUMBER)?,
        };
        addenda.check_inclusion()?;
        Ok(addenda)
    }

    fn render(&self) -> Result<String> {
        let mut w = writer(AddendaType::Addenda02)?;
        w.alpha(&REFERENCE_INFORMATION_ONE, &self.reference_information_one)?
            .alpha(&REFERENCE_INFORMATION_TWO, &self.reference_information_two)?
            .alpha(&TERMINAL_IDENTIFICATION_CODE, &self.terminal_identification_code)?
            .alpha(&TRANSACTION_SERIAL_NUMBER, &self.transaction_serial_number)?
            .alpha(&TRANSACTION_DATE, &self.transaction_date)?
            .alpha(
                &AUTHORIZATION_CODE_OR_EXPIRE_DATE,
                &self.authorization_code_or_expire_date,
            )?
            .alpha(&TERMINAL_LOCATION, &self.terminal_location)?
            .alpha(&TERMINAL_CITY, &self.terminal_city)?
            .alpha(&TERMINAL_STATE, &self.terminal_state)?
            .numeric(&TRACE_NUMBER, self.trace_number)?;
        Ok(w.finish()?)
    }

    fn validate(&self) -> Result<()> {
        self.check_inclusion()?;
        check_alphanumeric(&REFERENCE_INFORMATION_ONE, &self.reference_information_one)?;
        check_alphanumeric(&REFERENCE_INFORMATION_TWO, &self.reference_information_two)?;
        check_alphanumeric(&TERMINAL_IDENTIFICATION_CODE, &self.terminal_identification_code)?;
        check_alphanumeric(&TRANSACTION_SERIAL_NUMBER, &self.transaction_serial_number)?;
        check_month_day(&TRANSACTION_DATE, &self.transaction_date)?;
        check_alphanumeric(
            &AUTHORIZATION_CODE_OR_EXPIRE_DATE,
            &self.authorization_code_or_expire_date,
        )?;
        check_alphanumeric(&TERMINAL_LOCATION, &self.terminal_location)?;
        check_alphanumeric(&TERMINAL_CITY, &self.terminal_city)?;
        if !is_us_state(&self.terminal_state) {
            return Err(FieldError::new(
                TERMINAL_STATE.name,
                &self.terminal_state,
                FieldErrorKind::State,
            )
            .into());
        }
        check_numeric(&TRACE_NUMBER, self.trace_number)?;
        Ok(())
    }
}

// Addenda05

const PAYMENT_RELATED_INFORMATION: Field = Field::alpha("PaymentRelatedInformation", 80);
const SEQUENCE_NUMBER: Field = Field::numeric("SequenceNumber", 4);
const ENTRY_DETAIL_SEQUENCE_NUMBER: Field = Field::numeric("EntryDetailSequenceNumber", 7);

/// Free-form payment related information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Addenda05 {
    pub payment_related_information: String,
    /// 1-based position among the entry's Addenda05 records.
    pub sequence_number: u16,
    /// Last 7 digits of the owning entry's trace number.
    pub entry_detail_sequence_number: u32,
}

impl Addenda05 {
    pub fn new(payment_related_information: &str) -> Self {
        Addenda05 {
            payment_related_information: payment_related_information.to_string(),
            sequence_number: 0,
            entry_detail_sequence_number: 0,
        }
    }
}

impl Record for Addenda05 {
    const RECORD_TYPE: &'static str = "7";

    const LAYOUT: &'static [Field] = &[
        RECORD_TYPE,
        TYPE_CODE,
        PAYMENT_RELATED_INFORMATION,
        SEQUENCE_NUMBER,
        ENTRY_DETAIL_SEQUENCE_NUMBER,
    ];

    fn parse(line: &str) -> Result<Self> {
        let mut r = open_addenda(line, AddendaType::Addenda05)?;
        let addenda = Addenda05 {
            payment_related_information: r.alpha(&PAYMENT_RELATED_INFORMATION)?,
            sequence_number: r.numeric_as(&SEQUENCE_NUMBER)?,
            entry_detail_sequence_number: r.numeric_as(&ENTRY_DETAIL_SEQUENCE_NUMBER)?,
        };
        if addenda.sequence_number == 0 {
            return Err(FieldError::inclusion(SEQUENCE_NUMBER.name, 0).into());
        }
        Ok(addenda)
    }

    fn render(&self) -> Result<String> {
        let mut w = writer(AddendaType::Addenda05)?;
        w.alpha(&PAYMENT_RELATED_INFORMATION, &self.payment_related_information)?
            .numeric(&SEQUENCE_NUMBER, u64::from(self.sequence_number))?
            .numeric(
                &ENTRY_DETAIL_SEQUENCE_NUMBER,
                u64::from(self.entry_detail_sequence_number),
            )?;
        Ok(w.finish()?)
    }

    fn validate(&self) -> Result<()> {
        check_alphanumeric(&PAYMENT_RELATED_INFORMATION, &self.payment_related_information)?;
        if self.sequence_number == 0 {
            return Err(FieldError::inclusion(SEQUENCE_NUMBER.name, self.sequence_number).into());
        }
        check_numeric(&SEQUENCE_NUMBER, u64::from(self.sequence_number))?;
        if self.entry_detail_sequence_number == 0 {
            return Err(FieldError::inclusion(
                ENTRY_DETAIL_SEQUENCE_NUMBER.name,
                self.entry_detail_sequence_number,
            )
            .into());
        }
        check_numeric(
            &ENTRY_DETAIL_SEQUENCE_NUMBER,
            u64::from(self.entry_detail_sequence_number),
        )?;
        Ok(())
    }
}

// Addenda99

const RETURN_CODE: Field = Field::alpha("ReturnCode", 3);
const ORIGINAL_TRACE: Field = Field::numeric("OriginalTrace", 15);
const DATE_OF_DEATH: Field = Field::alpha("DateOfDeath", 6);
const ORIGINAL_DFI: Field = Field::numeric("OriginalDFI", 8);
const ADDENDA_INFORMATION: Field = Field::alpha("AddendaInformation", 44);

/// Return of a previously originated entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Addenda99 {
    /// `R` followed by two digits.
    pub return_code: String,
    pub original_trace: u64,
    /// `YYMMDD`, only for death-related returns.
    pub date_of_death: String,
    pub original_dfi: u32,
    pub addenda_information: String,
    pub trace_number: u64,
}

impl Addenda99 {
    pub fn new(return_code: &str) -> Self {
        Addenda99 {
            return_code: return_code.to_string(),
            ..Self::default()
        }
    }

    fn check_inclusion(&self) -> std::result::Result<(), FieldError> {
        require(&RETURN_CODE, &self.return_code)?;
        if self.original_trace == 0 {
            return Err(FieldError::inclusion(ORIGINAL_TRACE.name, self.original_trace));
        }
        Ok(())
    }
}

impl Record for Addenda99 {
    const RECORD_TYPE: &'static str = "7";

    const LAYOUT: &'static [Field] = &[
        RECORD_TYPE,
        TYPE_CODE,
        RETURN_CODE,
        ORIGINAL_TRACE,
        DATE_OF_DEATH,
        ORIGINAL_DFI,
        ADDENDA_INFORMATION,
        TRACE_NUMBER,
    ];

    fn parse(line: &str) -> Result<Self> {
        let mut r = open_addenda(line, AddendaType::Addenda99)?;
        let addenda = Addenda99 {
            return_code: r.alpha(&RETURN_CODE)?,
            original_trace: r.numeric(&ORIGINAL_TRACE)?,
            date_of_death: r.alpha(&DATE_OF_DEATH)?,
            original_dfi: r.numeric_as(&ORIGINAL_DFI)?,
            addenda_information: r.alpha(&ADDENDA_INFORMATION)?,
            trace_number: r.numeric(&TRACE_NUMBER)?,
        };
        addenda.check_inclusion()?;
        Ok(addenda)
    }

    fn render(&self) -> Result<String> {
        let mut w = writer(AddendaType::Addenda99)?;
        w.alpha(&RETURN_CODE, &self.return_code)?
            .numeric(&ORIGINAL_TRACE, self.original_trace)?
            .alpha(&DATE_OF_DEATH, &self.date_of_death)?
            .numeric(&ORIGINAL_DFI, u64::from(self.original_dfi))?
            .alpha(&ADDENDA_INFORMATION, &self.addenda_information)?
            .numeric(&TRACE_NUMBER, self.trace_number)?;
        Ok(w.finish()?)
    }

    fn validate(&self) -> Result<()> {
        self.check_inclusion()?;
        let code = self.return_code.as_bytes();
        let well_formed = code.len() == 3 && code[0] == b'R' && code[1..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(FieldError::new(
                RETURN_CODE.name,
                &self.return_code,
                FieldErrorKind::InvalidValue,
            )
            .into());
        }
        check_numeric(&ORIGINAL_TRACE, self.original_trace)?;
        if !self.date_of_death.trim().is_empty() {
            check_date(&DATE_OF_DEATH, &self.date_of_death)?;
        }
        check_numeric(&ORIGINAL_DFI, u64::from(self.original_dfi))?;
        check_alphanumeric(&ADDENDA_INFORMATION, &self.addenda_information)?;
        check_numeric(&TRACE_NUMBER, self.trace_number)?;
        Ok(())
    }
}
