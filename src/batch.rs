//! Batch engine.
//!
//! A batch owns its header, its entries (each owning its addenda) and its
//! control record. [`Batch::create`] applies the SEC rule set and rewrites
//! the control from the entries; [`Batch::validate`] re-checks everything
//! without touching the control.

use crate::codes::ServiceClassCode;
use crate::error::{BatchError, Result};
use crate::records::{
    Addenda, BatchControl, BatchHeader, EntryDetail, Record,
};
use crate::sec::{SecCode, SecRules};
use log::debug;

/// The entry hash keeps only this many low-order digits.
pub const ENTRY_HASH_MODULUS: u64 = 10_000_000_000;

/// Aggregates recomputed from a batch's entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchTotals {
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit: u64,
    pub total_credit: u64,
}

/// One batch of entries sharing a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    header: BatchHeader,
    entries: Vec<EntryDetail>,
    control: BatchControl,
    sec: SecCode,
}

impl Batch {
    /// Creates an empty batch, resolving its SEC rule set from the header.
    pub fn new(header: BatchHeader) -> Result<Self> {
        let sec = header.sec_code()?;
        Ok(Batch {
            header,
            entries: Vec::new(),
            control: BatchControl::default(),
            sec,
        })
    }

    pub fn sec_code(&self) -> SecCode {
        self.sec
    }

    pub fn rules(&self) -> &'static SecRules {
        self.sec.rules()
    }

    pub fn header(&self) -> &BatchHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut BatchHeader {
        &mut self.header
    }

    pub fn entries(&self) -> &[EntryDetail] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [EntryDetail] {
        &mut self.entries
    }

    pub fn control(&self) -> &BatchControl {
        &self.control
    }

    /// Appends an entry. Nothing is checked until `create` or `validate`.
    pub fn add_entry(&mut self, entry: EntryDetail) {
        self.entries.push(entry);
    }

    /// Installs a control record decoded from text, kept verbatim.
    pub(crate) fn set_control(&mut self, control: BatchControl) {
        self.control = control;
    }

    /// Physical lines: header, entries, addenda and control.
    pub fn line_count(&self) -> usize {
        2 + self.entries.iter().map(EntryDetail::line_count).sum::<usize>()
    }

    fn batch_number(&self) -> u32 {
        self.header.batch_number
    }

    fn error(&self, field_name: &'static str, msg: impl Into<String>) -> BatchError {
        BatchError::new(self.batch_number(), field_name, msg)
    }

    /// Checks the rule set, then rewrites the control from the entries.
    ///
    /// Returns the first violation found; the control is left untouched in
    /// that case.
    pub fn create(&mut self) -> Result<()> {
        self.header.validate()?;
        let service_class = self.check_sec_code()?;
        self.check_has_entries()?;

        let rules = self.rules();
        for entry in &self.entries {
            rules.check_transaction_code(service_class, entry, self.batch_number())?;
            rules.check_entry(entry, self.batch_number())?;
        }

        let totals = self.compute_totals()?;
        let control = BatchControl {
            service_class_code: self.header.service_class_code,
            entry_addenda_count: totals.entry_addenda_count,
            entry_hash: totals.entry_hash,
            total_debit: totals.total_debit,
            total_credit: totals.total_credit,
            company_identification: self.header.company_identification.clone(),
            message_authentication_code: self.control.message_authentication_code.clone(),
            reserved: String::new(),
            odfi_identification: self.header.odfi_identification,
            batch_number: self.header.batch_number,
        };
        control.validate()?;
        self.control = control;

        debug!(
            "Batch {}: {} {} entries, hash {}, debit {}, credit {}",
            self.batch_number(),
            self.entries.len(),
            self.sec,
            totals.entry_hash,
            totals.total_debit,
            totals.total_credit
        );
        Ok(())
    }

    /// Re-checks every record and cross-record rule without mutating anything.
    pub fn validate(&self) -> Result<()> {
        self.header.validate()?;
        let service_class = self.check_sec_code()?;
        self.check_has_entries()?;
        self.control.validate()?;
        for entry in &self.entries {
            entry.validate()?;
            for addenda in &entry.addenda {
                addenda.validate()?;
            }
        }

        self.check_control_header()?;

        let rules = self.rules();
        let mut previous_trace = 0u64;
        for entry in &self.entries {
            rules.check_transaction_code(service_class, entry, self.batch_number())?;
            rules.check_entry(entry, self.batch_number())?;
            self.check_addenda_links(entry)?;

            if entry.trace_number <= previous_trace {
                return Err(self
                    .error(
                        "TraceNumber",
                        format!(
                            "{} is not ascending after {}",
                            entry.trace_number, previous_trace
                        ),
                    )
                    .into());
            }
            previous_trace = entry.trace_number;

            if entry.trace_odfi() != u64::from(self.header.odfi_identification) {
                return Err(self
                    .error(
                        "ODFIIdentification",
                        format!(
                            "trace number {} does not start with ODFI {:08}",
                            entry.trace_number, self.header.odfi_identification
                        ),
                    )
                    .into());
            }
        }

        self.check_control_totals()?;
        Ok(())
    }

    /// Counts, entry hash and dollar totals of the current entries.
    ///
    /// Sums that no longer fit their integer type are reported against the
    /// control field they feed.
    pub fn compute_totals(&self) -> Result<BatchTotals> {
        let mut totals = BatchTotals::default();
        for entry in &self.entries {
            totals.entry_addenda_count = totals
                .entry_addenda_count
                .checked_add(entry.line_count() as u32)
                .ok_or_else(|| self.error("EntryAddendaCount", "entry and addenda count overflows"))?;
            totals.entry_hash =
                (totals.entry_hash + u64::from(entry.rdfi_identification)) % ENTRY_HASH_MODULUS;
            let tc = entry
                .transaction()
                .map_err(|e| self.error("TransactionCode", e.to_string()))?;
            let (total, field_name) = if tc.is_debit() {
                (&mut totals.total_debit, "TotalDebitEntryDollarAmount")
            } else {
                (&mut totals.total_credit, "TotalCreditEntryDollarAmount")
            };
            *total = total
                .checked_add(entry.amount)
                .ok_or_else(|| self.error(field_name, format!("adding {} overflows", entry.amount)))?;
        }
        Ok(totals)
    }

    fn check_sec_code(&self) -> Result<ServiceClassCode> {
        let header_sec = self.header.sec_code()?;
        if header_sec != self.sec {
            return Err(self
                .error(
                    "StandardEntryClassCode",
                    format!("header {} does not match {} batch", header_sec, self.sec),
                )
                .into());
        }
        Ok(self.header.service_class()?)
    }

    fn check_has_entries(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(self.error("Entries", "batch must contain at least one entry").into());
        }
        Ok(())
    }

    fn check_control_header(&self) -> Result<()> {
        let header = &self.header;
        let control = &self.control;
        if control.service_class_code != header.service_class_code {
            return Err(self
                .error(
                    "ServiceClassCode",
                    format!(
                        "control {} does not match header {}",
                        control.service_class_code, header.service_class_code
                    ),
                )
                .into());
        }
        if control.company_identification != header.company_identification {
            return Err(self
                .error(
                    "CompanyIdentification",
                    format!(
                        "control {:?} does not match header {:?}",
                        control.company_identification, header.company_identification
                    ),
                )
                .into());
        }
        if control.odfi_identification != header.odfi_identification {
            return Err(self
                .error(
                    "ODFIIdentification",
                    format!(
                        "control {} does not match header {}",
                        control.odfi_identification, header.odfi_identification
                    ),
                )
                .into());
        }
        if control.batch_number != header.batch_number {
            return Err(self
                .error(
                    "BatchNumber",
                    format!(
                        "control {} does not match header {}",
                        control.batch_number, header.batch_number
                    ),
                )
                .into());
        }
        Ok(())
    }

    /// Addenda must agree with the indicator and reference their entry.
    fn check_addenda_links(&self, entry: &EntryDetail) -> Result<()> {
        let has_addenda = !entry.addenda.is_empty();
        if (entry.addenda_record_indicator == 1) != has_addenda {
            return Err(self
                .error(
                    "AddendaRecordIndicator",
                    format!(
                        "indicator {} with {} addenda on trace {}",
                        entry.addenda_record_indicator,
                        entry.addenda.len(),
                        entry.trace_number
                    ),
                )
                .into());
        }

        let mut expected_sequence = 1u16;
        for addenda in &entry.addenda {
            if let Some(trace) = addenda.trace_number() {
                if trace != entry.trace_number {
                    return Err(self
                        .error(
                            "TraceNumber",
                            format!(
                                "{} trace {} does not match entry trace {}",
                                addenda.addenda_type().name(),
                                trace,
                                entry.trace_number
                            ),
                        )
                        .into());
                }
            }
            if let Addenda::Addenda05(a05) = addenda {
                if a05.sequence_number != expected_sequence {
                    return Err(self
                        .error(
                            "SequenceNumber",
                            format!(
                                "expected {} but found {}",
                                expected_sequence, a05.sequence_number
                            ),
                        )
                        .into());
                }
                if a05.entry_detail_sequence_number != entry.trace_sequence() {
                    return Err(self
                        .error(
                            "EntryDetailSequenceNumber",
                            format!(
                                "{} does not match entry trace sequence {}",
                                a05.entry_detail_sequence_number,
                                entry.trace_sequence()
                            ),
                        )
                        .into());
                }
                expected_sequence += 1;
            }
        }
        Ok(())
    }

    fn check_control_totals(&self) -> Result<()> {
        let totals = self.compute_totals()?;
        let control = &self.control;
        let checks: [(&'static str, u64, u64); 4] = [
            (
                "EntryAddendaCount",
                u64::from(control.entry_addenda_count),
                u64::from(totals.entry_addenda_count),
            ),
            ("EntryHash", control.entry_hash, totals.entry_hash),
            (
                "TotalDebitEntryDollarAmount",
                control.total_debit,
                totals.total_debit,
            ),
            (
                "TotalCreditEntryDollarAmount",
                control.total_credit,
                totals.total_credit,
            ),
        ];
        for (field_name, found, expected) in checks {
            if found != expected {
                return Err(self
                    .error(
                        field_name,
                        format!("control holds {} but entries compute {}", found, expected),
                    )
                    .into());
            }
        }
        Ok(())
    }
}
