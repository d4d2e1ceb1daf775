//! File engine.
//!
//! Mirrors the batch engine one level up: the file control is a pure
//! function of the batch controls, plus the block count derived from the
//! physical line count.

use crate::batch::{Batch, ENTRY_HASH_MODULUS};
use crate::error::{FileError, Result};
use crate::records::{FileControl, FileHeader, Record};
use log::debug;

/// Lines per physical block.
pub const BLOCKING_FACTOR: usize = 10;

/// Reserved record written after the file control to fill the last block.
pub fn filler_line() -> String {
    "9".repeat(crate::field::RECORD_LENGTH)
}

/// Aggregates recomputed from a file's batch controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileTotals {
    pub batch_count: u32,
    pub block_count: u32,
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit: u64,
    pub total_credit: u64,
}

/// A complete ACH file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    header: FileHeader,
    batches: Vec<Batch>,
    control: FileControl,
}

impl File {
    pub fn new(header: FileHeader) -> Self {
        File {
            header,
            batches: Vec::new(),
            control: FileControl::default(),
        }
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut FileHeader {
        &mut self.header
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batches_mut(&mut self) -> &mut [Batch] {
        &mut self.batches
    }

    pub fn control(&self) -> &FileControl {
        &self.control
    }

    pub fn add_batch(&mut self, batch: Batch) {
        self.batches.push(batch);
    }

    pub(crate) fn set_control(&mut self, control: FileControl) {
        self.control = control;
    }

    /// Header, every batch line, and control; filler excluded.
    pub fn line_count(&self) -> usize {
        2 + self.batches.iter().map(Batch::line_count).sum::<usize>()
    }

    /// Filler lines needed to reach a block boundary.
    pub fn filler_count(&self) -> usize {
        let remainder = self.line_count() % BLOCKING_FACTOR;
        if remainder == 0 {
            0
        } else {
            BLOCKING_FACTOR - remainder
        }
    }

    /// Aggregates of the current batch controls.
    pub fn compute_totals(&self) -> Result<FileTotals> {
        let mut totals = FileTotals {
            batch_count: self.batches.len() as u32,
            block_count: self.line_count().div_ceil(BLOCKING_FACTOR) as u32,
            ..FileTotals::default()
        };
        for batch in &self.batches {
            let control = batch.control();
            totals.entry_addenda_count = checked_sum(
                "EntryAddendaCount",
                totals.entry_addenda_count,
                control.entry_addenda_count(),
            )?;
            totals.entry_hash =
                (totals.entry_hash + control.entry_hash() % ENTRY_HASH_MODULUS) % ENTRY_HASH_MODULUS;
            totals.total_debit = checked_sum(
                "TotalDebitEntryDollarAmountInFile",
                totals.total_debit,
                control.total_debit(),
            )?;
            totals.total_credit = checked_sum(
                "TotalCreditEntryDollarAmountInFile",
                totals.total_credit,
                control.total_credit(),
            )?;
        }
        Ok(totals)
    }

    /// Checks the header and rewrites the control from the batch controls.
    ///
    /// Batches must already be built; their controls are taken as they are.
    pub fn create(&mut self) -> Result<()> {
        self.header.validate()?;
        if self.batches.is_empty() {
            return Err(FileError::new("BatchCount", "file must contain at least one batch").into());
        }

        let totals = self.compute_totals()?;
        let control = FileControl {
            batch_count: totals.batch_count,
            block_count: totals.block_count,
            entry_addenda_count: totals.entry_addenda_count,
            entry_hash: totals.entry_hash,
            total_debit: totals.total_debit,
            total_credit: totals.total_credit,
            reserved: String::new(),
        };
        control.validate()?;
        self.control = control;

        debug!(
            "File: {} batches, {} blocks, hash {}, debit {}, credit {}",
            totals.batch_count,
            totals.block_count,
            totals.entry_hash,
            totals.total_debit,
            totals.total_credit
        );
        Ok(())
    }

    /// Validates every batch and compares the control with the batches.
    pub fn validate(&self) -> Result<()> {
        self.header.validate()?;
        if self.batches.is_empty() {
            return Err(FileError::new("BatchCount", "file must contain at least one batch").into());
        }
        self.control.validate()?;

        let mut previous = 0u32;
        for batch in &self.batches {
            batch.validate()?;
            let number = batch.header().batch_number;
            if number <= previous {
                return Err(FileError::new(
                    "BatchNumber",
                    format!("batch number {} is not ascending after {}", number, previous),
                )
                .into());
            }
            previous = number;
        }

        let totals = self.compute_totals()?;
        let control = &self.control;
        let checks: [(&'static str, u64, u64); 6] = [
            (
                "BatchCount",
                u64::from(control.batch_count),
                u64::from(totals.batch_count),
            ),
            (
                "BlockCount",
                u64::from(control.block_count),
                u64::from(totals.block_count),
            ),
            (
                "EntryAddendaCount",
                u64::from(control.entry_addenda_count),
                u64::from(totals.entry_addenda_count),
            ),
            ("EntryHash", control.entry_hash, totals.entry_hash),
            (
                "TotalDebitEntryDollarAmountInFile",
                control.total_debit,
                totals.total_debit,
            ),
            (
                "TotalCreditEntryDollarAmountInFile",
                control.total_credit,
                totals.total_credit,
            ),
        ];
        for (field_name, found, expected) in checks {
            if found != expected {
                return Err(FileError::new(
                    field_name,
                    format!("control holds {} but batches compute {}", found, expected),
                )
                .into());
            }
        }
        Ok(())
    }

    /// Renders every line in file order, filler included.
    pub fn render_lines(&self) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(self.line_count() + self.filler_count());
        lines.push(self.header.render()?);
        for batch in &self.batches {
            lines.push(batch.header().render()?);
            for entry in batch.entries() {
                lines.push(entry.render()?);
                for addenda in &entry.addenda {
                    lines.push(addenda.render()?);
                }
            }
            lines.push(batch.control().render()?);
        }
        lines.push(self.control.render()?);
        lines.extend(std::iter::repeat_with(filler_line).take(self.filler_count()));
        Ok(lines)
    }
}

fn checked_sum<T>(field_name: &'static str, total: T, value: T) -> Result<T>
where
    T: Into<u64> + TryFrom<u64>,
{
    total
        .into()
        .checked_add(value.into())
        .and_then(|sum| T::try_from(sum).ok())
        .ok_or_else(|| FileError::new(field_name, "sum of batch controls overflows").into())
}
