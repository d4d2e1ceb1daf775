//! Per-batch CSV summary of a decoded file.

use crate::batch::Batch;
use crate::error::Result;
use crate::file::File;
use crate::money::Dollars;
use serde::Serialize;
use std::io::Write;

/// One output row per batch, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub batch: u32,
    pub sec: String,
    pub service_class: u16,
    pub entries: usize,
    pub addenda: usize,
    pub debit: Dollars,
    pub credit: Dollars,
}

impl BatchSummary {
    /// Summarizes a batch from its control record.
    pub fn from_batch(batch: &Batch) -> Self {
        let control = batch.control();
        BatchSummary {
            batch: batch.header().batch_number,
            sec: batch.sec_code().to_string(),
            service_class: batch.header().service_class_code,
            entries: batch.entries().len(),
            addenda: batch.entries().iter().map(|e| e.addenda.len()).sum(),
            debit: Dollars::from_cents(control.total_debit()),
            credit: Dollars::from_cents(control.total_credit()),
        }
    }
}

/// Writes the header row followed by one row per batch.
pub fn write_summary<W: Write>(file: &File, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for batch in file.batches() {
        csv_writer.serialize(BatchSummary::from_batch(batch))?;
    }
    csv_writer.flush()?;
    Ok(())
}
