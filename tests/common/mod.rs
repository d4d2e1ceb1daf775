//! Builders shared by the integration tests.
//!
//! Every builder returns a fresh, independently owned value so tests can
//! mutate what they get without affecting each other.

#![allow(dead_code)]

use ach_engine::codes::{CHECKING_CREDIT, CHECKING_DEBIT};
use ach_engine::{
    Addenda02, Batch, BatchHeader, EntryDetail, File, FileHeader, SecCode, ServiceClassCode,
};
use chrono::NaiveDate;

pub fn effective_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 8, 16).unwrap()
}

pub fn mock_file_header() -> FileHeader {
    let mut header = FileHeader::new();
    header.set_immediate_destination("031300012");
    header.set_immediate_origin("231380104");
    header.set_file_creation(effective_date().and_hms_opt(10, 55, 0).unwrap());
    header.immediate_destination_name = "Federal Reserve Bank".to_string();
    header.immediate_origin_name = "My Bank Name".to_string();
    header
}

pub fn mock_mte_header() -> BatchHeader {
    let mut header = BatchHeader::new(ServiceClassCode::DebitsOnly, SecCode::Mte);
    header.company_name = "Merchant with ATM".to_string();
    header.company_identification = "231380104".to_string();
    header.company_entry_description = "CASH WITHDRAW".to_string();
    header.set_effective_entry_date(effective_date());
    header.odfi_identification = 23138010;
    header
}

pub fn mock_addenda02() -> Addenda02 {
    let mut addenda = Addenda02::new();
    addenda.terminal_identification_code = "200509".to_string();
    addenda.terminal_location = "321 East Market Street".to_string();
    addenda.terminal_city = "ANYTOWN".to_string();
    addenda.terminal_state = "VA".to_string();
    addenda.transaction_serial_number = "123456".to_string();
    addenda.transaction_date = "1224".to_string();
    addenda
}

pub fn mock_mte_entry() -> EntryDetail {
    let mut entry = EntryDetail::new(CHECKING_DEBIT);
    entry.set_rdfi("031300012").unwrap();
    entry.dfi_account_number = "744-5678-99".to_string();
    entry.amount = 10000;
    entry.identification_number = "031300010000001".to_string();
    entry.set_receiving_company("JANE DOE");
    entry.set_trace_number(23138010, 1);
    entry.add_addenda02(mock_addenda02());
    entry
}

/// A created MTE batch holding one entry.
pub fn mock_mte_batch() -> Batch {
    let mut batch = Batch::new(mock_mte_header()).unwrap();
    batch.add_entry(mock_mte_entry());
    batch.create().unwrap();
    batch
}

pub fn mock_ppd_header(batch_number: u32) -> BatchHeader {
    let mut header = BatchHeader::new(ServiceClassCode::MixedDebitsAndCredits, SecCode::Ppd);
    header.company_name = "Payroll Co".to_string();
    header.company_identification = "231380104".to_string();
    header.company_entry_description = "PAYROLL".to_string();
    header.set_effective_entry_date(effective_date());
    header.odfi_identification = 23138010;
    header.batch_number = batch_number;
    header
}

pub fn mock_ppd_entry(transaction_code: u8, amount: u64, sequence: u32) -> EntryDetail {
    let mut entry = EntryDetail::new(transaction_code);
    entry.set_rdfi("121042882").unwrap();
    entry.dfi_account_number = format!("{:08}", sequence);
    entry.amount = amount;
    entry.individual_name = format!("Employee {}", sequence);
    entry.set_trace_number(23138010, sequence);
    entry
}

/// A created PPD batch with `entries` credits of $100.00 each.
pub fn mock_ppd_batch(batch_number: u32, entries: u32) -> Batch {
    let mut batch = Batch::new(mock_ppd_header(batch_number)).unwrap();
    for sequence in 1..=entries {
        batch.add_entry(mock_ppd_entry(CHECKING_CREDIT, 10000, sequence));
    }
    batch.create().unwrap();
    batch
}

/// A created file holding an MTE batch and a PPD batch.
pub fn mock_file() -> File {
    let mut file = File::new(mock_file_header());
    file.add_batch(mock_mte_batch());
    file.add_batch(mock_ppd_batch(2, 2));
    file.create().unwrap();
    file
}
