//! # ACH Engine
//!
//! Encodes, decodes and validates NACHA ACH files: fixed-width 94-character
//! records grouped into batches, each batch governed by the rules of its
//! Standard Entry Class (SEC) code.
//!
//! ## Design Principles
//!
//! - **Exact round trips**: decoding then encoding reproduces the input bytes
//! - **Derived controls**: batch and file control totals are recomputed by
//!   `create()` and compared, never trusted, by `validate()`
//! - **Fail fast**: the first violation is returned, tagged with the
//!   offending field name
//! - **Closed rule table**: one compiled rule descriptor per SEC code
//!
//! ## Example
//!
//! ```no_run
//! use ach_engine::{report, Reader};
//! use std::fs::File;
//!
//! let file = Reader::new(File::open("payroll.ach").unwrap()).read().unwrap();
//! report::write_summary(&file, std::io::stdout()).unwrap();
//! ```

pub mod batch;
pub mod codes;
pub mod error;
pub mod field;
pub mod file;
pub mod money;
pub mod reader;
pub mod records;
pub mod report;
pub mod sec;
pub mod writer;

pub use batch::{Batch, BatchTotals};
pub use codes::{AccountKind, Direction, ServiceClassCode, TransactionCode};
pub use error::{AchError, BatchError, FieldError, FieldErrorKind, FileError, Result};
pub use file::{File, FileTotals};
pub use money::Dollars;
pub use reader::Reader;
pub use records::{
    Addenda, Addenda02, Addenda05, Addenda99, AddendaType, BatchControl, BatchHeader,
    EntryDetail, FileControl, FileHeader, Record,
};
pub use sec::{SecCode, SecRules};
pub use writer::Writer;
