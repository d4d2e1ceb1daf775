//! ACH Engine CLI
//!
//! Decodes and validates an ACH file, then prints one CSV summary row per
//! batch.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- payroll.ach > summary.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use ach_engine::{report, AchError, Reader, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(AchError::MissingArgument);
    }

    let input_path = &args[1];
    let file = File::open(input_path)?;
    let ach = Reader::new(BufReader::new(file)).read()?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    report::write_summary(&ach, handle)?;

    Ok(())
}
