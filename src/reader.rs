//! Decoding of ACH text into a [`File`].
//!
//! Input is either newline-delimited (CRLF tolerated) or one unbroken run of
//! 94-character records. Records are grouped by their type code; each batch
//! is validated when its control record is reached and the whole file once
//! the file control has been read. Errors carry the 1-based line number.

use crate::batch::Batch;
use crate::error::{AchError, FieldError, FieldErrorKind, FileError, Result};
use crate::field::RECORD_LENGTH;
use crate::file::{filler_line, File};
use crate::records::{
    Addenda, BatchControl, BatchHeader, EntryDetail, FileControl, FileHeader, Record,
};
use log::{debug, warn};
use std::io::Read;

/// Reads a complete ACH file from any byte source.
pub struct Reader<R: Read> {
    inner: R,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Self {
        Reader { inner }
    }

    /// Consumes the source and decodes it.
    pub fn read(mut self) -> Result<File> {
        let mut bytes = Vec::new();
        self.inner.read_to_end(&mut bytes)?;
        read_bytes(&bytes)
    }
}

/// Decodes a whole file held in memory.
pub fn read_str(text: &str) -> Result<File> {
    read_bytes(text.as_bytes())
}

/// Decodes raw bytes. A record that is not valid text fails at its own line.
pub fn read_bytes(bytes: &[u8]) -> Result<File> {
    let lines = split_records(bytes)?
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            std::str::from_utf8(record).map_err(|_| {
                AchError::at_line(
                    index + 1,
                    FieldError::new(
                        "Record",
                        String::from_utf8_lossy(record),
                        FieldErrorKind::Alphanumeric,
                    )
                    .into(),
                )
            })
        })
        .collect::<Result<Vec<&str>>>()?;
    parse_lines(lines)
}

/// Decodes a sequence of record lines, already split.
pub fn parse_lines<I, S>(lines: I) -> Result<File>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut decoder = Decoder::default();
    let mut line_number = 0;
    for line in lines {
        line_number += 1;
        decoder
            .push(line_number, line.as_ref())
            .map_err(|e| AchError::at_line(line_number, e))?;
    }
    decoder.finish(line_number)
}

fn split_records(bytes: &[u8]) -> Result<Vec<&[u8]>> {
    if bytes.contains(&b'\n') {
        let mut lines: Vec<&[u8]> = bytes
            .split(|b| *b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        return Ok(lines);
    }

    if bytes.len() % RECORD_LENGTH != 0 {
        return Err(AchError::at_line(
            bytes.len() / RECORD_LENGTH + 1,
            FieldError::new("Record", bytes.len(), FieldErrorKind::Length).into(),
        ));
    }
    Ok(bytes.chunks(RECORD_LENGTH).collect())
}

/// Record-by-record state while decoding.
#[derive(Default)]
struct Decoder {
    file: Option<File>,
    batch: Option<Batch>,
    control_line: Option<usize>,
    filler: usize,
}

impl Decoder {
    fn push(&mut self, line_number: usize, line: &str) -> Result<()> {
        if self.control_line.is_some() {
            if line == filler_line() {
                self.filler += 1;
                return Ok(());
            }
            return Err(FileError::new("FileControl", "record found after the file control").into());
        }

        match line.get(..1) {
            Some("1") => self.file_header(line),
            Some("5") => self.batch_header(line),
            Some("6") => self.entry(line),
            Some("7") => self.addenda(line),
            Some("8") => self.batch_control(line),
            Some("9") => self.file_control(line_number, line),
            other => Err(FieldError::new(
                "RecordType",
                other.unwrap_or_default(),
                FieldErrorKind::RecordType,
            )
            .into()),
        }
    }

    fn open_file(&mut self) -> Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| FileError::new("FileHeader", "record found before the file header").into())
    }

    fn open_batch(&mut self) -> Result<&mut Batch> {
        self.batch
            .as_mut()
            .ok_or_else(|| FileError::new("BatchHeader", "record found outside a batch").into())
    }

    fn file_header(&mut self, line: &str) -> Result<()> {
        if self.file.is_some() {
            return Err(FileError::new("FileHeader", "second file header").into());
        }
        self.file = Some(File::new(FileHeader::parse(line)?));
        Ok(())
    }

    fn batch_header(&mut self, line: &str) -> Result<()> {
        self.open_file()?;
        if let Some(batch) = &self.batch {
            return Err(FileError::new(
                "BatchControl",
                format!("batch #{} has no control record", batch.header().batch_number),
            )
            .into());
        }
        self.batch = Some(Batch::new(BatchHeader::parse(line)?)?);
        Ok(())
    }

    fn entry(&mut self, line: &str) -> Result<()> {
        let entry = EntryDetail::parse(line)?;
        self.open_batch()?.add_entry(entry);
        Ok(())
    }

    fn addenda(&mut self, line: &str) -> Result<()> {
        let addenda = Addenda::parse(line)?;
        let entry = self
            .open_batch()?
            .entries_mut()
            .last_mut()
            .ok_or_else(|| FileError::new("EntryDetail", "addenda record without an entry"))?;
        entry.addenda.push(addenda);
        Ok(())
    }

    fn batch_control(&mut self, line: &str) -> Result<()> {
        let control = BatchControl::parse(line)?;
        let mut batch = self
            .batch
            .take()
            .ok_or_else(|| FileError::new("BatchHeader", "record found outside a batch"))?;
        batch.set_control(control);
        batch.validate()?;
        debug!(
            "Batch #{} closed: {} entries",
            batch.header().batch_number,
            batch.entries().len()
        );
        self.open_file()?.add_batch(batch);
        Ok(())
    }

    fn file_control(&mut self, line_number: usize, line: &str) -> Result<()> {
        if self.batch.is_some() {
            return Err(FileError::new("BatchControl", "file control inside an open batch").into());
        }
        let control = FileControl::parse(line)?;
        self.open_file()?.set_control(control);
        self.control_line = Some(line_number);
        Ok(())
    }

    fn finish(self, line_count: usize) -> Result<File> {
        let Some(file) = self.file else {
            return Err(AchError::at_line(
                line_count.max(1),
                FileError::new("FileHeader", "input holds no file header").into(),
            ));
        };
        let Some(control_line) = self.control_line else {
            return Err(AchError::at_line(
                line_count,
                FileError::new("FileControl", "input ends without a file control").into(),
            ));
        };
        if self.filler != file.filler_count() {
            warn!(
                "File has {} filler lines, expected {}",
                self.filler,
                file.filler_count()
            );
        } else if self.filler > 0 {
            debug!("Skipped {} filler lines", self.filler);
        }
        file
            .validate()
            .map_err(|e| AchError::at_line(control_line, e))?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{ServiceClassCode, CHECKING_CREDIT};
    use crate::records::Addenda05;
    use crate::sec::SecCode;

    fn sample_file() -> File {
        let mut header = FileHeader::new();
        header.set_immediate_destination("031300012");
        header.set_immediate_origin("231380104");
        header.file_creation_date = "190816".to_string();
        header.file_creation_time = "1055".to_string();
        header.immediate_destination_name = "Federal Reserve Bank".to_string();
        header.immediate_origin_name = "My Bank Name".to_string();

        let mut batch_header =
            BatchHeader::new(ServiceClassCode::CreditsOnly, SecCode::Ppd);
        batch_header.company_name = "Payroll Co".to_string();
        batch_header.company_identification = "231380104".to_string();
        batch_header.company_entry_description = "PAYROLL".to_string();
        batch_header.effective_entry_date = "190817".to_string();
        batch_header.odfi_identification = 23138010;
        let mut batch = Batch::new(batch_header).unwrap();

        let mut entry = EntryDetail::new(CHECKING_CREDIT);
        entry.set_rdfi("031300012").unwrap();
        entry.dfi_account_number = "12345678".to_string();
        entry.amount = 10000;
        entry.individual_name = "Jane Doe".to_string();
        entry.set_trace_number(23138010, 1);
        entry.add_addenda05(Addenda05::new("AUGUST PAYROLL"));
        batch.add_entry(entry);
        batch.create().unwrap();

        let mut file = File::new(header);
        file.add_batch(batch);
        file.create().unwrap();
        file
    }

    fn sample_lines() -> Vec<String> {
        sample_file().render_lines().unwrap()
    }

    #[test]
    fn test_newline_round_trip() {
        let lines = sample_lines();
        let text = lines.join("\n") + "\n";
        let file = read_str(&text).unwrap();
        assert_eq!(file, sample_file());
        assert_eq!(file.render_lines().unwrap(), lines);
    }

    #[test]
    fn test_crlf_and_unbroken_input() {
        let lines = sample_lines();
        let crlf = read_str(&lines.join("\r\n")).unwrap();
        let unbroken = read_str(&lines.concat()).unwrap();
        assert_eq!(crlf, unbroken);
        assert_eq!(unbroken.render_lines().unwrap(), lines);
    }

    #[test]
    fn test_reader_over_bytes() {
        let text = sample_lines().join("\n");
        let file = Reader::new(text.as_bytes()).read().unwrap();
        assert_eq!(file.batches().len(), 1);
        assert_eq!(file.batches()[0].entries()[0].addenda.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_reports_its_line() {
        let mut bytes = sample_lines().join("\n").into_bytes();
        // Third record starts after two 94-byte lines and their newlines.
        bytes[2 * (RECORD_LENGTH + 1) + 40] = 0xFF;
        let err = Reader::new(bytes.as_slice()).read().unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert_eq!(
            err.as_field_error().map(|e| e.kind),
            Some(FieldErrorKind::Alphanumeric)
        );
    }

    #[test]
    fn test_unbroken_non_ascii_fails_at_its_record() {
        let mut lines = sample_lines();
        lines[1].replace_range(60..62, "É");
        let err = read_str(&lines.concat()).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_unbroken_input_with_partial_record() {
        let mut text = sample_lines().concat();
        text.pop();
        let err = read_str(&text).unwrap_err();
        assert_eq!(err.line(), Some(10));
        assert_eq!(err.as_field_error().map(|e| e.kind), Some(FieldErrorKind::Length));
    }

    #[test]
    fn test_entry_outside_batch() {
        let lines = sample_lines();
        let err = parse_lines([&lines[0], &lines[2]]).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.field_name(), Some("BatchHeader"));
    }

    #[test]
    fn test_addenda_without_entry() {
        let lines = sample_lines();
        let err = parse_lines([&lines[0], &lines[1], &lines[3]]).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.field_name(), Some("EntryDetail"));
    }

    #[test]
    fn test_unknown_record_type() {
        let mut lines = sample_lines();
        lines[1].replace_range(..1, "4");
        let err = parse_lines(&lines).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert_eq!(
            err.as_field_error().map(|e| e.kind),
            Some(FieldErrorKind::RecordType)
        );
    }

    #[test]
    fn test_missing_file_control() {
        let lines = sample_lines();
        let err = parse_lines(&lines[..5]).unwrap_err();
        assert_eq!(err.line(), Some(5));
        assert_eq!(err.field_name(), Some("FileControl"));
    }

    #[test]
    fn test_missing_batch_control() {
        let lines = sample_lines();
        let err = parse_lines([&lines[0], &lines[1], &lines[2], &lines[5]]).unwrap_err();
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.field_name(), Some("BatchControl"));
    }

    #[test]
    fn test_record_after_file_control() {
        let mut lines = sample_lines();
        lines.push(lines[1].clone());
        let err = parse_lines(&lines).unwrap_err();
        assert_eq!(err.line(), Some(11));
        assert_eq!(err.field_name(), Some("FileControl"));
    }

    #[test]
    fn test_batch_validated_at_its_control() {
        let mut lines = sample_lines();
        // Entry hash occupies columns 10..20 of the batch control.
        lines[4].replace_range(10..20, "0000000001");
        let err = parse_lines(&lines).unwrap_err();
        assert_eq!(err.line(), Some(5));
        assert_eq!(err.field_name(), Some("EntryHash"));
    }

    #[test]
    fn test_file_control_compared_with_batches() {
        let mut lines = sample_lines();
        lines[5].replace_range(1..7, "000002");
        let err = parse_lines(&lines).unwrap_err();
        assert_eq!(err.line(), Some(6));
        assert_eq!(err.field_name(), Some("BatchCount"));
    }

    #[test]
    fn test_empty_input() {
        let err = read_str("").unwrap_err();
        assert_eq!(err.field_name(), Some("FileHeader"));
    }
}
