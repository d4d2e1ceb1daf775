//! Encoding of a [`File`] into ACH text.

use crate::error::Result;
use crate::file::File;
use std::io::Write;

/// Writes validated files, one record per line, `\n` terminated.
pub struct Writer<W: Write> {
    inner: W,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Writer { inner }
    }

    /// Validates `file` and writes every line, filler included.
    ///
    /// Nothing is written when validation fails.
    pub fn write(&mut self, file: &File) -> Result<()> {
        file.validate()?;
        for line in file.render_lines()? {
            self.inner.write_all(line.as_bytes())?;
            self.inner.write_all(b"\n")?;
        }
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Encodes a file into a single string.
pub fn write_string(file: &File) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write(file)?;
    // Every rendered line is ASCII.
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}
