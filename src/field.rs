//! Fixed-width field codec.
//!
//! Alphanumeric fields are left-justified and space-padded; numeric fields
//! are right-justified and zero-padded. Records are exactly
//! [`RECORD_LENGTH`] ASCII characters, so byte offsets and character
//! offsets coincide once a line has been checked.

use crate::error::{FieldError, FieldErrorKind};

/// Width of every record line.
pub const RECORD_LENGTH: usize = 94;

/// How a field is justified and padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Left-justified, space-padded text.
    Alphanumeric,
    /// Right-justified, zero-padded unsigned integer.
    Numeric,
}

/// A named, fixed-width slot in a record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub width: usize,
}

impl Field {
    pub const fn alpha(name: &'static str, width: usize) -> Self {
        Field {
            name,
            kind: FieldKind::Alphanumeric,
            width,
        }
    }

    pub const fn numeric(name: &'static str, width: usize) -> Self {
        Field {
            name,
            kind: FieldKind::Numeric,
            width,
        }
    }

    /// Largest value a numeric field of this width can hold.
    pub fn max_value(&self) -> u64 {
        10u64.saturating_pow(self.width as u32).saturating_sub(1)
    }
}

/// Encodes text left-justified, truncating or space-padding to `width`.
pub fn encode_alpha(value: &str, width: usize) -> String {
    let mut out: String = value.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// Encodes an unsigned integer right-justified and zero-padded.
///
/// Fails rather than truncating when the value has more digits than the
/// field allows.
pub fn encode_numeric(field: &Field, value: u64) -> Result<String, FieldError> {
    let digits = value.to_string();
    if digits.len() > field.width {
        return Err(FieldError::new(field.name, value, FieldErrorKind::TooLarge));
    }
    Ok(format!("{:0>width$}", digits, width = field.width))
}

/// Decodes an alphanumeric slot, dropping trailing padding.
pub fn decode_alpha(slice: &str) -> String {
    slice.trim_end_matches(' ').to_string()
}

/// Decodes a numeric slot. Every character must be an ASCII digit.
pub fn decode_numeric(field: &Field, slice: &str) -> Result<u64, FieldError> {
    if slice.is_empty() || !slice.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::new(field.name, slice, FieldErrorKind::Numeric));
    }
    slice
        .parse::<u64>()
        .map_err(|_| FieldError::new(field.name, slice, FieldErrorKind::TooLarge))
}

/// Checks that text only uses the printable ASCII range allowed in records.
pub fn check_alphanumeric(field: &Field, value: &str) -> Result<(), FieldError> {
    if value.chars().all(|c| (' '..='~').contains(&c)) {
        Ok(())
    } else {
        Err(FieldError::new(
            field.name,
            value,
            FieldErrorKind::Alphanumeric,
        ))
    }
}

/// Checks that a number fits its numeric field.
pub fn check_numeric(field: &Field, value: u64) -> Result<(), FieldError> {
    if value > field.max_value() {
        Err(FieldError::new(field.name, value, FieldErrorKind::TooLarge))
    } else {
        Ok(())
    }
}

/// Rejects a mandatory alphanumeric field left blank.
pub fn require(field: &Field, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::inclusion(field.name, value))
    } else {
        Ok(())
    }
}

/// True when the text is empty, all spaces, or all zeros.
pub fn is_blank_or_zeros(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.bytes().all(|b| b == b'0')
}

/// Strict left-to-right slicer over one record line.
pub struct FieldReader<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> FieldReader<'a> {
    /// Starts reading `line`, which must be exactly one ASCII record long.
    pub fn new(line: &'a str) -> Result<Self, FieldError> {
        if !line.is_ascii() {
            return Err(FieldError::new(
                "Record",
                line,
                FieldErrorKind::Alphanumeric,
            ));
        }
        if line.len() != RECORD_LENGTH {
            return Err(FieldError::new("Record", line.len(), FieldErrorKind::Length));
        }
        Ok(FieldReader { line, pos: 0 })
    }

    fn take(&mut self, field: &Field) -> Result<&'a str, FieldError> {
        let end = self.pos + field.width;
        let slice = self
            .line
            .get(self.pos..end)
            .ok_or_else(|| FieldError::new(field.name, self.line.len(), FieldErrorKind::Length))?;
        self.pos = end;
        Ok(slice)
    }

    /// Consumes a fixed literal such as the record type discriminator.
    pub fn literal(
        &mut self,
        field: &Field,
        expected: &str,
        kind: FieldErrorKind,
    ) -> Result<(), FieldError> {
        let slice = self.take(field)?;
        if slice == expected {
            Ok(())
        } else {
            Err(FieldError::new(field.name, slice, kind))
        }
    }

    pub fn alpha(&mut self, field: &Field) -> Result<String, FieldError> {
        self.take(field).map(decode_alpha)
    }

    pub fn numeric(&mut self, field: &Field) -> Result<u64, FieldError> {
        let slice = self.take(field)?;
        decode_numeric(field, slice)
    }

    /// Consumes a numeric field that must fit in `T`.
    pub fn numeric_as<T: TryFrom<u64>>(&mut self, field: &Field) -> Result<T, FieldError> {
        let value = self.numeric(field)?;
        T::try_from(value).map_err(|_| FieldError::new(field.name, value, FieldErrorKind::TooLarge))
    }
}

/// Builds one record line field by field.
#[derive(Default)]
pub struct FieldWriter {
    buf: String,
}

impl FieldWriter {
    pub fn new() -> Self {
        FieldWriter {
            buf: String::with_capacity(RECORD_LENGTH),
        }
    }

    /// Appends text, which must be printable ASCII.
    pub fn alpha(&mut self, field: &Field, value: &str) -> Result<&mut Self, FieldError> {
        check_alphanumeric(field, value)?;
        self.buf.push_str(&encode_alpha(value, field.width));
        Ok(self)
    }

    pub fn numeric(&mut self, field: &Field, value: u64) -> Result<&mut Self, FieldError> {
        self.buf.push_str(&encode_numeric(field, value)?);
        Ok(self)
    }

    /// Takes the finished line. A layout that does not add up to
    /// [`RECORD_LENGTH`] bytes is a `Length` error.
    pub fn finish(&mut self) -> Result<String, FieldError> {
        if self.buf.len() != RECORD_LENGTH {
            return Err(FieldError::new("Record", self.buf.len(), FieldErrorKind::Length));
        }
        Ok(std::mem::take(&mut self.buf))
    }
}
