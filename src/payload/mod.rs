//! Manufacturer payload decoding.
//!
//! Two wire formats share the same `0xFF 0xFF` vendor id prefix and cannot be
//! told apart reliably from their bytes, so the caller always names the format
//! with [`PayloadFormat`].

pub mod legacy;
pub mod self_describing;

use crate::advertisement;
use crate::reading::SensorReading;
use std::fmt;
use thiserror::Error;

pub use legacy::parse_legacy;
pub use self_describing::parse;

/// Vendor id expected at the start of every manufacturer payload.
pub const VENDOR_ID: [u8; 2] = [0xFF, 0xFF];

/// Error types for decoding advertisements and manufacturer payloads.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Advertisement is too short, structurally broken or carries no vendor record
    #[error("Malformed advertisement: {0}")]
    MalformedAdvertisement(String),
    /// Payload does not start with the expected vendor id
    #[error("Unknown vendor id: {0:#06X}")]
    UnknownVendorId(u16),
    /// Payload ended before a fixed-size field
    #[error("Truncated payload: needed {needed} bytes, {remaining} remaining")]
    TruncatedPayload { needed: usize, remaining: usize },
    /// A length-prefixed field does not fit in the payload
    #[error("Invalid {field} length: {length} bytes declared, {remaining} remaining")]
    InvalidFieldLength {
        field: Field,
        length: usize,
        remaining: usize,
    },
    /// Legacy sensor count outside 1..=10
    #[error("Invalid sensor count: {0} (expected 1..={max})", max = legacy::MAX_SENSORS)]
    InvalidSensorCount(u16),
    /// Reading constructed without a label
    #[error("Sensor label is empty")]
    EmptyLabel,
}

/// Length-prefixed text fields of the self-describing format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Label,
    Unit,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Label => write!(f, "label"),
            Field::Unit => write!(f, "unit"),
        }
    }
}

/// Convenience alias for decoded readings or decode errors.
pub type DecodeResult = Result<Vec<SensorReading>, DecodeError>;

/// Manufacturer payload wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PayloadFormat {
    /// One labeled reading with its own unit and precision
    #[default]
    SelfDescribing,
    /// Fixed-order list of up to ten 16-bit readings
    Legacy,
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadFormat::SelfDescribing => write!(f, "self-describing"),
            PayloadFormat::Legacy => write!(f, "legacy"),
        }
    }
}

/// Decode a manufacturer payload in the given format.
///
/// The self-describing format always yields exactly one reading.
pub fn decode(format: PayloadFormat, payload: &[u8]) -> DecodeResult {
    match format {
        PayloadFormat::SelfDescribing => parse(payload).map(|reading| vec![reading]),
        PayloadFormat::Legacy => parse_legacy(payload),
    }
}

/// Locate the vendor record in a raw advertisement and decode it.
pub fn decode_advertisement(format: PayloadFormat, buffer: &[u8]) -> DecodeResult {
    let payload = advertisement::scan(buffer)?;
    decode(format, payload)
}

/// Bounds-checked big-endian reader over a payload.
#[derive(Debug)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fail with `TruncatedPayload` unless `needed` bytes remain.
    pub(crate) fn require(&self, needed: usize) -> Result<(), DecodeError> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(DecodeError::TruncatedPayload { needed, remaining });
        }
        Ok(())
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.require(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u16_be(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn i32_be(&mut self) -> Result<i32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a length-prefixed text field.
    pub(crate) fn text(&mut self, field: Field) -> Result<String, DecodeError> {
        let length = self.u8()? as usize;
        let remaining = self.remaining();
        if length > remaining || (field == Field::Label && length == 0) {
            return Err(DecodeError::InvalidFieldLength {
                field,
                length,
                remaining,
            });
        }
        let bytes = self.take(length)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Consume and check the two-byte vendor id.
    pub(crate) fn vendor_id(&mut self) -> Result<(), DecodeError> {
        let id = self.take(VENDOR_ID.len())?;
        if id != VENDOR_ID {
            return Err(DecodeError::UnknownVendorId(u16::from_be_bytes([
                id[0], id[1],
            ])));
        }
        Ok(())
    }
}

/// `raw × 10^-exponent`, computed by division so exact decimals stay exact.
pub(crate) fn scale(raw: f64, exponent: u8) -> f64 {
    raw / 10f64.powi(i32::from(exponent))
}
