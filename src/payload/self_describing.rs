//! Self-describing payload format (current protocol).
//!
//! ```text
//! [vendor id: FF FF][label len][label][unit len][unit][precision][raw: i32 BE]
//! ```

use super::{DecodeError, Field, Reader, scale};
use crate::reading::SensorReading;
use std::time::SystemTime;

/// Length prefixes, precision and the first value byte must follow the vendor id.
const MIN_BODY_LEN: usize = 4;

/// Decode a self-describing payload into a single reading captured now.
///
/// # Errors
/// - [`DecodeError::UnknownVendorId`] if the payload does not start with `FF FF`
/// - [`DecodeError::InvalidFieldLength`] if the label or unit overruns the payload,
///   or the label is empty
/// - [`DecodeError::TruncatedPayload`] if any fixed-size field is missing
///
/// # Example
/// ```
/// use ble_advertiser_listener::payload::parse;
///
/// let payload = [
///     0xFF, 0xFF, 0x04, b'T', b'e', b'm', b'p', 0x02, 0xC2, 0xB0, 0x01, 0x00, 0x00, 0x00,
///     0xEA,
/// ];
/// let reading = parse(&payload).unwrap();
/// assert_eq!(reading.label(), "Temp");
/// assert_eq!(reading.value(), 23.4);
/// ```
pub fn parse(payload: &[u8]) -> Result<SensorReading, DecodeError> {
    parse_at(payload, SystemTime::now())
}

pub(crate) fn parse_at(
    payload: &[u8],
    captured_at: SystemTime,
) -> Result<SensorReading, DecodeError> {
    let mut reader = Reader::new(payload);
    reader.vendor_id()?;
    reader.require(MIN_BODY_LEN)?;

    let label = reader.text(Field::Label)?;
    let unit = reader.text(Field::Unit)?;
    let precision = reader.u8()?;
    let raw = reader.i32_be()?;

    let value = scale(f64::from(raw), precision);
    SensorReading::captured(label, value, unit, precision, captured_at)
}
