//! Advertisement structure scanning.
//!
//! A BLE advertisement is a sequence of AD structures, each laid out as
//! `[length][type][data; length - 1]`. A zero length byte terminates the
//! sequence early.

use crate::payload::DecodeError;

/// AD type for manufacturer (vendor) specific data.
pub const VENDOR_SPECIFIC_TYPE: u8 = 0xFF;

/// Shortest buffer that can hold a vendor record with any payload.
const MIN_ADVERTISEMENT_LEN: usize = 4;

/// Return the payload of the first vendor-specific AD structure in `buffer`.
///
/// The returned slice excludes the length and type bytes.
///
/// # Errors
/// Returns [`DecodeError::MalformedAdvertisement`] if the buffer is too short,
/// a record runs past the end of the buffer, or no vendor record is present.
///
/// # Example
/// ```
/// use ble_advertiser_listener::advertisement::scan;
///
/// let adv = [0x02, 0x01, 0x06, 0x03, 0xFF, 0xAA, 0xBB];
/// assert_eq!(scan(&adv).unwrap(), &[0xAA, 0xBB]);
/// ```
pub fn scan(buffer: &[u8]) -> Result<&[u8], DecodeError> {
    if buffer.len() < MIN_ADVERTISEMENT_LEN {
        return Err(DecodeError::MalformedAdvertisement(format!(
            "advertisement too short ({} bytes)",
            buffer.len()
        )));
    }

    let mut offset = 0;
    while offset < buffer.len() {
        let len = buffer[offset] as usize;
        if len == 0 {
            break;
        }

        // Record spans offset..=offset + len
        let end = offset + 1 + len;
        if end > buffer.len() {
            return Err(DecodeError::MalformedAdvertisement(format!(
                "record at offset {offset} declares {len} bytes, only {} remain",
                buffer.len() - offset - 1
            )));
        }

        if buffer[offset + 1] == VENDOR_SPECIFIC_TYPE {
            return Ok(&buffer[offset + 2..end]);
        }

        offset = end;
    }

    Err(DecodeError::MalformedAdvertisement(
        "no manufacturer data found in advertisement".into(),
    ))
}
