//! Legacy fixed-schema payload format.
//!
//! ```text
//! [vendor id: FF FF][count: u16 BE][raw: u16 BE] * count
//! ```
//!
//! Labels, units and scaling are implied by position.

use super::{DecodeError, Reader, scale};
use crate::reading::SensorReading;
use std::time::SystemTime;

/// Highest sensor count accepted in a legacy payload.
pub const MAX_SENSORS: u16 = 10;

/// Fixed properties of one sensor slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub label: &'static str,
    pub unit: &'static str,
    /// Decimal digits shown when formatting
    pub precision: u8,
    /// `value = raw × 10^-scale_exponent`
    pub scale_exponent: u8,
}

const fn slot(
    label: &'static str,
    unit: &'static str,
    precision: u8,
    scale_exponent: u8,
) -> SlotSpec {
    SlotSpec {
        label,
        unit,
        precision,
        scale_exponent,
    }
}

/// Sensor slots in wire order.
pub static SLOTS: [SlotSpec; MAX_SENSORS as usize] = [
    slot("Temperature", "°C", 1, 2),
    slot("Humidity", "%", 1, 2),
    slot("Pressure", "hPa", 1, 2),
    slot("CO2", "ppm", 0, 2),
    slot("PM1.0", "µg/m³", 1, 2),
    slot("PM2.5", "µg/m³", 1, 2),
    slot("PM10.0", "µg/m³", 1, 2),
    slot("IAQ", "", 0, 2),
    slot("Battery", "V", 2, 2),
    // No sensor is assigned to the last slot
    slot("Sensor9", "", 2, 0),
];

/// Decode a legacy payload into one reading per slot, all captured now.
///
/// # Errors
/// - [`DecodeError::UnknownVendorId`] if the payload does not start with `FF FF`
/// - [`DecodeError::InvalidSensorCount`] if the count is outside `1..=10`
/// - [`DecodeError::TruncatedPayload`] if the count or any value is missing
pub fn parse_legacy(payload: &[u8]) -> Result<Vec<SensorReading>, DecodeError> {
    parse_legacy_at(payload, SystemTime::now())
}

pub(crate) fn parse_legacy_at(
    payload: &[u8],
    captured_at: SystemTime,
) -> Result<Vec<SensorReading>, DecodeError> {
    let mut reader = Reader::new(payload);
    reader.vendor_id()?;

    let count = reader.u16_be()?;
    if count == 0 || count > MAX_SENSORS {
        return Err(DecodeError::InvalidSensorCount(count));
    }
    reader.require(usize::from(count) * 2)?;

    SLOTS[..usize::from(count)]
        .iter()
        .map(|slot| {
            let raw = reader.u16_be()?;
            SensorReading::captured(
                slot.label,
                scale(f64::from(raw), slot.scale_exponent),
                slot.unit,
                slot.precision,
                captured_at,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::legacy_payload;
    use std::time::Duration;

    #[test]
    fn test_parse_legacy_full_payload() {
        let payload = legacy_payload(&[2345, 5010, 10132, 41200, 120, 250, 1010, 5000, 331]);
        let readings = parse_legacy(&payload).unwrap();

        let labels: Vec<&str> = readings.iter().map(SensorReading::label).collect();
        assert_eq!(
            labels,
            [
                "Temperature",
                "Humidity",
                "Pressure",
                "CO2",
                "PM1.0",
                "PM2.5",
                "PM10.0",
                "IAQ",
                "Battery"
            ]
        );

        assert_eq!(readings[0].value(), 23.45);
        assert_eq!(readings[0].unit(), "°C");
        assert_eq!(readings[0].precision(), 1);
        assert_eq!(readings[2].value(), 101.32);
        assert_eq!(readings[3].value(), 412.0);
        assert_eq!(readings[3].precision(), 0);
        assert_eq!(readings[7].unit(), "");
        assert_eq!(readings[8].value(), 3.31);
        assert_eq!(readings[8].precision(), 2);
    }

    #[test]
    fn test_parse_legacy_partial_count() {
        let payload = legacy_payload(&[2000, 4000]);
        let readings = parse_legacy(&payload).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].label(), "Humidity");
        assert_eq!(readings[1].value(), 40.0);
    }

    #[test]
    fn test_parse_legacy_tenth_slot_is_unscaled() {
        let payload = legacy_payload(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 77]);
        let readings = parse_legacy(&payload).unwrap();
        assert_eq!(readings.len(), 10);
        assert_eq!(readings[9].label(), "Sensor9");
        assert_eq!(readings[9].value(), 77.0);
        assert_eq!(readings[9].precision(), 2);
    }

    #[test]
    fn test_parse_legacy_shares_capture_time() {
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(7);
        let readings = parse_legacy_at(&legacy_payload(&[1, 2, 3]), at).unwrap();
        assert!(readings.iter().all(|r| r.captured_at() == at));
    }

    #[test]
    fn test_parse_legacy_invalid_count() {
        let zero = [0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01];
        assert_eq!(parse_legacy(&zero), Err(DecodeError::InvalidSensorCount(0)));

        let eleven = [0xFF, 0xFF, 0x00, 0x0B, 0x00, 0x01];
        assert_eq!(
            parse_legacy(&eleven),
            Err(DecodeError::InvalidSensorCount(11))
        );
    }

    #[test]
    fn test_parse_legacy_missing_values() {
        // Count says three, only one value present
        let payload = [0xFF, 0xFF, 0x00, 0x03, 0x09, 0x29];
        assert_eq!(
            parse_legacy(&payload),
            Err(DecodeError::TruncatedPayload {
                needed: 6,
                remaining: 2
            })
        );
    }

    #[test]
    fn test_parse_legacy_missing_count() {
        assert_eq!(
            parse_legacy(&[0xFF, 0xFF, 0x01]),
            Err(DecodeError::TruncatedPayload {
                needed: 2,
                remaining: 1
            })
        );
    }

    #[test]
    fn test_parse_legacy_unknown_vendor_id() {
        let payload = [0x99, 0x04, 0x00, 0x01, 0x00, 0x01];
        assert_eq!(
            parse_legacy(&payload),
            Err(DecodeError::UnknownVendorId(0x9904))
        );
    }
}
