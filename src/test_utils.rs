use crate::advertisement::VENDOR_SPECIFIC_TYPE;
use crate::payload::VENDOR_ID;
use crate::reading::SensorReading;
use std::time::SystemTime;

/// Encode a self-describing manufacturer payload.
pub fn self_describing_payload(label: &str, unit: &str, precision: u8, raw: i32) -> Vec<u8> {
    let mut payload = VENDOR_ID.to_vec();
    payload.push(label.len() as u8);
    payload.extend_from_slice(label.as_bytes());
    payload.push(unit.len() as u8);
    payload.extend_from_slice(unit.as_bytes());
    payload.push(precision);
    payload.extend_from_slice(&raw.to_be_bytes());
    payload
}

/// Encode a legacy fixed-schema manufacturer payload.
pub fn legacy_payload(raw_values: &[u16]) -> Vec<u8> {
    let mut payload = VENDOR_ID.to_vec();
    payload.extend_from_slice(&(raw_values.len() as u16).to_be_bytes());
    for raw in raw_values {
        payload.extend_from_slice(&raw.to_be_bytes());
    }
    payload
}

/// Put a manufacturer payload behind a flags record, like a real advertisement.
pub fn wrap_in_advertisement(payload: &[u8]) -> Vec<u8> {
    let mut adv = vec![0x02, 0x01, 0x06];
    adv.push(payload.len() as u8 + 1);
    adv.push(VENDOR_SPECIFIC_TYPE);
    adv.extend_from_slice(payload);
    adv
}

/// Hex line for an advertisement, as the listener reads it from stdin.
pub fn hex_line(adv: &[u8]) -> String {
    adv.iter().map(|b| format!("{b:02X}")).collect()
}

/// Build a unitless reading with a fixed capture time.
pub fn reading_at(label: &str, value: f64, captured_at: SystemTime) -> SensorReading {
    SensorReading::captured(label, value, "", 1, captured_at).unwrap()
}
