//! Decoded sensor reading.

use crate::format::format_value;
use crate::payload::DecodeError;
use std::fmt;
use std::time::SystemTime;

/// A single labeled reading decoded from an advertisement.
///
/// `Display` renders `label: value` with the process locale's decimal
/// separator.
///
/// Readings are immutable: fields are only reachable through accessors and
/// "changing" a reading produces a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    label: String,
    value: f64,
    unit: String,
    precision: u8,
    captured_at: SystemTime,
}

impl SensorReading {
    /// Create a reading captured now.
    ///
    /// # Errors
    /// Returns [`DecodeError::EmptyLabel`] if `label` is empty.
    pub fn new(
        label: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        precision: u8,
    ) -> Result<Self, DecodeError> {
        Self::captured(label, value, unit, precision, SystemTime::now())
    }

    /// Create a reading with an explicit capture time.
    pub fn captured(
        label: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        precision: u8,
        captured_at: SystemTime,
    ) -> Result<Self, DecodeError> {
        let label = label.into();
        if label.is_empty() {
            return Err(DecodeError::EmptyLabel);
        }

        Ok(Self {
            label,
            value,
            unit: unit.into(),
            precision,
            captured_at,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Number of decimal digits the value was scaled by.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn captured_at(&self) -> SystemTime {
        self.captured_at
    }

    /// Copy of this reading with a different capture time.
    pub fn with_captured_at(&self, captured_at: SystemTime) -> Self {
        Self {
            captured_at,
            ..self.clone()
        }
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, format_value(self))
    }
}
