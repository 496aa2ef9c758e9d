//! Human readable `label: value` output.

use crate::format::{DecimalSeparator, format_value_with};
use crate::output::OutputFormatter;
use crate::reading::SensorReading;

/// Formats readings as `Temperature: 23.5°C`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisplayFormatter {
    separator: DecimalSeparator,
}

impl DisplayFormatter {
    pub fn new(separator: DecimalSeparator) -> Self {
        Self { separator }
    }
}

impl OutputFormatter for DisplayFormatter {
    fn format(&self, reading: &SensorReading) -> String {
        format!(
            "{}: {}",
            reading.label(),
            format_value_with(reading, self.separator)
        )
    }
}
