//! Output formatters for decoded readings.
//!
//! This module provides a trait for turning a reading into one output line and
//! implementations for a human display format and InfluxDB line protocol.

pub mod display;
pub mod influxdb;

use crate::reading::SensorReading;
use std::fmt;

/// Trait for formatting readings into output lines.
pub trait OutputFormatter: Send + Sync {
    /// Format a reading (including its capture time where the format needs it).
    fn format(&self, reading: &SensorReading) -> String;
}

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputKind {
    /// `Temperature: 23.5°C`
    #[default]
    Display,
    /// InfluxDB line protocol (Telegraf compatible)
    Influxdb,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Display => write!(f, "display"),
            OutputKind::Influxdb => write!(f, "influxdb"),
        }
    }
}
