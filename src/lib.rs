//! `ble-advertiser-listener` library.
//!
//! Decodes sensor readings broadcast in BLE manufacturer-specific advertisement
//! data, formats them for display or InfluxDB and keeps the latest reading per
//! label in a concurrent cache.
//!
//! The binary (`src/main.rs`) is responsible for CLI parsing, logging setup and
//! process exit codes. The core “business logic” lives in [`crate::app`] where it
//! can be tested deterministically with an injected frame source, cache and
//! output streams.

pub mod advertisement;
pub mod app;
pub mod cache;
pub mod format;
pub mod input;
pub mod output;
pub mod payload;
pub mod reading;
pub mod throttle;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types at the crate root
pub use advertisement::scan;
pub use cache::ReadingCache;
pub use format::{DecimalSeparator, format_duration, format_value};
pub use output::display::DisplayFormatter;
pub use output::influxdb::InfluxDbFormatter;
pub use output::{OutputFormatter, OutputKind};
pub use payload::{DecodeError, PayloadFormat, decode, decode_advertisement, parse, parse_legacy};
pub use reading::SensorReading;
pub use throttle::{Throttle, parse_duration};
