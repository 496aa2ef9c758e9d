//! Core application runner (business logic) for `ble-advertiser-listener`.
//!
//! This module is intentionally decoupled from CLI parsing and process exit codes
//! so it can be tested deterministically with an injected frame source, cache
//! and output streams.

use crate::cache::ReadingCache;
use crate::format::DecimalSeparator;
use crate::input::{FrameResult, InputError};
use crate::output::display::DisplayFormatter;
use crate::output::influxdb::InfluxDbFormatter;
use crate::output::{OutputFormatter, OutputKind};
use crate::payload::{DecodeError, PayloadFormat, decode_advertisement};
use crate::reading::SensorReading;
use crate::throttle::Throttle;
use clap::Parser;
use std::io;
use std::io::Write;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Configuration for the core run loop.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// Manufacturer payload format broadcast by the sensors.
    #[arg(long, default_value_t, value_enum)]
    pub format: PayloadFormat,

    /// Output line format.
    #[arg(long, default_value_t, value_enum)]
    pub output: OutputKind,

    /// The name of the measurement in InfluxDB line protocol.
    #[arg(long, default_value = "ble_advertiser")]
    pub influxdb_measurement: String,

    /// Decimal separator for display output. Defaults to the one of the
    /// current locale (LC_ALL, LC_NUMERIC or LANG).
    #[arg(long, value_enum, default_value_t = DecimalSeparator::current())]
    pub decimal_separator: DecimalSeparator,

    /// Throttle output per sensor label to at most one line per interval.
    /// Accepts duration with suffix: 3s, 1m, 500ms, 2h.
    /// Without suffix, value is interpreted as seconds.
    #[arg(long, value_parser = crate::throttle::parse_duration)]
    pub throttle: Option<Duration>,

    /// Forget cached readings older than this duration.
    #[arg(long, value_parser = crate::throttle::parse_duration)]
    pub max_age: Option<Duration>,

    /// Print every cached reading, sorted by label, when input ends.
    #[arg(long)]
    pub summary: bool,

    /// Verbose output, print errors for unrecognized data
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Options {
    fn formatter(&self) -> Box<dyn OutputFormatter> {
        match self.output {
            OutputKind::Display => Box::new(DisplayFormatter::new(self.decimal_separator)),
            OutputKind::Influxdb => {
                Box::new(InfluxDbFormatter::new(self.influxdb_measurement.clone()))
            }
        }
    }
}

/// Errors returned by the core run loop.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Why a single frame produced no readings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Source of raw advertisement frames, injectable for tests.
pub trait FrameSource: Send + Sync {
    fn frames(&self) -> mpsc::Receiver<FrameResult>;
}

/// Frames read as hex lines from the process's standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl FrameSource for StdinSource {
    fn frames(&self) -> mpsc::Receiver<FrameResult> {
        crate::input::read_frames(tokio::io::stdin())
    }
}

fn decode_frame(format: PayloadFormat, frame: FrameResult) -> Result<Vec<SensorReading>, FrameError> {
    let bytes = frame?;
    Ok(decode_advertisement(format, &bytes)?)
}

fn write_reading(
    formatter: &dyn OutputFormatter,
    reading: &SensorReading,
    out: &mut dyn Write,
) -> io::Result<()> {
    let line = formatter.format(reading);
    writeln!(out, "{line}")
}

/// Run the core processing loop, writing formatted output to `out` and verbose errors to `err`.
///
/// - Every decoded reading is stored in `cache`.
/// - Readings that pass the optional throttle are formatted and written to `out`.
/// - With `max_age` set, stale cache entries are evicted after each frame.
/// - Frame errors are written to `err` only when `options.verbose` is true.
/// - With `summary` set, the cache snapshot is written to `out` at end of input.
pub async fn run_with_io(
    options: Options,
    source: &dyn FrameSource,
    cache: &ReadingCache,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), RunError> {
    let formatter = options.formatter();
    let mut throttle = options.throttle.map(Throttle::new);

    info!(format = %options.format, output = %options.output, "listening for advertisements");
    let mut frames = source.frames();
    let mut decoded = 0usize;
    let mut rejected = 0usize;

    while let Some(frame) = frames.recv().await {
        match decode_frame(options.format, frame) {
            Ok(readings) => {
                for reading in readings {
                    decoded += 1;
                    debug!(label = reading.label(), value = reading.value(), "decoded reading");

                    let should_emit = throttle
                        .as_mut()
                        .is_none_or(|t| t.should_emit(reading.label()));
                    if should_emit {
                        write_reading(formatter.as_ref(), &reading, out)?;
                    }

                    cache.put(reading);
                }
            }
            Err(frame_err) => {
                rejected += 1;
                debug!(error = %frame_err, "rejected frame");
                if options.verbose {
                    writeln!(err, "{frame_err}")?;
                }
            }
        }

        if let Some(max_age) = options.max_age {
            cache.evict(max_age);
        }
    }

    info!(decoded, rejected, cached = cache.len(), "input ended");

    if options.summary {
        let mut snapshot = cache.snapshot();
        snapshot.sort_by(|a, b| a.label().cmp(b.label()));
        for reading in &snapshot {
            write_reading(formatter.as_ref(), reading, out)?;
        }
    }

    Ok(())
}
