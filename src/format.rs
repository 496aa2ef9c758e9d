//! Human-readable rendering of reading values.

use crate::reading::SensorReading;
use std::env;
use std::fmt;
use std::sync::OnceLock;

/// Unit that marks a reading as elapsed seconds.
pub const DURATION_UNIT: &str = "s";

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Languages whose locales write decimals with a comma.
const COMMA_LANGUAGES: &[&str] = &[
    "bg", "ca", "cs", "da", "de", "el", "es", "et", "fi", "fr", "hr", "hu", "id", "is", "it",
    "lt", "lv", "nb", "nl", "nn", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sr", "sv", "tr",
    "uk", "vi",
];

/// Character placed between the integer and fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DecimalSeparator {
    /// `23.5`
    #[default]
    Point,
    /// `23,5`
    Comma,
}

impl DecimalSeparator {
    /// Pick the separator used by the process locale.
    ///
    /// Looks at `LC_ALL`, `LC_NUMERIC` and `LANG` in that order; the first
    /// non-empty one decides.
    pub fn from_env() -> Self {
        let locale = ["LC_ALL", "LC_NUMERIC", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.is_empty());

        locale.map_or(Self::Point, |locale| Self::from_locale(&locale))
    }

    /// Separator of the process locale, resolved with [`from_env`](Self::from_env)
    /// on first use.
    pub fn current() -> Self {
        static CURRENT: OnceLock<DecimalSeparator> = OnceLock::new();
        *CURRENT.get_or_init(Self::from_env)
    }

    /// Separator for a POSIX locale name such as `de_DE.UTF-8`.
    pub fn from_locale(locale: &str) -> Self {
        let language = locale
            .split(['_', '.', '@', '-'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if COMMA_LANGUAGES.contains(&language.as_str()) {
            Self::Comma
        } else {
            Self::Point
        }
    }
}

impl fmt::Display for DecimalSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalSeparator::Point => write!(f, "point"),
            DecimalSeparator::Comma => write!(f, "comma"),
        }
    }
}

/// Format a reading's value with the process locale's decimal separator.
///
/// See [`format_value_with`] and [`DecimalSeparator::current`].
pub fn format_value(reading: &SensorReading) -> String {
    format_value_with(reading, DecimalSeparator::current())
}

/// Format a reading's value followed by its unit.
///
/// Readings in seconds are rendered as a duration (`"1h 1m 1s"`); everything
/// else gets exactly `precision` fractional digits, rounded half away from
/// zero, and the unit appended without a space.
///
/// # Example
/// ```
/// use ble_advertiser_listener::SensorReading;
/// use ble_advertiser_listener::format::{DecimalSeparator, format_value_with};
///
/// let reading = SensorReading::new("Temperature", 23.4567, "°C", 1).unwrap();
/// assert_eq!(format_value_with(&reading, DecimalSeparator::Comma), "23,5°C");
/// ```
pub fn format_value_with(reading: &SensorReading, separator: DecimalSeparator) -> String {
    if reading.unit() == DURATION_UNIT {
        return format_duration(reading.value());
    }

    let number = fixed_decimal(reading.value(), usize::from(reading.precision()));
    let number = match separator {
        DecimalSeparator::Point => number,
        DecimalSeparator::Comma => number.replace('.', ","),
    };
    format!("{number}{}", reading.unit())
}

/// Render elapsed seconds as `"45s"` or `"1d 2h 3m 4s"`.
///
/// Below one minute the value is rounded half away from zero to whole seconds. From one minute on
/// it is truncated and split into days, hours, minutes and seconds; a segment
/// is shown when it is non-zero or a larger segment precedes it, except the
/// seconds segment which is dropped when zero.
pub fn format_duration(seconds: f64) -> String {
    if seconds < SECONDS_PER_MINUTE as f64 {
        return format!("{}s", fixed_decimal(seconds, 0));
    }

    // Saturating cast, values beyond u64 are not meaningful uptimes
    let total = seconds as u64;
    let days = total / SECONDS_PER_DAY;
    let hours = total % SECONDS_PER_DAY / SECONDS_PER_HOUR;
    let minutes = total % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;
    let secs = total % SECONDS_PER_MINUTE;

    let mut segments = Vec::with_capacity(4);
    if days > 0 {
        segments.push(format!("{days}d"));
    }
    if hours > 0 || !segments.is_empty() {
        segments.push(format!("{hours}h"));
    }
    if minutes > 0 || !segments.is_empty() {
        segments.push(format!("{minutes}m"));
    }
    if secs > 0 || segments.is_empty() {
        segments.push(format!("{secs}s"));
    }

    segments.join(" ")
}

/// Render `value` with exactly `digits` fractional digits.
///
/// Rounds half away from zero on the shortest decimal representation of
/// `value`, so `0.125` becomes `"0.13"` even though the nearest `f64` lies
/// slightly below it.
fn fixed_decimal(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format!("{value:.digits$}");
    }

    // `Display` for f64 never uses exponent notation
    let shortest = format!("{}", value.abs());
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    let mut kept: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).collect();
    kept.truncate(int_part.len() + digits.min(frac_part.len()));
    kept.resize(int_part.len() + digits, b'0');

    let mut int_len = int_part.len();
    if frac_part.as_bytes().get(digits).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
            int_len += 1;
        }
    }

    let mut out = String::with_capacity(kept.len() + 2);
    if value.is_sign_negative() {
        out.push('-');
    }
    for (i, digit) in kept.iter().enumerate() {
        if i == int_len {
            out.push('.');
        }
        out.push(char::from(*digit));
    }
    out
}
