//! Per-label throttling of emitted readings.
//!
//! Sensors often advertise several times a second while their values change
//! slowly. The throttle lets at most one line per label through per interval.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Limits how often readings for each label are emitted.
///
/// Labels are tracked independently; the first reading for a label always
/// passes.
#[derive(Debug)]
pub struct Throttle {
    /// Minimum time between emitted readings of one label
    interval: Duration,
    /// When each label was last emitted
    last_emitted: HashMap<String, Instant>,
}

impl Throttle {
    /// Create a throttle with the given minimum interval per label.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use ble_advertiser_listener::throttle::Throttle;
    ///
    /// let mut throttle = Throttle::new(Duration::from_secs(3));
    /// assert!(throttle.should_emit("Temperature"));
    /// assert!(!throttle.should_emit("Temperature"));
    /// ```
    pub fn new(interval: Duration) -> Self {
        Throttle {
            interval,
            last_emitted: HashMap::new(),
        }
    }

    /// Whether a reading for `label` should be emitted now.
    ///
    /// A `true` answer restarts the interval for that label; a `false` answer
    /// leaves it untouched.
    pub fn should_emit(&mut self, label: &str) -> bool {
        self.should_emit_at(label, Instant::now())
    }

    fn should_emit_at(&mut self, label: &str, now: Instant) -> bool {
        match self.last_emitted.get(label) {
            Some(last) if now.duration_since(*last) < self.interval => false,
            _ => {
                self.last_emitted.insert(label.to_string(), now);
                true
            }
        }
    }
}

/// Parse a duration from a human-readable string.
///
/// Supports the following suffixes:
/// - `s` or no suffix: seconds
/// - `m`: minutes
/// - `h`: hours
/// - `ms`: milliseconds
///
/// # Examples
/// ```
/// use ble_advertiser_listener::throttle::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
/// assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// ```
pub fn parse_duration(src: &str) -> Result<Duration, String> {
    let src = src.trim();

    if src.is_empty() {
        return Err("empty duration string".to_string());
    }

    let number = |num: &str, what: &str| -> Result<u64, String> {
        num.trim()
            .parse()
            .map_err(|_| format!("invalid {what}: {num}"))
    };

    // "ms" must be tried before "m" and "s"
    if let Some(num) = src.strip_suffix("ms") {
        return Ok(Duration::from_millis(number(num, "milliseconds")?));
    }
    if let Some(num) = src.strip_suffix('h') {
        return Ok(Duration::from_secs(number(num, "hours")? * 3600));
    }
    if let Some(num) = src.strip_suffix('m') {
        return Ok(Duration::from_secs(number(num, "minutes")? * 60));
    }
    if let Some(num) = src.strip_suffix('s') {
        return Ok(Duration::from_secs(number(num, "seconds")?));
    }

    Ok(Duration::from_secs(number(src, "duration")?))
}
