//! Hex-encoded advertisement frames read line by line.
//!
//! The listener does not talk to a Bluetooth adapter itself. Any scanner that
//! can print raw advertisement data as hex (one advertisement per line) can
//! be piped into it.

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Channel buffer size for frames read from input.
pub const FRAME_CHANNEL_BUFFER_SIZE: usize = 100;

/// Errors for malformed input lines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Line contains a character that is not a hex digit or separator
    #[error("Invalid hex in line {line}: unexpected '{found}'")]
    InvalidHex { line: usize, found: char },
    /// Line has an odd number of hex digits
    #[error("Invalid hex in line {line}: odd number of digits ({digits})")]
    OddLength { line: usize, digits: usize },
    /// Reading the input failed
    #[error("Input error: {0}")]
    Io(String),
}

/// Convenience alias for raw frames or input errors.
pub type FrameResult = Result<Vec<u8>, InputError>;

/// Parse one input line into frame bytes.
///
/// Accepts upper or lower case digits, an optional `0x` prefix and `:`, `-`
/// or whitespace between bytes. Blank lines and `#` comments yield `None`.
///
/// # Example
/// ```
/// use ble_advertiser_listener::input::parse_hex_frame;
///
/// assert_eq!(parse_hex_frame("02:01:06", 1).unwrap(), Some(vec![0x02, 0x01, 0x06]));
/// assert_eq!(parse_hex_frame("# comment", 2).unwrap(), None);
/// ```
pub fn parse_hex_frame(line: &str, line_number: usize) -> Result<Option<Vec<u8>>, InputError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let line = line
        .strip_prefix("0x")
        .or_else(|| line.strip_prefix("0X"))
        .unwrap_or(line);

    let digits = line
        .chars()
        .filter(|c| !(c.is_whitespace() || *c == ':' || *c == '-'))
        .map(|c| {
            c.to_digit(16).map(|d| d as u8).ok_or(InputError::InvalidHex {
                line: line_number,
                found: c,
            })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    if digits.len() % 2 != 0 {
        return Err(InputError::OddLength {
            line: line_number,
            digits: digits.len(),
        });
    }

    Ok(Some(
        digits
            .chunks_exact(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect(),
    ))
}

/// Read frames from `reader` in a background task.
///
/// Frames (or per-line errors) are delivered through the returned channel in
/// input order. The channel closes at end of input or after a read error.
pub fn read_frames<R>(reader: R) -> mpsc::Receiver<FrameResult>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(FRAME_CHANNEL_BUFFER_SIZE);

    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        let mut line_number = 0;

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "stopped reading input");
                    let _ = tx.send(Err(InputError::Io(e.to_string()))).await;
                    break;
                }
            };
            line_number += 1;

            let frame = match parse_hex_frame(&line, line_number) {
                Ok(Some(frame)) => Ok(frame),
                Ok(None) => continue,
                Err(e) => Err(e),
            };
            if tx.send(frame).await.is_err() {
                // Receiver dropped, nobody is listening anymore
                break;
            }
        }

        debug!(lines = line_number, "input closed");
    });

    rx
}
