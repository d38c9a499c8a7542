//! Framing for lines emitted by the reader.
//!
//! The reader writes one scan per line as `<id>,<rfid>`. Whitespace around
//! either field is ignored, and `<id> <rfid>` is accepted as well since some
//! sketches print with a space instead of a comma.

use crate::error::BridgeError;

/// One scan as read off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLine {
    pub id: String,
    pub rfid: String,
}

/// Parses a single line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns `BridgeError::MalformedLine` unless the line holds exactly two
/// non-empty fields.
pub fn parse_line(line: &str) -> Result<Option<ScanLine>, BridgeError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    };

    match fields.as_slice() {
        [id, rfid] if !id.is_empty() && !rfid.is_empty() => Ok(Some(ScanLine {
            id: (*id).to_string(),
            rfid: (*rfid).to_string(),
        })),
        _ => Err(BridgeError::MalformedLine(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(id: &str, rfid: &str) -> Option<ScanLine> {
        Some(ScanLine {
            id: id.to_string(),
            rfid: rfid.to_string(),
        })
    }

    #[test]
    fn parses_comma_separated_line() {
        assert_eq!(parse_line("1,84DBBD5A").unwrap(), scan("1", "84DBBD5A"));
    }

    #[test]
    fn trims_fields_and_line_endings() {
        assert_eq!(parse_line("  7 , AAAA \r\n").unwrap(), scan("7", "AAAA"));
    }

    #[test]
    fn accepts_space_separated_line() {
        assert_eq!(parse_line("door-2\tBBBB").unwrap(), scan("door-2", "BBBB"));
    }

    #[test]
    fn blank_line_is_skipped() {
        assert_eq!(parse_line("   \r").unwrap(), None);
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        for line in ["AAAA", "1,2,3", "1,", ",AAAA", "a b c"] {
            assert!(
                matches!(parse_line(line), Err(BridgeError::MalformedLine(_))),
                "line {line:?} should be malformed"
            );
        }
    }
}
