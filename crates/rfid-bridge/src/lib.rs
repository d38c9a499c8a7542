//! Reader bridge: forwards line-framed scans from the reader to the relay.
//!
//! The reader (a microcontroller on a serial link) prints one scan per line.
//! The bridge reads those lines from the device, submits each to the relay
//! server's ingestion endpoint, and logs the reply. A line that cannot be
//! parsed or a submission that fails is logged and skipped; the loop only
//! stops when the device reaches end of file or errors.

pub mod client;
pub mod config;
mod error;
pub mod line;

pub use client::{ReaderReply, ScanClient};
pub use error::BridgeError;
pub use line::{parse_line, ScanLine};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Counters reported when the input ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub accepted: u64,
    pub rejected: u64,
    pub malformed: u64,
    pub failed: u64,
}

/// Reads lines from `reader` until end of input, submitting each scan.
///
/// # Errors
///
/// Returns `BridgeError::Io` if reading from the device fails. Lines that
/// are not UTF-8, lines that do not parse, and failed submissions are
/// counted, not returned.
pub async fn forward_lines<R>(
    mut reader: R,
    client: &ScanClient,
) -> Result<BridgeStats, BridgeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = BridgeStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        // Serial line noise (e.g. at reader power-up) must not end the loop.
        let raw = match std::str::from_utf8(&buf) {
            Ok(raw) => raw,
            Err(_) => {
                tracing::warn!(
                    line = %String::from_utf8_lossy(&buf).trim_end(),
                    "skipping non-UTF-8 reader line"
                );
                stats.malformed += 1;
                continue;
            }
        };

        let scan = match parse_line(raw) {
            Ok(Some(scan)) => scan,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("skipping reader line: {}", e);
                stats.malformed += 1;
                continue;
            }
        };

        match client.submit(&scan).await {
            Ok(reply) => {
                tracing::info!(
                    id = %scan.id,
                    rfid = %scan.rfid,
                    reply = reply.as_str(),
                    "scan forwarded"
                );
                match reply {
                    ReaderReply::Good => stats.accepted += 1,
                    ReaderReply::Bad => stats.rejected += 1,
                }
            }
            Err(e) => {
                tracing::warn!(id = %scan.id, rfid = %scan.rfid, "failed to forward scan: {}", e);
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}
