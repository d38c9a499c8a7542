//! HTTP client submitting scans to the relay server.

use std::time::Duration;

use crate::error::BridgeError;
use crate::line::ScanLine;

/// The relay's answer to one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderReply {
    /// `GOOD*`: the tag was accepted.
    Good,
    /// `BAD*`: the tag is denylisted or the request was malformed.
    Bad,
}

impl ReaderReply {
    /// Parses a reply body. Only the text up to and including `*` matters.
    pub fn parse(body: &str) -> Option<Self> {
        let end = body.find('*')?;
        match body[..=end].trim() {
            "GOOD*" => Some(Self::Good),
            "BAD*" => Some(Self::Bad),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Bad => "BAD",
        }
    }
}

/// Submits scans to `GET {base_url}/?id=..&rfid=..`.
#[derive(Debug, Clone)]
pub struct ScanClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScanClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rfid-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one scan and parses the reply token.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Http` on transport failure and
    /// `BridgeError::UnexpectedReply` if the body is not a reply token.
    pub async fn submit(&self, scan: &ScanLine) -> Result<ReaderReply, BridgeError> {
        let resp = self
            .http
            .get(format!("{}/", self.base_url))
            .query(&[("id", scan.id.as_str()), ("rfid", scan.rfid.as_str())])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        match ReaderReply::parse(&body) {
            Some(reply) if status.is_success() => Ok(reply),
            _ => Err(BridgeError::UnexpectedReply {
                status: status.as_u16(),
                body,
            }),
        }
    }
}
