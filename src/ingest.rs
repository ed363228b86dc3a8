//! Gateway message intake
//!
//! Gateways forward each advertisement as a JSON message carrying the raw
//! payload as a hex string plus gateway/device identity, QoS and receive
//! time. This module owns that wire model and the normalization and
//! validation applied before a payload reaches the parser.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MessageError {
    #[error("message_id must be > 0")]
    InvalidMessageId,

    #[error("device_mac required")]
    MissingDeviceMac,

    #[error("payload empty")]
    EmptyPayload,

    #[error("timestamp ms required")]
    MissingTimestamp,

    #[error("payload is not hex-like")]
    PayloadNotHex,

    #[error("payload must be hex: {0}")]
    PayloadHex(#[from] hex::FromHexError),
}

/// One advertisement as forwarded by a gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub message_id: i64,
    pub gateway_mac: String,
    pub gateway_hw: String,
    pub device_mac: String,
    /// Raw advertisement payload, hex encoded.
    pub payload: String,
    pub qos: i32,
    /// Receive time in epoch milliseconds.
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
}

impl GatewayMessage {
    /// Normalise identities and payload in place.
    ///
    /// Device MACs compare lowercase downstream, gateway MACs uppercase;
    /// both lose their `:`/`-`/`.` separators and spaces.
    pub fn normalize(&mut self) {
        self.device_mac = strip_mac_separators(&self.device_mac).to_lowercase();
        self.gateway_mac = strip_mac_separators(&self.gateway_mac).to_uppercase();
        self.payload = self.payload.trim().to_string();
    }

    /// Validate the message before any decoding work.
    pub fn validate(&self) -> Result<(), MessageError> {
        if self.message_id <= 0 {
            return Err(MessageError::InvalidMessageId);
        }
        if self.device_mac.is_empty() {
            return Err(MessageError::MissingDeviceMac);
        }
        if self.payload.is_empty() {
            return Err(MessageError::EmptyPayload);
        }
        if self.timestamp <= 0 {
            return Err(MessageError::MissingTimestamp);
        }
        if !is_likely_hex(&self.payload) {
            return Err(MessageError::PayloadNotHex);
        }
        Ok(())
    }

    /// Decode the hex payload into raw advertisement bytes.
    pub fn payload_bytes(&self) -> Result<Vec<u8>, MessageError> {
        Ok(hex::decode(self.payload.trim())?)
    }

    /// Bounded head of the payload for log lines.
    pub fn payload_preview(&self, max_chars: usize) -> &str {
        if max_chars == 0 || self.payload.len() <= max_chars {
            return &self.payload;
        }
        self.payload.get(..max_chars).unwrap_or(&self.payload)
    }

    /// Receive time as UTC, when the epoch-millisecond timestamp is valid.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

fn strip_mac_separators(mac: &str) -> String {
    mac.chars()
        .filter(|c| !matches!(c, ':' | '-' | '.' | ' '))
        .collect()
}

/// Fast hex-shape check: even length, hex digits only.
fn is_likely_hex(s: &str) -> bool {
    !s.is_empty() && s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}
