//! Callback event envelope
//!
//! Decoded readings fan out to subscriber callbacks through an external
//! publishing layer. This module owns the event shape and the event-type
//! derivation; delivery is someone else's job.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::ingest::GatewayMessage;
use crate::parser::ParsedAdvertisement;
use crate::types::Reading;

/// Event emitted for one decoded advertisement.
///
/// Field names follow the established subscriber contract.
#[derive(Clone, Debug, Serialize)]
pub struct CallbackEvent {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub gateway_id: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    #[serde(rename = "BackendID")]
    pub backend_id: i64,
}

impl CallbackEvent {
    /// Build the event for a decoded reading.
    ///
    /// The parsed reading is embedded under `parsed_json` next to the raw
    /// payload, service UUID and frame-type code, so subscribers can audit
    /// the source bytes without another lookup.
    pub fn new(
        message: &GatewayMessage,
        hardware_family: &str,
        parsed: &ParsedAdvertisement,
    ) -> Result<Self, serde_json::Error> {
        let mut data = Map::new();
        data.insert("parsed_json".into(), parsed.reading.to_json()?);
        data.insert("raw_data".into(), Value::String(message.payload.clone()));
        data.insert("uuid".into(), Value::String(parsed.uuid_hex()));
        data.insert("frame_type".into(), Value::String(parsed.frame_type_hex()));
        if let Some(rssi) = message.rssi {
            data.insert("rssi".into(), Value::from(rssi));
        }

        Ok(Self {
            device_id: message.device_mac.to_uppercase(),
            event_type: derive_event_type(
                hardware_family,
                parsed.frame_type,
                Some(&parsed.reading),
            ),
            timestamp: message.timestamp,
            gateway_id: message.gateway_mac.to_uppercase(),
            data,
            backend_id: message.message_id,
        })
    }
}

/// Event type for a decode outcome.
///
/// A reading carries its own kind tag; without one (e.g. when tagging a
/// rejection), fall back to a `family-slug/0xNN` tag.
pub fn derive_event_type(
    hardware_family: &str,
    frame_type: u8,
    reading: Option<&Reading>,
) -> String {
    match reading {
        Some(reading) => reading.message_type.to_string(),
        None => format!(
            "{}/0x{:02X}",
            device_family_slug(hardware_family),
            frame_type
        ),
    }
}

/// Minimal, predictable slug for a device family (`"H4 Pro"` -> `"h4-pro"`).
///
/// Lowercase alphanumerics survive; separator runs collapse to a single
/// dash; other punctuation is dropped.
pub fn device_family_slug(family: &str) -> String {
    let mut slug = String::with_capacity(family.len());
    for c in family.chars() {
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            'A'..='Z' => slug.push(c.to_ascii_lowercase()),
            ' ' | '_' | '-' | '/' => {
                if !slug.is_empty() && !slug.ends_with('-') {
                    slug.push('-');
                }
            }
            _ => {}
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        return "unknown".to_string();
    }
    slug
}
