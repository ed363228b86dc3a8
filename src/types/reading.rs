//! Decoded reading envelope
//!
//! Every decoded frame shares one envelope: message kind, timestamp, device
//! identity and optional signal strength. The frame-specific sensor fields
//! ride along as a flattened per-frame-kind structure, so the serialised
//! form is a single flat mapping of field name to value, the shape the
//! persistence and publishing layers store verbatim.

use serde::Serialize;

/// Caller-supplied context for one decode invocation.
///
/// The hardware family and device name come from the device directory; the
/// timestamp and signal strength from the gateway message. The core never
/// fetches any of these itself.
#[derive(Clone, Debug)]
pub struct ReadingContext {
    /// Receive time in epoch milliseconds.
    pub timestamp: i64,
    /// Device MAC identity, separators already stripped.
    pub mac: String,
    /// Device display name.
    pub device_name: String,
    /// Received signal strength, when the gateway reports one.
    pub rssi: Option<i32>,
}

/// One decoded advertisement frame.
#[derive(Clone, Debug, Serialize)]
pub struct Reading {
    /// Decoder-assigned kind tag, e.g. `"h4pro-t&h"`.
    pub message_type: &'static str,
    pub timestamp: i64,
    /// Uppercase hex MAC, no separators.
    pub mac: String,
    pub device_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
    #[serde(flatten)]
    pub fields: FrameFields,
}

impl Reading {
    /// Assemble the envelope around decoder-specific fields.
    pub fn new(message_type: &'static str, ctx: &ReadingContext, fields: FrameFields) -> Self {
        Self {
            message_type,
            timestamp: ctx.timestamp,
            mac: ctx.mac.to_uppercase(),
            device_name: ctx.device_name.clone(),
            rssi: ctx.rssi,
            fields,
        }
    }

    /// Serialise to the flat JSON mapping consumed downstream.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Frame-kind specific sensor fields.
///
/// Serialises untagged: the variant's fields land directly in the flat
/// envelope mapping.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum FrameFields {
    TempHumidity(TempHumidityFields),
    Info(InfoFields),
}

/// Sensor fields of the temperature & humidity frame.
///
/// Every field is optional: a truncated payload yields a reading with the
/// fields gathered up to the truncation point and nothing else.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TempHumidityFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adv_interval_steps: Option<u8>,
    /// Advertising interval in milliseconds (100 ms per step).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adv_interval_ms: Option<u32>,
    /// Degrees Celsius, one decimal place, signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Relative humidity percentage, one decimal place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Battery voltage in millivolts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batt_vol: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<u8>,
}

/// Status fields of the info frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InfoFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adv_interval_steps: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adv_interval_ms: Option<u32>,
    /// Battery voltage in millivolts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batt_vol: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_prop: Option<u8>,
    /// 8-digit binary rendering of `device_prop`, most significant bit first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_prop_bits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_status: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_status_bits: Option<String>,
    /// Firmware version rendered `"V0.0.<n>"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_ver: Option<String>,
}
