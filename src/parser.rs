//! End-to-end advertisement parsing
//!
//! Raw payload bytes go through the AD scanner, the supported-UUID gate and
//! the decoder registry to produce one typed reading. Every rejection is a
//! [`ParseError`] value carrying the context needed to diagnose the input.
//! Decoding is deterministic and pure, so retrying an identical input can
//! never change the outcome.

use thiserror::Error;

use crate::ble::{extract_service_data16, BleAdError};
use crate::decoders::{DecodeError, DecoderRegistry};
use crate::types::{Reading, ReadingContext};

/// The one service UUID this system decodes.
pub const SUPPORTED_SERVICE_UUID: u16 = 0xFEAB;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Ble(#[from] BleAdError),

    #[error("unsupported service uuid {uuid} (need FEAB)")]
    UnsupportedServiceUuid { uuid: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("payload must be hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Outcome of a successful end-to-end parse.
#[derive(Clone, Debug)]
pub struct ParsedAdvertisement {
    /// 16-bit service UUID, canonical big-endian value.
    pub uuid: u16,
    /// Vendor frame-type code.
    pub frame_type: u8,
    pub reading: Reading,
}

impl ParsedAdvertisement {
    /// Canonical uppercase hex rendering of the service UUID.
    pub fn uuid_hex(&self) -> String {
        format!("{:04X}", self.uuid)
    }

    /// Frame-type code rendered `0xNN` for logs and events.
    pub fn frame_type_hex(&self) -> String {
        format!("0x{:02X}", self.frame_type)
    }
}

/// Decode one raw advertisement for an already-resolved device.
///
/// The hardware family and the context fields are caller-supplied; directory
/// lookups happen outside the core. The registry is consulted before any
/// vendor bytes are touched, so an unknown family or frame type is rejected
/// without parsing.
pub fn parse_advertisement(
    registry: &DecoderRegistry,
    payload: &[u8],
    hardware_family: &str,
    ctx: &ReadingContext,
) -> Result<ParsedAdvertisement, ParseError> {
    let service_data = extract_service_data16(payload)?;

    if service_data.uuid != SUPPORTED_SERVICE_UUID {
        log::debug!("unsupported service uuid {}", service_data.uuid_hex());
        return Err(ParseError::UnsupportedServiceUuid {
            uuid: service_data.uuid_hex(),
        });
    }

    let decode = registry.resolve(hardware_family, service_data.frame_type)?;

    log::debug!(
        "decode enter hw={:?} frame=0x{:02X} body_len={}",
        hardware_family,
        service_data.frame_type,
        service_data.body.len()
    );

    let reading = decode(ctx, service_data.body)?;

    Ok(ParsedAdvertisement {
        uuid: service_data.uuid,
        frame_type: service_data.frame_type,
        reading,
    })
}

/// [`parse_advertisement`] for a hex-encoded payload as gateways forward it.
pub fn parse_advertisement_hex(
    registry: &DecoderRegistry,
    payload_hex: &str,
    hardware_family: &str,
    ctx: &ReadingContext,
) -> Result<ParsedAdvertisement, ParseError> {
    let payload = hex::decode(payload_hex.trim())?;
    parse_advertisement(registry, &payload, hardware_family, ctx)
}
