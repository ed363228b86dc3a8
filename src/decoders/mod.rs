//! Vendor frame decoding
//!
//! A decoder is selected by the (hardware family, frame type) pair and turns
//! a vendor payload into a typed reading. The registry is built once at
//! process start and only read afterward, so concurrent lookups need no
//! synchronization.

pub mod cursor;
pub mod moko_h4pro;

pub use cursor::FrameCursor;

use std::collections::HashMap;

use thiserror::Error;

use crate::types::{Reading, ReadingContext};

/// Decode routine for one (hardware family, frame type) pair.
///
/// The vendor payload is the service data body after the frame-type byte;
/// the context carries the caller-resolved device identity.
pub type DecodeFn = fn(&ReadingContext, &[u8]) -> Result<Reading, DecodeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no decoder for hardware family {family:?}")]
    NoDecoderForHardware { family: String },

    #[error("no decoder for frame type 0x{frame_type:02X} of hardware family {family:?}")]
    NoDecoderForFrameType { family: String, frame_type: u8 },
}

/// Registry mapping (hardware family, frame type) to a decode routine.
///
/// Unknown keys resolve to an error naming the missing combination; the
/// registry never falls back to a default decoder.
pub struct DecoderRegistry {
    families: HashMap<String, HashMap<u8, DecodeFn>>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self {
            families: HashMap::new(),
        }
    }

    /// Registry pre-loaded with every built-in hardware family.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        moko_h4pro::register(&mut registry);
        registry
    }

    /// Register a decode routine for a (family, frame type) pair.
    pub fn register(&mut self, family: impl Into<String>, frame_type: u8, decoder: DecodeFn) {
        self.families
            .entry(family.into())
            .or_default()
            .insert(frame_type, decoder);
    }

    /// Look up a decode routine; `None` when the combination is unknown.
    pub fn get(&self, family: &str, frame_type: u8) -> Option<DecodeFn> {
        self.families.get(family)?.get(&frame_type).copied()
    }

    /// Resolve a decode routine, naming the missing family or frame type.
    pub fn resolve(&self, family: &str, frame_type: u8) -> Result<DecodeFn, DecodeError> {
        let frames = self
            .families
            .get(family)
            .ok_or_else(|| DecodeError::NoDecoderForHardware {
                family: family.to_owned(),
            })?;

        frames
            .get(&frame_type)
            .copied()
            .ok_or_else(|| DecodeError::NoDecoderForFrameType {
                family: family.to_owned(),
                frame_type,
            })
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FrameFields, TempHumidityFields};

    fn stub_decoder(ctx: &ReadingContext, _body: &[u8]) -> Result<Reading, DecodeError> {
        Ok(Reading::new(
            "stub",
            ctx,
            FrameFields::TempHumidity(TempHumidityFields::default()),
        ))
    }

    fn context() -> ReadingContext {
        ReadingContext {
            timestamp: 1,
            mac: "aa".into(),
            device_name: "dev".into(),
            rssi: None,
        }
    }

    #[test]
    fn test_resolve_registered_decoder() {
        let mut registry = DecoderRegistry::new();
        registry.register("Fam", 0x01, stub_decoder);

        let decode = registry.resolve("Fam", 0x01).unwrap();
        let reading = decode(&context(), &[]).unwrap();
        assert_eq!(reading.message_type, "stub");
    }

    #[test]
    fn test_unknown_family() {
        let registry = DecoderRegistry::with_defaults();
        assert_eq!(
            registry.resolve("No Such Family", 0x70),
            Err(DecodeError::NoDecoderForHardware {
                family: "No Such Family".into()
            })
        );
    }

    #[test]
    fn test_unknown_frame_type_within_known_family() {
        let registry = DecoderRegistry::with_defaults();
        assert_eq!(
            registry.resolve(moko_h4pro::HARDWARE_FAMILY, 0xFF),
            Err(DecodeError::NoDecoderForFrameType {
                family: moko_h4pro::HARDWARE_FAMILY.into(),
                frame_type: 0xFF,
            })
        );
    }

    #[test]
    fn test_defaults_cover_h4pro_frames() {
        let registry = DecoderRegistry::with_defaults();
        assert!(registry.get(moko_h4pro::HARDWARE_FAMILY, moko_h4pro::FRAME_TEMP_HUMIDITY).is_some());
        assert!(registry.get(moko_h4pro::HARDWARE_FAMILY, moko_h4pro::FRAME_INFO).is_some());
    }
}
