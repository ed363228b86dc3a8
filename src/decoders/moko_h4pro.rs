//! Moko H4 Pro frame decoders
//!
//! The H4 Pro advertises sensor frames as Service Data under UUID `FEAB`.
//! Two layouts hide behind the frame-type byte: `0x70` (temperature &
//! humidity) and `0x40` (device info). All multi-byte fields are big-endian.
//! Hardware revisions vary the trailing-field presence, so both decoders
//! read fields in order from a bounded cursor and keep whatever fits;
//! truncation is never an error.

use super::cursor::FrameCursor;
use super::{DecodeError, DecoderRegistry};
use crate::types::{FrameFields, InfoFields, Reading, ReadingContext, TempHumidityFields};

/// Hardware family name as the device directory reports it.
pub const HARDWARE_FAMILY: &str = "H4 Pro";

/// Frame-type byte of the temperature & humidity frame.
pub const FRAME_TEMP_HUMIDITY: u8 = 0x70;

/// Frame-type byte of the info frame.
pub const FRAME_INFO: u8 = 0x40;

/// Kind tag of temperature & humidity readings.
pub const MESSAGE_TYPE_TEMP_HUMIDITY: &str = "h4pro-t&h";

/// Kind tag of info readings.
pub const MESSAGE_TYPE_INFO: &str = "h4pro-info";

/// Advertising interval step width in milliseconds.
const ADV_INTERVAL_STEP_MS: u32 = 100;

/// Width of the device MAC embedded in both frames.
const EMBEDDED_MAC_LEN: usize = 6;

/// Register the H4 Pro frame set.
pub fn register(registry: &mut DecoderRegistry) {
    registry.register(HARDWARE_FAMILY, FRAME_TEMP_HUMIDITY, decode_temp_humidity);
    registry.register(HARDWARE_FAMILY, FRAME_INFO, decode_info);
}

/// Decode the temperature & humidity frame (`0x70`).
///
/// Layout: ranging indicator (1, unused) · advertising interval steps (1) ·
/// temperature i16 ÷ 10 (2) · humidity u16 ÷ 10 (2) · battery millivolts
/// u16 (2) · device type (1) · embedded device MAC (6, unused).
pub fn decode_temp_humidity(ctx: &ReadingContext, body: &[u8]) -> Result<Reading, DecodeError> {
    log::debug!("H4 Pro frame=0x70 t&h len={}", body.len());

    let mut cur = FrameCursor::new(body);
    let mut fields = TempHumidityFields::default();

    // Ranging indicator, not surfaced.
    cur.skip(1);

    if let Some(steps) = cur.read_u8() {
        fields.adv_interval_steps = Some(steps);
        fields.adv_interval_ms = Some(u32::from(steps) * ADV_INTERVAL_STEP_MS);
    }
    if let Some(raw) = cur.read_i16_be() {
        fields.temperature = Some(f64::from(raw) / 10.0);
    }
    if let Some(raw) = cur.read_u16_be() {
        fields.humidity = Some(f64::from(raw) / 10.0);
    }
    if let Some(millivolts) = cur.read_u16_be() {
        fields.batt_vol = Some(millivolts);
    }
    if let Some(device_type) = cur.read_u8() {
        fields.device_type = Some(device_type);
    }

    // Embedded device MAC, redundant with the caller-supplied identity.
    cur.skip(EMBEDDED_MAC_LEN);

    // Anything past the documented fields is opaque; count it and move on.
    if cur.remaining() > 0 {
        log::debug!(
            "H4 Pro t&h trailing_bytes={} off={}",
            cur.remaining(),
            cur.position()
        );
    }

    Ok(Reading::new(
        MESSAGE_TYPE_TEMP_HUMIDITY,
        ctx,
        FrameFields::TempHumidity(fields),
    ))
}

/// Decode the info frame (`0x40`).
///
/// Layout: ranging indicator (1, unused) · advertising interval steps (1) ·
/// battery millivolts u16 (2) · device property (1) · switch status (1) ·
/// embedded device MAC (6, unused) · firmware version u16 (2).
pub fn decode_info(ctx: &ReadingContext, body: &[u8]) -> Result<Reading, DecodeError> {
    log::debug!("H4 Pro frame=0x40 info len={}", body.len());

    let mut cur = FrameCursor::new(body);
    let mut fields = InfoFields::default();

    // Ranging indicator, not surfaced.
    cur.skip(1);

    if let Some(steps) = cur.read_u8() {
        fields.adv_interval_steps = Some(steps);
        fields.adv_interval_ms = Some(u32::from(steps) * ADV_INTERVAL_STEP_MS);
    }
    if let Some(millivolts) = cur.read_u16_be() {
        fields.batt_vol = Some(millivolts);
    }
    if let Some(prop) = cur.read_u8() {
        fields.device_prop = Some(prop);
        fields.device_prop_bits = Some(format!("{:08b}", prop));
    }
    if let Some(status) = cur.read_u8() {
        fields.switch_status = Some(status);
        fields.switch_status_bits = Some(format!("{:08b}", status));
    }

    cur.skip(EMBEDDED_MAC_LEN);

    if let Some(version) = cur.read_u16_be() {
        fields.firmware_ver = Some(format!("V0.0.{}", version));
    }

    Ok(Reading::new(
        MESSAGE_TYPE_INFO,
        ctx,
        FrameFields::Info(fields),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ReadingContext {
        ReadingContext {
            timestamp: 1_700_000_000_000,
            mac: "c1d2e3f4a5b6".into(),
            device_name: "warehouse 3".into(),
            rssi: Some(-70),
        }
    }

    fn temp_humidity_fields(reading: &Reading) -> &TempHumidityFields {
        match &reading.fields {
            FrameFields::TempHumidity(f) => f,
            other => panic!("expected t&h fields, got {:?}", other),
        }
    }

    fn info_fields(reading: &Reading) -> &InfoFields {
        match &reading.fields {
            FrameFields::Info(f) => f,
            other => panic!("expected info fields, got {:?}", other),
        }
    }

    #[test]
    fn test_temp_humidity_full_frame() {
        let body = [
            0x01, // ranging
            0x05, // interval steps
            0x00, 0x96, // temperature 15.0
            0x01, 0xF4, // humidity 50.0
            0x0B, 0xB8, // battery 3000 mV
            0x01, // device type
            0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, // embedded MAC
        ];
        let reading = decode_temp_humidity(&context(), &body).unwrap();
        assert_eq!(reading.message_type, "h4pro-t&h");
        assert_eq!(reading.mac, "C1D2E3F4A5B6");

        let fields = temp_humidity_fields(&reading);
        assert_eq!(fields.adv_interval_steps, Some(5));
        assert_eq!(fields.adv_interval_ms, Some(500));
        assert_eq!(fields.temperature, Some(15.0));
        assert_eq!(fields.humidity, Some(50.0));
        assert_eq!(fields.batt_vol, Some(3000));
        assert_eq!(fields.device_type, Some(1));
    }

    #[test]
    fn test_temperature_is_signed() {
        // 0xFF9C is -100 in two's complement: -10.0 degrees.
        let body = [0x01, 0x05, 0xFF, 0x9C];
        let reading = decode_temp_humidity(&context(), &body).unwrap();
        assert_eq!(temp_humidity_fields(&reading).temperature, Some(-10.0));
    }

    #[test]
    fn test_truncated_frame_keeps_leading_fields() {
        // Only ranging, interval and temperature are present.
        let body = [0x01, 0x05, 0x00, 0x96];
        let reading = decode_temp_humidity(&context(), &body).unwrap();

        let fields = temp_humidity_fields(&reading);
        assert_eq!(fields.adv_interval_steps, Some(5));
        assert_eq!(fields.adv_interval_ms, Some(500));
        assert_eq!(fields.temperature, Some(15.0));
        assert_eq!(fields.humidity, None);
        assert_eq!(fields.batt_vol, None);
        assert_eq!(fields.device_type, None);
    }

    #[test]
    fn test_empty_body_yields_bare_envelope() {
        let reading = decode_temp_humidity(&context(), &[]).unwrap();
        assert_eq!(reading.message_type, "h4pro-t&h");
        assert_eq!(*temp_humidity_fields(&reading), TempHumidityFields::default());
    }

    #[test]
    fn test_trailing_bytes_are_opaque() {
        let mut body = vec![
            0x01, 0x05, 0x00, 0x96, 0x01, 0xF4, 0x0B, 0xB8, 0x01,
            0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,
        ];
        body.extend_from_slice(&[0x12, 0x34, 0x56]);

        let reading = decode_temp_humidity(&context(), &body).unwrap();
        let fields = temp_humidity_fields(&reading);
        assert_eq!(fields.temperature, Some(15.0));
        assert_eq!(fields.device_type, Some(1));
    }

    #[test]
    fn test_info_full_frame() {
        let body = [
            0x02, // ranging
            0x0A, // interval steps
            0x0B, 0xB8, // battery 3000 mV
            0xB5, // device property
            0x03, // switch status
            0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, // embedded MAC
            0x00, 0x07, // firmware version 7
        ];
        let reading = decode_info(&context(), &body).unwrap();
        assert_eq!(reading.message_type, "h4pro-info");

        let fields = info_fields(&reading);
        assert_eq!(fields.adv_interval_steps, Some(10));
        assert_eq!(fields.adv_interval_ms, Some(1000));
        assert_eq!(fields.batt_vol, Some(3000));
        assert_eq!(fields.device_prop, Some(0xB5));
        assert_eq!(fields.device_prop_bits.as_deref(), Some("10110101"));
        assert_eq!(fields.switch_status, Some(0x03));
        assert_eq!(fields.switch_status_bits.as_deref(), Some("00000011"));
        assert_eq!(fields.firmware_ver.as_deref(), Some("V0.0.7"));
    }

    #[test]
    fn test_firmware_version_zero() {
        let body = [
            0x02, 0x0A, 0x0B, 0xB8, 0x00, 0x00,
            0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,
            0x00, 0x00,
        ];
        let reading = decode_info(&context(), &body).unwrap();
        assert_eq!(info_fields(&reading).firmware_ver.as_deref(), Some("V0.0.0"));
    }

    #[test]
    fn test_info_without_firmware_bytes() {
        // Frame ends after the embedded MAC.
        let body = [
            0x02, 0x0A, 0x0B, 0xB8, 0xB5, 0x03,
            0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,
        ];
        let reading = decode_info(&context(), &body).unwrap();
        let fields = info_fields(&reading);
        assert_eq!(fields.switch_status, Some(0x03));
        assert_eq!(fields.firmware_ver, None);
    }
}
