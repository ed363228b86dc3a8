//! Decode a gateway-forwarded advertisement from the command line.
//!
//! Usage:
//!   cargo run --example decode_advertisement [PAYLOAD_HEX] [HARDWARE_FAMILY]
//!
//! With no arguments, decodes a sample H4 Pro temperature & humidity
//! advertisement. Set RUST_LOG=debug to watch the AD structure walk.

use anyhow::Context;

use advect::decoders::moko_h4pro::HARDWARE_FAMILY;
use advect::decoders::DecoderRegistry;
use advect::events::CallbackEvent;
use advect::ingest::GatewayMessage;
use advect::parser::parse_advertisement_hex;
use advect::types::ReadingContext;

const SAMPLE_PAYLOAD: &str = "0201061316ABFE700105009601F40BB801AABBCCDDEEFF";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let payload = args.next().unwrap_or_else(|| SAMPLE_PAYLOAD.to_string());
    let family = args.next().unwrap_or_else(|| HARDWARE_FAMILY.to_string());

    let mut message = GatewayMessage {
        message_id: 1,
        gateway_mac: "A0:B1:C2:D3:E4:F5".into(),
        gateway_hw: "demo-gateway".into(),
        device_mac: "C1:D2:E3:F4:A5:B6".into(),
        payload,
        qos: 0,
        timestamp: 1_700_000_000_000,
        rssi: Some(-68),
    };
    message.normalize();
    message.validate().context("gateway message invalid")?;

    let registry = DecoderRegistry::with_defaults();
    let ctx = ReadingContext {
        timestamp: message.timestamp,
        mac: message.device_mac.clone(),
        device_name: "demo sensor".into(),
        rssi: message.rssi,
    };

    let parsed = parse_advertisement_hex(&registry, &message.payload, &family, &ctx)
        .with_context(|| format!("payload {}", message.payload_preview(32)))?;

    println!(
        "service data uuid={} frame={}",
        parsed.uuid_hex(),
        parsed.frame_type_hex()
    );
    println!("{}", serde_json::to_string_pretty(&parsed.reading)?);

    let event = CallbackEvent::new(&message, &family, &parsed)?;
    println!("{}", serde_json::to_string_pretty(&event)?);

    Ok(())
}
