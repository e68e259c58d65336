//! Descriptor serialization (requires the `serde` feature).

#![cfg(feature = "serde")]
#![allow(clippy::unwrap_used)]

use panel_specs::panels::ICNA3512_DXQ7D0023;
use panel_specs::DisplayMode;

#[test]
fn descriptor_serializes_tables() {
    let json = serde_json::to_value(ICNA3512_DXQ7D0023).unwrap();
    assert_eq!(json["compatible"], "dxq,dxq7d0023");
    assert_eq!(json["supplies"][2], "dcdc-en");
    assert_eq!(json["init"]["entries"][0]["opcode"], 0x9C);
    assert_eq!(json["init"]["entries"][0]["encoding"], "Short");
}

#[test]
fn mode_round_trips() {
    let mode = *ICNA3512_DXQ7D0023.preferred_mode().unwrap();
    let text = serde_json::to_string(&mode).unwrap();
    let back: DisplayMode = serde_json::from_str(&text).unwrap();
    assert_eq!(back, mode);
}
