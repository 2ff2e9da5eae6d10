use std::collections::HashSet;

use arm7_lut::decoder::Decoder;
use arm7_lut::isa::arm::ArmDecoder;
use arm7_lut::lut::{TableError, ARM_TABLE_LEN, THUMB_TABLE_LEN};
use arm7_lut::{decode_arm, ArmInstr, DecodeTables, LutConfig, ThumbInstr};
use pretty_assertions::assert_eq;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn tables_are_total() {
    let t = DecodeTables::build();
    assert_eq!(t.thumb_table().len(), THUMB_TABLE_LEN);
    assert_eq!(t.arm_table().len(), ARM_TABLE_LEN);
}

#[test]
fn building_is_deterministic() {
    let a = DecodeTables::build();
    let b = DecodeTables::build();
    assert!(a == b);

    for workers in [2, 3, 8, 64] {
        let par = DecodeTables::build_with(&LutConfig { workers });
        assert!(par == a, "{workers} workers disagree with the sequential build");
    }
}

#[test]
fn every_identity_is_reachable_and_nothing_else() {
    let t = DecodeTables::build();

    let thumb: HashSet<ThumbInstr> = t.thumb_table().iter().copied().collect();
    let thumb_all: HashSet<ThumbInstr> = ThumbInstr::variants().into_iter().collect();
    assert_eq!(thumb.len(), 531);
    assert!(thumb == thumb_all, "THUMB identities differ from the enumerated set");
    assert_eq!(t.distinct_thumb(), 531);

    let arm: HashSet<ArmInstr> = t.arm_table().iter().copied().collect();
    let arm_all: HashSet<ArmInstr> = ArmInstr::variants().into_iter().collect();
    assert_eq!(arm.len(), 1006);
    assert!(arm == arm_all, "ARM identities differ from the enumerated set");
    assert_eq!(t.distinct_arm(), 1006);
}

#[test]
fn tables_are_shared_read_only_across_threads() {
    assert_send_sync::<DecodeTables>();

    let t = DecodeTables::build();
    std::thread::scope(|s| {
        for n in 0..4usize {
            let t = &t;
            s.spawn(move || {
                for index in (n..ARM_TABLE_LEN).step_by(4) {
                    assert_eq!(t.lookup_arm(index), decode_arm(ArmDecoder::reconstruct(index)));
                }
            });
        }
    });
}

#[test]
fn persisted_tables_load_back() {
    let t = DecodeTables::build();
    let json = t.to_json().unwrap();
    let back = DecodeTables::from_json(&json).unwrap();
    assert!(back == t);
}

#[test]
fn truncated_tables_are_rejected() {
    let t = DecodeTables::build();
    let mut value: serde_json::Value = serde_json::from_str(&t.to_json().unwrap()).unwrap();
    value["thumb"].as_array_mut().unwrap().pop();

    let err = DecodeTables::from_json(&value.to_string()).unwrap_err();
    let want = TableError::ThumbLength { len: THUMB_TABLE_LEN - 1 }.to_string();
    assert!(err.to_string().contains(&want), "unexpected error: {err}");

    let mut value: serde_json::Value = serde_json::from_str(&t.to_json().unwrap()).unwrap();
    value["arm"].as_array_mut().unwrap().truncate(16);
    let err = DecodeTables::from_json(&value.to_string()).unwrap_err();
    assert!(err.to_string().contains("ARM table has 16 entries"), "unexpected error: {err}");
}

#[test]
fn tampered_entries_are_rejected() {
    let t = DecodeTables::build();
    let mut value: serde_json::Value = serde_json::from_str(&t.to_json().unwrap()).unwrap();
    // bx lr
    value["arm"][0x121] = serde_json::json!("Undefined");

    let err = DecodeTables::from_json(&value.to_string()).unwrap_err();
    let want = TableError::Mismatch { table: "ARM", index: 0x121 }.to_string();
    assert!(err.to_string().contains(&want), "unexpected error: {err}");

    let mut value: serde_json::Value = serde_json::from_str(&t.to_json().unwrap()).unwrap();
    value["thumb"][0x37C] = serde_json::json!("UnconditionalBranch");
    let err = DecodeTables::from_json(&value.to_string()).unwrap_err();
    assert!(err.to_string().contains("THUMB table entry 0x37c"), "unexpected error: {err}");
}

#[test]
fn config_defaults_when_fields_are_missing() {
    let cfg: LutConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, LutConfig::default());
    let cfg: LutConfig = serde_json::from_str(r#"{"workers": 4}"#).unwrap();
    assert_eq!(cfg.workers, 4);
}
