// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn parse(yaml: &str) -> Value {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn renames_hyphen_key_when_camel_absent() {
    let mut v = parse("max-time: 5\n");
    normalize_keys(&mut v);
    assert_eq!(v.get("maxTime").and_then(Value::as_i64), Some(5));
    assert!(v.get("max-time").is_none());
}

#[test]
fn camel_wins_when_both_present() {
    let mut v = parse("maxTime: 5\nmax-time: 10\n");
    normalize_keys(&mut v);
    assert_eq!(v.get("maxTime").and_then(Value::as_i64), Some(5));
    assert!(v.get("max-time").is_none());
}

#[test]
fn camel_wins_when_both_present_in_reverse_order() {
    let mut v = parse("max-time: 10\nmaxTime: 5\n");
    normalize_keys(&mut v);
    assert_eq!(v.get("maxTime").and_then(Value::as_i64), Some(5));
}

#[test]
fn recurses_into_nested_mappings_and_sequences() {
    let mut v = parse("steps:\n  - fail-fast: false\n    after-script:\n      - echo hi\n");
    normalize_keys(&mut v);
    let step = &v.get("steps").unwrap().as_sequence().unwrap()[0];
    assert_eq!(step.get("failFast").and_then(Value::as_bool), Some(false));
    assert!(step.get("afterScript").is_some());
}
