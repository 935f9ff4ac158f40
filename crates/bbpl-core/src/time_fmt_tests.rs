// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn formats_seconds() {
    assert_eq!(format_elapsed(5), "5s");
}

#[test]
fn formats_minutes() {
    assert_eq!(format_elapsed(125), "2m");
}

#[test]
fn formats_hours_with_minutes() {
    assert_eq!(format_elapsed(3600 + 90 * 60), "2h30m");
    assert_eq!(format_elapsed(3600), "1h");
}

#[test]
fn formats_days() {
    assert_eq!(format_elapsed(86400 * 3), "3d");
}

#[test]
fn formats_from_millis() {
    assert_eq!(format_elapsed_ms(5000), "5s");
}
