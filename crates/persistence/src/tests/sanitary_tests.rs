// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sanitary day storage tests.

use super::helpers::{colony, day, persistence_with_colony};

#[test]
fn test_add_and_list_sanitary_days() {
    let mut persistence = persistence_with_colony();
    persistence
        .add_sanitary_day(colony(), day("2026-06-20"))
        .unwrap();
    persistence
        .add_sanitary_day(colony(), day("2026-06-15"))
        .unwrap();

    let dates = persistence.sanitary_dates(colony()).unwrap();
    assert_eq!(dates, vec![day("2026-06-15"), day("2026-06-20")]);
}

#[test]
fn test_adding_existing_day_is_idempotent() {
    let mut persistence = persistence_with_colony();
    persistence
        .add_sanitary_day(colony(), day("2026-06-20"))
        .unwrap();
    persistence
        .add_sanitary_day(colony(), day("2026-06-20"))
        .unwrap();

    assert_eq!(persistence.sanitary_dates(colony()).unwrap().len(), 1);
}

#[test]
fn test_remove_sanitary_day_reports_presence() {
    let mut persistence = persistence_with_colony();
    persistence
        .add_sanitary_day(colony(), day("2026-06-20"))
        .unwrap();

    assert!(persistence
        .remove_sanitary_day(colony(), day("2026-06-20"))
        .unwrap());
    assert!(!persistence
        .remove_sanitary_day(colony(), day("2026-06-20"))
        .unwrap());
    assert!(persistence.sanitary_dates(colony()).unwrap().is_empty());
}
