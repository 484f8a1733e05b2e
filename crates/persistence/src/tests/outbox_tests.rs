// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification outbox tests.

use super::helpers::{colony, persistence_with_colony, submitted_at};
use tashrif_domain::ChatChannel;

#[test]
fn test_enqueue_and_drain_order_is_fifo() {
    let mut persistence = persistence_with_colony();
    let chat = ChatChannel::new("5500123");

    persistence
        .enqueue_notification(colony(), &chat, "first", submitted_at(4))
        .unwrap();
    persistence
        .enqueue_notification(colony(), &chat, "second", submitted_at(5))
        .unwrap();

    let unsent = persistence.unsent_notifications(10).unwrap();
    assert_eq!(unsent.len(), 2);
    assert_eq!(unsent[0].body, "first");
    assert_eq!(unsent[1].body, "second");
    assert_eq!(unsent[0].attempts, 0);
}

#[test]
fn test_sent_messages_leave_the_queue() {
    let mut persistence = persistence_with_colony();
    let chat = ChatChannel::new("5500123");

    persistence
        .enqueue_notification(colony(), &chat, "first", submitted_at(4))
        .unwrap();
    persistence
        .enqueue_notification(colony(), &chat, "second", submitted_at(5))
        .unwrap();

    let unsent = persistence.unsent_notifications(10).unwrap();
    persistence
        .mark_notification_sent(unsent[0].message_id, submitted_at(6))
        .unwrap();

    let remaining = persistence.unsent_notifications(10).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].body, "second");
}

#[test]
fn test_failed_attempts_are_counted_and_kept() {
    let mut persistence = persistence_with_colony();
    let chat = ChatChannel::new("5500123");

    persistence
        .enqueue_notification(colony(), &chat, "flaky", submitted_at(4))
        .unwrap();
    let message_id = persistence.unsent_notifications(1).unwrap()[0].message_id;

    persistence.record_notification_attempt(message_id).unwrap();
    persistence.record_notification_attempt(message_id).unwrap();

    let unsent = persistence.unsent_notifications(10).unwrap();
    assert_eq!(unsent.len(), 1);
    assert_eq!(unsent[0].attempts, 2);
}
