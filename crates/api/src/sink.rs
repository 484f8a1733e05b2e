// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification delivery boundary.
//!
//! Messages reach chats through a [`NotificationSink`]; the production
//! implementation (a Telegram bot) lives outside this workspace. Delivery
//! is strictly fire-and-forget: [`drain_outbox`] marks successes, counts
//! failures, and never surfaces a delivery error to its caller.

use crate::error::{ApiError, translate_persistence_error};
use chrono::{DateTime, Utc};
use tashrif_persistence::Persistence;
use thiserror::Error;
use tracing::warn;

/// A failed delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The sink could not deliver the message.
    #[error("notification delivery failed: {reason}")]
    Delivery {
        /// Description of the failure.
        reason: String,
    },
}

/// One-way message delivery to a chat channel.
pub trait NotificationSink {
    /// Delivers `text` to `chat_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails; the caller records the attempt
    /// and retries on a later drain.
    fn send(&mut self, chat_id: &str, text: &str) -> Result<(), NotificationError>;
}

/// A sink that logs messages instead of delivering them.
///
/// Used in development and wherever a real bot is not wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn send(&mut self, chat_id: &str, text: &str) -> Result<(), NotificationError> {
        tracing::info!(chat_id, text, "Notification (log only)");
        Ok(())
    }
}

/// Outcome of one outbox drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Messages delivered and marked sent.
    pub sent: usize,
    /// Messages whose delivery failed; they stay queued.
    pub failed: usize,
}

/// Delivers up to `limit` queued messages through the sink.
///
/// Successes are marked sent; failures are logged, counted on the row, and
/// left queued for the next pass. A delivery failure is never an error.
///
/// # Errors
///
/// Returns an error only when reading or updating the queue itself fails.
pub fn drain_outbox(
    persistence: &mut Persistence,
    sink: &mut dyn NotificationSink,
    limit: i64,
    now: DateTime<Utc>,
) -> Result<DrainReport, ApiError> {
    let queued = persistence
        .unsent_notifications(limit)
        .map_err(translate_persistence_error)?;

    let mut report = DrainReport::default();
    for message in queued {
        match sink.send(&message.chat_id, &message.body) {
            Ok(()) => {
                persistence
                    .mark_notification_sent(message.message_id, now)
                    .map_err(translate_persistence_error)?;
                report.sent += 1;
            }
            Err(err) => {
                warn!(
                    message_id = message.message_id,
                    chat = %message.chat_id,
                    error = %err,
                    "Notification delivery failed"
                );
                persistence
                    .record_notification_attempt(message.message_id)
                    .map_err(translate_persistence_error)?;
                report.failed += 1;
            }
        }
    }
    Ok(report)
}
