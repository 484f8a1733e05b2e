// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification message composition.
//!
//! Pure text builders: each lifecycle event produces messages for the two
//! logical channels per colony (the admin group and, when the applicant
//! registered a chat, the applicant). Delivery is someone else's problem -
//! messages are queued through the outbox and drained by a sink, so a
//! delivery failure can never threaten a persisted assignment.
//!
//! Texts follow the fixed Uzbek templates of the admin panel.

use crate::slot_search::Assignment;
use chrono::NaiveDate;
use tashrif_domain::{ChatChannel, VisitRequest};

/// A composed message bound for one chat channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// The chat the message should be delivered to.
    pub channel: ChatChannel,
    /// The message body.
    pub text: String,
}

/// Display format for dates in notification text.
fn human_day(day: NaiveDate) -> String {
    day.format("%d.%m.%Y").to_string()
}

fn duration_label(days: i64) -> String {
    format!("{days}-kunlik")
}

/// Builds the admin-group text for an approved request.
#[must_use]
pub fn approved_admin_text(request: &VisitRequest, assignment: &Assignment) -> String {
    format!(
        "🎉 Ariza tasdiqlangan. Raqam: {}\n\
         👤 Arizachi: {}\n\
         📅 Berilgan sana: {}\n\
         ⌚ Kelishi sana: {}\n\
         🏛️ Koloniya: {}\n\
         🟢 Holat: Tasdiqlangan",
        request.application_number,
        request.applicant_name(),
        human_day(request.submission_day()),
        human_day(assignment.start()),
        request.colony,
    )
}

/// Builds the applicant text for an approved request.
///
/// Carries the visit type in addition to the admin-group fields.
#[must_use]
pub fn approved_applicant_text(request: &VisitRequest, assignment: &Assignment) -> String {
    format!(
        "🎉 Ariza tasdiqlangan. Raqam: {}\n\
         👤 Arizachi: {}\n\
         📅 Berilgan sana: {}\n\
         ⌚ Kelishi sana: {}\n\
         ⏲️ Turi: {}\n\
         🟢 Holat: Tasdiqlangan",
        request.application_number,
        request.applicant_name(),
        human_day(request.submission_day()),
        human_day(assignment.start()),
        duration_label(assignment.duration_days()),
    )
}

/// Builds the text for a rejected request.
#[must_use]
pub fn rejected_text(request: &VisitRequest, reason: &str) -> String {
    format!(
        "❌ Ariza rad etildi. Raqam: {}\n\
         👤 Arizachi: {}\n\
         📅 Berilgan sana: {}\n\
         💬 Sabab: {}\n\
         🔴 Holat: Rad etilgan",
        request.application_number,
        request.applicant_name(),
        human_day(request.submission_day()),
        reason,
    )
}

/// Builds the text for a canceled request.
#[must_use]
pub fn canceled_text(request: &VisitRequest, reason: &str) -> String {
    format!(
        "🚫 Ariza bekor qilindi. Raqam: {}\n\
         👤 Arizachi: {}\n\
         📅 Berilgan sana: {}\n\
         💬 Sabab: {}\n\
         🔴 Holat: Bekor qilingan",
        request.application_number,
        request.applicant_name(),
        human_day(request.submission_day()),
        reason,
    )
}

/// Builds the text for a re-categorized request.
#[must_use]
pub fn days_changed_text(request: &VisitRequest, new_days: u8) -> String {
    format!(
        "📝 Ariza kunlari o'zgartirildi. Raqam: {}\n\
         👤 Arizachi: {}\n\
         📅 Berilgan sana: {}\n\
         ⏲️ Yangi tur: {}\n\
         🏛️ Koloniya: {}\n\
         🟡 Holat: Kutilmoqda",
        request.application_number,
        request.applicant_name(),
        human_day(request.submission_day()),
        duration_label(i64::from(new_days)),
        request.colony,
    )
}

/// Builds the text for a completed (closed) request.
#[must_use]
pub fn closed_text(request: &VisitRequest, end_date: NaiveDate) -> String {
    format!(
        "🏁 Ariza yakunlandi. Raqam: {}\n\
         👤 Arizachi: {}\n\
         📅 Yuborilgan sana: {}\n\
         📅 Tugash sanasi: {}\n\
         🏛️ Koloniya: {}\n\
         🟢 Holat: Yakunlandi",
        request.application_number,
        request.applicant_name(),
        human_day(request.submission_day()),
        human_day(end_date),
        request.colony,
    )
}

/// Pairs an admin-group text and an optional applicant text with their
/// channels.
///
/// The applicant message is included only when the request carries a chat.
#[must_use]
pub fn fan_out(
    admin_channel: &ChatChannel,
    admin_text: String,
    request: &VisitRequest,
    applicant_text: String,
) -> Vec<NotificationMessage> {
    let mut messages = vec![NotificationMessage {
        channel: admin_channel.clone(),
        text: admin_text,
    }];
    if let Some(chat) = &request.chat {
        messages.push(NotificationMessage {
            channel: chat.clone(),
            text: applicant_text,
        });
    }
    messages
}
