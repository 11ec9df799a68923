// src/notify.rs

//! User-facing messages and confirmations, plus the single place where
//! operation errors are surfaced to the user.

use std::collections::VecDeque;

use crate::activity_log::record_store_failure;
use crate::error::{AppError, UserMsgKind};
use crate::types::{AppState, FormKind};

pub trait Notifier {
    /// Non-blocking message (toast / modal).
    fn notify(&mut self, message: &str, kind: UserMsgKind);

    /// Blocking yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Notifier that remembers everything it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub messages: Vec<(UserMsgKind, String)>,
    pub prompts: Vec<String>,
    answers: VecDeque<bool>,
    decline_by_default: bool,
}

impl RecordingNotifier {
    /// Accepts every confirmation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declines every confirmation.
    pub fn declining() -> Self {
        Self {
            decline_by_default: true,
            ..Self::default()
        }
    }

    /// Queue specific answers; once exhausted the default applies.
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn last(&self) -> Option<&(UserMsgKind, String)> {
        self.messages.last()
    }

    pub fn of_kind(&self, kind: UserMsgKind) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str, kind: UserMsgKind) {
        self.messages.push((kind, message.to_string()));
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.answers
            .pop_front()
            .unwrap_or(!self.decline_by_default)
    }
}

/// Show `err` to the user and keep a trace of it. Store failures also go to
/// the activity log.
pub fn report_error(
    state: &AppState,
    notifier: &mut dyn Notifier,
    kind: FormKind,
    context: &str,
    err: &AppError,
) {
    let msg = err.user_msg();
    notifier.notify(msg.short, msg.kind);

    if err.is_store_failure() {
        record_store_failure(state, kind, context, err);
    }

    tracing::warn!(form = %kind, context, error = %err, "operation failed");
}

// ======================================================
// Unit Tests
// ======================================================
