// src/guard.rs

//! Navigation guard: leaving a screen with unsaved edits needs confirmation.

use crate::notify::Notifier;

pub const LEAVE_PROMPT: &str =
    "¿Tiene cambios no guardados. ¿Desea abandonar la página sin guardar?";

pub trait UnsavedChanges {
    fn has_unsaved_changes(&self) -> bool;
}

/// True when navigation may proceed.
pub fn can_leave(component: &dyn UnsavedChanges, notifier: &mut dyn Notifier) -> bool {
    if !component.has_unsaved_changes() {
        return true;
    }
    notifier.confirm(LEAVE_PROMPT)
}

// ======================================================
// Unit Tests
// ======================================================
