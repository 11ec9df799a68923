// src/form/mod.rs

mod controller;
mod draft;
mod model;
mod timers;
mod types;

pub use controller::{FormController, SubmitOutcome, TickReport, CLEAR_PROMPT, DRAFT_RESTORED};
pub use draft::{discard_draft, is_significant, load_draft, save_draft};
pub use timers::{Debounce, Repeating};
pub use types::{FieldStatus, FormField, FormInstance};
