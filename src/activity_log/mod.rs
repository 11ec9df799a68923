// src/activity_log/mod.rs

mod api;
mod model;
mod store;

pub use api::{
    recent_activity, record_form_event, record_store_failure, take_store_failure_pending,
};

pub use model::{ActivityClass, ActivityEvent};

pub use store::ActivityLog;
