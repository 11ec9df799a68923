// tests/common/mod.rs

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use formulario_transporte_lib::{
    clock::{Clock, ManualClock},
    form::FormController,
    notify::RecordingNotifier,
    storage::{MemoryStore, WriteFaults},
    types::{AppState, FieldValue, FormKind},
};

pub const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

pub struct TestEnv {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub faults: WriteFaults,
}

impl TestEnv {
    /// In-memory app state pinned to 2024-01-10 12:00.
    pub fn new() -> Self {
        Self::on(2024, 1, 10)
    }

    pub fn on(y: i32, m: u32, d: u32) -> Self {
        let clock = Arc::new(ManualClock::on_date(
            NaiveDate::from_ymd_opt(y, m, d).expect("valid date"),
        ));
        let (store, faults) = MemoryStore::with_faults();
        let state = AppState::with_backend(Box::new(store), clock.clone());

        Self {
            state,
            clock,
            faults,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn open(&self, kind: FormKind, n: &mut RecordingNotifier) -> FormController<'_> {
        FormController::open(&self.state, kind, n).expect("open form")
    }
}

pub fn fill(ctl: &mut FormController<'_>, pairs: &[(&str, FieldValue)]) {
    for (name, value) in pairs {
        ctl.update_field(name, value.clone())
            .unwrap_or_else(|e| panic!("update {name}: {e}"));
    }
}

/// The four required fields of a requisition, valid on 2024-01-10.
pub fn minimal_requisicion() -> Vec<(&'static str, FieldValue)> {
    vec![
        ("fecha", FieldValue::text("2024-01-10")),
        ("placa", FieldValue::text("ABC-1234")),
        ("conductor", FieldValue::text("CARLOS")),
        ("dependencia", FieldValue::text("SALUD")),
    ]
}

pub fn as_map(pairs: &[(&str, FieldValue)]) -> BTreeMap<String, FieldValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
