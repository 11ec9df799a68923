// src/form/controller.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, SecondsFormat};
use serde_json::json;

use crate::activity_log::{record_form_event, record_store_failure};
use crate::archive::{self, SubmissionRecord, SubmissionStatus};
use crate::command_state::lock_store;
use crate::error::{AppResult, UserMsgKind};
use crate::guard::UnsavedChanges;
use crate::ids;
use crate::notify::{report_error, Notifier};
use crate::print::{missing_message, prepare_print, PrintSnapshot};
use crate::signature::{
    SelectorState, SignatureBindings, SignatureGallery, SignatureRef, StoredGallery,
};
use crate::types::{AppState, FieldValue, FormKind, SignatureRole};
use crate::validate::{CappedNames, FirstInvalid, ReasonCode};

use super::draft::{discard_draft, is_significant, load_draft, save_draft};
use super::timers::{Debounce, Repeating};
use super::types::FormInstance;

pub const CLEAR_PROMPT: &str = "¿Está seguro de limpiar todo el formulario?";
pub const DRAFT_RESTORED: &str = "Se restauró un borrador guardado";
pub const EXPORTED: &str = "Archivo exportado exitosamente";

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Submitted(SubmissionRecord),
    /// Names of invalid fields, capped for display.
    Rejected(Vec<String>),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub draft_saved: bool,
    pub clock_refreshed: bool,
}

fn format_clock(now: NaiveDateTime) -> String {
    now.format("%d/%m/%Y %H:%M").to_string()
}

/// Drives one form screen: edits, autosave, submit, clear, signatures, print.
pub struct FormController<'a> {
    state: &'a AppState,
    form: FormInstance,
    bindings: SignatureBindings,
    selector: SelectorState,
    autosave: Debounce,
    clock_refresh: Repeating,
    clock_display: String,
    torn_down: bool,
}

impl<'a> FormController<'a> {
    /// Open a fresh form of `kind`, restoring a stored draft when it is worth it.
    pub fn open(
        state: &'a AppState,
        kind: FormKind,
        notifier: &mut dyn Notifier,
    ) -> AppResult<Self> {
        let identifier = ids::generate(state, kind).map_err(|e| {
            report_error(state, notifier, kind, "open", &e);
            e
        })?;

        let now = state.clock.now();
        let mut ctl = Self {
            state,
            form: FormInstance::new(kind, identifier, now),
            bindings: SignatureBindings::default(),
            selector: SelectorState::Closed,
            autosave: Debounce::new(state.settings.draft_debounce_ms),
            clock_refresh: Repeating::new(state.settings.clock_refresh_ms),
            clock_display: format_clock(now),
            torn_down: false,
        };
        ctl.clock_refresh.start(now);

        let restored = ctl.restore_draft(notifier);
        tracing::debug!(form = %kind, id = %ctl.form.identifier(), restored, "form opened");

        Ok(ctl)
    }

    fn restore_draft(&mut self, notifier: &mut dyn Notifier) -> bool {
        let kind = self.form.kind();
        let schema = self.form.schema();

        let loaded = lock_store(self.state).and_then(|store| load_draft(&store, schema));
        let values = match loaded {
            Ok(Some(v)) => v,
            Ok(None) => return false,
            Err(e) => {
                report_error(self.state, notifier, kind, "draft_restore", &e);
                return false;
            }
        };

        if !is_significant(schema, &values) {
            tracing::debug!(form = %kind, "stored draft has no significant values, not restoring");
            return false;
        }

        self.form.apply_values(&values, self.state.clock.today());
        notifier.notify(DRAFT_RESTORED, UserMsgKind::Info);
        record_form_event(self.state, kind, "draft_restored", self.form.identifier());
        true
    }

    // --------------------------------------------------
    // accessors
    // --------------------------------------------------

    pub fn form(&self) -> &FormInstance {
        &self.form
    }

    pub fn kind(&self) -> FormKind {
        self.form.kind()
    }

    pub fn identifier(&self) -> &str {
        self.form.identifier()
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.form.value(name)
    }

    pub fn bindings(&self) -> &SignatureBindings {
        &self.bindings
    }

    pub fn selector(&self) -> SelectorState {
        self.selector
    }

    pub fn clock_display(&self) -> &str {
        &self.clock_display
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn autosave_deadline(&self) -> Option<NaiveDateTime> {
        self.autosave.deadline()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn clock_running(&self) -> bool {
        self.clock_refresh.is_running()
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        self.form.changed_fields()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.form.error_messages()
    }

    // --------------------------------------------------
    // editing
    // --------------------------------------------------

    /// Unknown names leave the form untouched and return `UnknownField`.
    pub fn update_field(&mut self, name: &str, value: impl Into<FieldValue>) -> AppResult<()> {
        let today = self.state.clock.today();

        if let Err(e) = self.form.set_value(name, value.into(), today) {
            tracing::warn!(form = %self.kind(), field = name, "update for unknown field ignored");
            return Err(e);
        }

        self.schedule_autosave();
        Ok(())
    }

    fn schedule_autosave(&mut self) {
        if !self.torn_down {
            self.autosave.schedule(self.state.clock.now());
        }
    }

    /// Pre-fill with the schema's example values.
    pub fn fill_sample(&mut self) {
        let today = self.state.clock.today();
        let values: BTreeMap<String, FieldValue> = self
            .form
            .schema()
            .sample_values(today)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        if !self.form.apply_values(&values, today).is_empty() {
            self.schedule_autosave();
        }
    }

    /// Re-run every rule and touch invalid fields. Returns the first few
    /// invalid names.
    pub fn validate_all(&mut self) -> Vec<String> {
        let mut sink = CappedNames::new(self.state.settings.max_reported_invalid);
        self.form.validate_all(self.state.clock.today(), &mut sink);
        sink.into_names()
    }

    /// First touched invalid field in display order, for focusing.
    pub fn first_invalid(&self) -> Option<(String, ReasonCode)> {
        let mut sink = FirstInvalid::default();
        self.form.report_invalid(&mut sink, true);
        sink.field
    }

    // --------------------------------------------------
    // submit / clear
    // --------------------------------------------------

    pub fn submit(&mut self, notifier: &mut dyn Notifier) -> AppResult<SubmitOutcome> {
        let invalid = self.validate_all();
        if !invalid.is_empty() {
            notifier.notify(
                &format!(
                    "Por favor complete los campos requeridos: {}",
                    invalid.join(", ")
                ),
                UserMsgKind::Warn,
            );
            return Ok(SubmitOutcome::Rejected(invalid));
        }

        let kind = self.kind();
        let record = match self.commit_submission() {
            Ok(r) => r,
            Err(e) => {
                report_error(self.state, notifier, kind, "submit", &e);
                return Err(e);
            }
        };

        record_form_event(self.state, kind, "submitted", &record.identificador);
        notifier.notify(kind.saved_message(), UserMsgKind::Success);
        tracing::debug!(form = %kind, id = %record.identificador, next = %self.identifier(), "submitted");

        Ok(SubmitOutcome::Submitted(record))
    }

    /// Build the record, take the next identifier and archive. Nothing on the
    /// form changes unless all of that succeeded.
    fn commit_submission(&mut self) -> AppResult<SubmissionRecord> {
        let kind = self.kind();
        let today = self.state.clock.today();

        let resolved = self.resolved_signatures()?;
        let record = SubmissionRecord {
            tipo_formulario: kind,
            identificador: self.form.identifier().to_string(),
            fecha_registro: self
                .state
                .clock
                .now_utc()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            estado: SubmissionStatus::Pending,
            campos: self.form.values(),
            firmas: SignatureBindings::to_record(&resolved),
        };

        let (next_id, draft_res) = {
            let mut store = lock_store(self.state)?;
            let next_id = ids::next_identifier(&mut store, kind, today)?;
            archive::archive(&mut store, &record, self.state.settings.history_cap)?;
            (next_id, discard_draft(&mut store, kind))
        };

        // The record is archived; a leftover draft only costs a restore prompt.
        if let Err(e) = draft_res {
            tracing::warn!(form = %kind, error = %e, "draft not discarded after submit");
            record_store_failure(self.state, kind, "submit_discard_draft", &e);
        }

        self.start_next_instance(next_id);
        Ok(record)
    }

    fn start_next_instance(&mut self, identifier: String) {
        let kind = self.kind();
        self.form = FormInstance::new(kind, identifier, self.state.clock.now());
        self.bindings.clear();
        self.selector.cancel();
        self.autosave.cancel();
    }

    /// Returns `Ok(false)` when the user declined.
    pub fn clear(&mut self, notifier: &mut dyn Notifier) -> AppResult<bool> {
        if !notifier.confirm(CLEAR_PROMPT) {
            return Ok(false);
        }

        let kind = self.kind();
        let today = self.state.clock.today();

        let res: AppResult<String> = (|| {
            let mut store = lock_store(self.state)?;
            let id = ids::next_identifier(&mut store, kind, today)?;
            discard_draft(&mut store, kind)?;
            Ok(id)
        })();

        let next_id = match res {
            Ok(id) => id,
            Err(e) => {
                report_error(self.state, notifier, kind, "clear", &e);
                return Err(e);
            }
        };

        let previous = self.form.identifier().to_string();
        self.start_next_instance(next_id);
        record_form_event(self.state, kind, "cleared", &previous);

        Ok(true)
    }

    // --------------------------------------------------
    // timers
    // --------------------------------------------------

    /// Fire whatever deadline has passed. Call from the host event loop.
    pub fn tick(&mut self, notifier: &mut dyn Notifier) -> TickReport {
        let mut report = TickReport::default();
        if self.torn_down {
            return report;
        }

        let now = self.state.clock.now();

        if self.autosave.take_due(now) {
            report.draft_saved = self.save_draft_now(notifier);
        }

        if self.clock_refresh.take_due(now) {
            self.clock_display = format_clock(now);
            report.clock_refreshed = true;
        }

        report
    }

    fn save_draft_now(&mut self, notifier: &mut dyn Notifier) -> bool {
        let kind = self.kind();
        let values = self.form.values();

        match lock_store(self.state).and_then(|mut store| save_draft(&mut store, kind, &values)) {
            Ok(()) => {
                tracing::debug!(form = %kind, "draft saved");
                true
            }
            Err(e) => {
                report_error(self.state, notifier, kind, "draft_save", &e);
                false
            }
        }
    }

    /// Screen is going away: nothing scheduled may fire after this.
    pub fn teardown(&mut self) {
        self.autosave.cancel();
        self.clock_refresh.stop();
        self.torn_down = true;
    }

    // --------------------------------------------------
    // signatures
    // --------------------------------------------------

    pub fn open_signature_selector(&mut self, role: SignatureRole) {
        self.selector.open(role);
    }

    pub fn cancel_signature_selector(&mut self) {
        self.selector.cancel();
    }

    /// Bind gallery entry `id` to the role the selector is open for.
    /// Returns `Ok(None)` when the selector is closed.
    pub fn choose_signature(&mut self, id: &str) -> AppResult<Option<SignatureRole>> {
        let Some(role) = self.selector.target() else {
            return Ok(None);
        };

        StoredGallery::new(self.state).select(id)?;

        self.selector.pick();
        self.bindings.bind(role, id);
        Ok(Some(role))
    }

    pub fn unbind_signature(&mut self, role: SignatureRole) {
        self.bindings.unbind(role);
    }

    pub fn resolved_signatures(&self) -> AppResult<BTreeMap<SignatureRole, SignatureRef>> {
        self.bindings.resolve(&StoredGallery::new(self.state))
    }

    // --------------------------------------------------
    // print / export
    // --------------------------------------------------

    /// Printable snapshot, or `None` (after telling the user) when
    /// print-required fields are empty.
    pub fn print(&self, notifier: &mut dyn Notifier) -> Option<PrintSnapshot> {
        let kind = self.kind();
        let signatures = self.resolved_signatures().unwrap_or_else(|e| {
            report_error(self.state, notifier, kind, "print_signatures", &e);
            BTreeMap::new()
        });

        match prepare_print(&self.form, &signatures, self.state.clock.now()) {
            Ok(snap) => Some(snap),
            Err(missing) => {
                notifier.notify(&missing_message(&missing), UserMsgKind::Warn);
                None
            }
        }
    }

    /// Write the current values as `<kind>_<millis>.json` into `dir`.
    pub fn export_json(&self, dir: &Path, notifier: &mut dyn Notifier) -> AppResult<PathBuf> {
        let kind = self.kind();
        let doc = json!({
            "tipoFormulario": kind,
            "identificador": self.form.identifier(),
            "campos": self.form.values(),
        });

        match archive::export_json(dir, &kind.to_string(), &doc, self.state.clock.now_ms()) {
            Ok(path) => {
                notifier.notify(EXPORTED, UserMsgKind::Success);
                Ok(path)
            }
            Err(e) => {
                report_error(self.state, notifier, kind, "export", &e);
                Err(e)
            }
        }
    }
}

impl UnsavedChanges for FormController<'_> {
    fn has_unsaved_changes(&self) -> bool {
        self.form.is_dirty()
    }
}

impl std::fmt::Debug for FormController<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("kind", &self.kind())
            .field("identifier", &self.identifier())
            .field("dirty", &self.form.is_dirty())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

// ======================================================
// Unit Tests
// ======================================================
