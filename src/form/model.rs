// src/form/model.rs

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{AppError, AppResult};
use crate::schema::FormSchema;
use crate::types::{FieldValue, FormKind};
use crate::validate::{check_rules, FieldLookup, MessageSink, RuleCtx, ValidationSink};

use super::types::{FieldStatus, FormField, FormInstance};

impl FieldLookup for FormInstance {
    fn value_of(&self, name: &str) -> Option<&FieldValue> {
        self.value(name)
    }
}

impl FormInstance {
    /// Fresh instance with schema defaults, already validated (nothing touched).
    pub fn new(kind: FormKind, identifier: impl Into<String>, now: NaiveDateTime) -> Self {
        let schema = FormSchema::for_kind(kind);
        let today = now.date();

        let fields = schema
            .fields()
            .iter()
            .map(|spec| FormField {
                name: spec.name,
                value: spec.default_value(today),
                status: FieldStatus::Valid,
                touched: false,
                dirty: false,
            })
            .collect();

        let mut form = Self {
            schema,
            fields,
            identifier: identifier.into(),
            created_at: now,
            dirty: false,
            baseline: BTreeMap::new(),
        };
        form.revalidate_all(today);
        form.baseline = form.values();
        form
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.schema.position(name).map(|i| &self.fields[i])
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(|f| &f.value)
    }

    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| f.status.is_valid())
    }

    /// Store `value` and re-run the field's rules plus every rule that reads it.
    /// Returns the names that were re-validated.
    pub fn set_value(
        &mut self,
        name: &str,
        value: FieldValue,
        today: NaiveDate,
    ) -> AppResult<Vec<&'static str>> {
        let i = self
            .schema
            .position(name)
            .ok_or_else(|| AppError::UnknownField(name.to_string()))?;

        let field = &mut self.fields[i];
        field.value = value;
        field.dirty = true;
        self.dirty = true;

        let mut affected = vec![field.name];
        affected.extend_from_slice(self.schema.dependents_of(name));

        for n in &affected {
            self.revalidate(n, today);
        }
        Ok(affected)
    }

    fn status_at(&self, i: usize, today: NaiveDate) -> FieldStatus {
        let spec = &self.schema.fields()[i];
        let ctx = RuleCtx {
            today,
            fields: self,
        };

        let reasons = check_rules(&spec.rules, &self.fields[i].value, &ctx);
        if reasons.is_empty() {
            FieldStatus::Valid
        } else {
            FieldStatus::Invalid(reasons)
        }
    }

    pub fn revalidate(&mut self, name: &str, today: NaiveDate) {
        if let Some(i) = self.schema.position(name) {
            self.fields[i].status = self.status_at(i, today);
        }
    }

    pub fn revalidate_all(&mut self, today: NaiveDate) {
        for i in 0..self.fields.len() {
            self.fields[i].status = self.status_at(i, today);
        }
    }

    /// Re-run every rule, mark invalid fields touched and report them in
    /// display order.
    pub fn validate_all(&mut self, today: NaiveDate, sink: &mut impl ValidationSink) {
        self.revalidate_all(today);

        for field in self.fields.iter_mut() {
            if !field.status.is_valid() {
                field.touched = true;
            }
        }

        self.report_invalid(sink, false);
    }

    pub fn report_invalid(&self, sink: &mut impl ValidationSink, only_touched: bool) {
        for (spec, field) in self.schema.fields().iter().zip(&self.fields) {
            if only_touched && !field.touched {
                continue;
            }
            if let FieldStatus::Invalid(reasons) = &field.status {
                sink.invalid(field.name, spec.label, reasons);
                if sink.stop_early() {
                    return;
                }
            }
        }
    }

    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| !f.status.is_valid())
            .map(|f| f.name)
            .collect()
    }

    /// User-facing error lines for the fields already shown as touched.
    pub fn error_messages(&self) -> Vec<String> {
        let mut sink = MessageSink::new();
        self.report_invalid(&mut sink, true);
        sink.into_lines()
    }

    pub fn values(&self) -> BTreeMap<String, FieldValue> {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.value.clone()))
            .collect()
    }

    /// Bulk patch (draft restore, sample fill). Unknown names are ignored.
    /// Returns the fields whose value actually changed.
    pub fn apply_values(
        &mut self,
        values: &BTreeMap<String, FieldValue>,
        today: NaiveDate,
    ) -> Vec<&'static str> {
        let mut changed = Vec::new();

        for field in self.fields.iter_mut() {
            let Some(v) = values.get(field.name) else {
                continue;
            };
            if *v == field.value {
                continue;
            }
            field.value = v.clone();
            field.dirty = true;
            changed.push(field.name);
        }

        if !changed.is_empty() {
            self.dirty = true;
        }
        self.revalidate_all(today);
        changed
    }

    /// Fields whose value differs from the baseline snapshot.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| self.baseline.get(f.name).unwrap_or(&FieldValue::Empty) != &f.value)
            .map(|f| f.name)
            .collect()
    }
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{CappedNames, ReasonCode};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn today() -> NaiveDate {
        now().date()
    }

    fn solicitud() -> FormInstance {
        FormInstance::new(FormKind::Solicitud, "SOL-240110-0001", now())
    }

    #[test]
    fn new_instance_is_pristine_with_defaults() {
        let f = solicitud();
        assert!(!f.is_dirty());
        assert_eq!(f.identifier(), "SOL-240110-0001");
        assert_eq!(f.value("fechaSolicitud"), Some(&FieldValue::text("2024-01-10")));
        assert_eq!(f.value("dependencia"), Some(&FieldValue::Empty));
        assert!(!f.is_valid());
        assert!(f.fields().iter().all(|x| !x.touched));
        assert!(f.changed_fields().is_empty());
    }

    #[test]
    fn unknown_field_is_rejected_without_state_change() {
        let mut f = solicitud();
        let err = f.set_value("noExiste", "x".into(), today()).unwrap_err();
        assert!(matches!(err, AppError::UnknownField(ref n) if n == "noExiste"));
        assert!(!f.is_dirty());
    }

    #[test]
    fn set_value_marks_dirty_and_revalidates_dependents() {
        let mut f = solicitud();
        f.set_value("fechaLlegada", "2024-01-09".into(), today()).unwrap();
        assert!(f.field("fechaLlegada").unwrap().status.is_valid());

        let affected = f
            .set_value("fechaSalida", "2024-01-10".into(), today())
            .unwrap();
        assert_eq!(affected, vec!["fechaSalida", "fechaLlegada", "horaLlegada"]);

        let llegada = f.field("fechaLlegada").unwrap();
        assert_eq!(llegada.status.reasons(), &[ReasonCode::ArrivalBeforeDeparture]);
        assert!(!llegada.dirty);
        assert!(f.field("fechaSalida").unwrap().dirty);
        assert!(f.is_dirty());
    }

    #[test]
    fn validate_all_touches_invalid_fields_and_caps_report() {
        let mut f = FormInstance::new(FormKind::Requisicion, "ENTR-240110-0001", now());
        let mut sink = CappedNames::new(3);
        f.validate_all(today(), &mut sink);

        assert_eq!(sink.total(), 4);
        assert_eq!(sink.into_names(), vec!["fecha", "dependencia", "placa"]);
        assert!(f.field("conductor").unwrap().touched);
        assert!(!f.field("marca").unwrap().touched);
        assert_eq!(f.error_messages().len(), 4);
    }

    #[test]
    fn changed_fields_compares_against_baseline() {
        let mut f = solicitud();
        f.set_value("dependencia", "SALUD".into(), today()).unwrap();
        f.set_value("sello1", FieldValue::Empty, today()).unwrap();
        assert_eq!(f.changed_fields(), vec!["dependencia"]);

        f.set_value("dependencia", FieldValue::Empty, today()).unwrap();
        assert!(f.is_dirty());
        assert!(f.changed_fields().is_empty());
    }

    #[test]
    fn value_restored_to_its_default_is_not_a_change() {
        let mut f = solicitud();
        f.set_value("fechaSolicitud", "2024-01-09".into(), today()).unwrap();
        assert_eq!(f.changed_fields(), vec!["fechaSolicitud"]);

        f.set_value("fechaSolicitud", "2024-01-10".into(), today()).unwrap();
        assert!(f.changed_fields().is_empty());
    }

    #[test]
    fn apply_values_skips_unknown_and_unchanged() {
        let mut f = solicitud();
        let mut v = BTreeMap::new();
        v.insert("dependencia".to_string(), FieldValue::text("SALUD"));
        v.insert("fechaSolicitud".to_string(), FieldValue::text("2024-01-10"));
        v.insert("_savedAt".to_string(), FieldValue::text("2024-01-10T12:00:00.000Z"));

        assert_eq!(f.apply_values(&v, today()), vec!["dependencia"]);
        assert!(f.is_dirty());
        assert!(f.field("dependencia").unwrap().status.is_valid());
    }
}
