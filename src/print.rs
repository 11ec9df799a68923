// src/print.rs

//! Read-only printable view of a form.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::form::FormInstance;
use crate::schema::InputKind;
use crate::signature::SignatureRef;
use crate::types::{FieldValue, FormKind, SignatureRole};
use crate::validate::parse_date;

#[derive(Clone, Debug, PartialEq)]
pub struct PrintRow {
    pub name: &'static str,
    pub label: &'static str,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrintSection {
    pub title: &'static str,
    pub rows: Vec<PrintRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrintSignature {
    pub role: SignatureRole,
    pub label: &'static str,
    pub nombre: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrintSnapshot {
    pub kind: FormKind,
    pub title: &'static str,
    pub identifier: String,
    /// `dd/mm/yyyy`
    pub print_date: String,
    /// `HH:MM`, 24 h
    pub print_time: String,
    pub sections: Vec<PrintSection>,
    pub signatures: Vec<PrintSignature>,
}

/// Print-required fields that are still empty, in schema order.
pub fn missing_for_print(form: &FormInstance) -> Vec<&'static str> {
    form.schema()
        .print_required()
        .iter()
        .copied()
        .filter(|name| form.value(name).map_or(true, FieldValue::is_blank))
        .collect()
}

pub fn missing_message(missing: &[&str]) -> String {
    format!("Complete los campos requeridos: {}", missing.join(", "))
}

fn display_value(input: InputKind, value: &FieldValue) -> String {
    match value {
        FieldValue::Empty => String::new(),
        FieldValue::Bool(true) => "Sí".to_string(),
        FieldValue::Bool(false) => "No".to_string(),
        FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{n:.0}"),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Text(s) if input == InputKind::Date => parse_date(s)
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| s.clone()),
        FieldValue::Text(s) => s.clone(),
    }
}

/// Snapshot for printing, or the missing print-required field names.
pub fn prepare_print(
    form: &FormInstance,
    signatures: &BTreeMap<SignatureRole, SignatureRef>,
    now: NaiveDateTime,
) -> Result<PrintSnapshot, Vec<&'static str>> {
    let missing = missing_for_print(form);
    if !missing.is_empty() {
        return Err(missing);
    }

    let mut sections: Vec<PrintSection> = Vec::new();
    for (spec, field) in form.schema().fields().iter().zip(form.fields()) {
        let row = PrintRow {
            name: spec.name,
            label: spec.label,
            text: display_value(spec.input, &field.value),
        };

        match sections.last_mut() {
            Some(s) if s.title == spec.section => s.rows.push(row),
            _ => sections.push(PrintSection {
                title: spec.section,
                rows: vec![row],
            }),
        }
    }

    let signatures = signatures
        .iter()
        .map(|(role, s)| PrintSignature {
            role: *role,
            label: role.label(),
            nombre: s.nombre.clone(),
            image: s.datos.clone(),
        })
        .collect();

    Ok(PrintSnapshot {
        kind: form.kind(),
        title: form.kind().title(),
        identifier: form.identifier().to_string(),
        print_date: now.format("%d/%m/%Y").to_string(),
        print_time: now.format("%H:%M").to_string(),
        sections,
        signatures,
    })
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 9)
            .unwrap()
            .and_hms_opt(7, 5, 0)
            .unwrap()
    }

    fn requisicion() -> FormInstance {
        FormInstance::new(FormKind::Requisicion, "ENTR-240109-0001", now())
    }

    #[test]
    fn missing_fields_block_printing() {
        let mut f = requisicion();
        f.set_value("placa", "ABC-1234".into(), now().date()).unwrap();

        let missing = prepare_print(&f, &BTreeMap::new(), now()).unwrap_err();
        assert_eq!(missing, vec!["fecha", "dependencia", "conductor"]);
        assert_eq!(
            missing_message(&missing),
            "Complete los campos requeridos: fecha, dependencia, conductor"
        );
    }

    #[test]
    fn snapshot_formats_dates_flags_and_numbers() {
        let mut f = requisicion();
        let today = now().date();
        for (k, v) in [
            ("fecha", FieldValue::text("2024-01-09")),
            ("dependencia", "SALUD".into()),
            ("placa", "ABC-1234".into()),
            ("conductor", "CARLOS".into()),
            ("gasolina", true.into()),
            ("cantidadPasajeros", 3i64.into()),
            ("galones", 12.5.into()),
        ] {
            f.set_value(k, v, today).unwrap();
        }

        let snap = prepare_print(&f, &BTreeMap::new(), now()).unwrap();
        assert_eq!(snap.print_date, "09/01/2024");
        assert_eq!(snap.print_time, "07:05");
        assert_eq!(snap.title, "Requisición de transporte");

        let rows: BTreeMap<&str, &str> = snap
            .sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .map(|r| (r.name, r.text.as_str()))
            .collect();
        assert_eq!(rows["fecha"], "09/01/2024");
        assert_eq!(rows["gasolina"], "Sí");
        assert_eq!(rows["gasOil"], "No");
        assert_eq!(rows["cantidadPasajeros"], "3");
        assert_eq!(rows["galones"], "12.5");
        assert_eq!(rows["marca"], "");

        assert_eq!(snap.sections[0].title, "Datos generales");
        assert_eq!(rows.len(), f.fields().len());
    }
}
