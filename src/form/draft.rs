// src/form/draft.rs

//! Autosaved draft: one flat JSON object of field values per form kind.

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use crate::error::AppResult;
use crate::schema::FormSchema;
use crate::storage::Persistence;
use crate::types::{FieldValue, FormKind};

pub fn save_draft(
    store: &mut Persistence,
    kind: FormKind,
    values: &BTreeMap<String, FieldValue>,
) -> AppResult<()> {
    let obj: Map<String, JsonValue> = values
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect();
    store.save(kind.draft_key(), &JsonValue::Object(obj))
}

/// Values of the stored draft restricted to the schema's fields.
/// Entries with an unusable shape (arrays, objects) are dropped.
pub fn load_draft(
    store: &Persistence,
    schema: &FormSchema,
) -> AppResult<Option<BTreeMap<String, FieldValue>>> {
    let Some(v) = store.load(schema.kind().draft_key())? else {
        return Ok(None);
    };

    let JsonValue::Object(obj) = v else {
        tracing::warn!(kind = %schema.kind(), "draft is not an object, ignoring");
        return Ok(None);
    };

    let values = obj
        .into_iter()
        .filter(|(k, _)| schema.contains(k))
        .filter_map(|(k, v)| serde_json::from_value::<FieldValue>(v).ok().map(|fv| (k, fv)))
        .collect();

    Ok(Some(values))
}

pub fn discard_draft(store: &mut Persistence, kind: FormKind) -> AppResult<()> {
    store.delete(kind.draft_key())
}

/// Worth restoring: at least one significant field is non-empty.
pub fn is_significant(schema: &FormSchema, values: &BTreeMap<String, FieldValue>) -> bool {
    schema
        .significant()
        .iter()
        .any(|name| values.get(*name).is_some_and(|v| !v.is_blank()))
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::{saved_at, MemoryStore};
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Arc;

    fn mk_store() -> Persistence {
        Persistence::new(
            "formulario_",
            Box::new(MemoryStore::new()),
            Arc::new(ManualClock::on_date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())),
        )
    }

    fn values(pairs: &[(&str, FieldValue)]) -> BTreeMap<String, FieldValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn draft_round_trips_known_fields() {
        let mut store = mk_store();
        let schema = FormSchema::for_kind(FormKind::Requisicion);
        let v = values(&[
            ("placa", "ABC-1234".into()),
            ("gasolina", true.into()),
            ("cantidadPasajeros", 3i64.into()),
            ("fecha", FieldValue::Empty),
        ]);

        save_draft(&mut store, FormKind::Requisicion, &v).unwrap();

        let raw = store.load("borrador_requisicionTransporte").unwrap().unwrap();
        assert!(saved_at(&raw).is_some());

        assert_eq!(load_draft(&store, schema).unwrap(), Some(v));
    }

    #[test]
    fn foreign_keys_and_odd_shapes_are_dropped() {
        let mut store = mk_store();
        store
            .save(
                "borrador_solicitudTransporte",
                &json!({"dependencia": "SALUD", "extra": 1, "puntoSalida": [1, 2]}),
            )
            .unwrap();

        let schema = FormSchema::for_kind(FormKind::Solicitud);
        let got = load_draft(&store, schema).unwrap().unwrap();
        assert_eq!(got, values(&[("dependencia", "SALUD".into())]));
    }

    #[test]
    fn significance_needs_a_non_blank_significant_field() {
        let schema = FormSchema::for_kind(FormKind::Solicitud);
        assert!(!is_significant(schema, &values(&[("observaciones", "x".into())])));
        assert!(!is_significant(schema, &values(&[("dependencia", "  ".into())])));
        assert!(is_significant(schema, &values(&[("puntoSalida", "SEDE".into())])));
    }

    #[test]
    fn discard_removes_the_draft() {
        let mut store = mk_store();
        let schema = FormSchema::for_kind(FormKind::Solicitud);
        save_draft(&mut store, FormKind::Solicitud, &BTreeMap::new()).unwrap();
        discard_draft(&mut store, FormKind::Solicitud).unwrap();
        assert_eq!(load_draft(&store, schema).unwrap(), None);
    }
}
