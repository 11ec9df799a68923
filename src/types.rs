// src/types.rs

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::activity_log::ActivityLog;
use crate::clock::Clock;
use crate::context::Settings;
use crate::storage::Persistence;

/// The two form families handled by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    /// Vehicle requisition ("Requisición de transporte").
    Requisicion,
    /// Transport-service solicitation ("Solicitud de transporte").
    Solicitud,
}

impl FormKind {
    pub const ALL: [FormKind; 2] = [FormKind::Requisicion, FormKind::Solicitud];

    /// Identifier prefix, e.g. `ENTR-261017-0001`.
    pub fn id_prefix(self) -> &'static str {
        match self {
            FormKind::Requisicion => "ENTR",
            FormKind::Solicitud => "SOL",
        }
    }

    /// Tag used in the per-day counter key (`contador-<tag>-YYMMDD`).
    pub fn counter_tag(self) -> &'static str {
        match self {
            FormKind::Requisicion => "entrada",
            FormKind::Solicitud => "solicitud",
        }
    }

    pub fn history_key(self) -> &'static str {
        match self {
            FormKind::Requisicion => "historialRequisicionesTransporte",
            FormKind::Solicitud => "historialSolicitudesTransporte",
        }
    }

    pub fn last_key(self) -> &'static str {
        match self {
            FormKind::Requisicion => "ultimaRequisicion",
            FormKind::Solicitud => "ultimaSolicitud",
        }
    }

    pub fn draft_key(self) -> &'static str {
        match self {
            FormKind::Requisicion => "borrador_requisicionTransporte",
            FormKind::Solicitud => "borrador_solicitudTransporte",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::Requisicion => "Requisición de transporte",
            FormKind::Solicitud => "Solicitud de transporte",
        }
    }

    pub fn saved_message(self) -> &'static str {
        match self {
            FormKind::Requisicion => "Requisición guardada correctamente",
            FormKind::Solicitud => "Solicitud guardada correctamente",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKind::Requisicion => write!(f, "requisicion"),
            FormKind::Solicitud => write!(f, "solicitud"),
        }
    }
}

/// Signing roles available in this form family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureRole {
    Responsable,
    Director,
}

impl SignatureRole {
    pub const ALL: [SignatureRole; 2] = [SignatureRole::Responsable, SignatureRole::Director];

    pub fn label(self) -> &'static str {
        match self {
            SignatureRole::Responsable => "Responsable",
            SignatureRole::Director => "Director administrativo",
        }
    }
}

/// A single field value as typed by the user.
///
/// Serialized untagged so stored drafts and records read like plain JSON
/// (`null`, `true`, `2500.5`, `"ABC-1234"`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Empty means "not provided": null, or text that is blank after trimming.
    /// Booleans and numbers are always present.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    /// Textual form used by format validators. `None` for empty and boolean values.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Empty | FieldValue::Bool(_) => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

pub struct AppState {
    // namespaced key/value persistence (single writer)
    pub store: Mutex<Persistence>,

    pub clock: Arc<dyn Clock>,
    pub settings: Settings,

    // id of the gallery signature currently selected, if any
    pub current_signature: Mutex<Option<String>>,

    // persistent + in-memory activity log
    pub activity_log: Mutex<ActivityLog>,
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_value_json_shape_is_plain() {
        assert_eq!(FieldValue::Empty.to_json(), json!(null));
        assert_eq!(FieldValue::Bool(true).to_json(), json!(true));
        assert_eq!(FieldValue::Number(50.5).to_json(), json!(50.5));
        assert_eq!(FieldValue::text("ABC-1234").to_json(), json!("ABC-1234"));
    }

    #[test]
    fn field_value_parses_back_from_plain_json() {
        let v: FieldValue = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(v, FieldValue::Empty);
        let v: FieldValue = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(v, FieldValue::Bool(false));
        let v: FieldValue = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(v, FieldValue::Number(3.0));
        let v: FieldValue = serde_json::from_value(json!("x")).unwrap();
        assert_eq!(v, FieldValue::text("x"));
    }

    #[test]
    fn blank_detection() {
        assert!(FieldValue::Empty.is_blank());
        assert!(FieldValue::text("").is_blank());
        assert!(FieldValue::text("   ").is_blank());
        assert!(!FieldValue::text("a").is_blank());
        assert!(!FieldValue::Bool(false).is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
    }

    #[test]
    fn kind_keys_are_distinct_per_form() {
        assert_ne!(
            FormKind::Requisicion.history_key(),
            FormKind::Solicitud.history_key()
        );
        assert_eq!(FormKind::Requisicion.id_prefix(), "ENTR");
        assert_eq!(FormKind::Solicitud.id_prefix(), "SOL");
    }
}
