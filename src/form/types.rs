// src/form/types.rs

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::schema::FormSchema;
use crate::types::{FieldValue, FormKind};
use crate::validate::ReasonCode;

#[derive(Clone, Debug, PartialEq)]
pub enum FieldStatus {
    Valid,
    Invalid(Vec<ReasonCode>),
}

impl FieldStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldStatus::Valid)
    }

    pub fn reasons(&self) -> &[ReasonCode] {
        match self {
            FieldStatus::Valid => &[],
            FieldStatus::Invalid(r) => r,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormField {
    pub name: &'static str,
    pub value: FieldValue,
    pub status: FieldStatus,

    /// Set once the user has been shown this field's errors (failed submit).
    pub touched: bool,
    pub dirty: bool,
}

/// One live form on screen.
///
/// Fields are kept in schema display order; `baseline` is the value snapshot
/// taken at creation (or at the last `mark_pristine`) and is what
/// `changed_fields` compares against.
#[derive(Clone, Debug)]
pub struct FormInstance {
    pub(super) schema: &'static FormSchema,
    pub(super) fields: Vec<FormField>,
    pub(super) identifier: String,
    pub(super) created_at: NaiveDateTime,
    pub(super) dirty: bool,
    pub(super) baseline: BTreeMap<String, FieldValue>,
}

impl FormInstance {
    pub fn kind(&self) -> FormKind {
        self.schema.kind()
    }

    pub fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }
}
