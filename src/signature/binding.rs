// src/signature/binding.rs

use std::collections::BTreeMap;

use crate::archive::RecordSignatures;
use crate::error::AppResult;
use crate::types::SignatureRole;

use super::{SignatureGallery, SignatureRef};

/// Per-form role -> gallery id. Ids are weak: a deleted gallery entry leaves
/// the binding in place and it simply resolves to nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignatureBindings {
    by_role: BTreeMap<SignatureRole, String>,
}

impl SignatureBindings {
    pub fn bind(&mut self, role: SignatureRole, id: impl Into<String>) {
        self.by_role.insert(role, id.into());
    }

    pub fn unbind(&mut self, role: SignatureRole) -> Option<String> {
        self.by_role.remove(&role)
    }

    pub fn get(&self, role: SignatureRole) -> Option<&str> {
        self.by_role.get(&role).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.by_role.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.by_role.is_empty()
    }

    /// Bound signatures that still exist in the gallery.
    pub fn resolve(
        &self,
        gallery: &dyn SignatureGallery,
    ) -> AppResult<BTreeMap<SignatureRole, SignatureRef>> {
        let available = gallery.list()?;

        Ok(self
            .by_role
            .iter()
            .filter_map(|(role, id)| {
                available
                    .iter()
                    .find(|s| &s.id == id)
                    .map(|s| (*role, s.clone()))
            })
            .collect())
    }

    pub fn to_record(resolved: &BTreeMap<SignatureRole, SignatureRef>) -> RecordSignatures {
        RecordSignatures {
            responsable: resolved.get(&SignatureRole::Responsable).map(|s| s.id.clone()),
            director: resolved.get(&SignatureRole::Director).map(|s| s.id.clone()),
        }
    }
}

/// Signature picker: closed, or open on behalf of one role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectorState {
    #[default]
    Closed,
    Open(SignatureRole),
}

impl SelectorState {
    /// Opening while already open retargets to `role`.
    pub fn open(&mut self, role: SignatureRole) {
        *self = SelectorState::Open(role);
    }

    pub fn cancel(&mut self) {
        *self = SelectorState::Closed;
    }

    pub fn target(&self) -> Option<SignatureRole> {
        match self {
            SelectorState::Closed => None,
            SelectorState::Open(role) => Some(*role),
        }
    }

    /// Close after a pick, yielding the role the pick is for.
    pub fn pick(&mut self) -> Option<SignatureRole> {
        let role = self.target();
        *self = SelectorState::Closed;
        role
    }
}

// ======================================================
// Unit Tests
// ======================================================
