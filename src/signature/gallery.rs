// src/signature/gallery.rs

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::SecondsFormat;
use serde_json::Value as JsonValue;

use crate::command_state::{lock_current_signature, lock_store};
use crate::error::{AppError, AppResult};
use crate::types::AppState;

use super::SignatureRef;

pub const GALLERY_KEY: &str = "firmas_digitales";

const DATA_URI_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

pub trait SignatureGallery {
    fn list(&self) -> AppResult<Vec<SignatureRef>>;

    fn get(&self, id: &str) -> AppResult<Option<SignatureRef>> {
        Ok(self.list()?.into_iter().find(|s| s.id == id))
    }

    fn save(&mut self, name: &str, image: &str) -> AppResult<SignatureRef>;

    /// Removing an unknown id is a no-op.
    fn delete(&mut self, id: &str) -> AppResult<()>;

    fn select(&mut self, id: &str) -> AppResult<()>;

    fn current(&self) -> AppResult<Option<SignatureRef>>;

    fn clear_current(&mut self) -> AppResult<()>;
}

/// Accepts `data:image/<type>;base64,<payload>` with a decodable payload.
pub fn check_image_data_uri(image: &str) -> AppResult<()> {
    let rest = image
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| AppError::InvalidSignatureImage("not an image data uri".into()))?;

    let (mime, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or_else(|| AppError::InvalidSignatureImage("missing base64 marker".into()))?;

    if mime.is_empty() || payload.is_empty() {
        return Err(AppError::InvalidSignatureImage("empty image".into()));
    }

    STANDARD
        .decode(payload)
        .map_err(|e| AppError::InvalidSignatureImage(e.to_string()))?;
    Ok(())
}

/// Gallery persisted as one JSON array in the app store; the current
/// selection lives in `AppState`.
pub struct StoredGallery<'a> {
    state: &'a AppState,
}

impl<'a> StoredGallery<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn write_all(&self, items: &[SignatureRef]) -> AppResult<()> {
        let v = serde_json::to_value(items)
            .map_err(|e| AppError::StoreWriteFailed(format!("gallery encode: {e}")))?;
        lock_store(self.state)?.save(GALLERY_KEY, &v)
    }
}

impl SignatureGallery for StoredGallery<'_> {
    fn list(&self) -> AppResult<Vec<SignatureRef>> {
        let loaded = lock_store(self.state)?.load(GALLERY_KEY);

        let items = match loaded {
            Ok(Some(JsonValue::Array(items))) => items,
            Ok(_) => return Ok(Vec::new()),
            Err(e @ AppError::StoreInvalidJson { .. }) => {
                tracing::warn!(error = %e, "signature gallery unreadable, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        Ok(items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }

    fn save(&mut self, name: &str, image: &str) -> AppResult<SignatureRef> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::SignatureEmptyName);
        }
        check_image_data_uri(image)?;

        let mut items = self.list()?;

        let mut id_ms = self.state.clock.now_ms();
        while items.iter().any(|s| s.id == id_ms.to_string()) {
            id_ms += 1;
        }

        let sig = SignatureRef {
            id: id_ms.to_string(),
            nombre: name.to_string(),
            datos: image.to_string(),
            fecha: self
                .state
                .clock
                .now_utc()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        items.push(sig.clone());
        self.write_all(&items)?;

        tracing::debug!(id = %sig.id, "signature saved");
        Ok(sig)
    }

    fn delete(&mut self, id: &str) -> AppResult<()> {
        let mut items = self.list()?;
        let before = items.len();
        items.retain(|s| s.id != id);

        if items.len() != before {
            self.write_all(&items)?;
        }

        let mut current = lock_current_signature(self.state)?;
        if current.as_deref() == Some(id) {
            *current = None;
        }
        Ok(())
    }

    fn select(&mut self, id: &str) -> AppResult<()> {
        if self.get(id)?.is_none() {
            return Err(AppError::SignatureNotFound(id.to_string()));
        }
        *lock_current_signature(self.state)? = Some(id.to_string());
        Ok(())
    }

    fn current(&self) -> AppResult<Option<SignatureRef>> {
        let id = lock_current_signature(self.state)?.clone();
        match id {
            Some(id) => self.get(&id),
            None => Ok(None),
        }
    }

    fn clear_current(&mut self) -> AppResult<()> {
        *lock_current_signature(self.state)? = None;
        Ok(())
    }
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::NaiveDate;
    use std::sync::Arc;

    const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn mk_state() -> AppState {
        AppState::in_memory(Arc::new(ManualClock::on_date(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )))
    }

    #[test]
    fn data_uri_checks() {
        assert!(check_image_data_uri(PNG).is_ok());
        for bad in [
            "iVBORw0KGgo=",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png,iVBORw0KGgo=",
            "data:image/png;base64,***",
            "data:image/png;base64,",
        ] {
            assert!(
                matches!(check_image_data_uri(bad), Err(AppError::InvalidSignatureImage(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn saved_ids_are_unique_within_the_same_millisecond() {
        let state = mk_state();
        let mut g = StoredGallery::new(&state);

        let a = g.save("Ana", PNG).unwrap();
        let b = g.save("Roberto", PNG).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(g.list().unwrap().len(), 2);
        assert_eq!(a.fecha, "2024-01-10T12:00:00.000Z");
    }

    #[test]
    fn empty_name_is_rejected() {
        let state = mk_state();
        let mut g = StoredGallery::new(&state);
        assert!(matches!(g.save("  ", PNG), Err(AppError::SignatureEmptyName)));
    }

    #[test]
    fn deleting_current_clears_selection() {
        let state = mk_state();
        let mut g = StoredGallery::new(&state);
        let a = g.save("Ana", PNG).unwrap();

        g.select(&a.id).unwrap();
        assert_eq!(g.current().unwrap().map(|s| s.id), Some(a.id.clone()));

        g.delete(&a.id).unwrap();
        assert!(g.current().unwrap().is_none());
        assert!(g.get(&a.id).unwrap().is_none());
        g.delete("missing").unwrap();
    }

    #[test]
    fn selecting_unknown_id_fails() {
        let state = mk_state();
        let mut g = StoredGallery::new(&state);
        assert!(matches!(g.select("nope"), Err(AppError::SignatureNotFound(_))));
    }
}
