// src/signature/mod.rs

mod binding;
mod gallery;

use serde::{Deserialize, Serialize};

pub use binding::{SelectorState, SignatureBindings};
pub use gallery::{check_image_data_uri, SignatureGallery, StoredGallery, GALLERY_KEY};

/// A saved signature image. Forms only hold its `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRef {
    pub id: String,
    pub nombre: String,
    /// `data:image/...;base64,...`
    pub datos: String,
    /// ISO-8601 UTC.
    pub fecha: String,
}
