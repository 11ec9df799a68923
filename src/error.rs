// src/error.rs

use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserMsgKind {
    Success,
    Warn,
    Error,
    Info,
}

#[derive(Clone, Debug)]
pub struct UserMsg {
    pub kind: UserMsgKind,
    pub short: &'static str,
    pub detail: Option<String>,
}

#[derive(Debug)]
pub enum AppError {
    // --------------------------------------------------
    // generic / plumbing
    // --------------------------------------------------
    Io(std::io::Error),
    Msg(String),
    StateLockPoisoned,
    InvalidPath,

    // --------------------------------------------------
    // key/value store (IO / encoding)
    // --------------------------------------------------
    StoreReadFailed(String),
    StoreWriteFailed(String),
    StoreInvalidKey(String),
    StoreInvalidJson { key: String, detail: String },
    StoreTooLarge { bytes: u64, max: u64 },

    // --------------------------------------------------
    // form model contract
    // --------------------------------------------------
    UnknownField(String),
    MissingRequired(Vec<String>),

    // --------------------------------------------------
    // signatures
    // --------------------------------------------------
    SignatureNotFound(String),
    SignatureEmptyName,
    InvalidSignatureImage(String),

    // --------------------------------------------------
    // export
    // --------------------------------------------------
    ExportFailed(String),
}

impl AppError {
    pub fn is_store_failure(&self) -> bool {
        use AppError::*;
        matches!(
            self,
            Io(_)
                | StoreReadFailed(_)
                | StoreWriteFailed(_)
                | StoreInvalidKey(_)
                | StoreInvalidJson { .. }
                | StoreTooLarge { .. }
        )
    }

    pub fn user_msg(&self) -> UserMsg {
        use AppError::*;

        let mut kind = UserMsgKind::Error;
        let detail = Some(self.to_string());

        let short: &'static str = match self {
            // generic
            Io(_) => "Error de lectura o escritura de archivos.",
            Msg(_) => "Ocurrió un error inesperado.",
            StateLockPoisoned => "Error interno de estado.",
            InvalidPath => "Ruta inválida.",

            // store
            StoreReadFailed(_) => "Error al obtener datos guardados localmente.",
            StoreWriteFailed(_) => "Error al guardar datos localmente.",
            StoreInvalidKey(_) => "Clave de almacenamiento inválida.",
            StoreInvalidJson { .. } => "Los datos guardados están dañados.",
            StoreTooLarge { .. } => "Los datos guardados exceden el tamaño permitido.",

            // form
            UnknownField(_) => "Campo desconocido.",
            MissingRequired(_) => {
                kind = UserMsgKind::Warn;
                "Complete los campos requeridos."
            }

            // signatures
            SignatureNotFound(_) => "Firma no encontrada.",
            SignatureEmptyName => "El nombre de la firma es requerido.",
            InvalidSignatureImage(_) => "La imagen de la firma no es válida.",

            // export
            ExportFailed(_) => "Error al exportar archivo.",
        };

        UserMsg {
            kind,
            short,
            detail,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AppError::*;

        match self {
            Io(e) => write!(f, "io error: {e}"),
            Msg(s) => write!(f, "{s}"),
            StateLockPoisoned => write!(f, "state lock poisoned"),
            InvalidPath => write!(f, "invalid path"),

            StoreReadFailed(s) => write!(f, "store read failed: {s}"),
            StoreWriteFailed(s) => write!(f, "store write failed: {s}"),
            StoreInvalidKey(k) => write!(f, "invalid store key: {k:?}"),
            StoreInvalidJson { key, detail } => {
                write!(f, "invalid json under store key {key:?}: {detail}")
            }
            StoreTooLarge { bytes, max } => write!(f, "stored value too large: {bytes} > {max}"),

            UnknownField(name) => write!(f, "unknown field: {name}"),
            MissingRequired(names) => write!(f, "missing required fields: {}", names.join(", ")),

            SignatureNotFound(id) => write!(f, "signature not found: {id}"),
            SignatureEmptyName => write!(f, "empty signature name"),
            InvalidSignatureImage(s) => write!(f, "invalid signature image: {s}"),

            ExportFailed(s) => write!(f, "export failed: {s}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_are_flagged_as_store_failures() {
        assert!(AppError::StoreWriteFailed("disk full".into()).is_store_failure());
        assert!(AppError::StoreInvalidJson {
            key: "k".into(),
            detail: "eof".into()
        }
        .is_store_failure());
        assert!(!AppError::UnknownField("placa".into()).is_store_failure());
        assert!(!AppError::SignatureEmptyName.is_store_failure());
    }

    #[test]
    fn missing_required_is_a_warning_with_field_list_in_detail() {
        let msg = AppError::MissingRequired(vec!["placa".into(), "conductor".into()]).user_msg();
        assert_eq!(msg.kind, UserMsgKind::Warn);
        assert_eq!(msg.short, "Complete los campos requeridos.");
        assert_eq!(
            msg.detail.as_deref(),
            Some("missing required fields: placa, conductor")
        );
    }

    #[test]
    fn write_failure_maps_to_local_save_message() {
        let msg = AppError::StoreWriteFailed("quota".into()).user_msg();
        assert_eq!(msg.kind, UserMsgKind::Error);
        assert_eq!(msg.short, "Error al guardar datos localmente.");
    }
}
