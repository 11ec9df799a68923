// src/validate/reason.rs

use std::fmt;

use serde::Serialize;

/// Why a field failed one of its rules.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum ReasonCode {
    Required,
    InvalidPlate,
    FutureDate,
    InvalidDate,
    NotPositive,
    BelowMinimum { min: f64 },
    TooLong { max: usize },
    ArrivalBeforeDeparture,
    ArrivalTimeNotAfter,
    InvalidPhone,
    InvalidCedula,
    ForbiddenChars,
}

impl ReasonCode {
    /// Stable key, the same one the browser form reported per control.
    pub fn code(&self) -> &'static str {
        use ReasonCode::*;
        match self {
            Required => "required",
            InvalidPlate => "placaInvalida",
            FutureDate => "fechaFutura",
            InvalidDate => "fechaInvalida",
            NotPositive => "numeroNegativo",
            BelowMinimum { .. } => "min",
            TooLong { .. } => "longitudMaxima",
            ArrivalBeforeDeparture => "fechaLlegadaInvalida",
            ArrivalTimeNotAfter => "horaLlegadaInvalida",
            InvalidPhone => "telefonoInvalido",
            InvalidCedula => "cedulaInvalida",
            ForbiddenChars => "caracteresInvalidos",
        }
    }

    pub fn message(&self) -> String {
        use ReasonCode::*;
        match self {
            Required => "Este campo es requerido".to_string(),
            InvalidPlate => "Formato de placa inválido (ej: ABC-1234)".to_string(),
            FutureDate => "La fecha no puede ser futura".to_string(),
            InvalidDate => "Fecha u hora inválida".to_string(),
            NotPositive => "El número debe ser positivo".to_string(),
            BelowMinimum { min } => format!("El valor mínimo es {min}"),
            TooLong { max } => format!("Máximo {max} caracteres"),
            ArrivalBeforeDeparture => {
                "La fecha de llegada debe ser posterior a la de salida".to_string()
            }
            ArrivalTimeNotAfter => "La hora de llegada debe ser posterior a la de salida".to_string(),
            InvalidPhone => "Teléfono dominicano inválido".to_string(),
            InvalidCedula => "Cédula dominicana inválida".to_string(),
            ForbiddenChars => "Contiene caracteres no permitidos".to_string(),
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ======================================================
// Unit Tests
// ======================================================
