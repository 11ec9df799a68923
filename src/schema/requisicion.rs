// src/schema/requisicion.rs

use chrono::NaiveDate;

use crate::types::{FieldValue, FormKind};
use crate::validate::Rule;

use super::{FieldSpec, FormSchema};

const GENERAL: &str = "Datos generales";
const VEHICLE: &str = "Datos del vehículo";
const FUEL: &str = "Combustible";
const SERVICE: &str = "Servicios";
const HANDOVER: &str = "Recepción y devolución";
const TRIP: &str = "Datos del viaje";
const NOTES: &str = "Observaciones";
const SIGNERS: &str = "Firmas";

const SIGNIFICANT: &[&str] = &["dependencia", "placa", "conductor"];
const PRINT_REQUIRED: &[&str] = &["fecha", "dependencia", "placa", "conductor"];

pub(super) fn schema() -> FormSchema {
    let fields = vec![
        FieldSpec::date("fecha", "Fecha")
            .required()
            .rule(Rule::DateNotFuture)
            .in_section(GENERAL),
        FieldSpec::time("hora", "Hora").in_section(GENERAL),
        FieldSpec::text("dependencia", "Dependencia")
            .required()
            .rule(Rule::MaxLength(150))
            .in_section(GENERAL),
        FieldSpec::text("registradoPor", "Registrado por")
            .rule(Rule::MaxLength(100))
            .in_section(GENERAL),
        FieldSpec::text("ficha", "Ficha")
            .rule(Rule::MaxLength(50))
            .in_section(VEHICLE),
        FieldSpec::text("placa", "Placa")
            .required()
            .rule(Rule::Plate)
            .in_section(VEHICLE),
        FieldSpec::text("marca", "Marca")
            .rule(Rule::MaxLength(50))
            .in_section(VEHICLE),
        FieldSpec::text("modelo", "Modelo")
            .rule(Rule::MaxLength(50))
            .in_section(VEHICLE),
        FieldSpec::text("anio", "Año")
            .rule(Rule::MaxLength(4))
            .in_section(VEHICLE),
        FieldSpec::text("chassis", "Chasis")
            .rule(Rule::MaxLength(50))
            .in_section(VEHICLE),
        FieldSpec::text("conductor", "Conductor")
            .required()
            .rule(Rule::MaxLength(100))
            .in_section(VEHICLE),
        FieldSpec::flag("gasolina", "Gasolina").in_section(FUEL),
        FieldSpec::flag("gasOil", "Gasoil").in_section(FUEL),
        FieldSpec::number("valorSolicitado", "Valor solicitado")
            .rule(Rule::PositiveNumber)
            .in_section(FUEL),
        FieldSpec::number("galones", "Galones")
            .rule(Rule::PositiveNumber)
            .in_section(FUEL),
        FieldSpec::number("dop", "DOP")
            .rule(Rule::PositiveNumber)
            .in_section(FUEL),
        FieldSpec::text("incluidoEn", "Incluido en")
            .rule(Rule::MaxLength(50))
            .in_section(FUEL),
        FieldSpec::long_text("mantenimientoRutinario", "Mantenimiento rutinario")
            .rule(Rule::MaxLength(300))
            .in_section(SERVICE),
        FieldSpec::long_text("sustitucion", "Sustitución")
            .rule(Rule::MaxLength(300))
            .in_section(SERVICE),
        FieldSpec::long_text("reparacion", "Reparación")
            .rule(Rule::MaxLength(300))
            .in_section(SERVICE),
        FieldSpec::flag("carga", "Carga").in_section(SERVICE),
        FieldSpec::flag("ambulancia", "Ambulancia").in_section(SERVICE),
        FieldSpec::date("fechaRecepcion", "Fecha de recepción")
            .rule(Rule::DateNotFuture)
            .in_section(HANDOVER),
        FieldSpec::text("recepcionPor", "Recibido por")
            .rule(Rule::MaxLength(100))
            .in_section(HANDOVER),
        FieldSpec::date("fechaDevolucion", "Fecha de devolución")
            .rule(Rule::ArrivalDateAfter {
                departure: "fechaRecepcion",
            })
            .in_section(HANDOVER),
        FieldSpec::text("devolucionPor", "Devuelto por")
            .rule(Rule::MaxLength(100))
            .in_section(HANDOVER),
        FieldSpec::number("cantidadPasajeros", "Cantidad de pasajeros")
            .rule(Rule::PositiveNumber)
            .in_section(TRIP),
        FieldSpec::long_text("lugaresVisitar", "Lugares a visitar")
            .rule(Rule::MaxLength(300))
            .in_section(TRIP),
        FieldSpec::long_text("actividadRealizar", "Actividad a realizar")
            .rule(Rule::MaxLength(300))
            .in_section(TRIP),
        FieldSpec::date("fechaViaje", "Fecha del viaje").in_section(TRIP),
        FieldSpec::long_text("observaciones", "Observaciones")
            .rule(Rule::MaxLength(500))
            .rule(Rule::NoSpecialChars)
            .in_section(NOTES),
        FieldSpec::text("responsableDependencia", "Responsable de la dependencia")
            .rule(Rule::MaxLength(150))
            .in_section(SIGNERS),
        FieldSpec::text("nombreResponsable", "Nombre del responsable")
            .rule(Rule::MaxLength(100))
            .in_section(SIGNERS),
        FieldSpec::text("directorAdministrativo", "Director administrativo")
            .rule(Rule::MaxLength(100))
            .in_section(SIGNERS),
        FieldSpec::text("cargo", "Cargo")
            .rule(Rule::MaxLength(100))
            .in_section(SIGNERS),
    ];

    FormSchema::new(
        FormKind::Requisicion,
        fields,
        SIGNIFICANT,
        PRINT_REQUIRED,
        sample,
    )
}

fn sample(today: NaiveDate) -> Vec<(&'static str, FieldValue)> {
    let hoy = today.format("%Y-%m-%d").to_string();

    vec![
        ("fecha", hoy.clone().into()),
        ("hora", "08:00".into()),
        ("dependencia", "DEPARTAMENTO DE SALUD PÚBLICA".into()),
        ("registradoPor", "JUAN PÉREZ".into()),
        ("ficha", "FIC-2023-001".into()),
        ("placa", "ABC-1234".into()),
        ("marca", "TOYOTA".into()),
        ("modelo", "HILUX".into()),
        ("anio", "2022".into()),
        ("chassis", "CHS-123456789".into()),
        ("conductor", "CARLOS RODRÍGUEZ".into()),
        ("gasolina", true.into()),
        ("valorSolicitado", "2500.00".into()),
        ("galones", "50.00".into()),
        ("dop", "50.00".into()),
        ("incluidoEn", "asignacion".into()),
        ("mantenimientoRutinario", "CAMBIO DE ACEITE Y FILTROS".into()),
        ("sustitucion", "2 GOMAS TRASERAS".into()),
        ("reparacion", "SISTEMA DE FRENOS".into()),
        ("carga", false.into()),
        ("ambulancia", false.into()),
        ("fechaRecepcion", hoy.clone().into()),
        ("recepcionPor", "MARÍA GARCÍA".into()),
        ("fechaDevolucion", hoy.clone().into()),
        ("devolucionPor", "PEDRO MARTÍNEZ".into()),
        ("cantidadPasajeros", 3i64.into()),
        ("lugaresVisitar", "HOSPITAL REGIONAL, CENTRO DE SALUD URBANO".into()),
        ("actividadRealizar", "TRANSPORTE DE PERSONAL Y MATERIALES".into()),
        ("fechaViaje", hoy.into()),
        ("observaciones", "URGENTE - NECESARIO PARA EMERGENCIA".into()),
        ("responsableDependencia", "DEPARTAMENTO DE LOGÍSTICA".into()),
        ("nombreResponsable", "ANA LÓPEZ".into()),
        ("directorAdministrativo", "ROBERTO SÁNCHEZ".into()),
        ("cargo", "DIRECTOR ADMINISTRATIVO".into()),
    ]
}
