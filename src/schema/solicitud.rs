// src/schema/solicitud.rs

use chrono::{Duration, NaiveDate};

use crate::types::{FieldValue, FormKind};
use crate::validate::Rule;

use super::{FieldSpec, FormSchema};

const REQUEST: &str = "Datos de la solicitud";
const DEPARTURE: &str = "Salida";
const ARRIVAL: &str = "Llegada";
const DETAILS: &str = "Detalle del servicio";
const SIGNERS: &str = "Responsables y autorización";

const SIGNIFICANT: &[&str] = &["dependencia", "tipoServicio", "fechaSalida", "puntoSalida"];
const PRINT_REQUIRED: &[&str] = &["dependencia", "tipoServicio", "fechaSalida", "puntoSalida"];

pub(super) fn schema() -> FormSchema {
    let fields = vec![
        FieldSpec::date("fechaSolicitud", "Fecha de solicitud")
            .required()
            .rule(Rule::DateNotFuture)
            .default_today()
            .in_section(REQUEST),
        FieldSpec::text("dependencia", "Dependencia")
            .required()
            .rule(Rule::MaxLength(150))
            .in_section(REQUEST),
        FieldSpec::text("tipoServicio", "Tipo de servicio")
            .required()
            .rule(Rule::MaxLength(100))
            .in_section(REQUEST),
        FieldSpec::number("cantidadPersonas", "Cantidad de personas")
            .required()
            .rule(Rule::MinNumber(1.0))
            .in_section(REQUEST),
        FieldSpec::date("fechaSalida", "Fecha de salida")
            .required()
            .in_section(DEPARTURE),
        FieldSpec::time("horaSalida", "Hora de salida")
            .required()
            .in_section(DEPARTURE),
        FieldSpec::text("puntoSalida", "Punto de salida")
            .required()
            .rule(Rule::MaxLength(200))
            .in_section(DEPARTURE),
        FieldSpec::date("fechaLlegada", "Fecha de llegada")
            .required()
            .rule(Rule::ArrivalDateAfter {
                departure: "fechaSalida",
            })
            .in_section(ARRIVAL),
        FieldSpec::time("horaLlegada", "Hora de llegada")
            .required()
            .rule(Rule::ArrivalTimeAfter {
                departure_date: "fechaSalida",
                departure_time: "horaSalida",
                arrival_date: "fechaLlegada",
            })
            .in_section(ARRIVAL),
        FieldSpec::text("puntoLlegada", "Punto de llegada")
            .required()
            .rule(Rule::MaxLength(200))
            .in_section(ARRIVAL),
        FieldSpec::long_text("lugaresVisitar", "Lugares a visitar")
            .required()
            .rule(Rule::MaxLength(300))
            .in_section(DETAILS),
        FieldSpec::long_text("trabajoRealizar", "Trabajo a realizar")
            .required()
            .rule(Rule::MaxLength(300))
            .in_section(DETAILS),
        FieldSpec::long_text("observaciones", "Observaciones")
            .rule(Rule::MaxLength(500))
            .rule(Rule::NoSpecialChars)
            .in_section(DETAILS),
        FieldSpec::text("nombreResponsable", "Nombre del responsable")
            .required()
            .rule(Rule::MaxLength(100))
            .in_section(SIGNERS),
        FieldSpec::text("cargoResponsable", "Cargo del responsable")
            .required()
            .rule(Rule::MaxLength(100))
            .in_section(SIGNERS),
        FieldSpec::text("autorizadoPor", "Autorizado por")
            .required()
            .rule(Rule::MaxLength(100))
            .in_section(SIGNERS),
        FieldSpec::text("sello1", "Sello 1").in_section(SIGNERS),
        FieldSpec::text("sello2", "Sello 2").in_section(SIGNERS),
        FieldSpec::text("directorAdministrativo", "Director administrativo")
            .required()
            .rule(Rule::MaxLength(100))
            .in_section(SIGNERS),
    ];

    FormSchema::new(
        FormKind::Solicitud,
        fields,
        SIGNIFICANT,
        PRINT_REQUIRED,
        sample,
    )
}

fn sample(today: NaiveDate) -> Vec<(&'static str, FieldValue)> {
    let iso = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
    let salida = today + Duration::days(1);

    vec![
        ("fechaSolicitud", iso(today).into()),
        ("dependencia", "DEPARTAMENTO DE SALUD PÚBLICA".into()),
        ("tipoServicio", "TRANSPORTE DE PERSONAL".into()),
        ("cantidadPersonas", 4i64.into()),
        ("fechaSalida", iso(salida).into()),
        ("horaSalida", "07:30".into()),
        ("puntoSalida", "SEDE CENTRAL".into()),
        ("fechaLlegada", iso(salida).into()),
        ("horaLlegada", "16:00".into()),
        ("puntoLlegada", "HOSPITAL REGIONAL".into()),
        ("lugaresVisitar", "HOSPITAL REGIONAL, CENTRO DE SALUD URBANO".into()),
        ("trabajoRealizar", "SUPERVISIÓN DE JORNADA DE VACUNACIÓN".into()),
        ("observaciones", "SALIDA PUNTUAL".into()),
        ("nombreResponsable", "ANA LÓPEZ".into()),
        ("cargoResponsable", "ENCARGADA DE LOGÍSTICA".into()),
        ("autorizadoPor", "ROBERTO SÁNCHEZ".into()),
        ("directorAdministrativo", "ROBERTO SÁNCHEZ".into()),
    ]
}
