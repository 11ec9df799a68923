// tests/draft_restore.rs

mod common;

use common::{as_map, fill, TestEnv};
use formulario_transporte_lib::{
    activity_log::take_store_failure_pending,
    command_state::{lock_store, with_store},
    error::UserMsgKind,
    form::{save_draft, DRAFT_RESTORED},
    guard::UnsavedChanges,
    notify::RecordingNotifier,
    schema::FormSchema,
    types::{FieldValue, FormKind},
};
use serde_json::json;

#[test]
fn autosaved_draft_is_restored_into_a_fresh_form() {
    let env = TestEnv::new();
    let mut n = RecordingNotifier::new();

    let edits = [
        ("dependencia", FieldValue::text("SALUD")),
        ("tipoServicio", FieldValue::text("CARGA")),
        ("fechaSalida", FieldValue::text("2024-01-12")),
        ("puntoSalida", FieldValue::text("SEDE")),
        ("cantidadPersonas", FieldValue::Number(3.0)),
        ("observaciones", FieldValue::text("")),
    ];

    let saved = {
        let mut ctl = env.open(FormKind::Solicitud, &mut n);
        fill(&mut ctl, &edits);
        env.clock.advance_ms(2_000);
        assert!(ctl.tick(&mut n).draft_saved);
        let values = ctl.form().values();
        ctl.teardown();
        values
    };

    let mut n2 = RecordingNotifier::new();
    let ctl = env.open(FormKind::Solicitud, &mut n2);

    assert_eq!(ctl.form().values(), saved);
    assert!(ctl.has_unsaved_changes());
    assert_eq!(
        n2.of_kind(UserMsgKind::Info),
        vec![DRAFT_RESTORED]
    );
    // The restored form is a new entry, not the one that was being edited.
    assert_eq!(ctl.identifier(), "SOL-240110-0002");
}

#[test]
fn draft_without_significant_values_is_not_restored() {
    let env = TestEnv::new();
    let schema = FormSchema::for_kind(FormKind::Requisicion);

    with_store(&env.state, |s| {
        save_draft(
            s,
            FormKind::Requisicion,
            &as_map(&[
                ("registradoPor", FieldValue::text("JUAN")),
                ("gasolina", FieldValue::Bool(true)),
                ("placa", FieldValue::text("  ")),
            ]),
        )
    })
    .unwrap();

    let mut n = RecordingNotifier::new();
    let ctl = env.open(FormKind::Requisicion, &mut n);

    assert!(!ctl.has_unsaved_changes());
    assert!(n.messages.is_empty());
    for spec in schema.fields() {
        assert_eq!(
            ctl.value(spec.name),
            Some(&spec.default_value(env.today())),
            "{}",
            spec.name
        );
    }

    // Left in place; the next edit overwrites it.
    let store = lock_store(&env.state).unwrap();
    assert!(store.load(FormKind::Requisicion.draft_key()).unwrap().is_some());
}

#[test]
fn unknown_and_malformed_draft_entries_are_dropped() {
    let env = TestEnv::new();

    with_store(&env.state, |s| {
        s.save(
            FormKind::Requisicion.draft_key(),
            &json!({
                "placa": "ABC-1234",
                "campoViejo": "x",
                "conductor": ["no"],
            }),
        )
    })
    .unwrap();

    let mut n = RecordingNotifier::new();
    let ctl = env.open(FormKind::Requisicion, &mut n);

    assert_eq!(ctl.value("placa"), Some(&FieldValue::text("ABC-1234")));
    assert_eq!(ctl.value("conductor"), Some(&FieldValue::Empty));
    assert!(ctl.value("campoViejo").is_none());
    assert_eq!(ctl.changed_fields(), vec!["placa"]);
}

#[test]
fn corrupt_draft_is_reported_and_form_opens_clean() {
    let env = TestEnv::new();
    env.state
        .store
        .lock()
        .unwrap()
        .backend_mut()
        .set("formulario_borrador_solicitudTransporte", "{not json")
        .unwrap();

    let mut n = RecordingNotifier::new();
    let ctl = env.open(FormKind::Solicitud, &mut n);

    assert!(!ctl.has_unsaved_changes());
    assert_eq!(n.last().unwrap().0, UserMsgKind::Error);
    assert!(take_store_failure_pending(&env.state));
    assert!(!take_store_failure_pending(&env.state));
}

#[test]
fn teardown_drops_the_pending_autosave() {
    let env = TestEnv::new();
    let mut n = RecordingNotifier::new();
    let mut ctl = env.open(FormKind::Solicitud, &mut n);

    ctl.update_field("dependencia", "SALUD").unwrap();
    ctl.teardown();
    env.clock.advance_ms(5_000);
    ctl.tick(&mut n);

    let store = lock_store(&env.state).unwrap();
    assert!(store.load(FormKind::Solicitud.draft_key()).unwrap().is_none());
}
