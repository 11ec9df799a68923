// tests/validators_prop.rs

use chrono::{Duration, NaiveDate};
use formulario_transporte_lib::validate::{rules, ReasonCode};
use proptest::prelude::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn plates_in_accepted_shapes_pass(
        plate in prop_oneof![
            "[A-Za-z]{3}-[0-9]{4}",
            "[A-Za-z]{3}[0-9]{4}",
            "[A-Za-z][0-9]{3}[A-Za-z]{3}",
        ]
    ) {
        prop_assert_eq!(rules::plate(&plate), Ok(()));
    }

    #[test]
    fn plates_with_foreign_characters_fail(
        head in "[A-Za-z0-9]{0,4}",
        bad in "[ !#$%&()*+,./:;=?@_~]",
        tail in "[A-Za-z0-9]{0,4}",
    ) {
        let s = format!("{head}{bad}{tail}");
        prop_assert_eq!(rules::plate(&s), Err(ReasonCode::InvalidPlate));
    }

    #[test]
    fn digits_only_plates_fail(s in "[0-9]{6,8}") {
        prop_assert_eq!(rules::plate(&s), Err(ReasonCode::InvalidPlate));
    }

    #[test]
    fn date_not_future_splits_at_today(offset in -3650i64..3650) {
        let d = today() + Duration::days(offset);
        let verdict = rules::date_not_future(&iso(d), today());
        if offset > 0 {
            prop_assert_eq!(verdict, Err(ReasonCode::FutureDate));
        } else {
            prop_assert_eq!(verdict, Ok(()));
        }
    }

    #[test]
    fn positive_number_matches_sign(n in -1.0e9f64..1.0e9) {
        let verdict = rules::positive_number(&n.to_string());
        if n > 0.0 {
            prop_assert_eq!(verdict, Ok(()));
        } else {
            prop_assert_eq!(verdict, Err(ReasonCode::NotPositive));
        }
    }

    #[test]
    fn non_numeric_text_is_not_positive(s in "[a-zA-Z ]{1,12}") {
        prop_assert_eq!(rules::positive_number(&s), Err(ReasonCode::NotPositive));
    }

    #[test]
    fn arrival_on_or_after_departure_passes(gap in -400i64..400) {
        let departure = today();
        let arrival = departure + Duration::days(gap);
        let verdict = rules::arrival_date_after(Some(&iso(departure)), &iso(arrival));
        if gap >= 0 {
            prop_assert_eq!(verdict, Ok(()));
        } else {
            prop_assert_eq!(verdict, Err(ReasonCode::ArrivalBeforeDeparture));
        }
    }
}

#[test]
fn positive_number_examples() {
    assert_eq!(rules::positive_number("50.5"), Ok(()));
    for bad in ["0", "-5", "abc", "", "50abc"] {
        assert_eq!(rules::positive_number(bad), Err(ReasonCode::NotPositive), "{bad}");
    }
}

#[test]
fn arrival_examples() {
    assert_eq!(
        rules::arrival_date_after(Some("2024-01-10"), "2024-01-09"),
        Err(ReasonCode::ArrivalBeforeDeparture)
    );
    assert_eq!(rules::arrival_date_after(Some("2024-01-10"), "2024-01-10"), Ok(()));
    assert_eq!(rules::arrival_date_after(Some("2024-01-10"), "2024-02-01"), Ok(()));
    assert_eq!(rules::arrival_date_after(None, "2024-01-09"), Ok(()));
}
