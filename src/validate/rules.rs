// src/validate/rules.rs

//! Pure field predicates. Each takes the textual value (already known to be
//! non-empty) plus whatever siblings it needs, and never looks at the form.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use super::reason::ReasonCode;

pub type Verdict = Result<(), ReasonCode>;

const FORBIDDEN_CHARS: [char; 6] = ['<', '>', '\'', '"', '{', '}'];

fn plate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Z]{2,3}-?\d{3,4}$|^[A-Z]\d{3}[A-Z]{3}$").expect("plate pattern compiles")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(809|829|849)\d{7}$").expect("phone pattern compiles"))
}

/// `YYYY-MM-DD`, as produced by a date input.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// `HH:MM` or `HH:MM:SS`, 24 h.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

pub fn plate(s: &str) -> Verdict {
    if plate_re().is_match(&s.to_uppercase()) {
        Ok(())
    } else {
        Err(ReasonCode::InvalidPlate)
    }
}

/// Calendar date must not be after `today`.
pub fn date_not_future(s: &str, today: NaiveDate) -> Verdict {
    let date = parse_date(s).ok_or(ReasonCode::InvalidDate)?;
    if date <= today {
        Ok(())
    } else {
        Err(ReasonCode::FutureDate)
    }
}

pub fn positive_number(s: &str) -> Verdict {
    match parse_number(s) {
        Some(n) if n > 0.0 => Ok(()),
        _ => Err(ReasonCode::NotPositive),
    }
}

pub fn min_number(s: &str, min: f64) -> Verdict {
    match parse_number(s) {
        Some(n) if n >= min => Ok(()),
        _ => Err(ReasonCode::BelowMinimum { min }),
    }
}

pub fn max_length(s: &str, max: usize) -> Verdict {
    if s.chars().count() <= max {
        Ok(())
    } else {
        Err(ReasonCode::TooLong { max })
    }
}

/// Arrival must be on or after departure. Missing departure passes.
pub fn arrival_date_after(departure: Option<&str>, arrival: &str) -> Verdict {
    let Some(departure) = departure else {
        return Ok(());
    };

    match (parse_date(departure), parse_date(arrival)) {
        (Some(d), Some(a)) if a >= d => Ok(()),
        _ => Err(ReasonCode::ArrivalBeforeDeparture),
    }
}

/// Arrival instant strictly after departure instant. Any missing piece passes.
pub fn arrival_time_after(
    departure_date: Option<&str>,
    departure_time: Option<&str>,
    arrival_date: Option<&str>,
    arrival_time: &str,
) -> Verdict {
    let (Some(dd), Some(dt), Some(ad)) = (departure_date, departure_time, arrival_date) else {
        return Ok(());
    };

    let departure = parse_date(dd)
        .zip(parse_time(dt))
        .map(|(d, t)| NaiveDateTime::new(d, t));
    let arrival = parse_date(ad)
        .zip(parse_time(arrival_time))
        .map(|(d, t)| NaiveDateTime::new(d, t));

    match (departure, arrival) {
        (Some(d), Some(a)) if a > d => Ok(()),
        _ => Err(ReasonCode::ArrivalTimeNotAfter),
    }
}

pub fn dominican_phone(s: &str) -> Verdict {
    if phone_re().is_match(&digits_only(s)) {
        Ok(())
    } else {
        Err(ReasonCode::InvalidPhone)
    }
}

pub fn dominican_cedula(s: &str) -> Verdict {
    if digits_only(s).len() == 11 {
        Ok(())
    } else {
        Err(ReasonCode::InvalidCedula)
    }
}

pub fn no_special_chars(s: &str) -> Verdict {
    if s.contains(FORBIDDEN_CHARS) {
        Err(ReasonCode::ForbiddenChars)
    } else {
        Ok(())
    }
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn plate_formats() {
        for ok in ["ABC-1234", "ABC1234", "abc-123", "AB-1234", "A123AAA", "a123bcd"] {
            assert_eq!(plate(ok), Ok(()), "{ok}");
        }
        for bad in ["ABCD-1234", "AB-12", "1234-ABC", "A123AA", "ABC 1234", "ABC--1234"] {
            assert_eq!(plate(bad), Err(ReasonCode::InvalidPlate), "{bad}");
        }
    }

    #[test]
    fn date_not_future_ignores_time_of_day() {
        let today = d("2024-01-10");
        assert_eq!(date_not_future("2024-01-10", today), Ok(()));
        assert_eq!(date_not_future("2023-12-31", today), Ok(()));
        assert_eq!(date_not_future("2024-01-11", today), Err(ReasonCode::FutureDate));
        assert_eq!(date_not_future("10/01/2024", today), Err(ReasonCode::InvalidDate));
    }

    #[test]
    fn positive_number_is_strict() {
        assert_eq!(positive_number("50.5"), Ok(()));
        assert_eq!(positive_number(" 3 "), Ok(()));
        for bad in ["0", "-5", "abc", "50abc", "NaN", "inf"] {
            assert_eq!(positive_number(bad), Err(ReasonCode::NotPositive), "{bad}");
        }
    }

    #[test]
    fn min_and_max_bounds() {
        assert_eq!(min_number("1", 1.0), Ok(()));
        assert_eq!(min_number("0", 1.0), Err(ReasonCode::BelowMinimum { min: 1.0 }));
        assert_eq!(max_length("ñññ", 3), Ok(()));
        assert_eq!(max_length("abcd", 3), Err(ReasonCode::TooLong { max: 3 }));
    }

    #[test]
    fn arrival_date_ordering() {
        assert_eq!(
            arrival_date_after(Some("2024-01-10"), "2024-01-09"),
            Err(ReasonCode::ArrivalBeforeDeparture)
        );
        assert_eq!(arrival_date_after(Some("2024-01-10"), "2024-01-10"), Ok(()));
        assert_eq!(arrival_date_after(Some("2024-01-10"), "2024-02-01"), Ok(()));
        assert_eq!(arrival_date_after(None, "2024-01-09"), Ok(()));
    }

    #[test]
    fn arrival_time_ordering() {
        let ok = arrival_time_after(Some("2024-01-10"), Some("08:00"), Some("2024-01-10"), "09:30");
        assert_eq!(ok, Ok(()));

        let same = arrival_time_after(Some("2024-01-10"), Some("08:00"), Some("2024-01-10"), "08:00");
        assert_eq!(same, Err(ReasonCode::ArrivalTimeNotAfter));

        let next_day =
            arrival_time_after(Some("2024-01-10"), Some("18:00"), Some("2024-01-11"), "07:00");
        assert_eq!(next_day, Ok(()));

        assert_eq!(arrival_time_after(Some("2024-01-10"), None, Some("2024-01-10"), "07:00"), Ok(()));
    }

    #[test]
    fn dominican_identity_formats() {
        assert_eq!(dominican_phone("(809) 555-1234"), Ok(()));
        assert_eq!(dominican_phone("849-555-1234"), Ok(()));
        assert_eq!(dominican_phone("305-555-1234"), Err(ReasonCode::InvalidPhone));
        assert_eq!(dominican_cedula("001-1234567-8"), Ok(()));
        assert_eq!(dominican_cedula("001-123456-8"), Err(ReasonCode::InvalidCedula));
    }

    #[test]
    fn special_chars_are_rejected() {
        assert_eq!(no_special_chars("Viaje a Santiago, 3 días"), Ok(()));
        for bad in ["<b>", "it's", "\"x\"", "{a}"] {
            assert_eq!(no_special_chars(bad), Err(ReasonCode::ForbiddenChars), "{bad}");
        }
    }

    #[test]
    fn time_parsing_accepts_seconds() {
        assert!(parse_time("08:15").is_some());
        assert!(parse_time("08:15:30").is_some());
        assert!(parse_time("8h15").is_none());
    }
}
