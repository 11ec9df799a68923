// src/validate/mod.rs

//! Field rules and their evaluation against a form's current values.

mod reason;
pub mod rules;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::FieldValue;

pub use reason::ReasonCode;
pub use rules::{parse_date, parse_time, Verdict};

/// A rule attached to one field. Cross-field rules name the siblings they read.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    Required,
    Plate,
    DateNotFuture,
    PositiveNumber,
    MinNumber(f64),
    MaxLength(usize),
    ArrivalDateAfter {
        departure: &'static str,
    },
    ArrivalTimeAfter {
        departure_date: &'static str,
        departure_time: &'static str,
        arrival_date: &'static str,
    },
    NoSpecialChars,
}

impl Rule {
    /// Other fields this rule reads. A change to any of them re-runs the rule.
    pub fn siblings(&self) -> Vec<&'static str> {
        match self {
            Rule::ArrivalDateAfter { departure } => vec![*departure],
            Rule::ArrivalTimeAfter {
                departure_date,
                departure_time,
                arrival_date,
            } => vec![*departure_date, *departure_time, *arrival_date],
            _ => Vec::new(),
        }
    }
}

/// Read access to sibling values during evaluation.
pub trait FieldLookup {
    fn value_of(&self, name: &str) -> Option<&FieldValue>;
}

impl FieldLookup for BTreeMap<String, FieldValue> {
    fn value_of(&self, name: &str) -> Option<&FieldValue> {
        self.get(name)
    }
}

pub struct RuleCtx<'a> {
    pub today: NaiveDate,
    pub fields: &'a dyn FieldLookup,
}

impl RuleCtx<'_> {
    /// Sibling text, or `None` when absent, blank or boolean.
    fn sibling_text(&self, name: &str) -> Option<String> {
        let v = self.fields.value_of(name)?;
        if v.is_blank() {
            return None;
        }
        v.as_text().map(|s| s.into_owned())
    }
}

pub fn check_rule(rule: &Rule, value: &FieldValue, ctx: &RuleCtx<'_>) -> Verdict {
    if value.is_blank() {
        return match rule {
            Rule::Required => Err(ReasonCode::Required),
            _ => Ok(()),
        };
    }

    // Format rules only look at text; booleans have nothing to check.
    let Some(text) = value.as_text() else {
        return Ok(());
    };
    let text = text.as_ref();

    match rule {
        Rule::Required => Ok(()),
        Rule::Plate => rules::plate(text),
        Rule::DateNotFuture => rules::date_not_future(text, ctx.today),
        Rule::PositiveNumber => rules::positive_number(text),
        Rule::MinNumber(min) => rules::min_number(text, *min),
        Rule::MaxLength(max) => rules::max_length(text, *max),
        Rule::ArrivalDateAfter { departure } => {
            rules::arrival_date_after(ctx.sibling_text(departure).as_deref(), text)
        }
        Rule::ArrivalTimeAfter {
            departure_date,
            departure_time,
            arrival_date,
        } => rules::arrival_time_after(
            ctx.sibling_text(departure_date).as_deref(),
            ctx.sibling_text(departure_time).as_deref(),
            ctx.sibling_text(arrival_date).as_deref(),
            text,
        ),
        Rule::NoSpecialChars => rules::no_special_chars(text),
    }
}

/// Every failing reason for `value`, in rule order.
pub fn check_rules(rules: &[Rule], value: &FieldValue, ctx: &RuleCtx<'_>) -> Vec<ReasonCode> {
    rules
        .iter()
        .filter_map(|r| check_rule(r, value, ctx).err())
        .collect()
}

// ======================================================
// reporting
// ======================================================

pub trait ValidationSink {
    fn invalid(&mut self, field: &str, label: &str, reasons: &[ReasonCode]);

    fn stop_early(&self) -> bool;
}

/// Field names of invalid fields, keeping only the first `cap`.
pub struct CappedNames {
    cap: usize,
    names: Vec<String>,
    total: usize,
}

impl CappedNames {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            names: Vec::new(),
            total: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

impl ValidationSink for CappedNames {
    fn invalid(&mut self, field: &str, _label: &str, _reasons: &[ReasonCode]) {
        self.total += 1;
        if self.names.len() < self.cap {
            self.names.push(field.to_string());
        }
    }

    // Every field is visited so each invalid one can be marked touched.
    fn stop_early(&self) -> bool {
        false
    }
}

/// One "Label: message" line per failing reason.
pub struct MessageSink {
    lines: Vec<String>,
}

impl MessageSink {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl Default for MessageSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationSink for MessageSink {
    fn invalid(&mut self, _field: &str, label: &str, reasons: &[ReasonCode]) {
        for r in reasons {
            self.lines.push(format!("{label}: {}", r.message()));
        }
    }

    fn stop_early(&self) -> bool {
        false
    }
}

/// Only the first invalid field.
#[derive(Default)]
pub struct FirstInvalid {
    pub field: Option<(String, ReasonCode)>,
}

impl ValidationSink for FirstInvalid {
    fn invalid(&mut self, field: &str, _label: &str, reasons: &[ReasonCode]) {
        if self.field.is_some() {
            return;
        }
        if let Some(r) = reasons.first() {
            self.field = Some((field.to_string(), r.clone()));
        }
    }

    fn stop_early(&self) -> bool {
        self.field.is_some()
    }
}

// ======================================================
// Unit Tests
// ======================================================
