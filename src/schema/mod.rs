// src/schema/mod.rs

//! Static description of each form: fields in display order, their rules,
//! defaults, and the reverse dependency map used to re-validate siblings.

mod requisicion;
mod solicitud;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::NaiveDate;

use crate::types::{FieldValue, FormKind};
use crate::validate::Rule;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Text,
    LongText,
    Date,
    Time,
    Number,
    Flag,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldDefault {
    Empty,
    False,
    Today,
}

#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub section: &'static str,
    pub input: InputKind,
    pub default: FieldDefault,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    fn new(name: &'static str, label: &'static str, input: InputKind) -> Self {
        let default = match input {
            InputKind::Flag => FieldDefault::False,
            _ => FieldDefault::Empty,
        };
        Self {
            name,
            label,
            section: "",
            input,
            default,
            rules: Vec::new(),
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, InputKind::Text)
    }

    pub fn long_text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, InputKind::LongText)
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, InputKind::Date)
    }

    pub fn time(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, InputKind::Time)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, InputKind::Number)
    }

    pub fn flag(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, InputKind::Flag)
    }

    pub fn required(mut self) -> Self {
        if !self.is_required() {
            self.rules.insert(0, Rule::Required);
        }
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn default_today(mut self) -> Self {
        self.default = FieldDefault::Today;
        self
    }

    pub fn in_section(mut self, section: &'static str) -> Self {
        self.section = section;
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }

    pub fn default_value(&self, today: NaiveDate) -> FieldValue {
        match self.default {
            FieldDefault::Empty => FieldValue::Empty,
            FieldDefault::False => FieldValue::Bool(false),
            FieldDefault::Today => FieldValue::Text(today.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Example values for a demonstration fill, dated relative to `today`.
pub type SampleFn = fn(NaiveDate) -> Vec<(&'static str, FieldValue)>;

#[derive(Debug)]
pub struct FormSchema {
    kind: FormKind,
    fields: Vec<FieldSpec>,
    index: BTreeMap<&'static str, usize>,
    dependents: BTreeMap<&'static str, Vec<&'static str>>,
    significant: &'static [&'static str],
    print_required: &'static [&'static str],
    sample: SampleFn,
}

impl FormSchema {
    pub fn new(
        kind: FormKind,
        fields: Vec<FieldSpec>,
        significant: &'static [&'static str],
        print_required: &'static [&'static str],
        sample: SampleFn,
    ) -> Self {
        let index: BTreeMap<&'static str, usize> =
            fields.iter().enumerate().map(|(i, f)| (f.name, i)).collect();
        debug_assert_eq!(index.len(), fields.len(), "duplicate field name in {kind} schema");

        let mut dependents: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
        for f in &fields {
            for sibling in f.rules.iter().flat_map(Rule::siblings) {
                debug_assert!(
                    index.contains_key(sibling),
                    "{kind}.{} depends on unknown field {sibling}",
                    f.name
                );
                let deps = dependents.entry(sibling).or_default();
                if !deps.contains(&f.name) {
                    deps.push(f.name);
                }
            }
        }

        for name in significant.iter().chain(print_required) {
            debug_assert!(index.contains_key(name), "{kind}: unknown field {name}");
        }

        Self {
            kind,
            fields,
            index,
            dependents,
            significant,
            print_required,
            sample,
        }
    }

    pub fn for_kind(kind: FormKind) -> &'static FormSchema {
        static REQUISICION: OnceLock<FormSchema> = OnceLock::new();
        static SOLICITUD: OnceLock<FormSchema> = OnceLock::new();

        match kind {
            FormKind::Requisicion => REQUISICION.get_or_init(requisicion::schema),
            FormKind::Solicitud => SOLICITUD.get_or_init(solicitud::schema),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Index of `name` in display order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fields whose rules read `name`.
    pub fn dependents_of(&self, name: &str) -> &[&'static str] {
        self.dependents.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn significant(&self) -> &'static [&'static str] {
        self.significant
    }

    pub fn print_required(&self) -> &'static [&'static str] {
        self.print_required
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.is_required())
    }

    pub fn sample_values(&self, today: NaiveDate) -> Vec<(&'static str, FieldValue)> {
        (self.sample)(today)
    }
}

// ======================================================
// Unit Tests
// ======================================================
