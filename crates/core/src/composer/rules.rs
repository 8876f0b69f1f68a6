//! Field-level inclusion rules.
//!
//! Each table lists, in print order, the form fields a band may show together with their label
//! and the unit appended after the value. A rule fires only when its field holds a value.

use crate::form::{FormField, FormState};
use crate::NonEmptyText;

/// One conditional label-value pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldRule {
    pub field: FormField,
    pub label: &'static str,
    /// Appended verbatim after the value (note the leading space where one is printed).
    pub unit: &'static str,
}

impl FieldRule {
    const fn new(field: FormField, label: &'static str) -> Self {
        Self {
            field,
            label,
            unit: "",
        }
    }

    const fn with_unit(field: FormField, label: &'static str, unit: &'static str) -> Self {
        Self { field, label, unit }
    }

    /// The field's value when the rule fires.
    pub fn value<'a>(&self, form: &'a FormState) -> Option<&'a str> {
        NonEmptyText::present(form.get(self.field))
    }
}

/// Patient band pairs. The date is not listed: it always renders once the band does.
pub const PATIENT_RULES: [FieldRule; 5] = [
    FieldRule::new(FormField::PatientName, "Patient"),
    FieldRule::new(FormField::PatientAge, "Age"),
    FieldRule::new(FormField::PatientSex, "Sex"),
    FieldRule::new(FormField::PatientAddress, "Address"),
    FieldRule::new(FormField::PatientMobile, "Mobile"),
];

pub const MEDICAL_RULES: [FieldRule; 5] = [
    FieldRule::new(FormField::Dx, "Dx"),
    FieldRule::new(FormField::Cc, "C/C"),
    FieldRule::new(FormField::Oh, "O/H"),
    FieldRule::new(FormField::Ix, "Ix"),
    FieldRule::new(FormField::DrugHistory, "Drug History"),
];

pub const EXAMINATION_RULES: [FieldRule; 12] = [
    FieldRule::with_unit(FormField::Bp, "BP", " mmHg"),
    FieldRule::with_unit(FormField::Pulse, "Pulse", " b/min"),
    FieldRule::with_unit(FormField::Temp, "Temp", " °F"),
    FieldRule::with_unit(FormField::Spo2, "SpO2", "%"),
    FieldRule::new(FormField::Heart, "Heart"),
    FieldRule::new(FormField::Lungs, "Lungs"),
    FieldRule::new(FormField::Abd, "Abd"),
    FieldRule::new(FormField::Anemia, "Anemia"),
    FieldRule::new(FormField::Jaundice, "Jaundice"),
    FieldRule::new(FormField::Cyanosis, "Cyanosis"),
    FieldRule::new(FormField::Oedema, "Oedema"),
    FieldRule::new(FormField::Other, "Other"),
];

/// Rules from `rules` that fire for `form`, paired with their values, in table order.
pub fn firing<'a>(
    rules: &'a [FieldRule],
    form: &'a FormState,
) -> impl Iterator<Item = (&'a FieldRule, &'a str)> + 'a {
    rules
        .iter()
        .filter_map(move |rule| rule.value(form).map(|value| (rule, value)))
}
