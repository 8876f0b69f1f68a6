//! In-memory form state.
//!
//! One patient, one set of medical notes, one examination and one prescription body exist at a
//! time. Nothing here is persisted; a reset (or a process restart) blanks every record and sets
//! the visit date to the current day.

use crate::{PrescriptionError, PrescriptionResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Format of the visit date as entered on the form.
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// The current day in the local time zone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientRecord {
    pub name: String,
    pub sex: String,
    pub age: String,
    pub address: String,
    pub mobile: String,
    /// Visit date, `YYYY-MM-DD`.
    pub date: String,
}

impl PatientRecord {
    /// A blank record dated `today`.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            date: today.format(FORM_DATE_FORMAT).to_string(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicalRecord {
    pub dx: String,
    pub cc: String,
    pub oh: String,
    pub ix: String,
    pub drug_history: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ExaminationRecord {
    pub bp: String,
    pub pulse: String,
    pub temp: String,
    pub spo2: String,
    pub heart: String,
    pub lungs: String,
    pub abd: String,
    pub anemia: String,
    pub jaundice: String,
    pub cyanosis: String,
    pub oedema: String,
    pub other: String,
}

impl ExaminationRecord {
    /// Whether any finding has been entered.
    pub fn has_findings(&self) -> bool {
        FormField::EXAMINATION
            .iter()
            .any(|field| !field.value_in_examination(self).is_empty())
    }
}

/// Everything entered on the form for the current patient.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FormState {
    pub patient: PatientRecord,
    pub medical: MedicalRecord,
    pub examination: ExaminationRecord,
    /// Free-text prescription body.
    pub prescription: String,
}

impl FormState {
    /// A blank form dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            patient: PatientRecord::blank(today),
            ..Self::default()
        }
    }

    /// Blank every record; the visit date becomes `today`.
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    /// Set a single field, replacing its previous value.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn get(&self, field: FormField) -> &str {
        match field.group() {
            FieldGroup::Patient => field.value_in_patient(&self.patient),
            FieldGroup::Medical => field.value_in_medical(&self.medical),
            FieldGroup::Examination => field.value_in_examination(&self.examination),
            FieldGroup::Prescription => &self.prescription,
        }
    }

    /// Apply `key=value` style edits, stopping at the first unknown key.
    pub fn apply<'a, I>(&mut self, edits: I) -> PrescriptionResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in edits {
            let field = key.parse::<FormField>()?;
            self.set(field, value);
        }
        Ok(())
    }

    /// Build a fresh form from submitted key/value pairs.
    ///
    /// Unknown keys are skipped (and logged at debug) so that submit buttons and other
    /// non-field inputs can travel with the form.
    pub fn from_submission<'a, I>(today: NaiveDate, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form = Self::new(today);
        for (key, value) in pairs {
            match key.parse::<FormField>() {
                Ok(field) => form.set(field, value.replace("\r\n", "\n")),
                Err(_) => tracing::debug!("ignoring non-field form key: {}", key),
            }
        }
        form
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        use FormField::*;
        match field {
            PatientName => &mut self.patient.name,
            PatientSex => &mut self.patient.sex,
            PatientAge => &mut self.patient.age,
            PatientAddress => &mut self.patient.address,
            PatientMobile => &mut self.patient.mobile,
            PatientDate => &mut self.patient.date,
            Dx => &mut self.medical.dx,
            Cc => &mut self.medical.cc,
            Oh => &mut self.medical.oh,
            Ix => &mut self.medical.ix,
            DrugHistory => &mut self.medical.drug_history,
            Bp => &mut self.examination.bp,
            Pulse => &mut self.examination.pulse,
            Temp => &mut self.examination.temp,
            Spo2 => &mut self.examination.spo2,
            Heart => &mut self.examination.heart,
            Lungs => &mut self.examination.lungs,
            Abd => &mut self.examination.abd,
            Anemia => &mut self.examination.anemia,
            Jaundice => &mut self.examination.jaundice,
            Cyanosis => &mut self.examination.cyanosis,
            Oedema => &mut self.examination.oedema,
            Other => &mut self.examination.other,
            Prescription => &mut self.prescription,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldGroup {
    Patient,
    Medical,
    Examination,
    Prescription,
}

/// Every editable form field.
///
/// Fields are addressed as `<group>.<name>`, for example `patient.name`, `medical.drugHistory`
/// or `examination.spo2`; the prescription body is simply `prescription`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    PatientName,
    PatientSex,
    PatientAge,
    PatientAddress,
    PatientMobile,
    PatientDate,
    Dx,
    Cc,
    Oh,
    Ix,
    DrugHistory,
    Bp,
    Pulse,
    Temp,
    Spo2,
    Heart,
    Lungs,
    Abd,
    Anemia,
    Jaundice,
    Cyanosis,
    Oedema,
    Other,
    Prescription,
}

impl FormField {
    pub const PATIENT: [FormField; 6] = [
        FormField::PatientName,
        FormField::PatientSex,
        FormField::PatientAge,
        FormField::PatientAddress,
        FormField::PatientMobile,
        FormField::PatientDate,
    ];

    pub const MEDICAL: [FormField; 5] = [
        FormField::Dx,
        FormField::Cc,
        FormField::Oh,
        FormField::Ix,
        FormField::DrugHistory,
    ];

    pub const EXAMINATION: [FormField; 12] = [
        FormField::Bp,
        FormField::Pulse,
        FormField::Temp,
        FormField::Spo2,
        FormField::Heart,
        FormField::Lungs,
        FormField::Abd,
        FormField::Anemia,
        FormField::Jaundice,
        FormField::Cyanosis,
        FormField::Oedema,
        FormField::Other,
    ];

    pub fn all() -> impl Iterator<Item = FormField> {
        Self::PATIENT
            .into_iter()
            .chain(Self::MEDICAL)
            .chain(Self::EXAMINATION)
            .chain([FormField::Prescription])
    }

    pub fn group(self) -> FieldGroup {
        use FormField::*;
        match self {
            PatientName | PatientSex | PatientAge | PatientAddress | PatientMobile
            | PatientDate => FieldGroup::Patient,
            Dx | Cc | Oh | Ix | DrugHistory => FieldGroup::Medical,
            Prescription => FieldGroup::Prescription,
            _ => FieldGroup::Examination,
        }
    }

    /// Key of the field within its record (camelCase wire name).
    pub fn name(self) -> &'static str {
        use FormField::*;
        match self {
            PatientName => "name",
            PatientSex => "sex",
            PatientAge => "age",
            PatientAddress => "address",
            PatientMobile => "mobile",
            PatientDate => "date",
            Dx => "dx",
            Cc => "cc",
            Oh => "oh",
            Ix => "ix",
            DrugHistory => "drugHistory",
            Bp => "bp",
            Pulse => "pulse",
            Temp => "temp",
            Spo2 => "spo2",
            Heart => "heart",
            Lungs => "lungs",
            Abd => "abd",
            Anemia => "anemia",
            Jaundice => "jaundice",
            Cyanosis => "cyanosis",
            Oedema => "oedema",
            Other => "other",
            Prescription => "prescription",
        }
    }

    /// Fully qualified key, e.g. `examination.bp`.
    pub fn key(self) -> String {
        match self.group() {
            FieldGroup::Patient => format!("patient.{}", self.name()),
            FieldGroup::Medical => format!("medical.{}", self.name()),
            FieldGroup::Examination => format!("examination.{}", self.name()),
            FieldGroup::Prescription => self.name().to_owned(),
        }
    }

    /// Placeholder shown on the entry form.
    pub fn placeholder(self) -> &'static str {
        use FormField::*;
        match self {
            PatientName => "Patient Name",
            PatientSex => "Select Sex",
            PatientAge => "Age",
            PatientAddress => "Address",
            PatientMobile => "Mobile Number",
            PatientDate => "Date",
            Dx => "Dx (Diagnosis)",
            Cc => "C/C (Chief Complaints)",
            Oh => "O/H (Disease History)",
            Ix => "Ix (Investigation)",
            DrugHistory => "Drug History",
            Bp => "BP",
            Pulse => "Pulse",
            Temp => "Temp",
            Spo2 => "SpO2",
            Heart => "Heart",
            Lungs => "Lungs",
            Abd => "Abd",
            Anemia => "Anemia",
            Jaundice => "Jaundice",
            Cyanosis => "Cyanosis",
            Oedema => "Oedema",
            Other => "Other findings",
            Prescription => "Write prescription here...",
        }
    }

    fn value_in_patient(self, record: &PatientRecord) -> &str {
        match self {
            FormField::PatientName => &record.name,
            FormField::PatientSex => &record.sex,
            FormField::PatientAge => &record.age,
            FormField::PatientAddress => &record.address,
            FormField::PatientMobile => &record.mobile,
            _ => &record.date,
        }
    }

    fn value_in_medical(self, record: &MedicalRecord) -> &str {
        match self {
            FormField::Dx => &record.dx,
            FormField::Cc => &record.cc,
            FormField::Oh => &record.oh,
            FormField::Ix => &record.ix,
            _ => &record.drug_history,
        }
    }

    fn value_in_examination(self, record: &ExaminationRecord) -> &str {
        use FormField::*;
        match self {
            Bp => &record.bp,
            Pulse => &record.pulse,
            Temp => &record.temp,
            Spo2 => &record.spo2,
            Heart => &record.heart,
            Lungs => &record.lungs,
            Abd => &record.abd,
            Anemia => &record.anemia,
            Jaundice => &record.jaundice,
            Cyanosis => &record.cyanosis,
            Oedema => &record.oedema,
            _ => &record.other,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for FormField {
    type Err = PrescriptionError;

    /// Accepts the qualified key (`examination.bp`) or, where unambiguous, the bare name
    /// (`bp`). Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FormField::all()
            .find(|field| {
                field.key().eq_ignore_ascii_case(wanted) || field.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| PrescriptionError::UnknownFormField(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_new_form_is_blank_and_dated_today() {
        let form = FormState::new(day());
        assert_eq!(form.patient.date, "2024-01-15");
        assert_eq!(form.patient.name, "");
        assert!(!form.examination.has_findings());
        assert_eq!(form.prescription, "");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = FormState::new(day());
        form.set(FormField::PatientName, "Jane Doe");
        form.set(FormField::Bp, "120/80");
        form.set(FormField::Prescription, "Tab. Paracetamol 500mg");

        let tomorrow = day().succ_opt().unwrap();
        form.reset(tomorrow);
        assert_eq!(form, FormState::new(tomorrow));
    }

    #[test]
    fn test_set_and_get_reach_every_field() {
        let mut form = FormState::new(day());
        for (i, field) in FormField::all().enumerate() {
            form.set(field, format!("value-{i}"));
        }
        for (i, field) in FormField::all().enumerate() {
            assert_eq!(form.get(field), format!("value-{i}"), "field {field}");
        }
        assert_eq!(form.medical.drug_history, "value-10");
        assert_eq!(form.examination.other, "value-22");
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in FormField::all() {
            assert_eq!(field.key().parse::<FormField>().unwrap(), field);
        }
        assert_eq!(
            "medical.drugHistory".parse::<FormField>().unwrap(),
            FormField::DrugHistory
        );
        assert_eq!("SPO2".parse::<FormField>().unwrap(), FormField::Spo2);
        assert!(matches!(
            "patient.weight".parse::<FormField>(),
            Err(PrescriptionError::UnknownFormField(_))
        ));
    }

    #[test]
    fn test_apply_stops_on_unknown_key() {
        let mut form = FormState::new(day());
        form.apply([("patient.name", "Jane Doe"), ("examination.bp", "120/80")])
            .unwrap();
        assert_eq!(form.patient.name, "Jane Doe");
        assert_eq!(form.examination.bp, "120/80");

        assert!(form.apply([("weight", "70")]).is_err());
    }

    #[test]
    fn test_from_submission_skips_unknown_keys() {
        let form = FormState::from_submission(
            day(),
            [
                ("patient.name", "Jane Doe"),
                ("medical.cc", "Fever\r\nCough"),
                ("action", "print"),
            ],
        );
        assert_eq!(form.patient.name, "Jane Doe");
        assert_eq!(form.medical.cc, "Fever\nCough");
        assert_eq!(form.patient.date, "2024-01-15");
    }

    #[test]
    fn test_json_uses_camel_case_and_defaults_missing_records() {
        let form: FormState =
            serde_json::from_str(r#"{"medical":{"drugHistory":"Metformin"}}"#).unwrap();
        assert_eq!(form.medical.drug_history, "Metformin");
        assert_eq!(form.patient, PatientRecord::default());
    }
}
