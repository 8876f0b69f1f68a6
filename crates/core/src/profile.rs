//! Doctor profile (letterhead) settings.
//!
//! The profile carries everything printed around the prescription body: the doctor's name,
//! credential and registration lines in English and Bangla, the footer band text and whether a
//! signature line is printed.
//!
//! Persisted profiles may come from older sessions and miss keys, so loading never trusts the
//! stored object as a whole. [`DoctorProfile::reconcile`] walks the fields one by one and lets a
//! stored key win whenever it is present.

use crate::{PrescriptionError, PrescriptionResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

const DEFAULT_NAME_EN: &str = "Dr. Atikul Islam";
const DEFAULT_NAME_BN: &str = "মোঃ আতিকুল ইসলাম";
const DEFAULT_DEGREE_EN: &str = "DMF, MCH, BSC";
const DEFAULT_DEGREE_BN: &str = "ডিএমএফ, এমসিএইচ, বিএসসি";
const DEFAULT_REG_NO_EN: &str = "BM&DC Reg No A-0000";
const DEFAULT_REG_NO_BN: &str = "বিএম অ্যান্ড ডিসি রেজিঃ নংঃ A-0000";
const DEFAULT_FOOTER: &str = "চেম্বারঃ জিলসফট কনসালটেশন সেন্টার, ধানমন্ডি।\n\
চেম্বারে আসার পূর্বে সিরিয়ালঃ ০১৭২২-xx-xx-xx নম্বরে যোগাযোগ করে কম্পিউটারে ডেটা এন্ট্রি করাবেন।\n\
রোগী দেখার সময়ঃ বিকাল ৪ টা থেকে রাত ৮ টা (সপ্তাহে ৭ দিন)।";

/// Letterhead settings for the practising doctor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub name_en: String,
    pub name_bn: String,
    /// One credential per entry, printed one per line.
    pub degrees_en: Vec<String>,
    pub degrees_bn: Vec<String>,
    /// One registration number per entry, printed one per line.
    pub reg_no_en: Vec<String>,
    pub reg_no_bn: Vec<String>,
    /// Footer band text; embedded `\n` become line breaks.
    pub footer_text: String,
    pub show_signature: bool,
}

impl Default for DoctorProfile {
    fn default() -> Self {
        Self {
            name_en: DEFAULT_NAME_EN.into(),
            name_bn: DEFAULT_NAME_BN.into(),
            degrees_en: vec![DEFAULT_DEGREE_EN.into()],
            degrees_bn: vec![DEFAULT_DEGREE_BN.into()],
            reg_no_en: vec![DEFAULT_REG_NO_EN.into()],
            reg_no_bn: vec![DEFAULT_REG_NO_BN.into()],
            footer_text: DEFAULT_FOOTER.into(),
            show_signature: true,
        }
    }
}

/// Wrap a present key in `Some`, keeping JSON `null` distinguishable from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A profile as found in the settings slot.
///
/// Outer `None` means the key was absent, `Some(None)` means it was stored as `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDoctorProfile {
    #[serde(default, deserialize_with = "present")]
    pub name_en: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub name_bn: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub degrees_en: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    pub degrees_bn: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    pub reg_no_en: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    pub reg_no_bn: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    pub footer_text: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub show_signature: Option<Option<bool>>,
}

fn pick<T: Default>(default: T, stored: Option<Option<T>>) -> T {
    match stored {
        None => default,
        Some(value) => value.unwrap_or_default(),
    }
}

impl DoctorProfile {
    /// Merge a stored profile over `defaults`, field by field.
    ///
    /// Present keys win, including empty arrays and empty strings. A key stored as `null` is
    /// present too and collapses to the empty value (`false` for the signature flag).
    pub fn reconcile(defaults: DoctorProfile, stored: StoredDoctorProfile) -> DoctorProfile {
        DoctorProfile {
            name_en: pick(defaults.name_en, stored.name_en),
            name_bn: pick(defaults.name_bn, stored.name_bn),
            degrees_en: pick(defaults.degrees_en, stored.degrees_en),
            degrees_bn: pick(defaults.degrees_bn, stored.degrees_bn),
            reg_no_en: pick(defaults.reg_no_en, stored.reg_no_en),
            reg_no_bn: pick(defaults.reg_no_bn, stored.reg_no_bn),
            footer_text: pick(defaults.footer_text, stored.footer_text),
            show_signature: pick(defaults.show_signature, stored.show_signature),
        }
    }

    /// Apply a settings-editor edit to one field.
    ///
    /// Line-list fields are split on line breaks, one entry per line, the way the editor's
    /// text areas present them. The signature toggle accepts `true`, `on`, `1` and `yes`
    /// (case-insensitive); any other value switches it off.
    pub fn apply_edit(&mut self, field: ProfileField, raw: &str) {
        match field {
            ProfileField::NameEn => self.name_en = raw.to_owned(),
            ProfileField::NameBn => self.name_bn = raw.to_owned(),
            ProfileField::DegreesEn => self.degrees_en = split_lines(raw),
            ProfileField::DegreesBn => self.degrees_bn = split_lines(raw),
            ProfileField::RegNoEn => self.reg_no_en = split_lines(raw),
            ProfileField::RegNoBn => self.reg_no_bn = split_lines(raw),
            ProfileField::FooterText => self.footer_text = normalise_newlines(raw),
            ProfileField::ShowSignature => self.show_signature = parse_toggle(raw),
        }
    }

    /// Current value of a field in the editor's text form.
    pub fn edit_value(&self, field: ProfileField) -> String {
        match field {
            ProfileField::NameEn => self.name_en.clone(),
            ProfileField::NameBn => self.name_bn.clone(),
            ProfileField::DegreesEn => self.degrees_en.join("\n"),
            ProfileField::DegreesBn => self.degrees_bn.join("\n"),
            ProfileField::RegNoEn => self.reg_no_en.join("\n"),
            ProfileField::RegNoBn => self.reg_no_bn.join("\n"),
            ProfileField::FooterText => self.footer_text.clone(),
            ProfileField::ShowSignature => self.show_signature.to_string(),
        }
    }
}

fn normalise_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n")
}

fn split_lines(raw: &str) -> Vec<String> {
    normalise_newlines(raw).split('\n').map(str::to_owned).collect()
}

fn parse_toggle(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

/// Editable profile fields, named by their wire (camelCase) keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProfileField {
    NameEn,
    NameBn,
    DegreesEn,
    DegreesBn,
    RegNoEn,
    RegNoBn,
    FooterText,
    ShowSignature,
}

impl ProfileField {
    pub const ALL: [ProfileField; 8] = [
        ProfileField::NameBn,
        ProfileField::DegreesBn,
        ProfileField::RegNoBn,
        ProfileField::NameEn,
        ProfileField::DegreesEn,
        ProfileField::RegNoEn,
        ProfileField::FooterText,
        ProfileField::ShowSignature,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ProfileField::NameEn => "nameEn",
            ProfileField::NameBn => "nameBn",
            ProfileField::DegreesEn => "degreesEn",
            ProfileField::DegreesBn => "degreesBn",
            ProfileField::RegNoEn => "regNoEn",
            ProfileField::RegNoBn => "regNoBn",
            ProfileField::FooterText => "footerText",
            ProfileField::ShowSignature => "showSignature",
        }
    }

    /// Label shown by the settings editor.
    pub fn label(self) -> &'static str {
        match self {
            ProfileField::NameEn => "Name (English)",
            ProfileField::NameBn => "Name (Bangla)",
            ProfileField::DegreesEn => "Degrees (English)",
            ProfileField::DegreesBn => "Degrees (Bangla)",
            ProfileField::RegNoEn => "Registration Number (English)",
            ProfileField::RegNoBn => "Registration Number (Bangla)",
            ProfileField::FooterText => "Footer Text",
            ProfileField::ShowSignature => "Show signature field in prescription",
        }
    }

    /// Whether the editor presents this field as a multi-line text area.
    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            ProfileField::DegreesEn
                | ProfileField::DegreesBn
                | ProfileField::RegNoEn
                | ProfileField::RegNoBn
                | ProfileField::FooterText
        )
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProfileField {
    type Err = PrescriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileField::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PrescriptionError::UnknownProfileField(s.to_owned()))
    }
}

/// Parse a stored slot value into a reconciled profile.
pub fn profile_from_slot_value(raw: &str) -> PrescriptionResult<DoctorProfile> {
    let stored: StoredDoctorProfile =
        serde_json::from_str(raw).map_err(PrescriptionError::Deserialization)?;
    Ok(DoctorProfile::reconcile(DoctorProfile::default(), stored))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_keys_keep_defaults() {
        let profile = profile_from_slot_value(r#"{"nameEn":"Dr. Rahman"}"#).unwrap();
        let defaults = DoctorProfile::default();
        assert_eq!(profile.name_en, "Dr. Rahman");
        assert_eq!(profile.name_bn, defaults.name_bn);
        assert_eq!(profile.degrees_en, defaults.degrees_en);
        assert_eq!(profile.footer_text, defaults.footer_text);
        assert!(profile.show_signature);
    }

    #[test]
    fn test_present_empty_arrays_win() {
        let profile =
            profile_from_slot_value(r#"{"degreesEn":[],"regNoBn":[],"showSignature":false}"#)
                .unwrap();
        assert!(profile.degrees_en.is_empty());
        assert!(profile.reg_no_bn.is_empty());
        assert!(!profile.show_signature);
        assert_eq!(profile.degrees_bn, DoctorProfile::default().degrees_bn);
    }

    #[test]
    fn test_null_keys_collapse_to_empty() {
        let profile = profile_from_slot_value(
            r#"{"degreesBn":null,"footerText":null,"showSignature":null}"#,
        )
        .unwrap();
        assert!(profile.degrees_bn.is_empty());
        assert_eq!(profile.footer_text, "");
        assert!(!profile.show_signature);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let profile = profile_from_slot_value(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(profile, DoctorProfile::default());
    }

    #[test]
    fn test_malformed_value_is_a_deserialization_error() {
        let result = profile_from_slot_value("{not json");
        assert!(matches!(result, Err(PrescriptionError::Deserialization(_))));

        let wrong_type = profile_from_slot_value(r#"{"degreesEn":"one line"}"#);
        assert!(matches!(
            wrong_type,
            Err(PrescriptionError::Deserialization(_))
        ));
    }

    #[test]
    fn test_wire_keys_are_camel_case() {
        let json = serde_json::to_value(DoctorProfile::default()).unwrap();
        for field in ProfileField::ALL {
            assert!(json.get(field.key()).is_some(), "missing {}", field.key());
        }
    }

    #[test]
    fn test_apply_edit_splits_line_lists() {
        let mut profile = DoctorProfile::default();
        profile.apply_edit(ProfileField::DegreesEn, "MBBS\r\nFCPS (Medicine)");
        assert_eq!(profile.degrees_en, vec!["MBBS", "FCPS (Medicine)"]);

        profile.apply_edit(ProfileField::ShowSignature, "off");
        assert!(!profile.show_signature);
        profile.apply_edit(ProfileField::ShowSignature, "On");
        assert!(profile.show_signature);
    }

    #[test]
    fn test_edit_value_round_trips_through_apply_edit() {
        let original = DoctorProfile::default();
        let mut edited = DoctorProfile {
            name_en: String::new(),
            degrees_bn: vec![],
            footer_text: String::new(),
            show_signature: false,
            ..original.clone()
        };
        for field in ProfileField::ALL {
            edited.apply_edit(field, &original.edit_value(field));
        }
        assert_eq!(edited, original);
    }

    #[test]
    fn test_profile_field_parses_wire_keys() {
        assert_eq!(
            "regNoEn".parse::<ProfileField>().unwrap(),
            ProfileField::RegNoEn
        );
        assert_eq!(
            "SHOWSIGNATURE".parse::<ProfileField>().unwrap(),
            ProfileField::ShowSignature
        );
        assert!(matches!(
            "clinicName".parse::<ProfileField>(),
            Err(PrescriptionError::UnknownProfileField(_))
        ));
    }
}
