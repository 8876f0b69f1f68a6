//! Print document composition.
//!
//! Builds a complete, standalone HTML prescription from the doctor profile and the current form
//! state. The document is assembled from an ordered list of sections, each paired with the
//! condition under which it is printed:
//!
//! | Section        | Printed when                          |
//! |----------------|---------------------------------------|
//! | Header         | always                                |
//! | Patient band   | the patient name is non-empty         |
//! | Medical info   | always (Rx column is unconditional)   |
//! | Signature      | the profile's `show_signature` is set |
//! | Footer         | always                                |
//!
//! Inside the sections, individual label-value pairs follow the tables in [`rules`].
//!
//! Composition is total: every input produces a document.

pub mod rules;
mod styles;

use crate::config::DateStyle;
use crate::constants::{DOCUMENT_TITLE, FONT_STYLESHEET_URL};
use crate::form::{FormState, FORM_DATE_FORMAT};
use crate::markup::{escape, escape_lines, escape_multiline};
use crate::profile::DoctorProfile;
use chrono::NaiveDate;
use rules::{firing, FieldRule, EXAMINATION_RULES, MEDICAL_RULES, PATIENT_RULES};

pub use styles::DOCUMENT_STYLES;

/// Everything a document is composed from.
#[derive(Clone, Copy, Debug)]
pub struct ComposeInput<'a> {
    pub profile: &'a DoctorProfile,
    pub form: &'a FormState,
}

impl<'a> ComposeInput<'a> {
    pub fn new(profile: &'a DoctorProfile, form: &'a FormState) -> Self {
        Self { profile, form }
    }
}

/// Top-level document sections, in print order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    PatientBand,
    MedicalInfo,
    Signature,
    Footer,
}

type Condition = fn(&ComposeInput<'_>) -> bool;
type Renderer = fn(&DocumentComposer, &ComposeInput<'_>, &mut String);

struct Section {
    kind: SectionKind,
    include: Condition,
    render: Renderer,
}

fn always(_: &ComposeInput<'_>) -> bool {
    true
}

fn has_patient_name(input: &ComposeInput<'_>) -> bool {
    !input.form.patient.name.is_empty()
}

fn shows_signature(input: &ComposeInput<'_>) -> bool {
    input.profile.show_signature
}

const SECTIONS: [Section; 5] = [
    Section {
        kind: SectionKind::Header,
        include: always,
        render: DocumentComposer::render_header,
    },
    Section {
        kind: SectionKind::PatientBand,
        include: has_patient_name,
        render: DocumentComposer::render_patient_band,
    },
    Section {
        kind: SectionKind::MedicalInfo,
        include: always,
        render: DocumentComposer::render_medical_info,
    },
    Section {
        kind: SectionKind::Signature,
        include: shows_signature,
        render: DocumentComposer::render_signature,
    },
    Section {
        kind: SectionKind::Footer,
        include: always,
        render: DocumentComposer::render_footer,
    },
];

/// Sections that a composition of `input` includes, in print order.
pub fn included_sections(input: &ComposeInput<'_>) -> Vec<SectionKind> {
    SECTIONS
        .iter()
        .filter(|section| (section.include)(input))
        .map(|section| section.kind)
        .collect()
}

/// Composes prescription documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentComposer {
    date_style: DateStyle,
}

impl DocumentComposer {
    pub fn new(date_style: DateStyle) -> Self {
        Self { date_style }
    }

    /// Compose the full standalone document for `input`.
    ///
    /// The result references the external font stylesheet, embeds its own style rules and
    /// carries no scripts.
    pub fn compose(&self, input: &ComposeInput<'_>) -> String {
        let mut out = String::with_capacity(8 * 1024);

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", DOCUMENT_TITLE));
        out.push_str(&format!(
            "<link href=\"{}\" rel=\"stylesheet\">\n",
            escape(FONT_STYLESHEET_URL)
        ));
        out.push_str("<style>");
        out.push_str(DOCUMENT_STYLES);
        out.push_str("</style>\n</head>\n<body>\n");

        for section in SECTIONS.iter().filter(|section| (section.include)(input)) {
            (section.render)(self, input, &mut out);
        }

        out.push_str("</body>\n</html>\n");
        out
    }

    /// Render the visit date in the configured style.
    ///
    /// Dates that are not `YYYY-MM-DD` are printed as entered.
    pub fn format_date(&self, raw: &str) -> String {
        match NaiveDate::parse_from_str(raw.trim(), FORM_DATE_FORMAT) {
            Ok(date) => date.format(self.date_style.pattern()).to_string(),
            Err(_) => raw.to_owned(),
        }
    }

    fn render_header(&self, input: &ComposeInput<'_>, out: &mut String) {
        let profile = input.profile;
        out.push_str("<div class=\"header\">\n");
        render_doctor_block(
            out,
            "bn",
            &profile.name_bn,
            &profile.degrees_bn,
            &profile.reg_no_bn,
        );
        render_doctor_block(
            out,
            "en",
            &profile.name_en,
            &profile.degrees_en,
            &profile.reg_no_en,
        );
        out.push_str("</div>\n");
    }

    fn render_patient_band(&self, input: &ComposeInput<'_>, out: &mut String) {
        out.push_str("<div class=\"patient-info\">\n");
        for (rule, value) in firing(&PATIENT_RULES, input.form) {
            out.push_str(&format!(
                "<p><span class=\"info-label\">{}:</span>{}</p>\n",
                rule.label,
                escape(value)
            ));
        }
        out.push_str(&format!(
            "<p class=\"date\"><span class=\"info-label\">Date:</span>{}</p>\n",
            escape(&self.format_date(&input.form.patient.date))
        ));
        out.push_str("</div>\n");
    }

    fn render_medical_info(&self, input: &ComposeInput<'_>, out: &mut String) {
        out.push_str("<div class=\"medical-info\">\n<div class=\"left-section\">\n");

        for (rule, value) in firing(&MEDICAL_RULES, input.form) {
            out.push_str(&format!(
                "<p><span class=\"info-label\">{}:</span><span class=\"info-value\">{}</span></p>\n",
                rule.label,
                escape_multiline(value)
            ));
        }

        if input.form.examination.has_findings() {
            render_examination(out, input.form);
        }

        out.push_str("</div>\n<div class=\"vertical-divider\"></div>\n");
        out.push_str("<div class=\"right-section\">\n<div class=\"section-title\">Rx</div>\n");
        out.push_str(&format!(
            "<div class=\"prescription-body\">{}</div>\n",
            escape_multiline(&input.form.prescription)
        ));
        out.push_str("</div>\n</div>\n");
    }

    fn render_signature(&self, _input: &ComposeInput<'_>, out: &mut String) {
        out.push_str(
            "<div class=\"signature\">\n<div class=\"signature-line\"></div>\nSignature\n</div>\n",
        );
    }

    fn render_footer(&self, input: &ComposeInput<'_>, out: &mut String) {
        out.push_str(&format!(
            "<div class=\"footer\">{}</div>\n",
            escape_multiline(&input.profile.footer_text)
        ));
    }
}

fn render_doctor_block(
    out: &mut String,
    lang: &str,
    name: &str,
    degrees: &[String],
    registrations: &[String],
) {
    out.push_str(&format!("<div class=\"doctor-info-{lang}\">\n"));
    out.push_str(&format!(
        "<h1 class=\"doctor-name-{lang}\">{}</h1>\n",
        escape(name)
    ));
    if !degrees.is_empty() {
        out.push_str(&format!(
            "<p class=\"degrees\">{}</p>\n",
            escape_lines(degrees)
        ));
    }
    if !registrations.is_empty() {
        out.push_str(&format!(
            "<p class=\"reg-no\">{}</p>\n",
            escape_lines(registrations)
        ));
    }
    out.push_str("</div>\n");
}

fn render_examination(out: &mut String, form: &FormState) {
    out.push_str("<div class=\"examination\">\n");
    out.push_str("<p class=\"examination-title\">On Examination:</p>\n");
    out.push_str("<div class=\"examination-grid\">\n");
    for (rule, value) in firing(&EXAMINATION_RULES, form) {
        out.push_str(&examination_item(rule, value));
    }
    out.push_str("</div>\n</div>\n");
}

fn examination_item(rule: &FieldRule, value: &str) -> String {
    format!(
        "<p class=\"examination-item\"><span class=\"info-label\">{}:</span>{}{}</p>\n",
        rule.label,
        escape(value),
        rule.unit
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn compose(profile: &DoctorProfile, form: &FormState) -> String {
        DocumentComposer::default().compose(&ComposeInput::new(profile, form))
    }

    fn occurrences(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_document_is_standalone_without_scripts() {
        let doc = compose(&DoctorProfile::default(), &FormState::new(day()));
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Medical Prescription</title>"));
        assert!(doc.contains("fonts.googleapis.com/css2?family=Alkatra"));
        assert!(doc.contains("<style>"));
        assert!(!doc.contains("<script"));
        assert!(doc.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_header_renders_both_language_blocks_bangla_first() {
        let doc = compose(&DoctorProfile::default(), &FormState::new(day()));
        let bn = doc.find("class=\"doctor-info-bn\"").unwrap();
        let en = doc.find("class=\"doctor-info-en\"").unwrap();
        assert!(bn < en);
        assert!(doc.contains("<h1 class=\"doctor-name-en\">Dr. Atikul Islam</h1>"));
        assert!(doc.contains("<h1 class=\"doctor-name-bn\">মোঃ আতিকুল ইসলাম</h1>"));
        assert!(doc.contains("<p class=\"reg-no\">BM&amp;DC Reg No A-0000</p>"));
    }

    #[test]
    fn test_empty_credentials_render_names_only() {
        let profile = DoctorProfile {
            degrees_en: vec![],
            degrees_bn: vec![],
            reg_no_en: vec![],
            reg_no_bn: vec![],
            ..DoctorProfile::default()
        };
        let doc = compose(&profile, &FormState::new(day()));
        assert!(doc.contains("class=\"doctor-name-en\""));
        assert!(doc.contains("class=\"doctor-name-bn\""));
        assert_eq!(occurrences(&doc, "class=\"degrees\""), 0);
        assert_eq!(occurrences(&doc, "class=\"reg-no\""), 0);
    }

    #[test]
    fn test_credential_lines_are_joined_with_breaks() {
        let profile = DoctorProfile {
            degrees_en: vec!["MBBS".into(), "FCPS (Medicine)".into()],
            ..DoctorProfile::default()
        };
        let doc = compose(&profile, &FormState::new(day()));
        assert!(doc.contains("<p class=\"degrees\">MBBS<br>FCPS (Medicine)</p>"));
    }

    #[test]
    fn test_patient_band_absent_without_name() {
        let mut form = FormState::new(day());
        form.set(FormField::PatientAge, "34");
        form.set(FormField::PatientSex, "Female");
        form.set(FormField::PatientAddress, "Dhanmondi");
        form.set(FormField::PatientMobile, "01722000000");

        let doc = compose(&DoctorProfile::default(), &form);
        assert!(!doc.contains("class=\"patient-info\""));
        assert!(!doc.contains("Age:</span>"));
        assert!(!doc.contains("Date:</span>"));
    }

    #[test]
    fn test_patient_band_scenario_name_and_age_only() {
        let mut form = FormState::new(day());
        form.patient = crate::form::PatientRecord {
            name: "Jane Doe".into(),
            age: "34".into(),
            sex: String::new(),
            address: String::new(),
            mobile: String::new(),
            date: "2024-01-15".into(),
        };

        let doc = compose(&DoctorProfile::default(), &form);
        assert_eq!(occurrences(&doc, "class=\"patient-info\""), 1);
        assert!(doc.contains("<p><span class=\"info-label\">Patient:</span>Jane Doe</p>"));
        assert!(doc.contains("<p><span class=\"info-label\">Age:</span>34</p>"));
        assert!(doc
            .contains("<p class=\"date\"><span class=\"info-label\">Date:</span>1/15/2024</p>"));
        assert!(!doc.contains("Sex:</span>"));
        assert!(!doc.contains("Address:</span>"));
        assert!(!doc.contains("Mobile:</span>"));

        let patient = doc.find("Patient:</span>").unwrap();
        let age = doc.find("Age:</span>").unwrap();
        assert!(patient < age);
    }

    #[test]
    fn test_date_follows_configured_style() {
        let composer = DocumentComposer::new(DateStyle::DayMonthYear);
        assert_eq!(composer.format_date("2024-01-15"), "15/1/2024");
        assert_eq!(
            DocumentComposer::new(DateStyle::Iso).format_date("2024-01-15"),
            "2024-01-15"
        );
        assert_eq!(composer.format_date("next week"), "next week");
    }

    #[test]
    fn test_medical_fields_render_only_when_present_with_line_breaks() {
        let mut form = FormState::new(day());
        form.set(FormField::Dx, "Viral fever");
        form.set(FormField::Cc, "Fever for 3 days\nHeadache");

        let doc = compose(&DoctorProfile::default(), &form);
        assert!(doc.contains(
            "<span class=\"info-label\">Dx:</span><span class=\"info-value\">Viral fever</span>"
        ));
        assert!(doc.contains("<span class=\"info-value\">Fever for 3 days<br>Headache</span>"));
        assert!(!doc.contains("O/H:</span>"));
        assert!(!doc.contains("Ix:</span>"));
        assert!(!doc.contains("Drug History:</span>"));
    }

    #[test]
    fn test_examination_block_absent_when_all_fields_empty() {
        let doc = compose(&DoctorProfile::default(), &FormState::new(day()));
        assert!(!doc.contains("On Examination"));
        assert_eq!(occurrences(&doc, "class=\"examination-item\""), 0);
    }

    #[test]
    fn test_single_examination_finding_renders_one_item_with_unit() {
        let mut form = FormState::new(day());
        form.set(FormField::Bp, "120/80");

        let doc = compose(&DoctorProfile::default(), &form);
        assert_eq!(occurrences(&doc, "On Examination:"), 1);
        assert_eq!(occurrences(&doc, "class=\"examination-item\""), 1);
        assert!(doc.contains(
            "<p class=\"examination-item\"><span class=\"info-label\">BP:</span>120/80 mmHg</p>"
        ));
    }

    #[test]
    fn test_examination_units_and_unitless_findings() {
        let mut form = FormState::new(day());
        form.set(FormField::Pulse, "72");
        form.set(FormField::Temp, "98.6");
        form.set(FormField::Spo2, "98");
        form.set(FormField::Lungs, "Clear");

        let doc = compose(&DoctorProfile::default(), &form);
        assert!(doc.contains("Pulse:</span>72 b/min</p>"));
        assert!(doc.contains("Temp:</span>98.6 °F</p>"));
        assert!(doc.contains("SpO2:</span>98%</p>"));
        assert!(doc.contains("Lungs:</span>Clear</p>"));
        assert_eq!(occurrences(&doc, "class=\"examination-item\""), 4);
    }

    #[test]
    fn test_rx_column_always_renders() {
        let doc = compose(&DoctorProfile::default(), &FormState::new(day()));
        assert!(doc.contains("<div class=\"section-title\">Rx</div>"));
        assert!(doc.contains("<div class=\"prescription-body\"></div>"));

        let mut form = FormState::new(day());
        form.set(FormField::Prescription, "Tab. Napa 500mg\n1+1+1 (5 days)");
        let doc = compose(&DoctorProfile::default(), &form);
        assert!(doc.contains("Tab. Napa 500mg<br>1+1+1 (5 days)"));
    }

    #[test]
    fn test_signature_block_follows_profile_flag() {
        let form = FormState::new(day());
        let shown = compose(&DoctorProfile::default(), &form);
        assert_eq!(occurrences(&shown, "class=\"signature\""), 1);
        assert_eq!(occurrences(&shown, "Signature\n</div>"), 1);

        let hidden = compose(
            &DoctorProfile {
                show_signature: false,
                ..DoctorProfile::default()
            },
            &form,
        );
        assert_eq!(occurrences(&hidden, "class=\"signature\""), 0);
        assert!(!hidden.contains("Signature"));
    }

    #[test]
    fn test_footer_converts_line_breaks() {
        let profile = DoctorProfile {
            footer_text: "Chamber: Dhanmondi\nSerial: 01722".into(),
            ..DoctorProfile::default()
        };
        let doc = compose(&profile, &FormState::new(day()));
        assert!(doc.contains("<div class=\"footer\">Chamber: Dhanmondi<br>Serial: 01722</div>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut form = FormState::new(day());
        form.set(FormField::PatientName, "<script>alert(1)</script>");
        form.set(FormField::Prescription, "A & B");

        let doc = compose(&DoctorProfile::default(), &form);
        assert!(!doc.contains("<script>"));
        assert!(doc.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(doc.contains("A &amp; B"));
    }

    #[test]
    fn test_section_order_and_inclusion() {
        let mut form = FormState::new(day());
        let profile = DoctorProfile {
            show_signature: false,
            ..DoctorProfile::default()
        };
        assert_eq!(
            included_sections(&ComposeInput::new(&profile, &form)),
            vec![
                SectionKind::Header,
                SectionKind::MedicalInfo,
                SectionKind::Footer
            ]
        );

        form.set(FormField::PatientName, "Jane Doe");
        assert_eq!(
            included_sections(&ComposeInput::new(&DoctorProfile::default(), &form)),
            vec![
                SectionKind::Header,
                SectionKind::PatientBand,
                SectionKind::MedicalInfo,
                SectionKind::Signature,
                SectionKind::Footer
            ]
        );

        let doc = compose(&DoctorProfile::default(), &form);
        let positions: Vec<usize> = [
            "class=\"header\"",
            "class=\"patient-info\"",
            "class=\"medical-info\"",
            "class=\"signature\"",
            "class=\"footer\"",
        ]
        .iter()
        .map(|needle| doc.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_examination_follows_medical_pairs_in_left_column() {
        let mut form = FormState::new(day());
        form.set(FormField::Dx, "Viral fever");
        form.set(FormField::DrugHistory, "None");
        form.set(FormField::Bp, "120/80");
        form.set(FormField::Prescription, "Tab. Napa 500mg");

        let doc = compose(&DoctorProfile::default(), &form);
        let positions: Vec<usize> = [
            "class=\"left-section\"",
            "Dx:</span>",
            "Drug History:</span>",
            "On Examination:",
            "BP:</span>",
            "class=\"vertical-divider\"",
            "class=\"right-section\"",
        ]
        .iter()
        .map(|needle| doc.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
