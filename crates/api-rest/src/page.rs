//! The browser entry page: the prescription form plus the doctor settings panel.

use rxpad_core::markup::escape;
use rxpad_core::{DoctorProfile, FormField, FormState, ProfileField};

const SEX_OPTIONS: [&str; 2] = ["Male", "Female"];

const PAGE_STYLES: &str = r#"
body { font-family: 'Alkatra', sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
.container { max-width: 960px; margin: 0 auto; background: #fff; padding: 20px; border-radius: 8px; }
h1 { margin-top: 0; font-size: 22px; }
.row { display: flex; flex-wrap: wrap; gap: 10px; margin-bottom: 12px; }
.row input, .row select { flex: 1 1 140px; padding: 6px; }
textarea { width: 100%; box-sizing: border-box; padding: 6px; margin-bottom: 8px; }
fieldset { border: 1px solid #ddd; margin-bottom: 12px; }
.actions { display: flex; gap: 10px; }
.actions button { padding: 8px 18px; }
details.settings { margin-bottom: 16px; border: 1px solid #ccc; padding: 10px; border-radius: 6px; }
details.settings label { display: block; margin-top: 8px; font-weight: 600; }
details.settings input[type=text] { width: 100%; box-sizing: border-box; padding: 6px; }
"#;

/// Render the entry page for the current profile and form.
pub fn render_page(profile: &DoctorProfile, form: &FormState) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<title>Prescription Pad</title>\n<style>");
    html.push_str(PAGE_STYLES);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(&profile.name_en)));

    render_settings_panel(profile, &mut html);
    render_form(form, &mut html);

    html.push_str("</div>\n</body>\n</html>");
    html
}

fn render_settings_panel(profile: &DoctorProfile, html: &mut String) {
    html.push_str("<details class=\"settings\">\n<summary>Doctor Settings</summary>\n");
    html.push_str("<form method=\"post\" action=\"/settings\">\n");

    for field in ProfileField::ALL {
        let key = field.key();
        let label = escape(field.label());
        let value = profile.edit_value(field);
        match field {
            ProfileField::ShowSignature => {
                let checked = if profile.show_signature { " checked" } else { "" };
                html.push_str(&format!(
                    "<label><input type=\"checkbox\" name=\"{key}\" value=\"true\"{checked}> {label}</label>\n"
                ));
            }
            _ if field.is_multiline() => {
                html.push_str(&format!(
                    "<label for=\"{key}\">{label}</label>\n<textarea id=\"{key}\" name=\"{key}\" rows=\"3\">{}</textarea>\n",
                    escape(&value)
                ));
            }
            _ => {
                html.push_str(&format!(
                    "<label for=\"{key}\">{label}</label>\n<input type=\"text\" id=\"{key}\" name=\"{key}\" value=\"{}\">\n",
                    escape(&value)
                ));
            }
        }
    }

    html.push_str("<div class=\"actions\"><button type=\"submit\">Save Settings</button></div>\n");
    html.push_str("</form>\n</details>\n");
}

fn render_form(form: &FormState, html: &mut String) {
    html.push_str("<form method=\"post\" action=\"/form\">\n");

    html.push_str("<fieldset>\n<legend>Patient</legend>\n<div class=\"row\">\n");
    for field in FormField::PATIENT {
        render_input(form, field, html);
    }
    html.push_str("</div>\n</fieldset>\n");

    html.push_str("<fieldset>\n<legend>Medical Information</legend>\n");
    for field in FormField::MEDICAL {
        render_textarea(form, field, 2, html);
    }
    html.push_str("</fieldset>\n");

    html.push_str("<fieldset>\n<legend>On Examination</legend>\n<div class=\"row\">\n");
    for field in FormField::EXAMINATION {
        render_input(form, field, html);
    }
    html.push_str("</div>\n</fieldset>\n");

    html.push_str("<fieldset>\n<legend>Rx</legend>\n");
    render_textarea(form, FormField::Prescription, 12, html);
    html.push_str("</fieldset>\n");

    html.push_str(concat!(
        "<div class=\"actions\">\n",
        "<button type=\"submit\">Save</button>\n",
        "<button type=\"submit\" formaction=\"/print\" formtarget=\"_blank\">Print</button>\n",
        "<button type=\"submit\" formaction=\"/form/reset\">Reset</button>\n",
        "</div>\n",
    ));
    html.push_str("</form>\n");
}

fn render_input(form: &FormState, field: FormField, html: &mut String) {
    let key = field.key();
    let value = escape(form.get(field));
    let placeholder = escape(field.placeholder());

    match field {
        FormField::PatientSex => {
            html.push_str(&format!("<select name=\"{key}\">\n<option value=\"\">{placeholder}</option>\n"));
            for option in SEX_OPTIONS {
                let selected = if form.get(field) == option { " selected" } else { "" };
                html.push_str(&format!("<option value=\"{option}\"{selected}>{option}</option>\n"));
            }
            html.push_str("</select>\n");
        }
        _ => {
            let kind = if field == FormField::PatientDate { "date" } else { "text" };
            html.push_str(&format!(
                "<input type=\"{kind}\" name=\"{key}\" placeholder=\"{placeholder}\" value=\"{value}\">\n"
            ));
        }
    }
}

fn render_textarea(form: &FormState, field: FormField, rows: u8, html: &mut String) {
    html.push_str(&format!(
        "<textarea name=\"{}\" rows=\"{rows}\" placeholder=\"{}\">{}</textarea>\n",
        field.key(),
        escape(field.placeholder()),
        escape(form.get(field))
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn form() -> FormState {
        FormState::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[test]
    fn test_page_has_every_form_field() {
        let html = render_page(&DoctorProfile::default(), &form());
        for field in FormField::all() {
            assert!(
                html.contains(&format!("name=\"{}\"", field.key())),
                "missing {}",
                field.key()
            );
        }
        assert!(html.contains("value=\"2024-01-15\""));
    }

    #[test]
    fn test_settings_panel_shows_profile_values() {
        let profile = DoctorProfile {
            degrees_en: vec!["MBBS".into(), "FCPS".into()],
            show_signature: true,
            ..DoctorProfile::default()
        };
        let html = render_page(&profile, &form());
        assert!(html.contains("<details class=\"settings\">"));
        assert!(html.contains(">MBBS\nFCPS</textarea>"));
        assert!(html.contains("name=\"showSignature\" value=\"true\" checked"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut form = form();
        form.set(FormField::PatientName, "<b>\"Jane\"</b>");
        form.set(FormField::Prescription, "Tab. A </textarea>");
        let html = render_page(&DoctorProfile::default(), &form);
        assert!(html.contains("value=\"&lt;b&gt;&quot;Jane&quot;&lt;/b&gt;\""));
        assert!(html.contains("Tab. A &lt;/textarea&gt;</textarea>"));
    }

    #[test]
    fn test_selected_sex_option() {
        let mut form = form();
        form.set(FormField::PatientSex, "Female");
        let html = render_page(&DoctorProfile::default(), &form);
        assert!(html.contains("<option value=\"Female\" selected>Female</option>"));
        assert!(html.contains("<option value=\"Male\">Male</option>"));
    }

    #[test]
    fn test_print_button_opens_new_tab() {
        let html = render_page(&DoctorProfile::default(), &form());
        assert!(html.contains("formaction=\"/print\" formtarget=\"_blank\""));
    }
}
