//! JSON bodies exchanged over the REST API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A single edit of a form field.
///
/// `field` is a form key such as `patient.name` or `examination.bp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldEditReq {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrintStatus {
    /// The document was written and the print action is pending.
    Scheduled,
    /// No rendering surface could be opened; nothing was printed.
    Blocked,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrintRes {
    pub status: PrintStatus,
    /// Where the document was written, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl PrintRes {
    pub fn scheduled(location: impl Into<String>) -> Self {
        Self {
            status: PrintStatus::Scheduled,
            location: Some(location.into()),
        }
    }

    pub fn blocked() -> Self {
        Self {
            status: PrintStatus::Blocked,
            location: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_res_wire_shape() {
        let json = serde_json::to_value(PrintRes::blocked()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "blocked" }));

        let json = serde_json::to_value(PrintRes::scheduled("/tmp/a.html")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "scheduled", "location": "/tmp/a.html" })
        );
    }

    #[test]
    fn test_field_edit_value_defaults_to_empty() {
        let req: FieldEditReq = serde_json::from_str(r#"{"field":"patient.name"}"#).unwrap();
        assert_eq!(req.value, "");
    }
}
