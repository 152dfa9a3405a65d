//! Form and tag checks run before anything is sent

use crate::api::types::StudentForm;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("NFC tag ID cannot be empty")]
    EmptyTagId,

    #[error("Invalid NFC tag ID format")]
    InvalidTagId,
}

type Error = ValidationError;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Whitespace-only counts as missing
pub fn validate_required(value: &str, field_name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Required { field: field_name.to_string() });
    }

    Ok(())
}

/// Checks the fields in form order and stops at the first missing one
pub fn validate_student_form(form: &StudentForm) -> Result<()> {
    let fields = [
        (&form.name, "Name"),
        (&form.register_number, "Register Number"),
        (&form.section, "Section"),
        (&form.department, "Department"),
        (&form.duration, "Duration"),
    ];

    fields.into_iter().try_for_each(|(value, field_name)| validate_required(value, field_name))
}

/// Tag ids are serial numbers, hex bytes optionally separated by colons
pub fn validate_nfc_tag(tag_id: &str) -> Result<()> {
    let tag_id = tag_id.trim();
    if tag_id.is_empty() {
        return Err(Error::EmptyTagId);
    }

    if !tag_id.chars().all(|c| c.is_ascii_hexdigit() || c == ':') {
        return Err(Error::InvalidTagId);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete_form() -> StudentForm {
        StudentForm {
            name: "Asha Kumar".into(),
            register_number: "21CS042".into(),
            section: "A".into(),
            department: "CSE".into(),
            duration: "2021-2025".into(),
        }
    }

    #[test]
    fn blank_values_are_missing() {
        assert_eq!(validate_required("Asha", "Name"), Ok(()));

        let error = validate_required("   \t", "Name").unwrap_err();
        assert_eq!(error.to_string(), "Name is required");
    }

    #[test]
    fn complete_form_passes() {
        assert_eq!(validate_student_form(&complete_form()), Ok(()));
    }

    #[test]
    fn first_missing_field_is_reported() {
        let form = StudentForm { section: " ".into(), duration: String::new(), ..complete_form() };

        let error = validate_student_form(&form).unwrap_err();
        assert_eq!(error, ValidationError::Required { field: "Section".into() });
    }

    #[test]
    fn empty_form_reports_name() {
        let error = validate_student_form(&StudentForm::default()).unwrap_err();
        assert_eq!(error.to_string(), "Name is required");
    }

    #[test]
    fn tag_format() {
        assert_eq!(validate_nfc_tag("04:A2:5b:1f"), Ok(()));
        assert_eq!(validate_nfc_tag("04a25b1f"), Ok(()));
        assert_eq!(validate_nfc_tag("  "), Err(ValidationError::EmptyTagId));
        assert_eq!(validate_nfc_tag("04-a2-5b"), Err(ValidationError::InvalidTagId));
        assert_eq!(validate_nfc_tag("zz:01").unwrap_err().to_string(), "Invalid NFC tag ID format");
    }
}
