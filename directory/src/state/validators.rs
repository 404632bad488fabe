use directory_api::endpoints::businesses::NewBusiness;

use super::form::{BusinessFormState, FieldErrors, FormField};

/// Validate the form and build a trimmed submission from it.
/// On failure every offending field gets its own message.
pub fn validate_business_form(form: &BusinessFormState) -> Result<NewBusiness, FieldErrors> {
    let mut errors = FieldErrors::default();

    if form.value(FormField::Name).trim().is_empty() {
        errors.insert(FormField::Name, "Name is required");
    }

    let phone = form.value(FormField::Phone);
    if phone.trim().is_empty() {
        errors.insert(FormField::Phone, "Phone number is required");
    } else if !is_valid_phone(phone) {
        errors.insert(FormField::Phone, "Invalid phone number");
    }

    if form.value(FormField::FieldOfWork).trim().is_empty() {
        errors.insert(FormField::FieldOfWork, "Field of work is required");
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Required fields were checked above, so this only trims
    form.to_new_business().validated().map_err(|e| {
        let mut errors = FieldErrors::default();
        errors.insert(FormField::Name, e.to_string());
        errors
    })
}

/// Digits, spaces and dashes only.
fn is_valid_phone(phone: &str) -> bool {
    !phone.is_empty()
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::form::FieldChange;

    fn form(name: &str, phone: &str, field_of_work: &str) -> BusinessFormState {
        let mut form = BusinessFormState::create();
        form.apply(FieldChange::new(FormField::Name, name));
        form.apply(FieldChange::new(FormField::Phone, phone));
        form.apply(FieldChange::new(FormField::FieldOfWork, field_of_work));
        form
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let mut form = form(" Cohen ", "050-123 4567", " Plumber ");
        form.apply(FieldChange::new(FormField::City, " Haifa "));

        let business = validate_business_form(&form).unwrap();
        assert_eq!(business.name, "Cohen");
        assert_eq!(business.phone, "050-123 4567");
        assert_eq!(business.field_of_work, "Plumber");
        assert_eq!(business.city, "Haifa");
    }

    #[test]
    fn test_missing_fields_each_get_a_message() {
        let errors = validate_business_form(&form("  ", "", "")).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(FormField::Name), Some("Name is required"));
        assert_eq!(errors.get(FormField::Phone), Some("Phone number is required"));
        assert_eq!(
            errors.get(FormField::FieldOfWork),
            Some("Field of work is required")
        );
    }

    #[test]
    fn test_phone_rejects_other_characters() {
        for phone in ["+972-50-1234567", "050.1234567", "phone"] {
            let errors = validate_business_form(&form("Cohen", phone, "Plumber")).unwrap_err();
            assert_eq!(errors.get(FormField::Phone), Some("Invalid phone number"));
        }
    }

    #[test]
    fn test_phone_allows_digits_spaces_and_dashes() {
        assert!(is_valid_phone("050 123-4567"));
        assert!(is_valid_phone(" 04 8 "));
        assert!(!is_valid_phone(""));
    }
}
