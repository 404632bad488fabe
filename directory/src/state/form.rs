use std::collections::BTreeMap;

use directory_api::endpoints::{
    businesses::{Business, NewBusiness},
    BusinessId,
};

use super::autocomplete::{AutocompleteState, InteractionBoundary, SuggestionField};
use crate::suggestions::engine::InputOutcome;
use crate::suggestions::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Phone,
    FieldOfWork,
    City,
    Notes,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Phone,
        FormField::FieldOfWork,
        FormField::City,
        FormField::Notes,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Phone,
            Self::Phone => Self::FieldOfWork,
            Self::FieldOfWork => Self::City,
            Self::City => Self::Notes,
            Self::Notes => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Notes,
            Self::Phone => Self::Name,
            Self::FieldOfWork => Self::Phone,
            Self::City => Self::FieldOfWork,
            Self::Notes => Self::City,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name *",
            Self::Phone => "Phone *",
            Self::FieldOfWork => "Field of work *",
            Self::City => "City",
            Self::Notes => "Notes",
        }
    }

    pub fn suggestion_field(self) -> Option<SuggestionField> {
        match self {
            Self::FieldOfWork => Some(SuggestionField::FieldOfWork),
            Self::City => Some(SuggestionField::City),
            _ => None,
        }
    }
}

impl From<SuggestionField> for FormField {
    fn from(field: SuggestionField) -> Self {
        match field {
            SuggestionField::FieldOfWork => FormField::FieldOfWork,
            SuggestionField::City => FormField::City,
        }
    }
}

/// The single way values flow back into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: FormField,
    pub value: String,
}

impl FieldChange {
    pub fn new(field: FormField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(BusinessId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FormField) {
        self.0.remove(&field);
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// A suggestion input that lost focus and now waits out its grace period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingBlur {
    pub field: SuggestionField,
    pub token: u64,
}

/// Submission / edit popup.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessFormState {
    pub mode: FormMode,
    pub focus: FormField,
    name: String,
    phone: String,
    field_of_work: String,
    city: String,
    notes: String,
    field_autocomplete: AutocompleteState,
    city_autocomplete: AutocompleteState,
    pub errors: FieldErrors,
    pub submit_error: Option<String>,
    pub submitting: bool,
    /// Area of the whole popup.
    pub boundary: InteractionBoundary,
}

impl BusinessFormState {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            focus: FormField::Name,
            name: String::new(),
            phone: String::new(),
            field_of_work: String::new(),
            city: String::new(),
            notes: String::new(),
            field_autocomplete: AutocompleteState::new(SuggestionField::FieldOfWork),
            city_autocomplete: AutocompleteState::new(SuggestionField::City),
            errors: FieldErrors::default(),
            submit_error: None,
            submitting: false,
            boundary: InteractionBoundary::default(),
        }
    }

    pub fn edit(business: &Business) -> Self {
        Self {
            mode: FormMode::Edit(business.id),
            name: business.name.clone(),
            phone: business.phone.clone(),
            field_of_work: business.field_of_work.clone(),
            city: business.city.clone(),
            notes: business.notes.clone(),
            field_autocomplete: AutocompleteState::with_value(
                SuggestionField::FieldOfWork,
                &business.field_of_work,
            ),
            city_autocomplete: AutocompleteState::with_value(SuggestionField::City, &business.city),
            ..Self::create()
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// Committed value of a field.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Phone => &self.phone,
            FormField::FieldOfWork => &self.field_of_work,
            FormField::City => &self.city,
            FormField::Notes => &self.notes,
        }
    }

    /// What the input line shows; suggestion inputs show their draft.
    pub fn display_value(&self, field: FormField) -> &str {
        match field.suggestion_field() {
            Some(sf) => self.autocomplete(sf).query(),
            None => self.value(field),
        }
    }

    pub fn apply(&mut self, change: FieldChange) {
        self.errors.remove(change.field);
        if let Some(sf) = change.field.suggestion_field() {
            self.autocomplete_mut(sf).sync_value(&change.value);
        }
        let target = match change.field {
            FormField::Name => &mut self.name,
            FormField::Phone => &mut self.phone,
            FormField::FieldOfWork => &mut self.field_of_work,
            FormField::City => &mut self.city,
            FormField::Notes => &mut self.notes,
        };
        *target = change.value;
    }

    pub fn autocomplete(&self, field: SuggestionField) -> &AutocompleteState {
        match field {
            SuggestionField::FieldOfWork => &self.field_autocomplete,
            SuggestionField::City => &self.city_autocomplete,
        }
    }

    pub fn autocomplete_mut(&mut self, field: SuggestionField) -> &mut AutocompleteState {
        match field {
            SuggestionField::FieldOfWork => &mut self.field_autocomplete,
            SuggestionField::City => &mut self.city_autocomplete,
        }
    }

    pub fn focused_autocomplete(&self) -> Option<&AutocompleteState> {
        self.focus.suggestion_field().map(|sf| self.autocomplete(sf))
    }

    /// The suggestion list currently on screen, focused or still in its
    /// blur grace period.
    pub fn open_autocomplete(&self) -> Option<SuggestionField> {
        [SuggestionField::FieldOfWork, SuggestionField::City]
            .into_iter()
            .find(|&sf| self.autocomplete(sf).is_open())
    }

    pub fn type_char(&mut self, c: char) -> Option<(SuggestionField, InputOutcome)> {
        self.edit_focused(|text| text.push(c))
    }

    pub fn delete_char(&mut self) -> Option<(SuggestionField, InputOutcome)> {
        self.edit_focused(|text| {
            text.pop();
        })
    }

    pub fn clear_focused(&mut self) -> Option<(SuggestionField, InputOutcome)> {
        self.edit_focused(String::clear)
    }

    fn edit_focused(
        &mut self,
        edit: impl FnOnce(&mut String),
    ) -> Option<(SuggestionField, InputOutcome)> {
        let field = self.focus;
        self.errors.remove(field);
        self.submit_error = None;

        match field.suggestion_field() {
            Some(sf) => {
                let autocomplete = self.autocomplete_mut(sf);
                let mut draft = autocomplete.query().to_string();
                edit(&mut draft);
                Some((sf, autocomplete.on_input(draft)))
            }
            None => {
                let target = match field {
                    FormField::Name => &mut self.name,
                    FormField::Phone => &mut self.phone,
                    _ => &mut self.notes,
                };
                edit(target);
                None
            }
        }
    }

    /// Moves focus. Leaving a suggestion input writes its draft back and starts
    /// that input's blur grace period; entering one fires its focus event.
    pub fn set_focus(&mut self, next: FormField, fields: &[Candidate]) -> Option<PendingBlur> {
        if next == self.focus {
            return None;
        }
        let blurred = self.blur_focused();
        self.focus = next;

        match next.suggestion_field() {
            Some(SuggestionField::FieldOfWork) => self.field_autocomplete.on_focus(Some(fields)),
            Some(SuggestionField::City) => self.city_autocomplete.on_focus(None),
            None => {}
        }
        blurred
    }

    fn blur_focused(&mut self) -> Option<PendingBlur> {
        let sf = self.focus.suggestion_field()?;
        self.commit_draft(sf);
        let token = self.autocomplete_mut(sf).blur();
        Some(PendingBlur { field: sf, token })
    }

    fn commit_draft(&mut self, field: SuggestionField) {
        let draft = self.autocomplete(field).query().to_string();
        if draft != self.value(field.into()) {
            self.apply(FieldChange::new(field.into(), draft));
        }
    }

    /// Writes both drafts back before validation.
    pub fn flush_drafts(&mut self) {
        self.commit_draft(SuggestionField::FieldOfWork);
        self.commit_draft(SuggestionField::City);
    }

    pub fn commit_suggestion(&mut self) -> Option<FieldChange> {
        let sf = self.focus.suggestion_field()?;
        let value = self.autocomplete_mut(sf).commit()?;
        let change = FieldChange::new(sf.into(), value);
        self.apply(change.clone());
        Some(change)
    }

    pub fn commit_suggestion_at(&mut self, field: SuggestionField, index: usize) -> Option<FieldChange> {
        let value = self.autocomplete_mut(field).commit_at(index)?;
        let change = FieldChange::new(field.into(), value);
        self.apply(change.clone());
        Some(change)
    }

    /// The form is closing.
    pub fn teardown(&mut self) {
        self.field_autocomplete.teardown();
        self.city_autocomplete.teardown();
        self.boundary.reset();
    }

    pub fn to_new_business(&self) -> NewBusiness {
        NewBusiness::new(&self.name, &self.phone, &self.field_of_work)
            .city(&self.city)
            .notes(&self.notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fields() -> Vec<Candidate> {
        ["Electrician", "Plumber"].into_iter().map(Candidate::from).collect()
    }

    fn type_str(form: &mut BusinessFormState, text: &str) {
        for c in text.chars() {
            form.type_char(c);
        }
    }

    #[test]
    fn test_plain_fields_update_value_directly() {
        let mut form = BusinessFormState::create();
        assert!(form.type_char('C').is_none());
        type_str(&mut form, "ohen");
        assert_eq!(form.value(FormField::Name), "Cohen");

        form.delete_char();
        assert_eq!(form.value(FormField::Name), "Cohe");
    }

    #[test]
    fn test_suggestion_field_edits_draft_until_blur() {
        let mut form = BusinessFormState::create();
        form.set_focus(FormField::City, &fields());

        let outcome = form.type_char('H');
        assert_eq!(outcome, Some((SuggestionField::City, InputOutcome::Suppressed)));
        type_str(&mut form, "aifa");
        assert_eq!(form.display_value(FormField::City), "Haifa");
        assert_eq!(form.value(FormField::City), "");

        let blur = form.set_focus(FormField::Notes, &fields()).unwrap();
        assert_eq!(blur.field, SuggestionField::City);
        assert_eq!(form.value(FormField::City), "Haifa");
    }

    #[test]
    fn test_focusing_field_of_work_filters_pool() {
        let mut form = BusinessFormState::create();
        form.set_focus(FormField::FieldOfWork, &fields());
        type_str(&mut form, "plu");
        form.set_focus(FormField::City, &fields());
        form.set_focus(FormField::FieldOfWork, &fields());

        let autocomplete = form.autocomplete(SuggestionField::FieldOfWork);
        assert!(autocomplete.is_open());
        assert_eq!(autocomplete.suggestions()[0].label, "Plumber");
    }

    #[test]
    fn test_commit_suggestion_writes_field() {
        let mut form = BusinessFormState::create();
        form.set_focus(FormField::FieldOfWork, &fields());
        let generation = match form.type_char('e') {
            Some((_, InputOutcome::Scheduled(pass))) => pass.generation,
            other => panic!("unexpected outcome: {other:?}"),
        };
        form.autocomplete_mut(SuggestionField::FieldOfWork)
            .run_pass(generation, &fields());
        form.autocomplete_mut(SuggestionField::FieldOfWork).move_down();

        let change = form.commit_suggestion().unwrap();
        assert_eq!(change, FieldChange::new(FormField::FieldOfWork, "Electrician"));
        assert_eq!(form.value(FormField::FieldOfWork), "Electrician");
        assert!(form.open_autocomplete().is_none());
    }

    #[test]
    fn test_editing_clears_field_error() {
        let mut form = BusinessFormState::create();
        form.errors.insert(FormField::Name, "Name is required");
        form.errors.insert(FormField::Phone, "Phone number is required");

        form.type_char('A');
        assert_eq!(form.errors.get(FormField::Name), None);
        assert!(form.errors.get(FormField::Phone).is_some());
    }

    #[test]
    fn test_edit_prefills_values() {
        let business = Business::from_new(
            NewBusiness::new("Cohen", "050-1", "Plumber").city("Haifa"),
            Utc::now(),
        );
        let form = BusinessFormState::edit(&business);
        assert_eq!(form.mode, FormMode::Edit(business.id));
        assert_eq!(form.display_value(FormField::City), "Haifa");
        assert_eq!(form.to_new_business().field_of_work, "Plumber");
    }

    #[test]
    fn test_focus_order_wraps() {
        assert_eq!(FormField::Notes.next(), FormField::Name);
        assert_eq!(FormField::Name.prev(), FormField::Notes);
        assert!(FormField::ALL.iter().all(|f| f.next().prev() == *f));
    }
}
