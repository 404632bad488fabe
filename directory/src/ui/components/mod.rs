pub mod autocomplete_input;
pub mod business_form;
pub mod category_dropdown;
pub mod delete_confirmation;
pub mod empty_state;
pub mod filter_input;
pub mod help_bar;
pub mod help_popup;
pub mod loading_indicator;
pub mod login_form;
pub mod popup;
pub mod screen_title;
