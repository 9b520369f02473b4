pub mod entity_form;
pub mod feedback;
pub mod form_fields;
pub mod icons;
pub mod layout;
pub mod period_selector;
pub mod premium;
pub mod recommendation_card;
pub mod report_view;
pub mod toast;
pub mod voice_input;
