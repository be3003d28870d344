use assistant_onboard::onboarding::navigation::{
    form_action_from_key, form_transition, parse_scripted_form_keys, FormAction, FormNavEffect,
    NavState,
};
use assistant_onboard::onboarding::screens::{
    mask_secret, project_form_view_model, tail_for_display,
};
use assistant_onboard::onboarding::{AssistantCreationForm, CreateAssistantRequest, DraftField};
use assistant_onboard::service::{AssistantCreationService, CreationTicket, ServiceError};
use assistant_onboard::templates::TemplateCatalog;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

struct NeverFinishes;

impl AssistantCreationService for NeverFinishes {
    fn create_assistant(
        &self,
        _request: CreateAssistantRequest,
    ) -> Result<CreationTicket, ServiceError> {
        let (reporter, ticket) = CreationTicket::channel("req-pending");
        std::mem::forget(reporter);
        Ok(ticket)
    }
}

fn form() -> AssistantCreationForm {
    AssistantCreationForm::new(
        TemplateCatalog::default(),
        "Create your virtual assistant",
        "/builder",
    )
}

#[test]
fn password_row_is_masked_and_blank_fields_marked_required() {
    let mut form = form();
    form.set_field(DraftField::Password, "hunter2").expect("password");
    let vm = project_form_view_model(&form, &NavState::root(), None, "|");

    let password = vm
        .rows
        .iter()
        .find(|row| row.label == "Password")
        .expect("password row");
    assert_eq!(password.value, "*******");
    let name = vm
        .rows
        .iter()
        .find(|row| row.label == "Assistant name")
        .expect("name row");
    assert_eq!(name.value, "<required>");
    assert_eq!(vm.title, "Create your virtual assistant");
    assert!(vm.progress.is_none());
}

#[test]
fn import_slot_shows_media_type_then_imported_name() {
    let mut form = form();
    let vm = project_form_view_model(&form, &NavState::root(), None, "|");
    assert_eq!(vm.rows[3].value, "( ) application/json");

    form.import_template(r#"{"id":12,"name":"Shop"}"#)
        .expect("import");
    let vm = project_form_view_model(&form, &NavState::root(), Some("Title"), "|");
    assert_eq!(vm.rows[3].value, "(x) imported `Shop` (id 12)");
    assert_eq!(vm.rows[0].value, "( )");
    assert_eq!(vm.title, "Title");
}

#[test]
fn progress_line_carries_spinner_and_request_id_while_submitting() {
    let mut form = form();
    form.submit(&NeverFinishes);
    let vm = project_form_view_model(&form, &NavState::root(), None, "/");
    let progress = vm.progress.expect("progress shown");
    assert!(progress.contains('/'));
    assert!(progress.contains("req-pending"));
}

#[test]
fn enter_on_rows_maps_to_matching_effects() {
    let catalog = TemplateCatalog::default();
    let mut nav = NavState::root();
    nav.selected = 1;
    let selected = form_transition(&mut nav, FormAction::Enter, &catalog);
    assert_eq!(selected.effect, FormNavEffect::SelectTemplate(1));

    nav.selected = 3;
    let import = form_transition(&mut nav, FormAction::Enter, &catalog);
    assert_eq!(import.effect, FormNavEffect::ImportTemplate);

    nav.selected = 6;
    let edit = form_transition(&mut nav, FormAction::Enter, &catalog);
    assert_eq!(edit.effect, FormNavEffect::EditField(DraftField::Password));

    nav.selected = 8;
    let toggle = form_transition(&mut nav, FormAction::Enter, &catalog);
    assert_eq!(toggle.effect, FormNavEffect::ToggleLanguage);

    nav.selected = 9;
    let submit = form_transition(&mut nav, FormAction::Enter, &catalog);
    assert_eq!(submit.effect, FormNavEffect::Submit);
}

#[test]
fn only_ctrl_c_passes_while_submitting() {
    let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
    let submit = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

    assert_eq!(form_action_from_key(false, esc), Some(FormAction::Cancel));
    assert_eq!(form_action_from_key(false, submit), Some(FormAction::Submit));
    assert_eq!(form_action_from_key(true, esc), None);
    assert_eq!(form_action_from_key(true, submit), None);
    assert_eq!(form_action_from_key(true, ctrl_c), Some(FormAction::Cancel));
}

#[test]
fn scripted_keys_parse_known_tokens_only() {
    let keys = parse_scripted_form_keys("down, Enter,t,s,,ctrl-c").expect("parse keys");
    assert_eq!(keys.len(), 5);
    assert_eq!(keys[0].code, KeyCode::Down);
    assert_eq!(keys[4].modifiers, KeyModifiers::CONTROL);

    let err = parse_scripted_form_keys("down,left").expect_err("unknown token");
    assert!(err.contains("left"));
}

#[test]
fn long_input_shows_its_tail_and_masking_counts_chars() {
    assert_eq!(tail_for_display("abcdef", 3), "def");
    assert_eq!(tail_for_display("abc", 10), "abc");
    assert_eq!(tail_for_display("abc", 0), "");
    assert_eq!(mask_secret("pässword"), "********");
}
