use super::draft::{DraftField, FORM_FIELDS};
use crate::templates::TemplateCatalog;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub const FORM_STATUS_TEXT: &str = "Pick a template, fill in the fields, then press s to create.";
pub const FORM_HINT_TEXT: &str = "Up/Down move | Enter select/edit | t language | s create | Esc cancel";
pub const SUBMITTING_HINT_TEXT: &str = "Creating assistant... | Ctrl-C abort";
pub const SCRIPT_KEYS_ENV: &str = "ASSISTANT_ONBOARD_SCRIPT_KEYS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Template(usize),
    Field(DraftField),
    Submit,
}

pub fn form_rows(catalog: &TemplateCatalog) -> Vec<FormRow> {
    let mut rows: Vec<FormRow> = (0..catalog.len()).map(FormRow::Template).collect();
    rows.extend(FORM_FIELDS.iter().copied().map(FormRow::Field));
    rows.push(FormRow::Submit);
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    MovePrev,
    MoveNext,
    Enter,
    Toggle,
    Submit,
    Cancel,
    ReconcileSelection(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub selected: usize,
    pub status_text: String,
    pub hint_text: String,
}

impl NavState {
    pub fn root() -> Self {
        Self {
            selected: 0,
            status_text: FORM_STATUS_TEXT.to_string(),
            hint_text: FORM_HINT_TEXT.to_string(),
        }
    }

    pub fn clamp_selection(&mut self, len: usize) {
        self.selected = clamp_selection(self.selected, len);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormNavEffect {
    None,
    SelectTemplate(usize),
    ImportTemplate,
    EditField(DraftField),
    ToggleLanguage,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormNavTransition {
    pub effect: FormNavEffect,
    pub feedback: Option<String>,
}

impl FormNavTransition {
    fn no_op(feedback: Option<String>) -> Self {
        Self {
            effect: FormNavEffect::None,
            feedback,
        }
    }

    fn effect(effect: FormNavEffect) -> Self {
        Self {
            effect,
            feedback: None,
        }
    }
}

pub fn clamp_selection(selected: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    selected.min(len - 1)
}

/// Maps a key press to a form action. While a submission is in flight the
/// progress dialog is modal and only Ctrl-C gets through.
pub fn form_action_from_key(submitting: bool, key: KeyEvent) -> Option<FormAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(FormAction::Cancel);
    }
    if submitting {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(FormAction::MovePrev),
        KeyCode::Down => Some(FormAction::MoveNext),
        KeyCode::Esc => Some(FormAction::Cancel),
        KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => Some(FormAction::Enter),
        KeyCode::Char('t') => Some(FormAction::Toggle),
        KeyCode::Char('s') => Some(FormAction::Submit),
        _ => None,
    }
}

pub fn parse_scripted_form_keys(raw: &str) -> Result<Vec<KeyEvent>, String> {
    let mut keys = Vec::new();
    for token in raw.split(',') {
        let normalized = token.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            continue;
        }
        let key = match normalized.as_str() {
            "up" => KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
            "down" => KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
            "enter" => KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            "esc" => KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            "ctrl-c" => KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            "t" => KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE),
            "s" => KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE),
            other => {
                return Err(format!(
                    "invalid {SCRIPT_KEYS_ENV} token `{other}`; valid tokens: up,down,enter,esc,ctrl-c,t,s"
                ));
            }
        };
        keys.push(key);
    }
    Ok(keys)
}

pub fn form_transition(
    state: &mut NavState,
    action: FormAction,
    catalog: &TemplateCatalog,
) -> FormNavTransition {
    let rows = form_rows(catalog);
    match action {
        FormAction::ReconcileSelection(len) => {
            let previous = state.selected;
            state.clamp_selection(len);
            if previous != state.selected {
                return FormNavTransition::no_op(Some("selection adjusted".to_string()));
            }
            FormNavTransition::no_op(None)
        }
        FormAction::MovePrev => {
            state.selected = state.selected.saturating_sub(1);
            FormNavTransition::no_op(None)
        }
        FormAction::MoveNext => {
            let max_index = rows.len().saturating_sub(1);
            state.selected = std::cmp::min(state.selected + 1, max_index);
            FormNavTransition::no_op(None)
        }
        FormAction::Enter => match rows.get(state.selected) {
            Some(FormRow::Template(index)) if *index == catalog.import_slot() => {
                FormNavTransition::effect(FormNavEffect::ImportTemplate)
            }
            Some(FormRow::Template(index)) => {
                FormNavTransition::effect(FormNavEffect::SelectTemplate(*index))
            }
            Some(FormRow::Field(DraftField::Language)) => {
                FormNavTransition::effect(FormNavEffect::ToggleLanguage)
            }
            Some(FormRow::Field(field)) => {
                FormNavTransition::effect(FormNavEffect::EditField(*field))
            }
            Some(FormRow::Submit) => FormNavTransition::effect(FormNavEffect::Submit),
            None => FormNavTransition::no_op(Some("Nothing selected.".to_string())),
        },
        FormAction::Toggle => match rows.get(state.selected) {
            Some(FormRow::Field(DraftField::Language)) => {
                FormNavTransition::effect(FormNavEffect::ToggleLanguage)
            }
            _ => FormNavTransition::no_op(Some(
                "Choose the language row before toggling.".to_string(),
            )),
        },
        FormAction::Submit => FormNavTransition::effect(FormNavEffect::Submit),
        FormAction::Cancel => FormNavTransition::effect(FormNavEffect::Cancel),
    }
}
