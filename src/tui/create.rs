use crate::app::command_support::{ensure_state_root, load_cli_settings, map_config_err};
use crate::onboarding::navigation::{
    form_action_from_key, form_rows, form_transition, parse_scripted_form_keys, FormAction,
    FormNavEffect, NavState, FORM_HINT_TEXT, SCRIPT_KEYS_ENV, SUBMITTING_HINT_TEXT,
};
use crate::onboarding::screens::{
    centered_rect, draw_form_ui, mask_secret, project_form_view_model, tail_for_display,
    PROCESSING_FRAMES,
};
use crate::onboarding::{AssistantCreationForm, DraftField, FormShell, FormTransition};
use crate::service::{service_from_settings, AssistantCreationService};
use crate::shared::logging::append_onboarding_log;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use ratatui::Terminal;
use std::fs;
use std::io::{self, IsTerminal, Stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const UI_POLL_INTERVAL: Duration = Duration::from_millis(60);
const SPINNER_TICK_INTERVAL: Duration = Duration::from_millis(120);
const CLI_WAIT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateArgs {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub language: Option<String>,
    pub template: Option<usize>,
    pub import: Option<String>,
}

impl CreateArgs {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn parse_create_args(args: &[String]) -> Result<CreateArgs, String> {
    let mut parsed = CreateArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .cloned()
            .ok_or_else(|| format!("{flag} requires a value"))?;
        match flag {
            "--name" => parsed.name = Some(value),
            "--email" => parsed.email = Some(value),
            "--username" => parsed.username = Some(value),
            "--password" => parsed.password = Some(value),
            "--language" => parsed.language = Some(value),
            "--template" => {
                let index = value
                    .parse::<usize>()
                    .map_err(|_| format!("--template requires a catalog index, got `{value}`"))?;
                parsed.template = Some(index);
            }
            "--import" => parsed.import = Some(value),
            other => return Err(format!("unexpected argument `{other}`")),
        }
        i += 2;
    }
    Ok(parsed)
}

/// Accepts either inline JSON or a path to a JSON file.
pub fn read_import_source(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed.to_string());
    }
    let path = PathBuf::from(trimmed);
    fs::read_to_string(&path).map_err(|e| format!("failed to read {}: {e}", path.display()))
}

fn prefill_form(form: &mut AssistantCreationForm, args: &CreateArgs) -> Result<(), String> {
    let fields = [
        (DraftField::Name, &args.name),
        (DraftField::Email, &args.email),
        (DraftField::Username, &args.username),
        (DraftField::Password, &args.password),
        (DraftField::Language, &args.language),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            form.set_field(field, value).map_err(|e| e.to_string())?;
        }
    }
    if let Some(index) = args.template {
        form.select_template(index).map_err(|e| e.to_string())?;
    }
    if let Some(source) = &args.import {
        let raw = read_import_source(source)?;
        form.import_template(&raw).map_err(|e| e.to_string())?;
    }
    Ok(())
}

enum CreateExit {
    Created,
    Cancel,
}

pub(crate) fn cmd_create(args: &[String]) -> Result<String, String> {
    let parsed = parse_create_args(args)?;
    let state_root = ensure_state_root()?;
    let settings = load_cli_settings()?;
    let service = service_from_settings(&settings, &state_root)?;
    let mut form = AssistantCreationForm::from_settings(&settings).map_err(map_config_err)?;
    let mut shell = FormShell::default();
    shell.apply(&form.mount());
    prefill_form(&mut form, &parsed)?;

    let exit = if let Some(keys) = load_scripted_form_keys()? {
        run_create_scripted(&mut form, &mut shell, service.as_ref(), &state_root, keys)?
    } else if parsed.is_empty() && is_interactive_create() {
        run_create_tui(&mut form, &mut shell, service.as_ref(), &state_root)?
    } else {
        submit_form(&mut form, &mut shell, service.as_ref(), &state_root)?;
        wait_for_outcome(&mut form, &mut shell, &state_root)?;
        CreateExit::Created
    };

    match exit {
        CreateExit::Created => Ok(render_created(&form, &shell)),
        CreateExit::Cancel => Ok("create canceled".to_string()),
    }
}

fn is_interactive_create() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

fn load_scripted_form_keys() -> Result<Option<Vec<KeyEvent>>, String> {
    let Ok(raw) = std::env::var(SCRIPT_KEYS_ENV) else {
        return Ok(None);
    };
    parse_scripted_form_keys(&raw).map(Some)
}

fn render_created(form: &AssistantCreationForm, shell: &FormShell) -> String {
    let draft = form.draft();
    let mut lines = vec!["status=created".to_string()];
    if let Some(created) = form.last_created() {
        lines.push(format!("request_id={}", created.request_id));
        lines.push(format!("name={}", created.name));
        lines.push(format!("username={}", created.username));
        if let Some(location) = &created.location {
            lines.push(format!("location={location}"));
        }
    }
    lines.push(format!("language={}", draft.language));
    lines.push(format!(
        "template={}",
        draft
            .template
            .as_ref()
            .map(|template| template.name.as_str())
            .unwrap_or("none")
    ));
    if let Some(title) = &shell.page_title {
        lines.push(format!("page_title={title}"));
    }
    if let Some(route) = &shell.route {
        lines.push(format!("navigate={route}"));
    }
    lines.join("\n")
}

/// Dispatches the draft. Blank required fields are refused here, the way an
/// input widget would refuse them, before anything reaches the service.
fn submit_form(
    form: &mut AssistantCreationForm,
    shell: &mut FormShell,
    service: &dyn AssistantCreationService,
    state_root: &Path,
) -> Result<String, String> {
    let missing = form.draft().missing_required_fields();
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
        return Err(format!("missing required fields: {}", labels.join(", ")));
    }

    let transition = form.submit(service);
    shell.apply(&transition);
    let feedback = transition.feedback.clone().unwrap_or_default();
    if !shell.progress_open {
        append_onboarding_log(state_root, "warn", "form.submit.refused", &feedback);
        return Err(feedback);
    }
    append_onboarding_log(
        state_root,
        "info",
        "form.submit.dispatched",
        &format!(
            "username={} template={}",
            form.draft().username,
            form.draft()
                .template
                .as_ref()
                .map(|template| template.id.to_string())
                .unwrap_or_else(|| "none".to_string())
        ),
    );
    Ok(feedback)
}

fn log_completion(state_root: &Path, form: &AssistantCreationForm, transition: &FormTransition) {
    match transition.navigation() {
        Some(route) => append_onboarding_log(
            state_root,
            "info",
            "form.complete.navigate",
            &format!("route={route}"),
        ),
        None => append_onboarding_log(
            state_root,
            "error",
            "form.complete.failed",
            form.last_error().unwrap_or("unknown error"),
        ),
    }
}

fn wait_for_outcome(
    form: &mut AssistantCreationForm,
    shell: &mut FormShell,
    state_root: &Path,
) -> Result<(), String> {
    let transition = form.wait_for_completion(CLI_WAIT_TIMEOUT);
    if form.is_submitting() {
        return Err(format!(
            "timed out after {}s waiting for assistant creation",
            CLI_WAIT_TIMEOUT.as_secs()
        ));
    }
    shell.apply(&transition);
    log_completion(state_root, form, &transition);
    if transition.navigation().is_some() {
        return Ok(());
    }
    Err(format!(
        "assistant creation failed: {}",
        form.last_error().unwrap_or("unknown error")
    ))
}

fn run_create_scripted(
    form: &mut AssistantCreationForm,
    shell: &mut FormShell,
    service: &dyn AssistantCreationService,
    state_root: &Path,
    scripted_keys: Vec<KeyEvent>,
) -> Result<CreateExit, String> {
    let mut nav = NavState::root();
    for key in scripted_keys {
        let row_count = form_rows(form.catalog()).len();
        let reconcile = form_transition(
            &mut nav,
            FormAction::ReconcileSelection(row_count),
            form.catalog(),
        );
        if let Some(feedback) = reconcile.feedback {
            nav.status_text = feedback;
        }
        let Some(action) = form_action_from_key(form.is_submitting(), key) else {
            continue;
        };
        let transition = form_transition(&mut nav, action, form.catalog());
        if let Some(feedback) = transition.feedback {
            nav.status_text = feedback;
        }
        match transition.effect {
            FormNavEffect::None => {}
            FormNavEffect::SelectTemplate(index) => {
                nav.status_text = select_template_feedback(form, index);
            }
            FormNavEffect::ToggleLanguage => {
                nav.status_text = toggle_language_feedback(form);
            }
            FormNavEffect::ImportTemplate => {
                return Err(
                    "scripted create does not support import prompts; pass --import".to_string(),
                );
            }
            FormNavEffect::EditField(field) => {
                return Err(format!(
                    "scripted create does not support field prompts; pass --{}",
                    field.as_str()
                ));
            }
            FormNavEffect::Submit => {
                nav.status_text = submit_form(form, shell, service, state_root)?;
                match wait_for_outcome(form, shell, state_root) {
                    Ok(()) => return Ok(CreateExit::Created),
                    Err(err) => nav.status_text = err,
                }
            }
            FormNavEffect::Cancel => return Ok(CreateExit::Cancel),
        }
    }
    Err(format!(
        "scripted create did not finish; include s or esc key (last status: {})",
        nav.status_text
    ))
}

fn select_template_feedback(form: &mut AssistantCreationForm, index: usize) -> String {
    match form.select_template(index) {
        Ok(()) => format!(
            "Template `{}` selected.",
            form.draft()
                .template
                .as_ref()
                .map(|template| template.name.as_str())
                .unwrap_or_default()
        ),
        Err(err) => err.to_string(),
    }
}

fn toggle_language_feedback(form: &mut AssistantCreationForm) -> String {
    match form.toggle_language() {
        Ok(()) => format!("Language set to {}.", form.draft().language.label()),
        Err(err) => err.to_string(),
    }
}

#[derive(Debug)]
struct Spinner {
    index: usize,
    last_tick: Instant,
}

impl Spinner {
    fn new() -> Self {
        Self {
            index: 0,
            last_tick: Instant::now(),
        }
    }

    fn frame(&self) -> &'static str {
        PROCESSING_FRAMES[self.index % PROCESSING_FRAMES.len()]
    }

    fn advance_if_needed(&mut self, active: bool) {
        if active && self.last_tick.elapsed() >= SPINNER_TICK_INTERVAL {
            self.index = (self.index + 1) % PROCESSING_FRAMES.len();
            self.last_tick = Instant::now();
        }
    }
}

fn run_create_tui(
    form: &mut AssistantCreationForm,
    shell: &mut FormShell,
    service: &dyn AssistantCreationService,
    state_root: &Path,
) -> Result<CreateExit, String> {
    let mut stdout = io::stdout();
    enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {e}"))?;
    execute!(stdout, EnterAlternateScreen, Hide)
        .map_err(|e| format!("failed to enter create screen: {e}"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {e}"))?;
    let result = run_create_tui_loop(&mut terminal, form, shell, service, state_root);
    disable_raw_mode().map_err(|e| format!("failed to disable raw mode: {e}"))?;
    execute!(terminal.backend_mut(), Show, LeaveAlternateScreen)
        .map_err(|e| format!("failed to leave create screen: {e}"))?;
    result
}

fn run_create_tui_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    form: &mut AssistantCreationForm,
    shell: &mut FormShell,
    service: &dyn AssistantCreationService,
    state_root: &Path,
) -> Result<CreateExit, String> {
    let mut nav = NavState::root();
    let mut spinner = Spinner::new();
    loop {
        let completion = form.poll_completion();
        if !completion.effects.is_empty() {
            shell.apply(&completion);
            log_completion(state_root, form, &completion);
            if completion.navigation().is_some() {
                return Ok(CreateExit::Created);
            }
            nav.hint_text = FORM_HINT_TEXT.to_string();
            nav.status_text = form
                .last_error()
                .map(|err| format!("Creation failed: {err}"))
                .or(completion.feedback)
                .unwrap_or_default();
        }

        let row_count = form_rows(form.catalog()).len();
        let reconcile = form_transition(
            &mut nav,
            FormAction::ReconcileSelection(row_count),
            form.catalog(),
        );
        if let Some(feedback) = reconcile.feedback {
            nav.status_text = feedback;
        }
        spinner.advance_if_needed(form.is_submitting());

        let view_model =
            project_form_view_model(form, &nav, shell.page_title.as_deref(), spinner.frame());
        terminal
            .draw(|frame| draw_form_ui(frame, &view_model))
            .map_err(|e| format!("failed to render create screen: {e}"))?;

        if !event::poll(UI_POLL_INTERVAL).map_err(|e| format!("failed to poll input: {e}"))? {
            continue;
        }
        let Event::Key(key) = event::read().map_err(|e| format!("failed to read input: {e}"))?
        else {
            continue;
        };
        let Some(action) = form_action_from_key(form.is_submitting(), key) else {
            continue;
        };
        let transition = form_transition(&mut nav, action, form.catalog());
        if let Some(feedback) = transition.feedback {
            nav.status_text = feedback;
        }
        match transition.effect {
            FormNavEffect::None => {}
            FormNavEffect::SelectTemplate(index) => {
                nav.status_text = select_template_feedback(form, index);
            }
            FormNavEffect::ToggleLanguage => {
                nav.status_text = toggle_language_feedback(form);
            }
            FormNavEffect::ImportTemplate => {
                let Some(raw) = prompt_line_tui(
                    terminal,
                    "Import template",
                    "Path to a JSON template file, or paste the JSON itself:",
                    "",
                    false,
                )?
                else {
                    nav.status_text = "Import canceled.".to_string();
                    continue;
                };
                nav.status_text = match read_import_source(&raw) {
                    Ok(payload) => match form.import_template(&payload) {
                        Ok(()) => format!(
                            "Imported template `{}`.",
                            form.draft()
                                .template
                                .as_ref()
                                .map(|template| template.name.as_str())
                                .unwrap_or_default()
                        ),
                        Err(err) => err.to_string(),
                    },
                    Err(err) => err,
                };
            }
            FormNavEffect::EditField(field) => {
                let current = form.draft().field_value(field).to_string();
                let Some(value) = prompt_line_tui(
                    terminal,
                    field.label(),
                    &format!("Enter {}:", field.label().to_ascii_lowercase()),
                    &current,
                    field.is_secret(),
                )?
                else {
                    nav.status_text = format!("Kept {}.", field.label());
                    continue;
                };
                nav.status_text = match form.set_field(field, &value) {
                    Ok(()) => format!("Updated {}.", field.label()),
                    Err(err) => err.to_string(),
                };
            }
            FormNavEffect::Submit => {
                match submit_form(form, shell, service, state_root) {
                    Ok(feedback) => {
                        nav.status_text = feedback;
                        nav.hint_text = SUBMITTING_HINT_TEXT.to_string();
                        spinner = Spinner::new();
                    }
                    Err(err) => nav.status_text = err,
                }
            }
            FormNavEffect::Cancel => return Ok(CreateExit::Cancel),
        }
    }
}

fn prompt_line_tui(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    title: &str,
    prompt: &str,
    initial: &str,
    secret: bool,
) -> Result<Option<String>, String> {
    let mut value = initial.to_string();
    loop {
        terminal
            .draw(|frame| {
                let area = centered_rect(70, 30, frame.area());
                frame.render_widget(Clear, area);
                let block = Block::default()
                    .borders(Borders::ALL)
                    .padding(Padding::new(2, 2, 1, 1));
                frame.render_widget(block.clone(), area);
                let inner = block.inner(area);
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Min(1),
                    ])
                    .split(inner);
                let max_input_width = rows[3].width.saturating_sub(2) as usize;
                let shown = if secret {
                    mask_secret(&value)
                } else {
                    value.clone()
                };
                let display_value = tail_for_display(&shown, max_input_width);

                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        title,
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))),
                    rows[0],
                );
                frame.render_widget(Paragraph::new(prompt), rows[2]);
                frame.render_widget(
                    Paragraph::new(Line::from(format!("> {display_value}"))),
                    rows[3],
                );
                frame.render_widget(Paragraph::new("Enter apply, Esc cancel"), rows[4]);
                frame.set_cursor_position((
                    rows[3].x + 2 + display_value.chars().count() as u16,
                    rows[3].y,
                ));
            })
            .map_err(|e| format!("failed to render prompt: {e}"))?;
        let ev = event::read().map_err(|e| format!("failed to read prompt input: {e}"))?;
        let Event::Key(key) = ev else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Esc => return Ok(None),
            KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => return Ok(Some(value)),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => value.push(ch),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parse_create_args_reads_every_flag() {
        let parsed = parse_create_args(&args(&[
            "--name",
            "Bot1",
            "--email",
            "a@b.com",
            "--username",
            "u",
            "--password",
            "p",
            "--language",
            "fr",
            "--template",
            "2",
            "--import",
            "tpl.json",
        ]))
        .expect("parse args");
        assert_eq!(parsed.name.as_deref(), Some("Bot1"));
        assert_eq!(parsed.language.as_deref(), Some("fr"));
        assert_eq!(parsed.template, Some(2));
        assert_eq!(parsed.import.as_deref(), Some("tpl.json"));
        assert!(!parsed.is_empty());
        assert!(parse_create_args(&[]).expect("empty").is_empty());
    }

    #[test]
    fn parse_create_args_rejects_bad_input() {
        assert!(parse_create_args(&args(&["--name"])).is_err());
        assert!(parse_create_args(&args(&["--template", "two"])).is_err());
        assert!(parse_create_args(&args(&["--colour", "red"])).is_err());
    }

    #[test]
    fn read_import_source_accepts_inline_json_and_files() {
        assert_eq!(
            read_import_source(r#"  {"id":9,"name":"Custom"} "#).expect("inline"),
            r#"{"id":9,"name":"Custom"}"#
        );
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("template.json");
        fs::write(&path, r#"{"id":1,"name":"FromFile"}"#).expect("write template");
        assert!(read_import_source(path.to_str().expect("utf8 path"))
            .expect("file")
            .contains("FromFile"));
        assert!(read_import_source("/definitely/missing.json").is_err());
    }

    #[test]
    fn spinner_only_advances_while_active() {
        let mut spinner = Spinner::new();
        spinner.last_tick = Instant::now() - SPINNER_TICK_INTERVAL * 2;
        spinner.advance_if_needed(false);
        assert_eq!(spinner.frame(), PROCESSING_FRAMES[0]);
        spinner.advance_if_needed(true);
        assert_eq!(spinner.frame(), PROCESSING_FRAMES[1]);
    }
}
