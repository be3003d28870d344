use super::draft::DraftField;
use super::form::{AssistantCreationForm, SubmissionState};
use super::navigation::{clamp_selection, form_rows, FormRow, NavState};
use crate::templates::IMPORT_MEDIA_TYPE;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Padding, Paragraph, Row, Table};
use ratatui::Frame;

pub const PROCESSING_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

const INTRO_LINES: [&str; 2] = [
    "Welcome! Fill in the information below to create your assistant.",
    "Choose a prebuilt template, import one, or start from an empty model.",
];
// Bordered block holding the title and the intro lines.
const HEADER_HEIGHT: u16 = 2 + 1 + INTRO_LINES.len() as u16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFieldRow {
    pub section: &'static str,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormViewModel {
    pub title: String,
    pub intro: Vec<String>,
    pub rows: Vec<FormFieldRow>,
    pub selected: usize,
    pub status_text: String,
    pub hint_text: String,
    pub progress: Option<String>,
}

pub fn mask_secret(value: &str) -> String {
    "*".repeat(value.chars().count())
}

fn display_value(value: &str) -> String {
    if value.is_empty() {
        "<required>".to_string()
    } else {
        value.to_string()
    }
}

pub fn project_form_view_model(
    form: &AssistantCreationForm,
    nav: &NavState,
    title: Option<&str>,
    spinner_frame: &str,
) -> FormViewModel {
    let draft = form.draft();
    let catalog = form.catalog();
    let rows: Vec<FormFieldRow> = form_rows(catalog)
        .into_iter()
        .map(|row| match row {
            FormRow::Template(index) => {
                let name = catalog
                    .get(index)
                    .map(|template| template.name.clone())
                    .unwrap_or_default();
                let selected = draft.template.is_some() && draft.selected_template_index == index;
                let value = match (&draft.template, selected, index == catalog.import_slot()) {
                    (Some(template), true, true) => {
                        format!("(x) imported `{}` (id {})", template.name, template.id)
                    }
                    (_, true, _) => "(x)".to_string(),
                    (_, false, true) => format!("( ) {IMPORT_MEDIA_TYPE}"),
                    _ => "( )".to_string(),
                };
                FormFieldRow {
                    section: "Templates",
                    label: name,
                    value,
                }
            }
            FormRow::Field(DraftField::Language) => FormFieldRow {
                section: "Informations",
                label: DraftField::Language.label().to_string(),
                value: draft.language.label().to_string(),
            },
            FormRow::Field(field) => {
                let raw = draft.field_value(field);
                FormFieldRow {
                    section: "Informations",
                    label: field.label().to_string(),
                    value: if field.is_secret() && !raw.is_empty() {
                        mask_secret(raw)
                    } else {
                        display_value(raw)
                    },
                }
            }
            FormRow::Submit => FormFieldRow {
                section: "",
                label: "Let's go".to_string(),
                value: String::new(),
            },
        })
        .collect();

    let progress = match form.submission_state() {
        SubmissionState::Submitting { request_id } => Some(format!(
            "Creating your assistant {spinner_frame} (request_id={request_id})"
        )),
        SubmissionState::Idle => None,
    };

    FormViewModel {
        title: title.unwrap_or(form.page_title()).to_string(),
        intro: INTRO_LINES.iter().map(|line| (*line).to_string()).collect(),
        selected: clamp_selection(nav.selected, rows.len()),
        rows,
        status_text: nav.status_text.clone(),
        hint_text: nav.hint_text.clone(),
        progress,
    }
}

pub fn tail_for_display(value: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max_chars {
        return value.to_string();
    }
    chars[chars.len() - max_chars..].iter().collect()
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub(crate) fn draw_form_ui(frame: &mut Frame<'_>, view_model: &FormViewModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let mut header_lines = vec![Line::from(Span::styled(
        view_model.title.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];
    header_lines.extend(view_model.intro.iter().cloned().map(Line::from));
    let header = Paragraph::new(header_lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let table_rows = view_model.rows.iter().enumerate().map(|(idx, row)| {
        let style = if idx == view_model.selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(row.section),
            Cell::from(row.label.clone()),
            Cell::from(row.value.clone()),
        ])
        .style(style)
    });
    let table = Table::new(
        table_rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(35),
            Constraint::Percentage(45),
        ],
    )
    .column_spacing(2)
    .block(main_panel_block());
    frame.render_widget(table, chunks[1]);

    let footer = Paragraph::new(vec![
        Line::from(view_model.hint_text.clone()),
        Line::from(format!("Status: {}", view_model.status_text)),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);

    if let Some(progress) = &view_model.progress {
        let area = centered_rect(60, 20, frame.area());
        frame.render_widget(Clear, area);
        let dialog = Paragraph::new(vec![Line::from(""), Line::from(progress.clone())]).block(
            Block::default()
                .title("Processing")
                .borders(Borders::ALL)
                .border_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                )
                .padding(Padding::new(2, 2, 0, 0)),
        );
        frame.render_widget(dialog, area);
    }
}

fn main_panel_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(3, 3, 1, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateCatalog;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered_lines(view_model: &FormViewModel) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).expect("test terminal");
        terminal
            .draw(|frame| draw_form_ui(frame, view_model))
            .expect("draw form");
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    #[test]
    fn header_shows_title_and_every_intro_line() {
        let form = AssistantCreationForm::new(
            TemplateCatalog::default(),
            "Create your virtual assistant",
            "/builder",
        );
        let view_model = project_form_view_model(&form, &NavState::root(), None, "|");
        let screen = rendered_lines(&view_model).join("\n");

        assert!(screen.contains("Create your virtual assistant"), "{screen}");
        for line in INTRO_LINES {
            assert!(screen.contains(line), "missing `{line}` in:\n{screen}");
        }
        assert!(screen.contains("Let's go"), "{screen}");
        assert!(!screen.contains("Processing"), "{screen}");
    }
}
