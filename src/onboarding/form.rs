use super::draft::{DraftAssistant, DraftField};
use super::error::FormError;
use crate::config::{ConfigError, Settings};
use crate::service::{AssistantCreationService, CreatedAssistant, CreationTicket, TicketStatus};
use crate::templates::{parse_import_payload, TemplateCatalog};
use std::time::{Duration, Instant};

pub const ALREADY_SUBMITTING_FEEDBACK: &str = "Creation already in progress.";
const WAIT_POLL_STEP: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting { request_id: String },
}

/// UI side effects requested by the form. Front ends apply them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEffect {
    SetPageTitle(String),
    ShowProgressDialog,
    CloseProgressDialog,
    Navigate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormTransition {
    pub effects: Vec<FormEffect>,
    pub feedback: Option<String>,
}

impl FormTransition {
    fn no_op(feedback: Option<String>) -> Self {
        Self {
            effects: Vec::new(),
            feedback,
        }
    }

    pub fn navigation(&self) -> Option<&str> {
        self.effects.iter().find_map(|effect| match effect {
            FormEffect::Navigate(route) => Some(route.as_str()),
            _ => None,
        })
    }
}

/// Draft plus submission state machine for the assistant creation screen.
///
/// The form never talks to a backend directly: `submit` hands a request to an
/// [`AssistantCreationService`] and keeps the returned ticket, and
/// `poll_completion` watches only that ticket.
#[derive(Debug)]
pub struct AssistantCreationForm {
    draft: DraftAssistant,
    catalog: TemplateCatalog,
    page_title: String,
    builder_route: String,
    mounted: bool,
    pending: Option<CreationTicket>,
    last_error: Option<String>,
    last_created: Option<CreatedAssistant>,
}

impl AssistantCreationForm {
    pub fn new(catalog: TemplateCatalog, page_title: &str, builder_route: &str) -> Self {
        Self {
            draft: DraftAssistant::default(),
            catalog,
            page_title: page_title.to_string(),
            builder_route: builder_route.to_string(),
            mounted: false,
            pending: None,
            last_error: None,
            last_created: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self::new(
            settings.catalog()?,
            &settings.page_title,
            &settings.builder_route,
        ))
    }

    pub fn draft(&self) -> &DraftAssistant {
        &self.draft
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn page_title(&self) -> &str {
        &self.page_title
    }

    pub fn submission_state(&self) -> SubmissionState {
        match &self.pending {
            Some(ticket) => SubmissionState::Submitting {
                request_id: ticket.request_id().to_string(),
            },
            None => SubmissionState::Idle,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_created(&self) -> Option<&CreatedAssistant> {
        self.last_created.as_ref()
    }

    /// Emits the page title the first time the form is shown.
    pub fn mount(&mut self) -> FormTransition {
        if self.mounted {
            return FormTransition::no_op(None);
        }
        self.mounted = true;
        FormTransition {
            effects: vec![FormEffect::SetPageTitle(self.page_title.clone())],
            feedback: None,
        }
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        match &self.pending {
            Some(ticket) => Err(FormError::SubmissionInFlight {
                request_id: ticket.request_id().to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn set_field(&mut self, field: DraftField, value: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.draft
            .apply_field(field, value)
            .map_err(|message| FormError::InvalidField {
                field: field.as_str(),
                message,
            })
    }

    pub fn toggle_language(&mut self) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.draft.language = self.draft.language.toggled();
        Ok(())
    }

    pub fn select_template(&mut self, index: usize) -> Result<(), FormError> {
        self.ensure_editable()?;
        let template = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(FormError::TemplateIndexOutOfRange {
                index,
                len: self.catalog.len(),
            })?;
        self.draft.selected_template_index = index;
        self.draft.template = Some(template);
        Ok(())
    }

    /// Parses an imported template and places it in the import slot. A
    /// malformed payload leaves the current selection untouched.
    pub fn import_template(&mut self, raw: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        let template = parse_import_payload(raw)?;
        self.draft.selected_template_index = self.catalog.import_slot();
        self.draft.template = Some(template);
        Ok(())
    }

    pub fn submit(&mut self, service: &dyn AssistantCreationService) -> FormTransition {
        if self.pending.is_some() {
            return FormTransition::no_op(Some(ALREADY_SUBMITTING_FEEDBACK.to_string()));
        }

        match service.create_assistant(self.draft.to_request()) {
            Ok(ticket) => {
                let feedback = format!("Creating assistant (request_id={}).", ticket.request_id());
                self.pending = Some(ticket);
                self.last_error = None;
                FormTransition {
                    effects: vec![FormEffect::ShowProgressDialog],
                    feedback: Some(feedback),
                }
            }
            Err(err) => {
                let message = err.to_string();
                self.last_error = Some(message.clone());
                FormTransition::no_op(Some(message))
            }
        }
    }

    /// Checks the in-flight request without blocking and applies its outcome.
    pub fn poll_completion(&mut self) -> FormTransition {
        let status = match &self.pending {
            Some(ticket) => ticket.try_status(),
            None => return FormTransition::no_op(None),
        };
        self.apply_status(status)
    }

    /// Blocks until the in-flight request resolves or `timeout` elapses. A
    /// timeout leaves the request in flight.
    pub fn wait_for_completion(&mut self, timeout: Duration) -> FormTransition {
        let deadline = Instant::now() + timeout;
        loop {
            let status = match &self.pending {
                Some(ticket) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    ticket.wait_timeout(remaining.min(WAIT_POLL_STEP))
                }
                None => return FormTransition::no_op(None),
            };
            if matches!(status, TicketStatus::Completed(_)) || Instant::now() >= deadline {
                return self.apply_status(status);
            }
        }
    }

    fn apply_status(&mut self, status: TicketStatus) -> FormTransition {
        let result = match status {
            TicketStatus::Pending => return FormTransition::no_op(None),
            TicketStatus::Completed(result) => result,
        };
        self.pending = None;
        match result {
            Ok(created) => {
                let feedback = format!("Assistant `{}` created.", created.name);
                self.last_created = Some(created);
                FormTransition {
                    effects: vec![
                        FormEffect::CloseProgressDialog,
                        FormEffect::Navigate(self.builder_route.clone()),
                    ],
                    feedback: Some(feedback),
                }
            }
            Err(err) => {
                let message = err.to_string();
                self.last_error = Some(message.clone());
                FormTransition {
                    effects: vec![FormEffect::CloseProgressDialog],
                    feedback: Some(message),
                }
            }
        }
    }
}
