pub mod http;
pub mod local;
pub mod ticket;

pub use crate::shared::errors::ServiceError;
pub use http::HttpAssistantService;
pub use local::{assistant_record_path, AssistantRecord, LocalAssistantService};
pub use ticket::{CreationReporter, CreationTicket, TicketStatus};

use crate::config::{ServiceKind, Settings};
use crate::onboarding::CreateAssistantRequest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAssistant {
    pub request_id: String,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Accepts creation requests and reports each outcome on the ticket returned
/// for that request only.
pub trait AssistantCreationService {
    fn create_assistant(
        &self,
        request: CreateAssistantRequest,
    ) -> Result<CreationTicket, ServiceError>;
}

pub fn service_from_settings(
    settings: &Settings,
    state_root: &Path,
) -> Result<Box<dyn AssistantCreationService>, String> {
    let delay = Duration::from_millis(settings.service.creation_delay_ms);
    match settings.service.kind {
        ServiceKind::Local => Ok(Box::new(
            LocalAssistantService::new(state_root).with_creation_delay(delay),
        )),
        ServiceKind::Http => {
            let endpoint = settings
                .service
                .endpoint
                .clone()
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| "http service requires `service.endpoint`".to_string())?;
            Ok(Box::new(HttpAssistantService::new(endpoint, state_root)))
        }
    }
}
