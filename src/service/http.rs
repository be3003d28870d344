use super::{AssistantCreationService, CreatedAssistant, CreationTicket, ServiceError};
use crate::onboarding::CreateAssistantRequest;
use crate::shared::ids::generate_request_id;
use crate::shared::logging::append_onboarding_log;
use crate::shared::time::now_secs;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::thread;

/// Remote creation backend: `POST {endpoint}/bots` with the request as JSON.
#[derive(Debug, Clone)]
pub struct HttpAssistantService {
    endpoint: String,
    state_root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct CreateBotResponse {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn error_message_from_body(status: u16, body: &str) -> String {
    serde_json::from_str::<CreateBotResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("backend responded with status {status}"))
}

fn location_from_id(id: &Value) -> String {
    match id {
        Value::String(value) => value.clone(),
        other => other.to_string(),
    }
}

impl HttpAssistantService {
    pub fn new(endpoint: String, state_root: &Path) -> Self {
        Self {
            endpoint,
            state_root: state_root.to_path_buf(),
        }
    }

    fn bots_url(&self) -> String {
        format!("{}/bots", self.endpoint.trim_end_matches('/'))
    }

    fn post_request(
        url: &str,
        request_id: &str,
        request: &CreateAssistantRequest,
    ) -> Result<CreatedAssistant, ServiceError> {
        let body =
            serde_json::to_value(request).map_err(|e| ServiceError::Request(e.to_string()))?;
        let response = match ureq::post(url)
            .set("X-Request-Id", request_id)
            .send_json(body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let raw = response.into_string().unwrap_or_default();
                return Err(ServiceError::Rejected(error_message_from_body(status, &raw)));
            }
            Err(err) => return Err(ServiceError::Request(err.to_string())),
        };

        let raw = response
            .into_string()
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        created_from_success_body(request_id, request, &raw)
    }
}

/// Interprets a 2xx body. `id` and `name` are optional, so a blank or
/// non-JSON body still counts as a created assistant.
fn created_from_success_body(
    request_id: &str,
    request: &CreateAssistantRequest,
    raw: &str,
) -> Result<CreatedAssistant, ServiceError> {
    let parsed = if raw.trim().is_empty() {
        CreateBotResponse::default()
    } else {
        serde_json::from_str::<CreateBotResponse>(raw).unwrap_or_default()
    };
    if let Some(message) = parsed.error.filter(|message| !message.trim().is_empty()) {
        return Err(ServiceError::Rejected(message));
    }
    Ok(CreatedAssistant {
        request_id: request_id.to_string(),
        name: parsed.name.unwrap_or_else(|| request.name.clone()),
        username: request.username.clone(),
        location: parsed.id.as_ref().map(location_from_id),
    })
}

impl AssistantCreationService for HttpAssistantService {
    fn create_assistant(
        &self,
        request: CreateAssistantRequest,
    ) -> Result<CreationTicket, ServiceError> {
        let request_id = generate_request_id(now_secs()).map_err(ServiceError::Randomness)?;
        let (reporter, ticket) = CreationTicket::channel(&request_id);
        let url = self.bots_url();
        let state_root = self.state_root.clone();

        thread::Builder::new()
            .name(format!("create-{request_id}"))
            .spawn(move || {
                let request_id = reporter.request_id().to_string();
                let result = Self::post_request(&url, &request_id, &request);
                if let Err(err) = &result {
                    append_onboarding_log(
                        &state_root,
                        "error",
                        "service.http.failed",
                        &format!("request_id={request_id} url={url} error={err}"),
                    );
                }
                reporter.report(result);
            })
            .map_err(|err| ServiceError::Spawn(err.to_string()))?;

        Ok(ticket)
    }
}
