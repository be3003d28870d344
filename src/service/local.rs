use super::{AssistantCreationService, CreatedAssistant, CreationTicket, ServiceError};
use crate::config::ASSISTANTS_DIR;
use crate::onboarding::{CreateAssistantRequest, Language};
use crate::shared::fs_atomic::atomic_create_file;
use crate::shared::ids::{generate_request_id, validate_identifier_value};
use crate::shared::logging::append_onboarding_log;
use crate::shared::time::{now_rfc3339, now_secs};
use crate::templates::TemplateDescriptor;
use getrandom::getrandom;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Stored form of a created assistant. Only a salted digest of the password
/// is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantRecord {
    pub request_id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_salt: String,
    pub password_sha256: String,
    pub language: Language,
    pub template: Option<TemplateDescriptor>,
    pub created_at: String,
}

/// File-backed creation backend: each request is handled on its own worker
/// thread and lands in `<state_root>/assistants/<username>.yaml`.
#[derive(Debug, Clone)]
pub struct LocalAssistantService {
    state_root: PathBuf,
    creation_delay: Duration,
}

pub fn assistant_record_path(state_root: &Path, username: &str) -> PathBuf {
    state_root
        .join(ASSISTANTS_DIR)
        .join(format!("{username}.yaml"))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    to_hex(&hasher.finalize())
}

fn new_salt() -> Result<String, ServiceError> {
    let mut bytes = [0_u8; 16];
    getrandom(&mut bytes).map_err(|err| ServiceError::Randomness(err.to_string()))?;
    Ok(to_hex(&bytes))
}

fn write_assistant_record(
    state_root: &Path,
    request_id: &str,
    request: &CreateAssistantRequest,
) -> Result<CreatedAssistant, ServiceError> {
    let dir = state_root.join(ASSISTANTS_DIR);
    fs::create_dir_all(&dir).map_err(|source| ServiceError::CreateDir {
        path: dir.display().to_string(),
        source,
    })?;

    let salt = new_salt()?;
    let record = AssistantRecord {
        request_id: request_id.to_string(),
        name: request.name.clone(),
        email: request.email.clone(),
        username: request.username.clone(),
        password_sha256: password_digest(&salt, &request.password),
        password_salt: salt,
        language: request.language,
        template: request.template.clone(),
        created_at: now_rfc3339(),
    };
    let body = serde_yaml::to_string(&record)?;
    let path = assistant_record_path(state_root, &request.username);
    match atomic_create_file(&path, body.as_bytes()) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            return Err(ServiceError::UsernameTaken {
                username: request.username.clone(),
            });
        }
        Err(source) => {
            return Err(ServiceError::WriteRecord {
                path: path.display().to_string(),
                source,
            });
        }
    }

    Ok(CreatedAssistant {
        request_id: request_id.to_string(),
        name: record.name,
        username: record.username,
        location: Some(path.display().to_string()),
    })
}

impl LocalAssistantService {
    pub fn new(state_root: &Path) -> Self {
        Self {
            state_root: state_root.to_path_buf(),
            creation_delay: Duration::ZERO,
        }
    }

    pub fn with_creation_delay(mut self, delay: Duration) -> Self {
        self.creation_delay = delay;
        self
    }
}

impl AssistantCreationService for LocalAssistantService {
    fn create_assistant(
        &self,
        request: CreateAssistantRequest,
    ) -> Result<CreationTicket, ServiceError> {
        validate_identifier_value("username", &request.username)
            .map_err(ServiceError::InvalidRequest)?;
        let request_id = generate_request_id(now_secs()).map_err(ServiceError::Randomness)?;
        let (reporter, ticket) = CreationTicket::channel(&request_id);

        let state_root = self.state_root.clone();
        let delay = self.creation_delay;
        thread::Builder::new()
            .name(format!("create-{request_id}"))
            .spawn(move || {
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                let request_id = reporter.request_id().to_string();
                let result = write_assistant_record(&state_root, &request_id, &request);
                match &result {
                    Ok(created) => append_onboarding_log(
                        &state_root,
                        "info",
                        "service.local.created",
                        &format!(
                            "request_id={request_id} username={}",
                            created.username
                        ),
                    ),
                    Err(err) => append_onboarding_log(
                        &state_root,
                        "error",
                        "service.local.failed",
                        &format!("request_id={request_id} error={err}"),
                    ),
                }
                reporter.report(result);
            })
            .map_err(|err| ServiceError::Spawn(err.to_string()))?;

        Ok(ticket)
    }
}
