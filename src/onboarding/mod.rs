pub mod draft;
pub mod error;
pub mod form;
pub mod navigation;
pub mod screens;
pub mod shell;

pub use draft::{CreateAssistantRequest, DraftAssistant, DraftField, Language};
pub use error::FormError;
pub use form::{AssistantCreationForm, FormEffect, FormTransition, SubmissionState};
pub use shell::FormShell;
