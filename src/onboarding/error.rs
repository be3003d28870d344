use crate::templates::TemplateImportError;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("template index {index} is outside the catalog (len {len})")]
    TemplateIndexOutOfRange { index: usize, len: usize },
    #[error("failed to import template: {0}")]
    TemplateImport(#[from] TemplateImportError),
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("creation already in progress (request_id={request_id})")]
    SubmissionInFlight { request_id: String },
}
