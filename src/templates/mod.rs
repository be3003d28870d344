pub mod catalog;

pub use catalog::{
    default_templates, parse_import_payload, TemplateCatalog, TemplateDescriptor,
    TemplateImportError, IMPORT_MEDIA_TYPE,
};
