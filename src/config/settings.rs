use super::ConfigError;
use crate::templates::catalog::{default_templates, TemplateCatalog, TemplateDescriptor};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_PAGE_TITLE: &str = "Create your virtual assistant";
pub const DEFAULT_BUILDER_ROUTE: &str = "/builder";
pub const DEFAULT_IMPORT_SLOT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    #[default]
    Local,
    Http,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Http => "http",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub kind: ServiceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub creation_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_page_title")]
    pub page_title: String,
    #[serde(default = "default_builder_route")]
    pub builder_route: String,
    #[serde(default = "default_templates")]
    pub templates: Vec<TemplateDescriptor>,
    #[serde(default = "default_import_slot")]
    pub import_slot: usize,
    #[serde(default)]
    pub service: ServiceConfig,
}

fn default_page_title() -> String {
    DEFAULT_PAGE_TITLE.to_string()
}

fn default_builder_route() -> String {
    DEFAULT_BUILDER_ROUTE.to_string()
}

fn default_import_slot() -> usize {
    DEFAULT_IMPORT_SLOT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_title: default_page_title(),
            builder_route: default_builder_route(),
            templates: default_templates(),
            import_slot: DEFAULT_IMPORT_SLOT,
            service: ServiceConfig::default(),
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_title.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`page_title` must be non-empty".to_string(),
            ));
        }
        if !self.builder_route.starts_with('/') {
            return Err(ConfigError::Settings(
                "`builder_route` must start with '/'".to_string(),
            ));
        }
        if self.service.kind == ServiceKind::Http {
            let endpoint = self.service.endpoint.as_deref().unwrap_or_default().trim();
            if endpoint.is_empty() {
                return Err(ConfigError::Settings(
                    "`service.endpoint` is required when `service.kind` is http".to_string(),
                ));
            }
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::Settings(
                    "`service.endpoint` must be an http(s) url".to_string(),
                ));
            }
        }
        self.catalog().map(|_| ())
    }

    pub fn catalog(&self) -> Result<TemplateCatalog, ConfigError> {
        TemplateCatalog::new(self.templates.clone(), self.import_slot).map_err(ConfigError::Catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").expect("parse settings");
        settings.validate().expect("defaults validate");
        assert_eq!(settings.page_title, DEFAULT_PAGE_TITLE);
        assert_eq!(settings.import_slot, 3);
        assert_eq!(settings.service.kind, ServiceKind::Local);

        let catalog = settings.catalog().expect("catalog");
        let names: Vec<&str> = catalog.entries().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Empty", "HelloWorld", "Test1", "Import"]);
    }

    #[test]
    fn http_service_requires_endpoint() {
        let settings: Settings = serde_yaml::from_str(
            r#"
service:
  kind: http
"#,
        )
        .expect("parse settings");
        let err = settings.validate().expect_err("missing endpoint");
        assert!(err.to_string().contains("service.endpoint"), "{err}");

        let settings: Settings = serde_yaml::from_str(
            r#"
service:
  kind: http
  endpoint: http://127.0.0.1:8080/api
"#,
        )
        .expect("parse settings");
        settings.validate().expect("endpoint configured");
    }

    #[test]
    fn builder_route_must_be_absolute() {
        let settings: Settings =
            serde_yaml::from_str("builder_route: builder").expect("parse settings");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn duplicate_template_ids_are_rejected() {
        let settings: Settings = serde_yaml::from_str(
            r#"
templates:
  - id: 1
    name: Empty
  - id: 1
    name: Import
import_slot: 1
"#,
        )
        .expect("parse settings");
        let err = settings.validate().expect_err("duplicate ids");
        assert!(err.to_string().contains("duplicate template id 1"), "{err}");
    }
}
