use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Media type accepted by the import slot.
pub const IMPORT_MEDIA_TYPE: &str = "application/json";

/// A named starting configuration for a new assistant.
///
/// Fields beyond `id` and `name` only appear on imported templates; they are
/// carried verbatim into the creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TemplateDescriptor {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            extra: Map::new(),
        }
    }
}

pub fn default_templates() -> Vec<TemplateDescriptor> {
    vec![
        TemplateDescriptor::new(1, "Empty"),
        TemplateDescriptor::new(2, "HelloWorld"),
        TemplateDescriptor::new(3, "Test1"),
        TemplateDescriptor::new(4, "Import"),
    ]
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateImportError {
    #[error("template payload is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("template payload must be a json object")]
    NotAnObject,
    #[error("template payload requires {0}")]
    MissingField(&'static str),
}

pub fn parse_import_payload(raw: &str) -> Result<TemplateDescriptor, TemplateImportError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(mut fields) = value else {
        return Err(TemplateImportError::NotAnObject);
    };
    let id = fields
        .get("id")
        .and_then(Value::as_i64)
        .ok_or(TemplateImportError::MissingField("an integer `id`"))?;
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(TemplateImportError::MissingField("a string `name`"))?;
    fields.remove("id");
    fields.remove("name");
    Ok(TemplateDescriptor {
        id,
        name,
        extra: fields,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCatalog {
    entries: Vec<TemplateDescriptor>,
    import_slot: usize,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self {
            entries: default_templates(),
            import_slot: 3,
        }
    }
}

impl TemplateCatalog {
    pub fn new(entries: Vec<TemplateDescriptor>, import_slot: usize) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("`templates` must list at least one template".to_string());
        }
        let mut ids = BTreeSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(format!("template {} requires a non-empty name", entry.id));
            }
            if !ids.insert(entry.id) {
                return Err(format!("duplicate template id {}", entry.id));
            }
        }
        if import_slot >= entries.len() {
            return Err(format!(
                "`import_slot` {import_slot} is outside the catalog (len {})",
                entries.len()
            ));
        }
        Ok(Self {
            entries,
            import_slot,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TemplateDescriptor> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[TemplateDescriptor] {
        &self.entries
    }

    /// Index of the synthetic "Import" entry that imported templates occupy.
    pub fn import_slot(&self) -> usize {
        self.import_slot
    }
}
