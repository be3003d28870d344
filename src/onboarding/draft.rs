use crate::templates::TemplateDescriptor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Fr => "French",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            _ => Err("language must be one of: en, fr".to_string()),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::Fr,
            Self::Fr => Self::En,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Email,
    Username,
    Password,
    Language,
}

/// Field order as rendered on the creation screen.
pub const FORM_FIELDS: [DraftField; 5] = [
    DraftField::Name,
    DraftField::Username,
    DraftField::Password,
    DraftField::Email,
    DraftField::Language,
];

impl DraftField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Username => "username",
            Self::Password => "password",
            Self::Language => "language",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Assistant name",
            Self::Email => "Your email",
            Self::Username => "Username",
            Self::Password => "Password",
            Self::Language => "Choose language",
        }
    }

    pub fn is_secret(self) -> bool {
        self == Self::Password
    }
}

/// The in-progress, unsubmitted assistant data owned by one form instance.
#[derive(Clone, PartialEq, Default)]
pub struct DraftAssistant {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub language: Language,
    pub selected_template_index: usize,
    pub template: Option<TemplateDescriptor>,
}

impl std::fmt::Debug for DraftAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftAssistant")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("language", &self.language)
            .field("selected_template_index", &self.selected_template_index)
            .field("template", &self.template)
            .finish()
    }
}

impl DraftAssistant {
    pub fn field_value(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Email => &self.email,
            DraftField::Username => &self.username,
            DraftField::Password => &self.password,
            DraftField::Language => self.language.as_str(),
        }
    }

    pub(crate) fn apply_field(&mut self, field: DraftField, value: &str) -> Result<(), String> {
        match field {
            DraftField::Name => self.name = value.to_string(),
            DraftField::Email => self.email = value.to_string(),
            DraftField::Username => self.username = value.to_string(),
            DraftField::Password => self.password = value.to_string(),
            DraftField::Language => self.language = Language::parse(value)?,
        }
        Ok(())
    }

    /// Required text fields that are still blank, in screen order.
    pub fn missing_required_fields(&self) -> Vec<DraftField> {
        FORM_FIELDS
            .iter()
            .copied()
            .filter(|field| *field != DraftField::Language)
            .filter(|field| self.field_value(*field).trim().is_empty())
            .collect()
    }

    pub fn to_request(&self) -> CreateAssistantRequest {
        CreateAssistantRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            template: self.template.clone(),
            language: self.language,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAssistantRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub template: Option<TemplateDescriptor>,
    pub language: Language,
}

impl std::fmt::Debug for CreateAssistantRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAssistantRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("template", &self.template)
            .field("language", &self.language)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_case_insensitively_and_toggles() {
        assert_eq!(Language::parse(" FR "), Ok(Language::Fr));
        assert!(Language::parse("de").is_err());
        assert_eq!(Language::En.toggled(), Language::Fr);
        assert_eq!(Language::Fr.toggled(), Language::En);
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn missing_required_fields_follow_screen_order() {
        let mut draft = DraftAssistant::default();
        assert_eq!(
            draft.missing_required_fields(),
            vec![
                DraftField::Name,
                DraftField::Username,
                DraftField::Password,
                DraftField::Email
            ]
        );
        draft.name = "Bot1".to_string();
        draft.password = "   ".to_string();
        assert_eq!(
            draft.missing_required_fields(),
            vec![DraftField::Username, DraftField::Password, DraftField::Email]
        );
    }

    #[test]
    fn request_serializes_null_template_and_lowercase_language() {
        let draft = DraftAssistant {
            name: "Bot1".to_string(),
            email: "a@b.com".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            ..DraftAssistant::default()
        };
        let encoded = serde_json::to_value(draft.to_request()).expect("encode request");
        assert_eq!(
            encoded,
            serde_json::json!({
                "name": "Bot1",
                "email": "a@b.com",
                "username": "u",
                "password": "p",
                "template": null,
                "language": "en",
            })
        );
    }

    #[test]
    fn debug_output_redacts_password() {
        let draft = DraftAssistant {
            password: "hunter2".to_string(),
            ..DraftAssistant::default()
        };
        assert!(!format!("{draft:?}").contains("hunter2"));
        assert!(!format!("{:?}", draft.to_request()).contains("hunter2"));
    }
}
