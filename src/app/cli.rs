#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Create,
    Templates,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "create" => CliVerb::Create,
        "templates" => CliVerb::Templates,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  create                               Open the assistant creation screen".to_string(),
        "  create --name N --email E --username U --password P".to_string(),
        "         [--language en|fr] [--template INDEX] [--import PATH|JSON]".to_string(),
        "                                       Create an assistant without the screen"
            .to_string(),
        "  templates                            List the starter template catalog".to_string(),
        "  help                                 Show this help".to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}
