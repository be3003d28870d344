use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod templates;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Create => crate::tui::create::cmd_create(&args[1..]),
        CliVerb::Templates => templates::cmd_templates(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
