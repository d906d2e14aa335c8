use clap::Parser;

use crate::models::CommandRequest;

/// Per-verb operand parsers.
pub mod args;
/// Verb registry and routing.
pub mod dispatcher;
/// One handler per verb.
pub mod handlers;

/// Builds the colour-aware help text at runtime.
pub fn build_help_string() -> &'static str {
    // Semantic tags in the catalogue template become ANSI styles, or nothing
    // when colours are disabled.
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// crowbar: find or create the project's virtual environment and run things in it.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Operate on the system interpreter instead of a project environment.
    #[arg(short = 'g', long = "global")]
    pub global: bool,

    /// The verb followed by its operands, passed through untouched.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Splits the raw arguments into verb and operands.
    pub fn into_request(self) -> CommandRequest {
        CommandRequest::from_args(self.args, self.global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flag_before_verb() {
        let cli = Cli::try_parse_from(["crowbar", "-g", "install", "black"]).unwrap();
        let request = cli.into_request();
        assert!(request.global);
        assert_eq!(request.verb.as_deref(), Some("install"));
        assert_eq!(request.operands, vec!["black"]);
    }

    #[test]
    fn test_operand_flags_pass_through() {
        let cli = Cli::try_parse_from(["crowbar", "install", "-U", "requests"]).unwrap();
        let request = cli.into_request();
        assert!(!request.global);
        assert_eq!(request.operands, vec!["-U", "requests"]);
    }

    #[test]
    fn test_external_command_keeps_its_flags() {
        let cli = Cli::try_parse_from(["crowbar", "pytest", "-x", "--global", "tests"]).unwrap();
        let request = cli.into_request();
        assert!(!request.global);
        assert_eq!(request.verb.as_deref(), Some("pytest"));
        assert_eq!(request.operands, vec!["-x", "--global", "tests"]);
    }

    #[test]
    fn test_no_arguments_is_empty_request() {
        let request = Cli::try_parse_from(["crowbar"]).unwrap().into_request();
        assert_eq!(request.verb, None);
        assert!(request.operands.is_empty());
    }
}
