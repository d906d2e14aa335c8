use anyhow::Result;
use clap::CommandFactory;

use crate::{
    cli::{Cli, handlers},
    core::session::Session,
    models::CommandRequest,
};

/// A built-in verb, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut Session) -> Result<()>,
}

/// Every built-in verb. Anything else is treated as an external command.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "install",
        aliases: &["add"],
        handler: handlers::install::handle,
    },
    CommandDefinition {
        name: "uninstall",
        aliases: &["remove", "rm"],
        handler: handlers::uninstall::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "name",
        aliases: &[],
        handler: handlers::name::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &[],
        handler: handlers::show::handle,
    },
    CommandDefinition {
        name: "gitignore",
        aliases: &[],
        handler: handlers::gitignore::handle,
    },
    CommandDefinition {
        name: "check",
        aliases: &[],
        handler: handlers::check::handle,
    },
    CommandDefinition {
        name: "create",
        aliases: &[],
        handler: handlers::create::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes one invocation to its handler.
///
/// Configuration verbs (`name`, `show`, `gitignore`) and `check` never look for
/// an environment; everything else resolves one inside its handler.
pub fn dispatch(request: CommandRequest, session: &mut Session) -> Result<()> {
    log::debug!("Dispatching request: {:?}", request);
    session.global = request.global;

    let Some(verb) = request.verb else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match find_command(&verb) {
        Some(command) => {
            log::debug!("Built-in command '{}'", command.name);
            (command.handler)(request.operands, session)
        }
        None => handlers::external::handle(&verb, request.operands, session),
    }
}
