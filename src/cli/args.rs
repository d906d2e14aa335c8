// src/cli/args.rs
use clap::{Parser, ValueEnum};

/// Operands of `install`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)] // Operands arrive without the verb in front.
pub struct InstallArgs {
    /// Packages to install. Without any, installs from requirements.txt.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub packages: Vec<String>,
}

/// Operands of `uninstall`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct UninstallArgs {
    /// Packages to remove.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub packages: Vec<String>,
}

/// Operands of `run`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct RunArgs {
    /// The Python file to execute.
    pub file: String,

    /// Arguments handed to the script.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Operand of `name`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct NameArgs {
    /// New directory name for project environments.
    pub name: String,
}

/// What `show` prints.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowField {
    /// The configured environment name.
    Name,
    /// `on` or `off`.
    Gitignore,
    /// Every setting plus where it comes from.
    Config,
}

/// Operand of `show`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct ShowArgs {
    /// Which setting to print.
    #[arg(value_enum)]
    pub field: ShowField,
}

/// Operand of `gitignore`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Enable.
    On,
    /// Disable.
    Off,
}

impl Toggle {
    /// Whether this is `on`.
    pub fn enabled(self) -> bool {
        self == Self::On
    }
}

/// Operand of `gitignore`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct GitignoreArgs {
    /// New state of the setting.
    #[arg(value_enum)]
    pub state: Toggle,
}

/// Object of `check` and `create`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The project environment.
    Env,
}

/// Operand of `check` and `create`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct TargetArgs {
    /// What to check or create.
    #[arg(value_enum)]
    pub target: Target,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninstall_requires_a_package() {
        assert!(UninstallArgs::try_parse_from(Vec::<String>::new()).is_err());
        let parsed = UninstallArgs::try_parse_from(["requests", "rich"]).unwrap();
        assert_eq!(parsed.packages, vec!["requests", "rich"]);
    }

    #[test]
    fn test_run_forwards_script_arguments() {
        let parsed = RunArgs::try_parse_from(["app.py", "--verbose", "input.csv"]).unwrap();
        assert_eq!(parsed.file, "app.py");
        assert_eq!(parsed.args, vec!["--verbose", "input.csv"]);
    }

    #[test]
    fn test_closed_operand_sets() {
        assert_eq!(
            ShowArgs::try_parse_from(["gitignore"]).unwrap().field,
            ShowField::Gitignore
        );
        assert!(GitignoreArgs::try_parse_from(["maybe"]).is_err());
        assert!(GitignoreArgs::try_parse_from(["off"]).unwrap().state == Toggle::Off);
        assert_eq!(TargetArgs::try_parse_from(["env"]).unwrap().target, Target::Env);
        assert!(TargetArgs::try_parse_from(["project"]).is_err());
    }
}
