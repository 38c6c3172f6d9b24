//! The clap `Command` built from a registry, and applying its matches.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::constants::POSITIONAL_ID;
use crate::error::ConfigError;
use crate::models::{SlotKind, Source};
use crate::registry::Registry;

/// Argument id of the help flag. Leading `-` keeps it apart from slot names.
const HELP_ID: &str = "-help";

/// Build a command with one flag per slot, in registration order.
///
/// `--help`/`-h` prints [`Registry::usage`] unless a slot took the name.
pub fn command(registry: &Registry) -> Command {
    let mut command = Command::new(registry.program().to_string())
        .disable_help_flag(true)
        .disable_version_flag(true)
        .override_help(registry.usage())
        .arg(
            Arg::new(POSITIONAL_ID)
                .value_name("ARGS")
                .num_args(0..)
                .action(ArgAction::Append)
                .value_parser(value_parser!(String)),
        );

    let long_help = !registry.contains("help");
    let short_help = !registry.contains("h");
    if long_help || short_help {
        let mut help = Arg::new(HELP_ID).action(ArgAction::Help);
        if long_help {
            help = help.long("help");
        }
        if short_help {
            help = help.short('h');
        }
        command = command.arg(help);
    }

    for (_, cell) in registry.entries() {
        let slot = cell.borrow();
        command = command.arg(slot_arg(slot.name(), slot.kind(), slot.usage()));
    }
    command
}

fn slot_arg(name: &str, kind: SlotKind, usage: &str) -> Arg {
    let arg = Arg::new(name.to_string())
        .long(name.to_string())
        .help(usage.to_string())
        .value_name(kind.value_name())
        .action(ArgAction::Append)
        .value_parser(value_parser!(String));

    match kind {
        SlotKind::Bool => arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
        _ => arg.num_args(1).allow_hyphen_values(true),
    }
}

/// Assign every flag given on the command line to its slot, in order.
///
/// Stops at the first value that does not parse, or at a slot a handle is
/// still borrowing; flags applied before it keep their values.
pub fn apply(registry: &Registry, matches: &ArgMatches) -> Result<(), ConfigError> {
    for (name, cell) in registry.entries() {
        if matches.value_source(name) != Some(ValueSource::CommandLine) {
            continue;
        }
        let Some(values) = matches.get_many::<String>(name) else {
            continue;
        };
        let mut slot = cell
            .try_borrow_mut()
            .map_err(|_| ConfigError::SlotBusy(name.to_string()))?;
        for raw in values {
            slot.set_str(raw, Source::Flag)
                .map_err(|source| ConfigError::InvalidFlag {
                    name: name.to_string(),
                    value: raw.clone(),
                    source,
                })?;
            tracing::debug!(slot = %name, value = %raw, "applied flag");
        }
    }
    Ok(())
}

/// Arguments left after flag parsing stopped.
pub fn positionals(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>(POSITIONAL_ID)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
