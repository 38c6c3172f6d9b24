//! Command-line binding for registry slots.
//!
//! Every slot is exposed as a long flag named after it. Arguments are
//! accepted with one or two leading dashes (`-port 80`, `--port=80`);
//! boolean flags take a value only in the `-flag=value` form. Parsing
//! stops at the first non-flag argument or at `--`, and everything after
//! that is returned untouched.

pub mod args;

use std::ffi::OsString;

use crate::error::ConfigError;
use crate::models::SlotKind;
use crate::registry::Registry;

/// Parse `argv` (program name first) into the registry's slots.
pub(crate) fn parse<I, S>(registry: &Registry, argv: I) -> Result<Vec<String>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
    let normalized = normalize(registry, &argv);
    let matches = args::command(registry).try_get_matches_from(normalized)?;
    args::apply(registry, &matches)?;
    Ok(args::positionals(&matches))
}

/// Convert OS arguments (such as `std::env::args_os()`) to strings,
/// rejecting the first one that is not valid UTF-8.
pub fn utf8_args<I>(args: I) -> Result<Vec<String>, ConfigError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|raw| ConfigError::NonUtf8Argument(raw.to_string_lossy().into_owned()))
        })
        .collect()
}

/// Rewrite single-dash slot flags to the double-dash form clap expects and
/// fence off positionals with `--`.
///
/// Unknown flags are passed on for clap to reject.
pub fn normalize(registry: &Registry, argv: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(argv.len() + 1);
    let mut rest = argv.iter();
    if let Some(program) = rest.next() {
        out.push(program.clone());
    }

    let mut expects_value = false;
    while let Some(arg) = rest.next() {
        if expects_value {
            out.push(arg.clone());
            expects_value = false;
            continue;
        }
        if arg == "--" {
            out.push(arg.clone());
            out.extend(rest.by_ref().cloned());
            break;
        }

        let Some(body) = flag_body(arg) else {
            out.push("--".to_string());
            out.push(arg.clone());
            out.extend(rest.by_ref().cloned());
            break;
        };
        let (name, inline) = match body.split_once('=') {
            Some((name, _)) => (name, true),
            None => (body, false),
        };
        match registry.kind(name) {
            Some(kind) => {
                expects_value = kind != SlotKind::Bool && !inline;
                out.push(format!("--{body}"));
            }
            // `-h` stays a short flag; anything else unknown is spelled
            // long so clap's error names it in full.
            None if body == "h" => out.push(arg.clone()),
            None => out.push(format!("--{body}")),
        }
    }
    out
}

/// The flag text after its dashes, or `None` for a positional argument.
fn flag_body(arg: &str) -> Option<&str> {
    let body = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'))?;
    (!body.is_empty()).then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;
    use pretty_assertions::assert_eq;

    fn registry() -> Registry {
        let mut reg = Registry::with_env("prog", Env::mock(std::iter::empty::<(&str, &str)>()));
        reg.register("port", 8080i32, "listen port").unwrap();
        reg.register("verbose", false, "chatty").unwrap();
        reg.register("name", String::new(), "name").unwrap();
        reg
    }

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_dash_becomes_double() {
        let out = normalize(&registry(), &argv(&["prog", "-port", "80", "-verbose"]));
        assert_eq!(out, argv(&["prog", "--port", "80", "--verbose"]));
    }

    #[test]
    fn inline_values_are_kept() {
        let out = normalize(&registry(), &argv(&["prog", "-port=80", "--verbose=false"]));
        assert_eq!(out, argv(&["prog", "--port=80", "--verbose=false"]));
    }

    #[test]
    fn value_after_flag_is_not_rewritten() {
        let out = normalize(&registry(), &argv(&["prog", "-name", "-port"]));
        assert_eq!(out, argv(&["prog", "--name", "-port"]));
    }

    #[test]
    fn first_positional_stops_flag_parsing() {
        let out = normalize(&registry(), &argv(&["prog", "-verbose", "file", "-port", "1"]));
        assert_eq!(out, argv(&["prog", "--verbose", "--", "file", "-port", "1"]));
    }

    #[test]
    fn bool_flag_does_not_consume_next_argument() {
        let out = normalize(&registry(), &argv(&["prog", "-verbose", "true"]));
        assert_eq!(out, argv(&["prog", "--verbose", "--", "true"]));
    }

    #[test]
    fn explicit_terminator_passes_through() {
        let out = normalize(&registry(), &argv(&["prog", "--", "-port"]));
        assert_eq!(out, argv(&["prog", "--", "-port"]));
    }

    #[test]
    fn unknown_flags_are_left_for_clap() {
        let out = normalize(&registry(), &argv(&["prog", "-bogus", "-h"]));
        assert_eq!(out, argv(&["prog", "--bogus", "-h"]));
    }

    #[test]
    fn utf8_args_pass_through() {
        let args = utf8_args([OsString::from("prog"), OsString::from("-port=80")]).unwrap();
        assert_eq!(args, argv(&["prog", "-port=80"]));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_argument_is_an_error() {
        use std::os::unix::ffi::OsStringExt;

        let bad = OsString::from_vec(vec![b'-', b'n', b'a', b'm', b'e', b'=', 0xff]);
        let err = utf8_args([OsString::from("prog"), bad]).unwrap_err();
        assert!(matches!(err, ConfigError::NonUtf8Argument(ref raw) if raw.starts_with("-name=")));
    }

    #[test]
    fn lone_dash_is_positional() {
        let out = normalize(&registry(), &argv(&["prog", "-"]));
        assert_eq!(out, argv(&["prog", "--", "-"]));
    }
}
