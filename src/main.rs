//! slotconf: demo binary for the slot registry.
//!
//! Registers a handful of service settings, resolves them from flags, the
//! environment and an optional config file (`SLOTCONF_CONFIG`), and prints
//! the result. Entry point and error handling boundary; uses `anyhow` for
//! user-facing messages.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use slotconf::{cli, constants};
use slotconf::output::OutputFormat;
use slotconf::{ConfigError, Env, Registry};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        // clap prints help and usage errors itself, with its own exit code.
        if let Some(ConfigError::Flags(clap_err)) = err.downcast_ref::<ConfigError>() {
            clap_err.exit();
        }
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(constants::ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let env = Env::real();
    let mut registry = Registry::with_env(constants::APP_NAME, env.clone());
    register_demo_slots(&mut registry)?;

    let config = env.lookup(constants::ENV_CONFIG).map(PathBuf::from);
    let args = cli::utf8_args(std::env::args_os())?;
    let rest = registry
        .parse(args, config.as_deref())
        .context("invalid configuration")?;
    if !rest.is_empty() {
        tracing::info!(args = ?rest, "ignoring positional arguments");
    }

    let output = registry
        .get::<String>("output")
        .map(|handle| handle.get())
        .unwrap_or_default();
    let format: OutputFormat = output
        .parse()
        .with_context(|| format!("unknown output format {output:?} (expected values or json)"))?;

    let rendered = format.render(&registry.snapshot());
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn register_demo_slots(registry: &mut Registry) -> Result<()> {
    registry.register("output", OutputFormat::default().to_string(), "output format: values or json")?;
    registry.register("host", "127.0.0.1".to_string(), "address to bind")?;
    registry.register("port", 8080i32, "port to listen on")?;
    registry.register("max_body", 1_048_576i64, "largest accepted request body in bytes")?;
    registry.register("ratio", 0.5f64, "fraction of traffic to sample")?;
    registry.register("verbose", false, "log every request")?;
    registry.register("timeout", Duration::from_secs(30), "request timeout")?;
    registry.register("tags", Vec::<String>::new(), "tags attached to every metric")?;
    registry.register(
        "labels",
        std::collections::HashMap::<String, String>::new(),
        "extra key=value labels",
    )?;
    Ok(())
}
