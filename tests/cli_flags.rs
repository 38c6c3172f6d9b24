//! Integration tests for command-line flag parsing.

use std::collections::HashMap;
use std::time::Duration;

use clap::error::ErrorKind;
use pretty_assertions::assert_eq;
use slotconf::{ConfigError, Env, Registry, Source};

fn registry() -> Registry {
    let mut reg = Registry::with_env("svc", Env::mock(std::iter::empty::<(&str, &str)>()));
    reg.register("port", 8080i32, "port to listen on").unwrap();
    reg.register("offset", 0i64, "offset").unwrap();
    reg.register("name", String::new(), "service name").unwrap();
    reg.register("verbose", false, "log every request").unwrap();
    reg.register("timeout", Duration::from_secs(30), "request timeout").unwrap();
    reg.register("tags", Vec::<String>::new(), "metric tags").unwrap();
    reg.register("labels", HashMap::<String, String>::new(), "extra labels").unwrap();
    reg
}

#[test]
fn single_and_double_dash_forms() {
    let mut reg = registry();
    reg.parse_args(["svc", "-port=9090", "--name", "api", "-timeout", "1m30s"])
        .unwrap();

    assert_eq!(reg.get::<i32>("port").unwrap().get(), 9090);
    assert_eq!(reg.get::<String>("name").unwrap().get(), "api");
    assert_eq!(reg.get::<Duration>("timeout").unwrap().get(), Duration::from_secs(90));
    assert_eq!(reg.get::<i32>("port").unwrap().source(), Source::Flag);
}

#[test]
fn negative_numbers_and_dash_values() {
    let mut reg = registry();
    reg.parse_args(["svc", "-offset", "-5", "-name", "-dash"]).unwrap();
    assert_eq!(reg.get::<i64>("offset").unwrap().get(), -5);
    assert_eq!(reg.get::<String>("name").unwrap().get(), "-dash");
}

#[test]
fn bool_flags() {
    let mut reg = registry();
    reg.parse_args(["svc", "-verbose"]).unwrap();
    assert!(reg.get::<bool>("verbose").unwrap().get());

    reg.parse_args(["svc", "-verbose=false"]).unwrap();
    assert!(!reg.get::<bool>("verbose").unwrap().get());
}

#[test]
fn last_scalar_wins() {
    let mut reg = registry();
    reg.parse_args(["svc", "-port", "1", "-port", "2"]).unwrap();
    assert_eq!(reg.get::<i32>("port").unwrap().get(), 2);
}

#[test]
fn repeated_composites_accumulate() {
    let mut reg = registry();
    reg.parse_args([
        "svc", "-tags", "a,b", "-tags=c", "-labels", "k1=v1", "-labels", "k2=v2,k1=x",
    ])
    .unwrap();

    assert_eq!(reg.get::<Vec<String>>("tags").unwrap().get(), vec!["a", "b", "c"]);
    let labels = reg.get::<HashMap<String, String>>("labels").unwrap().get();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels["k1"], "x");
}

#[test]
fn positionals_after_first_non_flag() {
    let mut reg = registry();
    let rest = reg
        .parse_args(["svc", "-port", "1", "serve", "-port", "2"])
        .unwrap();
    assert_eq!(rest, vec!["serve", "-port", "2"]);
    assert_eq!(reg.get::<i32>("port").unwrap().get(), 1);
}

#[test]
fn double_dash_ends_flags() {
    let mut reg = registry();
    let rest = reg.parse_args(["svc", "-verbose", "--", "-port", "2"]).unwrap();
    assert_eq!(rest, vec!["-port", "2"]);
    assert_eq!(reg.get::<i32>("port").unwrap().get(), 8080);
}

#[test]
fn invalid_value_is_an_error() {
    let mut reg = registry();
    let err = reg.parse_args(["svc", "-port", "eighty"]).unwrap_err();
    match err {
        ConfigError::InvalidFlag { name, value, .. } => {
            assert_eq!(name, "port");
            assert_eq!(value, "eighty");
        }
        other => panic!("expected InvalidFlag, got {other:?}"),
    }
}

#[test]
fn malformed_map_item_leaves_map_unchanged() {
    let mut reg = registry();
    assert!(reg.parse_args(["svc", "-labels", "k1=v1,bad"]).is_err());
    assert!(reg.get::<HashMap<String, String>>("labels").unwrap().get().is_empty());
}

#[test]
fn unknown_flag_is_a_clap_error() {
    let mut reg = registry();
    let err = reg.parse_args(["svc", "-bogus=1"]).unwrap_err();
    let ConfigError::Flags(clap_err) = err else {
        panic!("expected clap error");
    };
    assert_eq!(clap_err.kind(), ErrorKind::UnknownArgument);
}

#[test]
fn help_shows_registry_usage() {
    let mut reg = registry();
    for flag in ["-h", "-help", "--help"] {
        let err = reg.parse_args(["svc", flag]).unwrap_err();
        let ConfigError::Flags(clap_err) = err else {
            panic!("expected clap error for {flag}");
        };
        assert_eq!(clap_err.kind(), ErrorKind::DisplayHelp);
        let text = clap_err.to_string();
        assert!(text.contains("Usage of svc:"), "{text}");
        assert!(text.contains("-timeout"));
    }
}

#[test]
fn usage_lists_each_slot_once() {
    let reg = registry();
    let usage = reg.usage();
    for name in reg.names() {
        assert_eq!(usage.matches(&format!("-{name} ")).count(), 1, "{name}\n{usage}");
    }
}
