// tests/cli_run.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;
use taskflow::cli::{CliArgs, LogLevel};

#[test]
fn parses_all_flags() {
    let args = CliArgs::try_parse_from([
        "taskflow",
        "--config",
        "custom.toml",
        "--run-capacity",
        "3",
        "--log-level",
        "debug",
        "--dry-run",
    ])
    .unwrap();

    assert_eq!(args.config.as_deref(), Some("custom.toml"));
    assert_eq!(args.run_capacity, Some(3));
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    assert!(args.dry_run);
}

#[test]
fn defaults_when_no_flags() {
    let args = CliArgs::try_parse_from(["taskflow"]).unwrap();

    assert!(args.config.is_none());
    assert!(args.run_capacity.is_none());
    assert!(args.log_level.is_none());
    assert!(!args.dry_run);
}

#[test]
fn negative_run_capacity_is_rejected_by_the_parser() {
    assert!(CliArgs::try_parse_from(["taskflow", "--run-capacity", "-1"]).is_err());
    assert!(CliArgs::try_parse_from(["taskflow", "--log-level", "loud"]).is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dry_run_does_not_execute() {
    init_tracing();

    let args = CliArgs::try_parse_from(["taskflow", "--dry-run"]).unwrap();
    with_timeout(taskflow::run(args)).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn demo_graph_runs_to_completion_with_config() {
    init_tracing();

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[queue]\nrun_capacity = 2\npoll_interval_ms = 5\n").unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let args = CliArgs::try_parse_from(["taskflow", "--config", &path]).unwrap();
    with_timeout(taskflow::run(args)).await.unwrap();
}

#[tokio::test]
async fn invalid_config_fails_the_run() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[queue]\npoll_interval_ms = 0\n").unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let args = CliArgs::try_parse_from(["taskflow", "--config", &path]).unwrap();
    let err = taskflow::run(args).await.unwrap_err();

    assert!(err.to_string().contains("poll_interval_ms"), "{err:#}");
}
