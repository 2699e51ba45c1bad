//! Tests for match configuration files.

use morris_core::{ContextState, ControlMode, MatchConfig, StrategyKind, WorkerMode};
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("match.toml");
    fs::write(&path, content).expect("Failed to write TOML");
    path
}

#[test]
fn test_from_file_reads_all_fields() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        r#"white = "computer"
black = "human"
strategy = "random"
depth = 2
seed = 99
worker = "pooled"
frame_interval_ms = 5
max_frames = 1000
"#,
    );

    let config = MatchConfig::from_file(&path).expect("Config should load");
    assert_eq!(*config.white(), ControlMode::Computer);
    assert_eq!(*config.black(), ControlMode::Human);
    assert_eq!(*config.strategy(), StrategyKind::Random);
    assert_eq!(*config.depth(), 2);
    assert_eq!(*config.seed(), Some(99));
    assert_eq!(*config.worker(), WorkerMode::Pooled);
    assert_eq!(*config.frame_interval_ms(), 5);
    assert_eq!(*config.max_frames(), Some(1000));
}

#[test]
fn test_missing_fields_use_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "black = \"none\"\n");

    let config = MatchConfig::from_file(&path).expect("Config should load");
    assert_eq!(*config.white(), ControlMode::Human);
    assert_eq!(*config.black(), ControlMode::None);
    assert_eq!(*config.strategy(), StrategyKind::Minimax);
    assert_eq!(*config.worker(), WorkerMode::Spawn);
}

#[test]
fn test_unknown_mode_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "white = \"wizard\"\n");

    let err = MatchConfig::from_file(&path).expect_err("Config should fail");
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_missing_file_reports_location() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = MatchConfig::from_file(dir.path().join("absent.toml")).expect_err("No such file");
    assert!(err.message.contains("Failed to read config file"));
    assert!(err.file.ends_with("config.rs"));
    assert!(err.line > 0);
}

#[test]
fn test_built_context_follows_config() {
    let config = MatchConfig::default()
        .with_white(ControlMode::Computer)
        .with_black(ControlMode::Computer)
        .with_strategy(StrategyKind::FirstLegal)
        .with_worker(WorkerMode::Pooled);

    let mut ctx = config.build_context();
    assert_eq!(ctx.worker().mode(), WorkerMode::Pooled);
    ctx.update();
    assert_eq!(ctx.state(), &ContextState::ComputerTurnBegin { side: morris_core::Side::White });
}
