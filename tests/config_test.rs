use std::path::PathBuf;

use dataproc_rs::config::PipelineConfig;
use dataproc_rs::engine::CoordinatorConfig;
use dataproc_rs::error::Error;

const VARS: [&str; 6] = [
    "PIPELINE_WORKERS",
    "PIPELINE_TASKS",
    "PIPELINE_DELAY_MIN_MS",
    "PIPELINE_DELAY_MAX_MS",
    "PIPELINE_RESULTS_FILE",
    "PIPELINE_LOG_FILE",
];

fn clear_vars() {
    for name in VARS {
        unsafe {
            std::env::remove_var(name);
        }
    }
}

// Environment mutation is process-wide, so every env case lives in one test.
#[test]
fn config_from_env() {
    clear_vars();
    let defaults = PipelineConfig::from_env().unwrap();
    assert_eq!(defaults.workers, 5);
    assert_eq!(defaults.tasks, 20);
    assert_eq!(defaults.delay_min_ms, 50);
    assert_eq!(defaults.delay_max_ms, 150);
    assert_eq!(defaults.results_path, PathBuf::from("results.txt"));
    assert_eq!(defaults.log_path, PathBuf::from("processing.log"));

    unsafe {
        std::env::set_var("PIPELINE_WORKERS", "3");
        std::env::set_var("PIPELINE_TASKS", "7");
        std::env::set_var("PIPELINE_DELAY_MIN_MS", "0");
        std::env::set_var("PIPELINE_DELAY_MAX_MS", "10");
        std::env::set_var("PIPELINE_RESULTS_FILE", "/tmp/out.txt");
    }
    let config = PipelineConfig::from_env().unwrap();
    assert_eq!(config.workers, 3);
    assert_eq!(config.tasks, 7);
    assert_eq!(config.delay_min_ms, 0);
    assert_eq!(config.delay_max_ms, 10);
    assert_eq!(config.results_path, PathBuf::from("/tmp/out.txt"));

    unsafe {
        std::env::set_var("PIPELINE_WORKERS", "many");
    }
    assert!(matches!(PipelineConfig::from_env(), Err(Error::Config(_))));

    unsafe {
        std::env::set_var("PIPELINE_WORKERS", "0");
    }
    assert!(matches!(PipelineConfig::from_env(), Err(Error::Config(_))));

    clear_vars();
}

#[test]
fn config_from_file_fills_missing_keys_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.toml");
    std::fs::write(
        &path,
        "workers = 8\ntasks = 100\nresults_path = \"out/results.txt\"\n",
    )
    .unwrap();

    let config = PipelineConfig::from_file(&path).unwrap();
    assert_eq!(config.workers, 8);
    assert_eq!(config.tasks, 100);
    assert_eq!(config.results_path, PathBuf::from("out/results.txt"));
    assert_eq!(config.delay_min_ms, 50);
    assert_eq!(config.log_level, "info");
}

#[test]
fn config_from_file_rejects_unknown_keys_and_bad_ranges() {
    let dir = tempfile::tempdir().unwrap();

    let unknown = dir.path().join("unknown.toml");
    std::fs::write(&unknown, "wrokers = 3\n").unwrap();
    assert!(matches!(
        PipelineConfig::from_file(&unknown),
        Err(Error::Config(_))
    ));

    let inverted = dir.path().join("inverted.toml");
    std::fs::write(&inverted, "delay_min_ms = 200\ndelay_max_ms = 100\n").unwrap();
    assert!(matches!(
        PipelineConfig::from_file(&inverted),
        Err(Error::Config(_))
    ));

    let missing = dir.path().join("missing.toml");
    assert!(PipelineConfig::from_file(&missing).is_err());
}

#[test]
fn coordinator_config_derives_from_pipeline_config() {
    let config = PipelineConfig {
        workers: 2,
        delay_min_ms: 5,
        delay_max_ms: 9,
        ..PipelineConfig::default()
    };
    let derived = CoordinatorConfig::try_from(&config).unwrap();
    assert_eq!(derived.workers, 2);
    assert_eq!(derived.delay.min().as_millis(), 5);
    assert_eq!(derived.delay.max().as_millis(), 9);
}
