use obs_logger::{LevelFilter, Logger};
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
#[serial]
fn file_logging_creates_log_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder()
        .name("integration-file-logging")
        .console(false)
        .log_dir(&log_dir)
        .level(LevelFilter::INFO)
        .init()?;

    assert!(logger.writes_files());
    tracing::info!("settings loaded");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    assert!(fs::metadata(&log_file)?.len() > 0, "log file should not be empty");
    Ok(())
}
