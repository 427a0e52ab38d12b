use std::{fs, thread::sleep, time::Duration};

use serial_test::serial;
use tempfile::tempdir;

// The global subscriber can only be installed once per test binary, so the
// file case and the repeated-init case share one test.
#[test]
#[serial]
fn writes_log_file_and_ignores_reinit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("loader.log");

    loader_ui::logging::init(true, Some(path.clone()));
    tracing::info!("loader test line");

    let other = dir.path().join("second.log");
    loader_ui::logging::init(false, Some(other.clone()));
    loader_ui::logging::init(false, None);
    tracing::info!("after reinit");

    sleep(Duration::from_millis(100));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("loader test line"));
    assert!(contents.contains("after reinit"));
    assert!(!other.exists(), "second init should not open a new file");
}
