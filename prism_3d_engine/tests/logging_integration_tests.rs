//! Integration tests for engine logging
//!
//! These tests install a capturing logger and check what the engine reports.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use std::sync::{Arc, Mutex};
use serial_test::serial;
use prism_3d_engine::prism3d::{Engine, EngineConfig, Error};
use prism_3d_engine::prism3d::log::{self, Logger, LogEntry, LogSeverity};
use prism_3d_engine::prism3d::resource::Mesh;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures engine entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source.starts_with("prism3d::") {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_initialize_is_logged() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut engine = Engine::new(EngineConfig::default(), None);
    engine.initialize().unwrap();

    {
        let captured = entries.lock().unwrap();
        assert!(captured.iter().any(|e| e.severity == LogSeverity::Warn
            && e.source == "prism3d::Engine"
            && e.message.contains("No graphics device")));
        assert!(captured.iter().any(|e| e.severity == LogSeverity::Info
            && e.source == "prism3d::Engine"
            && e.message.starts_with("Engine initialized")));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_errors_carry_location() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);

    let mut engine = Engine::new(EngineConfig::default(), None);
    let result = engine.load_mesh(&Mesh::cube());
    assert!(matches!(result, Err(Error::MissingDependency(_))));

    {
        let captured = entries.lock().unwrap();
        let error = captured.iter()
            .find(|e| e.severity == LogSeverity::Error)
            .expect("error entry");
        assert_eq!(error.source, "prism3d::Engine");
        assert!(error.message.contains("load mesh"));
        assert!(error.file.is_some_and(|f| f.ends_with("engine.rs")));
        assert!(error.line.is_some());
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_reset_logger_stops_capture() {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);
    log::reset_logger();

    let mut engine = Engine::new(EngineConfig::default(), None);
    engine.initialize().unwrap();
    engine.shutdown();

    assert!(entries.lock().unwrap().is_empty());
}
