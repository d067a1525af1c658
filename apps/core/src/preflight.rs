//! Preflight Check System
//!
//! Inspects the data tree and the presence of the response table before the
//! models are loaded and logs a pass/fail line per check. The report is informational:
//! the loaders themselves decide what is fatal.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::fs_manager::DataLayout;

// --- Constants ---
const MIN_EMBEDDINGS_SIZE_BYTES: u64 = 20 * 1024 * 1024; // 20 MB minimum for ONNX

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    /// True when first run work (model download, pattern bootstrap) is pending.
    pub needs_bootstrap: bool,
    pub summary: String,
}

/// Performs all preflight checks and returns a report
pub fn run_preflight_checks(config: &ServiceConfig, layout: &DataLayout) -> PreflightReport {
    info!("Running preflight checks");

    let checks = vec![
        check_directories(layout),
        check_response_table(&config.responses_path),
        check_entity_patterns(layout),
        check_embeddings(layout),
    ];

    let all_passed = checks.iter().all(|c| c.passed);
    let needs_bootstrap = checks
        .iter()
        .any(|c| !c.passed && matches!(c.name.as_str(), "entity_patterns" | "embeddings"));

    let summary = if all_passed {
        "All checks passed. System ready.".to_string()
    } else if needs_bootstrap {
        "Model artifacts missing. They will be fetched during startup.".to_string()
    } else {
        "Some checks failed. Startup will likely abort.".to_string()
    };

    for check in &checks {
        if check.passed {
            info!("  ok   {}: {}", check.name, check.message);
        } else {
            warn!("  FAIL {}: {}", check.name, check.message);
            if let Some(details) = &check.details {
                warn!("       Details: {}", details);
            }
        }
    }

    PreflightReport {
        all_passed,
        checks,
        needs_bootstrap,
        summary,
    }
}

// --- Individual Checks ---

fn check_directories(layout: &DataLayout) -> CheckResult {
    match layout.init() {
        Ok(()) => CheckResult::pass(
            "directories",
            &format!("Data tree ready at {:?}", layout.root()),
        ),
        Err(e) => CheckResult::fail(
            "directories",
            "Failed to create directories",
            Some(e.to_string()),
        ),
    }
}

/// Presence only. The table is parsed and validated once, by its loader.
fn check_response_table(path: &Path) -> CheckResult {
    if path.is_file() {
        CheckResult::pass("response_table", &format!("Found at {:?}", path))
    } else {
        CheckResult::fail(
            "response_table",
            "Response table not found",
            Some(format!("Expected at: {:?}", path)),
        )
    }
}

fn check_entity_patterns(layout: &DataLayout) -> CheckResult {
    let path = layout.entity_patterns_path();
    if path.is_file() {
        CheckResult::pass("entity_patterns", &format!("Found at {:?}", path))
    } else {
        CheckResult::fail(
            "entity_patterns",
            "Entity patterns not found, defaults will be written",
            Some(format!("Expected at: {:?}", path)),
        )
    }
}

fn check_embeddings(layout: &DataLayout) -> CheckResult {
    let embeddings_dir = layout.embeddings_dir();

    if !embeddings_dir.exists() {
        return CheckResult::fail(
            "embeddings",
            "Embeddings directory not found",
            Some(format!("Expected at: {:?}", embeddings_dir)),
        );
    }

    let (total_size, onnx_found) = scan_dir(&embeddings_dir);

    if total_size >= MIN_EMBEDDINGS_SIZE_BYTES && onnx_found {
        CheckResult::pass(
            "embeddings",
            &format!("Embeddings OK ({:.2} MB)", total_size as f64 / 1024.0 / 1024.0),
        )
    } else if total_size > 0 {
        CheckResult::fail(
            "embeddings",
            "Embeddings incomplete",
            Some(format!("Size: {} bytes, ONNX found: {}", total_size, onnx_found)),
        )
    } else {
        CheckResult::fail("embeddings", "Embeddings directory empty", None)
    }
}

/// Total size of regular files under `dir` and whether any is an `.onnx` model.
fn scan_dir(dir: &Path) -> (u64, bool) {
    let mut total_size = 0;
    let mut onnx_found = false;

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                let (size, onnx) = scan_dir(&path);
                total_size += size;
                onnx_found |= onnx;
            } else if let Ok(meta) = std::fs::metadata(&path) {
                total_size += meta.len();
                if path.extension().map(|e| e == "onnx").unwrap_or(false) {
                    onnx_found = true;
                }
            }
        }
    }

    (total_size, onnx_found)
}
