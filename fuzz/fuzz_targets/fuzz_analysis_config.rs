//! Fuzz target for analysis.json parsing and validation.

#![no_main]

use bc_config::{validate_config, AnalysisConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parse errors and validation errors are fine; panics are not.
    if let Ok(config) = serde_json::from_slice::<AnalysisConfig>(data) {
        let _ = validate_config(&config);
    }
});
