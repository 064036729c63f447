//! Fuzz target for event array parsing and the analysis pipeline.
//!
//! Whatever parses must also analyze without panicking.

#![no_main]

use bc_common::EventSnapshot;
use bc_config::AnalysisConfig;
use bc_core::input::parse_events;
use bc_core::Analyzer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(events) = parse_events(text) else {
        return;
    };
    if let Ok(analyzer) = Analyzer::new(AnalysisConfig::default()) {
        let report = analyzer.analyze(&EventSnapshot::new(events));
        assert!(report.recommendation.interval_secs.is_finite());
        assert!((0.0..=1.0).contains(&report.recommendation.confidence));
    }
});
