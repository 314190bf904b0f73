/*
[INPUT]:  Public API exports for the layr0-imc command-line crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod cli;
pub mod config;
pub mod report;
pub mod scenarios;

// Re-export main types for convenience
pub use config::{KeyPlacement, Settings, load_positions};
pub use scenarios::{Scenario, ScenarioOutcome, example_scenarios, run_examples, run_hedge};
