/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public layr0-imc adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod analysis;
pub mod http;
pub mod templates;
pub mod types;

// Re-export commonly used types from http
pub use http::{
    ApiKeyPlacement,
    ClientConfig,
    HttpTransport,
    Layr0Client,
    Layr0Error,
    MockTransport,
    Result,
    StrategyClient,
    Transport,
    ValidationError,
};

// Re-export all types
pub use types::*;

pub use analysis::{MarginComparison, format_margin, savings_pct};
pub use templates::{OptionKind, StrategyTemplate, Underlying};
