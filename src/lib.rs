//! Mobility Insight - view-model core for mobility and nutrition analysis results
//!
//! Insight turns the loosely typed analysis payload produced for one monitored
//! subject into chart-ready view models through a deterministic pipeline:
//! record normalization → classification → series building / cumulative
//! aggregation / status reduction / span calculation → view assembly.
//!
//! ## Modules
//!
//! - **Schema**: the analysis payload boundary and one record shape per stream
//! - **Pipeline**: assembles every metric view and holds the session's current view

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod encoder;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod schema;
pub mod series;
pub mod span;
pub mod status;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::ViewConfig;
pub use error::ViewError;
pub use pipeline::{analysis_to_view, build_dashboard, AnalysisSnapshot, InsightSession};

// Schema exports
pub use schema::{RawPayload, Stream};

/// Insight version embedded in every view envelope
pub const INSIGHT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for view envelopes
pub const PRODUCER_NAME: &str = "mobility-insight";
