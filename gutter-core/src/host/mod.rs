//! Host-side boundary: where findings come from and where icons go.
//!
//! The editor integration implements [`AnalysisSource`] and [`IconSink`];
//! [`memory`] has in-process versions used by the CLI and tests.

pub mod memory;
pub mod traits;

pub use memory::{CollectingSink, MemorySource};
pub use traits::{AnalysisSource, IconSink, RenderedIcon};
