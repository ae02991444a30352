//! gutter core library: complexity badge formatting, merging, and layout.
//!
//! The main entry point is [`pipeline::GutterPipeline`], which turns the
//! findings of an [`host::AnalysisSource`] into merged gutter icons and hands
//! them to an [`host::IconSink`]. The building blocks are usable on their own:
//! [`format::ScoreFormatter`], [`merge::MarkerMerger`] and
//! [`render::IconAssembler`].

pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod merge;
pub mod pipeline;
pub mod render;
pub mod types;
