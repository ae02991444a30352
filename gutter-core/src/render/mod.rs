pub mod badge;
pub mod json;
pub mod svg;
pub mod text;
pub mod traits;

pub use badge::{Badge, BadgeStyle, CompositeBadge, Glyph, GutterIcon, IconAssembler};
pub use traits::{IconRenderer, renderer_by_name};
