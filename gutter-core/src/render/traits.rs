use crate::error::{GutterError, RenderError};

use super::badge::GutterIcon;
use super::json::JsonRenderer;
use super::svg::SvgRenderer;
use super::text::TextRenderer;

/// Common interface for turning a gutter icon into an output artifact.
pub trait IconRenderer: Send + Sync {
    /// Name used to select this renderer (`--format`).
    fn name(&self) -> &'static str;

    /// File extension for written artifacts.
    fn extension(&self) -> &'static str;

    /// Produce the artifact content for one icon.
    fn render(&self, icon: &GutterIcon) -> crate::error::Result<String>;
}

/// Names accepted by [`renderer_by_name`].
pub const ALL_RENDERER_NAMES: &[&str] = &["text", "svg", "json"];

pub fn renderer_by_name(name: &str) -> crate::error::Result<Box<dyn IconRenderer>> {
    match name {
        "text" => Ok(Box::new(TextRenderer)),
        "svg" => Ok(Box::new(SvgRenderer)),
        "json" => Ok(Box::new(JsonRenderer)),
        other => Err(GutterError::Render(RenderError::UnknownRenderer(
            other.to_string(),
        ))),
    }
}
