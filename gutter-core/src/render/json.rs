use super::badge::GutterIcon;
use super::traits::IconRenderer;
use crate::error::{GutterError, RenderError};

/// Pretty JSON dump of an icon's layout, for hosts that draw badges themselves.
#[derive(Debug)]
pub struct JsonRenderer;

impl IconRenderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, icon: &GutterIcon) -> crate::error::Result<String> {
        serde_json::to_string_pretty(icon)
            .map_err(|e| GutterError::Render(RenderError::Serialization(e)))
    }
}
