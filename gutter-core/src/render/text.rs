// Plain-text renderer: `[label]` per badge, one space per spacer.

use super::badge::{Glyph, GutterIcon};
use super::traits::IconRenderer;

#[derive(Debug)]
pub struct TextRenderer;

impl IconRenderer for TextRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, icon: &GutterIcon) -> crate::error::Result<String> {
        Ok(render_text(icon))
    }
}

pub fn render_text(icon: &GutterIcon) -> String {
    match icon {
        GutterIcon::Single(badge) => format!("[{}]", badge.label),
        GutterIcon::Composite(composite) => composite
            .glyphs
            .iter()
            .map(|glyph| match glyph {
                Glyph::Badge { badge, .. } => format!("[{}]", badge.label),
                Glyph::Spacer { .. } => " ".to_string(),
            })
            .collect(),
    }
}
