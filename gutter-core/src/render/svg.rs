// SVG renderer: one rounded rect plus centered text per badge.
//
// Spacers are left as empty space; badges shorter than the icon are
// vertically centered.

use std::fmt::Write as _;

use html_escape::encode_text;

use super::badge::{Badge, Glyph, GutterIcon};
use super::traits::IconRenderer;

#[derive(Debug)]
pub struct SvgRenderer;

impl IconRenderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, icon: &GutterIcon) -> crate::error::Result<String> {
        Ok(render_svg(icon))
    }
}

pub fn render_svg(icon: &GutterIcon) -> String {
    let width = icon.width();
    let height = icon.height();
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    );

    match icon {
        GutterIcon::Single(badge) => write_badge(&mut out, 0, height, badge),
        GutterIcon::Composite(composite) => {
            for glyph in &composite.glyphs {
                if let Glyph::Badge { x, badge } = glyph {
                    write_badge(&mut out, *x, height, badge);
                }
            }
        }
    }

    out.push_str("</svg>\n");
    out
}

fn write_badge(out: &mut String, x: u32, icon_height: u32, badge: &Badge) {
    let y = icon_height.saturating_sub(badge.height) / 2;
    let _ = writeln!(
        out,
        "  <rect x=\"{x}\" y=\"{y}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{}\"/>",
        badge.width,
        badge.height,
        badge.corner_radius,
        badge.background.hex(),
    );
    let _ = writeln!(
        out,
        "  <text x=\"{}\" y=\"{}\" fill=\"{}\" font-family=\"monospace\" font-size=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>",
        x + badge.width / 2,
        y + badge.height / 2,
        badge.foreground.hex(),
        badge.font_size,
        encode_text(&badge.label),
    );
}
