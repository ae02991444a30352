// Icon assembler: badge metrics and left-to-right composition.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::error::MergeError;
use crate::format::{Color, FormattedScore};

/// Drawing parameters shared by every badge in a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BadgeStyle {
    pub padding: u32,
    pub corner_radius: u32,
    pub font_size: u32,
    pub spacer_width: u32,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            padding: 2,
            corner_radius: 3,
            font_size: 12,
            spacer_width: 3,
        }
    }
}

impl BadgeStyle {
    /// Horizontal advance per display column: 3/5 of the font size, rounded up.
    pub fn glyph_advance(&self) -> u32 {
        self.font_size.saturating_mul(3).div_ceil(5)
    }
}

/// One rendered score badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Badge {
    pub label: String,
    pub foreground: Color,
    pub background: Color,
    pub padding: u32,
    pub corner_radius: u32,
    pub font_size: u32,
    pub width: u32,
    pub height: u32,
}

/// A slot in a composite: a placed badge or an empty spacer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Glyph {
    Badge { x: u32, badge: Badge },
    Spacer { x: u32, width: u32 },
}

impl Glyph {
    pub fn x(&self) -> u32 {
        match self {
            Self::Badge { x, .. } | Self::Spacer { x, .. } => *x,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Self::Badge { badge, .. } => badge.width,
            Self::Spacer { width, .. } => *width,
        }
    }
}

/// Badges laid out horizontally with spacers between neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CompositeBadge {
    pub glyphs: Vec<Glyph>,
    pub width: u32,
    pub height: u32,
}

impl CompositeBadge {
    pub fn badges(&self) -> impl Iterator<Item = &Badge> {
        self.glyphs.iter().filter_map(|g| match g {
            Glyph::Badge { badge, .. } => Some(badge),
            Glyph::Spacer { .. } => None,
        })
    }

    pub fn spacer_count(&self) -> usize {
        self.glyphs
            .iter()
            .filter(|g| matches!(g, Glyph::Spacer { .. }))
            .count()
    }
}

/// What a merge group renders to: a lone badge or a composite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum GutterIcon {
    Single(Badge),
    Composite(CompositeBadge),
}

impl GutterIcon {
    pub fn width(&self) -> u32 {
        match self {
            Self::Single(b) => b.width,
            Self::Composite(c) => c.width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Single(b) => b.height,
            Self::Composite(c) => c.height,
        }
    }

    pub fn badges(&self) -> Vec<&Badge> {
        match self {
            Self::Single(b) => vec![b],
            Self::Composite(c) => c.badges().collect(),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.badges().into_iter().map(|b| b.label.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IconAssembler {
    style: BadgeStyle,
}

impl IconAssembler {
    pub fn new(style: BadgeStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> BadgeStyle {
        self.style
    }

    pub fn draw(&self, label: &str, foreground: Color, background: Color) -> Badge {
        let columns = u32::try_from(label.width()).unwrap_or(u32::MAX);
        let text_width = columns.saturating_mul(self.style.glyph_advance());
        let inset = self.style.padding.saturating_mul(2);
        Badge {
            label: label.to_string(),
            foreground,
            background,
            padding: self.style.padding,
            corner_radius: self.style.corner_radius,
            font_size: self.style.font_size,
            width: text_width.saturating_add(inset),
            height: self.style.font_size.saturating_add(inset),
        }
    }

    pub fn draw_formatted(&self, formatted: &FormattedScore) -> Badge {
        self.draw(&formatted.label, formatted.foreground, formatted.background)
    }

    /// Lay badges out left-to-right in the given order, one spacer between
    /// consecutive badges and none at either end.
    pub fn compose(&self, badges: Vec<Badge>) -> Result<CompositeBadge, MergeError> {
        if badges.is_empty() {
            return Err(MergeError::EmptyGroup);
        }

        let mut glyphs = Vec::with_capacity(badges.len() * 2 - 1);
        let mut x = 0u32;
        let mut height = 0u32;
        for (i, badge) in badges.into_iter().enumerate() {
            if i > 0 {
                glyphs.push(Glyph::Spacer {
                    x,
                    width: self.style.spacer_width,
                });
                x = x.saturating_add(self.style.spacer_width);
            }
            height = height.max(badge.height);
            let width = badge.width;
            glyphs.push(Glyph::Badge { x, badge });
            x = x.saturating_add(width);
        }

        Ok(CompositeBadge {
            glyphs,
            width: x,
            height,
        })
    }
}
