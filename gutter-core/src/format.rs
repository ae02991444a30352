// Score formatting: compact labels and the severity color ramp.
//
// The band table below is fixed; badges are recolored only by switching the
// theme, never by recomputing thresholds.

use serde::{Deserialize, Serialize};

use crate::error::MarkerError;
use crate::types::Marker;

// ── Colors ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form used by the SVG renderer and the CLI.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Editor color scheme the badges are drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// A color with separate values for light and dark schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThemedColor {
    pub light: Color,
    pub dark: Color,
}

impl ThemedColor {
    pub const fn new(light: Color, dark: Color) -> Self {
        Self { light, dark }
    }

    pub fn resolve(&self, theme: Theme) -> Color {
        match theme {
            Theme::Light => self.light,
            Theme::Dark => self.dark,
        }
    }
}

// ── Severity bands ───────────────────────────────────────────────────

/// Background severity band. Variant order is the severity rank.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    BrightGreen,
    Green,
    Yellow,
    Orange,
    Red,
    DarkRed,
    Purple,
}

/// Exclusive upper bound of each band below `Purple`.
///
/// | band        | scores          |
/// |-------------|-----------------|
/// | BrightGreen | `< 20`          |
/// | Green       | `20 ..< 30`     |
/// | Yellow      | `30 ..< 40`     |
/// | Orange      | `40 ..< 100`    |
/// | Red         | `100 ..< 1000`  |
/// | DarkRed     | `1000 ..< 10000`|
/// | Purple      | `>= 10000`      |
pub const SEVERITY_BANDS: [(u64, Severity); 6] = [
    (20, Severity::BrightGreen),
    (30, Severity::Green),
    (40, Severity::Yellow),
    (100, Severity::Orange),
    (1_000, Severity::Red),
    (10_000, Severity::DarkRed),
];

impl Severity {
    pub const ALL: [Severity; 7] = [
        Severity::BrightGreen,
        Severity::Green,
        Severity::Yellow,
        Severity::Orange,
        Severity::Red,
        Severity::DarkRed,
        Severity::Purple,
    ];

    pub fn for_score(score: u64) -> Self {
        SEVERITY_BANDS
            .iter()
            .find(|(upper, _)| score < *upper)
            .map_or(Self::Purple, |(_, severity)| *severity)
    }

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BrightGreen => "bright_green",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::DarkRed => "dark_red",
            Self::Purple => "purple",
        }
    }

    /// Inclusive lower score of this band.
    pub fn lower_bound(self) -> u64 {
        match self.rank() {
            0 => 0,
            r => SEVERITY_BANDS[usize::from(r) - 1].0,
        }
    }

    /// Exclusive upper score of this band, `None` for the open-ended top band.
    pub fn upper_bound(self) -> Option<u64> {
        SEVERITY_BANDS.get(usize::from(self.rank())).map(|(upper, _)| *upper)
    }

    pub fn background(self) -> ThemedColor {
        match self {
            Self::BrightGreen => {
                ThemedColor::new(Color::rgb(0, 255, 0), Color::rgb(140, 214, 121))
            }
            Self::Green => ThemedColor::new(Color::rgb(0, 255, 0), Color::rgb(98, 150, 85)),
            Self::Yellow => ThemedColor::new(Color::rgb(255, 255, 0), Color::rgb(138, 138, 0)),
            Self::Orange => ThemedColor::new(Color::rgb(255, 200, 0), Color::rgb(159, 107, 0)),
            Self::Red => ThemedColor::new(Color::rgb(255, 0, 0), Color::rgb(255, 100, 100)),
            Self::DarkRed => ThemedColor::new(Color::rgb(178, 0, 0), Color::rgb(178, 70, 70)),
            Self::Purple => ThemedColor::new(Color::rgb(128, 0, 128), Color::rgb(220, 50, 220)),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Labels ───────────────────────────────────────────────────────────

/// Compact label keeping badge width roughly constant as scores grow.
#[allow(clippy::cast_precision_loss)]
pub fn score_label(score: u64) -> String {
    if score < 1_000 {
        score.to_string()
    } else if score < 1_000_000 {
        format!("{}k", score / 1_000)
    } else if score < 1_000_000_000 {
        format!("{}m", score / 1_000_000)
    } else {
        // Order of magnitude only; precision above a billion is dropped.
        format!("10^{:.0}", (score as f64).log10())
    }
}

/// Text color; black only on the yellow band where white lacks contrast.
pub fn foreground(score: u64) -> Color {
    if (30..40).contains(&score) {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

pub fn background(score: u64, theme: Theme) -> Color {
    Severity::for_score(score).background().resolve(theme)
}

/// Lower-cased first character of a kind tag.
pub fn kind_prefix(kind: &str) -> String {
    kind.chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

// ── Formatter ────────────────────────────────────────────────────────

/// Label and colors for one score.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FormattedScore {
    pub label: String,
    pub foreground: Color,
    pub background: Color,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreFormatter {
    theme: Theme,
}

impl ScoreFormatter {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Format a raw score, prefixing the label with the kind's initial when present.
    pub fn format(&self, score: i64, kind: Option<&str>) -> Result<FormattedScore, MarkerError> {
        let score = u64::try_from(score).map_err(|_| MarkerError::NegativeScore(score))?;
        if kind.is_some_and(str::is_empty) {
            return Err(MarkerError::EmptyKind);
        }
        Ok(self.format_validated(score, kind))
    }

    pub fn format_marker(&self, marker: &Marker) -> FormattedScore {
        self.format_validated(marker.score(), marker.kind())
    }

    pub(crate) fn format_validated(&self, score: u64, kind: Option<&str>) -> FormattedScore {
        let digits = score_label(score);
        let label = match kind {
            Some(kind) => format!("{}{digits}", kind_prefix(kind)),
            None => digits,
        };
        let severity = Severity::for_score(score);
        FormattedScore {
            label,
            foreground: foreground(score),
            background: severity.background().resolve(self.theme),
            severity,
        }
    }
}
