use serde::{Deserialize, Serialize};

use crate::error::MarkerError;

// ── Typed ID wrappers ──────────────────────────────────────────────

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

// Opaque identity of the code element a marker is anchored to. The host maps
// its own handles onto these; nothing here looks inside them.
typed_id!(ElementId);

// ── Span type ──────────────────────────────────────────────────────

/// Anchor span of a marker: byte offsets plus the gutter line of `start`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
    /// Zero-based editor line holding `start`.
    #[serde(default)]
    pub line: u32,
}

impl TextRange {
    pub fn new(start: usize, end: usize, line: u32) -> Result<Self, MarkerError> {
        if start > end {
            return Err(MarkerError::InvalidRange { start, end });
        }
        Ok(Self { start, end, line })
    }

    /// Zero for an inverted range built without [`TextRange::new`].
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Findings and markers ───────────────────────────────────────────

/// Raw analyzer output for one code element, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub score: i64,
    pub element: ElementId,
    /// Complexity kind, e.g. `"Cyclomatic"` or `"NPath"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub range: TextRange,
}

impl Finding {
    pub fn new(score: i64, element: impl Into<ElementId>) -> Self {
        Self {
            score,
            element: element.into(),
            kind: None,
            range: TextRange::default(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn on_line(mut self, line: u32) -> Self {
        self.range.line = line;
        self
    }
}

/// One validated complexity finding attributed to a code element.
///
/// Field order defines the derived ordering used inside merge groups:
/// kind first (untyped before typed), then score, element and range.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Marker {
    kind: Option<String>,
    score: u64,
    element: ElementId,
    range: TextRange,
}

impl Marker {
    pub fn new(
        score: i64,
        element: ElementId,
        kind: Option<&str>,
        range: TextRange,
    ) -> Result<Self, MarkerError> {
        let score = u64::try_from(score).map_err(|_| MarkerError::NegativeScore(score))?;
        if kind.is_some_and(str::is_empty) {
            return Err(MarkerError::EmptyKind);
        }
        if range.start > range.end {
            return Err(MarkerError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        Ok(Self {
            kind: kind.map(str::to_string),
            score,
            element,
            range,
        })
    }

    /// Shorthand for an untyped marker with an empty range.
    pub fn untyped(score: i64, element: impl Into<ElementId>) -> Result<Self, MarkerError> {
        Self::new(score, element.into(), None, TextRange::default())
    }

    /// Shorthand for a typed marker with an empty range.
    pub fn typed(
        score: i64,
        element: impl Into<ElementId>,
        kind: &str,
    ) -> Result<Self, MarkerError> {
        Self::new(score, element.into(), Some(kind), TextRange::default())
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn line(&self) -> u32 {
        self.range.line
    }
}

impl TryFrom<Finding> for Marker {
    type Error = MarkerError;

    fn try_from(finding: Finding) -> Result<Self, Self::Error> {
        Self::new(
            finding.score,
            finding.element,
            finding.kind.as_deref(),
            finding.range,
        )
    }
}
