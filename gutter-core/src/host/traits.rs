use serde::Serialize;

use crate::error::RenderError;
use crate::merge::Annotations;
use crate::render::badge::GutterIcon;
use crate::types::{ElementId, Finding};

/// Supplies analyzer findings, one rendering pass at a time.
pub trait AnalysisSource {
    /// Human-readable name for this source.
    fn name(&self) -> &'static str;

    /// Findings for the next pass, in no particular order; `None` once exhausted.
    fn next_pass(&mut self) -> Option<Vec<Finding>>;
}

/// Receives the icons of a rendering pass.
pub trait IconSink {
    /// Called before the first icon of a pass. Icons from earlier passes are
    /// stale from this point on.
    fn begin_pass(&mut self) {}

    /// Display one icon in the gutter.
    fn accept(&mut self, icon: RenderedIcon) -> Result<(), RenderError>;
}

/// A merged icon ready for the gutter, keyed by its anchor element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedIcon {
    pub anchor: ElementId,
    pub line: u32,
    pub icon: GutterIcon,
    #[serde(flatten)]
    pub annotations: Annotations,
}
