use std::collections::VecDeque;
use std::path::Path;

use serde::Deserialize;

use crate::error::{RenderError, SourceError};
use crate::types::Finding;

use super::traits::{AnalysisSource, IconSink, RenderedIcon};

/// Findings document: either `{"passes": [[...], ...]}` or a bare list
/// of findings for a single pass.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FindingsDocument {
    Passes { passes: Vec<Vec<Finding>> },
    Single(Vec<Finding>),
}

/// A queue of pre-recorded passes.
#[derive(Debug, Default)]
pub struct MemorySource {
    passes: VecDeque<Vec<Finding>>,
}

impl MemorySource {
    pub fn from_passes(passes: Vec<Vec<Finding>>) -> Self {
        Self {
            passes: passes.into(),
        }
    }

    pub fn single_pass(findings: Vec<Finding>) -> Self {
        Self::from_passes(vec![findings])
    }

    pub fn from_json_str(s: &str) -> Result<Self, SourceError> {
        let doc: FindingsDocument = serde_json::from_str(s)?;
        Ok(match doc {
            FindingsDocument::Passes { passes } => Self::from_passes(passes),
            FindingsDocument::Single(findings) => Self::single_pass(findings),
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn remaining(&self) -> usize {
        self.passes.len()
    }
}

impl AnalysisSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn next_pass(&mut self) -> Option<Vec<Finding>> {
        self.passes.pop_front()
    }
}

/// Keeps the icons of the most recent pass.
#[derive(Debug, Default)]
pub struct CollectingSink {
    icons: Vec<RenderedIcon>,
    passes_started: usize,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn icons(&self) -> &[RenderedIcon] {
        &self.icons
    }

    pub fn into_icons(self) -> Vec<RenderedIcon> {
        self.icons
    }

    pub fn passes_started(&self) -> usize {
        self.passes_started
    }
}

impl IconSink for CollectingSink {
    fn begin_pass(&mut self) {
        self.icons.clear();
        self.passes_started += 1;
    }

    fn accept(&mut self, icon: RenderedIcon) -> Result<(), RenderError> {
        self.icons.push(icon);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementId;

    #[test]
    fn bare_list_is_one_pass() {
        let mut source =
            MemorySource::from_json_str(r#"[{"score": 4, "element": 1}, {"score": 9, "element": 2}]"#)
                .unwrap();
        assert_eq!(source.remaining(), 1);
        let pass = source.next_pass().unwrap();
        assert_eq!(pass.len(), 2);
        assert_eq!(pass[1].element, ElementId(2));
        assert!(source.next_pass().is_none());
    }

    #[test]
    fn passes_document_keeps_order() {
        let mut source = MemorySource::from_json_str(
            r#"{"passes": [[{"score": 4, "element": 1}], [], [{"score": 2, "element": 5}]]}"#,
        )
        .unwrap();
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.next_pass().unwrap()[0].score, 4);
        assert!(source.next_pass().unwrap().is_empty());
        assert_eq!(source.next_pass().unwrap()[0].element, ElementId(5));
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(MemorySource::from_json_str(r#"{"findings": 3}"#).is_err());
    }
}
