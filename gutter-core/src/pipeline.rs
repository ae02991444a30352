// Pass pipeline: findings to markers to merge groups to sink. Errors are
// collected per finding and per group; the pass always runs to completion.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::GutterConfig;
use crate::error::{GutterError, MergeError};
use crate::format::ScoreFormatter;
use crate::host::{AnalysisSource, IconSink, RenderedIcon};
use crate::merge::{GroupKey, MarkerMerger, MergePolicy, total_score};
use crate::render::badge::IconAssembler;
use crate::types::{ElementId, Finding, Marker};

/// A failure that dropped one finding or group from a pass.
#[derive(Debug)]
pub struct PassError {
    /// Pipeline stage: `"marker"`, `"merge"` or `"sink"`.
    pub stage: &'static str,
    pub element: Option<ElementId>,
    pub error: GutterError,
}

/// Statistics for one rendering pass.
#[derive(Debug, Default)]
pub struct PassResult {
    pub findings: usize,
    /// Valid markers that reached grouping.
    pub markers: usize,
    /// Markers dropped by the threshold: singly under TypeGrouped, as a
    /// whole group under Summed.
    pub suppressed: usize,
    pub rejected: usize,
    pub icons_emitted: usize,
    pub duration: Duration,
    pub errors: Vec<PassError>,
}

impl PassResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Orchestrates one rendering pass per batch of findings.
#[derive(Debug, Clone, Copy)]
pub struct GutterPipeline {
    merger: MarkerMerger,
    suppress_at_or_below: u64,
}

impl Default for GutterPipeline {
    fn default() -> Self {
        Self::from_config(&GutterConfig::default())
    }
}

impl GutterPipeline {
    pub fn new(merger: MarkerMerger, suppress_at_or_below: u64) -> Self {
        Self {
            merger,
            suppress_at_or_below,
        }
    }

    pub fn from_config(config: &GutterConfig) -> Self {
        let merger = MarkerMerger::new(
            config.merge.policy,
            ScoreFormatter::new(config.badge.theme),
            IconAssembler::new(config.badge.style()),
        );
        Self::new(merger, config.markers.suppress_at_or_below)
    }

    pub fn merger(&self) -> &MarkerMerger {
        &self.merger
    }

    /// Render the source's next pass. Returns `None` once the source is exhausted.
    pub fn run_pass(
        &self,
        source: &mut dyn AnalysisSource,
        sink: &mut dyn IconSink,
    ) -> Option<PassResult> {
        let findings = source.next_pass()?;
        debug!(source = source.name(), findings = findings.len(), "Pass received");
        Some(self.render_findings(findings, sink))
    }

    /// Render every remaining pass of the source.
    pub fn run_all(
        &self,
        source: &mut dyn AnalysisSource,
        sink: &mut dyn IconSink,
    ) -> Vec<PassResult> {
        let mut results = Vec::new();
        while let Some(result) = self.run_pass(source, sink) {
            results.push(result);
        }
        results
    }

    /// Render one batch of findings into the sink.
    pub fn render_findings(&self, findings: Vec<Finding>, sink: &mut dyn IconSink) -> PassResult {
        let start = Instant::now();
        let mut result = PassResult {
            findings: findings.len(),
            ..Default::default()
        };

        sink.begin_pass();

        // Candidate sets are gutter lines; within a line, the policy key splits groups.
        let mut lines: BTreeMap<u32, BTreeMap<GroupKey, Vec<Marker>>> = BTreeMap::new();
        for finding in findings {
            let element = finding.element;
            let marker = match Marker::try_from(finding) {
                Ok(m) => m,
                Err(e) => {
                    warn!(element = %element, error = %e, "Rejected finding");
                    result.rejected += 1;
                    result.errors.push(PassError {
                        stage: "marker",
                        element: Some(element),
                        error: e.into(),
                    });
                    continue;
                }
            };
            // Summed groups are thresholded on their total, after grouping.
            if self.merger.policy() == MergePolicy::TypeGrouped
                && marker.score() <= self.suppress_at_or_below
            {
                result.suppressed += 1;
                continue;
            }
            result.markers += 1;
            lines
                .entry(marker.line())
                .or_default()
                .entry(self.merger.group_key(&marker))
                .or_default()
                .push(marker);
        }

        for (line, groups) in lines {
            for group in groups.into_values() {
                if self.merger.policy() == MergePolicy::Summed
                    && total_score(&group) <= self.suppress_at_or_below
                {
                    result.suppressed += group.len();
                    continue;
                }
                let rendered = match self.render_group(&group, line) {
                    Ok(r) => r,
                    Err(e) => {
                        warn!(line, error = %e, "Merge failed");
                        result.errors.push(PassError {
                            stage: "merge",
                            element: group.first().map(Marker::element),
                            error: e.into(),
                        });
                        continue;
                    }
                };
                let anchor = rendered.anchor;
                match sink.accept(rendered) {
                    Ok(()) => result.icons_emitted += 1,
                    Err(e) => {
                        warn!(anchor = %anchor, error = %e, "Sink rejected icon");
                        result.errors.push(PassError {
                            stage: "sink",
                            element: Some(anchor),
                            error: e.into(),
                        });
                    }
                }
            }
        }

        result.duration = start.elapsed();
        info!(
            policy = %self.merger.policy(),
            findings = result.findings,
            icons = result.icons_emitted,
            suppressed = result.suppressed,
            rejected = result.rejected,
            errors = result.errors.len(),
            "Rendering pass complete"
        );
        result
    }

    fn render_group(&self, group: &[Marker], line: u32) -> Result<RenderedIcon, MergeError> {
        let icon = self.merger.merge_icon(group)?;
        let annotations = self.merger.annotate(group)?;
        let anchor = group
            .iter()
            .map(Marker::element)
            .min()
            .ok_or(MergeError::EmptyGroup)?;
        Ok(RenderedIcon {
            anchor,
            line,
            icon,
            annotations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::host::{CollectingSink, MemorySource};
    use crate::merge::MergePolicy;

    fn pipeline(policy: MergePolicy) -> GutterPipeline {
        let mut config = GutterConfig::default();
        config.merge.policy = policy;
        GutterPipeline::from_config(&config)
    }

    #[test]
    fn same_element_merges_into_composite() {
        let findings = vec![
            Finding::new(5, 1).with_kind("NPath").on_line(3),
            Finding::new(12, 1).with_kind("Cyclomatic").on_line(3),
            Finding::new(8, 2).with_kind("Cyclomatic").on_line(10),
        ];
        let mut sink = CollectingSink::new();
        let result = pipeline(MergePolicy::TypeGrouped).render_findings(findings, &mut sink);

        assert!(result.is_clean());
        assert_eq!(result.icons_emitted, 2);
        let icons = sink.icons();
        assert_eq!(icons[0].line, 3);
        assert_eq!(icons[0].icon.labels(), vec!["c12", "n5"]);
        assert_eq!(icons[0].annotations.tooltip, "Cyclomatic: 12\nNPath: 5");
        assert_eq!(icons[1].anchor, ElementId(2));
        assert_eq!(icons[1].icon.labels(), vec!["c8"]);
    }

    #[test]
    fn summed_merges_across_elements_on_a_line() {
        let findings = vec![
            Finding::new(12, 1).on_line(4),
            Finding::new(5, 2).on_line(4),
            Finding::new(30, 3).on_line(9),
        ];
        let mut sink = CollectingSink::new();
        let result = pipeline(MergePolicy::Summed).render_findings(findings, &mut sink);

        assert_eq!(result.icons_emitted, 2);
        assert_eq!(sink.icons()[0].icon.labels(), vec!["17"]);
        assert_eq!(sink.icons()[0].anchor, ElementId(1));
        assert_eq!(sink.icons()[0].annotations.status_message, None);
        assert_eq!(sink.icons()[1].icon.labels(), vec!["30"]);
    }

    #[test]
    fn trivial_scores_are_suppressed() {
        let findings = vec![Finding::new(1, 1), Finding::new(0, 2), Finding::new(2, 3)];
        let mut sink = CollectingSink::new();
        let result = pipeline(MergePolicy::TypeGrouped).render_findings(findings, &mut sink);
        assert_eq!(result.suppressed, 2);
        assert_eq!(result.markers, 1);
        assert_eq!(sink.icons().len(), 1);
    }

    #[test]
    fn summed_threshold_applies_to_the_total() {
        let findings = vec![
            Finding::new(1, 1).on_line(4),
            Finding::new(1, 2).on_line(4),
            Finding::new(1, 3).on_line(4),
            Finding::new(12, 4).on_line(5),
            Finding::new(1, 5).on_line(5),
            Finding::new(1, 6).on_line(7),
        ];
        let mut sink = CollectingSink::new();
        let result = pipeline(MergePolicy::Summed).render_findings(findings, &mut sink);

        assert_eq!(result.markers, 6);
        assert_eq!(result.suppressed, 1);
        let icons: Vec<(u32, Vec<&str>)> = sink
            .icons()
            .iter()
            .map(|r| (r.line, r.icon.labels()))
            .collect();
        assert_eq!(icons, vec![(4, vec!["3"]), (5, vec!["13"])]);
        assert_eq!(sink.icons()[1].annotations.tooltip, "13");
    }

    #[test]
    fn bad_findings_do_not_block_the_pass() {
        let findings = vec![
            Finding::new(-4, 1),
            Finding::new(9, 2).with_kind(""),
            Finding::new(9, 3).with_kind("Cyclomatic"),
        ];
        let mut sink = CollectingSink::new();
        let result = pipeline(MergePolicy::TypeGrouped).render_findings(findings, &mut sink);
        assert_eq!(result.rejected, 2);
        assert_eq!(result.icons_emitted, 1);
        assert!(result.errors.iter().all(|e| e.stage == "marker"));
        assert!(result.errors.iter().all(|e| e.error.is_invalid_argument()));
        assert_eq!(result.errors[0].element, Some(ElementId(1)));
    }

    struct RefusingSink {
        refuse: ElementId,
        accepted: usize,
    }

    impl IconSink for RefusingSink {
        fn accept(&mut self, icon: RenderedIcon) -> Result<(), RenderError> {
            if icon.anchor == self.refuse {
                return Err(RenderError::Sink("gutter line is folded".into()));
            }
            self.accepted += 1;
            Ok(())
        }
    }

    #[test]
    fn sink_failure_is_recorded_per_icon() {
        let findings = vec![Finding::new(9, 1).on_line(0), Finding::new(9, 2).on_line(1)];
        let mut sink = RefusingSink {
            refuse: ElementId(1),
            accepted: 0,
        };
        let result = pipeline(MergePolicy::TypeGrouped).render_findings(findings, &mut sink);
        assert_eq!(sink.accepted, 1);
        assert_eq!(result.icons_emitted, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].stage, "sink");
    }

    #[test]
    fn each_pass_replaces_the_previous_icons() {
        let mut source = MemorySource::from_passes(vec![
            vec![Finding::new(9, 1), Finding::new(40, 2).on_line(2)],
            vec![Finding::new(3, 7)],
        ]);
        let mut sink = CollectingSink::new();
        let results = pipeline(MergePolicy::TypeGrouped).run_all(&mut source, &mut sink);

        assert_eq!(results.len(), 2);
        assert_eq!(sink.passes_started(), 2);
        assert_eq!(sink.icons().len(), 1);
        assert_eq!(sink.icons()[0].anchor, ElementId(7));
    }

    #[test]
    fn exhausted_source_yields_none() {
        let mut source = MemorySource::default();
        let mut sink = CollectingSink::new();
        assert!(
            GutterPipeline::default()
                .run_pass(&mut source, &mut sink)
                .is_none()
        );
        assert_eq!(sink.passes_started(), 0);
    }
}
