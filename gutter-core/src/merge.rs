// Marker merger: decides which markers share one gutter icon and renders
// the group under the deployment's policy.
//
// TypeGrouped keys on element identity and keeps one badge per member.
// Summed keys on marker kind and collapses the group to one aggregate score.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MergeError;
use crate::format::ScoreFormatter;
use crate::render::badge::{Badge, GutterIcon, IconAssembler};
use crate::types::{ElementId, Marker};

/// How markers colliding on one candidate set are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// One badge per marker, ordered by kind, joined with spacers.
    #[default]
    TypeGrouped,
    /// One badge carrying the sum of all scores in the group.
    Summed,
}

impl MergePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TypeGrouped => "type-grouped",
            Self::Summed => "summed",
        }
    }
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type-grouped" | "type_grouped" | "grouped" => Ok(Self::TypeGrouped),
            "summed" | "sum" => Ok(Self::Summed),
            other => Err(format!(
                "unknown merge policy '{other}' (expected type-grouped or summed)"
            )),
        }
    }
}

/// The value two markers must share to be mergeable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Element(ElementId),
    Kind(Option<String>),
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element(id) => write!(f, "element {id}"),
            Self::Kind(Some(kind)) => write!(f, "kind {kind}"),
            Self::Kind(None) => f.write_str("untyped markers"),
        }
    }
}

/// Hover and accessibility text attached to a merged icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotations {
    /// One `"<kind>: <score>"` line per member.
    pub tooltip: String,
    /// Status-bar text shown on click; type-grouped icons only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    pub accessible_name: String,
}

pub fn tooltip_line(kind: Option<&str>, score: u64) -> String {
    match kind {
        Some(kind) => format!("{kind}: {score}"),
        None => score.to_string(),
    }
}

pub fn status_line(kind: Option<&str>, score: u64) -> String {
    match kind {
        Some(kind) => format!("{kind} = {score}"),
        None => score.to_string(),
    }
}

pub fn accessible_line(kind: Option<&str>, score: u64) -> String {
    match kind {
        Some(kind) => format!("{kind} complexity is {score}"),
        None => format!("complexity is {score}"),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerMerger {
    policy: MergePolicy,
    formatter: ScoreFormatter,
    assembler: IconAssembler,
}

impl MarkerMerger {
    pub fn new(policy: MergePolicy, formatter: ScoreFormatter, assembler: IconAssembler) -> Self {
        Self {
            policy,
            formatter,
            assembler,
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    pub fn group_key(&self, marker: &Marker) -> GroupKey {
        match self.policy {
            MergePolicy::TypeGrouped => GroupKey::Element(marker.element()),
            MergePolicy::Summed => GroupKey::Kind(marker.kind().map(str::to_string)),
        }
    }

    /// Symmetric by construction: both sides reduce to the same key comparison.
    pub fn can_merge(&self, a: &Marker, b: &Marker) -> bool {
        self.group_key(a) == self.group_key(b)
    }

    /// The badge a marker gets when shown on its own.
    pub fn badge_for(&self, marker: &Marker) -> Badge {
        self.assembler
            .draw_formatted(&self.formatter.format_marker(marker))
    }

    /// Validate a group and return its members in canonical order.
    pub fn ordered<'a>(&self, group: &'a [Marker]) -> Result<Vec<&'a Marker>, MergeError> {
        let Some(first) = group.first() else {
            return Err(MergeError::EmptyGroup);
        };
        let key = self.group_key(first);
        if let Some(stray) = group.iter().find(|m| self.group_key(m) != key) {
            return Err(MergeError::Incompatible {
                policy: self.policy.as_str(),
                left: key.to_string(),
                right: self.group_key(stray).to_string(),
            });
        }

        let mut members: Vec<&Marker> = group.iter().collect();
        members.sort();
        Ok(members)
    }

    /// Render a merge group. A singleton renders exactly as its unmerged badge.
    pub fn merge_icon(&self, group: &[Marker]) -> Result<GutterIcon, MergeError> {
        let members = self.ordered(group)?;

        let icon = match self.policy {
            MergePolicy::TypeGrouped => {
                if let [only] = members.as_slice() {
                    GutterIcon::Single(self.badge_for(only))
                } else {
                    let badges = members.iter().map(|m| self.badge_for(m)).collect();
                    GutterIcon::Composite(self.assembler.compose(badges)?)
                }
            }
            MergePolicy::Summed => {
                let total = aggregate_score(&members);
                let formatted = self
                    .formatter
                    .format_validated(total, members[0].kind());
                GutterIcon::Single(self.assembler.draw_formatted(&formatted))
            }
        };

        debug!(
            policy = %self.policy,
            members = members.len(),
            labels = ?icon.labels(),
            "Merged marker group"
        );
        Ok(icon)
    }

    pub fn annotate(&self, group: &[Marker]) -> Result<Annotations, MergeError> {
        let members = self.ordered(group)?;

        Ok(match self.policy {
            MergePolicy::TypeGrouped => Annotations {
                tooltip: join_lines(&members, tooltip_line, "\n"),
                status_message: Some(join_lines(&members, status_line, "; ")),
                accessible_name: join_lines(&members, accessible_line, ", "),
            },
            MergePolicy::Summed => {
                let total = aggregate_score(&members);
                let kind = members[0].kind();
                Annotations {
                    tooltip: tooltip_line(kind, total),
                    status_message: None,
                    accessible_name: accessible_line(kind, total),
                }
            }
        })
    }
}

/// Saturating sum of a group's scores.
pub fn total_score(group: &[Marker]) -> u64 {
    group
        .iter()
        .fold(0u64, |acc, m| acc.saturating_add(m.score()))
}

fn aggregate_score(members: &[&Marker]) -> u64 {
    members
        .iter()
        .fold(0u64, |acc, m| acc.saturating_add(m.score()))
}

fn join_lines(
    members: &[&Marker],
    line: fn(Option<&str>, u64) -> String,
    separator: &str,
) -> String {
    members
        .iter()
        .map(|m| line(m.kind(), m.score()))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::badge::Glyph;

    fn grouped() -> MarkerMerger {
        MarkerMerger::new(
            MergePolicy::TypeGrouped,
            ScoreFormatter::default(),
            IconAssembler::default(),
        )
    }

    fn summed() -> MarkerMerger {
        MarkerMerger::new(
            MergePolicy::Summed,
            ScoreFormatter::default(),
            IconAssembler::default(),
        )
    }

    #[test]
    fn type_grouped_orders_by_kind_with_one_spacer() {
        let group = vec![
            Marker::typed(5, 1, "B").unwrap(),
            Marker::typed(12, 1, "A").unwrap(),
        ];
        let icon = grouped().merge_icon(&group).unwrap();
        let GutterIcon::Composite(composite) = &icon else {
            panic!("expected composite, got {icon:?}");
        };
        assert_eq!(composite.badges().count(), 2);
        assert_eq!(composite.spacer_count(), 1);
        assert_eq!(icon.labels(), vec!["a12", "b5"]);
        assert!(matches!(composite.glyphs[1], Glyph::Spacer { width: 3, .. }));
    }

    #[test]
    fn summed_collapses_to_one_badge() {
        let group = vec![
            Marker::untyped(12, 1).unwrap(),
            Marker::untyped(5, 2).unwrap(),
        ];
        let icon = summed().merge_icon(&group).unwrap();
        assert!(matches!(icon, GutterIcon::Single(_)));
        assert_eq!(icon.labels(), vec!["17"]);
    }

    #[test]
    fn summed_keeps_shared_kind_prefix() {
        let group = vec![
            Marker::typed(30, 1, "NPath").unwrap(),
            Marker::typed(15, 2, "NPath").unwrap(),
        ];
        let icon = summed().merge_icon(&group).unwrap();
        assert_eq!(icon.labels(), vec!["n45"]);
    }

    #[test]
    fn summed_saturates() {
        let group = vec![
            Marker::untyped(i64::MAX, 1).unwrap(),
            Marker::untyped(i64::MAX, 2).unwrap(),
            Marker::untyped(i64::MAX, 3).unwrap(),
        ];
        let icon = summed().merge_icon(&group).unwrap();
        assert_eq!(icon.labels(), vec!["10^19"]);
    }

    #[test]
    fn singleton_equals_unmerged_badge() {
        let m = Marker::typed(42, 9, "Cyclomatic").unwrap();
        let expected = IconAssembler::default()
            .draw_formatted(&ScoreFormatter::default().format(42, Some("Cyclomatic")).unwrap());
        for merger in [grouped(), summed()] {
            assert_eq!(
                merger.merge_icon(std::slice::from_ref(&m)).unwrap(),
                GutterIcon::Single(expected.clone())
            );
        }
    }

    #[test]
    fn empty_group_fails_fast() {
        assert_eq!(grouped().merge_icon(&[]), Err(MergeError::EmptyGroup));
        assert_eq!(summed().annotate(&[]), Err(MergeError::EmptyGroup));
    }

    #[test]
    fn incompatible_group_fails_fast() {
        let group = vec![
            Marker::typed(5, 1, "A").unwrap(),
            Marker::typed(5, 2, "A").unwrap(),
        ];
        let err = grouped().merge_icon(&group).unwrap_err();
        assert_eq!(
            err,
            MergeError::Incompatible {
                policy: "type-grouped",
                left: "element 1".into(),
                right: "element 2".into(),
            }
        );

        let mixed_kinds = vec![
            Marker::typed(5, 1, "A").unwrap(),
            Marker::untyped(5, 1).unwrap(),
        ];
        assert!(summed().merge_icon(&mixed_kinds).is_err());
    }

    #[test]
    fn can_merge_follows_policy_key() {
        let a = Marker::typed(5, 1, "A").unwrap();
        let b = Marker::typed(7, 1, "B").unwrap();
        let c = Marker::typed(9, 2, "A").unwrap();

        assert!(grouped().can_merge(&a, &b));
        assert!(!grouped().can_merge(&a, &c));
        assert!(!summed().can_merge(&a, &b));
        assert!(summed().can_merge(&a, &c));
    }

    #[test]
    fn type_grouped_annotations() {
        let group = vec![
            Marker::typed(40, 3, "NPath").unwrap(),
            Marker::typed(12, 3, "Cyclomatic").unwrap(),
        ];
        let notes = grouped().annotate(&group).unwrap();
        assert_eq!(notes.tooltip, "Cyclomatic: 12\nNPath: 40");
        assert_eq!(
            notes.status_message.as_deref(),
            Some("Cyclomatic = 12; NPath = 40")
        );
        assert_eq!(
            notes.accessible_name,
            "Cyclomatic complexity is 12, NPath complexity is 40"
        );
    }

    #[test]
    fn summed_annotations_report_total_only() {
        let group = vec![
            Marker::untyped(12, 1).unwrap(),
            Marker::untyped(5, 2).unwrap(),
        ];
        let notes = summed().annotate(&group).unwrap();
        assert_eq!(notes.tooltip, "17");
        assert_eq!(notes.status_message, None);
        assert_eq!(notes.accessible_name, "complexity is 17");
    }

    #[test]
    fn policy_parses_aliases() {
        assert_eq!("summed".parse::<MergePolicy>(), Ok(MergePolicy::Summed));
        assert_eq!(
            "type-grouped".parse::<MergePolicy>(),
            Ok(MergePolicy::TypeGrouped)
        );
        assert!("biggest".parse::<MergePolicy>().is_err());
    }

    // ── Property-based tests ──────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_kind() -> impl Strategy<Value = Option<&'static str>> {
            prop_oneof![
                Just(None),
                Just(Some("Cyclomatic")),
                Just(Some("NPath")),
                Just(Some("Cognitive")),
            ]
        }

        fn arb_marker() -> impl Strategy<Value = Marker> {
            (0i64..50_000, 0u64..4, arb_kind()).prop_map(|(score, element, kind)| {
                Marker::new(score, ElementId(element), kind, crate::types::TextRange::default())
                    .unwrap()
            })
        }

        fn arb_policy() -> impl Strategy<Value = MergePolicy> {
            prop_oneof![Just(MergePolicy::TypeGrouped), Just(MergePolicy::Summed)]
        }

        fn merger(policy: MergePolicy) -> MarkerMerger {
            MarkerMerger::new(policy, ScoreFormatter::default(), IconAssembler::default())
        }

        /// Same-element markers, plus a shuffled copy.
        fn arb_element_group() -> impl Strategy<Value = (Vec<Marker>, Vec<Marker>)> {
            proptest::collection::vec((0i64..5_000, arb_kind()), 1..6)
                .prop_map(|specs| {
                    specs
                        .into_iter()
                        .map(|(score, kind)| {
                            Marker::new(score, ElementId(1), kind, crate::types::TextRange::default())
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
                .prop_flat_map(|group| (Just(group.clone()), Just(group).prop_shuffle()))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn can_merge_is_symmetric(a in arb_marker(), b in arb_marker(), policy in arb_policy()) {
                let m = merger(policy);
                prop_assert_eq!(m.can_merge(&a, &b), m.can_merge(&b, &a));
            }

            #[test]
            fn can_merge_is_transitive(
                a in arb_marker(),
                b in arb_marker(),
                c in arb_marker(),
                policy in arb_policy(),
            ) {
                let m = merger(policy);
                if m.can_merge(&a, &b) && m.can_merge(&b, &c) {
                    prop_assert!(m.can_merge(&a, &c));
                }
                prop_assert!(m.can_merge(&a, &a));
            }

            #[test]
            fn merge_ignores_input_order(
                (group, shuffled) in arb_element_group(),
            ) {
                let m = merger(MergePolicy::TypeGrouped);
                prop_assert_eq!(m.merge_icon(&group).unwrap(), m.merge_icon(&shuffled).unwrap());
                prop_assert_eq!(m.annotate(&group).unwrap(), m.annotate(&shuffled).unwrap());
            }

            #[test]
            fn type_grouped_badge_and_spacer_counts(
                (group, _) in arb_element_group(),
            ) {
                let icon = merger(MergePolicy::TypeGrouped).merge_icon(&group).unwrap();
                prop_assert_eq!(icon.badges().len(), group.len());
                if let GutterIcon::Composite(c) = &icon {
                    prop_assert_eq!(c.spacer_count(), group.len() - 1);
                } else {
                    prop_assert_eq!(group.len(), 1);
                }
            }

            #[test]
            fn singleton_merge_is_noop(m in arb_marker(), policy in arb_policy()) {
                let merger = merger(policy);
                prop_assert_eq!(
                    merger.merge_icon(std::slice::from_ref(&m)).unwrap(),
                    GutterIcon::Single(merger.badge_for(&m))
                );
            }
        }
    }
}
