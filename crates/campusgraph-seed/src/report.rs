//! Summaries returned by generate and purge, serialized to stdout by the CLI.

use std::collections::BTreeMap;

use serde::Serialize;

use campusgraph_core::EntityKind;

/// Entities created for one kind.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KindCreated {
    pub kind: EntityKind,
    pub requested: usize,
    pub created: usize,
}

/// Outcome of wiring the generated entities together.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BuildReport {
    /// Edges written, keyed by relationship type name.
    pub edges: BTreeMap<String, usize>,
    /// Source entities whose edge sets were replaced.
    pub sources_connected: usize,
    /// `connect` calls that failed.
    pub failed: usize,
}

impl BuildReport {
    pub fn total_edges(&self) -> usize {
        self.edges.values().sum()
    }

    pub(crate) fn record(&mut self, relationship: &str, edges: usize) {
        *self.edges.entry(relationship.to_string()).or_default() += edges;
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GenerateReport {
    pub created: Vec<KindCreated>,
    pub relationships: BuildReport,
}

impl GenerateReport {
    pub fn total_created(&self) -> usize {
        self.created.iter().map(|k| k.created).sum()
    }
}

/// Teardown result for one kind.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KindPurge {
    pub kind: EntityKind,
    pub found: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl KindPurge {
    pub fn empty(kind: EntityKind) -> Self {
        Self {
            kind,
            found: 0,
            deleted: 0,
            failed: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PurgeReport {
    pub kinds: Vec<KindPurge>,
    pub terms_removed: usize,
}

impl PurgeReport {
    pub fn total_deleted(&self) -> usize {
        self.kinds.iter().map(|k| k.deleted).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.kinds.iter().map(|k| k.failed).sum()
    }

    pub fn kind(&self, kind: EntityKind) -> Option<&KindPurge> {
        self.kinds.iter().find(|k| k.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_report_accumulates_per_type() {
        let mut report = BuildReport::default();
        report.record("campus_to_person", 3);
        report.record("campus_to_person", 4);
        report.record("course_to_person", 1);
        assert_eq!(report.edges["campus_to_person"], 7);
        assert_eq!(report.total_edges(), 8);
    }

    #[test]
    fn purge_report_serializes_kind_slugs() {
        let report = PurgeReport {
            kinds: vec![KindPurge {
                kind: EntityKind::Campus,
                found: 2,
                deleted: 1,
                failed: 1,
            }],
            terms_removed: 5,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kinds"][0]["found"], 2);
        assert_eq!(json["terms_removed"], 5);
        assert_eq!(report.total_failed(), 1);
    }
}
