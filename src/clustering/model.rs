// Cluster types — the intermediate slot produced by the label builder and
// the clusters handed back to callers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Label shown for the residual cluster of unassigned documents.
pub const OTHER_TOPICS_LABEL: &str = "Other Topics";

/// A concept that received a label, before documents are finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterCandidate {
    /// Index into the filtered label list.
    pub label: usize,
    /// Column of the concept matrix the label was chosen for.
    pub concept: usize,
    pub score: f64,
    pub documents: BTreeSet<usize>,
}

/// One labeled group of documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub label: String,
    pub score: f64,
    /// Input document indices, ascending.
    pub documents: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subclusters: Vec<Cluster>,
    /// Concept this cluster came from; none for Other Topics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<usize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub other_topics: bool,
}

impl Cluster {
    pub fn other_topics(documents: Vec<usize>) -> Self {
        Self {
            label: OTHER_TOPICS_LABEL.to_string(),
            score: 0.0,
            documents,
            subclusters: Vec::new(),
            concept: None,
            other_topics: true,
        }
    }

    pub fn size(&self) -> usize {
        self.documents.len()
    }

    /// Ids of this cluster's documents, resolved against the input slice.
    pub fn document_ids<'a>(&self, documents: &'a [Document]) -> Vec<&'a str> {
        self.documents
            .iter()
            .filter_map(|&i| documents.get(i))
            .map(|d| d.id.as_str())
            .collect()
    }
}

/// Per-request statistics, for logging and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub documents: usize,
    pub words: usize,
    pub stems: usize,
    pub candidates: usize,
    pub labels: usize,
    pub matrix_rows: usize,
    pub concepts: usize,
    pub iterations: usize,
    pub merged: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// Topical clusters in display order, Other Topics last when present.
    pub clusters: Vec<Cluster>,
    pub diagnostics: Diagnostics,
}

impl ClusteringResult {
    pub fn other_topics(&self) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.other_topics)
    }

    /// Clusters excluding Other Topics.
    pub fn topical(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(|c| !c.other_topics)
    }
}
