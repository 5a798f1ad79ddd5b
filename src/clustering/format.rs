// Final cluster list — label text, ordering, and the Other Topics residual.

use std::cmp::Ordering;

use crate::config::ClusteringConfig;
use crate::labels::LabelCandidate;
use crate::preprocessing::PreprocessingContext;

use super::model::{Cluster, ClusterCandidate};

/// Label text: word images joined by spaces, first character upper-cased.
pub fn format_label(context: &PreprocessingContext<'_>, label: &LabelCandidate) -> String {
    let text = label.text(context);
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => text,
    }
}

/// Turn surviving slots into output clusters.
///
/// Clusters are ordered by `(1 - w) * size / n + w * score` with
/// `w = score_weight`, descending and stable. Documents that ended up in no
/// cluster form a trailing Other Topics cluster.
pub fn build_clusters(
    context: &PreprocessingContext<'_>,
    labels: &[LabelCandidate],
    slots: Vec<Option<ClusterCandidate>>,
    config: &ClusteringConfig,
) -> Vec<Cluster> {
    let n = context.document_count();
    let mut clusters: Vec<Cluster> = slots
        .into_iter()
        .flatten()
        .map(|candidate| Cluster {
            label: format_label(context, &labels[candidate.label]),
            score: candidate.score,
            documents: candidate.documents.into_iter().collect(),
            subclusters: Vec::new(),
            concept: Some(candidate.concept),
            other_topics: false,
        })
        .collect();

    let w = config.score_weight;
    let rank = |c: &Cluster| {
        let size = if n == 0 { 0.0 } else { c.size() as f64 / n as f64 };
        (1.0 - w) * size + w * c.score
    };
    clusters.sort_by(|a, b| rank(b).partial_cmp(&rank(a)).unwrap_or(Ordering::Equal));

    let mut assigned = vec![false; n];
    for cluster in &clusters {
        for &doc in &cluster.documents {
            assigned[doc] = true;
        }
    }
    let unassigned: Vec<usize> = (0..n).filter(|&doc| !assigned[doc]).collect();
    if !unassigned.is_empty() {
        clusters.push(Cluster::other_topics(unassigned));
    }
    clusters
}
