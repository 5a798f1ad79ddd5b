// Cluster label selection — pick the best label for each concept.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::ClusteringConfig;
use crate::error::{Error, Result};
use crate::labels::LabelCandidate;
use crate::vsm::VectorSpaceModel;

use super::model::ClusterCandidate;

/// Scores at or below this never become cluster labels.
pub const LABEL_SCORE_EPSILON: f64 = 1e-9;

/// How labels are matched to concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelAssigner {
    /// Greedy over all (concept, label) pairs; a label is used at most once.
    #[default]
    Unique,
    /// Each concept takes its own best label; concepts may share one.
    Simple,
}

impl fmt::Display for LabelAssigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LabelAssigner::Unique => "unique",
            LabelAssigner::Simple => "simple",
        })
    }
}

impl FromStr for LabelAssigner {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "unique" => Ok(LabelAssigner::Unique),
            "simple" => Ok(LabelAssigner::Simple),
            other => Err(Error::config(
                "labelAssigner",
                format!("unknown label assigner '{other}' (expected unique, simple)"),
            )),
        }
    }
}

/// Score multiplier for a phrase of `length` words.
///
/// 1 below `start`, 0 from `stop` on, linear steps in between. A `stop`
/// below `start` counts as `start`.
pub fn phrase_length_penalty(length: usize, start: usize, stop: usize) -> f64 {
    let stop = stop.max(start);
    if length >= stop {
        return 0.0;
    }
    if length < start {
        return 1.0;
    }
    let step = 1.0 / (stop - start + 1) as f64;
    1.0 - step * (length - start + 1) as f64
}

/// Score every label against every concept and assign labels.
///
/// A label's score for a concept is the cosine of its vector with the
/// concept column; multi-word labels are further multiplied by
/// `phrase_label_boost` and the phrase length penalty. The returned slots are
/// ordered by descending score, ties by concept index.
pub fn build_cluster_labels(
    vsm: &VectorSpaceModel,
    labels: &[LabelCandidate],
    concepts: &Array2<f64>,
    config: &ClusteringConfig,
) -> Vec<ClusterCandidate> {
    if labels.is_empty() || concepts.ncols() == 0 || vsm.rows() != concepts.nrows() {
        return Vec::new();
    }

    // Label vectors and concept columns are unit length (or zero), so the
    // dot product is the cosine.
    let mut scores = vsm.label_vectors.t().dot(concepts);
    for (label, mut row) in scores.rows_mut().into_iter().enumerate() {
        let candidate = &labels[label];
        if candidate.is_phrase() {
            let factor = config.phrase_label_boost
                * phrase_length_penalty(
                    candidate.words.len(),
                    config.phrase_length_penalty_start,
                    config.phrase_length_penalty_stop,
                );
            row.mapv_inplace(|x| x * factor);
        }
    }

    let mut assigned = match config.label_assigner {
        LabelAssigner::Unique => assign_unique(&scores),
        LabelAssigner::Simple => assign_simple(&scores),
    };
    assigned.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.concept.cmp(&b.concept)));
    assigned
}

/// `scores` is labels × concepts.
fn assign_unique(scores: &Array2<f64>) -> Vec<ClusterCandidate> {
    let (label_count, concept_count) = scores.dim();
    let mut scored: Vec<(f64, usize, usize)> = scores
        .indexed_iter()
        .filter(|(_, &score)| score > LABEL_SCORE_EPSILON)
        .map(|((label, concept), &score)| (score, concept, label))
        .collect();
    scored.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    let mut used_concepts = vec![false; concept_count];
    let mut used_labels = vec![false; label_count];
    let mut assigned = Vec::new();
    for (score, concept, label) in scored {
        if used_concepts[concept] || used_labels[label] {
            continue;
        }
        used_concepts[concept] = true;
        used_labels[label] = true;
        assigned.push(candidate(label, concept, score));
        if assigned.len() == concept_count {
            break;
        }
    }
    assigned
}

fn assign_simple(scores: &Array2<f64>) -> Vec<ClusterCandidate> {
    scores
        .columns()
        .into_iter()
        .enumerate()
        .filter_map(|(concept, column)| {
            let mut best: Option<(usize, f64)> = None;
            for (label, &score) in column.iter().enumerate() {
                if score > LABEL_SCORE_EPSILON && best.map_or(true, |(_, b)| score > b) {
                    best = Some((label, score));
                }
            }
            best.map(|(label, score)| candidate(label, concept, score))
        })
        .collect()
}

fn candidate(label: usize, concept: usize, score: f64) -> ClusterCandidate {
    ClusterCandidate {
        label,
        concept,
        score,
        documents: BTreeSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use ndarray::array;

    /// A model over two stems whose label vectors are given column-wise.
    fn model(label_vectors: Array2<f64>) -> VectorSpaceModel {
        VectorSpaceModel {
            document_count: 2,
            row_stems: vec![0, 1],
            stem_rows: BTreeMap::from([(0, 0), (1, 1)]),
            term_document: Array2::eye(2),
            phrase_labels: Vec::new(),
            term_phrase: Array2::zeros((2, 0)),
            label_vectors,
        }
    }

    fn word(stem: usize) -> LabelCandidate {
        LabelCandidate {
            words: vec![stem],
            stems: vec![stem],
            frequency: 2,
            documents: BTreeSet::from([0, 1]),
        }
    }

    fn phrase(length: usize) -> LabelCandidate {
        LabelCandidate {
            words: (0..length).collect(),
            stems: (0..length).collect(),
            frequency: 2,
            documents: BTreeSet::from([0, 1]),
        }
    }

    fn config() -> ClusteringConfig {
        ClusteringConfig::builder().phrase_label_boost(1.0).build().unwrap()
    }

    fn picks(slots: &[ClusterCandidate]) -> Vec<(usize, usize)> {
        slots.iter().map(|c| (c.concept, c.label)).collect()
    }

    #[test]
    fn a_label_is_used_for_one_concept_only() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        // Label 0 is closest to both concepts.
        let vsm = model(array![[1.0, 0.0], [0.0, 1.0]]);
        let labels = vec![word(0), word(1)];
        let concepts = array![[1.0, s], [0.0, s]];

        let slots = build_cluster_labels(&vsm, &labels, &concepts, &config());
        assert_eq!(picks(&slots), vec![(0, 0), (1, 1)]);
        assert!((slots[0].score - 1.0).abs() < 1e-12);
        assert!((slots[1].score - s).abs() < 1e-12);
    }

    #[test]
    fn simple_assigner_lets_concepts_share_a_label() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let vsm = model(array![[1.0, 0.0], [0.0, 1.0]]);
        let labels = vec![word(0), word(1)];
        let concepts = array![[1.0, s], [0.0, s]];
        let simple = ClusteringConfig::builder()
            .phrase_label_boost(1.0)
            .label_assigner(LabelAssigner::Simple)
            .build()
            .unwrap();

        let slots = build_cluster_labels(&vsm, &labels, &concepts, &simple);
        assert_eq!(picks(&slots), vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn negligible_scores_give_no_cluster() {
        // Concept 1 is orthogonal to every label.
        let vsm = model(array![[1.0], [0.0]]);
        let labels = vec![word(0)];
        let concepts = array![[1.0, 0.0], [0.0, 1.0]];

        let slots = build_cluster_labels(&vsm, &labels, &concepts, &config());
        assert_eq!(picks(&slots), vec![(0, 0)]);

        let zero = model(array![[0.0], [0.0]]);
        assert!(build_cluster_labels(&zero, &labels, &concepts, &config()).is_empty());
    }

    #[test]
    fn phrase_boost_changes_the_winner() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        // Word label 0 fits the concept exactly, phrase label 1 at cos ~0.707.
        let vsm = model(array![[1.0, s], [0.0, s]]);
        let labels = vec![word(0), phrase(2)];
        let concepts = array![[1.0], [0.0]];

        let plain = build_cluster_labels(&vsm, &labels, &concepts, &config());
        assert_eq!(plain[0].label, 0);

        let boosted = ClusteringConfig::builder().phrase_label_boost(2.0).build().unwrap();
        let slots = build_cluster_labels(&vsm, &labels, &concepts, &boosted);
        assert_eq!(slots[0].label, 1);
        assert!((slots[0].score - 2.0 * s).abs() < 1e-12);
    }

    #[test]
    fn ties_go_to_lower_concept_then_lower_label() {
        // Two identical labels, two identical concepts.
        let vsm = model(array![[1.0, 1.0], [0.0, 0.0]]);
        let labels = vec![word(0), word(0)];
        let concepts = array![[1.0, 1.0], [0.0, 0.0]];

        let slots = build_cluster_labels(&vsm, &labels, &concepts, &config());
        assert_eq!(picks(&slots), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn overlong_phrases_never_become_labels() {
        let vsm = model(array![[0.6], [0.8]]);
        let labels = vec![phrase(8)];
        let concepts = array![[0.6], [0.8]];
        assert!(build_cluster_labels(&vsm, &labels, &concepts, &config()).is_empty());

        let seven = vec![phrase(7)];
        let slots = build_cluster_labels(&vsm, &seven, &concepts, &config());
        assert!((slots[0].score - 1.0).abs() < 1e-12);

        let earlier = ClusteringConfig::builder()
            .phrase_label_boost(1.0)
            .phrase_length_penalty_start(6)
            .build()
            .unwrap();
        let slots = build_cluster_labels(&vsm, &seven, &concepts, &earlier);
        assert!((slots[0].score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn length_penalty_steps_down_between_start_and_stop() {
        assert_eq!(phrase_length_penalty(3, 4, 6), 1.0);
        assert!((phrase_length_penalty(4, 4, 6) - 2.0 / 3.0).abs() < 1e-12);
        assert!((phrase_length_penalty(5, 4, 6) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(phrase_length_penalty(6, 4, 6), 0.0);
        assert_eq!(phrase_length_penalty(8, 8, 8), 0.0);
        assert_eq!(phrase_length_penalty(7, 8, 8), 1.0);
        // Stop below start behaves like stop == start.
        assert_eq!(phrase_length_penalty(5, 5, 3), 0.0);
        assert_eq!(phrase_length_penalty(4, 5, 3), 1.0);
    }

    #[test]
    fn assigner_names_parse() {
        assert_eq!("unique".parse::<LabelAssigner>().unwrap(), LabelAssigner::Unique);
        assert_eq!(" Simple ".parse::<LabelAssigner>().unwrap(), LabelAssigner::Simple);
        assert!("random".parse::<LabelAssigner>().is_err());
    }
}
