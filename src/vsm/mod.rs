// Vector-space model — the weighted term-document matrix over the label
// vocabulary, plus the label vectors that live in the same row space.

pub mod weighting;

use std::collections::{BTreeMap, BTreeSet};

use ndarray::{Array2, ArrayView1};
use tracing::debug;

use crate::config::ClusteringConfig;
use crate::labels::LabelCandidate;
use crate::matrix::normalize_columns_l2;
use crate::preprocessing::PreprocessingContext;

#[derive(Debug, Clone)]
pub struct VectorSpaceModel {
    pub document_count: usize,
    /// Stem index of each matrix row, heaviest first.
    pub row_stems: Vec<usize>,
    /// Inverse of `row_stems`.
    pub stem_rows: BTreeMap<usize, usize>,
    /// Rows = stems, columns = documents. Raw weights, not normalized.
    pub term_document: Array2<f64>,
    /// Label index of each column of `term_phrase`.
    pub phrase_labels: Vec<usize>,
    /// Rows = stems, columns = phrase labels, L2-normalized columns.
    pub term_phrase: Array2<f64>,
    /// Rows = stems, columns = all labels. Word labels are unit vectors on
    /// their stem's row, phrase labels are their `term_phrase` column, and a
    /// label with no stem in the matrix is the zero vector.
    pub label_vectors: Array2<f64>,
}

impl VectorSpaceModel {
    /// Build the model for the surviving labels.
    pub fn build(
        context: &PreprocessingContext<'_>,
        labels: &[LabelCandidate],
        config: &ClusteringConfig,
    ) -> Self {
        let n = context.document_count();
        if n == 0 {
            return Self::empty(labels.len());
        }
        let weighting = config.term_weighting;

        let mut referenced = BTreeSet::new();
        for label in labels {
            if label.is_phrase() {
                referenced.extend(
                    label
                        .words
                        .iter()
                        .filter(|&&w| !context.words[w].stop)
                        .map(|&w| context.words[w].stem),
                );
            } else {
                referenced.extend(label.stems.iter().copied());
            }
        }

        let max_df = config.max_word_df * n as f64;
        let mut weighted: Vec<(usize, f64)> = referenced
            .into_iter()
            .filter(|&s| context.stems[s].df() as f64 <= max_df)
            .map(|s| {
                let stem = &context.stems[s];
                let weight = weighting.weight(stem.tf, stem.df(), n) * title_boost(context, s, config);
                (s, weight)
            })
            .collect();
        weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
        weighted.truncate(config.max_matrix_size / n);

        let row_stems: Vec<usize> = weighted.into_iter().map(|(s, _)| s).collect();
        let stem_rows: BTreeMap<usize, usize> =
            row_stems.iter().enumerate().map(|(row, &s)| (s, row)).collect();

        let mut term_document = Array2::zeros((row_stems.len(), n));
        for (row, &s) in row_stems.iter().enumerate() {
            let stem = &context.stems[s];
            let boost = title_boost(context, s, config);
            for &(doc, tf) in &stem.tf_by_document {
                term_document[[row, doc]] = weighting.weight(tf, stem.df(), n) * boost;
            }
        }

        let phrase_labels: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.is_phrase())
            .map(|(i, _)| i)
            .collect();
        let mut term_phrase = Array2::zeros((row_stems.len(), phrase_labels.len()));
        for (column, &label) in phrase_labels.iter().enumerate() {
            for &s in &labels[label].stems {
                if let Some(&row) = stem_rows.get(&s) {
                    let stem = &context.stems[s];
                    term_phrase[[row, column]] = weighting.weight(stem.tf, stem.df(), n);
                }
            }
        }
        normalize_columns_l2(&mut term_phrase);

        let mut label_vectors = Array2::zeros((row_stems.len(), labels.len()));
        let mut phrase_column = 0;
        for (i, label) in labels.iter().enumerate() {
            if label.is_phrase() {
                label_vectors
                    .column_mut(i)
                    .assign(&term_phrase.column(phrase_column));
                phrase_column += 1;
            } else if let Some(&row) = label.stems.first().and_then(|s| stem_rows.get(s)) {
                label_vectors[[row, i]] = 1.0;
            }
        }

        debug!(
            rows = row_stems.len(),
            documents = n,
            phrases = phrase_labels.len(),
            weighting = %weighting,
            "Built term-document matrix"
        );

        Self {
            document_count: n,
            row_stems,
            stem_rows,
            term_document,
            phrase_labels,
            term_phrase,
            label_vectors,
        }
    }

    fn empty(label_count: usize) -> Self {
        Self {
            document_count: 0,
            row_stems: Vec::new(),
            stem_rows: BTreeMap::new(),
            term_document: Array2::zeros((0, 0)),
            phrase_labels: Vec::new(),
            term_phrase: Array2::zeros((0, 0)),
            label_vectors: Array2::zeros((0, label_count)),
        }
    }

    pub fn rows(&self) -> usize {
        self.term_document.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.term_document.is_empty()
    }

    pub fn label_vector(&self, label: usize) -> ArrayView1<'_, f64> {
        self.label_vectors.column(label)
    }

    /// The term-document matrix with unit-length document columns.
    pub fn normalized_term_document(&self) -> Array2<f64> {
        let mut matrix = self.term_document.clone();
        normalize_columns_l2(&mut matrix);
        matrix
    }
}

fn title_boost(context: &PreprocessingContext<'_>, stem: usize, config: &ClusteringConfig) -> f64 {
    if context.is_title_stem(stem) {
        config.title_words_boost
    } else {
        1.0
    }
}

