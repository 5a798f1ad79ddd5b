// Document assignment — documents join every cluster whose label they are
// similar enough to.

use std::collections::BTreeSet;

use crate::config::ClusteringConfig;
use crate::labels::LabelCandidate;
use crate::preprocessing::PreprocessingContext;
use crate::vsm::VectorSpaceModel;

use super::model::ClusterCandidate;

/// Fill each candidate's document set and drop the ones that end up smaller
/// than `min_cluster_size`. The returned slots keep the input order; a
/// dropped cluster leaves `None` in its slot.
///
/// With `exact_phrase_assignment` on, a phrase label's bonus goes only to
/// documents that contain the label's own words back to back within one
/// field. Other inflections of the phrase get the plain similarity.
pub fn assign_documents(
    context: &PreprocessingContext<'_>,
    vsm: &VectorSpaceModel,
    labels: &[LabelCandidate],
    candidates: Vec<ClusterCandidate>,
    config: &ClusteringConfig,
) -> Vec<Option<ClusterCandidate>> {
    let documents = vsm.normalized_term_document();

    candidates
        .into_iter()
        .map(|mut candidate| {
            let label = &labels[candidate.label];
            let exact = if config.exact_phrase_assignment && label.is_phrase() {
                documents_containing(context, &label.words)
            } else {
                BTreeSet::new()
            };

            let similarities = documents.t().dot(&vsm.label_vector(candidate.label));
            for (doc, &similarity) in similarities.iter().enumerate() {
                let mut similarity = similarity;
                if exact.contains(&doc) {
                    similarity += config.exact_phrase_bonus;
                }
                if similarity > config.cluster_assignment_threshold {
                    candidate.documents.insert(doc);
                }
            }
            (candidate.documents.len() >= config.min_cluster_size).then_some(candidate)
        })
        .collect()
}

/// Documents in which `words` occur as consecutive tokens of one field.
pub fn documents_containing(context: &PreprocessingContext<'_>, words: &[usize]) -> BTreeSet<usize> {
    if words.is_empty() {
        return BTreeSet::new();
    }
    let last = words.len() - 1;
    context
        .token_words
        .windows(words.len())
        .enumerate()
        .filter(|(_, run)| run.iter().zip(words).all(|(token, word)| *token == Some(*word)))
        .filter_map(|(start, _)| {
            let first = &context.tokens[start];
            let end = &context.tokens[start + last];
            (first.document == end.document && first.field == end.field).then_some(first.document)
        })
        .collect()
}
