// Cluster merging — near-duplicate labels collapse into one cluster.

use crate::matrix::cosine;
use crate::vsm::VectorSpaceModel;

use super::model::ClusterCandidate;

/// Merge every pair of live slots whose label vectors have cosine
/// similarity at or above `threshold`.
///
/// Single greedy pass in slot order. The higher-scoring cluster (the earlier
/// slot on ties) absorbs the other's documents and keeps its own label; the
/// absorbed slot becomes `None`. Returns the number of merges.
pub fn merge_clusters(
    vsm: &VectorSpaceModel,
    slots: &mut [Option<ClusterCandidate>],
    threshold: f64,
) -> usize {
    let mut merges = 0;
    for i in 0..slots.len() {
        for j in (i + 1)..slots.len() {
            let (Some(a), Some(b)) = (&slots[i], &slots[j]) else {
                if slots[i].is_none() {
                    break;
                }
                continue;
            };
            let similarity = cosine(vsm.label_vector(a.label), vsm.label_vector(b.label));
            if similarity < threshold {
                continue;
            }

            let (keep, absorb) = if b.score > a.score { (j, i) } else { (i, j) };
            let Some(absorbed) = slots[absorb].take() else {
                continue;
            };
            if let Some(kept) = slots[keep].as_mut() {
                kept.documents.extend(absorbed.documents);
            }
            merges += 1;
            if absorb == i {
                break;
            }
        }
    }
    merges
}
