// Output formatting — terminal display and JSON rendering of cluster lists.

pub mod terminal;

use serde_json::{json, Value};

use crate::clustering::{Cluster, ClusteringResult};
use crate::document::Document;

/// Shorten a document title for preview lines, cutting on character
/// boundaries and appending "..." when anything was dropped.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Clusters as JSON, with document indices resolved to document ids.
pub fn to_json(result: &ClusteringResult, documents: &[Document]) -> Value {
    json!({
        "clusters": result
            .clusters
            .iter()
            .map(|c| cluster_json(c, documents))
            .collect::<Vec<_>>(),
        "diagnostics": result.diagnostics,
    })
}

fn cluster_json(cluster: &Cluster, documents: &[Document]) -> Value {
    let mut value = json!({
        "label": cluster.label,
        "score": cluster.score,
        "size": cluster.size(),
        "documents": cluster.document_ids(documents),
    });
    if cluster.other_topics {
        value["otherTopics"] = json!(true);
    }
    if !cluster.subclusters.is_empty() {
        value["subclusters"] = cluster
            .subclusters
            .iter()
            .map(|c| cluster_json(c, documents))
            .collect();
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn json_resolves_document_ids() {
        let documents = vec![Document::new("a"), Document::new("b")];
        let result = ClusteringResult {
            clusters: vec![Cluster::other_topics(vec![1])],
            ..ClusteringResult::default()
        };
        let value = to_json(&result, &documents);
        assert_eq!(value["clusters"][0]["documents"][0], "b");
        assert_eq!(value["clusters"][0]["otherTopics"], true);
        assert_eq!(value["clusters"][0]["label"], "Other Topics");
    }
}
