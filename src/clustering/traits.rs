// Clustering algorithm trait — the seam between callers and the pipeline.
//
// Callers (the CLI, tests, embedding services) hold a `dyn ClusteringAlgorithm`
// so the Lingo pipeline can sit next to other algorithms without changing them.

use crate::document::Document;
use crate::error::Result;

use super::model::ClusteringResult;

/// Groups a batch of documents into labeled clusters.
pub trait ClusteringAlgorithm: Send + Sync {
    /// Short identifier for logs and output.
    fn name(&self) -> &'static str;

    /// Cluster one request's documents. Zero documents give zero clusters.
    fn cluster(&self, documents: &[Document]) -> Result<ClusteringResult>;
}
