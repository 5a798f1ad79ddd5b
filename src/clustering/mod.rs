// The Lingo clustering pipeline.
//
// preprocess → extract candidates → filter → build VSM → factorize →
// label concepts → assign documents → merge → format.
//
// Each stage is a plain function over the request's own context, so a
// LingoClusterer can serve any number of concurrent requests.

pub mod assigner;
pub mod format;
pub mod label_builder;
pub mod merger;
pub mod model;
pub mod reducer;
pub mod traits;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ClusteringConfig;
use crate::document::Document;
use crate::error::Result;
use crate::labels::extractor::extract_candidates;
use crate::labels::filters::LabelFilterChain;
use crate::language::LanguageRegistry;
use crate::preprocessing::preprocess;
use crate::vsm::VectorSpaceModel;

pub use label_builder::LabelAssigner;
pub use model::{Cluster, ClusterCandidate, ClusteringResult, Diagnostics, OTHER_TOPICS_LABEL};
pub use traits::ClusteringAlgorithm;

/// Lingo: label-first clustering over a factorized term-document matrix.
#[derive(Debug, Clone)]
pub struct LingoClusterer {
    registry: Arc<LanguageRegistry>,
    config: ClusteringConfig,
}

impl LingoClusterer {
    /// Validates the configuration and checks that its language is loaded,
    /// so configuration errors surface before any document is processed.
    pub fn new(registry: Arc<LanguageRegistry>, config: ClusteringConfig) -> Result<Self> {
        config.validate()?;
        registry.get(config.language)?;
        Ok(Self { registry, config })
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }
}

impl ClusteringAlgorithm for LingoClusterer {
    fn name(&self) -> &'static str {
        "lingo"
    }

    fn cluster(&self, documents: &[Document]) -> Result<ClusteringResult> {
        let started = Instant::now();
        let config = &self.config;
        let mut diagnostics = Diagnostics {
            documents: documents.len(),
            ..Diagnostics::default()
        };

        if documents.is_empty() {
            info!("No documents to cluster");
            return Ok(ClusteringResult {
                clusters: Vec::new(),
                diagnostics,
            });
        }

        let language = self.registry.get(config.language)?;
        let context = preprocess(documents, config, language, self.registry.tokenizer());
        diagnostics.words = context.words.len();
        diagnostics.stems = context.stems.len();

        let candidates = if context.has_words() {
            extract_candidates(&context, config)
        } else {
            Vec::new()
        };
        diagnostics.candidates = candidates.len();

        let labels = LabelFilterChain::from_config(config).apply(&context, candidates);
        diagnostics.labels = labels.len();

        let mut slots = Vec::new();
        if labels.is_empty() {
            warn!(
                documents = documents.len(),
                "No label candidates survived filtering, all documents go to Other Topics"
            );
        } else {
            let vsm = VectorSpaceModel::build(&context, &labels, config);
            diagnostics.matrix_rows = vsm.rows();

            if let Some(concepts) = reducer::reduce(&vsm, config)? {
                diagnostics.concepts = concepts.count();
                diagnostics.iterations = concepts.factorization.iterations;

                let candidates =
                    label_builder::build_cluster_labels(&vsm, &labels, &concepts.basis, config);
                debug!(labeled = candidates.len(), "Labeled concepts");

                slots = assigner::assign_documents(&context, &vsm, &labels, candidates, config);
                diagnostics.merged =
                    merger::merge_clusters(&vsm, &mut slots, config.cluster_merging_threshold);
            }
        }

        let clusters = format::build_clusters(&context, &labels, slots, config);
        info!(
            documents = documents.len(),
            clusters = clusters.iter().filter(|c| !c.other_topics).count(),
            labels = diagnostics.labels,
            concepts = diagnostics.concepts,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Clustering complete"
        );

        Ok(ClusteringResult {
            clusters,
            diagnostics,
        })
    }
}
