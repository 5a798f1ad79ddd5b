// Lingo: search-result clustering
//
// This is the library root. Each module corresponds to a stage (or a shared
// resource) of the clustering pipeline; `clustering` wires them together.

pub mod clustering;
pub mod config;
pub mod document;
pub mod error;
pub mod labels;
pub mod language;
pub mod matrix;
pub mod output;
pub mod preprocessing;
pub mod vsm;

pub use clustering::{Cluster, ClusteringAlgorithm, ClusteringResult, LingoClusterer};
pub use config::ClusteringConfig;
pub use document::Document;
pub use error::{Error, Result};
pub use language::{Language, LanguageRegistry};
