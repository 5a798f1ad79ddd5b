// Concept discovery — factorize the normalized term-document matrix and
// turn its basis into unit-length concept vectors.

use ndarray::Array2;

use crate::config::ClusteringConfig;
use crate::error::Result;
use crate::matrix::factorization::{Factorization, FactorizationParams};
use crate::matrix::normalize_columns_l2;
use crate::vsm::VectorSpaceModel;

/// `floor(base * sqrt(n) / 10)`, capped at the document count.
pub fn desired_cluster_count(base: usize, documents: usize) -> usize {
    let k = (base as f64 * (documents as f64).sqrt() / 10.0).floor() as usize;
    k.min(documents)
}

#[derive(Debug, Clone)]
pub struct Concepts {
    /// Rows = stems, columns = concepts, unit-length columns.
    pub basis: Array2<f64>,
    pub factorization: Factorization,
}

impl Concepts {
    pub fn count(&self) -> usize {
        self.basis.ncols()
    }
}

/// Factorize the model. `None` when the matrix is too small to yield any
/// concept.
pub fn reduce(vsm: &VectorSpaceModel, config: &ClusteringConfig) -> Result<Option<Concepts>> {
    let k = desired_cluster_count(config.desired_cluster_count_base, vsm.document_count)
        .min(vsm.rows());
    if k == 0 {
        return Ok(None);
    }

    let a = vsm.normalized_term_document();
    let params = FactorizationParams::from_config(config, k);
    let factorization = config.factorization.factorize(&a, &params)?;

    let mut basis = factorization.u.clone();
    normalize_columns_l2(&mut basis);
    Ok(Some(Concepts {
        basis,
        factorization,
    }))
}
