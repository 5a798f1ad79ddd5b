// Nonnegative low-rank factorization A ≈ U·Vᵗ.
//
// The algorithm is a closed set chosen by configuration. All iterative
// variants share one driver (seed, update, track error, stop) and differ
// only in their update step.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClusteringConfig;
use crate::error::{Error, Result};

use super::{all_finite, kmeans, nmf};

/// Added to numerators and denominators of the multiplicative updates.
pub const EPSILON: f64 = 1e-9;

/// Seeded entries are floored here so multiplicative updates can move them.
const SEED_FLOOR: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactorizationKind {
    /// Local NMF with KL-divergence updates and L1-normalized basis columns.
    #[default]
    LocalNmfKl,
    /// NMF minimizing Euclidean distance.
    NmfEd,
    /// NMF minimizing KL divergence.
    NmfKl,
    /// Spherical k-means: U holds centroids, V holds 0/1 membership.
    KMeans,
}

impl fmt::Display for FactorizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FactorizationKind::LocalNmfKl => "local-nmf-kl",
            FactorizationKind::NmfEd => "nmf-ed",
            FactorizationKind::NmfKl => "nmf-kl",
            FactorizationKind::KMeans => "k-means",
        })
    }
}

impl FromStr for FactorizationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "local-nmf-kl" | "lnmf" | "lnmf-kl" => Ok(FactorizationKind::LocalNmfKl),
            "nmf-ed" | "nmf" => Ok(FactorizationKind::NmfEd),
            "nmf-kl" => Ok(FactorizationKind::NmfKl),
            "k-means" | "kmeans" => Ok(FactorizationKind::KMeans),
            other => Err(Error::config(
                "factorizationFactory",
                format!("unknown factorization '{other}' (expected local-nmf-kl, nmf-ed, nmf-kl, k-means)"),
            )),
        }
    }
}

/// How U and V are initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum SeedingStrategy {
    /// Uniform values in [0, 1).
    Random { seed: u64 },
    /// U from spherical k-means centroids, V from their projection Aᵗ·U.
    KMeans { seed: u64 },
}

impl Default for SeedingStrategy {
    fn default() -> Self {
        SeedingStrategy::Random { seed: 0 }
    }
}

impl SeedingStrategy {
    pub fn seed(self) -> u64 {
        match self {
            SeedingStrategy::Random { seed } | SeedingStrategy::KMeans { seed } => seed,
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            SeedingStrategy::Random { .. } => SeedingStrategy::Random { seed },
            SeedingStrategy::KMeans { .. } => SeedingStrategy::KMeans { seed },
        }
    }

    /// Initial U (m×k) and V (n×k) for a nonnegative m×n matrix.
    pub fn initialize(self, a: &Array2<f64>, k: usize) -> (Array2<f64>, Array2<f64>) {
        let (m, n) = a.dim();
        match self {
            SeedingStrategy::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                let u = Array2::from_shape_fn((m, k), |_| rng.random::<f64>());
                let v = Array2::from_shape_fn((n, k), |_| rng.random::<f64>());
                (u, v)
            }
            SeedingStrategy::KMeans { seed } => {
                let clustering = kmeans::factorize(a, k, 15, seed);
                let u = clustering.u.mapv(|x| x.max(SEED_FLOOR));
                let v = a.t().dot(&u).mapv(|x| x.max(SEED_FLOOR));
                (u, v)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorizationParams {
    pub k: usize,
    pub max_iterations: usize,
    /// Negative disables early stopping.
    pub stop_threshold: f64,
    pub seeding: SeedingStrategy,
    /// Reorder concepts by descending activity afterwards.
    pub ordered: bool,
}

impl FactorizationParams {
    pub fn from_config(config: &ClusteringConfig, k: usize) -> Self {
        Self {
            k,
            max_iterations: config.max_iterations,
            stop_threshold: config.stop_threshold,
            seeding: config.seeding,
            ordered: config.ordered_concepts,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Factorization {
    /// Basis, m×k.
    pub u: Array2<f64>,
    /// Coefficients, n×k.
    pub v: Array2<f64>,
    pub iterations: usize,
    /// Frobenius error history; empty unless early stopping is enabled
    /// (k-means always records its final error).
    pub approximation_errors: Vec<f64>,
    /// Per-concept activity, present when the result was ordered.
    pub aggregates: Option<Vec<f64>>,
}

impl Factorization {
    pub fn k(&self) -> usize {
        self.u.ncols()
    }
}

impl FactorizationKind {
    pub fn factorize(self, a: &Array2<f64>, params: &FactorizationParams) -> Result<Factorization> {
        let (m, n) = a.dim();
        if params.k == 0 || params.k > m.min(n) {
            return Err(Error::Processing(format!(
                "cannot factorize a {m}x{n} matrix to rank {}",
                params.k
            )));
        }
        if a.iter().any(|&x| x < 0.0 || !x.is_finite()) {
            return Err(Error::Processing(
                "factorization input must be finite and nonnegative".to_string(),
            ));
        }

        let mut result = match self {
            FactorizationKind::LocalNmfKl => nmf::iterate(a, params, nmf::local_kl_step),
            FactorizationKind::NmfEd => nmf::iterate(a, params, nmf::euclidean_step),
            FactorizationKind::NmfKl => nmf::iterate(a, params, nmf::kl_step),
            FactorizationKind::KMeans => {
                kmeans::factorize(a, params.k, params.max_iterations, params.seeding.seed())
            }
        };

        if !all_finite(&result.u) || !all_finite(&result.v) {
            return Err(Error::Processing(format!(
                "{self} factorization produced non-finite values"
            )));
        }
        if params.ordered {
            order(&mut result);
        }

        debug!(
            algorithm = %self,
            rows = m,
            columns = n,
            k = params.k,
            iterations = result.iterations,
            "Factorized term-document matrix"
        );
        Ok(result)
    }
}

/// Sort concepts by descending activity (sum of squares of each V column),
/// applying the same permutation to U and V. Stable on ties.
pub fn order(factorization: &mut Factorization) {
    let activity: Vec<f64> = factorization
        .v
        .columns()
        .into_iter()
        .map(|c| c.dot(&c))
        .collect();
    let mut permutation: Vec<usize> = (0..activity.len()).collect();
    permutation.sort_by(|&a, &b| {
        activity[b]
            .partial_cmp(&activity[a])
            .unwrap_or(Ordering::Equal)
    });

    factorization.u = factorization.u.select(Axis(1), &permutation);
    factorization.v = factorization.v.select(Axis(1), &permutation);
    factorization.aggregates = Some(permutation.iter().map(|&c| activity[c]).collect());
}
