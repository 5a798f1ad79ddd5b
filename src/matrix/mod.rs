// Dense matrix helpers shared by the VSM, factorization, and clustering stages.

pub mod factorization;
pub mod kmeans;
pub mod nmf;

use ndarray::{Array2, ArrayView1};

/// Scale every column to unit Euclidean length. Zero columns stay zero.
pub fn normalize_columns_l2(matrix: &mut Array2<f64>) {
    for mut column in matrix.columns_mut() {
        let norm = column.dot(&column).sqrt();
        if norm > 0.0 {
            column.mapv_inplace(|x| x / norm);
        }
    }
}

/// Scale every column so its entries sum to 1. Zero columns stay zero.
pub fn normalize_columns_l1(matrix: &mut Array2<f64>) {
    for mut column in matrix.columns_mut() {
        let sum: f64 = column.iter().map(|x| x.abs()).sum();
        if sum > 0.0 {
            column.mapv_inplace(|x| x / sum);
        }
    }
}

/// Cosine similarity; 0 when either vector is zero.
pub fn cosine(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let norms = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if norms > 0.0 {
        a.dot(&b) / norms
    } else {
        0.0
    }
}

/// Frobenius norm of `a - u·vᵗ`.
pub fn approximation_error(a: &Array2<f64>, u: &Array2<f64>, v: &Array2<f64>) -> f64 {
    let approximation = u.dot(&v.t());
    a.iter()
        .zip(approximation.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

pub fn all_finite(matrix: &Array2<f64>) -> bool {
    matrix.iter().all(|x| x.is_finite())
}
