// Spherical k-means over document columns, expressed as a factorization.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::factorization::Factorization;
use super::{approximation_error, normalize_columns_l2};

/// Cluster the L2-normalized columns of `a` around `k` unit centroids.
///
/// U (m×k) holds the centroids, V (n×k) the 0/1 membership of each column.
/// Initial centroids are `k` distinct columns picked by the seeded RNG;
/// iteration ends when no assignment changes. A centroid that loses all its
/// members keeps its previous position.
pub fn factorize(a: &Array2<f64>, k: usize, max_iterations: usize, seed: u64) -> Factorization {
    let (m, n) = a.dim();
    let mut data = a.clone();
    normalize_columns_l2(&mut data);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut picks: Vec<usize> = (0..n).collect();
    for i in 0..k.min(n) {
        let j = rng.random_range(i..n);
        picks.swap(i, j);
    }

    let mut centroids = Array2::zeros((m, k));
    for (c, &doc) in picks.iter().take(k).enumerate() {
        centroids.column_mut(c).assign(&data.column(doc));
    }

    let mut assignment = vec![usize::MAX; n];
    let mut iterations = 0;
    while iterations < max_iterations {
        iterations += 1;

        let similarities = data.t().dot(&centroids);
        let mut changed = false;
        for (doc, row) in similarities.rows().into_iter().enumerate() {
            let mut best = 0;
            for (c, &s) in row.iter().enumerate() {
                if s > row[best] {
                    best = c;
                }
            }
            if assignment[doc] != best {
                assignment[doc] = best;
                changed = true;
            }
        }

        let mut next: Array2<f64> = Array2::zeros((m, k));
        let mut members = vec![0usize; k];
        for (doc, &c) in assignment.iter().enumerate() {
            let mut column = next.column_mut(c);
            column += &data.column(doc);
            members[c] += 1;
        }
        normalize_columns_l2(&mut next);
        for (c, &count) in members.iter().enumerate() {
            if count == 0 {
                next.column_mut(c).assign(&centroids.column(c));
            }
        }
        centroids = next;

        if !changed {
            break;
        }
    }

    let mut v = Array2::zeros((n, k));
    for (doc, &c) in assignment.iter().enumerate() {
        if c < k {
            v[[doc, c]] = 1.0;
        }
    }
    let error = approximation_error(&data, &centroids, &v);

    Factorization {
        u: centroids,
        v,
        iterations,
        approximation_errors: vec![error],
        aggregates: None,
    }
}
