// Multiplicative-update NMF variants and their shared iteration driver.

use ndarray::{Array1, Array2, Axis, Zip};

use super::factorization::{Factorization, FactorizationParams, EPSILON};
use super::{approximation_error, normalize_columns_l1};

/// One in-place update of (U, V) for a fixed A.
pub type UpdateStep = fn(&Array2<f64>, &mut Array2<f64>, &mut Array2<f64>);

/// Seed, then apply `step` until the iteration cap or, when
/// `stop_threshold >= 0`, until the relative error decrease falls below it.
pub fn iterate(a: &Array2<f64>, params: &FactorizationParams, step: UpdateStep) -> Factorization {
    let (mut u, mut v) = params.seeding.initialize(a, params.k);
    let tracking = params.stop_threshold >= 0.0;
    let mut errors = Vec::new();
    if tracking {
        errors.push(approximation_error(a, &u, &v));
    }

    let mut iterations = 0;
    while iterations < params.max_iterations {
        step(a, &mut u, &mut v);
        iterations += 1;

        if tracking {
            let current = approximation_error(a, &u, &v);
            let previous = errors.last().copied().unwrap_or(f64::INFINITY);
            errors.push(current);
            if previous <= 0.0 || (previous - current) / previous < params.stop_threshold {
                break;
            }
        }
    }

    Factorization {
        u,
        v,
        iterations,
        approximation_errors: errors,
        aggregates: None,
    }
}

/// Euclidean NMF:
/// `V ← V ⊙ (AᵗU + ε) / (V·UᵗU + ε)`, then `U ← U ⊙ (AV + ε) / (U·VᵗV + ε)`.
pub fn euclidean_step(a: &Array2<f64>, u: &mut Array2<f64>, v: &mut Array2<f64>) {
    let numerator = a.t().dot(&*u);
    let denominator = v.dot(&u.t().dot(&*u));
    multiply_ratio(v, &numerator, &denominator);

    let numerator = a.dot(&*v);
    let denominator = u.dot(&v.t().dot(&*v));
    multiply_ratio(u, &numerator, &denominator);
}

/// Local NMF, KL divergence:
/// `V ← sqrt(V ⊙ (Aε / UVᵗ)ᵗ·U)`, `U ← U ⊙ (Aε / UVᵗ)·V`, then U's columns
/// are L1-normalized.
pub fn local_kl_step(a: &Array2<f64>, u: &mut Array2<f64>, v: &mut Array2<f64>) {
    let ratio = divergence_ratio(a, u, v, EPSILON);
    let update = ratio.t().dot(&*u);
    Zip::from(&mut *v)
        .and(&update)
        .for_each(|x, &r| *x = (*x * r).sqrt());

    let ratio = divergence_ratio(a, u, v, EPSILON);
    let update = ratio.dot(&*v);
    Zip::from(&mut *u).and(&update).for_each(|x, &r| *x *= r);
    normalize_columns_l1(u);
}

/// Lee–Seung KL-divergence NMF:
/// `V ← V ⊙ (A / UVᵗ)ᵗ·U ⊘ colsum(U)`, `U ← U ⊙ (A / UVᵗ)·V ⊘ colsum(V)`.
pub fn kl_step(a: &Array2<f64>, u: &mut Array2<f64>, v: &mut Array2<f64>) {
    let ratio = divergence_ratio(a, u, v, 0.0);
    let update = ratio.t().dot(&*u);
    let sums = column_sums(u);
    Zip::from(v.rows_mut())
        .and(update.rows())
        .for_each(|mut row, upd| {
            Zip::from(&mut row)
                .and(&upd)
                .and(&sums)
                .for_each(|x, &r, &s| *x *= r / (s + EPSILON));
        });

    let ratio = divergence_ratio(a, u, v, 0.0);
    let update = ratio.dot(&*v);
    let sums = column_sums(v);
    Zip::from(u.rows_mut())
        .and(update.rows())
        .for_each(|mut row, upd| {
            Zip::from(&mut row)
                .and(&upd)
                .and(&sums)
                .for_each(|x, &r, &s| *x *= r / (s + EPSILON));
        });
}

/// `(A + shift) / (U·Vᵗ + ε)`, element-wise.
fn divergence_ratio(a: &Array2<f64>, u: &Array2<f64>, v: &Array2<f64>, shift: f64) -> Array2<f64> {
    let mut ratio = u.dot(&v.t());
    Zip::from(&mut ratio)
        .and(a)
        .for_each(|r, &x| *r = (x + shift) / (*r + EPSILON));
    ratio
}

fn multiply_ratio(target: &mut Array2<f64>, numerator: &Array2<f64>, denominator: &Array2<f64>) {
    Zip::from(target)
        .and(numerator)
        .and(denominator)
        .for_each(|x, &n, &d| *x *= (n + EPSILON) / (d + EPSILON));
}

fn column_sums(matrix: &Array2<f64>) -> Array1<f64> {
    matrix.sum_axis(Axis(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::factorization::SeedingStrategy;
    use ndarray::array;

    fn params(k: usize, iterations: usize) -> FactorizationParams {
        FactorizationParams {
            k,
            max_iterations: iterations,
            stop_threshold: -1.0,
            seeding: SeedingStrategy::Random { seed: 3 },
            ordered: false,
        }
    }

    #[test]
    fn euclidean_updates_reduce_error() {
        let a = array![[1.0, 0.0, 0.5], [0.0, 1.0, 0.5], [1.0, 1.0, 0.0]];
        let (u0, v0) = SeedingStrategy::Random { seed: 3 }.initialize(&a, 2);
        let before = approximation_error(&a, &u0, &v0);
        let result = iterate(&a, &params(2, 50), euclidean_step);
        assert!(approximation_error(&a, &result.u, &result.v) < before);
    }

    #[test]
    fn local_kl_keeps_basis_columns_l1_normalized() {
        let a = array![[2.0, 0.0], [0.0, 3.0], [1.0, 1.0]];
        let result = iterate(&a, &params(2, 10), local_kl_step);
        for column in result.u.columns() {
            assert!((column.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn early_stop_records_error_history() {
        let a = array![[1.0, 0.0], [0.0, 1.0]];
        let p = FactorizationParams {
            stop_threshold: 0.5,
            ..params(2, 100)
        };
        let result = iterate(&a, &p, euclidean_step);
        assert_eq!(result.approximation_errors.len(), result.iterations + 1);
        assert!(result.iterations < 100);
    }
}
