//! Projected BFGS with forward-difference gradients and Armijo backtracking.

use crate::evaluator::{BudgetExhausted, Evaluator, Outcome};
use crate::options::SearchOptions;

const ARMIJO_C1: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;
const CURVATURE_EPS: f64 = 1e-12;

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Forward difference, stepping backward when the upper bound is closer.
///
/// The step is shortened to the room left inside the box, so every
/// evaluated point stays within the bounds.
fn gradient(
    ev: &mut Evaluator<'_>,
    x: &[f64],
    fx: f64,
    fd_step: f64,
) -> Result<Vec<f64>, BudgetExhausted> {
    let mut grad = vec![0.0; x.len()];
    let mut trial = x.to_vec();
    for i in 0..x.len() {
        let (low, high) = ev.bounds()[i];
        let nominal = fd_step * x[i].abs().max(1.0);
        let up = high - x[i];
        let down = x[i] - low;
        let (forward, h) = if up >= nominal {
            (true, nominal)
        } else if down >= nominal {
            (false, nominal)
        } else if up >= down {
            (true, up)
        } else {
            (false, down)
        };
        if h <= 0.0 {
            continue;
        }
        trial[i] = if forward {
            (x[i] + h).min(high)
        } else {
            (x[i] - h).max(low)
        };
        let f_trial = ev.eval(&trial)?;
        trial[i] = x[i];
        grad[i] = if forward {
            (f_trial - fx) / h
        } else {
            (fx - f_trial) / h
        };
        if !grad[i].is_finite() {
            grad[i] = 0.0;
        }
    }
    Ok(grad)
}

fn at_lower(ev: &Evaluator<'_>, x: &[f64], i: usize) -> bool {
    x[i] <= ev.bounds()[i].0
}

fn at_upper(ev: &Evaluator<'_>, x: &[f64], i: usize) -> bool {
    x[i] >= ev.bounds()[i].1
}

fn projected_gradient(ev: &Evaluator<'_>, x: &[f64], grad: &[f64]) -> Vec<f64> {
    grad.iter()
        .enumerate()
        .map(|(i, g)| {
            if (at_lower(ev, x, i) && *g > 0.0) || (at_upper(ev, x, i) && *g < 0.0) {
                0.0
            } else {
                *g
            }
        })
        .collect()
}

/// Zeroes direction components that would leave the box from an active bound.
fn drop_blocked(ev: &Evaluator<'_>, x: &[f64], dir: &mut [f64]) {
    for (i, d) in dir.iter_mut().enumerate() {
        if (at_lower(ev, x, i) && *d < 0.0) || (at_upper(ev, x, i) && *d > 0.0) {
            *d = 0.0;
        }
    }
}

fn update_inverse_hessian(h: &mut [Vec<f64>], s: &[f64], y: &[f64]) {
    let sy = dot(s, y);
    if sy <= CURVATURE_EPS {
        return;
    }
    let rho = 1.0 / sy;
    let hy: Vec<f64> = h.iter().map(|row| dot(row, y)).collect();
    let yhy = dot(y, &hy);
    let n = s.len();
    for i in 0..n {
        for j in 0..n {
            h[i][j] += rho * (1.0 + rho * yhy) * s[i] * s[j]
                - rho * (hy[i] * s[j] + s[i] * hy[j]);
        }
    }
}

pub(crate) fn minimize(
    ev: &mut Evaluator<'_>,
    x0: Vec<f64>,
    options: &SearchOptions,
) -> Result<Outcome, BudgetExhausted> {
    let n = x0.len();
    let mut x = x0;
    let mut fx = ev.eval(&x)?;
    let mut grad = gradient(ev, &x, fx, options.fd_step)?;
    let mut inv_hessian = identity(n);

    while ev.iterations < options.max_iter {
        let pg = projected_gradient(ev, &x, &grad);
        if pg.iter().fold(0.0_f64, |acc, g| acc.max(g.abs())) <= options.gtol {
            return Ok(Outcome::converged("projected gradient norm below gtol"));
        }

        let mut dir: Vec<f64> = inv_hessian.iter().map(|row| -dot(row, &grad)).collect();
        drop_blocked(ev, &x, &mut dir);
        if dot(&grad, &dir) >= 0.0 {
            inv_hessian = identity(n);
            dir = pg.iter().map(|g| -g).collect();
            drop_blocked(ev, &x, &mut dir);
        }

        let mut alpha = 1.0;
        let mut accepted = None;
        let mut smallest_change = f64::INFINITY;
        for _ in 0..MAX_BACKTRACKS {
            let mut trial: Vec<f64> = x.iter().zip(&dir).map(|(xi, di)| xi + alpha * di).collect();
            ev.project(&mut trial);
            let f_trial = ev.eval(&trial)?;
            let step: Vec<f64> = trial.iter().zip(&x).map(|(t, xi)| t - xi).collect();
            smallest_change = smallest_change.min((f_trial - fx).abs());
            if f_trial <= fx && f_trial <= fx + ARMIJO_C1 * dot(&grad, &step) {
                accepted = Some((trial, f_trial, step));
                break;
            }
            alpha *= 0.5;
        }
        ev.iterations += 1;

        let Some((x_new, f_new, step)) = accepted else {
            if fx.is_finite() && smallest_change <= options.ftol * fx.abs().max(1.0) {
                return Ok(Outcome::converged("relative reduction of f below ftol"));
            }
            return Ok(Outcome::stopped("line search failed to find a decrease"));
        };

        let grad_new = gradient(ev, &x_new, f_new, options.fd_step)?;
        let y: Vec<f64> = grad_new.iter().zip(&grad).map(|(a, b)| a - b).collect();
        update_inverse_hessian(&mut inv_hessian, &step, &y);

        let previous = fx;
        x = x_new;
        fx = f_new;
        grad = grad_new;
        let scale = previous.abs().max(fx.abs()).max(1.0);
        if previous.is_finite() && previous - fx <= options.ftol * scale {
            return Ok(Outcome::converged("relative reduction of f below ftol"));
        }
    }
    Ok(Outcome::iteration_limit())
}
