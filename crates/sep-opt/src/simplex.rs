//! Nelder-Mead simplex search with every trial vertex clamped into the bounds.

use crate::evaluator::{BudgetExhausted, Evaluator, Outcome};
use crate::options::SearchOptions;

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;
const INITIAL_STEP: f64 = 0.05;

struct Vertex {
    x: Vec<f64>,
    f: f64,
}

fn initial_simplex(ev: &mut Evaluator<'_>, x0: &[f64]) -> Result<Vec<Vertex>, BudgetExhausted> {
    let mut simplex = Vec::with_capacity(x0.len() + 1);
    simplex.push(Vertex {
        x: x0.to_vec(),
        f: ev.eval(x0)?,
    });
    for i in 0..x0.len() {
        let (low, high) = ev.bounds()[i];
        let width = high - low;
        let step = if width.is_finite() {
            INITIAL_STEP * width
        } else {
            INITIAL_STEP * x0[i].abs().max(1.0)
        };
        let mut x = x0.to_vec();
        x[i] = if x0[i] + step <= high {
            x0[i] + step
        } else {
            x0[i] - step
        };
        ev.project(&mut x);
        let f = ev.eval(&x)?;
        simplex.push(Vertex { x, f });
    }
    Ok(simplex)
}

/// `from + coeff * (to - from)`, projected.
fn along(ev: &Evaluator<'_>, from: &[f64], to: &[f64], coeff: f64) -> Vec<f64> {
    let mut x: Vec<f64> = from
        .iter()
        .zip(to)
        .map(|(a, b)| a + coeff * (b - a))
        .collect();
    ev.project(&mut x);
    x
}

pub(crate) fn minimize(
    ev: &mut Evaluator<'_>,
    x0: Vec<f64>,
    options: &SearchOptions,
) -> Result<Outcome, BudgetExhausted> {
    let n = x0.len();
    let mut simplex = initial_simplex(ev, &x0)?;

    loop {
        simplex.sort_by(|a, b| a.f.total_cmp(&b.f));
        let best = &simplex[0];
        let spread = simplex[n].f - best.f;
        let size = simplex
            .iter()
            .flat_map(|vertex| vertex.x.iter().zip(&best.x).map(|(a, b)| (a - b).abs()))
            .fold(0.0_f64, f64::max);
        // inf - inf spreads are NaN and never count as converged
        if spread <= options.ftol && size <= options.xtol {
            return Ok(Outcome::converged("simplex spread below ftol and xtol"));
        }
        if ev.iterations >= options.max_iter {
            return Ok(Outcome::iteration_limit());
        }
        ev.iterations += 1;

        let centroid: Vec<f64> = (0..n)
            .map(|i| simplex[..n].iter().map(|vertex| vertex.x[i]).sum::<f64>() / n as f64)
            .collect();
        let worst_f = simplex[n].f;
        let second_worst_f = simplex[n - 1].f;
        let best_f = simplex[0].f;

        let reflected = along(ev, &centroid, &simplex[n].x, -REFLECT);
        let f_reflected = ev.eval(&reflected)?;

        if f_reflected < best_f {
            let expanded = along(ev, &centroid, &simplex[n].x, -EXPAND);
            let f_expanded = ev.eval(&expanded)?;
            simplex[n] = if f_expanded < f_reflected {
                Vertex {
                    x: expanded,
                    f: f_expanded,
                }
            } else {
                Vertex {
                    x: reflected,
                    f: f_reflected,
                }
            };
            continue;
        }
        if f_reflected < second_worst_f {
            simplex[n] = Vertex {
                x: reflected,
                f: f_reflected,
            };
            continue;
        }

        let (contracted, accept) = if f_reflected < worst_f {
            let x = along(ev, &centroid, &reflected, CONTRACT);
            let f = ev.eval(&x)?;
            (Vertex { x, f }, f <= f_reflected)
        } else {
            let x = along(ev, &centroid, &simplex[n].x, CONTRACT);
            let f = ev.eval(&x)?;
            (Vertex { x, f }, f < worst_f)
        };
        if accept {
            simplex[n] = contracted;
            continue;
        }

        let anchor = simplex[0].x.clone();
        for vertex in simplex.iter_mut().skip(1) {
            vertex.x = along(ev, &anchor, &vertex.x, SHRINK);
            vertex.f = ev.eval(&vertex.x)?;
        }
    }
}
