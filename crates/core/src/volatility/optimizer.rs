//! Derivative-free minimization (Nelder-Mead simplex).

/// Stopping rules for [`minimize`].
#[derive(Debug, Clone)]
pub struct NelderMeadOptions {
    pub max_iterations: usize,
    /// Spread of objective values across the simplex, relative to the best.
    pub f_tolerance: f64,
    /// Largest coordinate distance from the best vertex, relative to its size.
    pub x_tolerance: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5_000,
            f_tolerance: 1e-10,
            x_tolerance: 1e-8,
        }
    }
}

/// Best vertex found by [`minimize`].
#[derive(Debug, Clone)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimize `objective` starting from `start`.
///
/// The initial simplex is `start` plus one vertex per coordinate displaced by
/// the matching entry of `steps`. Objective values that are `NaN` are treated
/// as `+inf`, so callers can reject infeasible points by returning infinity.
pub fn minimize<F>(objective: F, start: &[f64], steps: &[f64], options: &NelderMeadOptions) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let n = start.len();
    let eval = |x: &[f64]| evaluate(&objective, x);

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(start.to_vec());
    for (i, step) in steps.iter().enumerate().take(n) {
        let mut vertex = start.to_vec();
        vertex[i] += step;
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v.as_slice())).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        sort_simplex(&mut simplex, &mut values);
        if has_converged(&simplex, &values, options) {
            converged = true;
            break;
        }
        iterations += 1;

        let centroid = centroid(&simplex[..n]);
        let worst = simplex[n].clone();

        let reflected = toward(&centroid, &worst, -REFLECTION);
        let f_reflected = eval(reflected.as_slice());

        if f_reflected < values[0] {
            let expanded = toward(&centroid, &worst, -EXPANSION);
            let f_expanded = eval(expanded.as_slice());
            if f_expanded < f_reflected {
                simplex[n] = expanded;
                values[n] = f_expanded;
            } else {
                simplex[n] = reflected;
                values[n] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[n - 1] {
            simplex[n] = reflected;
            values[n] = f_reflected;
            continue;
        }

        // Contract outside if the reflection beats the worst vertex, inside otherwise.
        let (contracted, f_contracted, accept) = if f_reflected < values[n] {
            let c = toward(&centroid, &worst, -CONTRACTION);
            let fc = eval(c.as_slice());
            let accept = fc <= f_reflected;
            (c, fc, accept)
        } else {
            let c = toward(&centroid, &worst, CONTRACTION);
            let fc = eval(c.as_slice());
            let accept = fc < values[n];
            (c, fc, accept)
        };

        if accept {
            simplex[n] = contracted;
            values[n] = f_contracted;
            continue;
        }

        let best = simplex[0].clone();
        for i in 1..=n {
            simplex[i] = toward(&best, &simplex[i], SHRINK);
            values[i] = eval(simplex[i].as_slice());
        }
    }

    sort_simplex(&mut simplex, &mut values);
    Minimum {
        point: simplex.swap_remove(0),
        value: values[0],
        iterations,
        converged,
    }
}

fn evaluate<F>(objective: &F, x: &[f64]) -> f64
where
    F: Fn(&[f64]) -> f64,
{
    let v = objective(x);
    if v.is_nan() {
        f64::INFINITY
    } else {
        v
    }
}

/// `origin + t * (x - origin)`.
fn toward(origin: &[f64], x: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(x)
        .map(|(o, xi)| o + t * (xi - o))
        .collect()
}

fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let dim = vertices.first().map_or(0, Vec::len);
    let count = vertices.len() as f64;
    (0..dim)
        .map(|j| vertices.iter().map(|v| v[j]).sum::<f64>() / count)
        .collect()
}

fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

fn has_converged(simplex: &[Vec<f64>], values: &[f64], options: &NelderMeadOptions) -> bool {
    let best = values[0];
    let worst = values[values.len() - 1];
    if !best.is_finite() || !worst.is_finite() {
        return false;
    }
    if worst - best > options.f_tolerance * (1.0 + best.abs()) {
        return false;
    }

    let anchor = &simplex[0];
    simplex[1..].iter().all(|vertex| {
        vertex
            .iter()
            .zip(anchor)
            .all(|(x, a)| (x - a).abs() <= options.x_tolerance * (1.0 + a.abs()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimizes_shifted_quadratic() {
        let objective = |x: &[f64]| (x[0] - 3.0).powi(2) + 2.0 * (x[1] + 1.0).powi(2);
        let result = minimize(objective, &[0.0, 0.0], &[0.5, 0.5], &NelderMeadOptions::default());

        assert!(result.converged);
        assert!((result.point[0] - 3.0).abs() < 1e-4);
        assert!((result.point[1] + 1.0).abs() < 1e-4);
        assert!(result.value < 1e-8);
    }

    #[test]
    fn minimizes_rosenbrock() {
        let objective = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let result = minimize(
            objective,
            &[-1.2, 1.0],
            &[0.1, 0.1],
            &NelderMeadOptions::default(),
        );

        assert!(result.converged);
        assert!((result.point[0] - 1.0).abs() < 1e-3);
        assert!((result.point[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn respects_infeasible_region() {
        // Minimum of the unconstrained quadratic is at -2, outside x >= 0.
        let objective = |x: &[f64]| {
            if x[0] < 0.0 {
                f64::INFINITY
            } else {
                (x[0] + 2.0).powi(2)
            }
        };
        let result = minimize(objective, &[1.0], &[0.5], &NelderMeadOptions::default());

        assert!(result.point[0] >= 0.0);
        assert!(result.point[0] < 1e-3);
    }

    #[test]
    fn nan_is_treated_as_infinity() {
        let objective = |x: &[f64]| if x[0] > 5.0 { f64::NAN } else { (x[0] - 1.0).powi(2) };
        let result = minimize(objective, &[4.0], &[2.0], &NelderMeadOptions::default());

        assert!(result.value.is_finite());
        assert!((result.point[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn reports_non_convergence_when_iterations_exhausted() {
        let objective = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let options = NelderMeadOptions {
            max_iterations: 3,
            ..NelderMeadOptions::default()
        };
        let result = minimize(objective, &[-1.2, 1.0], &[0.1, 0.1], &options);

        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }
}
