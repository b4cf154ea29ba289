//! Internal optimization utilities for volatility calibration.

/// Configuration for the 2D Nelder-Mead simplex minimizer.
pub(crate) struct SimplexConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence threshold on the largest vertex-to-vertex distance.
    pub diameter_tol: f64,
    /// Convergence threshold on the best-to-worst objective spread.
    pub fvalue_tol: f64,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            max_iter: 500,
            diameter_tol: 1e-10,
            fvalue_tol: 1e-14,
        }
    }
}

/// Result of a 2D Nelder-Mead minimization.
pub(crate) struct SimplexResult {
    /// Best parameter pair found.
    pub params: [f64; 2],
    /// Objective value at the best vertex.
    pub fval: f64,
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Minimize `objective([p, q])` with the Nelder-Mead simplex method in 2D.
///
/// The initial simplex is `start` plus one vertex perturbed along each axis
/// by `steps`. Returns the best vertex found; the caller is responsible for
/// deciding whether the final objective value is acceptable.
pub(crate) fn minimize_2d<F>(
    objective: F,
    start: [f64; 2],
    steps: [f64; 2],
    config: &SimplexConfig,
) -> SimplexResult
where
    F: Fn([f64; 2]) -> f64,
{
    let mut verts = [
        start,
        [start[0] + steps[0], start[1]],
        [start[0], start[1] + steps[1]],
    ];
    let mut fvals = [objective(verts[0]), objective(verts[1]), objective(verts[2])];

    for _ in 0..config.max_iter {
        // Order vertices best-to-worst.
        for i in 0..2 {
            for j in (i + 1)..3 {
                if fvals[j] < fvals[i] {
                    fvals.swap(i, j);
                    verts.swap(i, j);
                }
            }
        }

        let diameter = distance(verts[0], verts[1])
            .max(distance(verts[0], verts[2]))
            .max(distance(verts[1], verts[2]));
        if diameter < config.diameter_tol || fvals[2] - fvals[0] < config.fvalue_tol {
            break;
        }

        // Centroid of the two best vertices.
        let cen = [
            0.5 * (verts[0][0] + verts[1][0]),
            0.5 * (verts[0][1] + verts[1][1]),
        ];

        let reflect = [
            2.0 * cen[0] - verts[2][0],
            2.0 * cen[1] - verts[2][1],
        ];
        let f_reflect = objective(reflect);

        if f_reflect < fvals[0] {
            // Try expanding past the reflection point.
            let expand = [
                cen[0] + 2.0 * (reflect[0] - cen[0]),
                cen[1] + 2.0 * (reflect[1] - cen[1]),
            ];
            let f_expand = objective(expand);
            if f_expand < f_reflect {
                verts[2] = expand;
                fvals[2] = f_expand;
            } else {
                verts[2] = reflect;
                fvals[2] = f_reflect;
            }
        } else if f_reflect < fvals[1] {
            verts[2] = reflect;
            fvals[2] = f_reflect;
        } else {
            // Contract toward the better of (reflection, worst vertex).
            let toward = if f_reflect < fvals[2] { reflect } else { verts[2] };
            let contract = [
                cen[0] + 0.5 * (toward[0] - cen[0]),
                cen[1] + 0.5 * (toward[1] - cen[1]),
            ];
            let f_contract = objective(contract);
            if f_contract < fvals[2].min(f_reflect) {
                verts[2] = contract;
                fvals[2] = f_contract;
            } else {
                // Shrink the whole simplex toward the best vertex.
                for j in 1..3 {
                    verts[j] = [
                        verts[0][0] + 0.5 * (verts[j][0] - verts[0][0]),
                        verts[0][1] + 0.5 * (verts[j][1] - verts[0][1]),
                    ];
                    fvals[j] = objective(verts[j]);
                }
            }
        }
    }

    let mut best = 0;
    for i in 1..3 {
        if fvals[i] < fvals[best] {
            best = i;
        }
    }
    SimplexResult {
        params: verts[best],
        fval: fvals[best],
    }
}
