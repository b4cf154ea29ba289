//! Multi-factor volatility model calibrated by principal component analysis.
//!
//! The HJM volatility structure is proxied by the leading principal
//! components of a log-return matrix: each retained eigenvector of the
//! column-wise covariance is one factor loading across the underlying price
//! series, and the matching eigenvalue share is the fraction of curve
//! co-movement that factor explains.
//!
//! # Loadings are not yet wired into `sigma`
//!
//! Calibration computes and exposes the factor loadings and explained
//! variance, but [`sigma`](MultiFactorVolatilityModel::sigma) currently
//! returns an illustrative exponential-decay placeholder replicated across
//! factors. The two are deliberately decoupled: consuming the loadings in
//! the instantaneous-volatility query would change the model's numerical
//! output and is left as an explicit extension point for integrators.

use nalgebra::{DMatrix, SymmetricEigen};
use serde::{Deserialize, Serialize};

use crate::error::{self, HjmError};
use crate::types::Vol;
use crate::validate::validate_finite;
use crate::vol::{CalibrationInput, FactorSigma, VolatilityModel};

/// Decay rate of the placeholder per-factor volatility `exp(−0.5·τ)`.
const PLACEHOLDER_DECAY: f64 = 0.5;

/// Calibrated PCA output: one loading vector per retained factor.
///
/// Replaced wholesale on every successful calibration, so a failed
/// calibration can never leave a half-updated mix of old and new factors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcaLoadings {
    /// Factor loadings, shape `(n_factors, n_series)`: row `i` is the unit
    /// eigenvector of the return covariance for the i-th largest eigenvalue.
    pub components: DMatrix<f64>,
    /// Fraction of total variance attributed to each retained factor, in the
    /// same order as `components` rows, descending.
    pub explained_variance: Vec<f64>,
}

/// k-factor volatility model with PCA-extracted loadings.
///
/// # Examples
///
/// ```
/// use nalgebra::DMatrix;
/// use hjm::vol::{CalibrationInput, MultiFactorVolatilityModel, VolatilityModel};
///
/// let mut model = MultiFactorVolatilityModel::new(2)?;
/// let returns = DMatrix::from_fn(30, 4, |i, j| {
///     ((i * 7 + j * 3) % 11) as f64 * 0.001 - 0.005
/// });
/// model.calibrate(CalibrationInput::LogReturns(&returns))?;
///
/// let loadings = model.loadings().expect("calibrated");
/// assert_eq!(loadings.components.nrows(), 2);
/// assert_eq!(loadings.components.ncols(), 4);
/// # Ok::<(), hjm::HjmError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiFactorVolatilityModel {
    n_factors: usize,
    /// `None` until the first successful calibration.
    loadings: Option<PcaLoadings>,
}

impl MultiFactorVolatilityModel {
    /// Create an uncalibrated model retaining `n_factors` components.
    ///
    /// # Errors
    /// Returns [`HjmError::InvalidInput`] if `n_factors` is zero.
    pub fn new(n_factors: usize) -> error::Result<Self> {
        if n_factors == 0 {
            return Err(HjmError::InvalidInput {
                message: "n_factors must be at least 1".into(),
            });
        }
        Ok(Self {
            n_factors,
            loadings: None,
        })
    }

    /// Calibrated loadings, or `None` before the first calibration.
    pub fn loadings(&self) -> Option<&PcaLoadings> {
        self.loadings.as_ref()
    }

    /// Explained-variance ratios of the retained factors (descending), or
    /// `None` before the first calibration.
    pub fn explained_variance(&self) -> Option<&[f64]> {
        self.loadings.as_ref().map(|l| l.explained_variance.as_slice())
    }

    /// Extract the top `n_factors` principal components of the column-wise
    /// covariance of `returns` (rows = observations, columns = series).
    fn fit_returns(&mut self, returns: &DMatrix<f64>) -> error::Result<()> {
        let (n_obs, n_series) = returns.shape();
        if n_series < self.n_factors {
            return Err(HjmError::InvalidInput {
                message: format!(
                    "PCA needs at least {} return series for {} factors, got {n_series}",
                    self.n_factors, self.n_factors
                ),
            });
        }
        if n_obs < self.n_factors + 1 {
            return Err(HjmError::InvalidInput {
                message: format!(
                    "PCA needs at least {} observations for {} factors, got {n_obs}",
                    self.n_factors + 1,
                    self.n_factors
                ),
            });
        }
        for &x in returns.iter() {
            validate_finite(x, "log return")?;
        }

        #[cfg(feature = "logging")]
        tracing::debug!(n_obs, n_series, n_factors = self.n_factors, "PCA calibration started");

        // Column-centered covariance with the unbiased n−1 divisor.
        let means = returns.row_mean();
        let mut centered = returns.clone();
        for mut row in centered.row_iter_mut() {
            row -= &means;
        }
        let covariance = centered.transpose() * &centered / (n_obs as f64 - 1.0);

        let eigen = SymmetricEigen::new(covariance);
        let total_variance: f64 = eigen.eigenvalues.iter().map(|&l| l.max(0.0)).sum();
        if total_variance <= 0.0 || !total_variance.is_finite() {
            return Err(HjmError::CalibrationError {
                message: "return matrix carries no variance to decompose".into(),
                model: "MultiFactor",
            });
        }

        // Order eigenpairs by descending eigenvalue and keep the top k.
        let mut order: Vec<usize> = (0..n_series).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[b]
                .partial_cmp(&eigen.eigenvalues[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let components = DMatrix::from_fn(self.n_factors, n_series, |i, j| {
            eigen.eigenvectors[(j, order[i])]
        });
        let explained_variance: Vec<f64> = order[..self.n_factors]
            .iter()
            .map(|&i| eigen.eigenvalues[i].max(0.0) / total_variance)
            .collect();

        #[cfg(feature = "logging")]
        tracing::debug!(?explained_variance, "PCA calibration complete");

        self.loadings = Some(PcaLoadings {
            components,
            explained_variance,
        });
        Ok(())
    }
}

impl VolatilityModel for MultiFactorVolatilityModel {
    /// Placeholder per-factor volatility: `exp(−0.5·(T − t))` replicated
    /// across factors. Does **not** consume the calibrated loadings — see the
    /// module docs for why this stays decoupled.
    fn sigma(&self, t: f64, maturity: f64) -> error::Result<FactorSigma> {
        validate_finite(t, "t")?;
        validate_finite(maturity, "maturity")?;
        let tau = maturity - t;
        let per_factor = Vol((-PLACEHOLDER_DECAY * tau).exp());
        Ok(FactorSigma::Factors(vec![per_factor; self.n_factors]))
    }

    fn calibrate(&mut self, input: CalibrationInput<'_>) -> error::Result<()> {
        match input {
            CalibrationInput::LogReturns(returns) => self.fit_returns(returns),
            CalibrationInput::VolCurve { .. } => Err(HjmError::InvalidInput {
                message: "multi-factor model calibrates from a log-return matrix, \
                          not a vol term structure"
                    .into(),
            }),
        }
    }

    fn n_factors(&self) -> usize {
        self.n_factors
    }
}
