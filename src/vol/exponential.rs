//! Exponential (Samuelson) volatility model.
//!
//! Commodity forward volatility typically rises as a contract approaches
//! delivery — the Samuelson effect. The model captures this with a
//! 2-parameter exponential decay in time-to-maturity:
//!
//! ```text
//! σ(t, T) = γ · exp(−k · (T − t))
//! ```
//!
//! # References
//! - Samuelson, P. "Proof That Properly Anticipated Prices Fluctuate
//!   Randomly" (1965)

use serde::{Deserialize, Serialize};

use crate::error::{self, HjmError};
use crate::optim::{minimize_2d, SimplexConfig};
use crate::types::Vol;
use crate::validate::{validate_finite, validate_non_negative, validate_positive};
use crate::vol::{CalibrationInput, FactorSigma, VolatilityModel};

/// Single-factor exponential-decay volatility curve.
///
/// # Examples
///
/// ```
/// use hjm::vol::{ExponentialVolatilityModel, VolatilityModel, FactorSigma};
///
/// let model = ExponentialVolatilityModel::new(0.2, 0.1)?;
/// match model.sigma(0.0, 1.0)? {
///     FactorSigma::Scalar(vol) => assert!((vol.0 - 0.2 * (-0.1f64).exp()).abs() < 1e-12),
///     _ => unreachable!(),
/// }
/// # Ok::<(), hjm::HjmError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExponentialVolatilityModel {
    /// Scale γ > 0: volatility at delivery (τ = 0).
    gamma: f64,
    /// Decay rate k: how fast volatility falls with time-to-maturity.
    k: f64,
}

impl ExponentialVolatilityModel {
    /// Create the model from explicit parameters.
    ///
    /// # Errors
    /// Returns [`HjmError::InvalidInput`] unless `gamma` is positive and
    /// finite and `k` is finite. Negative `k` (volatility growing with
    /// horizon) is unusual but permitted.
    pub fn new(gamma: f64, k: f64) -> error::Result<Self> {
        validate_positive(gamma, "gamma")?;
        validate_finite(k, "k")?;
        Ok(Self { gamma, k })
    }

    /// Scale parameter γ.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Decay parameter k.
    pub fn k(&self) -> f64 {
        self.k
    }

    /// Least-squares fit of `(γ, k)` to observed volatility samples.
    ///
    /// Minimizes the sum of squared residuals between `γ·exp(−k·τ)` and the
    /// supplied vols, starting the simplex search from the model's current
    /// parameters. On success the parameter pair is replaced wholesale; on
    /// failure the previous parameters stay in effect.
    ///
    /// # Errors
    /// Returns [`HjmError::InvalidInput`] for mismatched or too-short inputs
    /// and [`HjmError::CalibrationError`] when the optimizer cannot produce
    /// a finite, valid parameter pair.
    fn fit_vol_curve(&mut self, taus: &[f64], vols: &[f64]) -> error::Result<()> {
        if taus.len() != vols.len() {
            return Err(HjmError::InvalidInput {
                message: format!(
                    "time-to-maturity and vol arrays must have equal length, got {} vs {}",
                    taus.len(),
                    vols.len()
                ),
            });
        }
        if taus.len() < 2 {
            return Err(HjmError::InvalidInput {
                message: format!("at least 2 vol samples required, got {}", taus.len()),
            });
        }
        for &tau in taus {
            validate_non_negative(tau, "time to maturity")?;
        }
        for &v in vols {
            validate_positive(v, "observed vol")?;
        }

        #[cfg(feature = "logging")]
        tracing::debug!(
            n_samples = taus.len(),
            gamma0 = self.gamma,
            k0 = self.k,
            "exponential vol calibration started"
        );

        let sse = |[gamma, k]: [f64; 2]| -> f64 {
            if gamma <= 0.0 {
                return f64::MAX;
            }
            taus.iter()
                .zip(vols)
                .map(|(&tau, &v)| {
                    let r = gamma * (-k * tau).exp() - v;
                    r * r
                })
                .sum()
        };

        let steps = [
            (0.5 * self.gamma.abs()).max(0.05),
            (0.5 * self.k.abs()).max(0.05),
        ];
        let result = minimize_2d(sse, [self.gamma, self.k], steps, &SimplexConfig::default());

        let [gamma, k] = result.params;
        if !result.fval.is_finite() || !gamma.is_finite() || !k.is_finite() || gamma <= 0.0 {
            return Err(HjmError::CalibrationError {
                message: format!(
                    "least-squares fit did not converge to valid parameters (gamma={gamma}, k={k})"
                ),
                model: "Exponential",
            });
        }

        #[cfg(feature = "logging")]
        tracing::debug!(gamma, k, sse = result.fval, "exponential vol calibration complete");

        self.gamma = gamma;
        self.k = k;
        Ok(())
    }
}

impl VolatilityModel for ExponentialVolatilityModel {
    fn sigma(&self, t: f64, maturity: f64) -> error::Result<FactorSigma> {
        validate_finite(t, "t")?;
        validate_finite(maturity, "maturity")?;
        let tau = maturity - t;
        Ok(FactorSigma::Scalar(Vol(self.gamma * (-self.k * tau).exp())))
    }

    fn calibrate(&mut self, input: CalibrationInput<'_>) -> error::Result<()> {
        match input {
            CalibrationInput::VolCurve {
                time_to_maturity,
                vols,
            } => self.fit_vol_curve(time_to_maturity, vols),
            CalibrationInput::LogReturns(_) => Err(HjmError::InvalidInput {
                message: "exponential model calibrates from a vol term structure, \
                          not a log-return matrix"
                    .into(),
            }),
        }
    }

    fn n_factors(&self) -> usize {
        1
    }
}
