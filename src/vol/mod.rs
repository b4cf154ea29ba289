//! Volatility models for the HJM forward dynamics.
//!
//! A volatility model answers one question — the instantaneous volatility
//! `σ(t, T)` loading the forward with maturity `T` at time `t` — and owns the
//! calibration that produces its parameters. All models implement the
//! [`VolatilityModel`] trait.
//!
//! ## Models
//!
//! - [`ExponentialVolatilityModel`] — parametric single-factor Samuelson
//!   curve, 2 parameters, least-squares calibrated
//! - [`MultiFactorVolatilityModel`] — k-factor model whose loadings come from
//!   PCA of a log-return matrix

pub mod exponential;
pub mod multi_factor;

pub use exponential::ExponentialVolatilityModel;
pub use multi_factor::MultiFactorVolatilityModel;

use nalgebra::DMatrix;

use crate::error;
use crate::types::{Variance, Vol};

/// Instantaneous volatility at one `(t, T)` point.
///
/// Single-factor models return [`Scalar`](FactorSigma::Scalar); multi-factor
/// models return one entry per factor. Callers that depend on a particular
/// shape must branch — the trait guarantees nothing beyond this enum.
#[derive(Debug, Clone, PartialEq)]
pub enum FactorSigma {
    /// One volatility from a single-factor model.
    Scalar(Vol),
    /// Per-factor volatilities from a multi-factor model.
    Factors(Vec<Vol>),
}

impl FactorSigma {
    /// Accumulated variance over a horizon of length `dt`, treating factors
    /// as orthogonal: `Σᵢ σᵢ² · dt`.
    ///
    /// This is the flat (piecewise-constant-volatility) approximation to
    /// `∫ σ(s, T)² ds` used by the analytic forward expectation.
    pub fn variance_over(&self, dt: f64) -> Variance {
        let sum_sq = match self {
            FactorSigma::Scalar(v) => v.0 * v.0,
            FactorSigma::Factors(vols) => vols.iter().map(|v| v.0 * v.0).sum(),
        };
        Variance(sum_sq * dt)
    }

    /// Number of factors represented.
    pub fn n_factors(&self) -> usize {
        match self {
            FactorSigma::Scalar(_) => 1,
            FactorSigma::Factors(vols) => vols.len(),
        }
    }
}

/// Calibration data for a volatility model.
///
/// Each model variant consumes the input kind it understands and rejects the
/// other with [`HjmError::InvalidInput`](crate::HjmError::InvalidInput):
/// the multi-factor model calibrates from a log-return matrix, the
/// exponential model from an observed term structure of volatilities.
#[derive(Debug, Clone, Copy)]
pub enum CalibrationInput<'a> {
    /// Dense log-return matrix, rows = observations, columns = price series.
    LogReturns(&'a DMatrix<f64>),
    /// Observed volatility samples along the time-to-maturity axis.
    VolCurve {
        /// Time-to-maturity `τ = T − t` of each sample.
        time_to_maturity: &'a [f64],
        /// Observed volatility at each `τ`.
        vols: &'a [f64],
    },
}

/// A volatility model usable by the HJM orchestrator.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a calibrated model can be shared
/// across pricing threads. Calibration mutates parameters in place, so at
/// most one `calibrate` may be in flight per instance — the `&mut self`
/// receiver enforces this at compile time.
///
/// # Calibration state
/// Parameters are replaced wholesale on successful calibration. A failed
/// calibration must leave the previous parameters untouched, never a
/// half-updated mix.
pub trait VolatilityModel: Send + Sync + std::fmt::Debug {
    /// Instantaneous volatility σ(t, T); `T >= t` is assumed, not checked.
    fn sigma(&self, t: f64, maturity: f64) -> error::Result<FactorSigma>;

    /// Update the model parameters from calibration data.
    fn calibrate(&mut self, input: CalibrationInput<'_>) -> error::Result<()>;

    /// Number of factors this model drives the curve with.
    fn n_factors(&self) -> usize;
}
