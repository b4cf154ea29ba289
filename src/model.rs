//! The HJM orchestrator: cross-market calibration and analytic pricing.
//!
//! [`HjmModel`] owns one injected [`VolatilityModel`] and a set of
//! [`Market`]s. Calibration pulls log returns from every held curve, aligns
//! the heterogeneous-length series to a rectangular matrix, and hands the
//! matrix to the volatility model. Pricing evaluates the risk-neutral
//! expected forward price analytically — no path simulation:
//!
//! ```text
//! E[F(t₁, T)] = F(t₀, T) · exp(−½ · Var),   Var = Σᵢ σᵢ(t₀, T)² · (t₁ − t₀)
//! ```
//!
//! The variance term is the flat (piecewise-constant-volatility)
//! approximation to `∫ σ(s, T)² ds` over `[t₀, t₁]`.

use std::collections::BTreeMap;

use nalgebra::DMatrix;

use crate::error::{self, HjmError};
use crate::market::Market;
use crate::types::Price;
use crate::validate::validate_finite;
use crate::vol::{CalibrationInput, VolatilityModel};

/// Align variable-length return series into a rectangular matrix.
///
/// Every series is truncated to the minimum length found across the
/// collection, keeping the *trailing* (most recent, in stored order) segment,
/// then stacked as one column each.
///
/// # Errors
/// Returns [`HjmError::InvalidInput`] if the collection is empty or the
/// minimum length is zero (alignment would leave no observations).
pub fn align_trailing(series: &[Vec<f64>]) -> error::Result<DMatrix<f64>> {
    let min_len = series
        .iter()
        .map(Vec::len)
        .min()
        .ok_or_else(|| HjmError::InvalidInput {
            message: "no return series to align".into(),
        })?;
    if min_len == 0 {
        return Err(HjmError::InvalidInput {
            message: "alignment leaves zero observations (a series is empty)".into(),
        });
    }

    Ok(DMatrix::from_fn(min_len, series.len(), |i, j| {
        let s = &series[j];
        s[s.len() - min_len + i]
    }))
}

/// Multi-market HJM model: one volatility model, many markets.
///
/// The volatility strategy is injected at construction as a
/// `Box<dyn VolatilityModel>`, so the orchestrator never branches on a
/// concrete model type.
///
/// # Examples
///
/// ```
/// use hjm::curve::ForwardCurve;
/// use hjm::market::Market;
/// use hjm::model::HjmModel;
/// use hjm::vol::ExponentialVolatilityModel;
///
/// let vol = ExponentialVolatilityModel::new(0.1, 0.0)?;
/// let mut model = HjmModel::new(Box::new(vol));
///
/// let mut gas = Market::new("Gas", None, "gas");
/// gas.add_forward_curve(
///     "winter",
///     ForwardCurve::new(vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![3.0, 3.1, 3.05, 3.2, 3.3])?,
/// );
/// model.add_market(gas);
///
/// let expected = model.forward_dynamics("Gas", "winter", 0.0, 1.0)?;
/// assert!((expected.0 - 3.3 * (-0.005f64).exp()).abs() < 1e-12);
/// # Ok::<(), hjm::HjmError>(())
/// ```
#[derive(Debug)]
pub struct HjmModel {
    vol_model: Box<dyn VolatilityModel>,
    markets: BTreeMap<String, Market>,
}

impl HjmModel {
    /// Create a model around an injected volatility strategy.
    pub fn new(vol_model: Box<dyn VolatilityModel>) -> Self {
        Self {
            vol_model,
            markets: BTreeMap::new(),
        }
    }

    /// Register a market under its own name, replacing any market previously
    /// registered under that name (last write wins).
    pub fn add_market(&mut self, market: Market) {
        self.markets.insert(market.name().to_owned(), market);
    }

    /// Registered markets in name-sorted order.
    pub fn markets(&self) -> impl Iterator<Item = &Market> {
        self.markets.values()
    }

    /// The owned volatility model.
    pub fn vol_model(&self) -> &dyn VolatilityModel {
        self.vol_model.as_ref()
    }

    /// Mutable access to the owned volatility model, e.g. to calibrate the
    /// exponential variant from an external vol term structure.
    pub fn vol_model_mut(&mut self) -> &mut dyn VolatilityModel {
        self.vol_model.as_mut()
    }

    /// Calibrate the volatility model from the log returns of every held
    /// curve.
    ///
    /// Curves with fewer than two points yield no returns and are skipped.
    /// The remaining return series are trailing-aligned to the shortest
    /// length (see [`align_trailing`]) and stacked as columns — ordered by
    /// market name, then curve name — before being handed to the volatility
    /// model.
    ///
    /// # Errors
    /// Returns [`HjmError::InvalidInput`] if no curve yields a usable return
    /// series, and propagates any calibration failure from the volatility
    /// model.
    pub fn calibrate(&mut self) -> error::Result<()> {
        let mut series = Vec::new();
        for market in self.markets.values() {
            for (_, curve) in market.curves() {
                if curve.len() > 1 {
                    series.push(curve.log_returns());
                }
            }
        }
        if series.is_empty() {
            return Err(HjmError::InvalidInput {
                message: "no curve with at least 2 points; nothing to calibrate on".into(),
            });
        }

        let matrix = align_trailing(&series)?;

        #[cfg(feature = "logging")]
        tracing::debug!(
            n_obs = matrix.nrows(),
            n_series = matrix.ncols(),
            "HJM calibration matrix assembled"
        );

        self.vol_model.calibrate(CalibrationInput::LogReturns(&matrix))
    }

    /// Analytic expectation of the forward price at the curve's terminal
    /// maturity `T`, evaluated at `t1` given its value at `t0`.
    ///
    /// Under the driftless risk-neutral assumption the expectation carries
    /// only the lognormal drift adjustment:
    /// `F(t₀, T) · exp(−½ · Σᵢ σᵢ(t₀, T)² · (t₁ − t₀))`. Factor variances are
    /// summed assuming orthogonal factors; scalar models contribute a single
    /// term.
    ///
    /// # Errors
    /// Returns [`HjmError::UnknownMarket`] / [`HjmError::UnknownCurve`] for
    /// unregistered names and [`HjmError::NumericalError`] for curves too
    /// degenerate to price.
    pub fn forward_dynamics(
        &self,
        market_name: &str,
        curve_name: &str,
        t0: f64,
        t1: f64,
    ) -> error::Result<Price> {
        validate_finite(t0, "t0")?;
        validate_finite(t1, "t1")?;

        let curve = self.lookup_curve(market_name, curve_name)?;
        let terminal = curve
            .terminal_maturity()
            .ok_or_else(|| HjmError::NumericalError {
                message: format!("curve {curve_name} in market {market_name} is empty"),
            })?;

        let sigma = self.vol_model.sigma(t0, terminal)?;
        let variance = sigma.variance_over(t1 - t0);
        let f0 = curve.forward(terminal)?;
        Ok(Price(f0.0 * (-0.5 * variance.0).exp()))
    }

    /// Forward price of the curve's terminal delivery.
    ///
    /// `t` is accepted but currently unused: no time evolution is applied,
    /// and the quote is the curve's own interpolated terminal price. This is
    /// a known limitation of the present design, kept as-is.
    pub fn price_forward(
        &self,
        market_name: &str,
        curve_name: &str,
        t: f64,
    ) -> error::Result<Price> {
        validate_finite(t, "t")?;
        let curve = self.lookup_curve(market_name, curve_name)?;
        let terminal = curve
            .terminal_maturity()
            .ok_or_else(|| HjmError::NumericalError {
                message: format!("curve {curve_name} in market {market_name} is empty"),
            })?;
        curve.forward(terminal)
    }

    fn lookup_curve(
        &self,
        market_name: &str,
        curve_name: &str,
    ) -> error::Result<&crate::curve::ForwardCurve> {
        let market = self
            .markets
            .get(market_name)
            .ok_or_else(|| HjmError::UnknownMarket {
                name: market_name.to_owned(),
            })?;
        market.get_curve(curve_name).ok_or_else(|| HjmError::UnknownCurve {
            market: market_name.to_owned(),
            name: curve_name.to_owned(),
        })
    }
}
