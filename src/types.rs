//! Core domain types for forward-curve modeling.
//!
//! These newtypes wrap `f64` to provide compile-time type safety, preventing
//! accidental mixing of prices, volatilities, and variances in pricing code.
//!
//! # Newtype Strategy
//!
//! **Outputs use newtypes** — [`Price`], [`Vol`], [`Variance`] wrap return
//! values so callers can't accidentally feed a variance where a price is
//! expected.
//!
//! **Inputs use bare `f64`** — API methods like `forward(maturity: f64)`
//! accept raw floats for ergonomics. Requiring a wrapper at every call site
//! adds ceremony without meaningful safety (the caller already knows they're
//! passing a maturity). Newtypes guard against *silent* misuse of outputs,
//! while inputs are self-documenting via parameter names.
//!
//! # Why no `Eq` or `Ord`?
//! These types wrap `f64`, which does not implement `Eq` or `Ord` because
//! `NaN` breaks total ordering. We derive `PartialEq` and `PartialOrd` only.

use serde::{Deserialize, Serialize};

/// Forward price `F(t, T)` for delivery at maturity `T`.
///
/// # Examples
/// ```
/// use hjm::types::Price;
/// let price = Price(3.3);
/// assert_eq!(price.0, 3.3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Price(pub f64);

/// Instantaneous volatility `σ(t, T)`, annualized.
///
/// A vol of 0.20 represents 20% annualized volatility.
///
/// # Examples
/// ```
/// use hjm::types::Vol;
/// let vol = Vol(0.20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Vol(pub f64);

/// Accumulated variance `σ²·Δt` over a pricing horizon.
///
/// The analytic forward expectation applies the lognormal drift adjustment
/// `exp(-½·Var)`, so variance is the quantity the orchestrator works in.
///
/// # Examples
/// ```
/// use hjm::types::Variance;
/// let var = Variance(0.04); // corresponds to 20% vol over one year
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Variance(pub f64);
