//! # hjm
//!
//! Multi-factor Heath-Jarrow-Morton (HJM) forward-curve modeling for
//! commodity markets.
//!
//! Provides the calibration-and-pricing pipeline: forward-curve snapshots →
//! cross-market log-return extraction → PCA factor calibration → analytic
//! drift-adjusted forward valuation, with no path simulation anywhere.
//!
//! ## Architecture
//!
//! - **`curve`** — [`ForwardCurve`]: maturity ladder + prices, log-linear
//!   interpolation/extrapolation, return extraction, slicing
//! - **`vol`** — [`VolatilityModel`] strategies: exponential (Samuelson)
//!   single-factor and PCA-calibrated multi-factor
//! - **`market`** — [`Market`]: named curve collections (data container only)
//! - **`model`** — [`HjmModel`]: cross-market calibration orchestration and
//!   analytic expected-forward pricing
//!
//! ## Design
//!
//! - **Newtypes for outputs, bare `f64` for inputs.** [`Price`], [`Vol`],
//!   [`Variance`] wrap return values to prevent accidental mixing. Inputs
//!   take raw `f64` for ergonomics — validation happens inside constructors
//!   and calibration entry points.
//! - **No panics.** Every fallible operation returns [`Result`]. Library
//!   code never calls `unwrap()` or `expect()` on runtime values.
//! - **Injected volatility strategies.** The orchestrator owns a
//!   `Box<dyn VolatilityModel>` chosen at construction; it never inspects
//!   the concrete type, only the [`FactorSigma`](vol::FactorSigma) shape.
//! - **Wholesale parameter replacement.** Calibration either installs a
//!   complete new parameter set or leaves the previous one untouched.
//! - **Thread-safe sharing.** Model traits require `Send + Sync`; a
//!   calibrated model can be shared across pricing threads. Calibration
//!   itself takes `&mut self`, so at most one runs per instance.
//! - **Serializable.** Curves, markets, and model parameters implement Serde
//!   `Serialize` / `Deserialize` with validation on deserialization where
//!   invariants exist.
//!
//! ## Example
//!
//! ```
//! use hjm::curve::ForwardCurve;
//! use hjm::market::Market;
//! use hjm::model::HjmModel;
//! use hjm::vol::MultiFactorVolatilityModel;
//!
//! // One market, one curve of daily settlement history.
//! let prices: Vec<f64> = (0..40).map(|i| 50.0 * (0.001 * (i % 7) as f64).exp()).collect();
//! let dates: Vec<f64> = (0..40).map(|i| i as f64).collect();
//!
//! let mut market = Market::new("Power_FR", Some("FR"), "electricity");
//! market.add_forward_curve("base", ForwardCurve::new(dates, prices)?);
//!
//! let mut model = HjmModel::new(Box::new(MultiFactorVolatilityModel::new(1)?));
//! model.add_market(market);
//! model.calibrate()?;
//!
//! let expected = model.forward_dynamics("Power_FR", "base", 0.0, 1.0)?;
//! assert!(expected.0 > 0.0);
//! # Ok::<(), hjm::HjmError>(())
//! ```

pub mod curve;
pub mod error;
pub mod market;
pub mod model;
mod optim;
pub mod types;
mod validate;
pub mod vol;

#[doc(inline)]
pub use curve::ForwardCurve;
#[doc(inline)]
pub use error::{HjmError, Result};
#[doc(inline)]
pub use market::Market;
#[doc(inline)]
pub use model::HjmModel;
#[doc(inline)]
pub use types::{Price, Variance, Vol};
#[doc(inline)]
pub use vol::VolatilityModel;
