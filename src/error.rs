//! Error types for the hjm library.
//!
//! All fallible operations return `Result<T, HjmError>` rather than panicking,
//! providing meaningful diagnostics for calibration failures, invalid inputs,
//! and numerical issues.

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, HjmError>;

/// Errors that can occur during curve construction, calibration, and pricing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HjmError {
    /// Volatility-model calibration failed to converge or produced no factors.
    #[error("calibration failed: {message}")]
    CalibrationError {
        message: String,
        /// Model that failed (e.g., "Exponential", "MultiFactor").
        model: &'static str,
    },

    /// Input data is invalid (e.g., mismatched lengths, non-positive price,
    /// a return matrix too small for the requested factor count).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Numerical computation failed (e.g., NaN, degenerate interpolation).
    #[error("numerical error: {message}")]
    NumericalError { message: String },

    /// A market name was looked up that was never registered.
    #[error("unknown market: {name}")]
    UnknownMarket { name: String },

    /// A curve name was looked up in a market that does not hold it.
    #[error("unknown curve {name} in market {market}")]
    UnknownCurve { market: String, name: String },
}
