//! Forward price curves with log-linear interpolation.
//!
//! A [`ForwardCurve`] stores a maturity ladder and matching forward prices
//! and exposes point queries, cross-sectional log-return extraction, and
//! sub-range slicing. Interpolation happens in log-price space so that
//! interpolated and extrapolated prices stay strictly positive, matching the
//! usual shape assumptions for commodity forward curves.
//!
//! # Axis semantics
//!
//! The stored axis is deliberately overloaded: depending on how the curve was
//! populated, `dates` is either the maturity ladder of one snapshot or the
//! observation dates of one rolling contract. [`log_returns`] diffs along the
//! stored axis either way; the calibration pipeline in
//! [`HjmModel`](crate::model::HjmModel) assumes the time-series reading when
//! stacking returns into a PCA input matrix. Integrators must make sure their
//! data matches the semantics they need — the curve itself does not
//! distinguish the two.
//!
//! [`log_returns`]: ForwardCurve::log_returns

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{self, HjmError};
use crate::types::Price;
use crate::validate::{validate_finite, validate_positive};

/// An immutable forward price curve: a maturity ladder plus one price per rung.
///
/// Construction validates the invariant `dates.len() == prices.len()` and that
/// every price is strictly positive and finite (the curve works in log-price
/// space). This is a deliberate tightening over permissive implementations
/// that let `ln` of a bad price poison the interpolant silently.
///
/// The maturity ladder is expected to be strictly increasing by convention;
/// this is not enforced, and a non-monotonic ladder yields correspondingly
/// meaningless interpolation.
///
/// # Examples
///
/// ```
/// use hjm::curve::ForwardCurve;
///
/// let curve = ForwardCurve::new(
///     vec![1.0, 2.0, 3.0, 4.0, 5.0],
///     vec![3.0, 3.1, 3.05, 3.2, 3.3],
/// )?;
///
/// let price = curve.forward(2.5)?;
/// assert!(price.0 > 0.0);
/// # Ok::<(), hjm::HjmError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ForwardCurveRaw", into = "ForwardCurveRaw")]
pub struct ForwardCurve {
    dates: Vec<f64>,
    prices: Vec<f64>,
    /// `ln(prices)`, computed once at construction.
    log_prices: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct ForwardCurveRaw {
    dates: Vec<f64>,
    prices: Vec<f64>,
}

impl TryFrom<ForwardCurveRaw> for ForwardCurve {
    type Error = HjmError;
    fn try_from(raw: ForwardCurveRaw) -> Result<Self, Self::Error> {
        Self::new(raw.dates, raw.prices)
    }
}

impl From<ForwardCurve> for ForwardCurveRaw {
    fn from(curve: ForwardCurve) -> Self {
        Self {
            dates: curve.dates,
            prices: curve.prices,
        }
    }
}

impl ForwardCurve {
    /// Create a forward curve from a numeric maturity ladder and prices.
    ///
    /// Degenerate ladders (zero or one point) are accepted — they can arise
    /// from aggressive [`slice`](ForwardCurve::slice) ranges — but point
    /// queries on them fail with [`HjmError::NumericalError`].
    ///
    /// # Errors
    /// Returns [`HjmError::InvalidInput`] on mismatched lengths, non-finite
    /// dates, or prices that are not strictly positive and finite.
    pub fn new(dates: Vec<f64>, prices: Vec<f64>) -> error::Result<Self> {
        if dates.len() != prices.len() {
            return Err(HjmError::InvalidInput {
                message: format!(
                    "dates and prices must have equal length, got {} vs {}",
                    dates.len(),
                    prices.len()
                ),
            });
        }
        for &d in &dates {
            validate_finite(d, "maturity")?;
        }
        for &p in &prices {
            validate_positive(p, "forward price")?;
        }

        let log_prices = prices.iter().map(|p| p.ln()).collect();
        Ok(Self {
            dates,
            prices,
            log_prices,
        })
    }

    /// Create a forward curve from dated records, e.g. rows of a price table.
    ///
    /// Dates are converted to a real-valued day index (days since 1970-01-01)
    /// before being stored, so curves built from calendar data and curves
    /// built from raw numeric axes share one representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use hjm::curve::ForwardCurve;
    ///
    /// let rows = [
    ///     (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 50.0),
    ///     (NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 50.5),
    ///     (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 51.0),
    /// ];
    /// let curve = ForwardCurve::from_records(&rows)?;
    /// assert_eq!(curve.len(), 3);
    /// # Ok::<(), hjm::HjmError>(())
    /// ```
    ///
    /// # Errors
    /// Same conditions as [`new`](ForwardCurve::new).
    pub fn from_records(records: &[(NaiveDate, f64)]) -> error::Result<Self> {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch date");
        let dates = records
            .iter()
            .map(|(d, _)| d.signed_duration_since(epoch).num_days() as f64)
            .collect();
        let prices = records.iter().map(|&(_, p)| p).collect();
        Self::new(dates, prices)
    }

    /// The stored maturity ladder.
    pub fn dates(&self) -> &[f64] {
        &self.dates
    }

    /// The stored forward prices.
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the curve holds no points.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The last stored maturity, i.e. the terminal delivery of the curve.
    pub fn terminal_maturity(&self) -> Option<f64> {
        self.dates.last().copied()
    }

    /// Forward price at maturity `t`, interpolated log-linearly.
    ///
    /// Between stored maturities the log-price is interpolated linearly, so
    /// the query is exact at every knot. Beyond the stored range the boundary
    /// segment is extended linearly in log space (no flattening), which keeps
    /// extrapolated prices strictly positive.
    ///
    /// # Errors
    /// Returns [`HjmError::NumericalError`] if the curve has fewer than two
    /// points or the interpolated value is not finite (e.g. a collapsed
    /// ladder with duplicate maturities).
    pub fn forward(&self, t: f64) -> error::Result<Price> {
        if self.dates.len() < 2 {
            return Err(HjmError::NumericalError {
                message: format!(
                    "forward query requires at least 2 curve points, got {}",
                    self.dates.len()
                ),
            });
        }
        validate_finite(t, "maturity")?;

        let log_price = self.interpolate_log(t);
        if !log_price.is_finite() {
            return Err(HjmError::NumericalError {
                message: format!("interpolated log-price at {t} is not finite"),
            });
        }
        Ok(Price(log_price.exp()))
    }

    /// Linear interpolation over `(date, ln price)`, extending the first and
    /// last segments beyond the stored range.
    fn interpolate_log(&self, t: f64) -> f64 {
        let n = self.dates.len();
        let seg = if t <= self.dates[0] {
            0
        } else if t >= self.dates[n - 1] {
            n - 2
        } else {
            self.dates.partition_point(|&d| d < t) - 1
        };

        let (d0, d1) = (self.dates[seg], self.dates[seg + 1]);
        let (w0, w1) = (self.log_prices[seg], self.log_prices[seg + 1]);
        let alpha = (t - d0) / (d1 - d0);
        w0 + alpha * (w1 - w0)
    }

    /// Log returns along the stored axis: `ln(p[i+1]) − ln(p[i])` for each
    /// adjacent pair, in stored order. Empty for curves with fewer than two
    /// points.
    ///
    /// See the module docs for the snapshot-vs-time-series axis ambiguity.
    pub fn log_returns(&self) -> Vec<f64> {
        self.log_prices.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Extract an independent sub-curve with points in `[start, end]`
    /// inclusive, preserving the stored order. The source is not mutated and
    /// shares no state with the result.
    ///
    /// # Errors
    /// Returns [`HjmError::InvalidInput`] if either bound is not finite.
    pub fn slice(&self, start: f64, end: f64) -> error::Result<ForwardCurve> {
        validate_finite(start, "slice start")?;
        validate_finite(end, "slice end")?;

        let mut dates = Vec::new();
        let mut prices = Vec::new();
        for (&d, &p) in self.dates.iter().zip(&self.prices) {
            if d >= start && d <= end {
                dates.push(d);
                prices.push(p);
            }
        }
        Self::new(dates, prices)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn gas_curve() -> ForwardCurve {
        ForwardCurve::new(
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![3.0, 3.1, 3.05, 3.2, 3.3],
        )
        .unwrap()
    }

    // --- Construction ---

    #[test]
    fn new_valid_curve() {
        let c = gas_curve();
        assert_eq!(c.len(), 5);
        assert!(!c.is_empty());
        assert_eq!(c.terminal_maturity(), Some(5.0));
        assert_eq!(c.dates(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn new_rejects_mismatched_lengths() {
        let r = ForwardCurve::new(vec![1.0, 2.0], vec![3.0]);
        assert!(matches!(r, Err(HjmError::InvalidInput { .. })));
    }

    #[test]
    fn new_rejects_zero_price() {
        let r = ForwardCurve::new(vec![1.0, 2.0], vec![3.0, 0.0]);
        assert!(matches!(r, Err(HjmError::InvalidInput { .. })));
    }

    #[test]
    fn new_rejects_negative_price() {
        let r = ForwardCurve::new(vec![1.0, 2.0], vec![3.0, -1.0]);
        assert!(matches!(r, Err(HjmError::InvalidInput { .. })));
    }

    #[test]
    fn new_rejects_nan_price() {
        let r = ForwardCurve::new(vec![1.0, 2.0], vec![3.0, f64::NAN]);
        assert!(matches!(r, Err(HjmError::InvalidInput { .. })));
    }

    #[test]
    fn new_rejects_nan_date() {
        let r = ForwardCurve::new(vec![1.0, f64::NAN], vec![3.0, 3.1]);
        assert!(matches!(r, Err(HjmError::InvalidInput { .. })));
    }

    #[test]
    fn new_accepts_degenerate_curves() {
        assert!(ForwardCurve::new(vec![], vec![]).unwrap().is_empty());
        assert_eq!(ForwardCurve::new(vec![1.0], vec![3.0]).unwrap().len(), 1);
    }

    #[test]
    fn from_records_converts_to_epoch_days() {
        let rows = [
            (NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(), 50.0),
            (NaiveDate::from_ymd_opt(1970, 1, 11).unwrap(), 51.0),
            (NaiveDate::from_ymd_opt(1970, 2, 1).unwrap(), 52.0),
        ];
        let c = ForwardCurve::from_records(&rows).unwrap();
        assert_eq!(c.dates(), &[0.0, 10.0, 31.0]);
        assert_eq!(c.prices(), &[50.0, 51.0, 52.0]);
    }

    #[test]
    fn from_records_rejects_bad_price() {
        let rows = [
            (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 50.0),
            (NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), -3.0),
        ];
        assert!(matches!(
            ForwardCurve::from_records(&rows),
            Err(HjmError::InvalidInput { .. })
        ));
    }

    // --- Interpolation ---

    #[test]
    fn forward_is_exact_at_knots() {
        let c = gas_curve();
        for (&d, &p) in c.dates().iter().zip(c.prices()) {
            assert_abs_diff_eq!(c.forward(d).unwrap().0, p, epsilon = 1e-12);
        }
    }

    #[test]
    fn forward_interpolates_geometrically_between_knots() {
        let c = gas_curve();
        // Midpoint in log space is the geometric mean of the bracketing prices.
        let expected = (3.0_f64 * 3.1).sqrt();
        assert_abs_diff_eq!(c.forward(1.5).unwrap().0, expected, epsilon = 1e-12);
    }

    #[test]
    fn forward_extrapolates_first_segment_below_range() {
        let c = gas_curve();
        // Log-linear extension of the first segment, one step before the ladder.
        let slope = (3.1_f64.ln() - 3.0_f64.ln()) / 1.0;
        let expected = (3.0_f64.ln() - slope).exp();
        assert_abs_diff_eq!(c.forward(0.0).unwrap().0, expected, epsilon = 1e-12);
    }

    #[test]
    fn forward_extrapolates_last_segment_above_range() {
        let c = gas_curve();
        let slope = (3.3_f64.ln() - 3.2_f64.ln()) / 1.0;
        let expected = (3.3_f64.ln() + 2.0 * slope).exp();
        assert_abs_diff_eq!(c.forward(7.0).unwrap().0, expected, epsilon = 1e-12);
    }

    #[test]
    fn forward_stays_positive_under_deep_extrapolation() {
        let c = gas_curve();
        assert!(c.forward(-50.0).unwrap().0 > 0.0);
        assert!(c.forward(200.0).unwrap().0 > 0.0);
    }

    #[test]
    fn forward_fails_on_degenerate_curve() {
        let single = ForwardCurve::new(vec![1.0], vec![3.0]).unwrap();
        assert!(matches!(
            single.forward(1.0),
            Err(HjmError::NumericalError { .. })
        ));
    }

    #[test]
    fn forward_rejects_nan_query() {
        let c = gas_curve();
        assert!(c.forward(f64::NAN).is_err());
    }

    // --- Log returns ---

    #[test]
    fn log_returns_reconstruct_prices() {
        let c = gas_curve();
        let returns = c.log_returns();
        assert_eq!(returns.len(), c.len() - 1);

        let mut log_p = c.prices()[0].ln();
        let mut rebuilt = vec![c.prices()[0]];
        for r in &returns {
            log_p += r;
            rebuilt.push(log_p.exp());
        }
        for (a, b) in rebuilt.iter().zip(c.prices()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn log_returns_empty_for_short_curves() {
        assert!(ForwardCurve::new(vec![], vec![]).unwrap().log_returns().is_empty());
        assert!(ForwardCurve::new(vec![1.0], vec![3.0])
            .unwrap()
            .log_returns()
            .is_empty());
    }

    // --- Slicing ---

    #[test]
    fn slice_is_inclusive_and_ordered() {
        let c = gas_curve();
        let sub = c.slice(2.0, 4.0).unwrap();
        assert_eq!(sub.dates(), &[2.0, 3.0, 4.0]);
        assert_eq!(sub.prices(), &[3.1, 3.05, 3.2]);
    }

    #[test]
    fn slice_does_not_mutate_source() {
        let c = gas_curve();
        let _ = c.slice(2.0, 3.0).unwrap();
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn slice_outside_range_is_empty() {
        let c = gas_curve();
        assert!(c.slice(10.0, 20.0).unwrap().is_empty());
    }

    #[test]
    fn slice_rejects_nan_bounds() {
        let c = gas_curve();
        assert!(c.slice(f64::NAN, 3.0).is_err());
        assert!(c.slice(1.0, f64::NAN).is_err());
    }

    // --- Serde ---

    #[test]
    fn serde_round_trip() {
        let c = gas_curve();
        let json = serde_json::to_string(&c).unwrap();
        let c2: ForwardCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(c.dates(), c2.dates());
        assert_eq!(c.prices(), c2.prices());
        assert_abs_diff_eq!(
            c.forward(2.5).unwrap().0,
            c2.forward(2.5).unwrap().0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn serde_rejects_invalid_payload() {
        let json = r#"{"dates":[1.0,2.0],"prices":[3.0,-1.0]}"#;
        assert!(serde_json::from_str::<ForwardCurve>(json).is_err());
    }
}
