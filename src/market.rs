//! Named collections of forward curves.
//!
//! A [`Market`] groups the forward curves of one traded commodity in one
//! delivery zone (e.g. French baseload power, TTF gas). It is a pure data
//! container: all algorithmic behavior lives in
//! [`ForwardCurve`](crate::curve::ForwardCurve) and
//! [`HjmModel`](crate::model::HjmModel).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::curve::ForwardCurve;

/// A commodity market holding uniquely named forward curves.
///
/// Curves are stored under name-sorted keys so that iteration order — and
/// therefore the column order of any calibration matrix assembled from this
/// market — is deterministic.
///
/// # Examples
///
/// ```
/// use hjm::curve::ForwardCurve;
/// use hjm::market::Market;
///
/// let mut market = Market::new("Gas_TTF", Some("NL"), "gas");
/// let curve = ForwardCurve::new(vec![1.0, 2.0], vec![3.0, 3.1])?;
/// market.add_forward_curve("M+1", curve);
///
/// assert!(market.get_curve("M+1").is_some());
/// assert!(market.get_curve("M+2").is_none());
/// # Ok::<(), hjm::HjmError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    name: String,
    region: Option<String>,
    commodity: String,
    curves: BTreeMap<String, ForwardCurve>,
}

impl Market {
    /// Create an empty market.
    pub fn new(
        name: impl Into<String>,
        region: Option<&str>,
        commodity: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.map(str::to_owned),
            commodity: commodity.into(),
            curves: BTreeMap::new(),
        }
    }

    /// Market name, the key under which [`HjmModel`](crate::model::HjmModel)
    /// registers this market.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geographic or regulatory region tag, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Commodity tag (e.g. "electricity", "gas").
    pub fn commodity(&self) -> &str {
        &self.commodity
    }

    /// Register a forward curve under `curve_name`, replacing any curve
    /// previously stored under that name.
    pub fn add_forward_curve(&mut self, curve_name: impl Into<String>, curve: ForwardCurve) {
        self.curves.insert(curve_name.into(), curve);
    }

    /// Look up a curve by name. Absence is a valid, silent result — callers
    /// must check, nothing is raised.
    pub fn get_curve(&self, curve_name: &str) -> Option<&ForwardCurve> {
        self.curves.get(curve_name)
    }

    /// Curve names in deterministic (name-sorted) order.
    pub fn list_curves(&self) -> Vec<&str> {
        self.curves.keys().map(String::as_str).collect()
    }

    /// Iterate `(name, curve)` pairs in name-sorted order.
    pub fn curves(&self) -> impl Iterator<Item = (&str, &ForwardCurve)> {
        self.curves.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of curves held.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether the market holds no curves.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}
