use serde::{Deserialize, Serialize};

use crate::core::Value;
use crate::error::{RebinError, RebinResult};

/// Ordinal scale that splits a pixel range into one band per category.
///
/// `padding` is the fraction of each step left empty between bands; the same
/// fraction is used on both outer edges and the bands are centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    domain: Vec<Value>,
    range_start: f64,
    range_end: f64,
    padding: f64,
}

impl BandScale {
    pub fn new(domain: Vec<Value>, range: (f64, f64)) -> RebinResult<Self> {
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(RebinError::InvalidData(
                "band scale range must be finite".to_owned(),
            ));
        }
        Ok(Self {
            domain,
            range_start: range.0,
            range_end: range.1,
            padding: 0.0,
        })
    }

    pub fn with_padding(mut self, padding: f64) -> RebinResult<Self> {
        if !padding.is_finite() || !(0.0..1.0).contains(&padding) {
            return Err(RebinError::InvalidData(
                "band padding must be finite and in [0, 1)".to_owned(),
            ));
        }
        self.padding = padding;
        Ok(self)
    }

    #[must_use]
    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Replaces the category list while keeping range and padding.
    #[must_use]
    pub fn with_domain(&self, domain: Vec<Value>) -> Self {
        Self {
            domain,
            ..self.clone()
        }
    }

    /// Distance between the starts of two adjacent bands.
    #[must_use]
    pub fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let denominator = (n - self.padding + 2.0 * self.padding).max(1.0);
        (self.range_end - self.range_start) / denominator
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        (self.step() * (1.0 - self.padding)).abs()
    }

    #[must_use]
    pub fn index_of(&self, key: &Value) -> Option<usize> {
        self.domain.iter().position(|candidate| candidate == key)
    }

    /// Pixel position of the band start for `key`, or `None` when the key is
    /// not part of the current domain.
    #[must_use]
    pub fn position(&self, key: &Value) -> Option<f64> {
        let index = self.index_of(key)?;
        Some(self.position_at(index))
    }

    /// Pixel position of the band start at `index` in the current domain.
    #[must_use]
    pub fn position_at(&self, index: usize) -> f64 {
        let n = self.domain.len() as f64;
        let step = self.step();
        let used = step * (n - self.padding);
        let start = self.range_start + (self.range_end - self.range_start - used) * 0.5;
        let band_start = start + step * index as f64;
        if step < 0.0 {
            band_start - self.bandwidth()
        } else {
            band_start
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BandScale;
    use crate::core::Value;

    fn keys(names: &[&str]) -> Vec<Value> {
        names.iter().map(|name| Value::text(*name)).collect()
    }

    #[test]
    fn bands_without_padding_tile_the_range() {
        let scale = BandScale::new(keys(&["A", "B", "C", "D"]), (0.0, 100.0)).expect("scale");
        assert_eq!(scale.step(), 25.0);
        assert_eq!(scale.bandwidth(), 25.0);
        assert_eq!(scale.position(&Value::text("C")), Some(50.0));
        assert_eq!(scale.position(&Value::text("Z")), None);
    }

    #[test]
    fn padding_is_split_evenly_around_bands() {
        let scale = BandScale::new(keys(&["A", "B"]), (0.0, 110.0))
            .expect("scale")
            .with_padding(0.2)
            .expect("padding");
        // n - p + 2p = 2.2 steps over 110 px.
        assert!((scale.step() - 50.0).abs() <= 1e-9);
        assert!((scale.bandwidth() - 40.0).abs() <= 1e-9);
        assert!((scale.position_at(0) - 10.0).abs() <= 1e-9);
        assert!((scale.position_at(1) - 60.0).abs() <= 1e-9);
    }
}
