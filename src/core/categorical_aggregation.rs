use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Value;
use crate::core::continuous_binning::sanitize_aggregate_factor;

/// Default ratio between a compressed "Other" bar and the largest remaining bar.
pub const OTHER_LENGTH_RATIO: f64 = 1.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub key: Value,
    pub value: f64,
}

impl CategoryBucket {
    #[must_use]
    pub fn new(key: impl Into<Value>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Counts occurrences per key and returns buckets sorted by count, largest
/// first. Ties keep first-seen order.
#[must_use]
pub fn rollup_counts<I>(keys: I) -> Vec<CategoryBucket>
where
    I: IntoIterator<Item = Value>,
{
    let mut counts: IndexMap<Value, usize> = IndexMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut buckets: Vec<CategoryBucket> = counts
        .into_iter()
        .map(|(key, count)| CategoryBucket {
            key,
            value: count as f64,
        })
        .collect();
    sort_descending(&mut buckets);
    buckets
}

/// Stable sort by bucket value, largest first.
pub fn sort_descending(buckets: &mut [CategoryBucket]) {
    buckets.sort_by(|left, right| right.value.total_cmp(&left.value));
}

/// Number of trailing buckets merged for `factor` over `count` buckets.
///
/// Merging a single bucket gains nothing, so results below 2 become 0.
#[must_use]
pub fn merge_count(count: usize, factor: f64) -> usize {
    let factor = sanitize_aggregate_factor(factor);
    let merged = (factor * count as f64).round() as usize;
    if merged > 1 { merged.min(count) } else { 0 }
}

/// Merges the smallest buckets of a descending-sorted list into one bucket
/// keyed `"Other"`, appended after the retained buckets.
#[must_use]
pub fn aggregate(sorted_buckets: &[CategoryBucket], factor: f64) -> Vec<CategoryBucket> {
    let merged = merge_count(sorted_buckets.len(), factor);
    if merged == 0 {
        return sorted_buckets.to_vec();
    }

    let keep = sorted_buckets.len() - merged;
    let other_value: f64 = sorted_buckets[keep..].iter().map(|bucket| bucket.value).sum();
    trace!(keep, merged, other_value, "categories merged");

    let mut result = Vec::with_capacity(keep + 1);
    result.extend_from_slice(&sorted_buckets[..keep]);
    result.push(CategoryBucket {
        key: Value::other(),
        value: other_value,
    });
    result
}

/// Display hint for an "Other" bucket that dwarfs the rest of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrokenAxis {
    /// Merged value of the "Other" bucket.
    pub actual: f64,
    /// Length the bucket should be drawn with.
    pub display: f64,
}

/// Returns a broken-axis hint when the trailing "Other" bucket exceeds
/// `ratio` times the largest remaining bucket. Values are never altered.
#[must_use]
pub fn broken_axis(buckets: &[CategoryBucket], ratio: f64) -> Option<BrokenAxis> {
    let (last, rest) = buckets.split_last()?;
    if !last.key.is_other() || rest.is_empty() {
        return None;
    }

    let largest = rest
        .iter()
        .map(|bucket| bucket.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let display = ratio * largest;
    (last.value > display).then_some(BrokenAxis {
        actual: last.value,
        display,
    })
}

/// Two-dimensional aggregate: one row per bin, one column per category.
///
/// `rows[bin][category]` lines up with `categories[category]` for every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    categories: Vec<Value>,
    rows: Vec<Vec<f64>>,
}

impl CategoryTable {
    /// Creates an all-zero table.
    #[must_use]
    pub fn zeros(categories: Vec<Value>, bin_count: usize) -> Self {
        let width = categories.len();
        Self {
            categories,
            rows: vec![vec![0.0; width]; bin_count],
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[Value] {
        &self.categories
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn get(&self, bin: usize, category: usize) -> Option<f64> {
        self.rows.get(bin)?.get(category).copied()
    }

    /// Adds `value` to one cell; out-of-range indices are ignored.
    pub fn add(&mut self, bin: usize, category: usize, value: f64) {
        if let Some(cell) = self
            .rows
            .get_mut(bin)
            .and_then(|row| row.get_mut(category))
        {
            *cell += value;
        }
    }

    /// Sum of each category over all bins.
    #[must_use]
    pub fn column_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.categories.len()];
        for row in &self.rows {
            for (total, cell) in totals.iter_mut().zip(row) {
                *total += cell;
            }
        }
        totals
    }

    /// Reorders categories by their total, largest first. Ties keep order.
    #[must_use]
    pub fn sorted_by_total(&self) -> Self {
        let totals = self.column_totals();
        let mut order: Vec<usize> = (0..self.categories.len()).collect();
        order.sort_by(|left, right| totals[*right].total_cmp(&totals[*left]));

        Self {
            categories: order
                .iter()
                .map(|index| self.categories[*index].clone())
                .collect(),
            rows: self
                .rows
                .iter()
                .map(|row| order.iter().map(|index| row[*index]).collect())
                .collect(),
        }
    }

    /// Applies the "Other" merge to the trailing categories of every row at
    /// once, so all bins keep the same column layout.
    #[must_use]
    pub fn aggregate(&self, factor: f64) -> Self {
        let merged = merge_count(self.categories.len(), factor);
        if merged == 0 {
            return self.clone();
        }

        let keep = self.categories.len() - merged;
        let mut categories = self.categories[..keep].to_vec();
        categories.push(Value::other());

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut merged_row = row[..keep].to_vec();
                merged_row.push(row[keep..].iter().sum());
                merged_row
            })
            .collect();

        Self { categories, rows }
    }

    /// Merges the categories with the smallest totals into "Other" while the
    /// retained categories keep their current column order.
    #[must_use]
    pub fn aggregate_by_total(&self, factor: f64) -> Self {
        let merged = merge_count(self.categories.len(), factor);
        if merged == 0 {
            return self.clone();
        }

        let totals = self.column_totals();
        let mut order: Vec<usize> = (0..self.categories.len()).collect();
        order.sort_by(|left, right| totals[*right].total_cmp(&totals[*left]));
        let mut is_merged = vec![false; self.categories.len()];
        for index in &order[order.len() - merged..] {
            is_merged[*index] = true;
        }

        let mut categories: Vec<Value> = self
            .categories
            .iter()
            .zip(&is_merged)
            .filter(|(_, merged)| !**merged)
            .map(|(category, _)| category.clone())
            .collect();
        categories.push(Value::other());

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut merged_row: Vec<f64> = row
                    .iter()
                    .zip(&is_merged)
                    .filter(|(_, merged)| !**merged)
                    .map(|(cell, _)| *cell)
                    .collect();
                merged_row.push(
                    row.iter()
                        .zip(&is_merged)
                        .filter(|(_, merged)| **merged)
                        .map(|(cell, _)| *cell)
                        .sum(),
                );
                merged_row
            })
            .collect();

        Self { categories, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::merge_count;

    #[test]
    fn merge_count_skips_single_bucket_merges() {
        assert_eq!(merge_count(5, 0.5), 3);
        assert_eq!(merge_count(5, 0.2), 0);
        assert_eq!(merge_count(5, 1.0), 5);
        assert_eq!(merge_count(0, 1.0), 0);
        assert_eq!(merge_count(4, f64::NAN), 0);
    }
}
