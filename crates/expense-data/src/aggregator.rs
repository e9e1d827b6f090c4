//! Multi-dimensional statistics over parsed expense records.
//!
//! A single pass buckets every amount by month, by year and by label; each
//! bucket is then reduced to sum/max/min, and the global total, averages,
//! top label and month-over-month growth are derived from those buckets.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use expense_core::formatting::format_fixed;
use expense_core::models::{
    BucketStats, ExpenseRecord, MonthKey, MonthOrdering, OrderedMap, StatisticsResult,
};
use tracing::debug;

/// Average reported when there are no records to divide by.
const EMPTY_AVERAGE: &str = "0.00";

// ── Buckets ───────────────────────────────────────────────────────────────────

/// Key → list of amounts, remembering the order keys were first seen.
#[derive(Debug)]
struct Buckets<K> {
    order: Vec<K>,
    amounts: HashMap<K, Vec<f64>>,
}

impl<K> Default for Buckets<K> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            amounts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Buckets<K> {
    /// Append `amount` under `key`, creating the bucket on first sight.
    fn push(&mut self, key: K, amount: f64) {
        match self.amounts.entry(key) {
            Entry::Occupied(mut e) => e.get_mut().push(amount),
            Entry::Vacant(e) => {
                self.order.push(e.key().clone());
                e.insert(vec![amount]);
            }
        }
    }

    /// Keys in first-seen order.
    fn keys(&self) -> Vec<K> {
        self.order.clone()
    }

    fn amounts(&self, key: &K) -> &[f64] {
        self.amounts.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reduce the buckets named by `keys` to sum/max/min, in that order.
    fn stats_for(&self, keys: Vec<K>) -> OrderedMap<K, BucketStats> {
        keys.into_iter()
            .filter_map(|k| BucketStats::from_amounts(self.amounts(&k)).map(|s| (k, s)))
            .collect()
    }
}

// ── StatisticsAggregator ──────────────────────────────────────────────────────

/// Stateless aggregator; the only knob is how month keys are ordered.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsAggregator {
    month_ordering: MonthOrdering,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_month_ordering(month_ordering: MonthOrdering) -> Self {
        Self { month_ordering }
    }

    pub fn month_ordering(&self) -> MonthOrdering {
        self.month_ordering
    }

    /// Compute the full [`StatisticsResult`] for `records`.
    ///
    /// Never fails: an empty slice gives zero totals, empty tables and a
    /// `"0.00"` average.
    pub fn aggregate(&self, records: &[ExpenseRecord]) -> StatisticsResult {
        let mut monthly: Buckets<MonthKey> = Buckets::default();
        let mut yearly: Buckets<i32> = Buckets::default();
        let mut labels: Buckets<String> = Buckets::default();

        for record in records {
            monthly.push(record.month_key(), record.amount);
            yearly.push(record.year, record.amount);
            labels.push(record.label.clone(), record.amount);
        }

        let total_expenses = sum(records.iter().map(|r| r.amount));
        let average_monthly_expense = if records.is_empty() {
            EMPTY_AVERAGE.to_string()
        } else {
            format_fixed(total_expenses / records.len() as f64, 2)
        };

        let mut month_keys = monthly.keys();
        self.month_ordering.sort(&mut month_keys);
        let monthly_stats = monthly.stats_for(month_keys);

        let mut year_keys = yearly.keys();
        year_keys.sort_unstable();
        let yearly_stats = yearly.stats_for(year_keys);

        let label_stats = labels.stats_for(labels.keys());
        let label_averages = label_averages(&labels);
        let highest_expense_label = highest_expense_label(&label_stats);
        let monthly_growth = monthly_growth(&monthly_stats);

        debug!(
            records = records.len(),
            months = monthly_stats.len(),
            years = yearly_stats.len(),
            labels = label_stats.len(),
            ordering = %self.month_ordering,
            "aggregated expense statistics"
        );

        StatisticsResult {
            total_expenses,
            average_monthly_expense,
            monthly_stats,
            yearly_stats,
            label_stats,
            label_averages,
            highest_expense_label,
            monthly_growth,
        }
    }
}

/// Aggregate with the default (chronological) month ordering.
pub fn aggregate(records: &[ExpenseRecord]) -> StatisticsResult {
    StatisticsAggregator::new().aggregate(records)
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Left fold from `0.0`, in iteration order.
fn sum(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc + v)
}

/// Mean amount per label, formatted to two decimals.
fn label_averages(labels: &Buckets<String>) -> OrderedMap<String, String> {
    labels
        .keys()
        .into_iter()
        .map(|label| {
            let amounts = labels.amounts(&label);
            let mean = sum(amounts.iter().copied()) / amounts.len() as f64;
            (label, format_fixed(mean, 2))
        })
        .collect()
}

/// First label (in first-seen order) whose sum strictly exceeds every
/// earlier one and zero; `""` when no label sums above zero.
fn highest_expense_label(label_stats: &OrderedMap<String, BucketStats>) -> String {
    let mut highest_label: &str = "";
    let mut highest_amount = 0.0;
    for (label, stats) in label_stats.iter() {
        if stats.sum > highest_amount {
            highest_amount = stats.sum;
            highest_label = label.as_str();
        }
    }
    highest_label.to_string()
}

/// Percentage change of each month's sum against the month before it in
/// `monthly_stats` order. The first month has no entry; a zero previous sum
/// yields `None`.
fn monthly_growth(
    monthly_stats: &OrderedMap<MonthKey, BucketStats>,
) -> OrderedMap<MonthKey, Option<f64>> {
    let months: Vec<(&MonthKey, &BucketStats)> = monthly_stats.iter().collect();
    months
        .windows(2)
        .map(|pair| {
            let (_, previous) = pair[0];
            let (&month, current) = pair[1];
            let growth = if previous.sum == 0.0 {
                None
            } else {
                Some((current.sum - previous.sum) / previous.sum * 100.0)
            };
            (month, growth)
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
