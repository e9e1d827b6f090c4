use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A single expense parsed from free text such as `12.50 - Food (01/02/21)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRecord {
    /// Amount as written in the source text (at most two fractional digits).
    pub amount: f64,
    /// Category name with surrounding whitespace removed. Case-sensitive.
    pub label: String,
    /// Day of month exactly as written; not validated against the calendar.
    pub day: u32,
    /// Month exactly as written; not validated against the calendar.
    pub month: u32,
    /// Four-digit year, `2000 + YY`.
    pub year: i32,
}

impl ExpenseRecord {
    /// Key of the monthly bucket this record belongs to.
    pub fn month_key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }
}

// ── MonthKey ──────────────────────────────────────────────────────────────────

/// Year/month pair identifying a monthly bucket.
///
/// Displays as `"{year}-{month}"` with the month *not* zero-padded, so the
/// text of `2021-9` sorts after `2021-10`. The derived `Ord` is numeric
/// (chronological).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── MonthOrdering ─────────────────────────────────────────────────────────────

/// How month keys are ordered for the monthly table and growth calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MonthOrdering {
    /// Numeric `(year, month)` order.
    #[default]
    Chronological,
    /// Plain string order of the unpadded `"{year}-{month}"` text, so
    /// `"2021-10"` comes before `"2021-9"`.
    Lexicographic,
}

impl MonthOrdering {
    /// Sort `keys` in place according to this ordering.
    pub fn sort(self, keys: &mut [MonthKey]) {
        match self {
            MonthOrdering::Chronological => keys.sort(),
            MonthOrdering::Lexicographic => keys.sort_by_cached_key(|k| k.to_string()),
        }
    }

    /// Lowercase name used on the command line and in persisted settings.
    pub fn as_str(self) -> &'static str {
        match self {
            MonthOrdering::Chronological => "chronological",
            MonthOrdering::Lexicographic => "lexicographic",
        }
    }
}

impl fmt::Display for MonthOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── BucketStats ───────────────────────────────────────────────────────────────

/// Sum, maximum and minimum of the amounts collected under one bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketStats {
    pub sum: f64,
    pub max: f64,
    pub min: f64,
}

impl BucketStats {
    /// Reduce a list of amounts with a full scan.
    ///
    /// Returns `None` for an empty list; buckets are only ever created by
    /// pushing a value, so the aggregator never hits that case.
    pub fn from_amounts(amounts: &[f64]) -> Option<Self> {
        let (&first, rest) = amounts.split_first()?;
        let init = BucketStats {
            sum: first,
            max: first,
            min: first,
        };
        Some(rest.iter().fold(init, |acc, &v| BucketStats {
            sum: acc.sum + v,
            max: acc.max.max(v),
            min: acc.min.min(v),
        }))
    }
}

// ── OrderedMap ────────────────────────────────────────────────────────────────

/// Small insertion-ordered map used for the keyed statistics tables.
///
/// Serialises as a JSON object whose keys keep the stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, V> OrderedMap<K, V> {
    /// Look up the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }
}

impl<K, V> OrderedMap<K, V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, value)` pairs in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ── StatisticsResult ──────────────────────────────────────────────────────────

/// Everything the renderers need, recomputed from scratch on every run.
///
/// Field names serialise in camelCase (`totalExpenses`, `monthlyGrowth`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResult {
    /// Sum of every amount.
    pub total_expenses: f64,
    /// Mean of every amount (not of the monthly sums), two decimals.
    /// `"0.00"` when there are no records.
    pub average_monthly_expense: String,
    /// Per-month sum/max/min, in the configured month ordering.
    pub monthly_stats: OrderedMap<MonthKey, BucketStats>,
    /// Per-year sum/max/min, ascending by year.
    pub yearly_stats: OrderedMap<i32, BucketStats>,
    /// Per-label sum/max/min, in first-seen order.
    pub label_stats: OrderedMap<String, BucketStats>,
    /// Per-label mean amount, two decimals, in first-seen order.
    pub label_averages: OrderedMap<String, String>,
    /// Label with the largest positive sum, or `""`.
    pub highest_expense_label: String,
    /// Percentage change of each month against the previous one.
    /// `None` when the previous month summed to exactly zero.
    pub monthly_growth: OrderedMap<MonthKey, Option<f64>>,
}

impl StatisticsResult {
    /// `true` when no record contributed to this result.
    pub fn is_empty(&self) -> bool {
        self.label_stats.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
