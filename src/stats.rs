use crate::models::Record;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Headline metrics over a set of records.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Kpis {
    pub record_count: usize,
    pub total_revenue: f64,
    pub total_costs: f64,
    pub products_sold: u64,
}

impl Kpis {
    /// Sums over `records`; all zero for an empty slice.
    pub fn from_records(records: &[&Record]) -> Self {
        records.iter().fold(
            Kpis {
                record_count: records.len(),
                ..Kpis::default()
            },
            |mut acc, r| {
                acc.total_revenue += r.revenue;
                acc.total_costs += r.costs;
                acc.products_sold = acc.products_sold.saturating_add(r.products_sold);
                acc
            },
        )
    }
}

/// All values of one category, kept whole so box plots can derive quartiles and outliers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupValues {
    pub group: String,
    pub values: Vec<f64>,
}

impl GroupValues {
    pub fn summary(&self) -> Option<BoxStats> {
        BoxStats::from_values(&self.values)
    }
}

/// Arithmetic mean of one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupMean {
    pub group: String,
    pub count: usize,
    pub mean: f64,
}

/// Number of records carrying one category value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Five-number summary plus Tukey whiskers and outliers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Smallest value not below `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value not above `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let q1 = percentile(&sorted, 0.25);
        let median = percentile(&sorted, 0.50);
        let q3 = percentile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|v| *v >= lower_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= upper_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lower_fence || *v > upper_fence)
            .collect();

        Some(Self {
            count,
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[count - 1],
            mean: sorted.iter().sum::<f64>() / count as f64,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear interpolation between closest ranks; `p` in `0.0..=1.0`, `sorted` non-empty.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let w = rank - lo as f64;
        sorted[lo] * (1.0 - w) + sorted[hi] * w
    }
}

/// Collect `value` per `key`, groups in order of first appearance.
pub fn group_values<K, V>(records: &[&Record], key: K, value: V) -> Vec<GroupValues>
where
    K: Fn(&Record) -> &str,
    V: Fn(&Record) -> f64,
{
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut out: Vec<GroupValues> = Vec::new();
    for &r in records {
        let k = key(r);
        let i = *index.entry(k).or_insert_with(|| {
            out.push(GroupValues {
                group: k.to_string(),
                values: Vec::new(),
            });
            out.len() - 1
        });
        out[i].values.push(value(r));
    }
    out
}

/// Mean of `value` per `key`. Categories without records are absent.
pub fn group_means<K, V>(records: &[&Record], key: K, value: V) -> Vec<GroupMean>
where
    K: Fn(&Record) -> &str,
    V: Fn(&Record) -> f64,
{
    group_values(records, key, value)
        .into_iter()
        .map(|g| GroupMean {
            count: g.values.len(),
            mean: g.values.iter().sum::<f64>() / g.values.len() as f64,
            group: g.group,
        })
        .collect()
}

/// Record count per `key`, most frequent first; ties keep first-appearance order.
pub fn value_counts<K>(records: &[&Record], key: K) -> Vec<CategoryCount>
where
    K: Fn(&Record) -> &str,
{
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut out: Vec<CategoryCount> = Vec::new();
    for &r in records {
        let k = key(r);
        match index.get(k) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(k, out.len());
                out.push(CategoryCount {
                    category: k.to_string(),
                    count: 1,
                });
            }
        }
    }
    // stable sort keeps first appearance for equal counts
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}
