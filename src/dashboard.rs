//! Filter + aggregate: everything the dashboard shows, derived from one selection.
//!
//! [`Dashboard::build`] is a pure function of `(dataset, selection)`; call it again whenever
//! the selection changes and drop the previous value.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::models::{FilterSelection, Record};
use crate::stats::{self, CategoryCount, GroupMean, GroupValues, Kpis};

/// One revenue / manufacturing-cost pair, labeled by product type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScatterPoint {
    pub product_type: String,
    pub manufacturing_cost: f64,
    pub revenue: f64,
}

/// Filtered view plus the inputs of every chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    /// Records accepted by the selection (exported separately, not serialized).
    #[serde(skip)]
    pub filtered: Vec<Record>,
    pub total_records: usize,
    pub kpis: Kpis,
    pub revenue_vs_cost: Vec<ScatterPoint>,
    pub stock_by_product: Vec<GroupValues>,
    pub production_by_supplier: Vec<GroupMean>,
    pub shipping_cost_by_carrier: Vec<GroupValues>,
    pub transport_mode_counts: Vec<CategoryCount>,
    pub defect_rate_by_product: Vec<GroupValues>,
}

impl Dashboard {
    pub fn build(dataset: &Dataset, selection: &FilterSelection) -> Self {
        let filtered = dataset.filter(selection);
        Self::from_filtered(dataset.len(), &filtered)
    }

    /// Aggregate an already filtered view. `total_records` is the size of the unfiltered set.
    pub fn from_filtered(total_records: usize, filtered: &[&Record]) -> Self {
        let revenue_vs_cost = filtered
            .iter()
            .map(|r| ScatterPoint {
                product_type: r.product_type.clone(),
                manufacturing_cost: r.manufacturing_cost,
                revenue: r.revenue,
            })
            .collect();

        Self {
            filtered: filtered.iter().map(|r| (*r).clone()).collect(),
            total_records,
            kpis: Kpis::from_records(filtered),
            revenue_vs_cost,
            stock_by_product: stats::group_values(
                filtered,
                |r| r.product_type.as_str(),
                |r| r.stock_level as f64,
            ),
            production_by_supplier: stats::group_means(
                filtered,
                |r| r.supplier_name.as_str(),
                |r| r.production_volume as f64,
            ),
            shipping_cost_by_carrier: stats::group_values(
                filtered,
                |r| r.shipping_carrier.as_str(),
                |r| r.shipping_cost,
            ),
            transport_mode_counts: stats::value_counts(filtered, |r| r.transport_mode.as_str()),
            defect_rate_by_product: stats::group_values(
                filtered,
                |r| r.product_type.as_str(),
                |r| r.defect_rate,
            ),
        }
    }

    /// Number of records that passed the filter.
    pub fn matched(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}
