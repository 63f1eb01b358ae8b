use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// One supply-chain row (one product line). Immutable once loaded.
///
/// Field names map to the column headers of the source CSV; extra columns in the file are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    #[serde(rename = "Product type")]
    pub product_type: String,
    #[serde(rename = "Supplier name")]
    pub supplier_name: String,
    #[serde(rename = "Transportation modes")]
    pub transport_mode: String,
    #[serde(rename = "Shipping carriers")]
    pub shipping_carrier: String,
    #[serde(rename = "Manufacturing costs")]
    pub manufacturing_cost: f64,
    #[serde(rename = "Revenue generated")]
    pub revenue: f64,
    #[serde(rename = "Costs")]
    pub costs: f64,
    #[serde(rename = "Number of products sold")]
    pub products_sold: u64,
    #[serde(rename = "Stock levels")]
    pub stock_level: u64,
    #[serde(rename = "Production volumes")]
    pub production_volume: u64,
    #[serde(rename = "Shipping costs")]
    pub shipping_cost: f64,
    /// Percentage in `0..=100`.
    #[serde(rename = "Defect rates")]
    pub defect_rate: f64,
}

/// Column headers a data file must provide.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "Product type",
    "Supplier name",
    "Transportation modes",
    "Shipping carriers",
    "Manufacturing costs",
    "Revenue generated",
    "Costs",
    "Number of products sold",
    "Stock levels",
    "Production volumes",
    "Shipping costs",
    "Defect rates",
];

/// The three categorical columns a dashboard can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    ProductType,
    Supplier,
    TransportMode,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::ProductType, Axis::Supplier, Axis::TransportMode];

    /// Human-readable label, as shown next to the filter controls.
    pub fn label(&self) -> &'static str {
        match self {
            Axis::ProductType => "Product Type",
            Axis::Supplier => "Supplier",
            Axis::TransportMode => "Transport Mode",
        }
    }

    /// Source column header.
    pub fn column(&self) -> &'static str {
        match self {
            Axis::ProductType => "Product type",
            Axis::Supplier => "Supplier name",
            Axis::TransportMode => "Transportation modes",
        }
    }

    pub fn value_of<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Axis::ProductType => &record.product_type,
            Axis::Supplier => &record.supplier_name,
            Axis::TransportMode => &record.transport_mode,
        }
    }
}

/// Accepted category values per axis. A record passes when all three axes accept it,
/// so an empty set on any axis rejects everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    product_types: AHashSet<String>,
    suppliers: AHashSet<String>,
    transport_modes: AHashSet<String>,
}

impl FilterSelection {
    pub fn new<A, B, C>(product_types: A, suppliers: B, transport_modes: C) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            product_types: product_types.into_iter().map(Into::into).collect(),
            suppliers: suppliers.into_iter().map(Into::into).collect(),
            transport_modes: transport_modes.into_iter().map(Into::into).collect(),
        }
    }

    /// Default selection: every value observed in the dataset, on every axis.
    pub fn all_of(dataset: &Dataset) -> Self {
        let mut sel = Self::default();
        for axis in Axis::ALL {
            sel.set_accepted(axis, dataset.observed(axis));
        }
        sel
    }

    pub fn accepted(&self, axis: Axis) -> &AHashSet<String> {
        match axis {
            Axis::ProductType => &self.product_types,
            Axis::Supplier => &self.suppliers,
            Axis::TransportMode => &self.transport_modes,
        }
    }

    fn accepted_mut(&mut self, axis: Axis) -> &mut AHashSet<String> {
        match axis {
            Axis::ProductType => &mut self.product_types,
            Axis::Supplier => &mut self.suppliers,
            Axis::TransportMode => &mut self.transport_modes,
        }
    }

    pub fn accepts(&self, axis: Axis, value: &str) -> bool {
        self.accepted(axis).contains(value)
    }

    /// Replace the accepted values of one axis.
    pub fn set_accepted<I>(&mut self, axis: Axis, values: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        *self.accepted_mut(axis) = values.into_iter().map(Into::into).collect();
    }

    /// Accept or reject a single value. Returns `true` when the selection changed.
    pub fn set(&mut self, axis: Axis, value: &str, accepted: bool) -> bool {
        let set = self.accepted_mut(axis);
        if accepted {
            set.insert(value.to_string())
        } else {
            set.remove(value)
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        Axis::ALL
            .iter()
            .all(|axis| self.accepts(*axis, axis.value_of(record)))
    }

    /// Accepted values of one axis, sorted for stable display.
    pub fn sorted(&self, axis: Axis) -> Vec<&str> {
        let mut values: Vec<&str> = self.accepted(axis).iter().map(String::as_str).collect();
        values.sort_unstable();
        values
    }
}
