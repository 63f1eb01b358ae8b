//! Public types and constants for the visualization module.

/// Legend placement for the scatter chart (the only chart with a color legend).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMode {
    /// Overlay legend inside the plotting area (may overlap data).
    Inside,
    /// Separate, non-overlapping legend panel on the right side.
    Right,
    /// Separate, non-overlapping legend band at the bottom.
    Bottom,
}

/// Horizontal legend below the chart keeps labels close to the x-axis start.
pub const DEFAULT_LEGEND_MODE: LegendMode = LegendMode::Bottom;

/// The six dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Scatter of revenue against manufacturing cost, colored by product type.
    RevenueVsCost,
    /// Box plot of stock levels per product type.
    StockByProduct,
    /// Bars of mean production volume per supplier.
    ProductionBySupplier,
    /// Box plot of shipping costs per carrier.
    ShippingCostByCarrier,
    /// Bars of record counts per transport mode.
    TransportModeFrequency,
    /// Box plot of defect rates per product type.
    DefectRateByProduct,
}

impl ChartKind {
    /// Dashboard order: row 1 scatter, rows 2 and 3 in pairs, row 4 defect rates.
    pub const ALL: [ChartKind; 6] = [
        ChartKind::RevenueVsCost,
        ChartKind::StockByProduct,
        ChartKind::ProductionBySupplier,
        ChartKind::ShippingCostByCarrier,
        ChartKind::TransportModeFrequency,
        ChartKind::DefectRateByProduct,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::RevenueVsCost => "Revenue vs Manufacturing Cost by Product",
            ChartKind::StockByProduct => "Stock Levels by Product Type",
            ChartKind::ProductionBySupplier => "Production Volumes by Supplier",
            ChartKind::ShippingCostByCarrier => "Shipping Costs by Carrier",
            ChartKind::TransportModeFrequency => "Transportation Mode Frequency",
            ChartKind::DefectRateByProduct => "Defect Rates by Product Type",
        }
    }

    /// File name stem used when exporting all charts to a directory.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::RevenueVsCost => "revenue_vs_cost",
            ChartKind::StockByProduct => "stock_by_product",
            ChartKind::ProductionBySupplier => "production_by_supplier",
            ChartKind::ShippingCostByCarrier => "shipping_cost_by_carrier",
            ChartKind::TransportModeFrequency => "transport_mode_frequency",
            ChartKind::DefectRateByProduct => "defect_rate_by_product",
        }
    }

    pub(crate) fn axis_titles(&self) -> (&'static str, &'static str) {
        match self {
            ChartKind::RevenueVsCost => ("Manufacturing costs", "Revenue generated"),
            ChartKind::StockByProduct => ("Product type", "Stock levels"),
            ChartKind::ProductionBySupplier => ("Supplier name", "Mean production volume"),
            ChartKind::ShippingCostByCarrier => ("Shipping carrier", "Shipping costs"),
            ChartKind::TransportModeFrequency => ("Mode", "Count"),
            ChartKind::DefectRateByProduct => ("Product type", "Defect rates (%)"),
        }
    }

    /// Charts drawn across the full page width.
    pub fn is_wide(&self) -> bool {
        matches!(self, ChartKind::RevenueVsCost | ChartKind::DefectRateByProduct)
    }
}

/// Canvas size, number locale, and legend placement for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Locale tag for tick labels, e.g. `"en"` or `"de"`.
    pub locale: String,
    pub legend: LegendMode,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            locale: "en".to_string(),
            legend: DEFAULT_LEGEND_MODE,
        }
    }
}
