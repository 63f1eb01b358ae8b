//! scdash_rs
//!
//! A Rust library for filtering, summarizing, and charting supply-chain records.
//! Pairs with the `scdash` CLI (HTML page, chart files, exports) and the `scdash-gui`
//! desktop app.
//!
//! ### Features
//! - Load the supply-chain CSV, dropping rows with missing fields
//! - Filter by product type, supplier, and transportation mode
//! - KPIs (total revenue, total costs, products sold) and per-group chart inputs
//! - Six charts (scatter, box plots, bars) as SVG, PNG, or in-memory buffers
//! - A self-contained HTML dashboard page
//! - Save the filtered view as CSV or the aggregates as JSON
//!
//! ### Example
//! ```no_run
//! use scdash_rs::{Axis, Dashboard, FilterSelection};
//!
//! let dataset = scdash_rs::storage::load_csv("supply_chain_data.csv")?;
//! let mut selection = FilterSelection::all_of(&dataset);
//! selection.set_accepted(Axis::TransportMode, ["Air", "Road"]);
//!
//! let dashboard = Dashboard::build(&dataset, &selection);
//! println!("revenue: {}", scdash_rs::report::format_currency(dashboard.kpis.total_revenue));
//! scdash_rs::viz::plot_all(&dashboard, "charts", "svg", &Default::default())?;
//! scdash_rs::report::write_html(
//!     "dashboard.html",
//!     &dataset,
//!     &selection,
//!     &dashboard,
//!     &Default::default(),
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod models;
pub mod report;
pub mod stats;
pub mod storage;
pub mod viz;

pub use dashboard::{Dashboard, ScatterPoint};
pub use dataset::Dataset;
pub use error::LoadError;
pub use models::{Axis, FilterSelection, Record};
pub use stats::{BoxStats, CategoryCount, GroupMean, GroupValues, Kpis};
