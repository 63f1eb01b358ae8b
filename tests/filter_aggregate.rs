use scdash_rs::{Axis, Dashboard, Dataset, FilterSelection, Record};
use std::path::PathBuf;

fn fixture() -> Dataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/supply_chain_sample.csv");
    scdash_rs::storage::load_csv(path).unwrap()
}

fn record(product_type: &str, supplier: &str, mode: &str, revenue: f64) -> Record {
    Record {
        product_type: product_type.into(),
        supplier_name: supplier.into(),
        transport_mode: mode.into(),
        shipping_carrier: "Carrier A".into(),
        manufacturing_cost: 10.0,
        revenue,
        costs: 5.0,
        products_sold: 3,
        stock_level: 20,
        production_volume: 100,
        shipping_cost: 2.5,
        defect_rate: 1.0,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn selecting_one_product_type() {
    let ds = Dataset::from_records(vec![
        record("A", "S1", "Air", 100.0),
        record("B", "S1", "Road", 50.0),
        record("A", "S2", "Air", 25.0),
    ]);
    let sel = FilterSelection::new(["A"], ["S1", "S2"], ["Air", "Road"]);
    let dash = Dashboard::build(&ds, &sel);

    assert_eq!(dash.matched(), 2);
    assert!(approx(dash.kpis.total_revenue, 125.0));
    assert_eq!(dash.transport_mode_counts.len(), 1);
    assert_eq!(dash.transport_mode_counts[0].category, "Air");
    assert_eq!(dash.transport_mode_counts[0].count, 2);
}

#[test]
fn unknown_value_gives_empty_view() {
    let ds = Dataset::from_records(vec![
        record("A", "S1", "Air", 100.0),
        record("B", "S1", "Road", 50.0),
    ]);
    let sel = FilterSelection::new(["Z"], ["S1"], ["Air", "Road"]);
    let dash = Dashboard::build(&ds, &sel);

    assert!(dash.is_empty());
    assert_eq!(dash.kpis.total_revenue, 0.0);
    assert_eq!(dash.kpis.total_costs, 0.0);
    assert_eq!(dash.kpis.products_sold, 0);
    assert!(dash.revenue_vs_cost.is_empty());
    assert!(dash.stock_by_product.is_empty());
    assert!(dash.production_by_supplier.is_empty());
    assert!(dash.shipping_cost_by_carrier.is_empty());
    assert!(dash.transport_mode_counts.is_empty());
    assert!(dash.defect_rate_by_product.is_empty());
}

#[test]
fn full_selection_keeps_every_record() {
    let ds = fixture();
    let dash = Dashboard::build(&ds, &FilterSelection::all_of(&ds));
    assert_eq!(dash.matched(), ds.len());
    assert_eq!(dash.total_records, 11);
    assert!(approx(dash.kpis.total_revenue, 73890.37));
    assert!(approx(dash.kpis.total_costs, 4811.06));
    assert_eq!(dash.kpis.products_sold, 5228);
}

#[test]
fn empty_axis_rejects_everything() {
    let ds = fixture();
    let mut sel = FilterSelection::all_of(&ds);
    sel.set_accepted(Axis::Supplier, Vec::<String>::new());
    assert!(Dashboard::build(&ds, &sel).is_empty());
}

#[test]
fn filtered_records_satisfy_every_axis() {
    let ds = fixture();
    let sel = FilterSelection::new(
        ["haircare", "cosmetics"],
        ["Supplier 3", "Supplier 4", "Supplier 1"],
        ["Road", "Air"],
    );
    let filtered = ds.filter(&sel);
    assert!(!filtered.is_empty());
    for r in &filtered {
        assert!(ds.records().contains(r));
        for axis in Axis::ALL {
            assert!(sel.accepts(axis, axis.value_of(r)));
        }
    }
    // rows 1, 3, 6, 8, 9 of the fixture
    assert_eq!(filtered.len(), 5);
}

#[test]
fn haircare_aggregates() {
    let ds = fixture();
    let mut sel = FilterSelection::all_of(&ds);
    sel.set_accepted(Axis::ProductType, ["haircare"]);
    let dash = Dashboard::build(&ds, &sel);

    assert_eq!(dash.matched(), 3);
    assert!(approx(dash.kpis.total_revenue, 21068.09));
    assert_eq!(dash.kpis.products_sold, 957);

    let suppliers: Vec<(&str, f64)> = dash
        .production_by_supplier
        .iter()
        .map(|g| (g.group.as_str(), g.mean))
        .collect();
    assert_eq!(
        suppliers,
        vec![("Supplier 3", 215.0), ("Supplier 1", 971.0), ("Supplier 4", 104.0)]
    );

    let modes: Vec<(&str, usize)> = dash
        .transport_mode_counts
        .iter()
        .map(|c| (c.category.as_str(), c.count))
        .collect();
    assert_eq!(modes, vec![("Road", 2), ("Air", 1)]);

    assert_eq!(dash.stock_by_product.len(), 1);
    assert_eq!(dash.stock_by_product[0].values, vec![58.0, 1.0, 90.0]);
}

#[test]
fn means_exist_only_for_matching_suppliers() {
    let ds = fixture();
    let mut sel = FilterSelection::all_of(&ds);
    sel.set_accepted(Axis::TransportMode, ["Sea"]);
    let dash = Dashboard::build(&ds, &sel);
    let groups: Vec<&str> = dash
        .production_by_supplier
        .iter()
        .map(|g| g.group.as_str())
        .collect();
    assert_eq!(groups, vec!["Supplier 3", "Supplier 5"]);
    assert!(dash.production_by_supplier.iter().all(|g| g.count >= 1));
}

#[test]
fn mode_counts_sum_to_matched_and_sort_descending() {
    let ds = fixture();
    let dash = Dashboard::build(&ds, &FilterSelection::all_of(&ds));
    let total: usize = dash.transport_mode_counts.iter().map(|c| c.count).sum();
    assert_eq!(total, dash.matched());

    let modes: Vec<(&str, usize)> = dash
        .transport_mode_counts
        .iter()
        .map(|c| (c.category.as_str(), c.count))
        .collect();
    // Rail and Sea tie; Rail appears first in the data.
    assert_eq!(modes, vec![("Road", 4), ("Air", 3), ("Rail", 2), ("Sea", 2)]);
}

#[test]
fn groups_follow_first_appearance() {
    let ds = fixture();
    let dash = Dashboard::build(&ds, &FilterSelection::all_of(&ds));
    let carriers: Vec<&str> = dash
        .shipping_cost_by_carrier
        .iter()
        .map(|g| g.group.as_str())
        .collect();
    assert_eq!(carriers, vec!["Carrier B", "Carrier A", "Carrier C"]);
    let products: Vec<&str> = dash
        .defect_rate_by_product
        .iter()
        .map(|g| g.group.as_str())
        .collect();
    assert_eq!(products, vec!["haircare", "skincare", "cosmetics"]);
}

#[test]
fn toggling_a_value_reports_changes() {
    let ds = fixture();
    let mut sel = FilterSelection::all_of(&ds);
    assert!(!sel.set(Axis::TransportMode, "Air", true));
    assert!(sel.set(Axis::TransportMode, "Air", false));
    assert!(!sel.accepts(Axis::TransportMode, "Air"));
    let dash = Dashboard::build(&ds, &sel);
    assert_eq!(dash.matched(), 8);
    assert!(dash.filtered.iter().all(|r| r.transport_mode != "Air"));
}
