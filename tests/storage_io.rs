use scdash_rs::models::REQUIRED_COLUMNS;
use scdash_rs::{Dashboard, FilterSelection, LoadError, Record, storage};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/supply_chain_sample.csv")
}

#[test]
fn loads_fixture_and_drops_incomplete_rows() {
    let ds = storage::load_csv(fixture_path()).unwrap();
    assert_eq!(ds.len(), 11);
    assert_eq!(ds.dropped_rows(), 1);
    // SKU10 has an empty Location cell
    assert!(ds.records().iter().all(|r| r.revenue != 2330.97));

    let first = &ds.records()[0];
    assert_eq!(first.product_type, "haircare");
    assert_eq!(first.supplier_name, "Supplier 3");
    assert_eq!(first.shipping_carrier, "Carrier B");
    assert_eq!(first.products_sold, 802);
    assert_eq!(first.stock_level, 58);
    assert_eq!(first.production_volume, 215);
}

#[test]
fn missing_file_is_reported() {
    let err = storage::load_csv("definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, LoadError::FileNotFound { .. }));
}

#[test]
fn missing_column_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_costs.csv");
    let header: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| *c != "Costs")
        .collect();
    fs::write(&path, format!("{}\n", header.join(","))).unwrap();

    match storage::load_csv(&path).unwrap_err() {
        LoadError::MissingColumn { column, .. } => assert_eq!(column, "Costs"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unparsable_number_names_the_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    let text = fs::read_to_string(fixture_path())
        .unwrap()
        .replacen("8661.99", "lots", 1);
    fs::write(&path, text).unwrap();

    match storage::load_csv(&path).unwrap_err() {
        LoadError::InvalidRow { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn byte_order_mark_is_tolerated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bom.csv");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend(fs::read(fixture_path()).unwrap());
    fs::write(&path, bytes).unwrap();
    assert_eq!(storage::load_csv(&path).unwrap().len(), 11);
}

#[test]
fn all_rows_incomplete_gives_empty_dataset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(
        &path,
        format!(
            "{}\nhaircare,Supplier 1,Air,Carrier A,,1,1,1,1,1,1,1\n",
            REQUIRED_COLUMNS.join(",")
        ),
    )
    .unwrap();
    let ds = storage::load_csv(&path).unwrap();
    assert!(ds.is_empty());
    assert_eq!(ds.dropped_rows(), 1);
}

#[test]
fn truncated_row_is_dropped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("truncated.csv");
    let text = fs::read_to_string(fixture_path()).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    let complete = lines.next().unwrap();
    let cut: Vec<&str> = lines.next().unwrap().split(',').take(10).collect();
    fs::write(&path, format!("{header}\n{complete}\n{}\n", cut.join(","))).unwrap();

    let ds = storage::load_csv(&path).unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.dropped_rows(), 1);
}

#[test]
fn save_csv_and_json() {
    let ds = storage::load_csv(fixture_path()).unwrap();
    let dash = Dashboard::build(&ds, &FilterSelection::all_of(&ds));
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("filtered.csv");
    storage::save_csv(&dash.filtered, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("Product type,Supplier name,"));
    assert_eq!(csv_txt.lines().count(), 1 + ds.len());

    let json_path = dir.path().join("aggregates.json");
    storage::save_json(&dash, &json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v["total_records"], 11);
    assert_eq!(v["kpis"]["products_sold"], 5228);
    assert_eq!(v["transport_mode_counts"][0]["category"], "Road");
    assert!(v.get("filtered").is_none());
}

// Cells starting with =, +, -, @ would be evaluated as formulas by spreadsheet apps.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let rec = Record {
        product_type: "=HYPERLINK(\"http://evil\")".into(),
        supplier_name: "+SUM(A1:A9)".into(),
        transport_mode: "@foo".into(),
        shipping_carrier: "-1".into(),
        manufacturing_cost: 1.0,
        revenue: 2.0,
        costs: 3.0,
        products_sold: 4,
        stock_level: 5,
        production_volume: 6,
        shipping_cost: 7.0,
        defect_rate: 0.5,
    };
    let dir = tempdir().unwrap();
    let path = dir.path().join("injection.csv");
    storage::save_csv(&[rec], &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let row = rdr.records().next().expect("one data row expected").unwrap();
    let cell = |name: &str| {
        let idx = headers.iter().position(|h| h == name).expect("header present");
        row.get(idx).unwrap().to_string()
    };

    for (column, content) in [
        ("Product type", "=HYPERLINK"),
        ("Supplier name", "+SUM"),
        ("Transportation modes", "@foo"),
        ("Shipping carriers", "-1"),
    ] {
        let v = cell(column);
        assert!(v.starts_with('\''), "{column} not prefixed: {v}");
        assert!(v.contains(content), "{column} content changed: {v}");
    }
    assert_eq!(cell("Revenue generated"), "2.0");
}
