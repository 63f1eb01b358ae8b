use scdash_rs::report::{self, ReportOptions};
use scdash_rs::viz::ChartKind;
use scdash_rs::{Axis, Dashboard, FilterSelection, storage};
use std::path::PathBuf;

fn fixture() -> scdash_rs::Dataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/supply_chain_sample.csv");
    storage::load_csv(path).unwrap()
}

#[test]
fn page_has_kpis_and_six_charts() {
    let ds = fixture();
    let sel = FilterSelection::all_of(&ds);
    let dash = Dashboard::build(&ds, &sel);
    let html = report::render_html(&ds, &sel, &dash, &ReportOptions::default()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Supply Chain Management Dashboard"));
    assert!(html.contains("Total Revenue"));
    assert!(html.contains("$73,890"));
    assert!(html.contains("$4,811"));
    assert!(html.contains(">5228<"));
    assert_eq!(html.matches("<svg").count(), 6);
    for kind in ChartKind::ALL {
        assert!(html.contains(&format!("id=\"{}\"", kind.file_stem())));
    }
    assert!(html.contains("Showing 11 of 11 records"));
    assert!(html.contains("<strong>Product Type:</strong> All"));
}

#[test]
fn page_reports_active_filters() {
    let ds = fixture();
    let mut sel = FilterSelection::all_of(&ds);
    sel.set_accepted(Axis::TransportMode, ["Sea", "Air"]);
    sel.set_accepted(Axis::Supplier, Vec::<String>::new());
    let dash = Dashboard::build(&ds, &sel);
    let html = report::render_html(&ds, &sel, &dash, &ReportOptions::default()).unwrap();

    assert!(html.contains("<strong>Transport Mode:</strong> Air, Sea"));
    assert!(html.contains("<strong>Supplier:</strong> None"));
    assert!(html.contains("Showing 0 of 11 records"));
    assert!(html.contains("$0"));
    assert!(html.contains("No data for the current filters"));
}

#[test]
fn custom_titles_are_escaped() {
    let ds = fixture();
    let sel = FilterSelection::all_of(&ds);
    let dash = Dashboard::build(&ds, &sel);
    let opts = ReportOptions {
        title: "Q3 <draft> & notes".into(),
        ..ReportOptions::default()
    };
    let html = report::render_html(&ds, &sel, &dash, &opts).unwrap();
    assert!(html.contains("<h1>Q3 &lt;draft&gt; &amp; notes</h1>"));
}

#[test]
fn write_html_creates_file() {
    let ds = fixture();
    let sel = FilterSelection::all_of(&ds);
    let dash = Dashboard::build(&ds, &sel);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.html");
    report::write_html(&path, &ds, &sel, &dash, &ReportOptions::default()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Generated by scdash on"));
}
