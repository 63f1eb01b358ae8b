use crate::dashboard::Dashboard;
use crate::dataset::Dataset;
use crate::error::{LoadError, Result as LoadResult};
use crate::models::{REQUIRED_COLUMNS, Record};
use anyhow::Result;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{info, warn};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Cell contents treated as "missing" in addition to blank cells.
const NA_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

/// Load the dataset from a CSV file with a header row.
///
/// Rows with any missing cell are dropped entirely, including rows with fewer cells than the
/// header. A missing file, a missing required column, a row with more cells than the header,
/// or a value that cannot be parsed is an error.
pub fn load_csv<P: AsRef<Path>>(path: P) -> LoadResult<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let dataset = load_reader(file, path)?;
    info!(
        "loaded {} records from {} ({} incomplete rows dropped)",
        dataset.len(),
        path.display(),
        dataset.dropped_rows()
    );
    Ok(dataset)
}

/// Same as [`load_csv`] for any reader; `source` names the input in errors.
pub fn load_reader<R: Read>(reader: R, source: &Path) -> LoadResult<Dataset> {
    let csv_err = |e: csv::Error| LoadError::Csv {
        path: source.to_path_buf(),
        source: e,
    };
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_err)?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(LoadError::EmptyHeader {
            path: source.to_path_buf(),
        });
    }
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                column: column.to_string(),
                path: source.to_path_buf(),
            });
        }
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in rdr.records() {
        let row = row.map_err(csv_err)?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        if row.len() > headers.len() {
            return Err(LoadError::InvalidRow {
                path: source.to_path_buf(),
                line,
                message: format!("{} cells for {} columns", row.len(), headers.len()),
            });
        }
        // Trailing cells absent from a short row count as missing.
        if row.len() < headers.len() || row.iter().any(is_missing) {
            dropped += 1;
            continue;
        }
        let record: Record =
            row.deserialize(Some(&headers))
                .map_err(|e| LoadError::InvalidRow {
                    path: source.to_path_buf(),
                    line,
                    message: e.to_string(),
                })?;
        validate(&record, line, source)?;
        records.push(record);
    }

    if records.is_empty() && dropped > 0 {
        warn!(
            "all {} rows of {} have missing fields; dataset is empty",
            dropped,
            source.display()
        );
    }
    Ok(Dataset::with_dropped(records, dropped))
}

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || NA_MARKERS.contains(&cell)
}

fn validate(r: &Record, line: u64, path: &Path) -> LoadResult<()> {
    let currency = [
        ("Manufacturing costs", r.manufacturing_cost),
        ("Revenue generated", r.revenue),
        ("Costs", r.costs),
        ("Shipping costs", r.shipping_cost),
    ];
    let out_of_range = |column: &'static str, value: f64| LoadError::OutOfRange {
        path: path.to_path_buf(),
        line,
        column,
        value,
    };
    for (column, value) in currency {
        if !value.is_finite() || value < 0.0 {
            return Err(out_of_range(column, value));
        }
    }
    if !(0.0..=100.0).contains(&r.defect_rate) {
        return Err(out_of_range("Defect rates", r.defect_rate));
    }
    Ok(())
}

/// Prefix cells that spreadsheet apps would evaluate as formulas.
fn sanitize_cell(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@', '\t', '\r']) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

/// Save records as CSV with the source column headers.
pub fn save_csv<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(REQUIRED_COLUMNS)?;
    for r in records {
        wtr.serialize((
            sanitize_cell(&r.product_type),
            sanitize_cell(&r.supplier_name),
            sanitize_cell(&r.transport_mode),
            sanitize_cell(&r.shipping_carrier),
            r.manufacturing_cost,
            r.revenue,
            r.costs,
            r.products_sold,
            r.stock_level,
            r.production_volume,
            r.shipping_cost,
            r.defect_rate,
        ))?;
    }
    wtr.flush()?;
    info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Save KPIs and chart inputs as pretty JSON.
pub fn save_json<P: AsRef<Path>>(dashboard: &Dashboard, path: P) -> Result<()> {
    let mut f = File::create(path.as_ref())?;
    let s = serde_json::to_string_pretty(dashboard)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HEADER: &str = "Product type,SKU,Supplier name,Transportation modes,Shipping carriers,Manufacturing costs,Revenue generated,Costs,Number of products sold,Stock levels,Production volumes,Shipping costs,Defect rates";

    #[test]
    fn missing_markers() {
        assert!(is_missing(""));
        assert!(is_missing("  "));
        assert!(is_missing("NaN"));
        assert!(is_missing("null"));
        assert!(is_missing("#N/A N/A"));
        assert!(is_missing("-1.#IND"));
        assert!(is_missing("1.#QNAN"));
        assert!(!is_missing("0"));
        assert!(!is_missing("Nantes"));
    }

    #[test]
    fn drops_rows_with_any_missing_cell() {
        let data = format!(
            "{HEADER}\n\
             haircare,SKU0,Supplier 1,Air,Carrier A,10.5,100.0,50.0,5,7,9,2.5,1.2\n\
             skincare,,Supplier 2,Road,Carrier B,11.0,200.0,60.0,6,8,10,3.5,0.5\n\
             cosmetics,SKU2,Supplier 3,Sea,Carrier C,12.0,NA,70.0,7,9,11,4.5,4.0\n"
        );
        let ds = load_reader(data.as_bytes(), Path::new("inline.csv")).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows(), 2);
        assert_eq!(ds.records()[0].product_type, "haircare");
    }

    #[test]
    fn short_row_is_dropped_and_long_row_rejected() {
        let short = format!(
            "{HEADER}\n\
             haircare,SKU0,Supplier 1,Air,Carrier A,10.5,100.0,50.0,5,7,9,2.5,1.2\n\
             skincare,SKU1,Supplier 2,Road,Carrier B,11.0,200.0\n"
        );
        let ds = load_reader(short.as_bytes(), Path::new("inline.csv")).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows(), 1);

        let long = format!(
            "{HEADER}\nhaircare,SKU0,Supplier 1,Air,Carrier A,10.5,100.0,50.0,5,7,9,2.5,1.2,extra\n"
        );
        let err = load_reader(long.as_bytes(), Path::new("inline.csv")).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRow { line: 2, .. }));
    }

    #[test]
    fn rejects_defect_rate_above_hundred() {
        let data = format!(
            "{HEADER}\nhaircare,SKU0,Supplier 1,Air,Carrier A,10.5,100.0,50.0,5,7,9,2.5,150\n"
        );
        let err = load_reader(data.as_bytes(), Path::new("inline.csv")).unwrap_err();
        assert!(matches!(err, LoadError::OutOfRange { column: "Defect rates", line: 2, .. }));
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let data = format!(
            "{HEADER}\nhaircare,SKU0,Supplier 1,Air,Carrier A,10.5,100.0,50.0,5,7,9,2.5,1.2\n"
        );
        let ds = load_reader(data.as_bytes(), Path::new("inline.csv")).unwrap();
        save_csv(ds.records(), &csvp).unwrap();
        let dash = Dashboard::from_filtered(ds.len(), &ds.records().iter().collect::<Vec<_>>());
        save_json(&dash, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());

        let reloaded = load_csv(&csvp).unwrap();
        assert_eq!(reloaded.records(), ds.records());
    }
}
