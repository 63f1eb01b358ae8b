use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use scdash_rs::report::{self, ReportOptions};
use scdash_rs::viz::{self, ChartOptions, LegendMode};
use scdash_rs::{Axis, Dashboard, Dataset, FilterSelection, GroupValues, storage};

#[derive(Parser, Debug)]
#[command(
    name = "scdash",
    version,
    about = "Filter, summarize & chart supply-chain records"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter the data and write the dashboard page (and optionally charts, exports, stats).
    Render(RenderArgs),
    /// List the values available on each filter axis.
    Values(ValuesArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LegendArg {
    Inside,
    Right,
    Bottom,
}

impl From<LegendArg> for LegendMode {
    fn from(v: LegendArg) -> Self {
        match v {
            LegendArg::Inside => LegendMode::Inside,
            LegendArg::Right => LegendMode::Right,
            LegendArg::Bottom => LegendMode::Bottom,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Supply-chain CSV with a header row.
    #[arg(short, long, default_value = "supply_chain_data.csv")]
    data: PathBuf,
    /// Product types to keep, separated by comma or semicolon (default: all). May be repeated.
    /// Write `\,` or `\;` for a delimiter inside a value. An empty value keeps none.
    #[arg(long)]
    product_types: Option<Vec<String>>,
    /// Supplier names to keep, same syntax as --product-types (default: all).
    #[arg(long)]
    suppliers: Option<Vec<String>>,
    /// Transportation modes to keep, same syntax as --product-types (default: all).
    #[arg(long)]
    modes: Option<Vec<String>>,
    /// Where to write the HTML dashboard page.
    #[arg(long, default_value = "dashboard.html")]
    out: PathBuf,
    /// Also write every chart as a separate file into this directory.
    #[arg(long)]
    charts_dir: Option<PathBuf>,
    /// File format for --charts-dir.
    #[arg(long, value_enum, default_value_t = ChartFormat::Svg)]
    chart_format: ChartFormat,
    /// Width of each chart file (default 800).
    #[arg(long, default_value_t = 800)]
    width: u32,
    /// Height of each chart file (default 500).
    #[arg(long, default_value_t = 500)]
    height: u32,
    /// Locale for axis numbers (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Legend placement of the scatter chart.
    #[arg(long, value_enum, default_value_t = LegendArg::Bottom)]
    legend: LegendArg,
    /// Save the filtered records (.csv) or the aggregates (.json).
    #[arg(long)]
    export: Option<PathBuf>,
    /// Print KPIs and per-group summaries to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct ValuesArgs {
    /// Supply-chain CSV with a header row.
    #[arg(short, long, default_value = "supply_chain_data.csv")]
    data: PathBuf,
}

fn fmt_num(x: f64) -> String {
    if !x.is_finite() {
        return "NA".to_string();
    }
    // Up to 4 decimals, then trim trailing zeros and trailing dot.
    let s = format!("{:.4}", x);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Split every occurrence of a list flag on `,` and `;`; a backslash escapes either.
fn parse_list(occurrences: &[String]) -> Vec<String> {
    let mut items = Vec::new();
    for s in occurrences {
        let mut cur = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(next @ (',' | ';' | '\\')) => cur.push(next),
                    Some(next) => {
                        cur.push('\\');
                        cur.push(next);
                    }
                    None => cur.push('\\'),
                },
                ',' | ';' => items.push(std::mem::take(&mut cur)),
                _ => cur.push(c),
            }
        }
        items.push(cur);
    }
    items
        .into_iter()
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn load(path: &Path) -> Result<Dataset> {
    storage::load_csv(path).with_context(|| format!("failed to load {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Values(args) => cmd_values(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let dataset = load(&args.data)?;

    let mut selection = FilterSelection::all_of(&dataset);
    for (axis, list) in [
        (Axis::ProductType, &args.product_types),
        (Axis::Supplier, &args.suppliers),
        (Axis::TransportMode, &args.modes),
    ] {
        if let Some(list) = list {
            selection.set_accepted(axis, parse_list(list));
        }
    }

    let dashboard = Dashboard::build(&dataset, &selection);
    let legend = LegendMode::from(args.legend);

    let report_opts = ReportOptions {
        locale: args.locale.clone(),
        legend,
        ..ReportOptions::default()
    };
    report::write_html(&args.out, &dataset, &selection, &dashboard, &report_opts)?;
    eprintln!(
        "Wrote dashboard ({} of {} records) to {}",
        dashboard.matched(),
        dashboard.total_records,
        args.out.display()
    );

    if let Some(dir) = args.charts_dir.as_ref() {
        let opts = ChartOptions {
            width: args.width,
            height: args.height,
            locale: args.locale.clone(),
            legend,
        };
        let ext = match args.chart_format {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        };
        let written = viz::plot_all(&dashboard, dir, ext, &opts)?;
        eprintln!("Wrote {} charts to {}", written.len(), dir.display());
    }

    if let Some(path) = args.export.as_ref() {
        let fmt = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv")
            .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&dashboard.filtered, path)?,
            "json" => storage::save_json(&dashboard, path)?,
            other => anyhow::bail!("unsupported export format: {}", other),
        }
        eprintln!("Exported to {}", path.display());
    }

    if args.stats {
        print_stats(&dashboard);
    }
    Ok(())
}

fn print_distribution(title: &str, groups: &[GroupValues]) {
    println!("{title}");
    for g in groups {
        if let Some(s) = g.summary() {
            println!(
                "  {}  count={}  min={} q1={} median={} q3={} max={} mean={} outliers={}",
                g.group,
                s.count,
                fmt_num(s.min),
                fmt_num(s.q1),
                fmt_num(s.median),
                fmt_num(s.q3),
                fmt_num(s.max),
                fmt_num(s.mean),
                s.outliers.len()
            );
        }
    }
}

fn print_stats(dashboard: &Dashboard) {
    let k = &dashboard.kpis;
    println!("Records: {} of {}", dashboard.matched(), dashboard.total_records);
    println!("Total Revenue: {}", report::format_currency(k.total_revenue));
    println!("Total Costs: {}", report::format_currency(k.total_costs));
    println!("Products Sold: {}", k.products_sold);

    print_distribution("Stock levels by product type", &dashboard.stock_by_product);
    println!("Mean production volume by supplier");
    for g in &dashboard.production_by_supplier {
        println!("  {}  count={}  mean={}", g.group, g.count, fmt_num(g.mean));
    }
    print_distribution("Shipping costs by carrier", &dashboard.shipping_cost_by_carrier);
    println!("Transportation modes");
    for c in &dashboard.transport_mode_counts {
        println!("  {}  count={}", c.category, c.count);
    }
    print_distribution("Defect rates by product type", &dashboard.defect_rate_by_product);
}

fn cmd_values(args: ValuesArgs) -> Result<()> {
    let dataset = load(&args.data)?;
    println!(
        "{} records loaded, {} rows dropped for missing fields",
        dataset.len(),
        dataset.dropped_rows()
    );
    for axis in Axis::ALL {
        println!("{}: {}", axis.label(), dataset.observed(axis).join(", "));
    }
    Ok(())
}
