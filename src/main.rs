use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::info;
use serde_json::{json, Map, Value};

use salesboard::analysis::{self, SummaryTable};
use salesboard::config::DashboardConfig;
use salesboard::data::filter::{DateRange, SalesFilter};
use salesboard::export;
use salesboard::DashboardSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Section {
    Overview,
    Products,
    Customers,
    Regions,
    Trends,
    Profitability,
    All,
}

/// Print sales reports for the superstore dataset.
#[derive(Debug, Parser)]
#[command(name = "salesboard", version)]
struct Cli {
    /// Report section to print
    #[arg(value_enum, default_value_t = Section::Overview)]
    section: Section,

    /// Data file (.csv, .json or .parquet); overrides SALES_DATA_PATH
    #[arg(long)]
    data: Option<PathBuf>,

    /// Rows in top-N tables; overrides SALES_TOP_N
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Emit JSON instead of text tables
    #[arg(long)]
    json: bool,

    /// Also write every report table as Parquet into this directory
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Keep only these categories (repeatable)
    #[arg(long)]
    category: Vec<String>,

    /// Keep only these regions (repeatable)
    #[arg(long)]
    region: Vec<String>,

    /// Keep only these segments (repeatable)
    #[arg(long)]
    segment: Vec<String>,

    /// First order date to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last order date to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl Cli {
    fn config(&self) -> DashboardConfig {
        let mut config = DashboardConfig::from_env();
        if let Some(path) = &self.data {
            config.data_path = path.clone();
        }
        if let Some(n) = self.top.filter(|&n| n > 0) {
            config.top_n = n;
        }
        config
    }

    fn filter(&self, bounds: Option<DateRange>) -> SalesFilter {
        let mut filter = SalesFilter::all();
        if !self.category.is_empty() {
            filter = filter.categories(self.category.iter().cloned());
        }
        if !self.region.is_empty() {
            filter = filter.regions(self.region.iter().cloned());
        }
        if !self.segment.is_empty() {
            filter = filter.segments(self.segment.iter().cloned());
        }
        if let Some(bounds) = bounds {
            if self.from.is_some() || self.to.is_some() {
                let start = self.from.unwrap_or(bounds.start);
                let end = self.to.unwrap_or(bounds.end);
                filter = filter.between(DateRange::new(start, end));
            }
        }
        filter
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config();
    info!("using data file {}", config.data_path.display());

    let mut session = match DashboardSession::open(&config.data_path) {
        Ok(session) => session,
        Err(e) if e.is_not_found() => {
            eprintln!("Error: data file not found: {}", config.data_path.display());
            eprintln!("Please place your Superstore CSV file at that path,");
            eprintln!("or point SALES_DATA_PATH / --data at it.");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            return Err(
                anyhow::Error::new(e).context(format!("loading {}", config.data_path.display()))
            );
        }
    };

    session.set_filter(cli.filter(session.bounds()));
    if session.is_view_empty() {
        println!("No data for the selected filters.");
        return Ok(ExitCode::SUCCESS);
    }

    let report = build_report(&session, cli.section, config.top_n);
    if cli.json {
        let value = report_json(&session, cli.section, &report)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_report(&session, cli.section, &report)?;
    }
    if let Some(dir) = &cli.export {
        export_tables(dir, &report)?;
    }
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Report assembly
// ---------------------------------------------------------------------------

fn includes(selected: Section, section: Section) -> bool {
    selected == Section::All || selected == section
}

fn build_report(
    session: &DashboardSession,
    section: Section,
    n: usize,
) -> Vec<(&'static str, SummaryTable)> {
    let t = session.view();
    let mut tables = Vec::new();

    if includes(section, Section::Overview) {
        tables.push(("Sales by Category", analysis::sales_by_category(t)));
        tables.push(("Sales by Region", analysis::sales_by_region(t)));
        tables.push(("Sales by Segment", analysis::sales_by_segment(t)));
        tables.push(("Monthly Sales", analysis::monthly_sales(t)));
    }
    if includes(section, Section::Products) {
        tables.push(("Sales by Category", analysis::sales_by_category(t)));
        tables.push(("Top Sub-Categories", analysis::sales_by_subcategory(t, n)));
        tables.push(("Top Products", analysis::top_products(t, n)));
    }
    if includes(section, Section::Customers) {
        tables.push(("Sales by Segment", analysis::sales_by_segment(t)));
        tables.push(("Top Customers", analysis::top_customers(t, n)));
    }
    if includes(section, Section::Regions) {
        tables.push(("Sales by Region", analysis::sales_by_region(t)));
        tables.push(("Top States", analysis::sales_by_state(t, n)));
        tables.push(("Top Cities", analysis::sales_by_city(t, n)));
    }
    if includes(section, Section::Trends) {
        tables.push(("Monthly Sales", analysis::monthly_sales(t)));
        tables.push(("Quarterly Sales", analysis::quarterly_sales(t)));
        tables.push(("Yearly Growth", analysis::yearly_growth(t)));
    }
    if includes(section, Section::Profitability) {
        tables.push(("Profit by Category", analysis::profit_by_category(t)));
        tables.push(("Most Profitable Products", analysis::most_profitable_products(t, n)));
        tables.push(("Loss-Making Products", analysis::loss_making_products(t, n)));
        tables.push(("Sales by Ship Mode", analysis::sales_by_ship_mode(t)));
        tables.push(("Profit by Ship Mode", analysis::profit_by_ship_mode(t)));
    }

    if section == Section::All {
        let mut seen = std::collections::HashSet::new();
        tables.retain(|(title, _)| seen.insert(*title));
    }
    tables
}

fn print_report(
    session: &DashboardSession,
    section: Section,
    tables: &[(&'static str, SummaryTable)],
) -> Result<()> {
    let view = session.view();
    if includes(section, Section::Overview) {
        let m = session.overview();
        println!("== Key Performance Indicators ==");
        println!("Total Sales:      {:.2}", m.total_sales);
        println!("Total Profit:     {:.2}", m.total_profit);
        println!("Total Orders:     {}", m.total_orders);
        println!("Total Customers:  {}", m.total_customers);
        println!("Avg Order Value:  {:.2}", m.avg_order_value);
        println!("Profit Margin:    {:.2}%", m.profit_margin);
        if let Some(range) = analysis::date_range(view) {
            println!("Date Range:       {} to {}", range.start, range.end);
        }
        println!();
    }
    if includes(section, Section::Profitability) {
        let p = analysis::profit_overview(view);
        println!("== Overall Profitability ==");
        println!("Total Loss:       {:.2}", p.total_loss);
        println!();
    }

    for (title, table) in tables {
        println!("== {title} ==");
        if table.is_empty() {
            println!("(no data)");
        } else {
            println!("{}", export::pretty_format(table)?);
        }
        if table.key_column == "Month" || table.key_column == "Quarter" {
            println!(
                "Average {}: sales {:.2}, profit {:.2}",
                table.key_column.to_lowercase(),
                analysis::average_sales(table),
                analysis::average_profit(table)
            );
        }
        println!();
    }
    Ok(())
}

fn report_json(
    session: &DashboardSession,
    section: Section,
    tables: &[(&'static str, SummaryTable)],
) -> Result<Value> {
    let view = session.view();
    let mut root = Map::new();
    if includes(section, Section::Overview) {
        root.insert("overview".into(), serde_json::to_value(session.overview())?);
        root.insert("dataset".into(), serde_json::to_value(analysis::dataset_summary(view))?);
    }
    if includes(section, Section::Profitability) {
        root.insert("profitability".into(), serde_json::to_value(analysis::profit_overview(view))?);
    }
    let tables: Map<String, Value> = tables
        .iter()
        .map(|(title, table)| -> Result<(String, Value)> {
            Ok((title.to_string(), serde_json::to_value(table)?))
        })
        .collect::<Result<_>>()?;
    root.insert("tables".into(), Value::Object(tables));
    root.insert(
        "filters".into(),
        json!({
            "categories": analysis::unique_categories(session.table()),
            "regions": analysis::unique_regions(session.table()),
            "segments": analysis::unique_segments(session.table()),
        }),
    );
    Ok(Value::Object(root))
}

fn export_tables(dir: &Path, tables: &[(&'static str, SummaryTable)]) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (title, table) in tables {
        let name: String = title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        let path = dir.join(format!("{name}.parquet"));
        export::write_parquet(table, &path)?;
        info!("wrote {}", path.display());
    }
    Ok(())
}
