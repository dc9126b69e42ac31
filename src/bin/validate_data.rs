use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use salesboard::analysis;
use salesboard::config::DashboardConfig;
use salesboard::data::loader::load_file;

/// Check that a sales data file loads and print a short profile of it.
#[derive(Debug, Parser)]
#[command(name = "validate_data")]
struct Args {
    /// Data file; defaults to SALES_DATA_PATH or data/superstore.csv
    path: Option<PathBuf>,

    /// Sample rows to print
    #[arg(long, default_value_t = 3)]
    sample: usize,
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let args = Args::parse();
    let path = args
        .path
        .unwrap_or_else(|| DashboardConfig::from_env().data_path);

    println!("Validating {}", path.display());
    let table = match load_file(&path) {
        Ok(table) => table,
        Err(e) if e.is_not_found() => {
            eprintln!("Error: data file not found: {}", path.display());
            eprintln!("Please place your Superstore CSV file at that path.");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            eprintln!("Error: failed to load {}: {e}", path.display());
            return Ok(ExitCode::FAILURE);
        }
    };

    println!(
        "Loaded {} rows, {} columns",
        table.len(),
        table.column_names().len()
    );
    println!("Columns: {}", table.column_names().join(", "));

    let m = analysis::overview_metrics(&table);
    println!();
    println!("Total Sales:      {:.2}", m.total_sales);
    println!("Total Profit:     {:.2}", m.total_profit);
    println!("Total Orders:     {}", m.total_orders);
    println!("Total Customers:  {}", m.total_customers);

    let s = analysis::dataset_summary(&table);
    println!();
    println!("Categories:       {}", s.categories);
    println!("Sub-Categories:   {}", s.sub_categories);
    println!("Products:         {}", s.products);
    println!("Regions:          {}", s.regions);
    println!("States:           {}", s.states);
    println!("Cities:           {}", s.cities);
    println!("Segments:         {}", s.segments);
    if let (Some(first), Some(last)) = (s.first_order, s.last_order) {
        println!("Order Dates:      {first} to {last}");
    }

    println!();
    if table.total_missing() == 0 {
        println!("No missing values.");
    } else {
        println!("Missing values:");
        for (column, count) in table.missing_values().iter().filter(|&(_, &n)| n > 0) {
            println!("  {column}: {count}");
        }
    }

    println!();
    println!("Sample rows:");
    let cell = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
    for record in table.iter().take(args.sample) {
        println!(
            "  {} | {} | {} | {} | {} | {}",
            record.order_id,
            record.order_date,
            record.category,
            record.product_name,
            cell(record.sales),
            cell(record.profit)
        );
    }

    Ok(ExitCode::SUCCESS)
}
