use std::{error::Error, path::PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ratewindow::{
    analysis::{
        growth::growth_curve,
        monthly::MonthlyProfitReport,
        scanner::window_profit,
        window::{ProfitResult, Window},
    },
    config::RateWindowConfig,
    data::{
        frequency::Frequency,
        source::{fetch_records, save_records},
        store::TimeSeriesStore,
    },
    logging::setup_tracing,
    report::{write_growth_csv, write_monthly_csv},
    util::format_utils::{format_currency, format_percent},
};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Find the most profitable fixed-length window of a daily rate series")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "RATEWINDOW_CONFIG", default_value = "config.yml")]
    config: PathBuf,
    /// Directory for log files
    #[arg(long, env = "RATEWINDOW_LOG_DIR")]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the configured range for the best window and break it down by month
    ///
    /// Every candidate window must hold at least one observation. Series published on business
    /// days only (such as the fetched SELIC series) have no data on weekends, so windows shorter
    /// than five days fail with an empty-range error there.
    Scan {
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
        /// Also write the monthly breakdown to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Compute the profit of an explicit window
    Profit {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(short, long, default_value = "day")]
        frequency: Frequency,
    },
    /// Compound the capital through every observation of the series
    Growth {
        /// Write the full curve to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Download the rate series and save it to the data file
    Fetch {
        /// Defaults to the configured start date
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Defaults to the configured end date
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Defaults to the configured data file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    best: &'a ProfitResult,
    monthly: &'a MonthlyProfitReport,
    monthly_total: f64,
}

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let _guard = setup_tracing(args.log_dir.as_deref())?;
    let config = RateWindowConfig::read_config(Some(&args.config))?;

    match args.command.unwrap_or(Command::Scan {
        json: false,
        csv: None,
    }) {
        Command::Scan { json, csv } => scan(&config, json, csv)?,
        Command::Profit {
            start,
            end,
            frequency,
        } => profit(&config, start, end, frequency)?,
        Command::Growth { csv } => growth(&config, csv)?,
        Command::Fetch { start, end, output } => {
            let start = start.map_or_else(|| config.start_date(), Ok)?;
            let end = end.map_or_else(|| config.end_date(), Ok)?;
            let output = output.unwrap_or_else(|| config.data_path());
            let records = fetch_records(config.series_code, start, end).await?;
            let store = TimeSeriesStore::from_records(&records)?;
            save_records(&output, &store.to_records())?;
            println!("Saved {} records to {}", store.len(), output.display());
        }
    }
    Ok(())
}

fn scan(config: &RateWindowConfig, json: bool, csv: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let store = config.load_store()?;
    info!("Loaded {} observations", store.len());
    let (start, end) = (config.start_date()?, config.end_date()?);

    let best = config.scanner()?.scan(&store, start, end)?;
    let monthly = MonthlyProfitReport::build(&store, config.capital, best.window)?;
    if let Some(path) = csv {
        write_monthly_csv(&path, &monthly)?;
    }

    if json {
        let output = ScanOutput {
            best: &best,
            monthly: &monthly,
            monthly_total: monthly.total(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let symbol = &config.currency_symbol;
    println!(
        "Most profitable {}-day window between {} and {}:",
        config.window_days, start, end
    );
    println!("Start: {}", best.window.start());
    println!("End:   {}", best.window.end());
    println!(
        "Investing {} over this window at an average daily rate of {} yields a profit of {}",
        format_currency(config.capital, symbol),
        format_percent(best.effective_rate),
        format_currency(best.profit, symbol)
    );

    println!("\nMonthly profit from {} to {}:", best.window.start(), best.window.end());
    for entry in &monthly.entries {
        println!("{} {}", entry.label(), format_currency(entry.profit, symbol));
    }
    println!("\nSum of monthly profits: {}", format_currency(monthly.total(), symbol));
    println!(
        "Monthly compounding over the whole window: {}",
        format_currency(monthly.compounded.profit, symbol)
    );
    Ok(())
}

fn profit(
    config: &RateWindowConfig,
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
) -> Result<(), Box<dyn Error>> {
    let store = config.load_store()?;
    let result = window_profit(&store, config.capital, Window::new(start, end)?, frequency)?;
    println!("{} ({} compounding)", result, frequency);
    println!(
        "Profit: {}",
        format_currency(result.profit, &config.currency_symbol)
    );
    Ok(())
}

fn growth(config: &RateWindowConfig, csv: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let store = config.load_store()?;
    let points = growth_curve(&store, config.capital)?;
    if let Some(path) = csv {
        write_growth_csv(&path, &points)?;
    }
    if let Some(last) = points.last() {
        println!(
            "Compounding {} from {} through {} observations ends at {} on {} ({})",
            format_currency(config.capital, &config.currency_symbol),
            points[0].date,
            points.len(),
            format_currency(last.value, &config.currency_symbol),
            last.date,
            format_currency(last.difference, &config.currency_symbol)
        );
    }
    Ok(())
}
