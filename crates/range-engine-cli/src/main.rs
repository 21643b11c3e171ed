//! `range` CLI: recurrences, range algebra, business days and slots from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Every second day between two dates
//! range generate --start 2025-06-01 --end 2025-06-11 --unit day --interval 2
//!
//! # Intersect two ranges (JSON array of two {start, end} objects on stdin)
//! echo '[{"start":"2025-06-01","end":"2025-06-10"},{"start":"2025-06-05","end":"2025-06-15"}]' \
//!     | range intersect
//!
//! # Split a range into week-sized chunks
//! range split --start 2025-06-01 --end 2025-06-30 --unit week
//!
//! # Total hours across ranges read from a file
//! range aggregate --unit hour -i ranges.json
//!
//! # Next business day, skipping a holiday
//! range next-business-day --date 2025-06-06 --holiday 2025-06-09
//!
//! # Thirty-minute weekday slots between 09:00 and 17:00
//! range slots --start 2025-06-10 --end 2025-06-12 --minutes 30 \
//!     --exclude 0,6 --window-start 09:00 --window-end 17:00
//!
//! # Reformat instants in another zone
//! echo '["2025-06-10T12:00:00Z", 0]' | range convert --tz Asia/Tokyo --format '%Y-%m-%d %H:%M'
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use range_engine::business::BusinessCalendar;
use range_engine::config::EngineOptions;
use range_engine::instant::DateInput;
use range_engine::range::RangeInput;
use range_engine::recurrence::generate_with_options;
use range_engine::slots::{generate_slots_with_options, DailyWindow, SlotConstraints};
use range_engine::splitter::split_with_options;
use range_engine::{aggregate, convert_all, intersect, HolidaySet, Unit, Zone};
use serde::Serialize;
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "range",
    version,
    about = "Temporal range computations: recurrences, splitting, business days and slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with engine options (max_items, max_lookahead_days, week_start)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List instants from start to end at a fixed step
    Generate {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Step unit (ms, second, minute, hour, day, week, month, year)
        #[arg(long)]
        unit: Unit,
        #[arg(long, default_value_t = 1)]
        interval: u32,
        /// IANA zone for calendar arithmetic
        #[arg(long)]
        tz: Option<String>,
    },
    /// Intersect two ranges given as a JSON array of two {start, end} objects
    Intersect {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[arg(long)]
        tz: Option<String>,
    },
    /// Split a range into calendar-aligned chunks
    Split {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        unit: Unit,
        /// Number of units per chunk
        #[arg(long, default_value_t = 1)]
        size: u32,
        #[arg(long)]
        tz: Option<String>,
    },
    /// Sum the durations of a JSON array of {start, end} objects
    Aggregate {
        #[arg(long)]
        unit: Unit,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[arg(long)]
        tz: Option<String>,
    },
    /// Find the next day after DATE that is neither a weekend nor a holiday
    NextBusinessDay {
        #[arg(long)]
        date: String,
        /// Holiday date (repeatable)
        #[arg(long = "holiday")]
        holidays: Vec<String>,
        /// Comma-separated weekend days, 0 = Sunday (default 0,6)
        #[arg(long, value_delimiter = ',')]
        weekend: Option<Vec<u8>>,
    },
    /// Generate fixed-length slots inside a daily window
    Slots {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Slot length in minutes
        #[arg(long)]
        minutes: u32,
        /// Comma-separated excluded weekdays, 0 = Sunday
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<u8>,
        #[arg(long, default_value = "00:00")]
        window_start: String,
        #[arg(long, default_value = "23:59")]
        window_end: String,
        #[arg(long)]
        tz: Option<String>,
    },
    /// Reformat a JSON array of instants in a target zone
    Convert {
        /// Target IANA zone
        #[arg(long)]
        tz: String,
        /// strftime pattern
        #[arg(long, default_value = "%Y-%m-%dT%H:%M:%S%:z")]
        format: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let options = load_options(cli.config.as_deref())?;
    debug!(?options, "engine options loaded");

    match cli.command {
        Commands::Generate {
            start,
            end,
            unit,
            interval,
            tz,
        } => {
            let occurrences =
                generate_with_options(start, end, unit, interval, tz.as_deref(), &options)
                    .context("Failed to generate occurrences")?;
            print_json(&occurrences)?;
        }
        Commands::Intersect { input, tz } => {
            let zone = Zone::optional(tz.as_deref())?;
            let inputs: Vec<RangeInput> = read_json(input.as_deref())?;
            let [a, b] = <[RangeInput; 2]>::try_from(inputs).map_err(|given| {
                anyhow::anyhow!("Expected exactly 2 ranges, got {}", given.len())
            })?;
            let a = a.resolve(zone).context("Invalid first range")?;
            let b = b.resolve(zone).context("Invalid second range")?;
            let common = intersect(&a, &b).context("Failed to intersect ranges")?;
            print_json(&common)?;
        }
        Commands::Split {
            start,
            end,
            unit,
            size,
            tz,
        } => {
            let zone = Zone::optional(tz.as_deref())?;
            let range = RangeInput::new(start, end)
                .resolve(zone)
                .context("Invalid range")?;
            let chunks =
                split_with_options(&range, unit, size, &options).context("Failed to split range")?;
            print_json(&chunks)?;
        }
        Commands::Aggregate { unit, input, tz } => {
            let zone = Zone::optional(tz.as_deref())?;
            let inputs: Vec<RangeInput> = read_json(input.as_deref())?;
            let ranges = inputs
                .iter()
                .enumerate()
                .map(|(i, r)| r.resolve(zone).with_context(|| format!("Invalid range #{}", i)))
                .collect::<Result<Vec<_>>>()?;
            let total = aggregate(&ranges, unit).context("Failed to aggregate ranges")?;
            print_json(&total)?;
        }
        Commands::NextBusinessDay {
            date,
            holidays,
            weekend,
        } => {
            let holidays = HolidaySet::new(holidays).context("Invalid holiday")?;
            let mut calendar = BusinessCalendar::new(holidays).with_options(&options);
            if let Some(days) = weekend {
                calendar = calendar.with_weekend(&days)?;
            }
            let next = calendar
                .next_business_day(date)
                .context("Failed to find the next business day")?;
            print_json(&next)?;
        }
        Commands::Slots {
            start,
            end,
            minutes,
            exclude,
            window_start,
            window_end,
            tz,
        } => {
            let constraints = SlotConstraints {
                excluded_weekdays: exclude,
                daily_window: DailyWindow::new(window_start, window_end),
            };
            let slots = generate_slots_with_options(
                start,
                end,
                minutes,
                &constraints,
                tz.as_deref(),
                &options,
            )
            .context("Failed to generate slots")?;
            print_json(&slots)?;
        }
        Commands::Convert { tz, format, input } => {
            let inputs: Vec<DateInput> = read_json(input.as_deref())?;
            let batch = convert_all(inputs, &tz, &format).context("Failed to convert instants")?;
            print_json(&batch)?;
        }
    }

    Ok(())
}

fn load_options(path: Option<&str>) -> Result<EngineOptions> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            EngineOptions::from_json(&text)
                .with_context(|| format!("Invalid config file: {}", path))
        }
        None => Ok(EngineOptions::default()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: Option<&str>) -> Result<T> {
    let text = read_input(path)?;
    serde_json::from_str(&text).context("Failed to parse JSON input")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}
