//! tsclient CLI
//!
//! Appends generated rows to, and scans rows from, a local log store.

use std::sync::Arc;

use bytes::Bytes;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};
use tsclient::{Client, Column, Config, FlushPolicy, Row, Table, TimeRange, Value};

/// tsclient CLI
#[derive(Parser, Debug)]
#[command(name = "tsclient")]
#[command(about = "Buffered appends and range scans against a local time-series store")]
#[command(version)]
struct Args {
    /// Data directory of the local store
    #[arg(short, long, default_value = "./tsclient_data")]
    data_dir: String,

    /// Rows fetched per page while scanning
    #[arg(long, default_value = "4096")]
    page_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append generated tick rows to a table
    Append {
        /// Table to append to
        #[arg(short, long)]
        table: String,

        /// Number of rows to generate
        #[arg(short, long, default_value = "1000")]
        count: u64,

        /// Timestamp of the first row (ns since epoch)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        start: i64,

        /// Distance between consecutive rows (ns)
        #[arg(long, default_value = "1000000000")]
        step: i64,

        /// Flush policy
        #[arg(short, long, value_enum, default_value = "auto")]
        policy: PolicyArg,

        /// Auto-flush threshold (rows)
        #[arg(long, default_value = "100")]
        threshold: usize,
    },

    /// Print rows within one or more time ranges
    Scan {
        /// Table to read
        #[arg(short, long)]
        table: String,

        /// Range as BEGIN..END (half-open, ns); repeatable
        #[arg(short, long = "range", required = true, value_parser = parse_range, allow_hyphen_values = true)]
        ranges: Vec<TimeRange>,
    },

    /// Count rows within ranges using both pull and push iteration
    Count {
        /// Table to read
        #[arg(short, long)]
        table: String,

        /// Range as BEGIN..END (half-open, ns); repeatable
        #[arg(short, long = "range", required = true, value_parser = parse_range, allow_hyphen_values = true)]
        ranges: Vec<TimeRange>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Manual,
    Auto,
    PerRow,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tsclient=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("tsclient v{}", tsclient::VERSION);

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> tsclient::Result<()> {
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .scan_page_size(args.page_size)
        .build();
    let client = Client::open_local(config)?;

    match args.command {
        Commands::Append {
            table,
            count,
            start,
            step,
            policy,
            threshold,
        } => {
            let policy = match policy {
                PolicyArg::Manual => FlushPolicy::Manual,
                PolicyArg::Auto => FlushPolicy::auto(threshold)?,
                PolicyArg::PerRow => FlushPolicy::PerRow,
            };
            append(&client, &ticks_table(&table)?, count, start, step, policy)
        }
        Commands::Scan { table, ranges } => {
            let table = ticks_table(&table)?;
            let mut scan = client.scan(&table, &ranges)?;
            while let Some(row) = scan.next_row()? {
                println!("{}", format_row(&row));
            }
            tracing::info!(rows = scan.yielded(), "scan complete");
            Ok(())
        }
        Commands::Count { table, ranges } => {
            let table = ticks_table(&table)?;
            let mut scan = client.scan(&table, &ranges)?;
            let mut pulled = 0u64;
            while scan.has_next()? {
                if scan.next_row()?.is_some() {
                    pulled += 1;
                }
            }
            let pushed = client.scan(&table, &ranges)?.for_each_row(|_| {})?;
            println!("pull: {}", pulled);
            println!("push: {}", pushed);
            Ok(())
        }
    }
}

fn append(
    client: &Client,
    table: &Arc<Table>,
    count: u64,
    start: i64,
    step: i64,
    policy: FlushPolicy,
) -> tsclient::Result<()> {
    let mut writer = client.writer_with_policy(table, policy)?;
    tracing::info!(table = table.name(), count, ?policy, "appending rows");

    let rows = (0..count).map(|i| tick_row(start.saturating_add(step.saturating_mul(i as i64)), i));
    writer.append_all(rows)?;

    // No implicit flush on drop: commit the tail explicitly
    writer.flush()?;

    let stats = writer.stats();
    tracing::info!(
        rows = stats.rows_committed,
        batches = stats.batches_committed,
        "append complete"
    );
    Ok(())
}

/// Schema used for generated data
fn ticks_table(name: &str) -> tsclient::Result<Arc<Table>> {
    let table = Table::new(
        name,
        vec![
            Column::double("open"),
            Column::int64("volume"),
            Column::timestamp("recorded"),
            Column::blob("note"),
        ],
    )?;
    Ok(Arc::new(table))
}

fn tick_row(timestamp: i64, i: u64) -> Row {
    Row::new(
        timestamp,
        vec![
            Value::Double(100.0 + i as f64 * 0.5),
            Value::Int64(i as i64 * 10),
            Value::Timestamp(timestamp),
            Value::Blob(Bytes::from(format!("tick-{}", i))),
        ],
    )
}

fn format_row(row: &Row) -> String {
    let cells: Vec<String> = row
        .values
        .iter()
        .map(|value| match value {
            Value::Double(v) => v.to_string(),
            Value::Int64(v) => v.to_string(),
            Value::Timestamp(v) => v.to_string(),
            Value::Blob(v) => String::from_utf8_lossy(v).into_owned(),
        })
        .collect();
    format!("{}\t{}", row.timestamp, cells.join("\t"))
}

fn parse_range(s: &str) -> Result<TimeRange, String> {
    let (begin, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected BEGIN..END, got '{}'", s))?;
    let begin = begin
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("bad range begin '{}': {}", begin, e))?;
    let end = end
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("bad range end '{}': {}", end, e))?;
    Ok(TimeRange::new(begin, end))
}
