//! `cadence` CLI — expand recurring calendar events from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Expand a JSON array of events over a window (stdin → stdout)
//! cat events.json | cadence expand --from 2024-01-08T00:00 --to 2024-01-14T23:59:59
//!
//! # Assemble the full calendar view (filter + expand + sort) from a file
//! cadence view -i events.json --from 2024-01-01T00:00 --to 2024-01-31T23:59:59 --pretty
//!
//! # Without a window, recurring events pass through as their stored rows
//! cadence expand -i events.json
//! ```

use anyhow::{Context, Result};
use cadence_engine::{
    assemble_view, expand_events, parse_events, parse_timestamp, split_recurring, EventRecord,
};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "cadence",
    version,
    about = "Calendar recurrence expansion CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IoArgs {
    /// Input file with a JSON array of events (reads stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Window start, naive local ISO-8601 (e.g. 2024-01-08T00:00)
    #[arg(long)]
    from: Option<String>,

    /// Window end, naive local ISO-8601
    #[arg(long)]
    to: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand recurring events into concrete occurrences within a window
    Expand(IoArgs),
    /// Assemble a sorted calendar view: window-filter, expand, merge
    View(IoArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Expand(args) => {
            let events = read_events(args.input.as_deref())?;
            let (from, to) = parse_window(args.from.as_deref(), args.to.as_deref())?;
            let instances = expand_events(&events, from, to);
            write_events(&instances, args.output.as_deref(), args.pretty)
        }
        Commands::View(args) => {
            let events = read_events(args.input.as_deref())?;
            let (from, to) = parse_window(args.from.as_deref(), args.to.as_deref())?;
            let (recurring, non_recurring) = split_recurring(events);
            let view = assemble_view(&non_recurring, &recurring, from, to);
            write_events(&view, args.output.as_deref(), args.pretty)
        }
    }
}

fn read_events(input: Option<&str>) -> Result<Vec<EventRecord>> {
    let json = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file '{}'", path))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    parse_events(&json).context("input is not a JSON array of event objects")
}

fn parse_window(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(Option<NaiveDateTime>, Option<NaiveDateTime>)> {
    let parse_bound = |flag: &str, value: Option<&str>| -> Result<Option<NaiveDateTime>> {
        value
            .map(|s| {
                parse_timestamp(s).with_context(|| format!("invalid --{} timestamp '{}'", flag, s))
            })
            .transpose()
    };
    Ok((parse_bound("from", from)?, parse_bound("to", to)?))
}

fn write_events(events: &[EventRecord], output: Option<&str>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(events)?
    } else {
        serde_json::to_string(events)?
    };
    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write output file '{}'", path))?,
        None => println!("{}", json),
    }
    Ok(())
}
