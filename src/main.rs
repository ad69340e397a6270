// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! castles: counts the castles of every grid within the requested bounds.
//!
//! Each `(width, height)` pair gets a fresh castle and a single exhaustive search; the results are
//! printed as a table (one line per height) or as JSON.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde::Serialize;
use std::time::Instant;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    /// One line per height, one `even/odd` cell per width.
    Table,
    /// An array of `{width, height, even, odd}` records.
    Json,
}

#[derive(Debug, Parser)]
#[command(version, about = "Count the castles of every grid up to the given size")]
struct Args {
    /// Narrowest grid to count.
    #[arg(long, default_value_t = 1)]
    min_width: u16,
    /// Widest grid to count.
    #[arg(long)]
    max_width: u16,
    /// Shortest grid to count.
    #[arg(long, default_value_t = 1)]
    min_height: u16,
    /// Tallest grid to count.
    #[arg(long)]
    max_height: u16,
    /// How to print the results.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Debug, Serialize)]
struct Record {
    width: u16,
    height: u16,
    even: u64,
    odd: u64,
}

fn main() -> Result<()> {
    // Defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    debug!("{args:?}");
    if args.min_width > args.max_width {
        bail!(
            "--min-width {} exceeds --max-width {}",
            args.min_width,
            args.max_width
        );
    }
    if args.min_height > args.max_height {
        bail!(
            "--min-height {} exceeds --max-height {}",
            args.min_height,
            args.max_height
        );
    }

    let records = sweep(&args)?;
    match args.format {
        Format::Table => print_table(&args, &records),
        Format::Json => println!("{}", serde_json::to_string_pretty(&records)?),
    }
    Ok(())
}

fn sweep(args: &Args) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for height in args.min_height..=args.max_height {
        for width in args.min_width..=args.max_width {
            let started = Instant::now();
            let tally = castles::count((width, height))
                .with_context(|| format!("cannot count the castles of a {width}x{height} grid"))?;
            info!(
                "{width}x{height}: {} even, {} odd ({:.2?})",
                tally.even(),
                tally.odd(),
                started.elapsed()
            );
            records.push(Record {
                width,
                height,
                even: tally.even(),
                odd: tally.odd(),
            });
        }
    }
    Ok(records)
}

fn print_table(args: &Args, records: &[Record]) {
    let cells: Vec<String> = records
        .iter()
        .map(|record| format!("{}/{}", record.even, record.odd))
        .collect();
    let side = cells.iter().map(String::len).max().unwrap_or(0).max(5);

    print!("{:>4} |", "h\\w");
    for width in args.min_width..=args.max_width {
        print!(" {width:>side$}");
    }
    println!();

    let columns = usize::from(args.max_width - args.min_width) + 1;
    for (height, row) in (args.min_height..=args.max_height).zip(cells.chunks(columns)) {
        print!("{height:>4} |");
        for cell in row {
            print!(" {cell:>side$}");
        }
        println!();
    }
}
