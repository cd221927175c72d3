use std::path::PathBuf;
use std::process::ExitCode;

use adldata::{export_banks, ingest, BanksDump, Manifest};
use anyhow::Result;
use clap::Parser;

/// Compile OPL instrument banks into embeddable C tables
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the TOML bank manifest
    manifest: PathBuf,

    /// Output C source file
    output: PathBuf,

    /// Header included by the generated file
    #[arg(long, default_value = "adldata-db.h")]
    header: String,

    /// Log every instrument the silence heuristic flags
    #[arg(long)]
    report_silent: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)?;

    let mut dump = BanksDump::new();
    ingest(&mut dump, &manifest)?;

    if args.report_silent {
        report_silent(&dump);
    }

    export_banks(&dump, &args.output, &args.header)
}

fn report_silent(dump: &BanksDump) {
    let silent = dump.silent_instruments();
    for (entry, report) in &silent {
        let rules = report
            .trace
            .iter()
            .map(|(slot, rule)| format!("op{}: {}", slot, rule))
            .collect::<Vec<_>>()
            .join("; ");
        log::warn!(
            "instrument {} is silent ({}), used by: {}",
            entry.id,
            rules,
            entry.labels.join(", ")
        );
    }
    log::info!(
        "{} of {} instruments are silent",
        silent.len(),
        dump.instruments().len()
    );
}
