mod cli;
mod config;
mod logging;
mod output;

use std::io::{self, Write};
use std::path::Path;
use std::process;

use clap::Parser;

use cli::{Cli, Command, EngineArgs, UuidArgs};
use config::DrngConfig;
use drng::{CpuReport, DigitalRandom, Drng, Error, NativeWord};

const SMOKE_TEST_BYTES: usize = 64;

/// Build a DrngConfig by layering: defaults → TOML file → CLI overrides.
fn build_config(config_file: Option<&Path>, engine: &EngineArgs) -> DrngConfig {
    let mut cfg = match config::load_config(config_file) {
        Ok(c) => c.drng,
        Err(e) => {
            log::warn!("{}", e);
            DrngConfig::default()
        }
    };

    if let Some(v) = engine.retries {
        cfg.retries = v;
    }

    cfg.validate();
    cfg
}

fn run_generate(cli: &Cli, cfg: &DrngConfig) -> Result<(), Error> {
    if cli.bytes == 0 {
        return Err(Error::InvalidArgs("byte count must be greater than 0".into()));
    }

    let drng = Drng::new();
    let mut buf = vec![0u8; cli.bytes];
    drng.fill_bytes(&mut buf, cfg.budget())?;
    log::info!("generated {} bytes", buf.len());

    output::write_output(&buf, &cli.format, cli.output_file.as_deref())?;
    Ok(())
}

/// Prints the CPU report and runs two fills. Returns whether the smoke test passed.
fn run_probe(cfg: &DrngConfig) -> Result<bool, Error> {
    let mut out = io::stdout().lock();

    let Some(report) = CpuReport::native() else {
        writeln!(out, "architecture: not x86, RDRAND unavailable")?;
        return Ok(!cfg.require_hardware);
    };

    let supported = report.capability.is_supported();
    writeln!(out, "vendor:       {}", report.vendor)?;
    writeln!(out, "feature bit:  {}", report.feature_bit)?;
    writeln!(out, "supported:    {}", supported)?;
    writeln!(out, "word width:   {} bytes", std::mem::size_of::<NativeWord>())?;
    writeln!(out, "retries:      {}", cfg.retries)?;

    if !supported {
        if report.feature_bit {
            log::warn!("feature bit set but vendor {} is not allow-listed", report.vendor);
        }
        return Ok(!cfg.require_hardware);
    }

    let drng = Drng::new();
    let mut a = [0u8; SMOKE_TEST_BYTES];
    let mut b = [0u8; SMOKE_TEST_BYTES];
    drng.fill_bytes(&mut a, cfg.budget())?;
    drng.fill_bytes(&mut b, cfg.budget())?;

    let passed = a != b;
    writeln!(
        out,
        "smoke test:   {}",
        if passed { "ok" } else { "FAILED (identical samples)" }
    )?;
    Ok(passed)
}

fn run_uuid(args: &UuidArgs, cfg: &DrngConfig) -> Result<(), Error> {
    let random = DigitalRandom::with_budget(cfg.budget())?;
    let mut out = io::stdout().lock();
    for _ in 0..args.count {
        writeln!(out, "{}", random.next_uuid()?)?;
    }
    Ok(())
}

fn exit_on_error(result: Result<(), Error>) {
    if let Err(e) = result {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Command::Probe(args)) => {
            logging::init(&args.log);
            let cfg = build_config(args.engine.config_file.as_deref(), &args.engine);
            match run_probe(&cfg) {
                Ok(true) => {}
                Ok(false) => process::exit(1),
                Err(e) => {
                    log::error!("{}", e);
                    process::exit(1);
                }
            }
        }
        Some(Command::Uuid(args)) => {
            logging::init(&args.log);
            let cfg = build_config(args.engine.config_file.as_deref(), &args.engine);
            exit_on_error(run_uuid(args, &cfg));
        }
        None => {
            logging::init(&cli.log);
            let cfg = build_config(cli.engine.config_file.as_deref(), &cli.engine);
            exit_on_error(run_generate(&cli, &cfg));
        }
    }
}
