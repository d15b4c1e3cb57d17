use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::logging::LogArgs;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Hexadecimal (lowercase)
    Hex,
    /// Uppercase hexadecimal
    HexUpper,
    /// Raw binary bytes
    Raw,
    /// Base64 (standard, with padding)
    Base64,
    /// Base64 URL-safe (no padding)
    Base64url,
    /// Octal bytes separated by spaces
    Octal,
    /// Binary bit strings separated by spaces
    Binary,
}

#[derive(Debug, Args)]
pub struct EngineArgs {
    /// Retries after a failed RDRAND before giving up (0-100)
    #[arg(long)]
    pub retries: Option<u32>,

    /// Configuration file path (default: /etc/drng.toml)
    #[arg(long = "config")]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Parser)]
#[command(name = "drng", about = "Hardware random bytes from the RDRAND instruction")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Number of random bytes to generate
    #[arg(short = 'n', long = "bytes", default_value_t = 32)]
    pub bytes: usize,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Hex)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report RDRAND support on this CPU and run a short smoke test
    Probe(ProbeArgs),
    /// Print random version 4 UUIDs
    Uuid(UuidArgs),
}

#[derive(Debug, Parser)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Parser)]
pub struct UuidArgs {
    /// Number of UUIDs to print
    #[arg(short = 'c', long, default_value_t = 1)]
    pub count: usize,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["drng"]).unwrap();
        assert_eq!(cli.bytes, 32);
        assert!(matches!(cli.format, OutputFormat::Hex));
        assert!(cli.engine.retries.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from(["drng", "-n", "64", "-f", "base64url", "--retries", "3"])
            .unwrap();
        assert_eq!(cli.bytes, 64);
        assert!(matches!(cli.format, OutputFormat::Base64url));
        assert_eq!(cli.engine.retries, Some(3));
    }

    #[test]
    fn test_uuid_subcommand() {
        let cli = Cli::try_parse_from(["drng", "uuid", "-c", "5"]).unwrap();
        match cli.command {
            Some(Command::Uuid(args)) => assert_eq!(args.count, 5),
            other => panic!("expected uuid subcommand, got {:?}", other),
        }
    }

    #[test]
    fn test_probe_subcommand() {
        let cli = Cli::try_parse_from(["drng", "probe", "--retries", "0"]).unwrap();
        match cli.command {
            Some(Command::Probe(args)) => assert_eq!(args.engine.retries, Some(0)),
            other => panic!("expected probe subcommand, got {:?}", other),
        }
    }
}
