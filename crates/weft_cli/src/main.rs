//! Weft CLI: inspects node images written by the elaborator.
//!
//! Provides `weft info` to print the frame header of an image and `weft dump`
//! to print the netlist stored in an e-node image.

#![warn(missing_docs)]

mod dump;
mod info;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;
use weft_config::WeftConfig;

/// Weft image inspector.
#[derive(Parser, Debug)]
#[command(name = "weft", version, about = "Weft node image inspector")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `weft.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the header of an image.
    Info(InfoArgs),
    /// Print the netlist stored in an e-node image.
    Dump(DumpArgs),
}

/// Arguments for the `weft info` subcommand.
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Image file to inspect.
    pub image: PathBuf,

    /// Print the header as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `weft dump` subcommand.
#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Image file to dump.
    pub image: PathBuf,

    /// Print source locations, overriding `dump.show_locations`.
    #[arg(long)]
    pub locations: bool,

    /// Skip payload checksum verification.
    #[arg(long)]
    pub no_verify: bool,
}

/// Global settings derived from CLI flags and configuration.
pub struct GlobalArgs {
    /// Effective configuration.
    pub config: WeftConfig,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let global = GlobalArgs { config };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        Command::Info(ref args) => info::run(args, &global, &mut out),
        Command::Dump(ref args) => dump::run(args, &global, &mut out),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn log_level(quiet: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(quiet, verbose))
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the explicit `--config` file, or `weft.toml` in the working directory.
fn load_config(path: Option<&Path>) -> Result<WeftConfig, weft_config::ConfigError> {
    match path {
        Some(path) => weft_config::load_config_file(path),
        None => weft_config::load_config(Path::new(".")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_info() {
        let cli = Cli::parse_from(["weft", "info", "WORK.TOP.elab"]);
        match cli.command {
            Command::Info(ref args) => {
                assert_eq!(args.image, PathBuf::from("WORK.TOP.elab"));
                assert!(!args.json);
            }
            _ => panic!("expected Info command"),
        }
    }

    #[test]
    fn parse_info_json() {
        let cli = Cli::parse_from(["weft", "info", "--json", "a.elab"]);
        match cli.command {
            Command::Info(ref args) => assert!(args.json),
            _ => panic!("expected Info command"),
        }
    }

    #[test]
    fn parse_dump_with_args() {
        let cli = Cli::parse_from(["weft", "dump", "a.elab", "--locations", "--no-verify"]);
        match cli.command {
            Command::Dump(ref args) => {
                assert_eq!(args.image, PathBuf::from("a.elab"));
                assert!(args.locations);
                assert!(args.no_verify);
            }
            _ => panic!("expected Dump command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["weft", "--quiet", "--config", "ci/weft.toml", "info", "x"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(Path::new("ci/weft.toml")));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["weft", "dump", "x", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(log_level(true, true), Level::ERROR);
        assert_eq!(log_level(false, true), Level::DEBUG);
        assert_eq!(log_level(false, false), Level::WARN);
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[dump]\nindent = 4\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.dump.indent, 4);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
