//! schemagen CLI: incremental orchestration of a schema-driven code generator.
//!
//! Provides `schemagen generate` to (re)generate code for build
//! configurations, `schemagen status` to report whether each configuration is
//! up to date, and `schemagen clean` to drop cached state and generated files.

#![warn(missing_docs)]

mod clean;
mod external;
mod generate;
mod pipeline;
mod status;

use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// schemagen: incremental schema code generation.
#[derive(Parser, Debug)]
#[command(name = "schemagen", version, about = "Incremental schema code generation")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `schemagen.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate code, reusing cached outputs when nothing changed.
    Generate(ConfigurationArgs),
    /// Show whether each configuration is up to date.
    Status(ConfigurationArgs),
    /// Remove cached state and generated files.
    Clean(ConfigurationArgs),
}

/// Selection of build configurations shared by all commands.
#[derive(Args, Debug)]
pub struct ConfigurationArgs {
    /// Build configuration to act on (repeatable).
    #[arg(short = 'c', long = "configuration", default_value = "main")]
    pub configurations: Vec<String>,

    /// Act on every configuration the project knows about.
    #[arg(long)]
    pub all: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Status(ref args) => status::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(quiet: bool, verbose: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_generate_default_configuration() {
        let cli = Cli::parse_from(["schemagen", "generate"]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.configurations, vec!["main"]);
                assert!(!args.all);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_repeated_configurations() {
        let cli = Cli::parse_from(["schemagen", "generate", "-c", "main", "-c", "test"]);
        match cli.command {
            Command::Generate(args) => assert_eq!(args.configurations, vec!["main", "test"]),
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_status_all() {
        let cli = Cli::parse_from(["schemagen", "status", "--all"]);
        match cli.command {
            Command::Status(args) => assert!(args.all),
            _ => panic!("expected Status command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "schemagen",
            "clean",
            "--quiet",
            "--config",
            "path/to/schemagen.toml",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("path/to/schemagen.toml"));
        assert!(matches!(cli.command, Command::Clean(_)));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
