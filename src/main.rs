//! Mutation call triage viewer main executable

pub mod cli;
pub mod common;
pub mod conf;
pub mod err;
pub mod mutations;
pub mod server;
pub mod session;
pub mod sync;

use clap::{Args, Parser, Subcommand};
use console::{Emoji, Term};

/// CLI parser based on clap.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Mutation call triage viewer",
    long_about = "This tool serves and edits the triage state of mutation calls"
)]
struct Cli {
    /// Commonly used arguments
    #[command(flatten)]
    common: common::Args,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Server related commands.
    Server(Server),
    /// Write the filtered table.
    Table(cli::table::Args),
    /// Print chart data of one locus.
    Chart(cli::chart::Args),
    /// Toggle a locus on an annotation list.
    Annotate(cli::annotate::Args),
}

/// Enum supporting the parsing of "server *" sub commands.
#[derive(Debug, Subcommand)]
enum ServerCommands {
    Rest(server::rest::Args),
}

/// Parsing of "server *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Server {
    /// The sub command to run
    #[command(subcommand)]
    command: ServerCommands,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Build a tracing subscriber according to the configuration in `cli.common`.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(match cli.common.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();

    // Install collector and go into sub commands.
    let term = Term::stderr();
    tracing::subscriber::with_default(collector, || {
        tracing::debug!("mutview {}", common::VERSION);
        match &cli.command {
            Commands::Server(server) => match &server.command {
                ServerCommands::Rest(args) => server::rest::run(&cli.common, args)?,
            },
            Commands::Table(args) => cli::table::run(&cli.common, args)?,
            Commands::Chart(args) => cli::chart::run(&cli.common, args)?,
            Commands::Annotate(args) => cli::annotate::run(&cli.common, args)?,
        }

        Ok::<(), anyhow::Error>(())
    })?;
    term.write_line(&format!("All done. Have a nice day!{}", Emoji(" 😃", "")))?;

    Ok(())
}
