//! Implementation of `table` subcommand.

use crate::{cli, conf::ConfArgs, mutations::export::write_table};

/// Command line arguments for `table` subcommand.
#[derive(Debug, clap::Parser)]
#[command(author, version, about = "Write the filtered mutation table", long_about = None)]
pub struct Args {
    /// Configuration and overrides.
    #[command(flatten)]
    pub conf: ConfArgs,
    /// Path to the output TSV file, stdout if not given; ".gz" compresses.
    #[arg(long)]
    pub output: Option<String>,
    /// Append the highlight class as last column.
    #[arg(long)]
    pub with_class: bool,
}

/// Main entry point for `table` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let (_, session) = cli::load_session(&args.conf)?;
    let rows = session.table();
    tracing::info!("writing {} rows", rows.len());
    write_table(
        cli::open_output(args.output.as_deref())?,
        &rows,
        args.with_class,
    )?;

    Ok(())
}
