//! Implementation of `annotate` subcommand.

use crate::{
    cli,
    conf::ConfArgs,
    mutations::{annos::AnnotationList, schema::Signature},
    session::{Command, Outcome},
    sync::sink_from_conf,
};

/// Command line arguments for `annotate` subcommand.
#[derive(Debug, clap::Parser)]
#[command(author, version, about = "Toggle a locus on the whitelist or blacklist", long_about = None)]
pub struct Args {
    /// Configuration and overrides.
    #[command(flatten)]
    pub conf: ConfArgs,
    /// The list to change.
    #[arg(long, value_enum)]
    pub list: AnnotationList,
    /// Signature of the locus, e.g., "chr1:100:A:T".
    #[arg(long)]
    pub signature: String,
}

/// Main entry point for `annotate` sub command.
///
/// Returns once the update has been delivered or its retries are exhausted.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let (conf, mut session) = cli::load_session(&args.conf)?;
    let sink = sink_from_conf(&conf.sync)?;

    let signature = Signature::from(args.signature.as_str());
    let command = match args.list {
        AnnotationList::Whitelist => Command::ToggleWhitelist(signature),
        AnnotationList::Blacklist => Command::ToggleBlacklist(signature),
    };
    if let Outcome::Toggled {
        list,
        signature,
        present,
    } = session.dispatch(command, sink.as_ref())?
    {
        tracing::info!(
            "{} {} on {}",
            &signature,
            if present { "now" } else { "no longer" },
            list
        );
    }
    tracing::info!(
        "{} of {} records shown",
        session.rows().len(),
        session.records().len()
    );

    // Dropping the sink waits for outstanding deliveries.
    drop(sink);

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(list: AnnotationList, signature: &str) -> Args {
        Args {
            conf: ConfArgs {
                path_data: Some("tests/mutations/mutations.tsv".into()),
                path_whitelist: Some("tests/mutations/whitelist.tsv".into()),
                path_blacklist: Some("tests/mutations/blacklist.tsv".into()),
                ..Default::default()
            },
            list,
            signature: signature.into(),
        }
    }

    #[test]
    #[tracing_test::traced_test]
    fn run_without_store() -> Result<(), anyhow::Error> {
        run(
            &crate::common::Args::default(),
            &args(AnnotationList::Blacklist, "chr17:7577120:C:T"),
        )?;

        assert!(logs_contain("chr17:7577120:C:T no longer on blacklist"));
        assert!(logs_contain("not persisting blacklist chr17:7577120:C:T = false"));

        Ok(())
    }

    #[test]
    fn run_unknown_signature() {
        let result = run(
            &crate::common::Args::default(),
            &args(AnnotationList::Whitelist, "chrX:1:A:C"),
        );

        assert!(result.is_err());
    }
}
