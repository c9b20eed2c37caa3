//! Implementation of `chart` subcommand.

use std::io::Write;

use crate::{
    cli,
    conf::ConfArgs,
    mutations::{
        chart::{derive_chart_data, ChartData},
        schema::Signature,
    },
};

/// Command line arguments for `chart` subcommand.
#[derive(Debug, clap::Parser)]
#[command(author, version, about = "Print chart data of one locus as JSON", long_about = None)]
pub struct Args {
    /// Configuration and overrides.
    #[command(flatten)]
    pub conf: ConfArgs,
    /// Signature of the locus, e.g., "chr1:100:A:T".
    #[arg(long)]
    pub signature: String,
    /// Path to the output JSON file, stdout if not given.
    #[arg(long)]
    pub output: Option<String>,
}

/// Chart data together with the locus it belongs to.
#[derive(Debug, serde::Serialize)]
struct ChartOutput<'a> {
    signature: &'a Signature,
    gene: &'a str,
    chart: ChartData,
}

/// Main entry point for `chart` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let (_, session) = cli::load_session(&args.conf)?;
    let signature = Signature::from(args.signature.as_str());
    let record = session
        .find(&signature)
        .ok_or_else(|| anyhow::anyhow!("no record with signature {}", &signature))?;

    let output = ChartOutput {
        signature: &record.signature,
        gene: &record.gene,
        chart: derive_chart_data(&record.plot_data),
    };
    let mut writer = cli::open_output(args.output.as_deref())?;
    serde_json::to_writer_pretty(&mut writer, &output)?;
    writeln!(writer)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use temp_testdir::TempDir;

    use super::*;

    fn args(signature: &str, output: Option<String>) -> Args {
        Args {
            conf: ConfArgs {
                path_data: Some("tests/mutations/mutations.tsv".into()),
                path_whitelist: Some("tests/mutations/whitelist.tsv".into()),
                path_blacklist: Some("tests/mutations/blacklist.tsv".into()),
                ..Default::default()
            },
            signature: signature.into(),
            output,
        }
    }

    #[test]
    fn run_writes_chart() -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let output = tmp_dir.join("chart.json");

        run(
            &crate::common::Args::default(),
            &args("chr1:100:A:T", Some(output.to_string_lossy().to_string())),
        )?;

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
        assert_eq!(value["signature"], "chr1:100:A:T");
        assert_eq!(value["gene"], "BRCA1");
        assert_eq!(
            value["chart"]["reads"],
            serde_json::json!([
                {"reads": 50, "sample": "P3"},
                {"reads": 20, "sample": "P1"},
                {"reads": 0, "sample": "P2"},
            ])
        );
        assert_eq!(value["chart"]["reads_max"], 50);

        Ok(())
    }

    #[test]
    fn run_unknown_signature() {
        let tmp_dir = TempDir::default();
        let output = tmp_dir.join("chart.json");

        let result = run(
            &crate::common::Args::default(),
            &args("chrX:1:A:C", Some(output.to_string_lossy().to_string())),
        );

        assert!(result.is_err());
    }
}
