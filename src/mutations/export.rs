//! Export of the rendered table and hand-off of loci to a genome browser.

use std::io::Write;

use super::{filter::HighlightClass, schema::MutationRecord};

/// Column headers of the exported table.
pub const EXPORT_HEADER: &[&str] = &[
    "CHROM", "POSITION", "REF", "ALT", "GENE", "EFFECT", "NOTES", "SAMPLE", "FREQ",
];

/// Header of the optional highlight column.
pub const CLASS_HEADER: &str = "CLASS";

/// Write `rows` as tab-separated table with header to `writer`.
///
/// With `with_class`, the highlight class is appended as last column.
pub fn write_table<W: Write>(
    writer: W,
    rows: &[(&MutationRecord, HighlightClass)],
    with_class: bool,
) -> Result<(), anyhow::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    let mut header = EXPORT_HEADER.to_vec();
    if with_class {
        header.push(CLASS_HEADER);
    }
    csv_writer.write_record(&header)?;

    for (record, class) in rows {
        let freq = format!("{:.2}", record.freq);
        let mut fields = vec![
            record.chrom.as_str(),
            record.position.as_str(),
            record.reference.as_str(),
            record.alt.as_str(),
            record.gene.as_str(),
            record.effect.as_str(),
            record.notes.as_str(),
            record.sample.as_str(),
            freq.as_str(),
        ];
        let class = class.to_string();
        if with_class {
            fields.push(class.as_str());
        }
        csv_writer.write_record(&fields)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Settings of the local genome browser (IGV) batch port.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IgvSettings {
    /// Port of the IGV batch listener.
    pub port: u16,
    /// Genome identifier passed to IGV.
    pub genome: String,
    /// Prefix prepended to the BAM file name.
    pub bam_root: String,
}

impl Default for IgvSettings {
    fn default() -> Self {
        Self {
            port: 60151,
            genome: "hg38".into(),
            bam_root: String::new(),
        }
    }
}

/// What a genome browser needs to display one record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LocusHandoff {
    /// `chrom:position`
    pub locus: String,
    /// `<sample>.bam`
    pub bam_file: String,
    /// Request URL for the IGV batch port.
    pub url: String,
}

impl LocusHandoff {
    pub fn new(record: &MutationRecord, igv: &IgvSettings) -> Self {
        let locus = record.locus();
        let bam_file = format!("{}.bam", &record.sample);
        let url = format!(
            "http://localhost:{}/load?file={}{}&genome={}&locus={}&merge=false",
            igv.port, &igv.bam_root, &bam_file, &igv.genome, &locus
        );
        Self {
            locus,
            bam_file,
            url,
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mutations::schema::Signature;

    fn record() -> MutationRecord {
        MutationRecord {
            chrom: "chr1".into(),
            position: "100".into(),
            reference: "A".into(),
            alt: "T".into(),
            gene: "BRCA1".into(),
            effect: "Missense".into(),
            notes: "note".into(),
            sample: "S1".into(),
            freq: 5.0,
            signature: Signature::from("chr1:100:A:T"),
            plot_data: Arc::new(Vec::new()),
        }
    }

    #[test]
    fn write_table_plain() -> Result<(), anyhow::Error> {
        let record = record();
        let mut buf = Vec::new();

        write_table(&mut buf, &[(&record, HighlightClass::New)], false)?;

        assert_eq!(
            String::from_utf8(buf)?,
            "CHROM\tPOSITION\tREF\tALT\tGENE\tEFFECT\tNOTES\tSAMPLE\tFREQ\n\
             chr1\t100\tA\tT\tBRCA1\tMissense\tnote\tS1\t5.00\n"
        );

        Ok(())
    }

    #[test]
    fn write_table_with_class() -> Result<(), anyhow::Error> {
        let record = record();
        let mut buf = Vec::new();

        write_table(&mut buf, &[(&record, HighlightClass::Blacklisted)], true)?;

        let text = String::from_utf8(buf)?;
        let lines = text.lines().collect::<Vec<_>>();
        assert!(lines[0].ends_with("\tFREQ\tCLASS"));
        assert!(lines[1].ends_with("\t5.00\tblacklisted"));

        Ok(())
    }

    #[test]
    fn write_table_empty() -> Result<(), anyhow::Error> {
        let mut buf = Vec::new();

        write_table(&mut buf, &[], false)?;

        assert_eq!(String::from_utf8(buf)?.lines().count(), 1);

        Ok(())
    }

    #[test]
    fn locus_handoff() {
        let igv = IgvSettings {
            bam_root: "/data/bams/".into(),
            ..Default::default()
        };

        let handoff = LocusHandoff::new(&record(), &igv);

        assert_eq!(handoff.locus, "chr1:100");
        assert_eq!(handoff.bam_file, "S1.bam");
        assert_eq!(
            handoff.url,
            "http://localhost:60151/load?file=/data/bams/S1.bam&genome=hg38&locus=chr1:100&merge=false"
        );
    }
}
