//! Build per-sample mutation records from the parsed mutation table.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::schema::{MutationRecord, PlotPoint, Signature};

/// Number of leading per-locus columns; sample cells follow.
///
/// The columns are `chrom, position, ref, alt, gene, effect, notes`.
pub const LOCUS_COLUMNS: usize = 7;

/// Trailing marker of a sample cell in which the mutation was called.
pub const PRESENT_MARKER: char = '*';

/// Sample cell contributing to the chart data: `"<float>% (<int>)..."`.
pub const PLOT_CELL_PATTERN: &str = r"^(\d+\.\d+)% \((\d+)\).*$";

/// Leading percentage of a called sample cell.
pub const FREQ_PATTERN: &str = r"^(\d+(?:\.\d+)?)%";

static PLOT_CELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(PLOT_CELL_PATTERN).expect("invalid PLOT_CELL_PATTERN"));
static FREQ_RE: Lazy<Regex> = Lazy::new(|| Regex::new(FREQ_PATTERN).expect("invalid FREQ_PATTERN"));

/// Whether the sample `cell` carries the present marker.
pub fn is_called(cell: &str) -> bool {
    cell.ends_with(PRESENT_MARKER)
}

/// Parse the `(freq, read_count)` pair of a sample cell, if it matches
/// `PLOT_CELL_PATTERN`.
pub fn parse_plot_cell(cell: &str) -> Option<(f64, u64)> {
    let caps = PLOT_CELL_RE.captures(cell)?;
    let freq = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let read_count = caps.get(2)?.as_str().parse::<u64>().ok()?;
    Some((freq, read_count))
}

/// Parse the leading percentage of a called sample cell.
pub fn parse_freq(cell: &str) -> Option<f64> {
    FREQ_RE.captures(cell)?.get(1)?.as_str().parse::<f64>().ok()
}

/// Sort chart points by descending frequency, ties by descending read count.
///
/// Points equal in both keys keep their sample order.
pub fn sort_plot_data(points: &mut [PlotPoint]) {
    points.sort_by(|a, b| {
        b.freq
            .total_cmp(&a.freq)
            .then_with(|| b.read_count.cmp(&a.read_count))
    });
}

/// Collect the sorted chart points of all samples whose cell matches
/// `PLOT_CELL_PATTERN`, called or not.
fn plot_data(samples: &[String], cells: &[String]) -> Vec<PlotPoint> {
    let mut result = cells
        .iter()
        .zip(samples.iter())
        .filter_map(|(cell, sample)| {
            parse_plot_cell(cell).map(|(freq, read_count)| PlotPoint {
                freq,
                read_count,
                sample: sample.clone(),
            })
        })
        .collect::<Vec<_>>();
    sort_plot_data(&mut result);
    result
}

/// Explode one data row into one record per called sample.
fn build_row(samples: &[String], row: &[String], row_no: usize) -> Vec<MutationRecord> {
    if row.len() < LOCUS_COLUMNS {
        tracing::warn!(
            "skipping mutation row {} with {} of {} locus columns",
            row_no,
            row.len(),
            LOCUS_COLUMNS
        );
        return Vec::new();
    }

    let cells = &row[LOCUS_COLUMNS..];
    let signature = Signature::from_columns(row);
    let plot_data = Arc::new(plot_data(samples, cells));

    cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| is_called(cell))
        .filter_map(|(idx, cell)| {
            let Some(sample) = samples.get(idx) else {
                tracing::debug!(
                    "row {}: called cell {} has no sample in header, skipping",
                    row_no,
                    idx + LOCUS_COLUMNS
                );
                return None;
            };
            let Some(freq) = parse_freq(cell) else {
                tracing::debug!(
                    "row {}: no frequency in cell {:?} of sample {}, skipping",
                    row_no,
                    cell,
                    sample
                );
                return None;
            };
            Some(MutationRecord {
                chrom: row[0].clone(),
                position: row[1].clone(),
                reference: row[2].clone(),
                alt: row[3].clone(),
                gene: row[4].clone(),
                effect: row[5].clone(),
                notes: row[6].clone(),
                sample: sample.clone(),
                freq,
                signature: signature.clone(),
                plot_data: plot_data.clone(),
            })
        })
        .collect()
}

/// Build the records of all data `rows` given the `header` row.
///
/// Records are in row order and, within a row, in header sample order.
pub fn build_records(header: &[String], rows: &[Vec<String>]) -> Vec<MutationRecord> {
    let samples = header.get(LOCUS_COLUMNS..).unwrap_or_default();
    rows.iter()
        .enumerate()
        .flat_map(|(idx, row)| build_row(samples, row, idx + 1))
        .collect()
}

/// Build the records of a parsed table whose first row is the header.
pub fn build_from_table(table: &[Vec<String>]) -> Vec<MutationRecord> {
    match table.split_first() {
        Some((header, rows)) => build_records(header, rows),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::mutations::tsv::parse_tsv;

    fn row(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    fn header(samples: &[&str]) -> Vec<String> {
        let mut result = row(&[
            "chrom", "position", "ref", "alt", "gene", "effect", "notes",
        ]);
        result.extend(samples.iter().map(|s| s.to_string()));
        result
    }

    #[test]
    fn build_single_called_sample() {
        let records = build_records(
            &header(&["S1", "S2"]),
            &[row(&[
                "chr1",
                "100",
                "A",
                "T",
                "BRCA1",
                "Missense",
                "note",
                "5.00% (20)*",
                "0.00% (0)",
            ])],
        );

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.sample, "S1");
        assert_eq!(record.signature.as_str(), "chr1:100:A:T");
        assert_eq!(record.freq, 5.0);
        assert_eq!(record.gene, "BRCA1");
        assert_eq!(
            *record.plot_data,
            vec![
                PlotPoint {
                    freq: 5.0,
                    read_count: 20,
                    sample: "S1".into(),
                },
                PlotPoint {
                    freq: 0.0,
                    read_count: 0,
                    sample: "S2".into(),
                },
            ]
        );
    }

    #[test]
    fn build_records_share_signature_and_plot_data() {
        let records = build_records(
            &header(&["S1", "S2", "S3"]),
            &[row(&[
                "chr2",
                "200",
                "G",
                "C",
                "TP53",
                "Stopgain",
                "",
                "10.00% (50)*",
                "nothing",
                "12.50% (8)*",
            ])],
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sample, "S1");
        assert_eq!(records[1].sample, "S3");
        assert_eq!(records[0].signature, records[1].signature);
        assert!(Arc::ptr_eq(&records[0].plot_data, &records[1].plot_data));
        assert_eq!(records[0].plot_data.len(), 2);
    }

    #[test]
    fn build_row_without_calls_yields_nothing() {
        let records = build_records(
            &header(&["S1"]),
            &[row(&[
                "chr1", "1", "A", "G", "X", "Synonymous", "", "3.00% (10)",
            ])],
        );

        assert!(records.is_empty());
    }

    #[test]
    #[tracing_test::traced_test]
    fn build_skips_short_row() {
        let records = build_records(
            &header(&["S1"]),
            &[
                row(&["chr1", "1", "A"]),
                row(&["chr1", "2", "A", "G", "X", "Missense", "", "1.00% (3)*"]),
            ],
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].position, "2");
        assert!(logs_contain("skipping mutation row 1"));
    }

    #[test]
    fn build_ignores_cells_beyond_header() {
        let records = build_records(
            &header(&["S1"]),
            &[row(&[
                "chr1",
                "1",
                "A",
                "G",
                "X",
                "Missense",
                "",
                "1.00% (3)*",
                "2.00% (4)*",
            ])],
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].plot_data.len(), 1);
    }

    #[test]
    fn build_called_cell_without_read_count() {
        // Called, but does not match the chart pattern.
        let records = build_records(
            &header(&["S1", "S2"]),
            &[row(&[
                "chr1", "1", "A", "G", "X", "Missense", "", "7%*", "1.00% (3)",
            ])],
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].freq, 7.0);
        assert_eq!(records[0].plot_data.len(), 1);
        assert_eq!(records[0].plot_data[0].sample, "S2");
    }

    #[test]
    fn plot_data_sorted_by_freq_then_reads() {
        let records = build_records(
            &header(&["A", "B", "C", "D", "E"]),
            &[row(&[
                "chr1",
                "1",
                "A",
                "G",
                "X",
                "Missense",
                "",
                "1.00% (10)*",
                "5.00% (3)",
                "1.00% (30)",
                "5.00% (7)",
                "1.00% (10)",
            ])],
        );

        let order = records[0]
            .plot_data
            .iter()
            .map(|p| p.sample.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["D", "B", "C", "A", "E"]);
    }

    #[test]
    fn build_from_table_with_header_only() {
        let table = parse_tsv("chrom\tposition\tref\talt\tgene\teffect\tnotes\tS1\n");

        assert!(build_from_table(&table).is_empty());
        assert!(build_from_table(&[]).is_empty());
    }

    #[rstest]
    #[case("5.00% (20)*", true)]
    #[case("5.00% (20) *", true)]
    #[case("5.00% (20)", false)]
    #[case("", false)]
    fn called_marker(#[case] cell: &str, #[case] expected: bool) {
        assert_eq!(is_called(cell), expected);
    }

    #[rstest]
    #[case("5.00% (20)*", Some((5.0, 20)))]
    #[case("12.34% (7) extra", Some((12.34, 7)))]
    #[case("5% (20)", None)]
    #[case("5.00%(20)", None)]
    #[case("n/a", None)]
    fn plot_cell_pattern(#[case] cell: &str, #[case] expected: Option<(f64, u64)>) {
        assert_eq!(parse_plot_cell(cell), expected);
    }
}
