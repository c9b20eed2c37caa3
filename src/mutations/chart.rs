//! Derivation of the allele frequency and read count chart series.

use super::schema::PlotPoint;

/// Bar of the allele fraction chart.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FractionBar {
    /// Mutant allele fraction in `[0, 1]`.
    pub fraction: f64,
    pub sample: String,
}

/// Bar of the raw read count chart.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReadBar {
    pub reads: u64,
    pub sample: String,
}

/// Read count bar split into two stacked layers, unmutated at the bottom.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StackedBar {
    pub unmutated: i64,
    pub mutated: i64,
    pub sample: String,
}

/// Everything the chart renderer needs for one locus.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChartData {
    /// Allele fractions, in plot data order.
    pub top: Vec<FractionBar>,
    /// Upper end of the top chart's value axis.
    pub top_max: f64,
    /// Raw read counts, in plot data order.
    pub reads: Vec<ReadBar>,
    /// Upper end of the bottom chart's value axis.
    pub reads_max: u64,
    /// Mutated/unmutated decomposition of `reads`.
    pub stacked: Vec<StackedBar>,
}

/// Number of reads carrying the mutation, rounded up.
pub fn mutated_reads(read_count: u64, freq: f64) -> i64 {
    (read_count as f64 * (freq / 100.0)).ceil() as i64
}

/// Derive the chart series of one locus from its sorted plot data.
pub fn derive_chart_data(plot_data: &[PlotPoint]) -> ChartData {
    let top = plot_data
        .iter()
        .map(|p| FractionBar {
            fraction: p.freq / 100.0,
            sample: p.sample.clone(),
        })
        .collect::<Vec<_>>();
    let reads = plot_data
        .iter()
        .map(|p| ReadBar {
            reads: p.read_count,
            sample: p.sample.clone(),
        })
        .collect::<Vec<_>>();
    let stacked = plot_data
        .iter()
        .map(|p| {
            let mutated = mutated_reads(p.read_count, p.freq);
            StackedBar {
                unmutated: p.read_count as i64 - mutated,
                mutated,
                sample: p.sample.clone(),
            }
        })
        .collect();

    ChartData {
        top_max: top.iter().map(|b| b.fraction).fold(0.0, f64::max),
        reads_max: reads.iter().map(|b| b.reads).max().unwrap_or_default(),
        top,
        reads,
        stacked,
    }
}
