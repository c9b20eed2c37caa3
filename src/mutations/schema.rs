//! Data structures of the mutation table.

use std::sync::Arc;

use itertools::Itertools;

/// Number of leading columns that make up the locus identity.
pub const SIGNATURE_COLUMNS: usize = 4;

/// Separator between the locus columns in a signature.
pub const SIGNATURE_SEP: &str = ":";

/// Stable identity key of a locus, `chrom:position:ref:alt`.
///
/// Signature equality is the only identity test between mutation records,
/// whitelist and blacklist entries.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Join the first four `columns` with `:`.
    ///
    /// Rows with fewer columns yield a degenerate signature of whatever
    /// columns exist.
    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        Self(
            columns
                .iter()
                .take(SIGNATURE_COLUMNS)
                .map(AsRef::<str>::as_ref)
                .join(SIGNATURE_SEP),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Signature {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Signature {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One sample's allele frequency and depth at a locus.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PlotPoint {
    /// Mutant allele frequency in percent.
    pub freq: f64,
    /// Number of reads covering the locus.
    pub read_count: u64,
    /// Sample name.
    pub sample: String,
}

/// One mutation as observed in one sample.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MutationRecord {
    pub chrom: String,
    pub position: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub alt: String,
    pub gene: String,
    pub effect: String,
    pub notes: String,
    /// Name of the sample the mutation was called in.
    pub sample: String,
    /// Mutant allele frequency in percent for `sample`.
    pub freq: f64,
    /// Locus identity, shared by all records of the same source row.
    pub signature: Signature,
    /// All samples' frequencies at this locus, shared by all records of the
    /// same source row and sorted by `build::sort_plot_data`.
    #[serde(skip)]
    pub plot_data: Arc<Vec<PlotPoint>>,
}

impl MutationRecord {
    /// The `chrom:position` locus string used by genome browsers.
    pub fn locus(&self) -> String {
        format!("{}:{}", &self.chrom, &self.position)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_test::{assert_tokens, Token};

    use super::Signature;

    #[test]
    fn signature_from_columns() {
        let cols = ["chr1", "100", "A", "T", "BRCA1", "Missense"];

        assert_eq!(Signature::from_columns(&cols).as_str(), "chr1:100:A:T");
    }

    #[test]
    fn signature_from_short_row_is_degenerate() {
        let cols = ["chr1", "100"];

        assert_eq!(Signature::from_columns(&cols).as_str(), "chr1:100");
        assert_eq!(Signature::from_columns::<&str>(&[]).as_str(), "");
    }

    #[test]
    fn signature_serializes_as_string() {
        assert_tokens(&Signature::from("chr1:100:A:T"), &[Token::Str("chr1:100:A:T")]);
    }
}
