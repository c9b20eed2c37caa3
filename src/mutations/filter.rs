//! View filter and row highlighting.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{annos::AnnotationSet, schema::MutationRecord};

/// Effects considered protein altering.
///
/// `rameshift` deliberately lacks the leading "F"; the substring test is kept
/// as it has always been applied to mutation reports.
pub const PROTEIN_ALTERING_PATTERN: &str = r"(?i)Missense|rameshift|Stopgain|Stoploss|Splice";

static PROTEIN_ALTERING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(PROTEIN_ALTERING_PATTERN).expect("invalid PROTEIN_ALTERING_PATTERN")
});

/// Whether the free-text `effect` denotes a protein altering mutation.
pub fn is_protein_altering(effect: &str) -> bool {
    PROTEIN_ALTERING_RE.is_match(effect)
}

/// The two view toggles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Include records whose effect is not protein altering.
    pub show_silent: bool,
    /// Include records whose signature is blacklisted.
    pub show_blacklisted: bool,
}

/// Highlighting of a rendered row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HighlightClass {
    /// Not yet reviewed by the operator.
    New,
    /// Reviewed and not blacklisted; rendered without highlight.
    Reviewed,
    /// Suppressed by the operator.
    Blacklisted,
}

impl HighlightClass {
    /// Classify `record` against the annotation sets.
    ///
    /// Blacklisting wins over whitelisting.
    pub fn classify(
        record: &MutationRecord,
        whitelist: &AnnotationSet,
        blacklist: &AnnotationSet,
    ) -> Self {
        if blacklist.contains(&record.signature) {
            HighlightClass::Blacklisted
        } else if !whitelist.contains(&record.signature) {
            HighlightClass::New
        } else {
            HighlightClass::Reviewed
        }
    }

    /// CSS class used by the table renderer, if any.
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            HighlightClass::New => Some("new"),
            HighlightClass::Reviewed => None,
            HighlightClass::Blacklisted => Some("blacklisted"),
        }
    }
}

/// Whether `record` is shown under `view`.
pub fn passes(record: &MutationRecord, blacklist: &AnnotationSet, view: &ViewState) -> bool {
    if !view.show_silent && !is_protein_altering(&record.effect) {
        tracing::trace!(
            "record {} / {} hidden as silent ({:?})",
            &record.signature,
            &record.sample,
            &record.effect
        );
        return false;
    }
    if !view.show_blacklisted && blacklist.contains(&record.signature) {
        tracing::trace!(
            "record {} / {} hidden as blacklisted",
            &record.signature,
            &record.sample
        );
        return false;
    }
    true
}

/// Select and classify the records to render, in input order.
///
/// Returns the index into `records` of each shown record together with its
/// highlight.
pub fn filter_records(
    records: &[MutationRecord],
    whitelist: &AnnotationSet,
    blacklist: &AnnotationSet,
    view: &ViewState,
) -> Vec<(usize, HighlightClass)> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| passes(record, blacklist, view))
        .map(|(idx, record)| (idx, HighlightClass::classify(record, whitelist, blacklist)))
        .collect()
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::mutations::schema::Signature;

    fn record(signature: &str, effect: &str) -> MutationRecord {
        let cols = signature.split(':').collect::<Vec<_>>();
        MutationRecord {
            chrom: cols[0].into(),
            position: cols[1].into(),
            reference: cols[2].into(),
            alt: cols[3].into(),
            gene: "GENE".into(),
            effect: effect.into(),
            notes: String::new(),
            sample: "S1".into(),
            freq: 1.0,
            signature: Signature::from(signature),
            plot_data: Arc::new(Vec::new()),
        }
    }

    fn records() -> Vec<MutationRecord> {
        vec![
            record("chr1:1:A:G", "Missense"),
            record("chr1:2:A:G", "Synonymous"),
            record("chr1:3:A:G", "Frameshift deletion"),
            record("chr1:4:A:G", "Intronic"),
            record("chr1:5:A:G", "Splice site"),
        ]
    }

    fn set(sigs: &[&str]) -> AnnotationSet {
        sigs.iter().map(|s| Signature::from(*s)).collect()
    }

    #[rstest]
    #[case("Missense", true)]
    #[case("missense variant", true)]
    #[case("Frameshift insertion", true)]
    #[case("frameshift", true)]
    #[case("Stopgain", true)]
    #[case("Stoploss", true)]
    #[case("Splice region", true)]
    #[case("Synonymous", false)]
    #[case("Intronic", false)]
    #[case("Frame shift", false)]
    #[case("", false)]
    fn protein_altering(#[case] effect: &str, #[case] expected: bool) {
        assert_eq!(is_protein_altering(effect), expected);
    }

    #[test]
    fn filter_shows_everything_with_both_toggles() {
        let records = records();
        let view = ViewState {
            show_silent: true,
            show_blacklisted: true,
        };

        let rows = filter_records(&records, &set(&[]), &set(&["chr1:2:A:G"]), &view);

        assert_eq!(
            rows.iter().map(|(idx, _)| *idx).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn filter_hides_silent() {
        let records = records();
        let view = ViewState {
            show_silent: false,
            show_blacklisted: true,
        };

        let rows = filter_records(&records, &set(&[]), &set(&[]), &view);

        assert_eq!(
            rows.iter().map(|(idx, _)| *idx).collect::<Vec<_>>(),
            vec![0, 2, 4]
        );
    }

    #[test]
    fn filter_hides_blacklisted() {
        let records = records();
        let view = ViewState {
            show_silent: true,
            show_blacklisted: false,
        };

        let rows = filter_records(&records, &set(&[]), &set(&["chr1:1:A:G", "chr1:4:A:G"]), &view);

        assert_eq!(
            rows.iter().map(|(idx, _)| *idx).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
    }

    #[test]
    fn filter_empty_input() {
        let rows = filter_records(&[], &set(&[]), &set(&[]), &ViewState::default());

        assert!(rows.is_empty());
    }

    #[rstest]
    #[case(false, false, HighlightClass::New)]
    #[case(true, false, HighlightClass::Reviewed)]
    #[case(false, true, HighlightClass::Blacklisted)]
    #[case(true, true, HighlightClass::Blacklisted)]
    fn classify(
        #[case] whitelisted: bool,
        #[case] blacklisted: bool,
        #[case] expected: HighlightClass,
    ) {
        let record = record("chr1:1:A:G", "Missense");
        let whitelist = if whitelisted {
            set(&["chr1:1:A:G"])
        } else {
            set(&[])
        };
        let blacklist = if blacklisted {
            set(&["chr1:1:A:G"])
        } else {
            set(&[])
        };

        assert_eq!(
            HighlightClass::classify(&record, &whitelist, &blacklist),
            expected
        );
    }

    #[test]
    fn filter_classifies_rows() {
        let records = records();
        let view = ViewState {
            show_silent: true,
            show_blacklisted: true,
        };

        let rows = filter_records(
            &records,
            &set(&["chr1:1:A:G", "chr1:2:A:G"]),
            &set(&["chr1:2:A:G"]),
            &view,
        );

        assert_eq!(rows[0], (0, HighlightClass::Reviewed));
        assert_eq!(rows[1], (1, HighlightClass::Blacklisted));
        assert_eq!(rows[2], (2, HighlightClass::New));
        assert_eq!(rows[1].1.css_class(), Some("blacklisted"));
        assert_eq!(rows[0].1.css_class(), None);
    }
}
