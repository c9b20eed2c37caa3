//! Whitelist ("seen") and blacklist annotation sets.

use indexmap::IndexSet;
use strum_macros::EnumString;

use super::{schema::Signature, tsv::parse_tsv};

/// The two annotation lists an operator maintains.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    enum_map::Enum,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    Debug,
    EnumString,
    strum::Display,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AnnotationList {
    /// Loci the operator has reviewed.
    Whitelist,
    /// Loci the operator has suppressed from the default view.
    Blacklist,
}

/// Set of signatures present in one annotation list.
///
/// Absence means "not annotated".  Insertion order is kept so that listings
/// are reproducible.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnnotationSet {
    signatures: IndexSet<Signature>,
}

impl AnnotationSet {
    pub fn contains(&self, signature: &Signature) -> bool {
        self.signatures.contains(signature)
    }

    /// Set the membership of `signature` to `present`.
    pub fn set(&mut self, signature: &Signature, present: bool) {
        if present {
            self.signatures.insert(signature.clone());
        } else {
            self.signatures.shift_remove(signature);
        }
    }

    /// Flip the membership of `signature` and return the new membership.
    pub fn toggle(&mut self, signature: &Signature) -> bool {
        let present = !self.contains(signature);
        self.set(signature, present);
        present
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }
}

impl FromIterator<Signature> for AnnotationSet {
    fn from_iter<T: IntoIterator<Item = Signature>>(iter: T) -> Self {
        Self {
            signatures: iter.into_iter().collect(),
        }
    }
}

/// Load an annotation set from tab-separated `text`.
///
/// The first four columns of each non-empty line form the signature.  Lines
/// with fewer columns are kept with a degenerate signature.
pub fn load_annotation_set(text: &str) -> AnnotationSet {
    parse_tsv(text)
        .iter()
        .map(|cols| Signature::from_columns(cols))
        .collect()
}
