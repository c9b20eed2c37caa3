//! Toggling of whitelist and blacklist membership.

use enum_map::{enum_map, EnumMap};

use crate::sync::{AnnotationUpdate, UpdateSink};

use super::{
    annos::{AnnotationList, AnnotationSet},
    schema::Signature,
};

/// Owner of both annotation sets.
///
/// This is the only writer of the sets; the view filter reads them through
/// `whitelist()` and `blacklist()`.
#[derive(Debug, Clone)]
pub struct Annotations {
    sets: EnumMap<AnnotationList, AnnotationSet>,
    /// Store identifier of the file backing each list.
    files: EnumMap<AnnotationList, String>,
}

impl Annotations {
    pub fn new(
        whitelist: AnnotationSet,
        blacklist: AnnotationSet,
        whitelist_file: &str,
        blacklist_file: &str,
    ) -> Self {
        let mut sets = EnumMap::<AnnotationList, AnnotationSet>::default();
        sets[AnnotationList::Whitelist] = whitelist;
        sets[AnnotationList::Blacklist] = blacklist;
        Self {
            sets,
            files: enum_map! {
                AnnotationList::Whitelist => whitelist_file.to_string(),
                AnnotationList::Blacklist => blacklist_file.to_string(),
            },
        }
    }

    pub fn whitelist(&self) -> &AnnotationSet {
        &self.sets[AnnotationList::Whitelist]
    }

    pub fn blacklist(&self) -> &AnnotationSet {
        &self.sets[AnnotationList::Blacklist]
    }

    pub fn get(&self, list: AnnotationList) -> &AnnotationSet {
        &self.sets[list]
    }

    pub fn file(&self, list: AnnotationList) -> &str {
        &self.files[list]
    }

    /// Flip membership of `signature` in `list` and return the new membership.
    ///
    /// The local set changes immediately, the store update is handed to
    /// `sink` without waiting for it.
    pub fn toggle(
        &mut self,
        list: AnnotationList,
        signature: &Signature,
        sink: &dyn UpdateSink,
    ) -> bool {
        let present = self.sets[list].toggle(signature);
        tracing::info!("{} {} -> {}", list, signature, present);
        sink.submit(AnnotationUpdate {
            list,
            file: self.files[list].clone(),
            signature: signature.clone(),
            present,
        });
        present
    }

    /// Set membership of `signature` in `list` without emitting an update.
    ///
    /// Used to carry changes the store has not confirmed over a reload.
    pub fn restore(&mut self, list: AnnotationList, signature: &Signature, present: bool) {
        self.sets[list].set(signature, present);
    }

    /// Mark `signature` as (un)reviewed; returns whether it is now reviewed.
    pub fn toggle_whitelist(&mut self, signature: &Signature, sink: &dyn UpdateSink) -> bool {
        self.toggle(AnnotationList::Whitelist, signature, sink)
    }

    /// (Un)blacklist `signature`; returns whether it is now blacklisted.
    pub fn toggle_blacklist(&mut self, signature: &Signature, sink: &dyn UpdateSink) -> bool {
        self.toggle(AnnotationList::Blacklist, signature, sink)
    }
}
