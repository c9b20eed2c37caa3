//! Command-driven viewer session.
//!
//! A `Session` owns the immutable record list, both annotation sets, the view
//! toggles and the resulting row list.  Every command that can change what is
//! shown re-runs the view filter before returning, so row indices always
//! refer to the latest view.

use crate::{
    err::SessionError,
    mutations::{
        annos::AnnotationList,
        chart::{derive_chart_data, ChartData},
        export::{IgvSettings, LocusHandoff},
        filter::{filter_records, HighlightClass, ViewState},
        load::Dataset,
        mutator::Annotations,
        schema::{MutationRecord, Signature},
    },
    sync::UpdateSink,
};

/// One of the two view toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewToggle {
    ShowSilent,
    ShowBlacklisted,
}

/// User actions understood by the session.
#[derive(Debug, Clone)]
pub enum Command {
    /// Replace the records and annotation sets.
    Load(Box<Dataset>),
    SetViewToggle(ViewToggle, bool),
    ToggleWhitelist(Signature),
    ToggleBlacklist(Signature),
    /// Select the row with the given index in the current view.
    SelectRecord(usize),
}

/// Result of a `Command`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The view was recomputed and now has `rows` rows.
    Refreshed { rows: usize },
    /// A signature's membership changed.
    Toggled {
        list: AnnotationList,
        signature: Signature,
        present: bool,
    },
    Selected(Box<Selection>),
}

/// A rendered table row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ViewRow<'a> {
    /// Index of the row in the current view.
    pub row: usize,
    #[serde(flatten)]
    pub record: &'a MutationRecord,
    pub class: HighlightClass,
}

/// Everything shown for a selected row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Selection {
    pub row: usize,
    pub record: MutationRecord,
    pub class: HighlightClass,
    pub chart: ChartData,
    pub locus: LocusHandoff,
}

#[derive(Debug)]
pub struct Session {
    records: Vec<MutationRecord>,
    annotations: Annotations,
    view: ViewState,
    igv: IgvSettings,
    /// Index into `records` and highlight of each shown row.
    rows: Vec<(usize, HighlightClass)>,
}

impl Session {
    pub fn new(dataset: Dataset, view: ViewState, igv: IgvSettings) -> Self {
        let mut result = Self {
            records: dataset.records,
            annotations: dataset.annotations,
            view,
            igv,
            rows: Vec::new(),
        };
        result.refresh();
        result
    }

    /// Execute `command`, handing annotation updates to `sink`.
    pub fn dispatch(
        &mut self,
        command: Command,
        sink: &dyn UpdateSink,
    ) -> Result<Outcome, SessionError> {
        match command {
            Command::Load(dataset) => {
                self.records = dataset.records;
                self.annotations = dataset.annotations;
                // The store may not have seen the latest toggles yet.
                let pending = sink.pending_updates();
                if !pending.is_empty() {
                    tracing::info!(
                        "re-applying {} annotation changes not yet confirmed by the store",
                        pending.len()
                    );
                }
                for update in pending {
                    self.annotations
                        .restore(update.list, &update.signature, update.present);
                }
                self.refresh();
                Ok(Outcome::Refreshed {
                    rows: self.rows.len(),
                })
            }
            Command::SetViewToggle(toggle, value) => {
                match toggle {
                    ViewToggle::ShowSilent => self.view.show_silent = value,
                    ViewToggle::ShowBlacklisted => self.view.show_blacklisted = value,
                }
                self.refresh();
                Ok(Outcome::Refreshed {
                    rows: self.rows.len(),
                })
            }
            Command::ToggleWhitelist(signature) => {
                self.toggle(AnnotationList::Whitelist, signature, sink)
            }
            Command::ToggleBlacklist(signature) => {
                self.toggle(AnnotationList::Blacklist, signature, sink)
            }
            Command::SelectRecord(row) => Ok(Outcome::Selected(Box::new(self.select(row)?))),
        }
    }

    fn toggle(
        &mut self,
        list: AnnotationList,
        signature: Signature,
        sink: &dyn UpdateSink,
    ) -> Result<Outcome, SessionError> {
        if !self.records.iter().any(|r| r.signature == signature) {
            return Err(SessionError::UnknownSignature(signature.to_string()));
        }
        let present = self.annotations.toggle(list, &signature, sink);
        self.refresh();
        Ok(Outcome::Toggled {
            list,
            signature,
            present,
        })
    }

    fn refresh(&mut self) {
        self.rows = filter_records(
            &self.records,
            self.annotations.whitelist(),
            self.annotations.blacklist(),
            &self.view,
        );
        tracing::debug!(
            "view {:?} shows {} of {} records",
            &self.view,
            self.rows.len(),
            self.records.len()
        );
    }

    /// The rows of the current view.
    pub fn rows(&self) -> Vec<ViewRow<'_>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(row, (idx, class))| ViewRow {
                row,
                record: &self.records[*idx],
                class: *class,
            })
            .collect()
    }

    /// Record and highlight of each row of the current view.
    pub fn table(&self) -> Vec<(&MutationRecord, HighlightClass)> {
        self.rows
            .iter()
            .map(|(idx, class)| (&self.records[*idx], *class))
            .collect()
    }

    /// Details of row `row` of the current view.
    pub fn select(&self, row: usize) -> Result<Selection, SessionError> {
        let (idx, class) = *self.rows.get(row).ok_or(SessionError::UnknownRow(row))?;
        let record = &self.records[idx];
        Ok(Selection {
            row,
            record: record.clone(),
            class,
            chart: derive_chart_data(&record.plot_data),
            locus: LocusHandoff::new(record, &self.igv),
        })
    }

    /// First record with `signature`, in record order.
    pub fn find(&self, signature: &Signature) -> Option<&MutationRecord> {
        self.records.iter().find(|r| &r.signature == signature)
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn records(&self) -> &[MutationRecord] {
        &self.records
    }
}
