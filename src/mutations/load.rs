//! Joint loading of the mutation table and the two annotation lists.

use std::time::Instant;

use thousands::Separable;

use crate::{
    common::io::read_to_string_maybe_gz,
    err::{FetchError, LoadError},
};

use super::{
    annos::load_annotation_set, build::build_from_table, mutator::Annotations,
    schema::MutationRecord, tsv::parse_tsv,
};

/// The three input payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Payload {
    Mutations,
    Whitelist,
    Blacklist,
}

/// Where to fetch the payloads from; paths (optionally `.gz`) or HTTP URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InputLocations {
    pub data: String,
    pub whitelist: String,
    pub blacklist: String,
}

/// Raw text of the three payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub data: String,
    pub whitelist: String,
    pub blacklist: String,
}

/// Records and annotation sets built from one load.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<MutationRecord>,
    pub annotations: Annotations,
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetch the text at `location`.
pub fn fetch(location: &str) -> Result<String, FetchError> {
    if is_url(location) {
        tracing::debug!("downloading {}", location);
        Ok(reqwest::blocking::get(location)?
            .error_for_status()?
            .text()?)
    } else {
        tracing::debug!("reading {}", location);
        Ok(read_to_string_maybe_gz(location)?)
    }
}

fn fetch_payload(payload: Payload, location: &str) -> Result<String, LoadError> {
    fetch(location).map_err(|source| LoadError {
        payload,
        location: location.to_string(),
        source,
    })
}

/// Fetch all three payloads concurrently.
///
/// Only succeeds if every payload could be fetched.
#[tracing::instrument]
pub fn fetch_all(locations: &InputLocations) -> Result<RawInputs, LoadError> {
    let (data, (whitelist, blacklist)) = rayon::join(
        || fetch_payload(Payload::Mutations, &locations.data),
        || {
            rayon::join(
                || fetch_payload(Payload::Whitelist, &locations.whitelist),
                || fetch_payload(Payload::Blacklist, &locations.blacklist),
            )
        },
    );
    Ok(RawInputs {
        data: data?,
        whitelist: whitelist?,
        blacklist: blacklist?,
    })
}

/// Build records and annotation sets from the fetched payloads.
///
/// The annotation lists are identified towards the store by their location.
pub fn build_dataset(raw: &RawInputs, locations: &InputLocations) -> Dataset {
    let records = build_from_table(&parse_tsv(&raw.data));
    let annotations = Annotations::new(
        load_annotation_set(&raw.whitelist),
        load_annotation_set(&raw.blacklist),
        &locations.whitelist,
        &locations.blacklist,
    );
    tracing::info!(
        "built {} mutation records, {} whitelisted and {} blacklisted loci",
        records.len().separate_with_commas(),
        annotations.whitelist().len().separate_with_commas(),
        annotations.blacklist().len().separate_with_commas(),
    );
    Dataset {
        records,
        annotations,
    }
}

/// Fetch all payloads and build the dataset.
pub fn load_dataset(locations: &InputLocations) -> Result<Dataset, LoadError> {
    tracing::info!("Loading mutations and annotation lists...");
    let before_loading = Instant::now();
    let raw = fetch_all(locations)?;
    let dataset = build_dataset(&raw, locations);
    tracing::info!("...done loading in {:?}", before_loading.elapsed());
    Ok(dataset)
}
