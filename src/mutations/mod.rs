//! Mutation table processing: parsing, record building, annotation lists,
//! view filtering and chart data derivation.

pub mod annos;
pub mod build;
pub mod chart;
pub mod export;
pub mod filter;
pub mod load;
pub mod mutator;
pub mod schema;
pub mod tsv;
