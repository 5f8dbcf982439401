//! Runtime layer for the K-stat trade dashboard.
//!
//! Wraps the ingest pipeline with a memoized table manager keyed on the
//! source export's identity, so repeated downstream queries against the same
//! input never re-read or re-parse the file.

pub mod table_manager;

pub use kstat_core as core;
pub use kstat_data as data;
