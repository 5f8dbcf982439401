//! Core domain layer for the K-stat trade dashboard.
//!
//! Holds the trade data model, the error taxonomy, source-export profiles,
//! the string-cleaning primitives applied during ingestion, display
//! formatting, and CLI settings shared by the data and runtime layers.

pub mod cleaning;
pub mod error;
pub mod formatting;
pub mod models;
pub mod profile;
pub mod settings;
