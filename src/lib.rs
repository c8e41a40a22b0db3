//! mf-exhibitors - Messe Frankfurt exhibitor list exporter
//!
//! Pages through the public exhibitor search API, flattens every hit into a
//! fixed set of columns and writes the result to CSV (and Excel with the
//! `xlsx` feature).

pub mod commands;
pub mod config;
pub mod exhibitor;
pub mod export;

pub use config::Config;
pub use exhibitor::{Cell, ExhibitorClient, ExhibitorSearch, FetchError, FlatRecord};
