//! pack-foodmart — command-line front end for the metadata BSON pack.

pub mod config;

pub use config::{build_export_config, resolve_timeout, resolve_timeout_from};
