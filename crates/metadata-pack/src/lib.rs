//! metadata-pack — export Mondrian REST schema metadata as a BSON document.

pub mod encode;
pub mod export;
pub mod fetch;
pub mod storage;
pub mod types;

pub use encode::{encode_document, to_bson, to_document};
pub use export::{export, MetadataExporter};
pub use fetch::MetadataClient;
pub use storage::ArtifactWriter;
pub use types::*;
