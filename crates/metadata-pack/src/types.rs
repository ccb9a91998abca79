//! Export configuration, outcome, and error types.

use std::path::PathBuf;
use std::time::Duration;

/// Metadata endpoint of the Mondrian REST service on the local network.
pub const METADATA_URL: &str = "http://mondrian-rest/mondrian-rest/getMetadata";

/// Data source whose schema metadata is exported.
pub const CONNECTION_NAME: &str = "foodmart";

/// Where the BSON pack is written.
pub const OUTPUT_PATH: &str = "/data/foodmart-metadata.bson";

/// Upper bound on the whole metadata request, connect through body.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything one export needs. `Default` is the production setup.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub metadata_url: String,
    pub connection_name: String,
    pub output_path: PathBuf,
    pub timeout: Duration,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            metadata_url: METADATA_URL.to_string(),
            connection_name: CONNECTION_NAME.to_string(),
            output_path: PathBuf::from(OUTPUT_PATH),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub output_path: PathBuf,
    pub bytes_written: usize,
    pub top_level_keys: usize,
}

/// Process exit codes, one per failure category.
///
/// Kept clear of 1 (setup failure) and 2 (clap usage error).
pub mod exit_codes {
    pub const CONNECTION: u8 = 10;
    pub const HTTP_STATUS: u8 = 11;
    pub const DECODE: u8 = 12;
    pub const ENCODE: u8 = 13;
    pub const IO: u8 = 14;
}

/// Errors that abort an export.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("Connection error: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("HTTP status {status} from metadata service: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Decode error: response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn exit_code(&self) -> u8 {
        use exit_codes::*;
        match self {
            ExportError::Connection(_) => CONNECTION,
            ExportError::HttpStatus { .. } => HTTP_STATUS,
            ExportError::Decode(_) => DECODE,
            ExportError::Encode(_) => ENCODE,
            ExportError::Io(_) => IO,
        }
    }
}

/// Convenience result type.
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_production_setup() {
        let config = ExportConfig::default();
        assert_eq!(
            config.metadata_url,
            "http://mondrian-rest/mondrian-rest/getMetadata"
        );
        assert_eq!(config.connection_name, "foodmart");
        assert_eq!(
            config.output_path,
            PathBuf::from("/data/foodmart-metadata.bson")
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_exit_codes_are_distinct_and_clear_of_usage_errors() {
        let errors = [
            ExportError::HttpStatus {
                status: 500,
                body: String::new(),
            },
            ExportError::Decode(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err()),
            ExportError::Encode("top-level value is an array".into()),
            ExportError::Io(std::io::Error::other("disk full")),
        ];

        let mut codes: Vec<u8> = errors.iter().map(ExportError::exit_code).collect();
        codes.push(exit_codes::CONNECTION);
        assert!(codes.iter().all(|&c| c > 2), "{codes:?}");

        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 5);
    }

    #[test]
    fn test_http_status_message_carries_status() {
        let err = ExportError::HttpStatus {
            status: 503,
            body: "maintenance".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("maintenance"));
    }
}
