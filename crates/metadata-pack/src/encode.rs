//! JSON to BSON mapping for the metadata pack.
//!
//! The mapping is structural: object key order and array order survive,
//! integers take the narrowest BSON integer that holds them, and every other
//! number becomes a double. Nothing is interpreted as extended JSON, so a key
//! like `$oid` stays a plain key.

use bson::{Bson, Document};
use serde_json::{Map, Value};

use crate::types::{ExportError, ExportResult};

/// Serialize a metadata document to BSON bytes.
pub fn encode_document(value: &Value) -> ExportResult<Vec<u8>> {
    let document = to_document(value)?;
    bson::to_vec(&document).map_err(|e| ExportError::Encode(format!("Serialization failed: {e}")))
}

/// Map a top-level JSON value to a BSON document.
///
/// A BSON file holds exactly one document, so anything other than a JSON
/// object is rejected.
pub fn to_document(value: &Value) -> ExportResult<Document> {
    match value {
        Value::Object(map) => object_to_document(map),
        other => Err(ExportError::Encode(format!(
            "top-level value must be an object, got {}",
            kind(other)
        ))),
    }
}

/// Map any JSON value to its BSON counterpart.
pub fn to_bson(value: &Value) -> ExportResult<Bson> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Bson::Int32(small),
                    Err(_) => Bson::Int64(i),
                }
            } else if n.is_u64() {
                return Err(ExportError::Encode(format!(
                    "integer {n} does not fit in a BSON int64"
                )));
            } else {
                // Finite by construction: serde_json rejects NaN and infinities.
                Bson::Double(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(to_bson).collect::<ExportResult<_>>()?),
        Value::Object(map) => Bson::Document(object_to_document(map)?),
    })
}

fn object_to_document(map: &Map<String, Value>) -> ExportResult<Document> {
    let mut document = Document::new();
    for (key, value) in map {
        if key.contains('\0') {
            return Err(ExportError::Encode(format!(
                "key {key:?} contains a NUL byte"
            )));
        }
        document.insert(key.clone(), to_bson(value)?);
    }
    Ok(document)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
