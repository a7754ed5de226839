use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use soniox_client::FileUpload;

use crate::error::{NodeError, Result};

/// Binary attachment of an input item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryData {
    /// Base64 encoded content
    pub data: String,
    #[serde(default, alias = "fileName", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, alias = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl BinaryData {
    /// Decode into an upload payload
    ///
    /// # Errors
    ///
    /// Returns a validation error if the content is not valid base64 or empty
    pub fn to_upload(&self, property: &str) -> Result<FileUpload> {
        let data = STANDARD
            .decode(self.data.trim())
            .map_err(|e| NodeError::validation(format!("Binary property '{property}' is not valid base64: {e}")))?;

        if data.is_empty() {
            return Err(NodeError::validation(format!("Binary property '{property}' is empty")));
        }

        Ok(FileUpload {
            data,
            file_name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
        })
    }
}

/// Look up a named binary property and decode it
///
/// # Errors
///
/// Returns a validation error naming the property and the available ones
/// when it is missing
pub fn binary_upload(binaries: &BTreeMap<String, BinaryData>, property: &str) -> Result<FileUpload> {
    let property = property.trim();

    let Some(binary) = binaries.get(property) else {
        let available: Vec<&str> = binaries.keys().map(String::as_str).collect();
        let available = if available.is_empty() {
            "none".to_owned()
        } else {
            available.join(", ")
        };
        return Err(NodeError::validation(format!(
            "No binary data found in property '{property}' (available: {available})"
        )));
    };

    binary.to_upload(property)
}
