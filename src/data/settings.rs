//! Settings response adapter
//!
//! The carrier settings endpoint has shipped two response shapes. The
//! canonical contract is
//!
//! ```json
//! { "success": true, "data": { "carrier_phone": "...", "carrier_whatsapp": "..." } }
//! ```
//!
//! Older deployments return a flat `{ "phone": "...", "whatsapp": "..." }`
//! object, which is translated here into the same [`ContactInfo`].

use serde_json::Value;
use thiserror::Error;

use super::ContactInfo;

/// Errors raised when an API payload does not have the expected shape
#[derive(Debug, Error)]
pub enum ShapeError {
    /// Body was not valid JSON
    #[error("Failed to parse JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The envelope reported `success: false`
    #[error("API reported an unsuccessful response")]
    Unsuccessful,

    /// A required field was absent, blank, or of the wrong type
    #[error("Missing expected field in response: {0}")]
    MissingField(&'static str),

    /// The payload matched neither the canonical nor the legacy shape
    #[error("Unrecognized response shape")]
    UnrecognizedShape,

    /// A list endpoint returned no entries
    #[error("Response contained no entries")]
    Empty,
}

/// Parses a settings endpoint body into contact numbers
///
/// Both numbers must be present and non-blank; a partial record is an error.
pub fn parse_settings(body: &str) -> Result<ContactInfo, ShapeError> {
    let value: Value = serde_json::from_str(body)?;
    let object = value.as_object().ok_or(ShapeError::UnrecognizedShape)?;

    if let Some(success) = object.get("success") {
        if success.as_bool() != Some(true) {
            return Err(ShapeError::Unsuccessful);
        }
        let data = object.get("data").ok_or(ShapeError::MissingField("data"))?;
        let phone = number_field(data, "carrier_phone")?;
        let whatsapp = number_field(data, "carrier_whatsapp")?;
        return Ok(ContactInfo { phone, whatsapp });
    }

    if object.contains_key("phone") || object.contains_key("whatsapp") {
        let phone = number_field(&value, "phone")?;
        let whatsapp = number_field(&value, "whatsapp")?;
        return Ok(ContactInfo { phone, whatsapp });
    }

    Err(ShapeError::UnrecognizedShape)
}

/// Reads a contact number that may arrive as a string or a bare JSON number
fn number_field(object: &Value, key: &'static str) -> Result<String, ShapeError> {
    let text = match object.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    if text.is_empty() {
        Err(ShapeError::MissingField(key))
    } else {
        Ok(text)
    }
}
