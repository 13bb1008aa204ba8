//! Ethereum JSON-RPC hex encodings (quantities and unformatted data).

use serde_json::Value;

use crate::error::TransportError;

/// Encode a block number as a hex block tag, e.g. `1024` → `"0x400"`.
pub fn block_tag(block: u64) -> Value {
    Value::String(format!("0x{block:x}"))
}

/// Parse a hex quantity such as `"0x1a"` into a `u64`.
///
/// The `0x` prefix is required and at least one digit must follow.
pub fn parse_quantity(s: &str) -> Result<u64, TransportError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| TransportError::Malformed(format!("quantity '{s}' lacks 0x prefix")))?;
    if digits.is_empty() {
        return Err(TransportError::Malformed("empty quantity".into()));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| TransportError::Malformed(format!("quantity '{s}': {e}")))
}

/// Decode `0x`-prefixed byte data. `"0x"` decodes to an empty vector.
pub fn decode_data(s: &str) -> Result<Vec<u8>, TransportError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| TransportError::Malformed("data lacks 0x prefix".into()))?;
    hex::decode(digits).map_err(|e| TransportError::Malformed(format!("data: {e}")))
}

/// Extract a string result, rejecting any other JSON type.
pub fn as_str(value: &Value) -> Result<&str, TransportError> {
    value
        .as_str()
        .ok_or_else(|| TransportError::Malformed(format!("expected hex string, got {value}")))
}
