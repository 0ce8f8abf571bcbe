//! YAML encoder

use serde_json::Value;

use super::error::EncodeResult;

/// Encode any JSON value as block-style YAML
pub fn encode(value: &Value) -> EncodeResult<Vec<u8>> {
    Ok(serde_yaml::to_string(value)?.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_scalar_map() {
        let bytes = encode(&json!({"x": 1})).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "x: 1\n");
    }

    #[test]
    fn test_round_trip() {
        let value = json!({
            "name": "widget",
            "sizes": [1, 2.5, -3],
            "enabled": true,
            "meta": {"owner": null, "tags": ["a", "b: c"]}
        });
        let text = String::from_utf8(encode(&value).unwrap()).unwrap();
        let back: Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_key_order_is_kept() {
        let value: Value = serde_json::from_str(r#"{"b":1,"a":2}"#).unwrap();
        let text = String::from_utf8(encode(&value).unwrap()).unwrap();
        assert_eq!(text, "b: 1\na: 2\n");
    }
}
