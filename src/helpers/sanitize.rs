use base64::prelude::*;
use serde_json::Value;

/// Re-encodes every string holding non-ASCII code points as base64 so the
/// payload survives the JSONB column unchanged. Walks the tree with an
/// explicit stack; nesting depth is not bounded by the call stack.
pub fn sanitize(value: &mut Value) {
    let mut pending: Vec<&mut Value> = vec![value];

    while let Some(node) = pending.pop() {
        match node {
            Value::Object(map) => pending.extend(map.values_mut()),
            Value::Array(items) => pending.extend(items.iter_mut()),
            Value::String(text) if !text.is_ascii() => {
                *text = BASE64_STANDARD.encode(text.as_bytes());
            },
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_non_ascii_strings_encoded() {
        let mut value = json!({
            "memo": "héllo",
            "tx": { "value": { "msg": [ { "note": "🚀", "plain": "ok" } ] } },
            "code": 0,
            "log": null
        });
        sanitize(&mut value);

        assert_eq!(value["memo"], BASE64_STANDARD.encode("héllo"));
        assert_eq!(
            value["tx"]["value"]["msg"][0]["note"],
            BASE64_STANDARD.encode("🚀")
        );
        assert_eq!(value["tx"]["value"]["msg"][0]["plain"], "ok");
        assert_eq!(value["code"], 0);
        assert!(value["log"].is_null());
    }

    #[test]
    fn test_ascii_payload_untouched() {
        let original = json!({ "a": ["x", 1, true, { "b": "y" }] });
        let mut value = original.clone();
        sanitize(&mut value);
        assert_eq!(value, original);
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let mut value = json!("深");
        for _ in 0..100_000 {
            value = Value::Array(vec![value]);
        }
        sanitize(&mut value);

        let mut node = &value;
        while let Value::Array(items) = node {
            node = &items[0];
        }
        assert_eq!(node, &json!(BASE64_STANDARD.encode("深")));

        // Drop iteratively; the recursive drop of a 100k deep tree can
        // exhaust the test thread stack.
        let mut stack = vec![value];
        while let Some(mut node) = stack.pop() {
            if let Value::Array(items) = &mut node {
                stack.append(items);
            }
        }
    }
}
