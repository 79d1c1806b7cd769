//! Recursive flattening of untyped smartctl documents
//!
//! Only numeric and boolean leaves become attributes. Nested objects extend the
//! key with `_`; strings, nulls and arrays are dropped. Keys produced by
//! different branches may collide, in which case the last one visited wins.

use super::Attributes;
use serde_json::Value;

const SEPARATOR: char = '_';

/// Flatten `node` into `into`, prefixing every emitted key with `prefix`
pub fn flatten(prefix: &str, node: &Value, into: &mut Attributes) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                flatten(&join(prefix, key), value, into);
            }
        }
        Value::Number(n) if !prefix.is_empty() => {
            if let Some(v) = n.as_f64() {
                into.insert(prefix.to_string(), v);
            }
        }
        Value::Bool(b) if !prefix.is_empty() => {
            into.insert(prefix.to_string(), bool_value(*b));
        }
        _ => {}
    }
}

/// Join a prefix and a key, with no separator before the first segment
pub fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        let mut joined = String::with_capacity(prefix.len() + key.len() + 1);
        joined.push_str(prefix);
        joined.push(SEPARATOR);
        joined.push_str(key);
        joined
    }
}

pub fn bool_value(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
