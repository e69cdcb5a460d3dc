//! Deep structural merge for partial updates of nested JSON records.
//!
//! Objects merge key-by-key and recurse. Arrays and scalars (including
//! `null`) replace the target value wholesale.

use serde_json::Value;

/// Merge `patch` into `target` in place.
pub fn deep_merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                let recurse =
                    patch_value.is_object() && target_map.get(&key).is_some_and(Value::is_object);
                if !recurse {
                    target_map.insert(key, patch_value);
                } else if let Some(existing) = target_map.get_mut(&key) {
                    deep_merge(existing, patch_value);
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

/// Non-mutating variant of [`deep_merge`].
#[must_use]
pub fn deep_merged(base: &Value, patch: Value) -> Value {
    let mut out = base.clone();
    deep_merge(&mut out, patch);
    out
}
