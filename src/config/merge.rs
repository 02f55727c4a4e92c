//! Deep merge of configuration trees
//!
//! Nested mappings merge key-by-key; every other pairing (sequences included)
//! is replaced wholesale by the overlay's value.

use serde_yaml::{Mapping, Value};

/// Merge `overlay` onto `base`, consuming both and returning the combined tree.
///
/// Both inputs are owned, so the result never aliases a tree held elsewhere.
/// Keys only present in `base` keep their position; keys new in `overlay` are appended.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => Value::Mapping(merge_mappings(base, overlay)),
        (_, overlay) => overlay,
    }
}

/// Mapping-level form of [`deep_merge`].
pub fn merge_mappings(mut base: Mapping, overlay: Mapping) -> Mapping {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(slot) => {
                let prior = std::mem::replace(slot, Value::Null);
                *slot = deep_merge(prior, value);
            }
            None => {
                base.insert(key, value);
            }
        }
    }
    base
}
