//! Equality as seen through the XML encoding
//!
//! XML carries no scalar types, so a tree that went through
//! encode/decode comes back with every scalar as a string. Two values are
//! text-equivalent when they have the same shape, their object keys come in
//! the same order and their scalars print the same.

use crate::value::Value;

pub fn text_equivalent(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Object(l_map), Value::Object(r_map)) => {
            l_map.len() == r_map.len()
                && l_map
                    .iter()
                    .zip(r_map.iter())
                    .all(|((l_k, l_v), (r_k, r_v))| l_k == r_k && text_equivalent(l_v, r_v))
        }
        (Value::Array(l_arr), Value::Array(r_arr)) => {
            l_arr.len() == r_arr.len()
                && l_arr
                    .iter()
                    .zip(r_arr.iter())
                    .all(|(l, r)| text_equivalent(l, r))
        }
        (Value::Null, Value::Null) => true,
        (l, r) => match (l.scalar_text(), r.scalar_text()) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        },
    }
}
