//! YAML tree helpers.
//!
//! Every rewrite step in the pipeline operates on [`serde_yaml::Value`]
//! trees, and almost all of them boil down to "visit every string leaf and
//! maybe rewrite it". The walker here is that one loop, written once.

use serde_yaml::Value;

/// Visit every string-valued leaf of `value` mutably, in document order.
///
/// Mapping keys are not visited: placeholders only ever appear in values.
/// `Tagged` values are transparently unwrapped.
pub fn for_each_string_mut<F>(value: &mut Value, f: &mut F)
where
    F: FnMut(&mut String),
{
    match value {
        Value::String(s) => f(s),
        Value::Sequence(seq) => {
            for item in seq {
                for_each_string_mut(item, f);
            }
        }
        Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                for_each_string_mut(v, f);
            }
        }
        Value::Tagged(tagged) => for_each_string_mut(&mut tagged.value, f),
        _ => {}
    }
}

/// Visit every string-valued leaf of `value` immutably, in document order.
pub fn for_each_string<F>(value: &Value, f: &mut F)
where
    F: FnMut(&str),
{
    match value {
        Value::String(s) => f(s),
        Value::Sequence(seq) => {
            for item in seq {
                for_each_string(item, f);
            }
        }
        Value::Mapping(map) => {
            for (_, v) in map {
                for_each_string(v, f);
            }
        }
        Value::Tagged(tagged) => for_each_string(&tagged.value, f),
        _ => {}
    }
}

/// Render a scalar value the way it would appear when substituted into text.
///
/// Strings pass through untouched; numbers and booleans use their YAML
/// rendering. Nulls and structured values yield `None` — they have no
/// sensible inline form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
