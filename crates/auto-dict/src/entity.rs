use crate::{Dict, Value};

/// Turn a function result into dict form.
///
/// A mapping becomes a [`Dict`]. A list keeps only its mapping elements, each
/// as a `Dict`. Anything else is returned as is.
///
/// ```rust
/// use auto_dict::{entity, list, map, Value};
///
/// let items = entity(list![map! { "a" => 1 }, 2]);
/// assert_eq!(items.as_slice().map(<[Value]>::len), Some(1));
/// ```
pub fn entity(value: impl Into<Value>) -> Value {
    match value.into() {
        Value::List(items) => Value::List(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Map(map) => Some(Value::Dict(Dict::from(map))),
                    Value::Dict(dict) => Some(Value::Dict(dict)),
                    _ => None,
                })
                .collect(),
        ),
        Value::Map(map) => Value::Dict(Dict::from(map)),
        other => other,
    }
}

/// Wrap `f` so that its result always goes through [`entity`].
pub fn entity_fn<A, R, F>(f: F) -> impl Fn(A) -> Value
where
    R: Into<Value>,
    F: Fn(A) -> R,
{
    move |arg| entity(f(arg))
}
