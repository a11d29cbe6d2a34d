//! Literal macros for dicts, plain maps, lists and tuples.
//!
//! ```rust
//! use auto_dict::{dict, list, map, tuple, Value};
//!
//! let d = dict! {
//!     "name" => "auto",
//!     "tags" => list!["a", "b"],
//!     "pos" => tuple![1, 2],
//!     "meta" => map! { "v" => 1 },
//! };
//! assert!(matches!(d.get("meta"), Some(Value::Dict(_))));
//! ```

// ========== dict! ==========

/// Build a [`Dict`](crate::Dict). Values are hooked on the way in, so nested
/// `map!`s become dicts.
///
/// ```rust
/// use auto_dict::dict;
///
/// let d = dict! { "a" => 1, 2 => "two" };
/// assert_eq!(d.len(), 2);
/// assert!(dict! {}.is_empty());
/// ```
#[macro_export]
macro_rules! dict {
    () => {
        $crate::Dict::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Dict::from_pairs([
            $(($crate::DictKey::from($key), $crate::Value::from($value))),+
        ])
    };
}

// ========== map! ==========

/// Build a plain [`Map`](crate::Map). Nothing is hooked.
#[macro_export]
macro_rules! map {
    () => {
        $crate::Map::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {
        <$crate::Map as ::std::iter::FromIterator<($crate::DictKey, $crate::Value)>>::from_iter([
            $(($crate::DictKey::from($key), $crate::Value::from($value))),+
        ])
    };
}

// ========== list! / tuple! ==========

/// `Value::List` from any mix of convertible elements.
#[macro_export]
macro_rules! list {
    ($($value:expr),* $(,)?) => {
        $crate::Value::List(::std::vec![$($crate::Value::from($value)),*])
    };
}

/// `Value::Tuple` from any mix of convertible elements.
#[macro_export]
macro_rules! tuple {
    ($($value:expr),* $(,)?) => {
        $crate::Value::Tuple(::std::vec![$($crate::Value::from($value)),*])
    };
}
