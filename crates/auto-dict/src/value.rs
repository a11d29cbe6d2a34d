use crate::shared::{shared, visit, CopyMemo};
use crate::{AutoStr, Dict, DictError, DictKey, DictResult, Shared, StrExt};
use indexmap::IndexMap;
use std::fmt::{self, Display, Formatter};
use std::mem;
use std::ops::Add;
use std::rc::Rc;

/// A plain mapping. Reads never create keys, unlike [`Dict`].
pub type Map = IndexMap<DictKey, Value>;

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(AutoStr),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(Map),
    Dict(Dict),
    Shared(Shared<Value>),
}

// constructors
impl Value {
    pub fn str(text: impl Into<AutoStr>) -> Self {
        Value::Str(text.into())
    }

    pub fn list(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn tuple(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn dict() -> Self {
        Value::Dict(Dict::new())
    }

    pub fn shared(value: impl Into<Value>) -> Self {
        Value::Shared(shared(value.into()))
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "dict",
            Value::Dict(_) => "Dict",
            Value::Shared(_) => "object",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Truth value used by pruning and argument parsing.
    ///
    /// Shared cells are opaque objects and always count as true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Dict(dict) => !dict.is_empty(),
            Value::Shared(_) => true,
        }
    }

    /// Numeric zero: `0`, `0.0` and `false` all compare equal to zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Bool(b) => !*b,
            _ => false,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Map(_) | Value::Dict(_))
    }

    pub fn is_seq(&self) -> bool {
        matches!(self, Value::List(_) | Value::Tuple(_))
    }

    fn is_empty_mapping(&self) -> bool {
        self.as_map().is_some_and(|map| map.is_empty())
    }

    /// Entries of either mapping flavor.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            Value::Dict(dict) => Some(dict.as_map()),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Elements of a list or a tuple.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// hook and its inverse
impl Value {
    /// Normalize a value for storage: plain mappings become [`Dict`]s and
    /// lists and tuples are rebuilt with hooked elements. Hooking a hooked
    /// value returns it unchanged.
    pub fn hook(self) -> Value {
        match self {
            Value::Map(map) => Value::Dict(Dict::from(map)),
            Value::List(items) => Value::List(items.into_iter().map(Value::hook).collect()),
            Value::Tuple(items) => Value::Tuple(items.into_iter().map(Value::hook).collect()),
            other => other,
        }
    }

    /// Convert a plain mapping written through a `&mut Value` into a
    /// [`Dict`] before the dict descends into it.
    pub(crate) fn hook_in_place(&mut self) {
        if let Value::Map(map) = self {
            *self = Value::Dict(Dict::from(mem::take(map)));
        }
    }

    /// Turn every nested [`Dict`] back into a plain [`Map`]. Shared cells are
    /// carried over by reference.
    pub fn to_plain(&self) -> Value {
        match self {
            Value::Dict(dict) => Value::Map(dict.to_dict()),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_plain()))
                    .collect(),
            ),
            Value::List(items) => Value::List(items.iter().map(Value::to_plain).collect()),
            Value::Tuple(items) => Value::Tuple(items.iter().map(Value::to_plain).collect()),
            other => other.clone(),
        }
    }

    /// Fully independent copy. Shared cells are duplicated once per original
    /// cell, see [`CopyMemo`].
    pub fn deep_copy(&self, memo: &mut CopyMemo) -> Value {
        match self {
            Value::Shared(cell) => {
                if let Some(copy) = memo.lookup(cell) {
                    return Value::Shared(copy);
                }
                let copy = shared(Value::Nil);
                memo.remember(cell, copy.clone());
                let inner = cell.borrow().deep_copy(memo);
                *copy.borrow_mut() = inner;
                Value::Shared(copy)
            }
            Value::Dict(dict) => Value::Dict(dict.deep_copy_with(memo)),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.deep_copy(memo)))
                    .collect(),
            ),
            Value::List(items) => Value::List(items.iter().map(|v| v.deep_copy(memo)).collect()),
            Value::Tuple(items) => Value::Tuple(items.iter().map(|v| v.deep_copy(memo)).collect()),
            other => other.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => int_eq_float(*a, *b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Shared(a), Value::Shared(b)) => {
                Rc::ptr_eq(a, b) || visit(a, |a| visit(b, |b| a == b)).flatten().unwrap_or(false)
            }
            (a, b) => match (a.as_map(), b.as_map()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

/// Exact comparison: the float must be integral and inside the `i64` range.
fn int_eq_float(i: i64, f: f64) -> bool {
    // 2^63, the first float past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) && f as i64 == i
}

impl PartialEq<Map> for Value {
    fn eq(&self, other: &Map) -> bool {
        self.as_map().is_some_and(|map| map == other)
    }
}

impl From<Dict> for Value {
    fn from(dict: Dict) -> Value {
        Value::Dict(dict)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Value {
        Value::Map(map)
    }
}

impl From<Shared<Value>> for Value {
    fn from(cell: Shared<Value>) -> Value {
        Value::Shared(cell)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.into())
    }
}

impl From<AutoStr> for Value {
    fn from(s: AutoStr) -> Value {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<u8> for Value {
    fn from(u: u8) -> Value {
        Value::Int(u as i64)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Value {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Value {
        Value::Int(u as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(i)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Value {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Value {
        Value::Float(f)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Value {
        v.map_or(Value::Nil, Into::into)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Vec<T>) -> Value {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<A, B> From<(A, B)> for Value
where
    A: Into<Value>,
    B: Into<Value>,
{
    fn from((a, b): (A, B)) -> Value {
        Value::Tuple(vec![a.into(), b.into()])
    }
}

fn print_seq(f: &mut Formatter<'_>, open: &str, close: &str, items: &[Value]) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, v) in items.iter().enumerate() {
        write!(f, "{}", v)?;
        if i < items.len() - 1 {
            write!(f, ", ")?;
        }
    }
    write!(f, "{}", close)
}

pub(crate) fn print_map(f: &mut Formatter<'_>, map: &Map) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (k, v)) in map.iter().enumerate() {
        write!(f, "{}: {}", k, v)?;
        if i < map.len() - 1 {
            write!(f, ", ")?;
        }
    }
    write!(f, "}}")
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{:?}", value),
            Value::Str(value) => write!(f, "{}", value.quoted()),
            Value::List(items) => print_seq(f, "[", "]", items),
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
            Value::Tuple(items) => print_seq(f, "(", ")", items),
            Value::Map(map) => print_map(f, map),
            Value::Dict(dict) => print_map(f, dict.as_map()),
            Value::Shared(cell) => match visit(cell, |value| write!(f, "{}", value)) {
                Some(result) => result,
                None => write!(f, "..."),
            },
        }
    }
}

fn try_promote(a: Value, b: Value) -> (Value, Value) {
    match (&a, &b) {
        // bool => int
        (Value::Bool(x), Value::Bool(_) | Value::Int(_) | Value::Float(_)) => {
            try_promote(Value::Int(*x as i64), b)
        }
        (Value::Int(_) | Value::Float(_), Value::Bool(y)) => try_promote(a, Value::Int(*y as i64)),
        // int => float
        (Value::Int(x), Value::Float(_)) => (Value::Float(*x as f64), b),
        (Value::Float(_), Value::Int(y)) => (a, Value::Float(*y as f64)),
        _ => (a, b),
    }
}

/// `a + b`.
///
/// An empty mapping on the left yields the right operand, so a freshly
/// auto-vivified slot behaves like zero: `d.path(["x", "y"]).add_assign(1)`
/// stores `1`. A mapping on the right, or a non-empty one on the left, never
/// adds.
pub fn add(a: Value, b: Value) -> DictResult<Value> {
    if a.is_empty_mapping() {
        return Ok(b);
    }
    let (a, b) = try_promote(a, b);
    match (a, b) {
        (Value::Int(left), Value::Int(right)) => Ok(left
            .checked_add(right)
            .map_or(Value::Float(left as f64 + right as f64), Value::Int)),
        (Value::Float(left), Value::Float(right)) => Ok(Value::Float(left + right)),
        (Value::Str(left), Value::Str(right)) => {
            let mut joined = left;
            joined.push_str(&right);
            Ok(Value::Str(joined))
        }
        (Value::List(mut left), Value::List(right)) => {
            left.extend(right);
            Ok(Value::List(left))
        }
        (Value::Tuple(mut left), Value::Tuple(right)) => {
            left.extend(right);
            Ok(Value::Tuple(left))
        }
        (left, right) => Err(DictError::UnsupportedOperand {
            op: "+",
            left: left.type_name().into(),
            right: right.type_name().into(),
        }),
    }
}

impl Add for Value {
    type Output = DictResult<Value>;

    fn add(self, rhs: Value) -> Self::Output {
        add(self, rhs)
    }
}
