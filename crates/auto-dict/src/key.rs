use crate::{AutoStr, DictError, StrExt, Value};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt::{self, Display, Formatter};

/// A hashable dict key.
#[derive(Debug, Clone, PartialEq, Hash, Ord, Eq, PartialOrd)]
pub enum DictKey {
    Str(AutoStr),
    Int(i64),
    Bool(bool),
    Tuple(Vec<DictKey>),
}

impl DictKey {
    pub fn name(&self) -> Option<&str> {
        match self {
            DictKey::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn tuple(keys: impl IntoIterator<Item = impl Into<DictKey>>) -> Self {
        DictKey::Tuple(keys.into_iter().map(Into::into).collect())
    }

    pub fn to_astr(&self) -> AutoStr {
        self.to_string().into()
    }
}

impl Display for DictKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DictKey::Str(s) => write!(f, "{}", s.quoted()),
            DictKey::Int(i) => write!(f, "{}", i),
            DictKey::Bool(true) => write!(f, "True"),
            DictKey::Bool(false) => write!(f, "False"),
            DictKey::Tuple(keys) => {
                write!(f, "(")?;
                for (i, k) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", k)?;
                }
                if keys.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<&str> for DictKey {
    fn from(s: &str) -> Self {
        DictKey::Str(s.into())
    }
}

impl From<String> for DictKey {
    fn from(s: String) -> Self {
        DictKey::Str(s.into())
    }
}

impl From<AutoStr> for DictKey {
    fn from(s: AutoStr) -> Self {
        DictKey::Str(s)
    }
}

impl From<&AutoStr> for DictKey {
    fn from(s: &AutoStr) -> Self {
        DictKey::Str(s.clone())
    }
}

impl From<&DictKey> for DictKey {
    fn from(key: &DictKey) -> Self {
        key.clone()
    }
}

impl From<i32> for DictKey {
    fn from(i: i32) -> Self {
        DictKey::Int(i as i64)
    }
}

impl From<i64> for DictKey {
    fn from(i: i64) -> Self {
        DictKey::Int(i)
    }
}

impl From<usize> for DictKey {
    fn from(i: usize) -> Self {
        DictKey::Int(i as i64)
    }
}

impl From<bool> for DictKey {
    fn from(b: bool) -> Self {
        DictKey::Bool(b)
    }
}

impl<A, B> From<(A, B)> for DictKey
where
    A: Into<DictKey>,
    B: Into<DictKey>,
{
    fn from((a, b): (A, B)) -> Self {
        DictKey::Tuple(vec![a.into(), b.into()])
    }
}

impl TryFrom<Value> for DictKey {
    type Error = DictError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(s) => Ok(DictKey::Str(s)),
            Value::Int(i) => Ok(DictKey::Int(i)),
            Value::Bool(b) => Ok(DictKey::Bool(b)),
            Value::Tuple(items) => items
                .into_iter()
                .map(DictKey::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(DictKey::Tuple),
            other => Err(DictError::Unhashable {
                found: other.type_name().into(),
            }),
        }
    }
}

impl From<DictKey> for Value {
    fn from(key: DictKey) -> Value {
        match key {
            DictKey::Str(s) => Value::Str(s),
            DictKey::Int(i) => Value::Int(i),
            DictKey::Bool(b) => Value::Bool(b),
            DictKey::Tuple(keys) => Value::Tuple(keys.into_iter().map(Value::from).collect()),
        }
    }
}

impl Serialize for DictKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DictKey::Str(s) => serializer.serialize_str(s),
            DictKey::Int(i) => serializer.serialize_i64(*i),
            DictKey::Bool(b) => serializer.serialize_bool(*b),
            DictKey::Tuple(keys) => {
                let mut seq = serializer.serialize_seq(Some(keys.len()))?;
                for key in keys {
                    seq.serialize_element(key)?;
                }
                seq.end()
            }
        }
    }
}
