//! serde support.
//!
//! A [`Dict`] serializes exactly like the plain mapping it holds. Deserializing
//! produces `Dict`s for every nested object, and a `Dict` is rebuilt from its
//! state by merging it into an empty dict.

use crate::shared::visit;
use crate::{Dict, DictError, DictKey, DictResult, Map, Value};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// Map keys as they appear in text formats: booleans become `"true"` and
/// `"false"`, tuples have no representation.
struct MapKey<'a>(&'a DictKey);

impl Serialize for MapKey<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            DictKey::Str(s) => serializer.serialize_str(s),
            DictKey::Int(i) => serializer.serialize_i64(*i),
            DictKey::Bool(true) => serializer.serialize_str("true"),
            DictKey::Bool(false) => serializer.serialize_str("false"),
            DictKey::Tuple(_) => Err(ser::Error::custom(format!(
                "tuple key {} cannot be a map key",
                self.0
            ))),
        }
    }
}

fn serialize_map<S: Serializer>(map: &Map, serializer: S) -> Result<S::Ok, S::Error> {
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (key, value) in map {
        out.serialize_entry(&MapKey(key), value)?;
    }
    out.end()
}

fn serialize_seq<S: Serializer>(items: &[Value], serializer: S) -> Result<S::Ok, S::Error> {
    let mut out = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        out.serialize_element(item)?;
    }
    out.end()
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) | Value::Tuple(items) => serialize_seq(items, serializer),
            Value::Map(map) => serialize_map(map, serializer),
            Value::Dict(dict) => serialize_map(dict.as_map(), serializer),
            Value::Shared(cell) => visit(cell, |value| value.serialize(serializer))
                .unwrap_or_else(|| Err(ser::Error::custom("shared value refers to itself or is being written"))),
        }
    }
}

impl Serialize for Dict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_map(self.as_map(), serializer)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON-like value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::str(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut dict = Dict::new();
        while let Some((key, value)) = access.next_entry::<Value, Value>()? {
            let key = DictKey::try_from(key).map_err(de::Error::custom)?;
            dict.set(key, value).map_err(de::Error::custom)?;
        }
        Ok(Value::Dict(dict))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for Dict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Dict, D::Error> {
        let state = Value::deserialize(deserializer)?;
        if !state.is_mapping() {
            return Err(de::Error::invalid_type(
                de::Unexpected::Other(state.type_name()),
                &"a mapping",
            ));
        }
        let mut dict = Dict::new();
        dict.update(state).map_err(de::Error::custom)?;
        Ok(dict)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(fields) => Value::Dict(Dict::from_pairs(
                fields.into_iter().map(|(k, v)| (k, Value::from(v))),
            )),
        }
    }
}

impl Value {
    pub fn to_json(&self) -> DictResult<serde_json::Value> {
        serde_json::to_value(self).map_err(DictError::json)
    }
}

impl Dict {
    pub fn to_json(&self) -> DictResult<serde_json::Value> {
        serde_json::to_value(self).map_err(DictError::json)
    }

    pub fn to_json_string(&self) -> DictResult<String> {
        serde_json::to_string(self).map_err(DictError::json)
    }

    pub fn from_json(text: &str) -> DictResult<Dict> {
        serde_json::from_str(text).map_err(DictError::json)
    }
}
