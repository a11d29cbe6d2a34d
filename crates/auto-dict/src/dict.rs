use crate::shared::CopyMemo;
use crate::value::{add, print_map};
use crate::{is_identifier, AutoStr, DictError, DictKey, DictResult, Map, Value};
use indexmap::map::Entry;
use log::{debug, trace};
use std::fmt::{self, Display, Formatter};

/// Names of dict operations, inherent and from implemented traits.
/// Attribute-style writes to these are rejected so that
/// `set_attr("keys", ..)` cannot shadow `keys()`.
pub const RESERVED_NAMES: &[&str] = &[
    "add_assign",
    "as_map",
    "attr",
    "attr_names",
    "child",
    "clear",
    "clone",
    "contains_key",
    "copy",
    "deep_copy",
    "deep_copy_with",
    "default",
    "del_attr",
    "deserialize",
    "eq",
    "fmt",
    "freeze",
    "from",
    "from_args",
    "from_iter",
    "from_json",
    "from_pairs",
    "from_state",
    "get",
    "get_or",
    "get_path",
    "get_path_sep",
    "is_empty",
    "is_frozen",
    "item",
    "items",
    "into_iter",
    "iter",
    "keys",
    "len",
    "ne",
    "new",
    "path",
    "prune",
    "prune_with",
    "remove",
    "repr_html",
    "serialize",
    "set",
    "set_attr",
    "set_path",
    "set_path_sep",
    "setdefault",
    "state",
    "to_dict",
    "to_json",
    "to_json_string",
    "to_owned",
    "to_string",
    "try_get_path",
    "unfreeze",
    "update",
    "update_from",
    "values",
];

/// A mapping that creates missing children on read.
///
/// Reading an absent key through [`item`](Dict::item) or
/// [`child`](Dict::child) stores a new empty `Dict` under that key and returns
/// it, which allows chained construction:
///
/// ```rust
/// use auto_dict::{Dict, list, map};
///
/// let mut d = Dict::new();
/// d.child("a")?.child("b")?.set("c", list![1, 2, 3])?;
/// assert_eq!(d, map! { "a" => map! { "b" => map! { "c" => list![1, 2, 3] } } });
/// # Ok::<(), auto_dict::DictError>(())
/// ```
///
/// Every mapping stored inside a `Dict`, directly or inside lists and tuples,
/// is itself a `Dict`. Values are normalized by [`Value::hook`] on every write.
/// References returned by `item` can be assigned through directly; a plain
/// [`Map`] written that way is turned into a `Dict` as soon as the dict
/// descends into it (`child`, paths, `update`, `freeze`, `prune`).
#[derive(Debug, Clone, Default)]
pub struct Dict {
    values: Map,
    frozen: bool,
}

impl IntoIterator for Dict {
    type Item = (DictKey, Value);
    type IntoIter = indexmap::map::IntoIter<DictKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a DictKey, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, DictKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Dict
where
    K: Into<DictKey>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        Dict::from_pairs(pairs)
    }
}

impl From<Map> for Dict {
    fn from(map: Map) -> Self {
        Dict::from_pairs(map)
    }
}

impl PartialEq for Dict {
    fn eq(&self, other: &Dict) -> bool {
        self.values == other.values
    }
}

impl PartialEq<Map> for Dict {
    fn eq(&self, other: &Map) -> bool {
        &self.values == other
    }
}

impl PartialEq<Dict> for Map {
    fn eq(&self, other: &Dict) -> bool {
        self == &other.values
    }
}

impl PartialEq<Value> for Dict {
    fn eq(&self, other: &Value) -> bool {
        other.as_map().is_some_and(|map| &self.values == map)
    }
}

impl Display for Dict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        print_map(f, &self.values)
    }
}

// construction
impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (impl Into<DictKey>, impl Into<Value>)>) -> Self {
        let mut dict = Self::new();
        for (key, value) in pairs {
            dict.insert_hooked(key.into(), value.into());
        }
        dict
    }

    /// Build a dict from positional sources followed by keyword pairs.
    ///
    /// Each positional argument may be a mapping, a single `(key, value)`
    /// tuple whose first element is not a tuple (items after the second are
    /// ignored), or a list/tuple of pairs.
    /// Falsy arguments (`Nil`, empty containers, zero) are skipped. Keyword
    /// pairs are inserted last.
    ///
    /// ```rust
    /// use auto_dict::{Dict, Value, list, tuple};
    ///
    /// let d = Dict::from_args([tuple![0, 1], list![], tuple![2, 3]], Vec::<(&str, Value)>::new())?;
    /// assert_eq!(d.get(0), Some(&Value::Int(1)));
    /// assert_eq!(d.get(2), Some(&Value::Int(3)));
    /// # Ok::<(), auto_dict::DictError>(())
    /// ```
    pub fn from_args(
        args: impl IntoIterator<Item = Value>,
        kwargs: impl IntoIterator<Item = (impl Into<DictKey>, impl Into<Value>)>,
    ) -> DictResult<Self> {
        let mut dict = Self::new();
        for arg in args {
            for (key, value) in positional_pairs(arg)? {
                dict.insert_hooked(key, value);
            }
        }
        for (key, value) in kwargs {
            dict.insert_hooked(key.into(), value.into());
        }
        Ok(dict)
    }

    pub(crate) fn insert_hooked(&mut self, key: DictKey, value: Value) {
        self.values.insert(key, value.hook());
    }
}

/// Unpack one positional source into key/value pairs.
fn positional_pairs(arg: Value) -> DictResult<Vec<(DictKey, Value)>> {
    if !arg.is_truthy() {
        return Ok(Vec::new());
    }
    match arg {
        Value::Map(map) => Ok(map.into_iter().collect()),
        Value::Dict(dict) => Ok(dict.into_iter().collect()),
        Value::Tuple(items) if !matches!(items.first(), Some(Value::Tuple(_))) => {
            // extra items past the value are ignored
            let len = items.len();
            let mut items = items.into_iter();
            match (items.next(), items.next()) {
                (Some(key), Some(value)) => Ok(vec![(DictKey::try_from(key)?, value)]),
                _ => Err(DictError::BadPair { len }),
            }
        }
        Value::List(items) | Value::Tuple(items) => items.into_iter().map(pair_of).collect(),
        other => Err(DictError::UnsupportedArg {
            found: other.type_name().into(),
        }),
    }
}

fn pair_of(item: Value) -> DictResult<(DictKey, Value)> {
    match item {
        Value::Tuple(kv) | Value::List(kv) if kv.len() == 2 => {
            let mut kv = kv.into_iter();
            match (kv.next(), kv.next()) {
                (Some(key), Some(value)) => Ok((DictKey::try_from(key)?, value)),
                _ => Err(DictError::BadPair { len: 0 }),
            }
        }
        Value::Tuple(kv) | Value::List(kv) => Err(DictError::BadPair { len: kv.len() }),
        other => Err(DictError::UnsupportedArg {
            found: other.type_name().into(),
        }),
    }
}

// pure reads
impl Dict {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_key(&self, key: impl Into<DictKey>) -> bool {
        self.values.contains_key(&key.into())
    }

    pub fn keys(&self) -> Vec<DictKey> {
        self.values.keys().cloned().collect()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, DictKey, Value> {
        self.values.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, DictKey, Value> {
        self.values.iter()
    }

    pub fn as_map(&self) -> &Map {
        &self.values
    }

    /// Look up a key without creating it. Works the same on frozen dicts.
    pub fn get(&self, key: impl Into<DictKey>) -> Option<&Value> {
        self.values.get(&key.into())
    }

    pub(crate) fn get_mut(&mut self, key: &DictKey) -> Option<&mut Value> {
        self.values.get_mut(key)
    }

    pub fn get_or<'a>(&'a self, key: impl Into<DictKey>, default: &'a Value) -> &'a Value {
        self.get(key).unwrap_or(default)
    }
}

// vivifying access and writes
impl Dict {
    /// Value under `key`, creating an empty `Dict` there first if the key is
    /// absent. Fails with `MissingKey` on a frozen dict instead of creating.
    pub fn item(&mut self, key: impl Into<DictKey>) -> DictResult<&mut Value> {
        let frozen = self.frozen;
        match self.values.entry(key.into()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) if frozen => Err(DictError::MissingKey {
                key: entry.key().to_astr(),
            }),
            Entry::Vacant(entry) => {
                trace!("auto-vivify key {}", entry.key());
                Ok(entry.insert(Value::dict()))
            }
        }
    }

    /// Like [`item`](Dict::item) but requires the value to be a mapping.
    pub fn child(&mut self, key: impl Into<DictKey>) -> DictResult<&mut Dict> {
        let key = key.into();
        let name = key.to_astr();
        let slot = self.item(key)?;
        slot.hook_in_place();
        match slot {
            Value::Dict(dict) => Ok(dict),
            other => Err(DictError::NotADict {
                key: name,
                found: other.type_name().into(),
            }),
        }
    }

    /// Store `value` under `key` after hooking it. On a frozen dict only
    /// existing keys can be written.
    pub fn set(&mut self, key: impl Into<DictKey>, value: impl Into<Value>) -> DictResult<()> {
        let key = key.into();
        if self.frozen && !self.values.contains_key(&key) {
            return Err(DictError::MissingKey { key: key.to_astr() });
        }
        self.insert_hooked(key, value.into());
        Ok(())
    }

    pub fn remove(&mut self, key: impl Into<DictKey>) -> DictResult<Value> {
        let key = key.into();
        self.values
            .shift_remove(&key)
            .ok_or_else(|| DictError::MissingKey { key: key.to_astr() })
    }

    /// Drop `key` if present.
    pub(crate) fn discard(&mut self, key: &DictKey) -> Option<Value> {
        self.values.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Value under `key`, storing `default` first if the key is absent.
    pub fn setdefault(&mut self, key: impl Into<DictKey>, default: impl Into<Value>) -> DictResult<&mut Value> {
        let key = key.into();
        if !self.values.contains_key(&key) {
            self.set(key.clone(), default)?;
        }
        self.values
            .get_mut(&key)
            .ok_or_else(|| DictError::MissingKey { key: key.to_astr() })
    }

    /// `self[key] += rhs`, reading `key` the vivifying way.
    pub fn add_assign(&mut self, key: impl Into<DictKey>, rhs: impl Into<Value>) -> DictResult<()> {
        let slot = self.item(key)?;
        let sum = add(slot.clone(), rhs.into())?;
        *slot = sum.hook();
        Ok(())
    }
}

// attribute-style sugar
impl Dict {
    pub fn attr(&mut self, name: &str) -> DictResult<&mut Value> {
        self.item(name)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<Value>) -> DictResult<()> {
        if RESERVED_NAMES.contains(&name) {
            return Err(DictError::ReadOnly { name: name.into() });
        }
        self.set(name, value)
    }

    pub fn del_attr(&mut self, name: &str) -> DictResult<Value> {
        self.remove(name)
    }

    /// Names usable as attributes: string keys that are identifiers, then the
    /// dict's own operation names.
    pub fn attr_names(&self) -> Vec<AutoStr> {
        let mut names: Vec<AutoStr> = self
            .values
            .keys()
            .filter_map(DictKey::name)
            .filter(|name| is_identifier(name))
            .map(AutoStr::from)
            .collect();
        names.extend(RESERVED_NAMES.iter().map(|name| AutoStr::from(*name)));
        names
    }

    pub fn repr_html(&self) -> String {
        self.to_string()
    }
}

// freeze
impl Dict {
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Stop creating keys, here and in every nested `Dict`.
    pub fn freeze(&mut self) -> &mut Self {
        debug!("freeze dict with {} keys", self.len());
        self.set_frozen(true);
        self
    }

    pub fn unfreeze(&mut self) -> &mut Self {
        debug!("unfreeze dict with {} keys", self.len());
        self.set_frozen(false);
        self
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
        for value in self.values.values_mut() {
            set_frozen_in(value, frozen);
        }
    }
}

fn set_frozen_in(value: &mut Value, frozen: bool) {
    value.hook_in_place();
    match value {
        Value::Dict(dict) => dict.set_frozen(frozen),
        Value::List(items) | Value::Tuple(items) => {
            for item in items {
                set_frozen_in(item, frozen);
            }
        }
        _ => {}
    }
}

// merge
impl Dict {
    /// Deep-merge `other` into self.
    ///
    /// A key is overwritten unless both the existing and the incoming value
    /// are mappings, in which case the two are merged recursively. `other`
    /// may be any positional source accepted by [`from_args`](Dict::from_args).
    pub fn update(&mut self, other: impl Into<Value>) -> DictResult<()> {
        let pairs = positional_pairs(other.into())?;
        debug!("update with {} keys", pairs.len());
        for (key, value) in pairs {
            self.merge(key, value)?;
        }
        Ok(())
    }

    /// `update` with at most one positional source plus keyword overrides.
    pub fn update_from(
        &mut self,
        args: impl IntoIterator<Item = Value>,
        kwargs: impl IntoIterator<Item = (impl Into<DictKey>, impl Into<Value>)>,
    ) -> DictResult<()> {
        let mut args: Vec<Value> = args.into_iter().collect();
        if args.len() > 1 {
            return Err(DictError::TooManyArgs { count: args.len() });
        }
        if let Some(arg) = args.pop() {
            self.update(arg)?;
        }
        for (key, value) in kwargs {
            self.merge(key.into(), value.into())?;
        }
        Ok(())
    }

    fn merge(&mut self, key: DictKey, value: Value) -> DictResult<()> {
        let value = value.hook();
        if let Value::Dict(incoming) = value {
            if let Some(slot) = self.values.get_mut(&key) {
                slot.hook_in_place();
                if let Value::Dict(existing) = slot {
                    for (k, v) in incoming {
                        existing.merge(k, v)?;
                    }
                    return Ok(());
                }
            }
            return self.set(key, Value::Dict(incoming));
        }
        self.set(key, value)
    }
}

// copies
impl Dict {
    /// Plain nested mapping with no auto-vivification anywhere inside.
    pub fn to_dict(&self) -> Map {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_plain()))
            .collect()
    }

    /// New dict built from [`to_dict`](Dict::to_dict): nested dicts are fresh,
    /// shared cells are shared with the original. The copy is not frozen.
    pub fn copy(&self) -> Dict {
        Dict::from(self.to_dict())
    }

    /// Fully independent copy. The copy is not frozen.
    pub fn deep_copy(&self) -> Dict {
        self.deep_copy_with(&mut CopyMemo::new())
    }

    pub fn deep_copy_with(&self, memo: &mut CopyMemo) -> Dict {
        let mut copy = Dict::new();
        for (key, value) in &self.values {
            copy.insert_hooked(key.clone(), value.deep_copy(memo));
        }
        copy
    }

    /// State used by serialization: the plain form of the dict.
    pub fn state(&self) -> Map {
        self.to_dict()
    }

    /// Rebuild a dict from [`state`](Dict::state) by merging it into an empty one.
    pub fn from_state(state: Map) -> DictResult<Dict> {
        let mut dict = Dict::new();
        dict.update(state)?;
        Ok(dict)
    }
}
