use crate::{Dict, DictError, DictKey, DictResult, Value};

/// Separator used by [`Dict::get_path`] and [`Dict::set_path`].
pub const PATH_SEP: char = '.';

impl Dict {
    /// Read a dotted path, creating every missing level on the way.
    ///
    /// ```rust
    /// use auto_dict::{Dict, Value};
    ///
    /// let mut d = Dict::new();
    /// assert_eq!(d.get_path("a.b.c")?, &Value::dict());
    /// assert!(d.try_get_path("a.b").is_some());
    /// # Ok::<(), auto_dict::DictError>(())
    /// ```
    pub fn get_path(&mut self, path: &str) -> DictResult<&mut Value> {
        self.get_path_sep(path, PATH_SEP)
    }

    pub fn get_path_sep(&mut self, path: &str, sep: char) -> DictResult<&mut Value> {
        match path.split_once(sep) {
            None => self.item(path),
            Some((head, rest)) => self.child(head)?.get_path_sep(rest, sep),
        }
    }

    /// Write `value` at a dotted path. Everything before the last separator is
    /// the parent chain and is created as needed.
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) -> DictResult<()> {
        self.set_path_sep(path, PATH_SEP, value)
    }

    pub fn set_path_sep(&mut self, path: &str, sep: char, value: impl Into<Value>) -> DictResult<()> {
        match path.rsplit_once(sep) {
            None => self.set(path, value),
            Some((parent, leaf)) => self.dict_at(parent, sep)?.set(leaf, value),
        }
    }

    /// Read a dotted path without creating anything.
    pub fn try_get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split(PATH_SEP);
        let first = segments.next()?;
        let mut value = self.get(first)?;
        for segment in segments {
            value = value.as_map()?.get(&DictKey::from(segment))?;
        }
        Some(value)
    }

    fn dict_at(&mut self, path: &str, sep: char) -> DictResult<&mut Dict> {
        match path.split_once(sep) {
            None => self.child(path),
            Some((head, rest)) => self.child(head)?.dict_at(rest, sep),
        }
    }

    /// Start a path of arbitrary keys below this dict.
    ///
    /// ```rust
    /// use auto_dict::{Dict, Value};
    ///
    /// let mut d = Dict::new();
    /// d.path(["x", "y"]).add_assign(1)?;
    /// d.path(["x", "y"]).add_assign(1)?;
    /// assert_eq!(d.path(["x", "y"]).try_get(), Some(&Value::Int(2)));
    /// # Ok::<(), auto_dict::DictError>(())
    /// ```
    pub fn path<K: Into<DictKey>>(&mut self, keys: impl IntoIterator<Item = K>) -> Path<'_> {
        Path {
            root: self,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// A chain of keys rooted at a [`Dict`]. Intermediate levels are created on
/// use, the same way [`Dict::child`] creates them.
#[derive(Debug)]
pub struct Path<'a> {
    root: &'a mut Dict,
    keys: Vec<DictKey>,
}

impl<'a> Path<'a> {
    pub fn key(mut self, key: impl Into<DictKey>) -> Self {
        self.keys.push(key.into());
        self
    }

    pub fn keys(&self) -> &[DictKey] {
        &self.keys
    }

    pub fn set(self, value: impl Into<Value>) -> DictResult<()> {
        let (node, leaf) = self.parent()?;
        node.set(leaf, value)
    }

    pub fn get(self) -> DictResult<&'a mut Value> {
        let (node, leaf) = self.parent()?;
        node.item(leaf)
    }

    pub fn try_get(&self) -> Option<&Value> {
        let (first, rest) = self.keys.split_first()?;
        let mut value = self.root.get(first)?;
        for key in rest {
            value = value.as_map()?.get(key)?;
        }
        Some(value)
    }

    pub fn add_assign(self, rhs: impl Into<Value>) -> DictResult<()> {
        let (node, leaf) = self.parent()?;
        node.add_assign(leaf, rhs)
    }

    fn parent(self) -> DictResult<(&'a mut Dict, DictKey)> {
        let Path { root, mut keys } = self;
        let leaf = keys.pop().ok_or(DictError::EmptyPath)?;
        let mut node = root;
        for key in keys {
            node = node.child(key)?;
        }
        Ok((node, leaf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dict, map, ErrorKind};

    #[test]
    fn test_set_path_creates_parents() {
        let mut d = Dict::new();
        d.set_path("a.b.c", 1).unwrap();
        assert_eq!(d, map! { "a" => map! { "b" => map! { "c" => 1 } } });
        assert_eq!(d.try_get_path("a.b.c"), Some(&Value::Int(1)));
        assert!(d.try_get_path("a.x").is_none());
    }

    #[test]
    fn test_get_path_vivifies() {
        let mut d = Dict::new();
        d.get_path("x.y.z").unwrap();
        assert_eq!(d, map! { "x" => map! { "y" => map! { "z" => map! {} } } });
    }

    #[test]
    fn test_custom_separator() {
        let mut d = Dict::new();
        d.set_path_sep("a/b.c", '/', 2).unwrap();
        assert_eq!(d, map! { "a" => map! { "b.c" => 2 } });
        assert_eq!(d.get_path_sep("a/b.c", '/').unwrap(), &Value::Int(2));
    }

    #[test]
    fn test_path_through_scalar() {
        let mut d = dict! { "a" => 1 };
        let err = d.set_path("a.b", 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADict);
        assert!(d.try_get_path("a.b").is_none());
    }

    #[test]
    fn test_path_builder() {
        let mut d = Dict::new();
        d.path(["a"]).key(1).key((2, 3)).set("deep").unwrap();
        let p = d.path(["a"]).key(1).key((2, 3));
        assert_eq!(p.keys().len(), 3);
        assert_eq!(p.try_get(), Some(&Value::str("deep")));
        assert_eq!(d.path(["n"]).get().unwrap(), &Value::dict());
    }

    #[test]
    fn test_empty_path() {
        let mut d = Dict::new();
        let err = d.path(Vec::<DictKey>::new()).set(1).unwrap_err();
        assert_eq!(err, DictError::EmptyPath);
        assert!(d.path(Vec::<DictKey>::new()).try_get().is_none());
    }

    #[test]
    fn test_frozen_path() {
        let mut d = dict! { "a" => map! { "b" => 1 } };
        d.freeze();
        assert!(d.path(["a", "b"]).add_assign(1).is_ok());
        assert_eq!(d.path(["a", "c"]).get().unwrap_err().kind(), ErrorKind::MissingKey);
        assert_eq!(d.try_get_path("a.b"), Some(&Value::Int(2)));
    }
}
