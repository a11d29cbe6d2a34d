//! Recursive removal of empty and falsy content.
//!
//! A key is dropped when its value is falsy, unless the value is numeric zero
//! (kept by default) or a list. Lists are only ever dropped by the sequence
//! rule, after their contents have been filtered, and only when
//! `prune_empty_list` is set. Tuples take the falsy rule first, so an empty
//! tuple is dropped even with `prune_empty_list` off while an empty list is
//! kept.

use crate::{Dict, Value};
use log::debug;
use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneOptions {
    /// Also drop `0`, `0.0` and `false`
    pub prune_zero: bool,
    /// Drop lists and tuples that end up empty
    pub prune_empty_list: bool,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            prune_zero: false,
            prune_empty_list: true,
        }
    }
}

impl PruneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prune_zero(mut self, on: bool) -> Self {
        self.prune_zero = on;
        self
    }

    pub fn with_prune_empty_list(mut self, on: bool) -> Self {
        self.prune_empty_list = on;
        self
    }
}

enum Outcome {
    Keep,
    Remove,
    Replace(Value),
}

impl Dict {
    /// Prune with default options: zeros and empty lists are handled as
    /// described in [`PruneOptions::default`].
    ///
    /// ```rust
    /// use auto_dict::{Dict, map};
    ///
    /// let mut d = Dict::new();
    /// d.child("b")?.child("c")?.child("d")?;
    /// d.set("a", 2)?;
    /// d.prune();
    /// assert_eq!(d, map! { "a" => 2 });
    /// # Ok::<(), auto_dict::DictError>(())
    /// ```
    pub fn prune(&mut self) {
        self.prune_with(PruneOptions::default());
    }

    pub fn prune_with(&mut self, opts: PruneOptions) {
        debug!("prune {} keys with {:?}", self.len(), opts);
        for key in self.keys() {
            let Some(value) = self.get_mut(&key) else {
                continue;
            };
            value.hook_in_place();
            let outcome = if is_falsy(value, opts) {
                Outcome::Remove
            } else {
                match value {
                    Value::Dict(child) => {
                        child.prune_with(opts);
                        if child.is_empty() {
                            Outcome::Remove
                        } else {
                            Outcome::Keep
                        }
                    }
                    Value::List(items) => seq_outcome(prune_seq(mem::take(items), opts), false, opts),
                    Value::Tuple(items) => seq_outcome(prune_seq(mem::take(items), opts), true, opts),
                    _ => Outcome::Keep,
                }
            };
            match outcome {
                Outcome::Keep => {}
                Outcome::Remove => {
                    self.discard(&key);
                }
                Outcome::Replace(kept) => {
                    if let Some(slot) = self.get_mut(&key) {
                        *slot = kept;
                    }
                }
            }
        }
    }
}

fn is_falsy(value: &Value, opts: PruneOptions) -> bool {
    !value.is_truthy() && (!value.is_zero() || opts.prune_zero) && !matches!(value, Value::List(_))
}

fn seq_outcome(kept: Vec<Value>, tuple: bool, opts: PruneOptions) -> Outcome {
    if kept.is_empty() && opts.prune_empty_list {
        return Outcome::Remove;
    }
    Outcome::Replace(if tuple {
        Value::Tuple(kept)
    } else {
        Value::List(kept)
    })
}

/// Filter the elements of a list or tuple.
///
/// Zeros go when `prune_zero` is set, dicts are pruned and dropped once
/// empty, nested sequences are filtered and dropped once empty when
/// `prune_empty_list` is set. Everything else passes through. The caller
/// decides the container type of the result.
pub fn prune_seq(items: Vec<Value>, opts: PruneOptions) -> Vec<Value> {
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        let item = match item {
            Value::Map(map) => Value::Dict(Dict::from(map)),
            other => other,
        };
        match item {
            item if opts.prune_zero && item.is_zero() => {}
            Value::Dict(mut dict) => {
                dict.prune_with(opts);
                if !dict.is_empty() {
                    kept.push(Value::Dict(dict));
                }
            }
            Value::List(inner) => {
                let inner = prune_seq(inner, opts);
                if !inner.is_empty() || !opts.prune_empty_list {
                    kept.push(Value::List(inner));
                }
            }
            Value::Tuple(inner) => {
                let inner = prune_seq(inner, opts);
                if !inner.is_empty() || !opts.prune_empty_list {
                    kept.push(Value::Tuple(inner));
                }
            }
            other => kept.push(other),
        }
    }
    kept
}
