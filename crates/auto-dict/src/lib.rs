//! # Auto-Dict: nested dictionaries that build themselves
//!
//! [`Dict`] is an insertion-ordered mapping whose missing keys spring into
//! existence as empty dicts when read through the vivifying accessors. This
//! makes deeply nested configuration or result structures cheap to build:
//!
//! ```rust
//! use auto_dict::{Dict, DictResult, Value};
//!
//! fn main() -> DictResult<()> {
//!     let mut d = Dict::new();
//!     d.child("server")?.child("tls")?.set("port", 8443)?;
//!     d.set_path("server.name", "auto")?;
//!     d.path(["stats", "hits"]).add_assign(1)?;
//!
//!     assert_eq!(d.try_get_path("server.tls.port"), Some(&Value::Int(8443)));
//!     assert_eq!(d.to_string(), "{'server': {'tls': {'port': 8443}, 'name': 'auto'}, 'stats': {'hits': 1}}");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Hooked writes**: plain [`Map`]s stored anywhere inside a dict,
//!   including inside lists and tuples, are converted to `Dict`s
//! - **Deep merge**: [`Dict::update`] merges nested mappings key by key
//! - **Pruning**: [`Dict::prune_with`] drops empty children and falsy values
//! - **Freezing**: a frozen dict reports missing keys instead of creating them
//! - **serde**: a `Dict` serializes exactly like the plain map it holds

#[macro_use]
mod macros;

mod string;
pub use string::*;

mod shared;
pub use shared::{shared, CopyMemo, Shared};

mod key;
pub use key::*;

mod error;
pub use error::*;

mod value;
pub use value::*;

mod dict;
pub use dict::*;

mod prune;
pub use prune::*;

mod path;
pub use path::*;

mod json;

mod entity;
pub use entity::*;
