//! Typed binder for a restricted, indentation-only YAML subset.
//!
//! Supported grammar:
//! - Block mappings (`key: value`), block sequences (`- ` items) and plain
//!   scalars; nesting is signaled purely by indentation depth.
//! - Blank lines are structurally inert; keys end at the first colon.
//! - No flow collections, quoting, comments, anchors, tags, or
//!   multi-document streams.
//!
//! Binding:
//! - Target types are declared with [`yaml_struct!`], which records the
//!   constructor parameters — external key aliases, optionality, defaults,
//!   per-field custom converters — in a [`TypeDescriptor`] built once and
//!   cached for the process lifetime.
//! - Two interchangeable binder strategies: generic (walks the descriptor
//!   every call) and compiled (caches a per-type binding plan keyed by type
//!   name and parameter count). Selection is explicit via [`Options`].
//! - Booleans accept exactly `true`/`false`; numbers parse decimally with
//!   `_` separators allowed.
//!
//! Iteration:
//! - [`from_list_str`] parses a whole sequence document eagerly;
//!   [`sequence`] yields one materialized item per demand without reading
//!   past the item boundary.
//! - [`from_folder`] parses every file of a directory eagerly;
//!   [`folder_sequence`] opens, parses and closes one file per demand.
//!
//! ```rust
//! use yamlet::{from_str, yaml_struct};
//!
//! yaml_struct! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Address {
//!         street: String,
//!         nr: i64,
//!         city: String,
//!     }
//! }
//!
//! yaml_struct! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Student {
//!         [key = "full name"] name: String,
//!         nr: i64,
//!         address: Option<Address>,
//!     }
//! }
//!
//! let yaml = "\
//! full name: Maria Candida
//! nr: 873435
//! address:
//!   street: Rua Rosa
//!   nr: 78
//!   city: Lisbon
//! ";
//! let student: Student = from_str(yaml).unwrap();
//! assert_eq!(student.name, "Maria Candida");
//! assert_eq!(student.nr, 873435);
//! assert_eq!(student.address.unwrap().city, "Lisbon");
//! ```

pub use crate::api::{
    folder_sequence, folder_sequence_with_options, from_folder, from_folder_with_options,
    from_list_str, from_list_str_with_options, from_reader, from_reader_with_options, from_str,
    from_str_with_options, sequence, sequence_with_options, value_from_str,
    value_from_str_with_options,
};
pub use crate::binder::{Binder, CompiledBinder, GenericBinder, PlanCache};
pub use crate::descriptor::{
    Args, Converter, Field, FieldBind, FieldSpec, FromYaml, Parameter, Shape, TypeDescriptor,
};
pub use crate::error::{Error, Location};
pub use crate::folder::FolderIter;
pub use crate::options::{BinderChoice, DuplicateKeyPolicy, Options};
pub use crate::sequences::SequenceIter;
pub use crate::value::Value;

mod api;
pub mod binder;
mod blocks;
pub mod descriptor;
mod error;
mod folder;
mod line_input;
mod macros;
mod materialize;
mod options;
mod parse_scalars;
mod sequences;
mod value;
