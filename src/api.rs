//! Public parsing operations.
//!
//! Every operation pairs a plain form using `Options::default()` with a
//! `_with_options` form. All are generic over the target type `T:
//! FromYaml`; the binder strategy and duplicate-key policy come from
//! [`Options`].

use std::io::Read;
use std::path::Path;

use crate::binder::{Binder, CompiledBinder, GenericBinder};
use crate::blocks::{parse_str, parse_str_opt, split_scalar_items};
use crate::descriptor::{Field, FromYaml, Shape};
use crate::error::Error;
use crate::folder::{FolderIter, folder_paths};
use crate::options::{BinderChoice, Options};
use crate::sequences::SequenceIter;
use crate::value::Value;

/// Parse one mapping document into `T`.
pub fn from_str<T: FromYaml>(text: &str) -> Result<T, Error> {
    from_str_with_options(text, Options::default())
}

/// Parse one mapping document into `T` with explicit options.
pub fn from_str_with_options<T: FromYaml>(text: &str, options: Options) -> Result<T, Error> {
    let value = parse_str(text, T::type_name(), options.duplicate_keys)?;
    bind_root(&value, &options)
}

/// Parse one mapping document into `T` from any text source.
pub fn from_reader<T: FromYaml, R: Read>(mut reader: R) -> Result<T, Error> {
    from_reader_with_options(&mut reader, Options::default())
}

/// Parse one mapping document into `T` from any text source, with options.
pub fn from_reader_with_options<T: FromYaml, R: Read>(
    mut reader: R,
    options: Options,
) -> Result<T, Error> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    from_str_with_options(&text, options)
}

/// Parse a sequence document into an ordered `Vec<T>`, eagerly.
///
/// When `T` is a primitive (scalar-shaped) type, the document is split on
/// `-` delimiters and each trimmed token coerced directly; otherwise it
/// must be a block sequence of mappings. A blank document yields an empty
/// vector.
pub fn from_list_str<T: FromYaml>(text: &str) -> Result<Vec<T>, Error> {
    from_list_str_with_options(text, Options::default())
}

/// Like [`from_list_str`], with explicit options.
pub fn from_list_str_with_options<T: FromYaml>(
    text: &str,
    options: Options,
) -> Result<Vec<T>, Error> {
    match T::shape() {
        Shape::Scalar(parse) => split_scalar_items(text)
            .iter()
            .map(|token| {
                parse(token)
                    .map_err(|detail| Error::coercion(T::type_name(), "", detail))
                    .and_then(downcast::<T>)
            })
            .collect(),
        Shape::Mapping(_) => {
            match parse_str_opt(text, T::type_name(), options.duplicate_keys)? {
                None => Ok(Vec::new()),
                Some(Value::Sequence(items)) => items
                    .iter()
                    .map(|item| bind_root::<T>(item, &options))
                    .collect(),
                Some(other) => Err(Error::malformed(
                    T::type_name(),
                    format!("expected a sequence document, found a {}", other.kind_name()),
                )),
            }
        }
    }
}

/// Lazily iterate the items of a sequence document.
///
/// The returned iterator is forward-only, single-pass and non-restartable:
/// each `next()` reads exactly one block from the source (no read-ahead
/// past the boundary line) and materializes exactly one `T` before
/// yielding. An error leaves the iterator exhausted.
pub fn sequence<T: FromYaml, R: Read>(reader: R) -> SequenceIter<T, R> {
    sequence_with_options(reader, Options::default())
}

/// Like [`sequence`], with explicit options.
pub fn sequence_with_options<T: FromYaml, R: Read>(
    reader: R,
    options: Options,
) -> SequenceIter<T, R> {
    SequenceIter::new(reader, options)
}

/// Parse every file of a directory into `T`, eagerly.
///
/// Entries are processed in file-name order; each file is one mapping
/// document. The whole collection is materialized before returning, and any
/// failing file aborts the whole operation.
pub fn from_folder<T: FromYaml, P: AsRef<Path>>(path: P) -> Result<Vec<T>, Error> {
    from_folder_with_options(path, Options::default())
}

/// Like [`from_folder`], with explicit options.
pub fn from_folder_with_options<T: FromYaml, P: AsRef<Path>>(
    path: P,
    options: Options,
) -> Result<Vec<T>, Error> {
    let mut out = Vec::new();
    for file in folder_paths(path.as_ref())? {
        let text = std::fs::read_to_string(&file)?;
        out.push(from_str_with_options(&text, options)?);
    }
    Ok(out)
}

/// Lazily iterate a directory, one file per demand.
///
/// Each `next()` opens exactly one file (in file-name order), parses and
/// materializes its whole content as one `T`, and closes it before
/// yielding; no two files are ever open concurrently. An error leaves the
/// iterator exhausted.
pub fn folder_sequence<T: FromYaml, P: AsRef<Path>>(path: P) -> Result<FolderIter<T>, Error> {
    folder_sequence_with_options(path, Options::default())
}

/// Like [`folder_sequence`], with explicit options.
pub fn folder_sequence_with_options<T: FromYaml, P: AsRef<Path>>(
    path: P,
    options: Options,
) -> Result<FolderIter<T>, Error> {
    Ok(FolderIter::new(folder_paths(path.as_ref())?, options))
}

/// Parse a document into the generic [`Value`] tree, without binding it.
pub fn value_from_str(text: &str) -> Result<Value, Error> {
    value_from_str_with_options(text, Options::default())
}

/// Like [`value_from_str`], with explicit options.
pub fn value_from_str_with_options(text: &str, options: Options) -> Result<Value, Error> {
    parse_str(text, "document", options.duplicate_keys)
}

/// Bind an already-parsed value to `T` using the configured strategy.
pub(crate) fn bind_root<T: FromYaml>(value: &Value, options: &Options) -> Result<T, Error> {
    match T::shape() {
        Shape::Scalar(parse) => {
            let Some(s) = value.as_scalar() else {
                return Err(Error::coercion(
                    T::type_name(),
                    "",
                    format!("expected a scalar document, found a {}", value.kind_name()),
                ));
            };
            parse(s)
                .map_err(|detail| Error::coercion(T::type_name(), "", detail))
                .and_then(downcast::<T>)
        }
        Shape::Mapping(desc) => {
            let desc = desc();
            let field = match options.binder {
                BinderChoice::Generic => GenericBinder.bind_erased(value, desc),
                BinderChoice::Compiled => CompiledBinder::new().bind_erased(value, desc),
            }?;
            downcast::<T>(field)
        }
    }
}

fn downcast<T: FromYaml>(field: Field) -> Result<T, Error> {
    field.downcast::<T>().map(|b| *b).map_err(|_| {
        Error::coercion(
            T::type_name(),
            "",
            "materialized value has an unexpected type",
        )
    })
}
