//! The value materializer: binds a parsed mapping to a type descriptor.
//!
//! For each parameter, in descriptor order: a nested mapping recurses into
//! the composite's own descriptor; a nested sequence materializes its
//! elements one by one; scalar text goes through the registered converter
//! or the built-in coercion; an absent key is either a missing-property
//! error or the parameter's resolved default. The gathered slots are then
//! handed to the construct function in a single atomic call.

use crate::descriptor::{Args, ElemKind, Field, ParamKind, Parameter, TypeDescriptor};
use crate::error::Error;
use crate::value::Value;

/// Materialize an instance of the described type from a parsed value.
///
/// Fails with `MissingRequiredProperty` when a required parameter's external
/// key is absent, and with `TypeCoercionFailure` on any shape or text
/// mismatch. The error aborts the whole unit; nothing partial escapes.
pub(crate) fn materialize(value: &Value, desc: &TypeDescriptor) -> Result<Field, Error> {
    if !matches!(value, Value::Mapping(_)) {
        return Err(Error::coercion(
            desc.type_name(),
            "",
            format!("expected a mapping block, found a {}", value.kind_name()),
        ));
    }
    let mut args = Args::new(desc.type_name(), desc.params().len());
    for param in desc.params() {
        let field = match value.get(param.key) {
            Some(v) => bind_value(v, param, desc.type_name())?,
            None => absent(param, desc.type_name())?,
        };
        args.push(param.name, field);
    }
    desc.construct(&mut args)
}

/// Resolve an absent key: error if required, otherwise the default fixed
/// when the descriptor was built (`None`, empty list, or a user expression).
pub(crate) fn absent(param: &Parameter, type_name: &'static str) -> Result<Field, Error> {
    if param.required {
        return Err(Error::MissingRequiredProperty {
            type_name,
            key: param.key,
        });
    }
    match param.default {
        Some(default) => Ok(default()),
        None => Err(Error::coercion(
            type_name,
            param.key,
            "optional parameter has no default",
        )),
    }
}

/// Bind one present value to one parameter.
fn bind_value(value: &Value, param: &Parameter, type_name: &'static str) -> Result<Field, Error> {
    match value {
        Value::Scalar(s) => {
            let bound = match &param.converter {
                // A registered converter always wins over built-in coercion
                // and receives the raw trimmed text.
                Some(converter) => converter.apply(s).and_then(|f| (param.wrap)(f)),
                None => (param.from_scalar)(s),
            };
            bound.map_err(|detail| Error::coercion(type_name, param.key, detail))
        }
        Value::Mapping(_) => match param.kind {
            ParamKind::Composite(desc) => {
                let instance = materialize(value, desc())?;
                (param.wrap)(instance)
                    .map_err(|detail| Error::coercion(type_name, param.key, detail))
            }
            _ => Err(Error::coercion(
                type_name,
                param.key,
                "unexpected nested mapping for a non-composite parameter",
            )),
        },
        Value::Sequence(items) => match &param.kind {
            ParamKind::List(elem) => {
                let mut fields = Vec::with_capacity(items.len());
                for item in items {
                    fields.push(bind_element(item, elem, param, type_name)?);
                }
                let Some(collect) = param.collect else {
                    return Err(Error::coercion(
                        type_name,
                        param.key,
                        "parameter does not accept a sequence",
                    ));
                };
                collect(fields).map_err(|detail| Error::coercion(type_name, param.key, detail))
            }
            _ => Err(Error::coercion(
                type_name,
                param.key,
                "unexpected sequence for a non-list parameter",
            )),
        },
    }
}

/// Bind one sequence element, preserving input order at the call site.
fn bind_element(
    item: &Value,
    elem: &ElemKind,
    param: &Parameter,
    type_name: &'static str,
) -> Result<Field, Error> {
    match (elem, item) {
        (ElemKind::Scalar(parse), Value::Scalar(s)) => {
            parse(s).map_err(|detail| Error::coercion(type_name, param.key, detail))
        }
        (ElemKind::Scalar(_), other) => Err(Error::coercion(
            type_name,
            param.key,
            format!("list elements must be scalars, found a {}", other.kind_name()),
        )),
        (ElemKind::Composite(desc), Value::Mapping(_)) => materialize(item, desc()),
        (ElemKind::Composite(desc), other) => Err(Error::coercion(
            type_name,
            param.key,
            format!(
                "list elements must be `{}` mappings, found a {}",
                desc().type_name(),
                other.kind_name()
            ),
        )),
    }
}
