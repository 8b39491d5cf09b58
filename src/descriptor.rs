//! Type descriptors: per-type constructor metadata driving the materializer.
//!
//! A [`TypeDescriptor`] is the ordered list of a target type's constructor
//! parameters — name, external key alias, declared kind, optionality and
//! default, optional custom converter — plus the construct function that
//! turns gathered argument slots into an instance. Descriptors are built
//! once per type (the `yaml_struct!` macro caches them in a `OnceLock`) and
//! are read-only afterwards.
//!
//! Everything a descriptor stores is either a `fn` pointer or `Send + Sync`
//! data, so descriptors can live in statics. Field values travel through
//! the materializer type-erased as [`Field`] boxes; each parameter carries
//! the resolved hooks (coerce, wrap, collect) for its concrete Rust type,
//! fixed when the descriptor is built rather than re-derived per call.

use std::any::Any;

use crate::error::Error;

/// A type-erased field value in transit between coercion and construction.
pub type Field = Box<dyn Any>;

/// Lazily resolves the descriptor of a composite type.
pub type DescriptorFn = fn() -> &'static TypeDescriptor;

/// Built-in or converter-produced scalar coercion: trimmed text in, erased
/// value out. The error string is wrapped into a `TypeCoercionFailure` by
/// the caller, which knows the target type and key.
pub type ScalarFn = fn(&str) -> Result<Field, String>;

/// Lifts a materialized inner value into the field's own type (identity for
/// plain fields, `Some`-wrapping for `Option<T>`).
pub(crate) type WrapFn = fn(Field) -> Result<Field, String>;

/// Collects erased list elements into the field's concrete `Vec<T>`.
pub(crate) type CollectFn = fn(Vec<Field>) -> Result<Field, String>;

/// Builds the instance from the gathered argument slots, atomically.
pub type ConstructFn = fn(&mut Args) -> Result<Field, Error>;

/// How a target type presents itself to the parser and binder.
pub enum Shape {
    /// A primitive: documents and sequence elements of this type are plain
    /// scalar text parsed by the given function.
    Scalar(ScalarFn),
    /// A composite: documents of this type are mappings bound through the
    /// type's descriptor.
    Mapping(DescriptorFn),
}

/// A target type of the binder.
///
/// Implemented by the shipped scalar primitives and by every struct declared
/// through [`crate::yaml_struct!`]; hand-written impls only need a name and
/// a [`Shape`].
pub trait FromYaml: Sized + 'static {
    /// Type name used in error messages and as the binding-plan cache key.
    fn type_name() -> &'static str;
    /// Scalar or mapping shape of this type.
    fn shape() -> Shape;
}

/// Field-position behavior of a type: how it acts as a constructor
/// parameter.
///
/// Distinct from [`FromYaml`] because wrappers change the rules without
/// being targets themselves: `Option<T>` is never required and defaults to
/// `None`, `Vec<T>` defaults to the empty list.
pub trait FieldBind: Sized + 'static {
    fn field_spec() -> FieldSpec;
}

/// Declared kind of one constructor parameter.
#[derive(Clone, Copy, Debug)]
pub enum ParamKind {
    /// Bound from scalar text.
    Scalar,
    /// Bound from a nested mapping via the referenced descriptor.
    Composite(DescriptorFn),
    /// Bound from a nested sequence, one element at a time.
    List(ElemKind),
}

/// Element kind of a list parameter.
#[derive(Clone, Copy, Debug)]
pub enum ElemKind {
    /// Elements are scalars, coerced independently.
    Scalar(ScalarFn),
    /// Elements are mappings, each materialized via the descriptor.
    Composite(DescriptorFn),
}

/// The resolved field-position hooks for one Rust type.
pub struct FieldSpec {
    pub(crate) kind: ParamKind,
    pub(crate) required: bool,
    pub(crate) default: Option<fn() -> Field>,
    pub(crate) from_scalar: ScalarFn,
    pub(crate) wrap: WrapFn,
    pub(crate) collect: Option<CollectFn>,
}

impl FieldSpec {
    /// The base spec for any target type used directly as a field:
    /// required, no default, scalar coercion per the type's shape.
    pub fn of<T: FromYaml>() -> FieldSpec {
        FieldSpec {
            kind: kind_of::<T>(),
            required: true,
            default: None,
            from_scalar: bind_scalar::<T>,
            wrap: wrap_identity,
            collect: None,
        }
    }
}

/// A custom scalar converter registered for one parameter.
///
/// Always takes precedence over built-in coercion and receives the raw
/// trimmed scalar text. The conversion function is erased here so the
/// descriptor stays object-safe and `Sync`.
pub struct Converter {
    apply: Box<dyn Fn(&str) -> Result<Field, String> + Send + Sync>,
}

impl Converter {
    /// Register `f` as the converter for a parameter whose field type is
    /// `T` (or `Option<T>`; the parameter's wrap hook lifts the value).
    pub fn of<T: 'static>(f: fn(&str) -> Result<T, String>) -> Self {
        Converter {
            apply: Box::new(move |s| f(s).map(|v| Box::new(v) as Field)),
        }
    }

    #[inline]
    pub(crate) fn apply(&self, s: &str) -> Result<Field, String> {
        (self.apply)(s)
    }
}

/// One constructor parameter of a described type.
pub struct Parameter {
    pub(crate) name: &'static str,
    pub(crate) key: &'static str,
    pub(crate) required: bool,
    pub(crate) kind: ParamKind,
    pub(crate) default: Option<fn() -> Field>,
    pub(crate) converter: Option<Converter>,
    pub(crate) from_scalar: ScalarFn,
    pub(crate) wrap: WrapFn,
    pub(crate) collect: Option<CollectFn>,
}

impl Parameter {
    /// Describe a parameter named `name` whose field type is `F`. The
    /// external key defaults to the name; kind, optionality and default
    /// come from the field type itself.
    pub fn of<F: FieldBind>(name: &'static str) -> Self {
        let spec = F::field_spec();
        Self {
            name,
            key: name,
            required: spec.required,
            kind: spec.kind,
            default: spec.default,
            converter: None,
            from_scalar: spec.from_scalar,
            wrap: spec.wrap,
            collect: spec.collect,
        }
    }

    /// Bind this parameter to a differently-named input key.
    pub fn key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// Register a custom scalar converter for this parameter.
    pub fn converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Give this parameter an explicit default, making it non-required.
    pub fn default_fn(mut self, default: fn() -> Field) -> Self {
        self.default = Some(default);
        self.required = false;
        self
    }

    /// Constructor parameter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// External key this parameter binds to.
    pub fn external_key(&self) -> &'static str {
        self.key
    }

    /// Whether the key must be present in the input mapping.
    pub fn required(&self) -> bool {
        self.required
    }
}

/// Constructor metadata of one target type: the ordered parameter list and
/// the construct function.
pub struct TypeDescriptor {
    type_name: &'static str,
    params: Vec<Parameter>,
    construct: ConstructFn,
}

impl TypeDescriptor {
    pub fn new(type_name: &'static str, params: Vec<Parameter>, construct: ConstructFn) -> Self {
        Self {
            type_name,
            params,
            construct,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Run the construct function over the gathered slots. All values are
    /// passed at once; no partially constructed instance is observable.
    pub(crate) fn construct(&self, args: &mut Args) -> Result<Field, Error> {
        (self.construct)(args)
    }
}

/// The gathered argument slots for one construction, in descriptor order.
pub struct Args {
    type_name: &'static str,
    slots: Vec<(&'static str, Option<Field>)>,
}

impl Args {
    pub(crate) fn new(type_name: &'static str, capacity: usize) -> Self {
        Self {
            type_name,
            slots: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: Field) {
        self.slots.push((name, Some(value)));
    }

    /// Take the slot gathered for parameter `name`, downcast to the field's
    /// concrete type. Called by generated construct functions, once per
    /// parameter, in declaration order.
    pub fn take<T: 'static>(&mut self, name: &'static str) -> Result<T, Error> {
        let slot = self
            .slots
            .iter_mut()
            .find(|(n, v)| *n == name && v.is_some())
            .and_then(|(_, v)| v.take())
            .ok_or_else(|| {
                Error::coercion(self.type_name, "", format!("no value gathered for `{name}`"))
            })?;
        slot.downcast::<T>().map(|b| *b).map_err(|_| {
            Error::coercion(
                self.type_name,
                "",
                format!("converter produced an unexpected value type for `{name}`"),
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Field-position impls
// ---------------------------------------------------------------------------

pub(crate) fn kind_of<T: FromYaml>() -> ParamKind {
    match T::shape() {
        Shape::Scalar(_) => ParamKind::Scalar,
        Shape::Mapping(desc) => ParamKind::Composite(desc),
    }
}

fn elem_of<T: FromYaml>() -> ElemKind {
    match T::shape() {
        Shape::Scalar(parse) => ElemKind::Scalar(parse),
        Shape::Mapping(desc) => ElemKind::Composite(desc),
    }
}

/// Scalar coercion for a target type used directly as a field. Composite
/// types have no built-in scalar form; only a converter can bind them from
/// text.
fn bind_scalar<T: FromYaml>(s: &str) -> Result<Field, String> {
    match T::shape() {
        Shape::Scalar(parse) => parse(s),
        Shape::Mapping(_) => Err(format!(
            "cannot build `{}` from a scalar without a converter",
            T::type_name()
        )),
    }
}

fn wrap_identity(field: Field) -> Result<Field, String> {
    Ok(field)
}

fn none_default<T: FromYaml>() -> Field {
    Box::new(None::<T>)
}

fn scalar_some<T: FromYaml>(s: &str) -> Result<Field, String> {
    let inner = bind_scalar::<T>(s)?;
    wrap_some::<T>(inner)
}

fn wrap_some<T: FromYaml>(field: Field) -> Result<Field, String> {
    match field.downcast::<T>() {
        Ok(v) => Ok(Box::new(Some(*v))),
        Err(_) => Err(format!("expected a `{}` value", T::type_name())),
    }
}

fn empty_list<T: FromYaml>() -> Field {
    Box::new(Vec::<T>::new())
}

fn scalar_not_list<T: FromYaml>(_s: &str) -> Result<Field, String> {
    Err(format!("expected a sequence of `{}`", T::type_name()))
}

fn collect_list<T: FromYaml>(items: Vec<Field>) -> Result<Field, String> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.downcast::<T>() {
            Ok(v) => out.push(*v),
            Err(_) => return Err(format!("expected `{}` list elements", T::type_name())),
        }
    }
    Ok(Box::new(out))
}

/// `Option<T>`: same kind as `T`, never required, defaults to `None`;
/// scalar and composite results are lifted into `Some`.
impl<T: FromYaml> FieldBind for Option<T> {
    fn field_spec() -> FieldSpec {
        FieldSpec {
            kind: kind_of::<T>(),
            required: false,
            default: Some(none_default::<T>),
            from_scalar: scalar_some::<T>,
            wrap: wrap_some::<T>,
            collect: None,
        }
    }
}

/// `Vec<T>`: list kind, never required, defaults to the empty list — the
/// canonical empty value for a list parameter.
impl<T: FromYaml> FieldBind for Vec<T> {
    fn field_spec() -> FieldSpec {
        FieldSpec {
            kind: ParamKind::List(elem_of::<T>()),
            required: false,
            default: Some(empty_list::<T>),
            from_scalar: scalar_not_list::<T>,
            wrap: wrap_identity,
            collect: Some(collect_list::<T>),
        }
    }
}

macro_rules! impl_scalar {
    ( $( $ty:ty => $name:literal, $parse:expr; )* ) => {
        $(
            impl FromYaml for $ty {
                fn type_name() -> &'static str {
                    $name
                }
                fn shape() -> Shape {
                    Shape::Scalar($parse)
                }
            }
            impl FieldBind for $ty {
                fn field_spec() -> FieldSpec {
                    FieldSpec::of::<$ty>()
                }
            }
        )*
    };
}

impl_scalar! {
    String => "String", |s| Ok(Box::new(s.to_string()) as Field);
    bool => "bool", |s| crate::parse_scalars::parse_bool(s).map(|v| Box::new(v) as Field);
    i16 => "i16", |s| crate::parse_scalars::parse_int::<i16>(s).map(|v| Box::new(v) as Field);
    i32 => "i32", |s| crate::parse_scalars::parse_int::<i32>(s).map(|v| Box::new(v) as Field);
    i64 => "i64", |s| crate::parse_scalars::parse_int::<i64>(s).map(|v| Box::new(v) as Field);
    u32 => "u32", |s| crate::parse_scalars::parse_int::<u32>(s).map(|v| Box::new(v) as Field);
    u64 => "u64", |s| crate::parse_scalars::parse_int::<u64>(s).map(|v| Box::new(v) as Field);
    f32 => "f32", |s| crate::parse_scalars::parse_float::<f32>(s).map(|v| Box::new(v) as Field);
    f64 => "f64", |s| crate::parse_scalars::parse_float::<f64>(s).map(|v| Box::new(v) as Field);
}
