//! Public macros: option construction and binding declarations.
//!
//! `options!` keeps call sites ergonomic while allowing the crate to evolve
//! the option struct over time (e.g., adding fields) without breaking
//! changes. `yaml_struct!` declares a struct together with its type
//! descriptor, replacing per-call reflection with configuration resolved
//! once at first use.

/// Construct [`crate::Options`] from `Default` and a list of field
/// assignments.
///
/// Example:
///
/// ```rust
/// use yamlet::DuplicateKeyPolicy;
///
/// let options = yamlet::options! {
///     duplicate_keys: DuplicateKeyPolicy::LastWins,
/// };
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Declare a struct bindable from a mapping document.
///
/// Defines the struct itself (fields become `pub`) and implements
/// [`crate::FromYaml`]/[`crate::FieldBind`] for it, backed by a
/// [`crate::TypeDescriptor`] built once and cached for the life of the
/// process. Parameters are described in declaration order, which is also
/// the construction order.
///
/// Each field may carry bracketed attributes, in any combination:
///
/// - `[key = "other name"]` — bind the parameter to a differently-named
///   input key;
/// - `[via = converter_fn]` — a custom scalar converter,
///   `fn(&str) -> Result<T, String>`, taking precedence over built-in
///   coercion;
/// - `[default = expr]` — an explicit default, making the parameter
///   optional.
///
/// `Option<T>` fields are optional with a `None` default and `Vec<T>`
/// fields default to the empty list; all other fields are required unless
/// given a `[default = ...]`.
///
/// ```rust
/// use yamlet::{from_str, yaml_struct};
///
/// fn comma_name(value: &str) -> Result<String, String> {
///     match value.split_once(", ") {
///         Some((last, first)) => Ok(format!("{first} {last}")),
///         None => Err(format!("expected `Last, First`, got `{value}`")),
///     }
/// }
///
/// yaml_struct! {
///     #[derive(Debug, PartialEq)]
///     pub struct Person {
///         [key = "full name"] [via = comma_name] name: String,
///         age: i64,
///         email: Option<String>,
///     }
/// }
///
/// let person: Person = from_str("full name: Candida, Maria\nage: 15\n").unwrap();
/// assert_eq!(person.name, "Maria Candida");
/// assert_eq!(person.email, None);
/// ```
#[macro_export]
macro_rules! yaml_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $( [ $($attr:tt)+ ] )* $field:ident : $fty:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( pub $field : $fty ),+
        }

        impl $crate::FromYaml for $name {
            fn type_name() -> &'static str {
                stringify!($name)
            }

            fn shape() -> $crate::Shape {
                fn descriptor() -> &'static $crate::TypeDescriptor {
                    static DESCRIPTOR: ::std::sync::OnceLock<$crate::TypeDescriptor> =
                        ::std::sync::OnceLock::new();
                    DESCRIPTOR.get_or_init(|| {
                        $crate::TypeDescriptor::new(
                            stringify!($name),
                            ::std::vec![
                                $(
                                    $crate::yaml_struct!(
                                        @param $field : $fty ; $( $($attr)+ );*
                                    )
                                ),+
                            ],
                            |args: &mut $crate::Args| {
                                ::std::result::Result::Ok(::std::boxed::Box::new($name {
                                    $(
                                        $field : args.take::<$fty>(stringify!($field))?
                                    ),+
                                }))
                            },
                        )
                    })
                }
                $crate::Shape::Mapping(descriptor)
            }
        }

        impl $crate::FieldBind for $name {
            fn field_spec() -> $crate::FieldSpec {
                $crate::FieldSpec::of::<$name>()
            }
        }
    };

    // Parameter assembly: fold the bracket attributes onto the builder.
    (@param $field:ident : $fty:ty ; ) => {
        $crate::Parameter::of::<$fty>(stringify!($field))
    };
    (@param $field:ident : $fty:ty ; $($attrs:tt)+) => {
        $crate::yaml_struct!(
            @attrs $crate::Parameter::of::<$fty>(stringify!($field)) , $fty ; $($attrs)+
        )
    };

    (@attrs $builder:expr , $fty:ty ; ) => { $builder };
    (@attrs $builder:expr , $fty:ty ; key = $key:literal $(; $($rest:tt)*)? ) => {
        $crate::yaml_struct!(@attrs ($builder).key($key) , $fty ; $($($rest)*)? )
    };
    (@attrs $builder:expr , $fty:ty ; via = $converter:path $(; $($rest:tt)*)? ) => {
        $crate::yaml_struct!(
            @attrs ($builder).converter($crate::Converter::of($converter)) , $fty ; $($($rest)*)?
        )
    };
    (@attrs $builder:expr , $fty:ty ; default = $default:expr $(; $($rest:tt)*)? ) => {
        $crate::yaml_struct!(
            @attrs ($builder).default_fn(|| {
                let v: $fty = $default;
                ::std::boxed::Box::new(v) as $crate::Field
            }) , $fty ; $($($rest)*)?
        )
    };
}
