//! Parser and binder configuration options.

/// Duplicate key handling policy for mappings.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicateKeyPolicy {
    /// Error out on encountering a duplicate key.
    Error,
    /// First key wins: later duplicate pairs are parsed and dropped.
    FirstWins,
    /// Last key wins: a later duplicate pair replaces the earlier one.
    LastWins,
}

/// Which binder strategy materializes parsed mappings into instances.
///
/// Both strategies produce identical results for every supported shape; the
/// compiled one caches a per-type binding plan after first use. Selection is
/// a caller choice, nothing is auto-detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinderChoice {
    /// Walk the type descriptor on every call.
    Generic,
    /// Reuse a cached binding plan keyed by `(type name, parameter count)`.
    /// Types with a list-of-composite parameter are not compiled and are
    /// routed through the generic path (see [`crate::binder::CompiledBinder`]).
    Compiled,
}

/// Parser configuration options.
///
/// Use this to select the binder strategy and the duplicate-key policy.
///
/// Example: parse a small `Config` using custom `Options`.
///
/// ```rust
/// use yamlet::{from_str_with_options, yaml_struct, BinderChoice};
///
/// yaml_struct! {
///     #[derive(Debug, PartialEq)]
///     pub struct Config {
///         name: String,
///         enabled: bool,
///         retries: i64,
///     }
/// }
///
/// let yaml = "name: My Application\nenabled: true\nretries: 5\n";
///
/// let options = yamlet::options! {
///     binder: BinderChoice::Compiled,
/// };
///
/// let cfg: Config = from_str_with_options(yaml, options).unwrap();
/// assert_eq!(cfg.name, "My Application");
/// assert_eq!(cfg.retries, 5);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Strategy used to turn parsed mappings into instances.
    pub binder: BinderChoice,
    /// Policy for duplicate keys. The grammar declares keys unique within a
    /// mapping, so the default is to reject duplicates.
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            binder: BinderChoice::Generic,
            duplicate_keys: DuplicateKeyPolicy::Error,
        }
    }
}
