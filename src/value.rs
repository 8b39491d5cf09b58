//! The generic value tree produced by the block parser.
//!
//! A parsed document is one [`Value`]: raw trimmed text, an ordered mapping,
//! or an ordered sequence. The tree is immutable once built and carries no
//! knowledge of target types; binding happens downstream against a type
//! descriptor.

/// One node of a parsed block document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw trimmed scalar text. Coercion to numbers or booleans is the
    /// materializer's job, not the parser's.
    Scalar(String),
    /// Ordered `(key, value)` pairs. Key uniqueness is enforced at parse
    /// time according to the configured duplicate-key policy.
    Mapping(Vec<(String, Value)>),
    /// Ordered list of nested values.
    Sequence(Vec<Value>),
}

impl Value {
    /// Returns the scalar text if this node is a scalar.
    #[inline]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up `key` if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Human-readable shape name, used in coercion error messages.
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Mapping(_) => "mapping",
            Value::Sequence(_) => "sequence",
        }
    }
}
