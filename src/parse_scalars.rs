//! Built-in scalar coercions.
//!
//! These are the fallbacks applied when no custom converter is registered
//! for a parameter. Errors are plain strings; the materializer wraps them
//! into [`crate::Error::TypeCoercionFailure`] together with the target type
//! and key.

use std::str::FromStr;

/// Parse a strict boolean from scalar text.
///
/// Accepted literals are exactly `true` and `false`, case-sensitive. Forms
/// like `True`, `YES` or `on` are rejected rather than inferred.
///
/// Returns:
/// - Ok(true/false) on success
/// - Err(...) if the input is not one of the two literals
pub(crate) fn parse_bool(s: &str) -> Result<bool, String> {
    match s.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!(
            "invalid boolean `{other}` (expected `true` or `false`)"
        )),
    }
}

/// Parse a decimal integer from scalar text.
///
/// `_` separators between digits are skipped, so `1_000_000` parses the same
/// as `1000000`. Anything else that `FromStr` rejects is an error.
pub(crate) fn parse_int<T>(s: &str) -> Result<T, String>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    let t = s.trim();
    if t.contains('_') {
        let stripped: String = t.chars().filter(|c| *c != '_').collect();
        stripped
            .parse()
            .map_err(|e| format!("invalid integer `{t}`: {e}"))
    } else {
        t.parse().map_err(|e| format!("invalid integer `{t}`: {e}"))
    }
}

/// Parse a floating-point number from scalar text.
pub(crate) fn parse_float<T>(s: &str) -> Result<T, String>
where
    T: FromStr<Err = std::num::ParseFloatError>,
{
    let t = s.trim();
    t.parse().map_err(|e| format!("invalid number `{t}`: {e}"))
}
