//! Text parsers behind the primitive converters of [`crate::Registry::primitives`].

use std::fmt;

/// A scalar's text could not be read as the requested primitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScalarError {
    ty: &'static str,
    text: String,
}

impl ScalarError {
    fn new(ty: &'static str, text: &str) -> Self {
        Self {
            ty,
            text: text.to_owned(),
        }
    }
}

impl fmt::Display for ScalarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: `{}`", self.ty, self.text)
    }
}

impl std::error::Error for ScalarError {}

/// Parse a boolean, accepting the YAML 1.1 forms as well as `true`/`false`.
///
/// Accepted TRUE literals (case-insensitive): "y", "yes", "true", "on"
/// Accepted FALSE literals (case-insensitive): "n", "no", "false", "off"
pub(crate) fn parse_yaml11_bool(s: &str) -> Result<bool, ScalarError> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("true")
        || t.eq_ignore_ascii_case("yes")
        || t.eq_ignore_ascii_case("y")
        || t.eq_ignore_ascii_case("on")
    {
        Ok(true)
    } else if t.eq_ignore_ascii_case("false")
        || t.eq_ignore_ascii_case("no")
        || t.eq_ignore_ascii_case("n")
        || t.eq_ignore_ascii_case("off")
    {
        Ok(false)
    } else {
        Err(ScalarError::new("bool", s))
    }
}

fn digit_value(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u32),
        b'a'..=b'f' => Some(10 + (b - b'a') as u32),
        b'A'..=b'F' => Some(10 + (b - b'A') as u32),
        _ => None,
    }
}

/// Magnitude of `digits` in `radix`, skipping `_` separators.
fn parse_magnitude(digits: &str, radix: u32) -> Option<u128> {
    let mut val: u128 = 0;
    let mut saw = false;
    for b in digits.bytes() {
        if b == b'_' {
            continue;
        }
        let d = digit_value(b).filter(|d| *d < radix)?;
        val = val.checked_mul(radix as u128)?.checked_add(d as u128)?;
        saw = true;
    }
    saw.then_some(val)
}

/// Split an optional base prefix (`0x`, `0o`, `0b`) off an unsigned body.
fn split_radix(rest: &str) -> (u32, &str) {
    if let Some(r) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, r)
    } else if let Some(r) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        (8, r)
    } else if let Some(r) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (2, r)
    } else {
        (10, rest)
    }
}

pub(crate) fn parse_int_signed<T>(s: &str, ty: &'static str) -> Result<T, ScalarError>
where
    T: TryFrom<i128>,
{
    let t = s.trim();
    let (neg, rest) = match t.strip_prefix('+') {
        Some(r) => (false, r),
        None => match t.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, t),
        },
    };
    let (radix, digits) = split_radix(rest);

    let invalid = || ScalarError::new(ty, s);
    let mag = parse_magnitude(digits, radix).ok_or_else(invalid)?;
    let val: i128 = if neg {
        // i128::MIN has no positive counterpart.
        if mag == i128::MIN.unsigned_abs() {
            i128::MIN
        } else {
            i128::try_from(mag).map_err(|_| invalid())?.wrapping_neg()
        }
    } else {
        i128::try_from(mag).map_err(|_| invalid())?
    };
    T::try_from(val).map_err(|_| invalid())
}

pub(crate) fn parse_int_unsigned<T>(s: &str, ty: &'static str) -> Result<T, ScalarError>
where
    T: TryFrom<u128>,
{
    let t = s.trim();
    let invalid = || ScalarError::new(ty, s);
    if t.starts_with('-') {
        return Err(invalid());
    }
    let rest = t.strip_prefix('+').unwrap_or(t);
    let (radix, digits) = split_radix(rest);

    let mag = parse_magnitude(digits, radix).ok_or_else(invalid)?;
    T::try_from(mag).map_err(|_| invalid())
}

/// Infinity or not-a-number, in the canonical `Inf`, `-Inf` and `NaN` texts or the YAML
/// `.inf` / `.nan` spellings.
fn special_float(t: &str) -> Option<f64> {
    match t.to_ascii_lowercase().as_str() {
        "nan" | ".nan" | "+.nan" | "-.nan" => Some(f64::NAN),
        "inf" | "+inf" | ".inf" | "+.inf" => Some(f64::INFINITY),
        "-inf" | "-.inf" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

pub(crate) fn parse_f64(s: &str) -> Result<f64, ScalarError> {
    let t = s.trim();
    match special_float(t) {
        Some(v) => Ok(v),
        None => t
            .replace('_', "")
            .parse::<f64>()
            .map_err(|_| ScalarError::new("f64", s)),
    }
}

pub(crate) fn parse_f32(s: &str) -> Result<f32, ScalarError> {
    let t = s.trim();
    match special_float(t) {
        Some(v) => Ok(v as f32),
        None => t
            .replace('_', "")
            .parse::<f32>()
            .map_err(|_| ScalarError::new("f32", s)),
    }
}

pub(crate) fn parse_char(s: &str) -> Result<char, ScalarError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ScalarError::new("char", s)),
    }
}
