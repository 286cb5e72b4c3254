//! Plain scalar resolution following the YAML 1.2 core schema.
//!
//! Only *plain* (unquoted) scalars are resolved; quoted and block scalars are always
//! strings. Resolution decides the node kind, the literal text is kept untouched so
//! converters see exactly what was written.

use crate::location::Location;
use crate::node::{Node, NodeKind};

/// Classify a plain scalar into its node kind.
pub(crate) fn resolve_plain(value: &str, location: Location) -> Node {
    Node::new(classify(value), location)
}

fn classify(value: &str) -> NodeKind {
    match value {
        "" | "~" | "null" | "Null" | "NULL" => NodeKind::Null,
        "true" | "True" | "TRUE" => NodeKind::Boolean(true),
        "false" | "False" | "FALSE" => NodeKind::Boolean(false),
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            NodeKind::Infinity { negative: false }
        }
        "-.inf" | "-.Inf" | "-.INF" => NodeKind::Infinity { negative: true },
        ".nan" | ".NaN" | ".NAN" => NodeKind::NaN,
        _ if is_int(value) => NodeKind::Integer(value.to_owned()),
        _ if is_float(value) => NodeKind::Float(value.to_owned()),
        _ => NodeKind::String(value.to_owned()),
    }
}

/// `[-+]?[0-9]+`, `0o[0-7]+` or `0x[0-9a-fA-F]+`.
fn is_int(s: &str) -> bool {
    if let Some(octal) = s.strip_prefix("0o") {
        return !octal.is_empty() && octal.bytes().all(|b| matches!(b, b'0'..=b'7'));
    }
    if let Some(hex) = s.strip_prefix("0x") {
        return !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?`
fn is_float(s: &str) -> bool {
    let body = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };

    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) => {
            let int_ok = int.bytes().all(|b| b.is_ascii_digit());
            let frac_ok = frac.bytes().all(|b| b.is_ascii_digit());
            // `.5` and `5.` are floats, a lone `.` is not.
            int_ok && frac_ok && !(int.is_empty() && frac.is_empty())
        }
        None => !mantissa.is_empty() && mantissa.bytes().all(|b| b.is_ascii_digit()),
    };
    if !mantissa_ok {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let digits = exp.strip_prefix(['-', '+']).unwrap_or(exp);
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
    }
}
