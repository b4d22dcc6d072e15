use std::{cmp::Ordering, fmt, fmt::Write};

use super::Value;

/// Containers nested deeper than this are unprintable.
pub(super) const MAX_DEPTH: usize = 256;

/// Single-line representation. With `sorted`, set elements and dict keys
/// are ordered by [`compare`] so the output does not depend on host order.
pub(super) fn repr(value: &Value, sorted: bool) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_repr(&mut out, value, sorted, 0)?;
    Ok(out)
}

fn write_repr(out: &mut String, value: &Value, sorted: bool, depth: usize) -> fmt::Result {
    if depth > MAX_DEPTH {
        return Err(fmt::Error);
    }
    let depth = depth + 1;
    match value {
        Value::None => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(v) => write!(out, "{}", v)?,
        Value::Float(v) => out.push_str(&float_repr(*v)),
        Value::Str(text) => out.push_str(&str_repr(text)),
        Value::Bytes(bytes) => out.push_str(&bytes_repr(bytes)),
        Value::List(items) => write_items(out, "[", items.iter(), "]", sorted, depth)?,
        Value::Tuple(items) if items.len() == 1 => {
            out.push('(');
            write_repr(out, &items[0], sorted, depth)?;
            out.push_str(",)");
        }
        Value::Tuple(items) => write_items(out, "(", items.iter(), ")", sorted, depth)?,
        Value::Set(items) if items.is_empty() => out.push_str("set()"),
        Value::Set(items) if sorted => write_items(out, "{", sorted_values(items), "}", sorted, depth)?,
        Value::Set(items) => write_items(out, "{", items.iter(), "}", sorted, depth)?,
        Value::Dict(pairs) => {
            let pairs: Vec<&(Value, Value)> = if sorted {
                sorted_pairs(pairs)
            } else {
                pairs.iter().collect()
            };
            out.push('{');
            for (i, (key, value)) in pairs.into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(out, key, sorted, depth)?;
                out.push_str(": ");
                write_repr(out, value, sorted, depth)?;
            }
            out.push('}');
        }
        Value::Callable(name) => write!(out, "<function {}>", name)?,
        Value::Object(object) => out.push_str(&object.repr()?),
    }
    Ok(())
}

fn write_items<'a>(
    out: &mut String,
    open: &str,
    items: impl IntoIterator<Item = &'a Value>,
    close: &str,
    sorted: bool,
    depth: usize,
) -> fmt::Result {
    out.push_str(open);
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_repr(out, item, sorted, depth)?;
    }
    out.push_str(close);
    Ok(())
}

pub(super) fn sorted_values(items: &[Value]) -> Vec<&Value> {
    let mut items: Vec<&Value> = items.iter().collect();
    items.sort_by(|a, b| compare(a, b));
    items
}

pub(super) fn sorted_pairs(pairs: &[(Value, Value)]) -> Vec<&(Value, Value)> {
    let mut pairs: Vec<&(Value, Value)> = pairs.iter().collect();
    pairs.sort_by(|(a, _), (b, _)| compare(a, b));
    pairs
}

/// Total order used for sorting: numbers numerically, strings and bytes
/// lexicographically, everything else by type name and then representation.
pub(super) fn compare(a: &Value, b: &Value) -> Ordering {
    match (number(a), number(b)) {
        (Some(x), Some(y)) => return x.total_cmp(&y),
        (Some(_), None) | (None, Some(_)) => {}
        (None, None) => match (a, b) {
            (Value::Str(x), Value::Str(y)) => return x.cmp(y),
            (Value::Bytes(x), Value::Bytes(y)) => return x.cmp(y),
            _ => {}
        },
    }
    a.type_name().cmp(b.type_name()).then_with(|| {
        let x = repr(a, true).unwrap_or_default();
        let y = repr(b, true).unwrap_or_default();
        x.cmp(&y)
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(v) => Some(f64::from(u8::from(*v))),
        Value::Int(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        _ => None,
    }
}

pub(super) fn float_repr(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else {
        let text = format!("{:?}", value);
        // Rust writes `1e100`, the host language `1e+100`.
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    }
}

/// Quoted string literal: single quotes unless the text contains a single
/// quote and no double quote.
pub(super) fn str_repr(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xff {
                    let _ = write!(out, "\\x{:02x}", code);
                } else {
                    let _ = write!(out, "\\u{:04x}", code);
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

pub(super) fn bytes_repr(bytes: &[u8]) -> String {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(char::from(quote));
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if b == quote => {
                out.push('\\');
                out.push(char::from(b));
            }
            0x20..=0x7e => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\x{:02x}", byte);
            }
        }
    }
    out.push(char::from(quote));
    out
}
