use std::fmt;

use super::{
    Value,
    repr::{repr, sorted_pairs, sorted_values},
};

/// Pretty-print `value` for a line of `width` columns.
///
/// A value whose single-line representation fits is returned as is.
/// Otherwise lists, tuples, sets and dicts are split one element per line,
/// aligned after the opening bracket, recursively. Dict keys and set
/// elements are sorted. Any failing representation fails the whole call.
pub fn pformat(value: &Value, width: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();
    Formatter { width }.format(&mut out, value, 0, 0)?;
    Ok(out)
}

struct Formatter {
    width: usize,
}

impl Formatter {
    /// Write `value` whose first line starts at column `indent`; `allowance`
    /// columns must stay free after its last line for closing brackets.
    fn format(
        &self,
        out: &mut String,
        value: &Value,
        indent: usize,
        allowance: usize,
    ) -> fmt::Result {
        let single = repr(value, true)?;
        let available = self.width.saturating_sub(indent + allowance);
        if single.chars().count() <= available {
            out.push_str(&single);
            return Ok(());
        }

        match value {
            Value::List(items) if !items.is_empty() => {
                self.format_items(out, "[", items.iter(), "]", indent, allowance)
            }
            Value::Tuple(items) if items.len() == 1 => {
                out.push('(');
                self.format(out, &items[0], indent + 1, allowance + 2)?;
                out.push_str(",)");
                Ok(())
            }
            Value::Tuple(items) if !items.is_empty() => {
                self.format_items(out, "(", items.iter(), ")", indent, allowance)
            }
            Value::Set(items) if !items.is_empty() => {
                self.format_items(out, "{", sorted_values(items).into_iter(), "}", indent, allowance)
            }
            Value::Dict(pairs) if !pairs.is_empty() => {
                out.push('{');
                let pairs = sorted_pairs(pairs);
                let last = pairs.len() - 1;
                for (i, (key, value)) in pairs.into_iter().enumerate() {
                    if i > 0 {
                        out.push_str(",\n");
                        push_spaces(out, indent + 1);
                    }
                    let key = repr(key, true)?;
                    out.push_str(&key);
                    out.push_str(": ");
                    let item_allowance = if i == last { allowance + 1 } else { 1 };
                    let value_indent = indent + 1 + key.chars().count() + 2;
                    self.format(out, value, value_indent, item_allowance)?;
                }
                out.push('}');
                Ok(())
            }
            _ => {
                out.push_str(&single);
                Ok(())
            }
        }
    }

    fn format_items<'a>(
        &self,
        out: &mut String,
        open: &str,
        items: impl ExactSizeIterator<Item = &'a Value>,
        close: &str,
        indent: usize,
        allowance: usize,
    ) -> fmt::Result {
        out.push_str(open);
        let last = items.len().saturating_sub(1);
        for (i, item) in items.enumerate() {
            if i > 0 {
                out.push_str(",\n");
                push_spaces(out, indent + 1);
            }
            let item_allowance = if i == last { allowance + 1 } else { 1 };
            self.format(out, item, indent + 1, item_allowance)?;
        }
        out.push_str(close);
        Ok(())
    }
}

fn push_spaces(out: &mut String, count: usize) {
    out.extend(std::iter::repeat_n(' ', count));
}
