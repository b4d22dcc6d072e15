/// Find the byte offset where a `#` comment starts outside of string
/// literals.
///
/// Scans the line left-to-right, tracking `'...'` and `"..."` strings (with
/// backslash escapes). Triple-quoted strings spanning lines are not tracked.
pub fn find_comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    let mut quote: Option<u8> = None;

    while i < len {
        match quote {
            Some(q) => match bytes[i] {
                // Skip escaped character (e.g. \", \\)
                b'\\' => i += 2,
                b if b == q => {
                    quote = None;
                    i += 1;
                }
                _ => i += 1,
            },
            None => match bytes[i] {
                b'"' | b'\'' => {
                    quote = Some(bytes[i]);
                    i += 1;
                }
                b'#' => return Some(i),
                _ => i += 1,
            },
        }
    }

    None
}

/// The line with any trailing comment removed.
pub fn strip_comment(line: &str) -> &str {
    match find_comment_start(line) {
        Some(start) => line[..start].trim_end(),
        None => line,
    }
}

/// Closing minus opening parentheses, ignoring those inside strings.
pub fn paren_balance(line: &str) -> isize {
    let mut balance = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for ch in line.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' => balance -= 1,
            ')' => balance += 1,
            _ => {}
        }
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_comment_outside_strings() {
        assert_eq!(find_comment_start("x = 1  # note"), Some(7));
        assert_eq!(find_comment_start("x = '#' + \"#\""), None);
        assert_eq!(find_comment_start(r##"x = "a\"#" # c"##), Some(11));
    }

    #[test]
    fn strips_comment_and_trailing_space() {
        assert_eq!(strip_comment("total = f(a)   # why"), "total = f(a)");
        assert_eq!(strip_comment("plain"), "plain");
    }

    #[test]
    fn balance_counts_unmatched_closers() {
        assert_eq!(paren_balance("    b, c)"), 1);
        assert_eq!(paren_balance("f(a, (b))"), 0);
        assert_eq!(paren_balance("g(')', x"), -1);
    }
}
