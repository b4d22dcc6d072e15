/// Remove the whitespace prefix shared by every non-blank line.
///
/// Whitespace-only lines are emptied and do not take part in the margin.
/// Tabs and spaces are compared literally, so `"\t"` and `"    "` have no
/// common margin.
pub fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let indent = &line[..line.len() - line.trim_start().len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    let margin = margin.unwrap_or("");

    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !line.trim().is_empty() {
            out.push_str(&line[margin.len()..]);
        }
    }
    out
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum();
    &a[..len]
}

/// Drop blank lines at either end and trailing whitespace on the last line.
pub fn trim_blank_lines(text: &str) -> &str {
    let start = text
        .char_indices()
        .scan(0, |line_start, (i, ch)| {
            let current = *line_start;
            if ch == '\n' {
                *line_start = i + 1;
            }
            Some((current, ch))
        })
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(line_start, _)| line_start)
        .unwrap_or(text.len());
    text[start..].trim_end()
}
