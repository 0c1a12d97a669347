//! Comma-list scanning for shorthand CSS values.

/// Split a CSS value on top-level commas.
///
/// A naive `value.split(',')` breaks lists that contain functional values:
/// `linear, cubic-bezier(.1,.2,.3,.4)` is two items, not five. This scanner
/// tracks parenthesis/bracket depth and only splits at depth zero. Each item
/// is returned with surrounding whitespace trimmed.
///
/// An empty input yields a single empty item, matching how the CSS engine
/// hands over absent sub-properties (the extractor treats the empty string as
/// "no value declared").
///
/// # Example
///
/// ```
/// use keyline_timing::split_commas;
///
/// let parts = split_commas("steps(2, start), ease-in");
/// assert_eq!(parts, vec!["steps(2, start)", "ease-in"]);
/// ```
pub fn split_commas(value: &str) -> Vec<&str> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut start = 0;

    for (index, ch) in value.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(value[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(value[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_list() {
        assert_eq!(split_commas("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn single_item() {
        assert_eq!(split_commas("200ms"), vec!["200ms"]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(split_commas(""), vec![""]);
    }

    #[test]
    fn nested_parens_are_not_split() {
        assert_eq!(
            split_commas("cubic-bezier(.1,.2,.3,.4), linear"),
            vec!["cubic-bezier(.1,.2,.3,.4)", "linear"]
        );
    }

    #[test]
    fn nested_brackets_are_not_split() {
        assert_eq!(split_commas("var(--x, [a, b]), c"), vec!["var(--x, [a, b])", "c"]);
    }

    #[test]
    fn unbalanced_closers_do_not_underflow() {
        assert_eq!(split_commas("a), b"), vec!["a)", "b"]);
    }
}
