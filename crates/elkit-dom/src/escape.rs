//! `CSS.escape()` - serialize a string as a CSS identifier

/// Escape `ident` so it can be spliced into a selector as an identifier
/// (`#` + escaped id, `.` + escaped class).
pub fn css_escape(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let first_is_dash = ident.starts_with('-');
    let single = ident.chars().nth(1).is_none();

    for (index, c) in ident.chars().enumerate() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1F}' | '\u{7F}' => escape_code_point(&mut out, c),
            '0'..='9' if index == 0 || (index == 1 && first_is_dash) => {
                escape_code_point(&mut out, c)
            }
            '-' if index == 0 && single => out.push_str("\\-"),
            c if c >= '\u{80}' || c == '-' || c == '_' || c.is_ascii_alphanumeric() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}

/// `\` + lowercase hex + a space terminating the escape
fn escape_code_point(out: &mut String, c: char) {
    out.push('\\');
    out.push_str(&format!("{:x}", c as u32));
    out.push(' ');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifiers_unchanged() {
        assert_eq!(css_escape("x-button"), "x-button");
        assert_eq!(css_escape("_private"), "_private");
        assert_eq!(css_escape("héllo"), "héllo");
    }

    #[test]
    fn test_leading_digits() {
        assert_eq!(css_escape("1"), "\\31 ");
        assert_eq!(css_escape("12a"), "\\31 2a");
        assert_eq!(css_escape("-1"), "-\\31 ");
        assert_eq!(css_escape("a1"), "a1");
    }

    #[test]
    fn test_dash_and_specials() {
        assert_eq!(css_escape("-"), "\\-");
        assert_eq!(css_escape("--x"), "--x");
        assert_eq!(css_escape("a b"), "a\\ b");
        assert_eq!(css_escape("id#1.x"), "id\\#1\\.x");
        assert_eq!(css_escape("\u{7}"), "\\7 ");
        assert_eq!(css_escape("a\u{7f}b"), "a\\7f b");
        assert_eq!(css_escape("a\0"), "a\u{FFFD}");
    }
}
