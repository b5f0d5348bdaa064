//! Textual rewrites applied to serialized CSS declarations.
//!
//! Runs on already-minified stylesheet text. Only the bodies of innermost
//! `{...}` blocks are touched; selectors and at-rule preludes are copied
//! verbatim. Quoted strings and `url(...)` values inside a block are never
//! rewritten.
//!
//! | Rewrite       | Before            | After         |
//! |---------------|-------------------|---------------|
//! | zero unit     | `margin:0px 0em`  | `margin:0 0`  |
//! | leading zero  | `font-size:0.83em`| `font-size:.83em` |
//! | hex shorthand | `color:#aabbcc`   | `color:#abc`  |

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A bare `0` with a `px`/`em`/`pt` unit, preceded by anything but a digit or dot.
static ZERO_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^0-9.])0(?:px|em|pt)\b").unwrap());

/// A `0.` fraction whose zero is not part of a longer number.
static LEADING_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^0-9])0(\.[0-9]+)").unwrap());

/// Six-digit hex colour, not followed by more word characters.
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9a-fA-F]{6})\b").unwrap());

/// Apply all declaration rewrites to a serialized stylesheet.
pub fn rewrite_declarations(css: &str) -> String {
    let bytes = css.as_bytes();
    let mut out = String::with_capacity(css.len());
    let mut copied = 0;
    let mut open: Option<usize> = None;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'{' => open = Some(i + 1),
            b'}' => {
                if let Some(start) = open.take() {
                    out.push_str(&css[copied..start]);
                    out.push_str(&rewrite_block(&css[start..i]));
                    copied = i;
                }
            }
            _ => {}
        }
    }

    out.push_str(&css[copied..]);
    out
}

/// Rewrite one declaration block body, skipping strings and `url(...)`.
fn rewrite_block(block: &str) -> String {
    let bytes = block.as_bytes();
    let mut out = String::with_capacity(block.len());
    let mut plain_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let protected_end = match bytes[i] {
            q @ (b'"' | b'\'') => Some(skip_string(bytes, i + 1, q)),
            b'u' | b'U' if bytes[i..].len() >= 4 && bytes[i..i + 4].eq_ignore_ascii_case(b"url(") => {
                Some(skip_url(bytes, i + 4))
            }
            _ => None,
        };
        match protected_end {
            Some(end) => {
                out.push_str(&rewrite_values(&block[plain_start..i]));
                out.push_str(&block[i..end]);
                plain_start = end;
                i = end;
            }
            None => i += 1,
        }
    }

    out.push_str(&rewrite_values(&block[plain_start..]));
    out
}

/// Index just past the closing quote (or the end of input).
fn skip_string(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index just past the `)` closing a `url(` (or the end of input).
fn skip_url(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            q @ (b'"' | b'\'') => i = skip_string(bytes, i + 1, q),
            b'\\' => i += 2,
            b')' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Rewrite unquoted declaration text.
fn rewrite_values(text: &str) -> String {
    let text = ZERO_UNIT.replace_all(text, "${1}0");
    let text = LEADING_ZERO.replace_all(&text, "${1}${2}");
    HEX_COLOR
        .replace_all(&text, |caps: &Captures| shorten_hex_color(&caps[0]).into_owned())
        .into_owned()
}

/// Collapse `#aabbcc` to `#abc` when every channel repeats its digit.
///
/// Best effort: anything that is not a plain six-digit hex colour comes back
/// unchanged.
pub fn shorten_hex_color(color: &str) -> Cow<'_, str> {
    try_shorten(color).map_or(Cow::Borrowed(color), Cow::Owned)
}

fn try_shorten(color: &str) -> Option<String> {
    let digits = color.strip_prefix('#')?.as_bytes();
    if digits.len() != 6 || !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let mut short = String::with_capacity(4);
    short.push('#');
    for pair in digits.chunks_exact(2) {
        if !pair[0].eq_ignore_ascii_case(&pair[1]) {
            return None;
        }
        short.push(pair[0] as char);
    }
    Some(short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zero_removed() {
        assert_eq!(
            rewrite_declarations("p{font-size:0.83em !important}"),
            "p{font-size:.83em !important}"
        );
    }

    #[test]
    fn test_leading_zero_kept_after_digit() {
        assert_eq!(
            rewrite_declarations("p{font-size:10.83em !important}"),
            "p{font-size:10.83em !important}"
        );
    }

    #[test]
    fn test_zero_units_dropped() {
        assert_eq!(
            rewrite_declarations("p{border:0px 1pt 0px 0em;border:1px 0em 2em 0pt}"),
            "p{border:0 1pt 0 0;border:1px 0 2em 0}"
        );
    }

    #[test]
    fn test_multi_digit_values_untouched() {
        assert_eq!(
            rewrite_declarations("a{margin:10px 20em 100pt;width:1.0px}"),
            "a{margin:10px 20em 100pt;width:1.0px}"
        );
    }

    #[test]
    fn test_other_units_untouched() {
        assert_eq!(rewrite_declarations("a{margin:0rem 0%}"), "a{margin:0rem 0%}");
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(
            rewrite_declarations("a{color:#aabbcc;background:#a1b2c3}"),
            "a{color:#abc;background:#a1b2c3}"
        );
        assert_eq!(
            rewrite_declarations("a{border:1px solid #FF00ee}"),
            "a{border:1px solid #F0e}"
        );
    }

    #[test]
    fn test_eight_digit_hex_untouched() {
        assert_eq!(
            rewrite_declarations("a{color:#aabbccdd}"),
            "a{color:#aabbccdd}"
        );
    }

    #[test]
    fn test_selectors_untouched() {
        assert_eq!(
            rewrite_declarations("#aabbcc .x0px{margin:0px}"),
            "#aabbcc .x0px{margin:0}"
        );
    }

    #[test]
    fn test_nested_blocks() {
        assert_eq!(
            rewrite_declarations("@media (min-width:0px){a{padding:0.5em 0px}}"),
            "@media (min-width:0px){a{padding:.5em 0}}"
        );
    }

    #[test]
    fn test_strings_and_urls_untouched() {
        assert_eq!(
            rewrite_declarations(r#"a{content:"0.5 0px";background:url(img0px.png) 0px}"#),
            r#"a{content:"0.5 0px";background:url(img0px.png) 0}"#
        );
        assert_eq!(
            rewrite_declarations(r#"a[title="}{"]{margin:0px}"#),
            r#"a[title="}{"]{margin:0}"#
        );
    }

    #[test]
    fn test_shorten_hex_color() {
        assert_eq!(shorten_hex_color("#aabbcc"), "#abc");
        assert_eq!(shorten_hex_color("#a1b2c3"), "#a1b2c3");
        assert_eq!(shorten_hex_color("#abc"), "#abc");
        assert_eq!(shorten_hex_color("red"), "red");
        assert_eq!(shorten_hex_color("#gghhii"), "#gghhii");
    }
}
