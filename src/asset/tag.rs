//! HTML tag rendering for asset references.

use std::borrow::Cow;
use std::collections::BTreeMap;

use super::kind::AssetKind;

const SCRIPT_DEFAULTS: &[(&str, &str)] = &[("type", "text/javascript")];

const STYLESHEET_DEFAULTS: &[(&str, &str)] = &[
    ("media", "screen"),
    ("rel", "stylesheet"),
    ("type", "text/css"),
];

/// Render one tag per path, joined by newlines.
///
/// Attributes are emitted in sorted key order. Entries in `attrs` replace the
/// defaults of the same name; the path attribute (`src`/`href`) cannot be
/// overridden. An empty value renders as a bare attribute (`defer`).
pub fn render_tags(kind: AssetKind, paths: &[String], attrs: &BTreeMap<String, String>) -> String {
    paths
        .iter()
        .map(|path| render_tag(kind, path, attrs))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_tag(kind: AssetKind, path: &str, extra: &BTreeMap<String, String>) -> String {
    let (path_attr, defaults) = match kind {
        AssetKind::Js => ("src", SCRIPT_DEFAULTS),
        AssetKind::Css => ("href", STYLESHEET_DEFAULTS),
    };

    let mut attrs: BTreeMap<&str, &str> = defaults.iter().copied().collect();
    for (name, value) in extra {
        if !name.eq_ignore_ascii_case(path_attr) {
            attrs.insert(name.as_str(), value.as_str());
        }
    }
    attrs.insert(path_attr, path);

    let mut rendered = String::new();
    for (name, value) in attrs {
        rendered.push(' ');
        rendered.push_str(name);
        if !value.is_empty() {
            rendered.push_str("=\"");
            rendered.push_str(&escape_attr(value));
            rendered.push('"');
        }
    }

    match kind {
        AssetKind::Js => format!("<script{rendered}></script>"),
        AssetKind::Css => format!("<link{rendered} />"),
    }
}

/// Escape a double-quoted attribute value.
fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '<', '>']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
