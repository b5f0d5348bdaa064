//! URL path helpers.
//!
//! Source references are root-relative URL paths (`/deep/a.js`), so every
//! function here uses `/` as separator regardless of the host platform.
//! Semantics follow POSIX path handling: `dirname("/a")` is `/`,
//! `splitext(".hidden")` has no extension, and so on.

/// Longest common leading string of all `paths`, compared per character.
///
/// This is a plain string prefix and may end in the middle of a path segment
/// (`/js/1.js` and `/jquery/2.js` share `/j`). Pair it with [`dirname`] to get
/// a directory.
pub fn common_prefix<S: AsRef<str>>(paths: &[S]) -> &str {
    let Some((first, rest)) = paths.split_first() else {
        return "";
    };
    let first = first.as_ref();

    let mut end = first.len();
    for other in rest {
        let other = other.as_ref();
        end = first[..end]
            .char_indices()
            .zip(other.chars())
            .find(|((_, a), b)| a != b)
            .map_or_else(|| end.min(other.len()), |((i, _), _)| i);
    }
    &first[..end]
}

/// Directory part of `path`, without trailing slashes unless it is the root.
///
/// ```ignore
/// assert_eq!(dirname("/deep/a.js"), "/deep");
/// assert_eq!(dirname("/a.js"), "/");
/// assert_eq!(dirname("a.js"), "");
/// ```
pub fn dirname(path: &str) -> &str {
    let head = match path.rfind('/') {
        Some(i) => &path[..=i],
        None => return "",
    };
    if head.bytes().all(|b| b == b'/') {
        head
    } else {
        head.trim_end_matches('/')
    }
}

/// Final component of `path`.
pub fn basename(path: &str) -> &str {
    path.rfind('/').map_or(path, |i| &path[i + 1..])
}

/// Split `path` into `(root, ext)` where `ext` starts at the last dot of the
/// final component, or is empty.
///
/// Leading dots of the final component do not start an extension.
pub fn splitext(path: &str) -> (&str, &str) {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    if let Some(dot) = path.rfind('.')
        && dot > name_start
        && path[name_start..dot].bytes().any(|b| b != b'.')
    {
        return path.split_at(dot);
    }
    (path, "")
}

/// Join two URL path fragments with a single `/`.
///
/// An absolute `tail` replaces `head` entirely.
pub fn join(head: &str, tail: &str) -> String {
    if tail.starts_with('/') || head.is_empty() {
        tail.to_string()
    } else if head.ends_with('/') {
        format!("{head}{tail}")
    } else {
        format!("{head}/{tail}")
    }
}

/// Split a reference into its path and optional query (without the `?`).
pub fn split_query(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (reference, None),
    }
}

/// Remove a URL prefix (`/static`) from `path` if present.
///
/// Only whole segments match: `/static` strips `/static/a.js` but not
/// `/staticfiles/a.js`.
pub fn strip_url_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path;
    }
    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() => "/",
        Some(rest) if rest.starts_with('/') || rest.starts_with('?') => rest,
        _ => path,
    }
}

/// Put a URL prefix back in front of `path`.
pub fn prepend_url_prefix(path: &str, prefix: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path.to_string();
    }
    if path.starts_with('/') {
        format!("{prefix}{path}")
    } else {
        format!("{prefix}/{path}")
    }
}
