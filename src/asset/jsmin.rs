//! Comment and whitespace stripping for JavaScript.
//!
//! Works on the token stream: string, template and regex literals are copied
//! byte for byte, comments are dropped and each run of whitespace becomes a
//! single space or newline only where the neighbouring tokens need one.
//!
//! ```text
//! var s = 'a  b';   // note      var s='a  b';if(x)
//! if (x)                    →    y()
//! y()
//! ```

use super::minify::SyntaxError;

/// Words after which `/` opens a regex literal rather than a division.
const REGEX_PREFIX_WORDS: &[&str] = &[
    "return", "typeof", "case", "do", "else", "in", "instanceof", "new", "delete", "void",
    "throw", "yield", "await",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Gap {
    None,
    Space,
    Newline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    Punct,
    Literal,
}

struct Stripper<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    out: String,
    gap: Gap,
    prev: Option<(&'a str, TokenKind)>,
}

/// Strip comments and insignificant whitespace from `source`.
pub fn strip_js(source: &str) -> Result<String, SyntaxError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    Stripper {
        src: source,
        bytes: source.as_bytes(),
        pos: 0,
        out: String::with_capacity(source.len()),
        gap: Gap::None,
        prev: None,
    }
    .run()
}

impl<'a> Stripper<'a> {
    fn run(mut self) -> Result<String, SyntaxError> {
        while let Some(b) = self.peek(0) {
            match b {
                b'\n' | b'\r' => {
                    self.gap = Gap::Newline;
                    self.pos += 1;
                }
                b' ' | b'\t' | 0x0b | 0x0c => {
                    self.gap = self.gap.max(Gap::Space);
                    self.pos += 1;
                }
                b'/' if self.peek(1) == Some(b'/') => {
                    while self.peek(0).is_some_and(|b| b != b'\n' && b != b'\r') {
                        self.pos += 1;
                    }
                }
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
                b'\'' | b'"' => {
                    let end = self.scan_string(self.pos)?;
                    self.emit(end, TokenKind::Literal);
                }
                b'`' => {
                    let end = self.scan_template(self.pos)?;
                    self.emit(end, TokenKind::Literal);
                }
                b'/' if self.regex_allowed() => {
                    let end = self.scan_regex(self.pos)?;
                    self.emit(end, TokenKind::Literal);
                }
                b if is_word_byte(b) => {
                    let mut end = self.pos;
                    while self.bytes.get(end).is_some_and(|&b| is_word_byte(b)) {
                        end += 1;
                    }
                    self.emit(end, TokenKind::Word);
                }
                _ => self.emit(self.pos + 1, TokenKind::Punct),
            }
        }
        Ok(self.out)
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn emit(&mut self, end: usize, kind: TokenKind) {
        let src = self.src;
        let token = &src[self.pos..end];
        if let Some((prev, prev_kind)) = self.prev {
            let last = prev.as_bytes()[prev.len() - 1];
            let first = token.as_bytes()[0];
            if self.gap == Gap::Newline && ends_statement(last) && starts_statement(first) {
                self.out.push('\n');
            } else if self.gap != Gap::None && needs_space(prev, prev_kind, first) {
                self.out.push(' ');
            }
        }
        self.out.push_str(token);
        self.prev = Some((token, kind));
        self.gap = Gap::None;
        self.pos = end;
    }

    fn regex_allowed(&self) -> bool {
        match self.prev {
            None => true,
            Some((word, TokenKind::Word)) => REGEX_PREFIX_WORDS.contains(&word),
            Some((_, TokenKind::Literal)) => false,
            Some((")" | "]", TokenKind::Punct)) => false,
            // postfix `x++ / 2`
            Some(("+" | "-", TokenKind::Punct)) => {
                !(self.out.ends_with("++") || self.out.ends_with("--"))
            }
            Some((_, TokenKind::Punct)) => true,
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        let body = self.pos + 2;
        let Some(len) = self.src[body..].find("*/") else {
            return Err(unterminated("comment", self.pos));
        };
        let gap = if self.src[body..body + len].contains(['\n', '\r']) {
            Gap::Newline
        } else {
            Gap::Space
        };
        self.gap = self.gap.max(gap);
        self.pos = body + len + 2;
        Ok(())
    }

    /// End of the quoted string starting at `start`.
    fn scan_string(&self, start: usize) -> Result<usize, SyntaxError> {
        let quote = self.bytes[start];
        let mut i = start + 1;
        loop {
            match self.bytes.get(i) {
                None | Some(b'\n' | b'\r') => return Err(unterminated("string", start)),
                Some(b'\\') => i += 2,
                Some(&b) if b == quote => return Ok(i + 1),
                Some(_) => i += 1,
            }
        }
    }

    /// End of the template literal starting at `start`, substitutions included.
    fn scan_template(&self, start: usize) -> Result<usize, SyntaxError> {
        let mut i = start + 1;
        loop {
            match self.bytes.get(i) {
                None => return Err(unterminated("template", start)),
                Some(b'\\') => i += 2,
                Some(b'`') => return Ok(i + 1),
                Some(b'$') if self.bytes.get(i + 1) == Some(&b'{') => {
                    i = self.scan_substitution(i + 2)?;
                }
                Some(_) => i += 1,
            }
        }
    }

    fn scan_substitution(&self, start: usize) -> Result<usize, SyntaxError> {
        let mut depth = 0usize;
        let mut i = start;
        loop {
            match self.bytes.get(i) {
                None => return Err(unterminated("template", start)),
                Some(b'{') => {
                    depth += 1;
                    i += 1;
                }
                Some(b'}') if depth == 0 => return Ok(i + 1),
                Some(b'}') => {
                    depth -= 1;
                    i += 1;
                }
                Some(b'\'' | b'"') => i = self.scan_string(i)?,
                Some(b'`') => i = self.scan_template(i)?,
                Some(_) => i += 1,
            }
        }
    }

    /// End of the regex literal starting at `start`, flags included.
    fn scan_regex(&self, start: usize) -> Result<usize, SyntaxError> {
        let mut i = start + 1;
        let mut in_class = false;
        loop {
            match self.bytes.get(i) {
                None | Some(b'\n' | b'\r') => return Err(unterminated("regex", start)),
                Some(b'\\') => i += 2,
                Some(b'[') => {
                    in_class = true;
                    i += 1;
                }
                Some(b']') => {
                    in_class = false;
                    i += 1;
                }
                Some(b'/') if !in_class => {
                    i += 1;
                    break;
                }
                Some(_) => i += 1,
            }
        }
        while self.bytes.get(i).is_some_and(|&b| is_word_byte(b)) {
            i += 1;
        }
        Ok(i)
    }
}

fn unterminated(what: &str, offset: usize) -> SyntaxError {
    SyntaxError(format!("unterminated {what} at byte {offset}"))
}

/// Identifier, keyword and number bytes. Non-ASCII bytes belong to words.
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'\\' | b'#') || b >= 0x80
}

/// A newline after this byte may terminate a statement.
fn ends_statement(b: u8) -> bool {
    is_word_byte(b) || matches!(b, b')' | b']' | b'}' | b'"' | b'\'' | b'`' | b'/' | b'+' | b'-')
}

/// A newline before this byte may terminate a statement.
fn starts_statement(b: u8) -> bool {
    is_word_byte(b) || matches!(b, b'{' | b'[' | b'(' | b'+' | b'-' | b'!' | b'~' | b'"' | b'\'' | b'`')
}

/// Whether removing the whitespace between `prev` and `first` would merge
/// or change tokens.
fn needs_space(prev: &str, prev_kind: TokenKind, first: u8) -> bool {
    let last = prev.as_bytes()[prev.len() - 1];
    match (last, first) {
        _ if is_word_byte(last) && is_word_byte(first) => true,
        (b'+', b'+') | (b'-', b'-') | (b'/', b'/' | b'*') => true,
        // `1 .toString()`
        (_, b'.') => prev_kind == TokenKind::Word && prev.as_bytes()[0].is_ascii_digit(),
        _ => false,
    }
}
