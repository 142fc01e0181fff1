//! JSON scanner.
//!
//! Object keys are highlighted as [`HighlightType::MarkupAttr`] to set them
//! apart from string values. Outside strict mode, `//` and `/* */` comments
//! are accepted as in JSONC.

use crate::chars::{
    first_char_len, is_ascii_digit, is_ascii_hex_digit, is_js_identifier_continue, length_while,
};
use crate::lang::js::{match_block_comment, match_line_comment};
use crate::scanner::Scanner;
use crate::token::{HighlightType, TokenSink};
use crate::HighlightOptions;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringMatch {
    pub length: usize,
    pub terminated: bool,
}

/// Matches a string literal. An unterminated string runs up to the end of
/// the line.
pub fn match_string(s: &str) -> StringMatch {
    if !s.starts_with('"') {
        return StringMatch::default();
    }

    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                return StringMatch {
                    length: i + 1,
                    terminated: true,
                }
            }
            '\n' | '\r' => {
                return StringMatch {
                    length: i,
                    terminated: false,
                }
            }
            '\\' => {
                if let Some((_, '\n' | '\r')) = chars.clone().next() {
                    continue;
                }
                chars.next();
            }
            _ => {}
        }
    }
    StringMatch {
        length: s.len(),
        terminated: false,
    }
}

/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
pub fn match_number(s: &str) -> usize {
    let sign = usize::from(s.starts_with('-'));
    let integer = match s[sign..].chars().next() {
        Some('0') => 1,
        Some('1'..='9') => length_while(&s[sign..], is_ascii_digit),
        _ => return 0,
    };
    let mut length = sign + integer;

    if s[length..].starts_with('.') {
        let fraction = length_while(&s[length + 1..], is_ascii_digit);
        if fraction > 0 {
            length += 1 + fraction;
        }
    }

    if s[length..].starts_with(['e', 'E']) {
        let exponent_sign = usize::from(s[length + 1..].starts_with(['+', '-']));
        let digits = length_while(&s[length + 1 + exponent_sign..], is_ascii_digit);
        if digits > 0 {
            length += 1 + exponent_sign + digits;
        }
    }
    length
}

/// Matches one of the escapes JSON allows, or returns 0.
pub fn match_escape_sequence(s: &str) -> usize {
    let Some(rest) = s.strip_prefix('\\') else {
        return 0;
    };
    match rest.chars().next() {
        Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => 2,
        Some('u')
            if rest
                .get(1..5)
                .is_some_and(|digits| digits.chars().all(is_ascii_hex_digit)) =>
        {
            6
        }
        _ => 0,
    }
}

/// Matches `true`, `false` or `null` when not followed by more word
/// characters.
pub fn match_literal_name(s: &str) -> Option<(usize, HighlightType)> {
    let (length, kind) = [
        ("true", HighlightType::Bool),
        ("false", HighlightType::Bool),
        ("null", HighlightType::Null),
    ]
    .into_iter()
    .find(|(name, _)| s.starts_with(name))
    .map(|(name, kind)| (name.len(), kind))?;

    if s[length..].starts_with(is_js_identifier_continue) {
        return None;
    }
    Some((length, kind))
}

fn is_json_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

struct JsonHighlighter<'a, 's> {
    s: Scanner<'a, 's>,
}

impl<'a, 's> JsonHighlighter<'a, 's> {
    fn highlight(mut self) -> bool {
        while !self.s.is_at_end() {
            if self.expect_whitespace()
                || self.expect_comment()
                || self.expect_string()
                || self.expect_number()
                || self.expect_literal_name()
                || self.expect_punctuation()
            {
                continue;
            }
            self.consume_error();
        }
        true
    }

    fn expect_whitespace(&mut self) -> bool {
        let length = length_while(self.s.remainder(), is_json_whitespace);
        self.s.advance(length);
        length > 0
    }

    fn expect_comment(&mut self) -> bool {
        if self.s.options().strict {
            return false;
        }
        let rest = self.s.remainder();
        let line = match_line_comment(rest);
        if line > 0 {
            self.s.emit_and_advance(2, HighlightType::CommentDelimiter);
            self.s.emit_and_advance(line - 2, HighlightType::Comment);
            return true;
        }
        let block = match_block_comment(rest);
        if block.length == 0 {
            return false;
        }
        let suffix = if block.terminated { 2 } else { 0 };
        self.s.emit_and_advance(2, HighlightType::CommentDelimiter);
        self.s.emit_and_advance(block.length - 2 - suffix, HighlightType::Comment);
        self.s.emit_and_advance(suffix, HighlightType::CommentDelimiter);
        true
    }

    /// A string value, or an object key when the next significant character
    /// is `:`.
    fn expect_string(&mut self) -> bool {
        let rest = self.s.remainder();
        let string = match_string(rest);
        if string.length == 0 {
            return false;
        }
        let after = &rest[string.length..];
        let kind = if string.terminated
            && after[length_while(after, is_json_whitespace)..].starts_with(':')
        {
            HighlightType::MarkupAttr
        } else {
            HighlightType::String
        };

        let end = self.s.index() + string.length;
        let mut part_start = self.s.index();
        while self.s.index() < end {
            let rest = self.s.remainder();
            if rest.starts_with('\\') && self.s.index() + 1 < end {
                self.s.emit(part_start, self.s.index() - part_start, kind);
                match match_escape_sequence(rest) {
                    0 => self
                        .s
                        .emit_and_advance(1 + first_char_len(&rest[1..]), HighlightType::Error),
                    length => self.s.emit_and_advance(length, HighlightType::Escape),
                }
                part_start = self.s.index();
            } else {
                self.s.advance(first_char_len(rest));
            }
        }
        self.s.emit(part_start, end - part_start, kind);
        true
    }

    fn expect_number(&mut self) -> bool {
        let length = match_number(self.s.remainder());
        if length == 0 {
            return false;
        }
        self.s.emit_and_advance(length, HighlightType::Number);
        true
    }

    fn expect_literal_name(&mut self) -> bool {
        let Some((length, kind)) = match_literal_name(self.s.remainder()) else {
            return false;
        };
        self.s.emit_and_advance(length, kind);
        true
    }

    fn expect_punctuation(&mut self) -> bool {
        let kind = match self.s.peek() {
            Some('{' | '}') => HighlightType::SymBrace,
            Some('[' | ']') => HighlightType::SymSquare,
            Some(',' | ':') => HighlightType::SymPunc,
            _ => return false,
        };
        self.s.emit_and_advance(1, kind);
        true
    }

    /// Anything else, up to the next whitespace, structural character or
    /// string.
    fn consume_error(&mut self) {
        let rest = self.s.remainder();
        let mut length = length_while(rest, |c| {
            !is_json_whitespace(c) && !matches!(c, '{' | '}' | '[' | ']' | ',' | ':' | '"')
        });
        if length == 0 {
            length = first_char_len(rest);
        }
        self.s.emit_and_advance(length, HighlightType::Error);
    }
}

/// Scan `source` as JSON. Always consumes the whole input.
pub fn highlight_json(sink: &mut TokenSink, source: &str, options: &HighlightOptions) -> bool {
    JsonHighlighter {
        s: Scanner::new(sink, source, *options),
    }
    .highlight()
}
