//! C and C++ scanner.
//!
//! Both dialects share one scanner. They differ in their keyword tables and
//! in C++ raw string literals. Preprocessor directives are recognized when
//! `#` is the first token on a line; the rest of a directive line is
//! scanned as ordinary code.

use crate::chars::{
    first_char_len, is_ascii_hex_digit, is_ascii_octal_digit, is_c_identifier_continue,
    is_c_identifier_start, length_while,
};
use crate::scanner::Scanner;
use crate::token::{HighlightType, TokenSink};
use crate::HighlightOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    C,
    Cpp,
}

type KeywordTable = &'static [(&'static str, HighlightType)];

impl Dialect {
    /// Tables searched, in order, for keywords of this dialect.
    fn keyword_tables(self, strict: bool) -> &'static [KeywordTable] {
        match (self, strict) {
            (Dialect::C, true) => &[C_KEYWORDS, C_ONLY_KEYWORDS],
            (Dialect::C, false) => &[C_KEYWORDS, C_ONLY_KEYWORDS, EXTENSION_KEYWORDS],
            (Dialect::Cpp, true) => &[CPP_KEYWORDS],
            (Dialect::Cpp, false) => &[CPP_KEYWORDS, C_ONLY_KEYWORDS, EXTENSION_KEYWORDS],
        }
    }
}

/// Highlight type of `name` if it is a keyword of `dialect`.
pub fn lookup_keyword(dialect: Dialect, strict: bool, name: &str) -> Option<HighlightType> {
    dialect.keyword_tables(strict).iter().find_map(|table| {
        table
            .binary_search_by(|&(keyword, _)| keyword.cmp(name))
            .ok()
            .map(|i| table[i].1)
    })
}

/// C23 keywords. Every keyword table is sorted by byte value for binary search.
const C_KEYWORDS: &[(&str, HighlightType)] = &[
    ("alignas", HighlightType::Keyword),
    ("alignof", HighlightType::KeywordOp),
    ("auto", HighlightType::Keyword),
    ("bool", HighlightType::KeywordType),
    ("break", HighlightType::KeywordControl),
    ("case", HighlightType::KeywordControl),
    ("char", HighlightType::KeywordType),
    ("const", HighlightType::Keyword),
    ("constexpr", HighlightType::Keyword),
    ("continue", HighlightType::KeywordControl),
    ("default", HighlightType::KeywordControl),
    ("do", HighlightType::KeywordControl),
    ("double", HighlightType::KeywordType),
    ("else", HighlightType::KeywordControl),
    ("enum", HighlightType::Keyword),
    ("extern", HighlightType::Keyword),
    ("false", HighlightType::Bool),
    ("float", HighlightType::KeywordType),
    ("for", HighlightType::KeywordControl),
    ("goto", HighlightType::KeywordControl),
    ("if", HighlightType::KeywordControl),
    ("inline", HighlightType::Keyword),
    ("int", HighlightType::KeywordType),
    ("long", HighlightType::KeywordType),
    ("nullptr", HighlightType::Null),
    ("register", HighlightType::Keyword),
    ("return", HighlightType::KeywordControl),
    ("short", HighlightType::KeywordType),
    ("signed", HighlightType::KeywordType),
    ("sizeof", HighlightType::KeywordOp),
    ("static", HighlightType::Keyword),
    ("static_assert", HighlightType::Keyword),
    ("struct", HighlightType::Keyword),
    ("switch", HighlightType::KeywordControl),
    ("thread_local", HighlightType::Keyword),
    ("true", HighlightType::Bool),
    ("typedef", HighlightType::Keyword),
    ("union", HighlightType::Keyword),
    ("unsigned", HighlightType::KeywordType),
    ("void", HighlightType::KeywordType),
    ("volatile", HighlightType::Keyword),
    ("while", HighlightType::KeywordControl),
];

/// C keywords with no C++ counterpart.
const C_ONLY_KEYWORDS: &[(&str, HighlightType)] = &[
    ("_Alignas", HighlightType::Keyword),
    ("_Alignof", HighlightType::KeywordOp),
    ("_Atomic", HighlightType::Keyword),
    ("_BitInt", HighlightType::KeywordType),
    ("_Bool", HighlightType::KeywordType),
    ("_Complex", HighlightType::KeywordType),
    ("_Decimal128", HighlightType::KeywordType),
    ("_Decimal32", HighlightType::KeywordType),
    ("_Decimal64", HighlightType::KeywordType),
    ("_Generic", HighlightType::KeywordOp),
    ("_Imaginary", HighlightType::KeywordType),
    ("_Noreturn", HighlightType::Keyword),
    ("_Static_assert", HighlightType::Keyword),
    ("_Thread_local", HighlightType::Keyword),
    ("restrict", HighlightType::Keyword),
    ("typeof", HighlightType::KeywordOp),
    ("typeof_unqual", HighlightType::KeywordOp),
];

/// C++23 keywords.
const CPP_KEYWORDS: &[(&str, HighlightType)] = &[
    ("alignas", HighlightType::Keyword),
    ("alignof", HighlightType::KeywordOp),
    ("and", HighlightType::KeywordOp),
    ("and_eq", HighlightType::KeywordOp),
    ("asm", HighlightType::Keyword),
    ("auto", HighlightType::KeywordType),
    ("bitand", HighlightType::KeywordOp),
    ("bitor", HighlightType::KeywordOp),
    ("bool", HighlightType::KeywordType),
    ("break", HighlightType::KeywordControl),
    ("case", HighlightType::KeywordControl),
    ("catch", HighlightType::KeywordControl),
    ("char", HighlightType::KeywordType),
    ("char16_t", HighlightType::KeywordType),
    ("char32_t", HighlightType::KeywordType),
    ("char8_t", HighlightType::KeywordType),
    ("class", HighlightType::Keyword),
    ("co_await", HighlightType::KeywordControl),
    ("co_return", HighlightType::KeywordControl),
    ("co_yield", HighlightType::KeywordControl),
    ("compl", HighlightType::KeywordOp),
    ("concept", HighlightType::Keyword),
    ("const", HighlightType::Keyword),
    ("const_cast", HighlightType::KeywordOp),
    ("consteval", HighlightType::Keyword),
    ("constexpr", HighlightType::Keyword),
    ("constinit", HighlightType::Keyword),
    ("continue", HighlightType::KeywordControl),
    ("decltype", HighlightType::KeywordOp),
    ("default", HighlightType::KeywordControl),
    ("delete", HighlightType::KeywordOp),
    ("do", HighlightType::KeywordControl),
    ("double", HighlightType::KeywordType),
    ("dynamic_cast", HighlightType::KeywordOp),
    ("else", HighlightType::KeywordControl),
    ("enum", HighlightType::Keyword),
    ("explicit", HighlightType::Keyword),
    ("export", HighlightType::Keyword),
    ("extern", HighlightType::Keyword),
    ("false", HighlightType::Bool),
    ("float", HighlightType::KeywordType),
    ("for", HighlightType::KeywordControl),
    ("friend", HighlightType::Keyword),
    ("goto", HighlightType::KeywordControl),
    ("if", HighlightType::KeywordControl),
    ("inline", HighlightType::Keyword),
    ("int", HighlightType::KeywordType),
    ("long", HighlightType::KeywordType),
    ("mutable", HighlightType::Keyword),
    ("namespace", HighlightType::Keyword),
    ("new", HighlightType::KeywordOp),
    ("noexcept", HighlightType::KeywordOp),
    ("not", HighlightType::KeywordOp),
    ("not_eq", HighlightType::KeywordOp),
    ("nullptr", HighlightType::Null),
    ("operator", HighlightType::Keyword),
    ("or", HighlightType::KeywordOp),
    ("or_eq", HighlightType::KeywordOp),
    ("private", HighlightType::Keyword),
    ("protected", HighlightType::Keyword),
    ("public", HighlightType::Keyword),
    ("register", HighlightType::Keyword),
    ("reinterpret_cast", HighlightType::KeywordOp),
    ("requires", HighlightType::Keyword),
    ("return", HighlightType::KeywordControl),
    ("short", HighlightType::KeywordType),
    ("signed", HighlightType::KeywordType),
    ("sizeof", HighlightType::KeywordOp),
    ("static", HighlightType::Keyword),
    ("static_assert", HighlightType::Keyword),
    ("static_cast", HighlightType::KeywordOp),
    ("struct", HighlightType::Keyword),
    ("switch", HighlightType::KeywordControl),
    ("template", HighlightType::Keyword),
    ("this", HighlightType::Keyword),
    ("thread_local", HighlightType::Keyword),
    ("throw", HighlightType::KeywordControl),
    ("true", HighlightType::Bool),
    ("try", HighlightType::KeywordControl),
    ("typedef", HighlightType::Keyword),
    ("typeid", HighlightType::KeywordOp),
    ("typename", HighlightType::Keyword),
    ("union", HighlightType::Keyword),
    ("unsigned", HighlightType::KeywordType),
    ("using", HighlightType::Keyword),
    ("virtual", HighlightType::Keyword),
    ("void", HighlightType::KeywordType),
    ("volatile", HighlightType::Keyword),
    ("wchar_t", HighlightType::KeywordType),
    ("while", HighlightType::KeywordControl),
    ("xor", HighlightType::KeywordOp),
    ("xor_eq", HighlightType::KeywordOp),
];

/// GNU and MSVC extensions.
const EXTENSION_KEYWORDS: &[(&str, HighlightType)] = &[
    ("__alignof__", HighlightType::KeywordOp),
    ("__asm__", HighlightType::Keyword),
    ("__attribute__", HighlightType::Keyword),
    ("__builtin_offsetof", HighlightType::KeywordOp),
    ("__cdecl", HighlightType::Keyword),
    ("__declspec", HighlightType::Keyword),
    ("__extension__", HighlightType::Keyword),
    ("__fastcall", HighlightType::Keyword),
    ("__forceinline", HighlightType::Keyword),
    ("__inline", HighlightType::Keyword),
    ("__inline__", HighlightType::Keyword),
    ("__int128", HighlightType::KeywordType),
    ("__int16", HighlightType::KeywordType),
    ("__int32", HighlightType::KeywordType),
    ("__int64", HighlightType::KeywordType),
    ("__int8", HighlightType::KeywordType),
    ("__restrict", HighlightType::Keyword),
    ("__restrict__", HighlightType::Keyword),
    ("__stdcall", HighlightType::Keyword),
    ("__typeof__", HighlightType::KeywordOp),
    ("__volatile__", HighlightType::Keyword),
];

/// Operators and punctuators, longest first.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "...", "<=>", "->*", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=",
    "&&", "||", "*=", "/=", "%=", "+=", "-=", "&=", "^=", "|=", "##", "::", ".*", "{", "}",
    "[", "]", "(", ")", ";", ",", ":", ".", "?", "+", "-", "*", "/", "%", "&", "|", "^", "!",
    "~", "<", ">", "=", "#",
];

/// Directives whose operand may be a `<header-name>`.
const INCLUDE_DIRECTIVES: [&str; 4] = ["include", "include_next", "import", "embed"];
/// Directives whose first operand is a macro name.
const MACRO_NAME_DIRECTIVES: [&str; 4] = ["define", "undef", "ifdef", "ifndef"];

fn is_c_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

fn is_horizontal_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0B' | '\x0C')
}

/// Length of a backslash-newline line splice at the start of `s`.
fn line_splice_length(s: &str) -> usize {
    if s.starts_with("\\\r\n") {
        3
    } else if s.starts_with("\\\n") || s.starts_with("\\\r") {
        2
    } else {
        0
    }
}

/// Matches `//` up to (not including) the end of the line. Line splices
/// continue the comment onto the next line.
pub fn match_line_comment(s: &str) -> usize {
    if !s.starts_with("//") {
        return 0;
    }
    let bytes = s.as_bytes();
    let mut i = 2;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' | b'\r' => break,
            b'\\' => i += line_splice_length(&s[i..]).max(1),
            _ => i += 1,
        }
    }
    i
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockComment {
    pub length: usize,
    pub terminated: bool,
}

/// Matches `/* ... */`. An unterminated comment runs to the end of input.
pub fn match_block_comment(s: &str) -> BlockComment {
    let Some(body) = s.strip_prefix("/*") else {
        return BlockComment::default();
    };
    match body.find("*/") {
        Some(end) => BlockComment {
            length: 2 + end + 2,
            terminated: true,
        },
        None => BlockComment {
            length: s.len(),
            terminated: false,
        },
    }
}

/// Matches a preprocessing number: `.`? digit, followed by digits,
/// identifier characters, `.`, exponent signs (`e+`, `P-`, ...) and digit
/// separators (`'`).
pub fn match_pp_number(s: &str) -> usize {
    let bytes = s.as_bytes();
    let starts = match bytes {
        [b'0'..=b'9', ..] => true,
        [b'.', b'0'..=b'9', ..] => true,
        _ => false,
    };
    if !starts {
        return 0;
    }

    let mut i = 1;
    while i < bytes.len() {
        let c = bytes[i];
        let next = bytes.get(i + 1).copied();
        if matches!(c, b'e' | b'E' | b'p' | b'P') && matches!(next, Some(b'+' | b'-')) {
            i += 2;
        } else if c.is_ascii_alphanumeric() || c == b'_' || c == b'.' {
            i += 1;
        } else if c == b'\'' && next.is_some_and(|n| n.is_ascii_alphanumeric() || n == b'_') {
            i += 2;
        } else {
            break;
        }
    }
    i
}

pub fn match_identifier(s: &str) -> usize {
    match s.chars().next() {
        Some(c) if is_c_identifier_start(c) => {
            let first = c.len_utf8();
            first + length_while(&s[first..], is_c_identifier_continue)
        }
        _ => 0,
    }
}

/// Matches an escape sequence inside a character or string literal.
///
/// Unknown escapes are two characters long; a lone `\` at the end of input
/// has length 1.
pub fn match_escape_sequence(s: &str) -> usize {
    let Some(rest) = s.strip_prefix('\\') else {
        return 0;
    };
    let Some(c) = rest.chars().next() else {
        return 1;
    };

    let after = &rest[c.len_utf8()..];
    match c {
        '0'..='7' => 1 + length_while(rest, is_ascii_octal_digit).min(3),
        'x' | 'u' | 'o' | 'N' if after.starts_with('{') => 2 + match_braced_escape_body(after),
        'x' => 2 + length_while(after, is_ascii_hex_digit),
        'u' => 2 + length_while(after, is_ascii_hex_digit).min(4),
        'U' => 2 + length_while(after, is_ascii_hex_digit).min(8),
        '\r' if after.starts_with('\n') => 3,
        _ => 1 + c.len_utf8(),
    }
}

/// `{...}` of a delimited escape sequence, up to the closing brace. Stops
/// after `{` if the braces are not closed on the same line.
fn match_braced_escape_body(s: &str) -> usize {
    match s[1..].find(['}', '\n']) {
        Some(end) if s[1 + end..].starts_with('}') => end + 2,
        _ => 1,
    }
}

/// Matches an encoding prefix (`u8`, `u`, `U`, `L`) directly followed by a
/// quote.
pub fn match_string_prefix(s: &str) -> usize {
    ["u8", "u", "U", "L"]
        .into_iter()
        .find(|prefix| {
            s.strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with(['"', '\'']))
        })
        .map_or(0, str::len)
}

/// Matches a C++ raw string literal `prefix? R"delimiter( ... )delimiter"`.
/// Unterminated raw strings do not match.
pub fn match_raw_string(s: &str) -> usize {
    let Some(open) = ["u8R\"", "uR\"", "UR\"", "LR\"", "R\""]
        .into_iter()
        .find(|open| s.starts_with(open))
    else {
        return 0;
    };

    let rest = &s[open.len()..];
    let delimiter_length = length_while(rest, |c| {
        !matches!(c, '(' | ')' | '\\' | ' ') && !c.is_control()
    });
    if delimiter_length > 16 || !rest[delimiter_length..].starts_with('(') {
        return 0;
    }
    let delimiter = &rest[..delimiter_length];
    let body_start = open.len() + delimiter_length + 1;

    s[body_start..]
        .match_indices(')')
        .find(|&(i, _)| {
            let after = &s[body_start + i + 1..];
            after
                .strip_prefix(delimiter)
                .is_some_and(|after| after.starts_with('"'))
        })
        .map_or(0, |(i, _)| body_start + i + 1 + delimiter_length + 1)
}

/// Matches the longest operator or punctuator.
pub fn match_operator(s: &str) -> usize {
    OPERATORS
        .iter()
        .find(|op| s.starts_with(*op))
        .map_or(0, |op| op.len())
}

fn operator_kind(op: &str) -> HighlightType {
    match op {
        "{" | "}" => HighlightType::SymBrace,
        "(" | ")" => HighlightType::SymParens,
        "[" | "]" => HighlightType::SymSquare,
        ";" | "," | ":" => HighlightType::SymPunc,
        _ => HighlightType::SymOp,
    }
}

struct CHighlighter<'a, 's> {
    s: Scanner<'a, 's>,
    dialect: Dialect,
    /// Nothing but whitespace and comments since the last newline.
    at_line_start: bool,
}

impl<'a, 's> CHighlighter<'a, 's> {
    fn new(
        sink: &'s mut TokenSink,
        source: &'a str,
        options: &HighlightOptions,
        dialect: Dialect,
    ) -> Self {
        Self {
            s: Scanner::new(sink, source, *options),
            dialect,
            at_line_start: true,
        }
    }

    fn highlight(mut self) -> bool {
        while !self.s.is_at_end() {
            if self.expect_whitespace()
                || self.expect_line_comment()
                || self.expect_block_comment()
            {
                continue;
            }

            let at_line_start = std::mem::replace(&mut self.at_line_start, false);
            if at_line_start && self.expect_directive() {
                continue;
            }
            if (self.dialect == Dialect::Cpp && self.expect_raw_string())
                || self.expect_string_literal()
                || self.expect_number()
                || self.expect_identifier_or_keyword()
                || self.expect_operator()
            {
                continue;
            }
            self.consume_error();
        }
        true
    }

    fn expect_whitespace(&mut self) -> bool {
        let rest = self.s.remainder();
        let length = length_while(rest, is_c_whitespace);
        if length > 0 {
            if rest[..length].contains(['\n', '\r']) {
                self.at_line_start = true;
            }
            self.s.advance(length);
            return true;
        }
        let splice = line_splice_length(rest);
        self.s.advance(splice);
        splice > 0
    }

    fn expect_line_comment(&mut self) -> bool {
        let length = match_line_comment(self.s.remainder());
        if length == 0 {
            return false;
        }
        self.s.emit_and_advance(2, HighlightType::CommentDelimiter);
        self.s.emit_and_advance(length - 2, HighlightType::Comment);
        true
    }

    fn expect_block_comment(&mut self) -> bool {
        let BlockComment { length, terminated } = match_block_comment(self.s.remainder());
        if length == 0 {
            return false;
        }
        let suffix = if terminated { 2 } else { 0 };
        self.s.emit_and_advance(2, HighlightType::CommentDelimiter);
        self.s.emit_and_advance(length - 2 - suffix, HighlightType::Comment);
        self.s.emit_and_advance(suffix, HighlightType::CommentDelimiter);
        true
    }

    /// `#`, optional directive name, and for some directives their first
    /// operand. A lone `#` is the null directive.
    fn expect_directive(&mut self) -> bool {
        let rest = self.s.remainder();
        if !rest.starts_with('#') {
            return false;
        }
        let whitespace = length_while(&rest[1..], is_horizontal_whitespace);
        let name_length = match_identifier(&rest[1 + whitespace..]);
        let name = &rest[1 + whitespace..1 + whitespace + name_length];

        if whitespace == 0 {
            self.s.emit_and_advance(1 + name_length, HighlightType::Macro);
        } else {
            self.s.emit_and_advance(1, HighlightType::Macro);
            self.s.advance(whitespace);
            self.s.emit_and_advance(name_length, HighlightType::Macro);
        }

        if INCLUDE_DIRECTIVES.contains(&name) {
            self.expect_header_name();
        } else if MACRO_NAME_DIRECTIVES.contains(&name) {
            self.skip_horizontal_whitespace();
            let macro_name = match_identifier(self.s.remainder());
            self.s.emit_and_advance(macro_name, HighlightType::Macro);
        }
        true
    }

    /// `<header>` operand of an include directive.
    fn expect_header_name(&mut self) {
        self.skip_horizontal_whitespace();
        let rest = self.s.remainder();
        if !rest.starts_with('<') {
            return;
        }
        if let Some(end) = rest.find(['>', '\n']) {
            if rest[end..].starts_with('>') {
                self.s.emit_and_advance(end + 1, HighlightType::String);
            }
        }
    }

    fn skip_horizontal_whitespace(&mut self) {
        let length = length_while(self.s.remainder(), is_horizontal_whitespace);
        self.s.advance(length);
    }

    fn expect_raw_string(&mut self) -> bool {
        let length = match_raw_string(self.s.remainder());
        if length == 0 {
            return false;
        }
        self.s.emit_and_advance(length, HighlightType::String);
        true
    }

    /// Character or string literal with an optional encoding prefix. An
    /// unterminated literal ends at the end of the line.
    fn expect_string_literal(&mut self) -> bool {
        let rest = self.s.remainder();
        let prefix = match_string_prefix(rest);
        let quote = match rest[prefix..].chars().next() {
            Some(c @ ('"' | '\'')) => c,
            _ => return false,
        };

        let mut part_start = self.s.index();
        self.s.advance(prefix + 1);
        loop {
            let rest = self.s.remainder();
            match rest.chars().next() {
                None | Some('\n' | '\r') => break,
                Some(c) if c == quote => {
                    self.s.advance(1);
                    break;
                }
                Some('\\') => {
                    self.s.emit(part_start, self.s.index() - part_start, HighlightType::String);
                    self.s.emit_and_advance(match_escape_sequence(rest), HighlightType::Escape);
                    part_start = self.s.index();
                }
                Some(c) => self.s.advance(c.len_utf8()),
            }
        }
        self.s.emit(part_start, self.s.index() - part_start, HighlightType::String);
        true
    }

    fn expect_number(&mut self) -> bool {
        let length = match_pp_number(self.s.remainder());
        if length == 0 {
            return false;
        }
        self.s.emit_and_advance(length, HighlightType::Number);
        true
    }

    fn expect_identifier_or_keyword(&mut self) -> bool {
        let rest = self.s.remainder();
        let length = match_identifier(rest);
        if length == 0 {
            return false;
        }
        let kind = lookup_keyword(self.dialect, self.s.options().strict, &rest[..length])
            .unwrap_or(HighlightType::Identifier);
        self.s.emit_and_advance(length, kind);
        true
    }

    fn expect_operator(&mut self) -> bool {
        let rest = self.s.remainder();
        let length = match_operator(rest);
        if length == 0 {
            return false;
        }
        self.s.emit_and_advance(length, operator_kind(&rest[..length]));
        true
    }

    fn consume_error(&mut self) {
        let length = first_char_len(self.s.remainder());
        self.s.emit_and_advance(length, HighlightType::Error);
    }
}

/// Scan `source` as C. Always consumes the whole input.
pub fn highlight_c(sink: &mut TokenSink, source: &str, options: &HighlightOptions) -> bool {
    CHighlighter::new(sink, source, options, Dialect::C).highlight()
}

/// Scan `source` as C++. Always consumes the whole input.
pub fn highlight_cpp(sink: &mut TokenSink, source: &str, options: &HighlightOptions) -> bool {
    CHighlighter::new(sink, source, options, Dialect::Cpp).highlight()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use HighlightType::*;

    fn scan(source: &str, dialect: Dialect, strict: bool) -> Vec<(HighlightType, &str)> {
        let mut sink = TokenSink::new();
        let options = HighlightOptions {
            coalescing: false,
            strict,
        };
        let scan_fn = match dialect {
            Dialect::C => highlight_c,
            Dialect::Cpp => highlight_cpp,
        };
        assert!(scan_fn(&mut sink, source, &options));
        sink.tokens().iter().map(|t| (t.kind, t.text(source))).collect()
    }

    fn scan_c(source: &str) -> Vec<(HighlightType, &str)> {
        scan(source, Dialect::C, false)
    }

    #[test]
    fn test_keyword_tables_are_sorted() {
        for table in [C_KEYWORDS, C_ONLY_KEYWORDS, CPP_KEYWORDS, EXTENSION_KEYWORDS] {
            assert!(table.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }

    #[test]
    fn test_operators_longest_first() {
        assert!(OPERATORS.windows(2).all(|w| w[0].len() >= w[1].len()));
    }

    #[test]
    fn test_lookup_keyword() {
        assert_eq!(lookup_keyword(Dialect::C, false, "while"), Some(KeywordControl));
        assert_eq!(lookup_keyword(Dialect::C, false, "_Bool"), Some(KeywordType));
        assert_eq!(lookup_keyword(Dialect::C, true, "__attribute__"), None);
        assert_eq!(lookup_keyword(Dialect::C, false, "__attribute__"), Some(Keyword));
        assert_eq!(lookup_keyword(Dialect::C, false, "class"), None);
        assert_eq!(lookup_keyword(Dialect::Cpp, false, "class"), Some(Keyword));
        assert_eq!(lookup_keyword(Dialect::Cpp, true, "restrict"), None);
        assert_eq!(lookup_keyword(Dialect::Cpp, false, "restrict"), Some(Keyword));
        assert_eq!(lookup_keyword(Dialect::Cpp, true, "nullptr"), Some(Null));
    }

    #[test]
    fn test_matchers_reject_empty_input() {
        let matchers: [fn(&str) -> usize; 7] = [
            match_line_comment,
            match_pp_number,
            match_identifier,
            match_escape_sequence,
            match_string_prefix,
            match_raw_string,
            match_operator,
        ];
        for matcher in matchers {
            assert_eq!(matcher(""), 0);
            assert_eq!(matcher("@"), 0);
        }
        assert_eq!(match_block_comment(""), BlockComment::default());
    }

    #[test]
    fn test_match_comments() {
        assert_eq!(match_line_comment("// a\nb"), 4);
        assert_eq!(match_line_comment("// a \\\n b\nc"), 9);
        assert_eq!(
            match_block_comment("/* a */b"),
            BlockComment {
                length: 7,
                terminated: true
            }
        );
        assert_eq!(
            match_block_comment("/* a"),
            BlockComment {
                length: 4,
                terminated: false
            }
        );
    }

    #[test]
    fn test_match_pp_number() {
        assert_eq!(match_pp_number("42;"), 2);
        assert_eq!(match_pp_number("0x1p-3f)"), 7);
        assert_eq!(match_pp_number("1'000'000 "), 9);
        assert_eq!(match_pp_number(".5e+10"), 6);
        assert_eq!(match_pp_number("1.0f+x"), 4);
        assert_eq!(match_pp_number("1e+"), 3);
        assert_eq!(match_pp_number(".x"), 0);
        assert_eq!(match_pp_number("."), 0);
    }

    #[test]
    fn test_match_escape_sequence() {
        assert_eq!(match_escape_sequence("\\n"), 2);
        assert_eq!(match_escape_sequence("\\x41g"), 4);
        assert_eq!(match_escape_sequence("\\101"), 4);
        assert_eq!(match_escape_sequence("\\1234"), 4);
        assert_eq!(match_escape_sequence("\\0"), 2);
        assert_eq!(match_escape_sequence("\\u00e9"), 6);
        assert_eq!(match_escape_sequence("\\u00e9ab"), 6);
        assert_eq!(match_escape_sequence("\\U0001F600"), 10);
        assert_eq!(match_escape_sequence("\\u{1F600}"), 9);
        assert_eq!(match_escape_sequence("\\x{"), 3);
        assert_eq!(match_escape_sequence("\\\r\n"), 3);
        assert_eq!(match_escape_sequence("\\é"), 3);
        assert_eq!(match_escape_sequence("\\"), 1);
    }

    #[test]
    fn test_match_string_prefix() {
        assert_eq!(match_string_prefix("u8\"x\""), 2);
        assert_eq!(match_string_prefix("L'x'"), 1);
        assert_eq!(match_string_prefix("u8x"), 0);
        assert_eq!(match_string_prefix("\"x\""), 0);
    }

    #[test]
    fn test_match_raw_string() {
        assert_eq!(match_raw_string("R\"(a\\b)\";"), 8);
        assert_eq!(match_raw_string("R\"d(a)\"b)d\""), 11);
        assert_eq!(match_raw_string("u8R\"(x)\""), 8);
        assert_eq!(match_raw_string("R\"(open"), 0);
        assert_eq!(match_raw_string("R\"a b(x)a b\""), 0);
    }

    #[test]
    fn test_match_operator_is_greedy() {
        assert_eq!(match_operator("<<=1"), 3);
        assert_eq!(match_operator("->x"), 2);
        assert_eq!(match_operator("-x"), 1);
        assert_eq!(match_operator("..."), 3);
        assert_eq!(match_operator(".."), 1);
    }

    #[test]
    fn test_function() {
        assert_eq!(
            scan_c("int main() { return 0; }"),
            vec![
                (KeywordType, "int"),
                (Identifier, "main"),
                (SymParens, "("),
                (SymParens, ")"),
                (SymBrace, "{"),
                (KeywordControl, "return"),
                (Number, "0"),
                (SymPunc, ";"),
                (SymBrace, "}"),
            ]
        );
    }

    #[test]
    fn test_include_directive() {
        assert_eq!(
            scan_c("#include <stdio.h>\n#include \"a.h\"\n"),
            vec![
                (Macro, "#include"),
                (String, "<stdio.h>"),
                (Macro, "#include"),
                (String, "\"a.h\""),
            ]
        );
    }

    #[test]
    fn test_define_directive() {
        assert_eq!(
            scan_c("  # define MAX(a) a[0]"),
            vec![
                (Macro, "#"),
                (Macro, "define"),
                (Macro, "MAX"),
                (SymParens, "("),
                (Identifier, "a"),
                (SymParens, ")"),
                (Identifier, "a"),
                (SymSquare, "["),
                (Number, "0"),
                (SymSquare, "]"),
            ]
        );
    }

    #[test]
    fn test_directive_after_comment() {
        assert_eq!(
            scan_c("/* c */ #endif"),
            vec![
                (CommentDelimiter, "/*"),
                (Comment, " c "),
                (CommentDelimiter, "*/"),
                (Macro, "#endif"),
            ]
        );
    }

    #[test]
    fn test_hash_mid_line_is_operator() {
        assert_eq!(
            scan_c("a # b"),
            vec![(Identifier, "a"), (SymOp, "#"), (Identifier, "b")]
        );
        assert_eq!(
            scan_c("a \\\n#b"),
            vec![(Identifier, "a"), (SymOp, "#"), (Identifier, "b")]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            scan_c("\"a\\nb\""),
            vec![(String, "\"a"), (Escape, "\\n"), (String, "b\"")]
        );
        assert_eq!(
            scan_c("'\\''"),
            vec![(String, "'"), (Escape, "\\'"), (String, "'")]
        );
    }

    #[test]
    fn test_prefixed_literals() {
        assert_eq!(
            scan_c("u8\"x\" L'y'"),
            vec![(String, "u8\"x\""), (String, "L'y'")]
        );
    }

    #[test]
    fn test_unterminated_string_ends_at_line() {
        assert_eq!(
            scan_c("\"abc\nint"),
            vec![(String, "\"abc"), (KeywordType, "int")]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            scan_c("// x\ny /* z"),
            vec![
                (CommentDelimiter, "//"),
                (Comment, " x"),
                (Identifier, "y"),
                (CommentDelimiter, "/*"),
                (Comment, " z"),
            ]
        );
    }

    #[test]
    fn test_raw_string_is_cpp_only() {
        let source = "R\"(a\"b)\"";
        assert_eq!(
            scan(source, Dialect::Cpp, false),
            vec![(String, source)]
        );
        assert_eq!(scan(source, Dialect::C, false)[0], (Identifier, "R"));
    }

    #[test]
    fn test_strict_mode_drops_extensions() {
        assert_eq!(
            scan("__attribute__", Dialect::C, false),
            vec![(Keyword, "__attribute__")]
        );
        assert_eq!(
            scan("__attribute__", Dialect::C, true),
            vec![(Identifier, "__attribute__")]
        );
        assert_eq!(
            scan("restrict", Dialect::Cpp, true),
            vec![(Identifier, "restrict")]
        );
    }

    #[test]
    fn test_cpp_keywords() {
        assert_eq!(
            scan("template <class T> T* p = nullptr;", Dialect::Cpp, true),
            vec![
                (Keyword, "template"),
                (SymOp, "<"),
                (Keyword, "class"),
                (Identifier, "T"),
                (SymOp, ">"),
                (Identifier, "T"),
                (SymOp, "*"),
                (Identifier, "p"),
                (SymOp, "="),
                (Null, "nullptr"),
                (SymPunc, ";"),
            ]
        );
    }

    #[test]
    fn test_unknown_characters_are_errors() {
        assert_eq!(
            scan_c("a @ `"),
            vec![(Identifier, "a"), (Error, "@"), (Error, "`")]
        );
    }
}
