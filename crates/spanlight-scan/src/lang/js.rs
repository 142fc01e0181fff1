//! JavaScript scanner, with JSX.
//!
//! Whether a `/` starts a regular expression and whether a `<` starts a JSX
//! element depends on what precedes it. The scanner tracks whether the last
//! significant token leaves it in a position where an expression may start.
//!
//! Template substitutions and JSX expression containers are highlighted by
//! a nested scanner over the embedded range.

use crate::chars::{
    first_char_len, is_ascii_alphanumeric, is_ascii_binary_digit, is_ascii_digit,
    is_ascii_hex_digit, is_ascii_octal_digit, is_js_identifier_continue, is_js_identifier_start,
    is_js_line_terminator, is_js_whitespace, length_while,
};
use crate::lang::html::match_character_reference;
use crate::scanner::Scanner;
use crate::token::{HighlightType, TokenSink};
use crate::HighlightOptions;

pub use crate::lang::c::{match_block_comment, BlockComment};

/// Sorted by byte value for binary search.
const KEYWORDS: &[(&str, HighlightType)] = &[
    ("await", HighlightType::KeywordControl),
    ("break", HighlightType::KeywordControl),
    ("case", HighlightType::KeywordControl),
    ("catch", HighlightType::KeywordControl),
    ("class", HighlightType::Keyword),
    ("const", HighlightType::Keyword),
    ("continue", HighlightType::KeywordControl),
    ("debugger", HighlightType::Keyword),
    ("default", HighlightType::KeywordControl),
    ("delete", HighlightType::KeywordOp),
    ("do", HighlightType::KeywordControl),
    ("else", HighlightType::KeywordControl),
    ("enum", HighlightType::Keyword),
    ("export", HighlightType::Keyword),
    ("extends", HighlightType::Keyword),
    ("false", HighlightType::Bool),
    ("finally", HighlightType::KeywordControl),
    ("for", HighlightType::KeywordControl),
    ("function", HighlightType::Keyword),
    ("if", HighlightType::KeywordControl),
    ("import", HighlightType::Keyword),
    ("in", HighlightType::KeywordOp),
    ("instanceof", HighlightType::KeywordOp),
    ("let", HighlightType::Keyword),
    ("new", HighlightType::KeywordOp),
    ("null", HighlightType::Null),
    ("return", HighlightType::KeywordControl),
    ("static", HighlightType::Keyword),
    ("super", HighlightType::Keyword),
    ("switch", HighlightType::KeywordControl),
    ("this", HighlightType::Keyword),
    ("throw", HighlightType::KeywordControl),
    ("true", HighlightType::Bool),
    ("try", HighlightType::KeywordControl),
    ("typeof", HighlightType::KeywordOp),
    ("var", HighlightType::Keyword),
    ("void", HighlightType::KeywordOp),
    ("while", HighlightType::KeywordControl),
    ("with", HighlightType::KeywordControl),
    ("yield", HighlightType::KeywordControl),
];

/// Operators and punctuators, longest first.
const OPERATORS: &[&str] = &[
    ">>>=", //
    "===", "!==", "**=", "<<=", ">>=", ">>>", "...", "&&=", "||=", "??=", //
    "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "<<", ">>", "**", //
    "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-", "*", "/", "%", "&", "|", "^",
    "!", "~", "?", ":", "=", ".", "@",
];

pub fn lookup_keyword(name: &str) -> Option<HighlightType> {
    KEYWORDS
        .binary_search_by(|&(keyword, _)| keyword.cmp(name))
        .ok()
        .map(|i| KEYWORDS[i].1)
}

/// Matches `//` up to (not including) the next line terminator.
pub fn match_line_comment(s: &str) -> usize {
    if !s.starts_with("//") {
        return 0;
    }
    2 + length_while(&s[2..], |c| !is_js_line_terminator(c))
}

/// Matches `#!` up to (not including) the next line terminator. Only valid
/// at the very start of a script.
pub fn match_hashbang_comment(s: &str) -> usize {
    if !s.starts_with("#!") {
        return 0;
    }
    2 + length_while(&s[2..], |c| !is_js_line_terminator(c))
}

pub fn match_identifier(s: &str) -> usize {
    match s.chars().next() {
        Some(c) if is_js_identifier_start(c) => {
            let first = c.len_utf8();
            first + length_while(&s[first..], is_js_identifier_continue)
        }
        _ => 0,
    }
}

/// Identifiers in JSX names may also contain `-`.
fn match_jsx_identifier(s: &str) -> usize {
    match s.chars().next() {
        Some(c) if is_js_identifier_start(c) => {
            let first = c.len_utf8();
            first + length_while(&s[first..], |c| is_js_identifier_continue(c) || c == '-')
        }
        _ => 0,
    }
}

/// Lengths of the parts of a numeric literal. `fractional` includes the
/// `.`, `exponent` includes the `e` and its sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericResult {
    pub length: usize,
    pub prefix: usize,
    pub integer: usize,
    pub fractional: usize,
    pub exponent: usize,
    pub suffix: usize,
    pub erroneous: bool,
}

/// A run of digits with `_` separators. Must start with a digit.
fn digit_run(s: &str, is_digit: fn(char) -> bool) -> usize {
    match s.chars().next() {
        Some(c) if is_digit(c) => length_while(s, |c| is_digit(c) || c == '_'),
        _ => 0,
    }
}

pub fn match_numeric_literal(s: &str) -> NumericResult {
    let radix_digit: Option<fn(char) -> bool> = match s.get(..2) {
        Some("0x" | "0X") => Some(is_ascii_hex_digit),
        Some("0o" | "0O") => Some(is_ascii_octal_digit),
        Some("0b" | "0B") => Some(is_ascii_binary_digit),
        _ => None,
    };

    if let Some(is_digit) = radix_digit {
        let integer = digit_run(&s[2..], is_digit);
        let suffix = usize::from(s[2 + integer..].starts_with('n'));
        return NumericResult {
            length: 2 + integer + suffix,
            prefix: 2,
            integer,
            suffix,
            erroneous: integer == 0,
            ..NumericResult::default()
        };
    }

    let mut result = NumericResult {
        integer: digit_run(s, is_ascii_digit),
        ..NumericResult::default()
    };
    let mut length = result.integer;

    if s[length..].starts_with('.') {
        let digits = digit_run(&s[length + 1..], is_ascii_digit);
        if result.integer > 0 || digits > 0 {
            result.fractional = 1 + digits;
            length += result.fractional;
        }
    }
    if length == 0 {
        return NumericResult::default();
    }

    if s[length..].starts_with(['e', 'E']) {
        let sign = usize::from(s[length + 1..].starts_with(['+', '-']));
        let digits = digit_run(&s[length + 1 + sign..], is_ascii_digit);
        result.exponent = 1 + sign + digits;
        result.erroneous = digits == 0;
        length += result.exponent;
    }

    if result.fractional == 0 && result.exponent == 0 && s[length..].starts_with('n') {
        result.suffix = 1;
        length += 1;
    }

    result.length = length;
    result
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscapeResult {
    pub length: usize,
    pub erroneous: bool,
}

impl EscapeResult {
    fn valid(length: usize) -> Self {
        Self {
            length,
            erroneous: false,
        }
    }

    fn erroneous(length: usize) -> Self {
        Self {
            length,
            erroneous: true,
        }
    }
}

/// Matches an escape sequence in a string or template literal.
///
/// Malformed `\x` and `\u` escapes still consume the alphanumerics that
/// were meant to be part of them, so they can be highlighted as errors.
pub fn match_escape_sequence(s: &str) -> EscapeResult {
    let Some(rest) = s.strip_prefix('\\') else {
        return EscapeResult::default();
    };
    let Some(c) = rest.chars().next() else {
        return EscapeResult::erroneous(1);
    };
    let after = &rest[c.len_utf8()..];

    match c {
        'x' => fixed_hex_escape(after, 2),
        'u' if after.starts_with('{') => {
            let body = &after[1..];
            match body.find(|c: char| c == '}' || is_js_line_terminator(c)) {
                Some(end) if body[end..].starts_with('}') => {
                    let digits = &body[..end];
                    let in_range = u32::from_str_radix(digits, 16).is_ok_and(|v| v <= 0x10FFFF);
                    let valid = !digits.is_empty()
                        && digits.chars().all(is_ascii_hex_digit)
                        && in_range;
                    EscapeResult {
                        length: 3 + end + 1,
                        erroneous: !valid,
                    }
                }
                _ => EscapeResult::erroneous(3),
            }
        }
        'u' => fixed_hex_escape(after, 4),
        '0'..='3' => EscapeResult::valid(1 + length_while(rest, is_ascii_octal_digit).min(3)),
        '4'..='7' => EscapeResult::valid(1 + length_while(rest, is_ascii_octal_digit).min(2)),
        '\r' if after.starts_with('\n') => EscapeResult::valid(3),
        _ => EscapeResult::valid(1 + c.len_utf8()),
    }
}

/// `\x` or `\u` followed by exactly `digits` hex digits. Up to `digits`
/// alphanumerics are consumed either way.
fn fixed_hex_escape(after: &str, digits: usize) -> EscapeResult {
    let consumed = length_while(after, is_ascii_alphanumeric).min(digits);
    let valid = consumed == digits && after[..consumed].chars().all(is_ascii_hex_digit);
    EscapeResult {
        length: 2 + consumed,
        erroneous: !valid,
    }
}

/// Matches a regular expression literal including its flags. Only
/// meaningful where an expression may start.
pub fn match_regex_literal(s: &str) -> usize {
    if !s.starts_with('/') || s[1..].starts_with(['/', '*']) {
        return 0;
    }

    let mut in_class = false;
    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            _ if is_js_line_terminator(c) => return 0,
            '\\' => match chars.next() {
                Some((_, escaped)) if !is_js_line_terminator(escaped) => {}
                _ => return 0,
            },
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                let end = i + 1;
                return end + length_while(&s[end..], is_js_identifier_continue);
            }
            _ => {}
        }
    }
    0
}

/// Matches the longest operator or punctuator.
pub fn match_operator(s: &str) -> usize {
    let Some(op) = OPERATORS.iter().find(|op| s.starts_with(*op)) else {
        return 0;
    };
    // `a?.5:b` is a conditional, not optional chaining.
    if *op == "?." && s[2..].starts_with(|c: char| c.is_ascii_digit()) {
        return 1;
    }
    op.len()
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

/// Length of a quoted string starting at `s`, or 0 if it is unterminated.
fn skip_quoted(s: &str) -> usize {
    let Some(quote) = s.chars().next() else {
        return 0;
    };
    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return i + 1;
        }
    }
    0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    Braces,
    Template,
}

/// Matches a balanced `{...}`, skipping over braces inside strings,
/// template literals and comments. Returns 0 if the braces never balance.
///
/// Nesting is tracked on an explicit stack, so arbitrarily deep input
/// cannot exhaust the call stack.
pub fn match_jsx_braced(s: &str) -> usize {
    if !s.starts_with('{') {
        return 0;
    }

    let mut stack = vec![Nesting::Braces];
    let mut i = 1;
    while let Some(&top) = stack.last() {
        let rest = &s[i..];
        let Some(c) = rest.chars().next() else {
            return 0;
        };
        let length = match (top, c) {
            (Nesting::Template, '`') | (Nesting::Braces, '}') => {
                stack.pop();
                1
            }
            (Nesting::Template, '\\') => 1 + first_char_len(&rest[1..]),
            (Nesting::Template, '$') if rest.starts_with("${") => {
                stack.push(Nesting::Braces);
                2
            }
            (Nesting::Template, _) => c.len_utf8(),
            (Nesting::Braces, '{') => {
                stack.push(Nesting::Braces);
                1
            }
            (Nesting::Braces, '`') => {
                stack.push(Nesting::Template);
                1
            }
            (Nesting::Braces, '"' | '\'') => skip_quoted(rest),
            (Nesting::Braces, '/') if rest.starts_with("//") => match_line_comment(rest),
            (Nesting::Braces, '/') if rest.starts_with("/*") => {
                let comment = match_block_comment(rest);
                if comment.terminated {
                    comment.length
                } else {
                    0
                }
            }
            (Nesting::Braces, _) => c.len_utf8(),
        };
        if length == 0 {
            return 0;
        }
        i += length;
    }
    i
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsxType {
    #[default]
    Opening,
    Closing,
    SelfClosing,
    FragmentOpening,
    FragmentClosing,
}

impl JsxType {
    /// Change in element nesting depth after this tag.
    fn depth_change(self) -> isize {
        match self {
            JsxType::Opening | JsxType::FragmentOpening => 1,
            JsxType::Closing | JsxType::FragmentClosing => -1,
            JsxType::SelfClosing => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsxTagResult {
    pub length: usize,
    pub kind: JsxType,
}

/// Matches a complete JSX tag: opening, closing, self-closing or fragment.
/// Whitespace and comments may appear between the parts of a tag.
pub fn match_jsx_tag(s: &str) -> JsxTagResult {
    JsxTagWalker::new(s, |_, _, _| {})
        .walk()
        .map_or(JsxTagResult::default(), |(length, kind)| JsxTagResult { length, kind })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsxPart {
    Punctuation,
    TagName,
    AttributeName,
    String,
    Comment,
    /// A braced expression container, braces included.
    Expression,
}

/// Walks a JSX tag, reporting each part as `(part, offset, length)`.
struct JsxTagWalker<'a, F> {
    s: &'a str,
    pos: usize,
    visit: F,
}

impl<'a, F: FnMut(JsxPart, usize, usize)> JsxTagWalker<'a, F> {
    fn new(s: &'a str, visit: F) -> Self {
        Self { s, pos: 0, visit }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn part(&mut self, part: JsxPart, length: usize) {
        (self.visit)(part, self.pos, length);
        self.pos += length;
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let whitespace = length_while(rest, |c| is_js_whitespace(c) || is_js_line_terminator(c));
            if whitespace > 0 {
                self.pos += whitespace;
                continue;
            }
            let line = match_line_comment(rest);
            if line > 0 {
                self.part(JsxPart::Comment, line);
                continue;
            }
            let block = match_block_comment(rest);
            if block.terminated {
                self.part(JsxPart::Comment, block.length);
                continue;
            }
            return;
        }
    }

    fn walk(mut self) -> Option<(usize, JsxType)> {
        if self.rest().starts_with("</") {
            self.part(JsxPart::Punctuation, 2);
            return self.walk_closing();
        }
        if !self.rest().starts_with('<') {
            return None;
        }
        self.part(JsxPart::Punctuation, 1);
        self.skip_trivia();

        if self.rest().starts_with('/') {
            self.part(JsxPart::Punctuation, 1);
            return self.walk_closing();
        }
        if self.rest().starts_with('>') {
            self.part(JsxPart::Punctuation, 1);
            return Some((self.pos, JsxType::FragmentOpening));
        }
        if !self.expect_name(JsxPart::TagName) {
            return None;
        }

        loop {
            self.skip_trivia();
            let rest = self.rest();
            if rest.starts_with('>') {
                self.part(JsxPart::Punctuation, 1);
                return Some((self.pos, JsxType::Opening));
            }
            if rest.starts_with("/>") {
                self.part(JsxPart::Punctuation, 2);
                return Some((self.pos, JsxType::SelfClosing));
            }
            if rest.starts_with('{') {
                let spread = match_jsx_braced(rest);
                if spread == 0 {
                    return None;
                }
                self.part(JsxPart::Expression, spread);
                continue;
            }
            if !self.expect_attribute() {
                return None;
            }
        }
    }

    fn walk_closing(mut self) -> Option<(usize, JsxType)> {
        self.skip_trivia();
        if self.rest().starts_with('>') {
            self.part(JsxPart::Punctuation, 1);
            return Some((self.pos, JsxType::FragmentClosing));
        }
        if !self.expect_name(JsxPart::TagName) {
            return None;
        }
        self.skip_trivia();
        if !self.rest().starts_with('>') {
            return None;
        }
        self.part(JsxPart::Punctuation, 1);
        Some((self.pos, JsxType::Closing))
    }

    /// `name`, `ns:name`, or for tag names `a.b.c`.
    fn expect_name(&mut self, part: JsxPart) -> bool {
        let rest = self.rest();
        let mut length = match_jsx_identifier(rest);
        if length == 0 {
            return false;
        }
        if rest[length..].starts_with(':') {
            let local = match_jsx_identifier(&rest[length + 1..]);
            if local == 0 {
                return false;
            }
            length += 1 + local;
        } else if part == JsxPart::TagName {
            while rest[length..].starts_with('.') {
                let member = match_identifier(&rest[length + 1..]);
                if member == 0 {
                    return false;
                }
                length += 1 + member;
            }
        }
        self.part(part, length);
        true
    }

    /// Attribute name, optionally followed by `=` and a string or an
    /// expression container.
    fn expect_attribute(&mut self) -> bool {
        if !self.expect_name(JsxPart::AttributeName) {
            return false;
        }
        self.skip_trivia();
        if !self.rest().starts_with('=') {
            return true;
        }
        self.pos += 1;
        self.skip_trivia();

        let rest = self.rest();
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => match rest[1..].find(quote) {
                Some(end) => {
                    self.part(JsxPart::String, end + 2);
                    true
                }
                None => false,
            },
            Some('{') => match match_jsx_braced(rest) {
                0 => false,
                length => {
                    self.part(JsxPart::Expression, length);
                    true
                }
            },
            _ => false,
        }
    }
}

/// Deepest chain of nested scanners for template substitutions and JSX
/// expression containers. Anything nested deeper is left unhighlighted.
const MAX_EMBEDDING_DEPTH: usize = 256;

struct JsHighlighter<'a, 's> {
    s: Scanner<'a, 's>,
    /// Number of enclosing scanners.
    depth: usize,
    /// An expression may start at the cursor: `/` is a regex, `<` may be JSX.
    expression_position: bool,
    /// The last token was `.` or `?.`, so a keyword is a property name.
    member_access: bool,
}

impl<'a, 's> JsHighlighter<'a, 's> {
    fn new(s: Scanner<'a, 's>) -> Self {
        Self {
            s,
            depth: 0,
            expression_position: true,
            member_access: false,
        }
    }

    fn highlight(mut self) -> bool {
        if self.s.index() == 0 {
            self.expect_hashbang();
        }

        while !self.s.is_at_end() {
            if self.expect_whitespace() || self.expect_comment() {
                continue;
            }
            let member_access = std::mem::replace(&mut self.member_access, false);
            if self.expect_string()
                || self.expect_template()
                || self.expect_number()
                || self.expect_regex()
                || self.expect_jsx_element()
                || self.expect_private_name()
                || self.expect_identifier_or_keyword(member_access)
                || self.expect_operator()
            {
                continue;
            }
            self.consume_error();
        }
        true
    }

    /// Highlight `[begin, end)` with a fresh nested scanner and move past it.
    fn highlight_embedded(&mut self, begin: usize, end: usize) {
        debug_assert_eq!(begin, self.s.index());
        if self.depth < MAX_EMBEDDING_DEPTH {
            let mut nested = JsHighlighter::new(self.s.nested(begin, end));
            nested.depth = self.depth + 1;
            nested.highlight();
        } else {
            tracing::trace!(begin, end, "embedding too deep, leaving gap");
        }
        self.s.advance(end - begin);
    }

    /// End of the range this scanner may consume.
    fn end(&self) -> usize {
        self.s.index() + self.s.remainder().len()
    }

    fn expect_hashbang(&mut self) {
        let length = match_hashbang_comment(self.s.remainder());
        if length > 0 {
            self.s.emit_and_advance(2, HighlightType::CommentDelimiter);
            self.s.emit_and_advance(length - 2, HighlightType::Comment);
        }
    }

    fn expect_whitespace(&mut self) -> bool {
        let length = length_while(self.s.remainder(), |c| {
            is_js_whitespace(c) || is_js_line_terminator(c)
        });
        self.s.advance(length);
        length > 0
    }

    fn expect_comment(&mut self) -> bool {
        let rest = self.s.remainder();
        let length = match match_line_comment(rest) {
            0 => match_block_comment(rest).length,
            line => line,
        };
        if length == 0 {
            return false;
        }
        self.emit_comment(length);
        true
    }

    /// Emit the comment of `length` bytes at the cursor with its delimiters.
    fn emit_comment(&mut self, length: usize) {
        let comment = &self.s.remainder()[..length];
        let suffix = if comment.starts_with("/*") && match_block_comment(comment).terminated {
            2
        } else {
            0
        };
        self.s.emit_and_advance(2, HighlightType::CommentDelimiter);
        self.s.emit_and_advance(length - 2 - suffix, HighlightType::Comment);
        self.s.emit_and_advance(suffix, HighlightType::CommentDelimiter);
    }

    /// Emit an escape at the cursor, as an error if it is malformed.
    fn emit_escape(&mut self) {
        let escape = match_escape_sequence(self.s.remainder());
        let kind = if escape.erroneous {
            HighlightType::Error
        } else {
            HighlightType::Escape
        };
        self.s.emit_and_advance(escape.length, kind);
    }

    /// `'...'` or `"..."`. An unterminated string ends at the line end.
    fn expect_string(&mut self) -> bool {
        let quote = match self.s.peek() {
            Some(c @ ('"' | '\'')) => c,
            _ => return false,
        };

        let mut part_start = self.s.index();
        self.s.advance(1);
        loop {
            match self.s.peek() {
                None | Some('\n' | '\r') => break,
                Some(c) if c == quote => {
                    self.s.advance(1);
                    break;
                }
                Some('\\') => {
                    self.s.emit(part_start, self.s.index() - part_start, HighlightType::String);
                    self.emit_escape();
                    part_start = self.s.index();
                }
                Some(c) => self.s.advance(c.len_utf8()),
            }
        }
        self.s.emit(part_start, self.s.index() - part_start, HighlightType::String);
        self.expression_position = false;
        true
    }

    /// `` `...${expr}...` ``. An unterminated template runs to the end.
    fn expect_template(&mut self) -> bool {
        if !self.s.starts_with("`") {
            return false;
        }

        let mut part_start = self.s.index();
        self.s.advance(1);
        loop {
            let rest = self.s.remainder();
            match rest.chars().next() {
                None => break,
                Some('`') => {
                    self.s.advance(1);
                    break;
                }
                Some('\\') => {
                    self.s.emit(part_start, self.s.index() - part_start, HighlightType::String);
                    self.emit_escape();
                    part_start = self.s.index();
                }
                Some('$') if rest.starts_with("${") => {
                    self.s.emit(part_start, self.s.index() - part_start, HighlightType::String);
                    let braced = match_jsx_braced(&rest[1..]);
                    self.s.emit_and_advance(2, HighlightType::SymPunc);
                    let begin = self.s.index();
                    if braced == 0 {
                        let end = self.end();
                        self.highlight_embedded(begin, end);
                        return true;
                    }
                    self.highlight_embedded(begin, begin + braced - 2);
                    self.s.emit_and_advance(1, HighlightType::SymPunc);
                    part_start = self.s.index();
                }
                Some(c) => self.s.advance(c.len_utf8()),
            }
        }
        self.s.emit(part_start, self.s.index() - part_start, HighlightType::String);
        self.expression_position = false;
        true
    }

    fn expect_number(&mut self) -> bool {
        let number = match_numeric_literal(self.s.remainder());
        if number.length == 0 {
            return false;
        }
        if number.erroneous {
            self.s.emit_and_advance(number.length, HighlightType::Error);
        } else {
            let digits = number.integer + number.fractional + number.exponent;
            self.s.emit_and_advance(number.prefix, HighlightType::NumberDecor);
            self.s.emit_and_advance(digits, HighlightType::Number);
            self.s.emit_and_advance(number.suffix, HighlightType::NumberDecor);
        }
        self.expression_position = false;
        true
    }

    fn expect_regex(&mut self) -> bool {
        if !self.expression_position {
            return false;
        }
        let length = match_regex_literal(self.s.remainder());
        if length == 0 {
            return false;
        }
        self.s.emit_and_advance(length, HighlightType::String);
        self.expression_position = false;
        true
    }

    /// A JSX element, fragment, or self-closing tag in expression position,
    /// including all of its children.
    fn expect_jsx_element(&mut self) -> bool {
        if self.s.options().strict || !self.expression_position || !self.s.starts_with("<") {
            return false;
        }
        let tag = match_jsx_tag(self.s.remainder());
        if tag.length == 0 || tag.kind.depth_change() < 0 {
            return false;
        }
        self.emit_jsx_tag(tag.length);
        if tag.kind.depth_change() > 0 {
            self.consume_jsx_children();
        }
        self.expression_position = false;
        true
    }

    /// Emit the tag of `length` bytes at the cursor, part by part.
    fn emit_jsx_tag(&mut self, length: usize) {
        let begin = self.s.index();
        let mut parts = Vec::new();
        JsxTagWalker::new(&self.s.remainder()[..length], |part, offset, length| {
            parts.push((part, begin + offset, length));
        })
        .walk();

        for (part, offset, length) in parts {
            self.s.advance(offset - self.s.index());
            match part {
                JsxPart::Punctuation => self.s.emit_and_advance(length, HighlightType::SymPunc),
                JsxPart::TagName => self.s.emit_and_advance(length, HighlightType::MarkupTag),
                JsxPart::AttributeName => self.s.emit_and_advance(length, HighlightType::MarkupAttr),
                JsxPart::String => self.s.emit_and_advance(length, HighlightType::String),
                JsxPart::Comment => self.emit_comment(length),
                JsxPart::Expression => self.emit_expression_container(length),
            }
        }
        self.s.advance(begin + length - self.s.index());
    }

    /// `{` expression `}` of `length` bytes at the cursor.
    fn emit_expression_container(&mut self, length: usize) {
        self.s.emit_and_advance(1, HighlightType::SymBrace);
        let begin = self.s.index();
        self.highlight_embedded(begin, begin + length - 2);
        self.s.emit_and_advance(1, HighlightType::SymBrace);
    }

    /// Children of an open element, up to and including the tag that closes
    /// it. Text is left unhighlighted.
    fn consume_jsx_children(&mut self) {
        let mut depth: isize = 1;
        while depth > 0 {
            let rest = self.s.remainder();
            match rest.chars().next() {
                None => return,
                Some('{') => match match_jsx_braced(rest) {
                    0 => {
                        self.s.emit_and_advance(1, HighlightType::SymBrace);
                        let (begin, end) = (self.s.index(), self.end());
                        self.highlight_embedded(begin, end);
                        return;
                    }
                    length => self.emit_expression_container(length),
                },
                Some('<') => {
                    let tag = match_jsx_tag(rest);
                    if tag.length == 0 {
                        self.s.advance(1);
                        continue;
                    }
                    self.emit_jsx_tag(tag.length);
                    depth += tag.kind.depth_change();
                }
                Some('&') => match match_character_reference(rest) {
                    0 => self.s.advance(1),
                    length => self.s.emit_and_advance(length, HighlightType::Escape),
                },
                Some(_) => {
                    let text = rest.find(['{', '<', '&']).unwrap_or(rest.len());
                    self.s.advance(text);
                }
            }
        }
    }

    /// `#name` class member.
    fn expect_private_name(&mut self) -> bool {
        let rest = self.s.remainder();
        if !rest.starts_with('#') {
            return false;
        }
        let name = match_identifier(&rest[1..]);
        if name == 0 {
            return false;
        }
        self.s.emit_and_advance(1 + name, HighlightType::Identifier);
        self.expression_position = false;
        true
    }

    fn expect_identifier_or_keyword(&mut self, member_access: bool) -> bool {
        let rest = self.s.remainder();
        let length = match_identifier(rest);
        if length == 0 {
            return false;
        }
        let word = &rest[..length];
        let kind = if member_access {
            HighlightType::Identifier
        } else {
            lookup_keyword(word).unwrap_or(HighlightType::Identifier)
        };
        self.s.emit_and_advance(length, kind);
        self.expression_position = match kind {
            HighlightType::Identifier | HighlightType::Bool | HighlightType::Null => false,
            _ => !matches!(word, "this" | "super"),
        };
        true
    }

    fn expect_operator(&mut self) -> bool {
        let rest = self.s.remainder();
        let length = match_operator(rest);
        if length == 0 {
            return false;
        }
        let op = &rest[..length];
        self.s.emit_and_advance(length, operator_kind(op));
        match op {
            ")" | "]" => self.expression_position = false,
            "++" | "--" => {}
            _ => self.expression_position = true,
        }
        self.member_access = matches!(op, "." | "?.");
        true
    }

    fn consume_error(&mut self) {
        let length = first_char_len(self.s.remainder());
        self.s.emit_and_advance(length, HighlightType::Error);
        self.expression_position = true;
    }
}

/// Scan `source` as JavaScript (with JSX unless `options.strict`). Always
/// consumes the whole input.
pub fn highlight_javascript(sink: &mut TokenSink, source: &str, options: &HighlightOptions) -> bool {
    JsHighlighter::new(Scanner::new(sink, source, *options)).highlight()
}
