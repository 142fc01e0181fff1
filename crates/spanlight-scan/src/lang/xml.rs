//! XML scanner.
//!
//! Matchers follow the productions of XML 1.0 (Fifth Edition). The scanner
//! recognizes, in priority order at each position: comments, CDATA
//! sections, processing instructions, the document type declaration, end
//! tags, start and empty-element tags, references, and character data.
//! An XML declaration is only recognized at the very start of the input.
//!
//! A `<` or `&` that does not begin a well-formed construct stops the scan:
//! XML has no lenient reading of either character.

use crate::chars::{
    first_char_len, is_ascii_alpha, is_ascii_alphanumeric, is_ascii_digit, is_ascii_hex_digit,
    is_xml_name, is_xml_name_start, is_xml_whitespace, length_while,
};
use crate::scanner::{Highlighter, Scanner};
use crate::token::{HighlightType, TokenSink};
use crate::HighlightOptions;

pub const COMMENT_PREFIX: &str = "<!--";
pub const COMMENT_SUFFIX: &str = "-->";
const ILLEGAL_COMMENT_SEQUENCE: &str = "--";
pub const CDATA_SECTION_PREFIX: &str = "<![CDATA[";
pub const CDATA_SECTION_SUFFIX: &str = "]]>";
const PI_PREFIX: &str = "<?";
const PI_SUFFIX: &str = "?>";
const XML_DECL_PREFIX: &str = "<?xml";
const DOCTYPE_PREFIX: &str = "<!DOCTYPE";

/// Matches a maximal run of XML whitespace.
pub fn match_whitespace(s: &str) -> usize {
    length_while(s, is_xml_whitespace)
}

/// Matches `Name ::= NameStartChar (NameChar)*`.
pub fn match_name(s: &str) -> usize {
    match s.chars().next() {
        Some(c) if is_xml_name_start(c) => {
            let first = c.len_utf8();
            first + length_while(&s[first..], is_xml_name)
        }
        _ => 0,
    }
}

/// Matches `'<!--' ((Char - '-') | ('-' (Char - '-')))* '-->'`.
///
/// Returns 0 if the comment is unterminated or if `--` occurs anywhere in
/// the body, including directly before the closing `>` (`--->`).
pub fn match_comment(s: &str) -> usize {
    let Some(mut rest) = s.strip_prefix(COMMENT_PREFIX) else {
        return 0;
    };

    let mut length = COMMENT_PREFIX.len();
    while !rest.is_empty() {
        if rest.starts_with(COMMENT_SUFFIX) {
            return length + COMMENT_SUFFIX.len();
        }
        if rest.starts_with(ILLEGAL_COMMENT_SEQUENCE) {
            return 0;
        }
        let n = first_char_len(rest);
        length += n;
        rest = &rest[n..];
    }

    0
}

/// Matches `'<![CDATA[' (Char* - (Char* ']]>' Char*)) ']]>'`.
pub fn match_cdata_section(s: &str) -> usize {
    let Some(body) = s.strip_prefix(CDATA_SECTION_PREFIX) else {
        return 0;
    };
    body.find(CDATA_SECTION_SUFFIX).map_or(0, |end| {
        CDATA_SECTION_PREFIX.len() + end + CDATA_SECTION_SUFFIX.len()
    })
}

/// Matches a character or entity reference:
/// `&#` digits `;`, `&#x` hex digits `;`, or `&` Name `;`.
pub fn match_reference(s: &str) -> usize {
    let (body_start, body_length) = if let Some(hex) = s.strip_prefix("&#x") {
        (3, length_while(hex, is_ascii_hex_digit))
    } else if let Some(decimal) = s.strip_prefix("&#") {
        (2, length_while(decimal, is_ascii_digit))
    } else if let Some(name) = s.strip_prefix('&') {
        (1, match_name(name))
    } else {
        return 0;
    };

    let end = body_start + body_length;
    if body_length == 0 || !s[end..].starts_with(';') {
        return 0;
    }
    end + 1
}

/// Matches `PITarget`. Targets reserved by the `xml` prefix are accepted so
/// that a malformed XML declaration still reads as an instruction.
pub fn match_pi_target(s: &str) -> usize {
    match_name(s)
}

/// Matches `VersionNum ::= '1.' [0-9]+`.
pub fn match_version_num(s: &str) -> usize {
    let Some(digits) = s.strip_prefix("1.") else {
        return 0;
    };
    match length_while(digits, is_ascii_digit) {
        0 => 0,
        n => 2 + n,
    }
}

/// Matches `EncName ::= [A-Za-z] ([A-Za-z0-9._] | '-')*`.
pub fn match_encoding_name(s: &str) -> usize {
    match s.chars().next() {
        Some(c) if is_ascii_alpha(c) => {
            1 + length_while(&s[1..], |c| {
                is_ascii_alphanumeric(c) || matches!(c, '.' | '_' | '-')
            })
        }
        _ => 0,
    }
}

/// Matches the value of `SDDecl`: `yes` or `no`.
pub fn match_standalone_option(s: &str) -> usize {
    if s.starts_with("yes") {
        3
    } else if s.starts_with("no") {
        2
    } else {
        0
    }
}

/// Matches a `SystemLiteral`: any text between matching quotes, quotes included.
pub fn match_system_literal(s: &str) -> usize {
    let Some(quote) = s.chars().next().filter(|&c| c == '"' || c == '\'') else {
        return 0;
    };
    s[1..].find(quote).map_or(0, |end| end + 2)
}

fn is_pubid_char(c: char) -> bool {
    matches!(c, ' ' | '\r' | '\n')
        || is_ascii_alphanumeric(c)
        || "-'()+,./:=?;!*#@$_%".contains(c)
}

/// Matches a `PubidLiteral`, quotes included.
pub fn match_pubid_literal(s: &str) -> usize {
    let Some(quote) = s.chars().next().filter(|&c| c == '"' || c == '\'') else {
        return 0;
    };
    let body = length_while(&s[1..], |c| c != quote && is_pubid_char(c));
    if s[1 + body..].starts_with(quote) {
        body + 2
    } else {
        0
    }
}

/// Sub-part lengths of a declaration pseudo-attribute such as
/// ` version = "1.0"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclInfoMatch {
    pub leading_whitespace: usize,
    pub keyword: usize,
    pub whitespace_before_equals: usize,
    pub whitespace_after_equals: usize,
    /// Length of the value between the quotes.
    pub value: usize,
    pub quote: char,
    /// Whether a non-empty value was followed by the matching quote.
    pub terminated: bool,
}

impl DeclInfoMatch {
    /// Total length, including both quotes. Only meaningful if `terminated`.
    pub fn length(&self) -> usize {
        self.leading_whitespace
            + self.keyword
            + self.whitespace_before_equals
            + 1
            + self.whitespace_after_equals
            + self.value
            + 2
    }
}

/// Matches `S keyword Eq (' value ' | " value ")` where `value` is matched
/// by `value_matcher`.
///
/// Returns `None` if anything up to and including the opening quote is
/// missing. A match whose value is empty or is not followed by the same
/// quote is returned with `terminated == false`.
pub fn match_decl_info(
    s: &str,
    keyword: &str,
    value_matcher: fn(&str) -> usize,
) -> Option<DeclInfoMatch> {
    let leading_whitespace = match_whitespace(s);
    if leading_whitespace == 0 {
        return None;
    }
    let mut rest = &s[leading_whitespace..];

    rest = rest.strip_prefix(keyword)?;
    let whitespace_before_equals = match_whitespace(rest);
    rest = rest[whitespace_before_equals..].strip_prefix('=')?;
    let whitespace_after_equals = match_whitespace(rest);
    rest = &rest[whitespace_after_equals..];

    let quote = rest.chars().next().filter(|&c| c == '"' || c == '\'')?;
    rest = &rest[1..];
    let value = value_matcher(rest);
    let terminated = value != 0 && rest[value..].starts_with(quote);

    Some(DeclInfoMatch {
        leading_whitespace,
        keyword: keyword.len(),
        whitespace_before_equals,
        whitespace_after_equals,
        value,
        quote,
        terminated,
    })
}

/// Optional pseudo-attributes of the XML declaration, in document order.
const OPTIONAL_DECL_INFO: [(&str, fn(&str) -> usize); 2] = [
    ("encoding", match_encoding_name),
    ("standalone", match_standalone_option),
];

struct XmlHighlighter<'a, 's> {
    s: Scanner<'a, 's>,
}

impl<'a, 's> Highlighter<'a, 's> for XmlHighlighter<'a, 's> {
    fn scanner(&mut self) -> &mut Scanner<'a, 's> {
        &mut self.s
    }
}

impl<'a, 's> XmlHighlighter<'a, 's> {
    fn highlight(mut self) -> bool {
        self.attempt(Self::expect_xml_declaration);

        while !self.s.is_at_end() {
            if self.attempt(Self::expect_comment)
                || self.attempt(Self::expect_cdata)
                || self.attempt(Self::expect_processing_instruction)
                || self.attempt(Self::expect_doctype)
                || self.attempt(Self::expect_end_tag)
                || self.attempt(Self::expect_start_tag)
                || self.attempt(Self::expect_reference)
                || self.expect_char_data()
            {
                continue;
            }
            return self.s.unmatched("xml");
        }
        true
    }

    fn skip_whitespace(&mut self) -> usize {
        let length = match_whitespace(self.s.remainder());
        self.s.advance(length);
        length
    }

    // --- Prolog ---

    /// `<?xml` VersionInfo EncodingDecl? SDDecl? S? `?>`
    fn expect_xml_declaration(&mut self) -> bool {
        let rest = self.s.remainder();
        if !rest.starts_with(XML_DECL_PREFIX) {
            return false;
        }
        self.s.emit_and_advance(XML_DECL_PREFIX.len(), HighlightType::Macro);

        match match_decl_info(self.s.remainder(), "version", match_version_num) {
            Some(info) if info.terminated => self.emit_decl_info(info),
            _ => return false,
        }

        for (keyword, matcher) in OPTIONAL_DECL_INFO {
            match match_decl_info(self.s.remainder(), keyword, matcher) {
                Some(info) if info.terminated => self.emit_decl_info(info),
                Some(_) => return false,
                None => {}
            }
        }

        self.skip_whitespace();
        if !self.s.starts_with(PI_SUFFIX) {
            return false;
        }
        self.s.emit_and_advance(PI_SUFFIX.len(), HighlightType::Macro);
        true
    }

    fn emit_decl_info(&mut self, info: DeclInfoMatch) {
        self.s.advance(info.leading_whitespace);
        self.s.emit_and_advance(info.keyword, HighlightType::MarkupAttr);
        self.s.advance(info.whitespace_before_equals);
        self.s.emit_and_advance(1, HighlightType::SymPunc);
        self.s.advance(info.whitespace_after_equals);
        self.s.emit_and_advance(info.value + 2, HighlightType::String);
    }

    /// `<!DOCTYPE` S Name (S ExternalID)? S? (`[` intSubset `]` S?)? `>`
    fn expect_doctype(&mut self) -> bool {
        if !self.s.starts_with(DOCTYPE_PREFIX) {
            return false;
        }
        self.s.emit_and_advance(DOCTYPE_PREFIX.len(), HighlightType::Macro);

        if self.skip_whitespace() == 0 {
            return false;
        }
        let name = match_name(self.s.remainder());
        if name == 0 {
            return false;
        }
        self.s.emit_and_advance(name, HighlightType::MarkupTag);

        let whitespace = match_whitespace(self.s.remainder());
        let after = &self.s.remainder()[whitespace..];
        if whitespace > 0 && after.starts_with("SYSTEM") {
            self.s.advance(whitespace);
            self.s.emit_and_advance(6, HighlightType::Keyword);
            if !self.expect_literal(match_system_literal) {
                return false;
            }
        } else if whitespace > 0 && after.starts_with("PUBLIC") {
            self.s.advance(whitespace);
            self.s.emit_and_advance(6, HighlightType::Keyword);
            if !self.expect_literal(match_pubid_literal) || !self.expect_literal(match_system_literal)
            {
                return false;
            }
        }

        self.skip_whitespace();
        if self.s.starts_with("[") {
            self.s.emit_and_advance(1, HighlightType::SymSquare);
            if !self.expect_internal_subset() {
                return false;
            }
            self.s.emit_and_advance(1, HighlightType::SymSquare);
            self.skip_whitespace();
        }

        if !self.s.starts_with(">") {
            return false;
        }
        self.s.emit_and_advance(1, HighlightType::Macro);
        true
    }

    /// S followed by a quoted literal.
    fn expect_literal(&mut self, matcher: fn(&str) -> usize) -> bool {
        if self.skip_whitespace() == 0 {
            return false;
        }
        let length = matcher(self.s.remainder());
        if length == 0 {
            return false;
        }
        self.s.emit_and_advance(length, HighlightType::String);
        true
    }

    /// Scans up to (not including) the `]` closing the internal subset.
    fn expect_internal_subset(&mut self) -> bool {
        loop {
            self.skip_whitespace();
            if self.s.is_at_end() {
                return false;
            }
            if self.s.starts_with("]") {
                return true;
            }
            if self.attempt(Self::expect_comment)
                || self.attempt(Self::expect_processing_instruction)
                || self.attempt(Self::expect_markup_declaration)
                || self.attempt(Self::expect_parameter_entity_reference)
            {
                continue;
            }
            return false;
        }
    }

    /// `<!ELEMENT`, `<!ATTLIST`, `<!ENTITY`, `<!NOTATION` declarations.
    /// Quoted literals and parameter entity references inside are
    /// highlighted; the rest of the declaration is left as a gap.
    fn expect_markup_declaration(&mut self) -> bool {
        let rest = self.s.remainder();
        let Some(after) = rest.strip_prefix("<!") else {
            return false;
        };
        let keyword = length_while(after, |c| c.is_ascii_uppercase());
        if keyword == 0 {
            return false;
        }
        self.s.emit_and_advance(2 + keyword, HighlightType::Macro);

        loop {
            let rest = self.s.remainder();
            let Some(c) = rest.chars().next() else {
                return false;
            };
            match c {
                '>' => {
                    self.s.emit_and_advance(1, HighlightType::Macro);
                    return true;
                }
                '"' | '\'' => {
                    let length = match_system_literal(rest);
                    if length == 0 {
                        return false;
                    }
                    self.s.emit_and_advance(length, HighlightType::String);
                }
                '%' if match_name(&rest[1..]) > 0 => {
                    if !self.expect_parameter_entity_reference() {
                        return false;
                    }
                }
                _ => self.s.advance(c.len_utf8()),
            }
        }
    }

    /// `PEReference ::= '%' Name ';'`
    fn expect_parameter_entity_reference(&mut self) -> bool {
        let rest = self.s.remainder();
        let Some(after) = rest.strip_prefix('%') else {
            return false;
        };
        let name = match_name(after);
        if name == 0 || !after[name..].starts_with(';') {
            return false;
        }
        self.s.emit_and_advance(name + 2, HighlightType::Escape);
        true
    }

    // --- Content ---

    fn expect_comment(&mut self) -> bool {
        let length = match_comment(self.s.remainder());
        if length == 0 {
            return false;
        }
        let body = length - COMMENT_PREFIX.len() - COMMENT_SUFFIX.len();

        self.s.emit_and_advance(COMMENT_PREFIX.len(), HighlightType::CommentDelimiter);
        self.s.emit_and_advance(body, HighlightType::Comment);
        self.s.emit_and_advance(COMMENT_SUFFIX.len(), HighlightType::CommentDelimiter);
        true
    }

    fn expect_cdata(&mut self) -> bool {
        let length = match_cdata_section(self.s.remainder());
        if length == 0 {
            return false;
        }
        let body = length - CDATA_SECTION_PREFIX.len() - CDATA_SECTION_SUFFIX.len();

        self.s.emit_and_advance(CDATA_SECTION_PREFIX.len(), HighlightType::Macro);
        self.s.advance(body);
        self.s.emit_and_advance(CDATA_SECTION_SUFFIX.len(), HighlightType::Macro);
        true
    }

    /// `<?` PITarget (S (Char* - (Char* '?>' Char*)))? `?>`
    fn expect_processing_instruction(&mut self) -> bool {
        if !self.s.starts_with(PI_PREFIX) {
            return false;
        }
        self.s.emit_and_advance(PI_PREFIX.len(), HighlightType::SymPunc);

        let target = match_pi_target(self.s.remainder());
        if target == 0 {
            return false;
        }
        self.s.emit_and_advance(target, HighlightType::Macro);

        let whitespace = self.skip_whitespace();
        let Some(body) = self.s.remainder().find(PI_SUFFIX) else {
            return false;
        };
        if body > 0 && whitespace == 0 {
            return false;
        }
        self.s.advance(body);
        self.s.emit_and_advance(PI_SUFFIX.len(), HighlightType::SymPunc);
        true
    }

    /// `</` Name S? `>`
    fn expect_end_tag(&mut self) -> bool {
        if !self.s.starts_with("</") {
            return false;
        }
        self.s.emit_and_advance(2, HighlightType::SymPunc);

        let name = match_name(self.s.remainder());
        if name == 0 {
            return false;
        }
        self.s.emit_and_advance(name, HighlightType::MarkupTag);

        self.skip_whitespace();
        if !self.s.starts_with(">") {
            return false;
        }
        self.s.emit_and_advance(1, HighlightType::SymPunc);
        true
    }

    /// `<` Name (S Attribute)* S? (`>` | `/>`)
    fn expect_start_tag(&mut self) -> bool {
        if !self.s.starts_with("<") {
            return false;
        }
        self.s.emit_and_advance(1, HighlightType::SymPunc);

        let name = match_name(self.s.remainder());
        if name == 0 {
            return false;
        }
        self.s.emit_and_advance(name, HighlightType::MarkupTag);

        loop {
            let whitespace = self.skip_whitespace();
            if self.s.starts_with(">") {
                self.s.emit_and_advance(1, HighlightType::SymPunc);
                return true;
            }
            if self.s.starts_with("/>") {
                self.s.emit_and_advance(2, HighlightType::SymPunc);
                return true;
            }
            if whitespace == 0 || !self.expect_attribute() {
                return false;
            }
        }
    }

    /// Name S? `=` S? AttValue
    fn expect_attribute(&mut self) -> bool {
        let name = match_name(self.s.remainder());
        if name == 0 {
            return false;
        }
        self.s.emit_and_advance(name, HighlightType::MarkupAttr);

        self.skip_whitespace();
        if !self.s.starts_with("=") {
            return false;
        }
        self.s.advance(1);
        self.skip_whitespace();

        self.expect_attribute_value()
    }

    /// A quoted attribute value. The literal text is emitted as strings,
    /// split around references, which are emitted as escapes.
    ///
    /// The quotes belong to the first and last parts, so `"&amp;"` yields a
    /// lone `"` string on each side of the escape. Only parts between two
    /// adjacent references can be empty, and those are not emitted.
    fn expect_attribute_value(&mut self) -> bool {
        let quote = match self.s.peek() {
            Some(c @ ('"' | '\'')) => c,
            _ => return false,
        };

        let mut part_start = self.s.index();
        self.s.advance(1);
        loop {
            let Some(c) = self.s.peek() else {
                return false;
            };
            if c == quote {
                self.s.advance(1);
                self.emit_string_part(part_start);
                return true;
            }
            match c {
                '<' => return false,
                '&' => {
                    self.emit_string_part(part_start);
                    if !self.expect_reference() {
                        return false;
                    }
                    part_start = self.s.index();
                }
                _ => self.s.advance(c.len_utf8()),
            }
        }
    }

    /// Emit `[part_start, cursor)` as a string, unless it is empty.
    fn emit_string_part(&mut self, part_start: usize) {
        let length = self.s.index() - part_start;
        if length > 0 {
            self.s.emit(part_start, length, HighlightType::String);
        }
    }

    fn expect_reference(&mut self) -> bool {
        let length = match_reference(self.s.remainder());
        if length == 0 {
            return false;
        }
        self.s.emit_and_advance(length, HighlightType::Escape);
        true
    }

    /// Character data up to the next markup or reference. Left unhighlighted.
    fn expect_char_data(&mut self) -> bool {
        let rest = self.s.remainder();
        let mut length = 0;
        for (i, c) in rest.char_indices() {
            if c == '<' || c == '&' || rest[i..].starts_with(CDATA_SECTION_SUFFIX) {
                break;
            }
            length = i + c.len_utf8();
        }
        if length == 0 {
            return false;
        }
        self.s.advance(length);
        true
    }
}

/// Scan `source` as XML.
pub fn highlight_xml(sink: &mut TokenSink, source: &str, options: &HighlightOptions) -> bool {
    XmlHighlighter {
        s: Scanner::new(sink, source, *options),
    }
    .highlight()
}
