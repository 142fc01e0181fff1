//! Character classification shared by all scanners.
//!
//! Every predicate is a pure function of a single code point. The XML name
//! classes follow productions [4] and [4a] of XML 1.0 (Fifth Edition) exactly;
//! identifier classes for C and JavaScript delegate to Unicode XID via
//! `unicode-ident`.

use unicode_ident::{is_xid_continue, is_xid_start};

/// Inclusive code point ranges for `NameStartChar`, excluding the ASCII part.
static XML_NAME_START_RANGES: &[(char, char)] = &[
    ('\u{C0}', '\u{D6}'),
    ('\u{D8}', '\u{F6}'),
    ('\u{F8}', '\u{2FF}'),
    ('\u{370}', '\u{37D}'),
    ('\u{37F}', '\u{1FFF}'),
    ('\u{200C}', '\u{200D}'),
    ('\u{2070}', '\u{218F}'),
    ('\u{2C00}', '\u{2FEF}'),
    ('\u{3001}', '\u{D7FF}'),
    ('\u{F900}', '\u{FDCF}'),
    ('\u{FDF0}', '\u{FFFD}'),
    ('\u{10000}', '\u{EFFFF}'),
];

/// Additional inclusive ranges allowed in `NameChar` beyond `NameStartChar`.
static XML_NAME_EXTRA_RANGES: &[(char, char)] = &[
    ('\u{B7}', '\u{B7}'),
    ('\u{300}', '\u{36F}'),
    ('\u{203F}', '\u{2040}'),
];

fn in_ranges(c: char, ranges: &[(char, char)]) -> bool {
    ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
}

pub fn is_ascii_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_ascii_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_ascii_alphanumeric(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

pub fn is_ascii_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

pub fn is_ascii_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

pub fn is_ascii_binary_digit(c: char) -> bool {
    matches!(c, '0' | '1')
}

/// `S ::= (#x20 | #x9 | #xD | #xA)+`
pub fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// ASCII whitespace as the HTML tokenizer defines it (includes form feed).
pub fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{C}')
}

/// `NameStartChar` from XML 1.0.
pub fn is_xml_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ':' || c == '_' || in_ranges(c, XML_NAME_START_RANGES)
}

/// `NameChar` from XML 1.0.
pub fn is_xml_name(c: char) -> bool {
    is_xml_name_start(c)
        || c.is_ascii_digit()
        || c == '-'
        || c == '.'
        || in_ranges(c, XML_NAME_EXTRA_RANGES)
}

pub fn is_c_identifier_start(c: char) -> bool {
    c == '_' || is_xid_start(c)
}

pub fn is_c_identifier_continue(c: char) -> bool {
    c == '_' || is_xid_continue(c)
}

pub fn is_js_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || is_xid_start(c)
}

/// `IdentifierPart`: XID_Continue plus `$`, ZWNJ and ZWJ.
pub fn is_js_identifier_continue(c: char) -> bool {
    c == '$' || c == '_' || c == '\u{200C}' || c == '\u{200D}' || is_xid_continue(c)
}

pub fn is_js_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// `WhiteSpace` and `LineTerminator` from ECMA-262.
pub fn is_js_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\u{B}' | '\u{C}' | ' ' | '\u{A0}' | '\u{FEFF}')
        || is_js_line_terminator(c)
        || (c > '\u{7F}' && c.is_whitespace())
}

/// Length in bytes of the longest prefix of `s` whose characters all satisfy `pred`.
pub fn length_while(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(s.len(), |(i, _)| i)
}

/// Length in bytes of the first character of `s`, or 0 if `s` is empty.
pub fn first_char_len(s: &str) -> usize {
    s.chars().next().map_or(0, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_whitespace() {
        for c in [' ', '\t', '\r', '\n'] {
            assert!(is_xml_whitespace(c));
        }
        assert!(!is_xml_whitespace('\u{C}'));
        assert!(!is_xml_whitespace('\u{A0}'));
        assert!(is_html_whitespace('\u{C}'));
    }

    #[test]
    fn test_xml_name_start_boundaries() {
        assert!(is_xml_name_start(':'));
        assert!(is_xml_name_start('_'));
        assert!(is_xml_name_start('\u{C0}'));
        assert!(!is_xml_name_start('\u{D7}'));
        assert!(!is_xml_name_start('\u{F7}'));
        assert!(is_xml_name_start('\u{37F}'));
        assert!(!is_xml_name_start('\u{37E}'));
        assert!(!is_xml_name_start('\u{3000}'));
        assert!(is_xml_name_start('\u{10000}'));
        assert!(!is_xml_name_start('\u{F0000}'));
        assert!(!is_xml_name_start('-'));
        assert!(!is_xml_name_start('1'));
    }

    #[test]
    fn test_xml_name_continue() {
        for c in ['-', '.', '7', '\u{B7}', '\u{300}', '\u{2040}'] {
            assert!(is_xml_name(c), "{c:?} is a NameChar");
            assert!(!is_xml_name_start(c), "{c:?} is not a NameStartChar");
        }
        assert!(!is_xml_name(' '));
        assert!(!is_xml_name('>'));
    }

    #[test]
    fn test_identifiers() {
        assert!(is_js_identifier_start('$'));
        assert!(!is_c_identifier_start('$'));
        assert!(is_c_identifier_start('é'));
        assert!(is_js_identifier_continue('\u{200D}'));
        assert!(!is_c_identifier_start('1'));
        assert!(is_c_identifier_continue('1'));
    }

    #[test]
    fn test_length_while() {
        assert_eq!(length_while("abc1 ", is_ascii_alpha), 3);
        assert_eq!(length_while("", is_ascii_alpha), 0);
        assert_eq!(length_while("héllo!", char::is_alphabetic), 6);
        assert_eq!(first_char_len("é"), 2);
        assert_eq!(first_char_len(""), 0);
    }
}
