//! HTML scanner.
//!
//! Unlike XML, HTML is read leniently: a `<` or `&` that does not start a
//! recognizable construct is plain text, so this scanner never aborts.
//! Attribute values may be unquoted, comments may be unterminated, and the
//! content of raw text elements (`script`, `style`) and escapable raw text
//! elements (`textarea`, `title`) is not scanned for markup.

use crate::chars::{
    first_char_len, is_ascii_alpha, is_ascii_alphanumeric, is_ascii_digit, is_ascii_hex_digit,
    is_html_whitespace, length_while,
};
use crate::lang::xml;
use crate::scanner::{Highlighter, Scanner};
use crate::token::{HighlightType, TokenSink};
use crate::HighlightOptions;

const COMMENT_PREFIX: &str = "<!--";
const COMMENT_SUFFIX: &str = "-->";
const DOCTYPE_PREFIX: &str = "<!DOCTYPE";

/// Elements whose content is raw text: no markup, no references.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];
/// Elements whose content is text with references but no markup.
const ESCAPABLE_RAW_TEXT_ELEMENTS: [&str; 2] = ["textarea", "title"];

/// Matches a character reference: `&name;`, `&#digits;`, or `&#x` / `&#X`
/// followed by hex digits and `;`.
///
/// Also used for JSX text, which shares HTML's reference syntax.
pub fn match_character_reference(s: &str) -> usize {
    let (body_start, body_length) =
        if let Some(hex) = s.strip_prefix("&#x").or_else(|| s.strip_prefix("&#X")) {
            (3, length_while(hex, is_ascii_hex_digit))
        } else if let Some(decimal) = s.strip_prefix("&#") {
            (2, length_while(decimal, is_ascii_digit))
        } else if let Some(name) = s.strip_prefix('&') {
            (1, length_while(name, is_ascii_alphanumeric))
        } else {
            return 0;
        };

    let end = body_start + body_length;
    if body_length == 0 || !s[end..].starts_with(';') {
        return 0;
    }
    end + 1
}

/// Matches a tag name: an ASCII letter followed by anything up to
/// whitespace, `/` or `>`.
pub fn match_tag_name(s: &str) -> usize {
    match s.chars().next() {
        Some(c) if is_ascii_alpha(c) => {
            1 + length_while(&s[1..], |c| {
                !is_html_whitespace(c) && !matches!(c, '/' | '>' | '<')
            })
        }
        _ => 0,
    }
}

pub fn match_attribute_name(s: &str) -> usize {
    length_while(s, |c| {
        !is_html_whitespace(c) && !matches!(c, '/' | '>' | '=' | '"' | '\'' | '<')
    })
}

pub fn match_unquoted_attribute_value(s: &str) -> usize {
    length_while(s, |c| {
        !is_html_whitespace(c) && !matches!(c, '"' | '\'' | '=' | '<' | '>' | '`')
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentMatch {
    pub length: usize,
    /// `<!-->` or `<!--->`: the whole match is delimiter.
    pub abrupt: bool,
    pub terminated: bool,
}

/// Matches a comment. Lenient: an unterminated comment runs to the end of
/// the input, and the abrupt forms `<!-->` and `<!--->` are complete
/// comments.
pub fn match_comment(s: &str) -> CommentMatch {
    let Some(body) = s.strip_prefix(COMMENT_PREFIX) else {
        return CommentMatch::default();
    };
    let abrupt = |length| CommentMatch {
        length: COMMENT_PREFIX.len() + length,
        abrupt: true,
        terminated: true,
    };
    if body.starts_with('>') {
        return abrupt(1);
    }
    if body.starts_with("->") {
        return abrupt(2);
    }
    match body.find(COMMENT_SUFFIX) {
        Some(end) => CommentMatch {
            length: COMMENT_PREFIX.len() + end + COMMENT_SUFFIX.len(),
            abrupt: false,
            terminated: true,
        },
        None => CommentMatch {
            length: s.len(),
            abrupt: false,
            terminated: false,
        },
    }
}

/// Matches `<!DOCTYPE` (any case) up to and including the next `>`.
pub fn match_doctype(s: &str) -> usize {
    let prefix_matches = s
        .get(..DOCTYPE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DOCTYPE_PREFIX));
    if !prefix_matches {
        return 0;
    }
    s[DOCTYPE_PREFIX.len()..]
        .find('>')
        .map_or(0, |end| DOCTYPE_PREFIX.len() + end + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextContent {
    Raw,
    EscapableRaw,
}

fn text_content_of(tag_name: &str) -> Option<TextContent> {
    if RAW_TEXT_ELEMENTS
        .iter()
        .any(|name| name.eq_ignore_ascii_case(tag_name))
    {
        Some(TextContent::Raw)
    } else if ESCAPABLE_RAW_TEXT_ELEMENTS
        .iter()
        .any(|name| name.eq_ignore_ascii_case(tag_name))
    {
        Some(TextContent::EscapableRaw)
    } else {
        None
    }
}

/// Offset of the end tag closing a raw text element named `tag_name`, or
/// the length of `s` if there is none.
fn find_raw_text_end(s: &str, tag_name: &str) -> usize {
    for (i, _) in s.match_indices("</") {
        let after = &s[i + 2..];
        let name_matches = after
            .get(..tag_name.len())
            .is_some_and(|name| name.eq_ignore_ascii_case(tag_name));
        if !name_matches {
            continue;
        }
        match after[tag_name.len()..].chars().next() {
            None | Some('/' | '>') => return i,
            Some(c) if is_html_whitespace(c) => return i,
            _ => {}
        }
    }
    s.len()
}

struct HtmlHighlighter<'a, 's> {
    s: Scanner<'a, 's>,
}

impl<'a, 's> Highlighter<'a, 's> for HtmlHighlighter<'a, 's> {
    fn scanner(&mut self) -> &mut Scanner<'a, 's> {
        &mut self.s
    }
}

impl<'a, 's> HtmlHighlighter<'a, 's> {
    fn highlight(mut self) -> bool {
        while !self.s.is_at_end() {
            if self.attempt(Self::expect_comment)
                || self.attempt(Self::expect_doctype)
                || self.attempt(Self::expect_cdata)
                || self.attempt(Self::expect_end_tag)
                || self.attempt(Self::expect_start_tag)
                || self.attempt(Self::expect_character_reference)
            {
                continue;
            }
            self.consume_text();
        }
        true
    }

    fn skip_whitespace(&mut self) -> usize {
        let length = length_while(self.s.remainder(), is_html_whitespace);
        self.s.advance(length);
        length
    }

    fn expect_comment(&mut self) -> bool {
        let rest = self.s.remainder();
        let comment = match_comment(rest);
        if comment.length == 0 {
            return false;
        }
        if comment.abrupt {
            self.s.emit_and_advance(comment.length, HighlightType::CommentDelimiter);
            return true;
        }

        let suffix = if comment.terminated {
            COMMENT_SUFFIX.len()
        } else {
            0
        };
        self.s.emit_and_advance(COMMENT_PREFIX.len(), HighlightType::CommentDelimiter);
        self.s.emit_and_advance(
            comment.length - COMMENT_PREFIX.len() - suffix,
            HighlightType::Comment,
        );
        self.s.emit_and_advance(suffix, HighlightType::CommentDelimiter);
        true
    }

    /// `<!DOCTYPE` → macro, the root name → tag, `PUBLIC` / `SYSTEM` →
    /// keyword, quoted identifiers → string, `>` → macro.
    fn expect_doctype(&mut self) -> bool {
        let length = match_doctype(self.s.remainder());
        if length == 0 {
            return false;
        }
        let end = self.s.index() + length - 1;
        self.s.emit_and_advance(DOCTYPE_PREFIX.len(), HighlightType::Macro);

        let mut seen_name = false;
        while self.s.index() < end {
            if self.skip_whitespace() > 0 {
                continue;
            }
            let rest = &self.s.remainder()[..end - self.s.index()];
            match rest.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let literal = rest[1..].find(quote).map_or(rest.len(), |i| i + 2);
                    self.s.emit_and_advance(literal, HighlightType::String);
                }
                Some(_) => {
                    let word = length_while(rest, |c| {
                        !is_html_whitespace(c) && c != '"' && c != '\''
                    });
                    let text = &rest[..word];
                    let kind = if !seen_name {
                        seen_name = true;
                        HighlightType::MarkupTag
                    } else if text.eq_ignore_ascii_case("PUBLIC")
                        || text.eq_ignore_ascii_case("SYSTEM")
                    {
                        HighlightType::Keyword
                    } else {
                        HighlightType::Identifier
                    };
                    self.s.emit_and_advance(word, kind);
                }
                None => break,
            }
        }
        self.s.emit_and_advance(1, HighlightType::Macro);
        true
    }

    /// CDATA sections are only meaningful in foreign content (SVG, MathML),
    /// but are highlighted wherever they appear.
    fn expect_cdata(&mut self) -> bool {
        let length = xml::match_cdata_section(self.s.remainder());
        if length == 0 {
            return false;
        }
        let body = length - xml::CDATA_SECTION_PREFIX.len() - xml::CDATA_SECTION_SUFFIX.len();
        self.s.emit_and_advance(xml::CDATA_SECTION_PREFIX.len(), HighlightType::Macro);
        self.s.advance(body);
        self.s.emit_and_advance(xml::CDATA_SECTION_SUFFIX.len(), HighlightType::Macro);
        true
    }

    fn expect_end_tag(&mut self) -> bool {
        if !self.s.starts_with("</") {
            return false;
        }
        self.s.emit_and_advance(2, HighlightType::SymPunc);

        let name = match_tag_name(self.s.remainder());
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

    fn expect_start_tag(&mut self) -> bool {
        if !self.s.starts_with("<") {
            return false;
        }
        self.s.emit_and_advance(1, HighlightType::SymPunc);

        let name = match_tag_name(self.s.remainder());
        if name == 0 {
            return false;
        }
        let tag_name = &self.s.remainder()[..name];
        self.s.emit_and_advance(name, HighlightType::MarkupTag);

        loop {
            self.skip_whitespace();
            if self.s.starts_with(">") {
                self.s.emit_and_advance(1, HighlightType::SymPunc);
                if let Some(content) = text_content_of(tag_name) {
                    self.consume_raw_text(tag_name, content);
                }
                return true;
            }
            if self.s.starts_with("/>") {
                self.s.emit_and_advance(2, HighlightType::SymPunc);
                return true;
            }
            if self.s.starts_with("/") {
                self.s.advance(1);
                continue;
            }
            if !self.expect_attribute() {
                return false;
            }
        }
    }

    /// Name, optionally followed by `=` and a quoted or unquoted value.
    fn expect_attribute(&mut self) -> bool {
        let name = match_attribute_name(self.s.remainder());
        if name == 0 {
            return false;
        }
        self.s.emit_and_advance(name, HighlightType::MarkupAttr);

        let whitespace = length_while(self.s.remainder(), is_html_whitespace);
        if !self.s.remainder()[whitespace..].starts_with('=') {
            return true;
        }
        self.s.advance(whitespace + 1);
        self.skip_whitespace();

        match self.s.peek() {
            Some(quote @ ('"' | '\'')) => {
                let rest = &self.s.remainder()[1..];
                let Some(close) = rest.find(quote) else {
                    return false;
                };
                self.emit_attribute_value(close + 2);
                true
            }
            _ => {
                let length = match_unquoted_attribute_value(self.s.remainder());
                if length == 0 {
                    return false;
                }
                self.emit_attribute_value(length);
                true
            }
        }
    }

    /// Emit the next `length` bytes as string parts split around character
    /// references.
    fn emit_attribute_value(&mut self, length: usize) {
        let end = self.s.index() + length;
        let mut part_start = self.s.index();
        while self.s.index() < end {
            let rest = &self.s.remainder()[..end - self.s.index()];
            let reference = if rest.starts_with('&') {
                match_character_reference(rest)
            } else {
                0
            };
            if reference > 0 {
                self.s.emit(part_start, self.s.index() - part_start, HighlightType::String);
                self.s.emit_and_advance(reference, HighlightType::Escape);
                part_start = self.s.index();
            } else {
                self.s.advance(first_char_len(rest));
            }
        }
        self.s.emit(part_start, end - part_start, HighlightType::String);
    }

    fn expect_character_reference(&mut self) -> bool {
        let length = match_character_reference(self.s.remainder());
        if length == 0 {
            return false;
        }
        self.s.emit_and_advance(length, HighlightType::Escape);
        true
    }

    /// Text up to the next `<` or `&`, or that single character if nothing
    /// else could start there.
    fn consume_text(&mut self) {
        let rest = self.s.remainder();
        let length = match rest.find(['<', '&']) {
            Some(0) => 1,
            Some(i) => i,
            None => rest.len(),
        };
        self.s.advance(length);
    }

    /// Skip element content up to its end tag. Escapable raw text still has
    /// its references highlighted.
    fn consume_raw_text(&mut self, tag_name: &str, content: TextContent) {
        let end = self.s.index() + find_raw_text_end(self.s.remainder(), tag_name);
        if content == TextContent::Raw {
            self.s.advance(end - self.s.index());
            return;
        }
        while self.s.index() < end {
            let rest = &self.s.remainder()[..end - self.s.index()];
            let reference = match_character_reference(rest);
            if reference > 0 {
                self.s.emit_and_advance(reference, HighlightType::Escape);
                continue;
            }
            let first = first_char_len(rest);
            let text = rest[first..].find('&').map_or(rest.len(), |i| i + first);
            self.s.advance(text);
        }
    }
}

/// Scan `source` as HTML. Always consumes the whole input.
pub fn highlight_html(sink: &mut TokenSink, source: &str, options: &HighlightOptions) -> bool {
    HtmlHighlighter {
        s: Scanner::new(sink, source, *options),
    }
    .highlight()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use HighlightType::*;

    fn scan(source: &str) -> Vec<(HighlightType, &str)> {
        let mut sink = TokenSink::new();
        assert!(highlight_html(&mut sink, source, &HighlightOptions::default()));
        sink.tokens().iter().map(|t| (t.kind, t.text(source))).collect()
    }

    #[test]
    fn test_match_character_reference() {
        assert_eq!(match_character_reference("&amp;"), 5);
        assert_eq!(match_character_reference("&#160;"), 6);
        assert_eq!(match_character_reference("&#xA0;"), 6);
        assert_eq!(match_character_reference("&#XA0;"), 6);
        assert_eq!(match_character_reference("&amp"), 0);
        assert_eq!(match_character_reference("&;"), 0);
        assert_eq!(match_character_reference("&#;"), 0);
        assert_eq!(match_character_reference("& b"), 0);
        assert_eq!(match_character_reference(""), 0);
    }

    #[test]
    fn test_match_tag_name() {
        assert_eq!(match_tag_name("div>"), 3);
        assert_eq!(match_tag_name("my-element attr"), 10);
        assert_eq!(match_tag_name("h1/>"), 2);
        assert_eq!(match_tag_name("1h"), 0);
        assert_eq!(match_tag_name(""), 0);
    }

    #[test]
    fn test_match_attribute_values() {
        assert_eq!(match_attribute_name("data-x=1"), 6);
        assert_eq!(match_attribute_name("=x"), 0);
        assert_eq!(match_unquoted_attribute_value("foo bar"), 3);
        assert_eq!(match_unquoted_attribute_value("a/b>"), 3);
        assert_eq!(match_unquoted_attribute_value(">"), 0);
    }

    #[test]
    fn test_match_comment() {
        assert_eq!(
            match_comment("<!-- a -- b -->x"),
            CommentMatch {
                length: 15,
                abrupt: false,
                terminated: true
            }
        );
        assert_eq!(
            match_comment("<!-- open"),
            CommentMatch {
                length: 9,
                abrupt: false,
                terminated: false
            }
        );
        assert_eq!(match_comment("<!-->").length, 5);
        assert!(match_comment("<!-->").abrupt);
        assert_eq!(match_comment("<!--->").length, 6);
        assert!(match_comment("<!--->").abrupt);
        assert!(!match_comment("<!--x>").abrupt);
        assert_eq!(match_comment("<!- x"), CommentMatch::default());
    }

    #[test]
    fn test_match_doctype() {
        assert_eq!(match_doctype("<!DOCTYPE html>"), 15);
        assert_eq!(match_doctype("<!doctype html>\n"), 15);
        assert_eq!(match_doctype("<!DOCTYPE html"), 0);
        assert_eq!(match_doctype("<!DOC"), 0);
    }

    #[test]
    fn test_element_with_attribute() {
        assert_eq!(
            scan("<a href=\"x\">y</a>"),
            vec![
                (SymPunc, "<"),
                (MarkupTag, "a"),
                (MarkupAttr, "href"),
                (String, "\"x\""),
                (SymPunc, ">"),
                (SymPunc, "</"),
                (MarkupTag, "a"),
                (SymPunc, ">"),
            ]
        );
    }

    #[test]
    fn test_unquoted_and_boolean_attributes() {
        assert_eq!(
            scan("<input disabled value=foo>"),
            vec![
                (SymPunc, "<"),
                (MarkupTag, "input"),
                (MarkupAttr, "disabled"),
                (MarkupAttr, "value"),
                (String, "foo"),
                (SymPunc, ">"),
            ]
        );
    }

    #[test]
    fn test_attribute_value_references() {
        assert_eq!(
            scan("<a title='a&amp;b'>"),
            vec![
                (SymPunc, "<"),
                (MarkupTag, "a"),
                (MarkupAttr, "title"),
                (String, "'a"),
                (Escape, "&amp;"),
                (String, "b'"),
                (SymPunc, ">"),
            ]
        );
    }

    #[test]
    fn test_stray_markup_characters_are_text() {
        assert_eq!(scan("a < b && c"), vec![]);
        assert_eq!(scan("<"), vec![]);
        assert_eq!(scan("</ p>"), vec![]);
        assert_eq!(scan("<a href=\"open"), vec![]);
    }

    #[test]
    fn test_text_references() {
        assert_eq!(
            scan("Tom &amp; Jerry &#8212; &copy"),
            vec![(Escape, "&amp;"), (Escape, "&#8212;")]
        );
    }

    #[test]
    fn test_script_content_is_raw() {
        assert_eq!(
            scan("<script>if (a < b) { x = '</p>'; }</script>"),
            vec![
                (SymPunc, "<"),
                (MarkupTag, "script"),
                (SymPunc, ">"),
                (SymPunc, "</"),
                (MarkupTag, "script"),
                (SymPunc, ">"),
            ]
        );
    }

    #[test]
    fn test_raw_text_end_tag_is_case_insensitive() {
        let tokens = scan("<STYLE>a > b {}</style >");
        assert_eq!(tokens[1], (MarkupTag, "STYLE"));
        assert_eq!(tokens[4], (MarkupTag, "style"));
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_unclosed_script_runs_to_end() {
        assert_eq!(
            scan("<script>let a = '<b>';"),
            vec![(SymPunc, "<"), (MarkupTag, "script"), (SymPunc, ">")]
        );
    }

    #[test]
    fn test_textarea_content_keeps_references() {
        assert_eq!(
            scan("<textarea><b>&lt;</textarea>"),
            vec![
                (SymPunc, "<"),
                (MarkupTag, "textarea"),
                (SymPunc, ">"),
                (Escape, "&lt;"),
                (SymPunc, "</"),
                (MarkupTag, "textarea"),
                (SymPunc, ">"),
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            scan("<!-- a -- b -->"),
            vec![
                (CommentDelimiter, "<!--"),
                (Comment, " a -- b "),
                (CommentDelimiter, "-->"),
            ]
        );
        assert_eq!(
            scan("<!-- open"),
            vec![(CommentDelimiter, "<!--"), (Comment, " open")]
        );
        assert_eq!(scan("<!-->"), vec![(CommentDelimiter, "<!-->")]);
    }

    #[test]
    fn test_short_unterminated_comment_keeps_body() {
        assert_eq!(
            scan("<!--x>"),
            vec![(CommentDelimiter, "<!--"), (Comment, "x>")]
        );
        assert_eq!(
            scan("<!---x"),
            vec![(CommentDelimiter, "<!--"), (Comment, "-x")]
        );
    }

    #[test]
    fn test_doctype() {
        assert_eq!(
            scan("<!DOCTYPE html>"),
            vec![(Macro, "<!DOCTYPE"), (MarkupTag, "html"), (Macro, ">")]
        );
        assert_eq!(
            scan("<!doctype html public \"-//W3C//DTD HTML 4.01//EN\">"),
            vec![
                (Macro, "<!doctype"),
                (MarkupTag, "html"),
                (Keyword, "public"),
                (String, "\"-//W3C//DTD HTML 4.01//EN\""),
                (Macro, ">"),
            ]
        );
    }

    #[test]
    fn test_self_closing_and_void() {
        assert_eq!(
            scan("<br/><img src=a.png />"),
            vec![
                (SymPunc, "<"),
                (MarkupTag, "br"),
                (SymPunc, "/>"),
                (SymPunc, "<"),
                (MarkupTag, "img"),
                (MarkupAttr, "src"),
                (String, "a.png"),
                (SymPunc, "/>"),
            ]
        );
    }
}
