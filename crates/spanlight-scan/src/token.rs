/// Semantic category of a highlighted span.
///
/// The set is closed and the discriminants are stable: renderers and the
/// WASM surface rely on both the numeric value and the short id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum HighlightType {
    Error = 0,

    // Comments
    Comment = 1,
    CommentDelimiter = 2,

    // Keywords
    Keyword = 3,
    KeywordControl = 4,
    KeywordType = 5,
    KeywordOp = 6,

    // Names and values
    Identifier = 7,
    Bool = 8,
    Null = 9,
    Number = 10,
    NumberDecor = 11,
    String = 12,
    Escape = 13,
    Macro = 14,

    // Symbols
    SymPunc = 15,
    SymOp = 16,
    SymBrace = 17,
    SymParens = 18,
    SymSquare = 19,

    // Markup
    MarkupTag = 20,
    MarkupAttr = 21,
}

impl HighlightType {
    pub const ALL: [HighlightType; 22] = [
        Self::Error,
        Self::Comment,
        Self::CommentDelimiter,
        Self::Keyword,
        Self::KeywordControl,
        Self::KeywordType,
        Self::KeywordOp,
        Self::Identifier,
        Self::Bool,
        Self::Null,
        Self::Number,
        Self::NumberDecor,
        Self::String,
        Self::Escape,
        Self::Macro,
        Self::SymPunc,
        Self::SymOp,
        Self::SymBrace,
        Self::SymParens,
        Self::SymSquare,
        Self::MarkupTag,
        Self::MarkupAttr,
    ];

    /// Short, stable identifier used by renderers (e.g. as a CSS hook).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "err",
            Self::Comment => "cmt",
            Self::CommentDelimiter => "cmt_dlim",
            Self::Keyword => "kw",
            Self::KeywordControl => "kw_ctrl",
            Self::KeywordType => "kw_type",
            Self::KeywordOp => "kw_op",
            Self::Identifier => "id",
            Self::Bool => "bool",
            Self::Null => "null",
            Self::Number => "num",
            Self::NumberDecor => "num_deco",
            Self::String => "str",
            Self::Escape => "esc",
            Self::Macro => "macro",
            Self::SymPunc => "sym_punc",
            Self::SymOp => "sym_op",
            Self::SymBrace => "sym_brac",
            Self::SymParens => "sym_par",
            Self::SymSquare => "sym_sqr",
            Self::MarkupTag => "tag",
            Self::MarkupAttr => "attr",
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }
}

impl std::fmt::Display for HighlightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for HighlightType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A highlighted span: `length` bytes starting at byte offset `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    pub begin: usize,
    pub length: usize,
    pub kind: HighlightType,
}

impl Token {
    pub fn new(begin: usize, length: usize, kind: HighlightType) -> Self {
        Self {
            begin,
            length,
            kind,
        }
    }

    pub fn end(&self) -> usize {
        self.begin + self.length
    }

    /// The source text covered by this token.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.begin..self.end()]
    }
}

/// Snapshot of a sink, restored by [`TokenSink::rollback`].
///
/// Coalescing may grow the last token in place, so its length is part of
/// the snapshot alongside the token count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkMark {
    len: usize,
    last_length: Option<usize>,
}

/// Append-only, caller-owned token buffer.
///
/// Within one scan, tokens must arrive in order and must not overlap.
/// Zero-length emissions are dropped. An out-of-order emission is a scanner
/// bug: it trips a debug assertion and, in release builds, poisons the sink
/// instead of storing a token that would break the ordering invariant.
///
/// A sink may collect several scans in a row. [`TokenSink::start_scan`]
/// opens a new one, after which offsets restart at 0 and tokens from earlier
/// scans are neither compared against nor merged with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSink {
    tokens: Vec<Token>,
    scan_start: usize,
    poisoned: bool,
}

impl TokenSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
            scan_start: 0,
            poisoned: false,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.scan_start = 0;
        self.poisoned = false;
    }

    /// Begin a new scan: later tokens are ordered relative to each other
    /// only, and the poisoned flag is cleared.
    pub fn start_scan(&mut self) {
        self.scan_start = self.tokens.len();
        self.poisoned = false;
    }

    /// Tokens emitted since the last [`TokenSink::start_scan`].
    pub fn current_scan(&self) -> &[Token] {
        &self.tokens[self.scan_start..]
    }

    /// Whether an emission in the current scan violated the ordering
    /// invariant.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Append a token without merging.
    pub fn emit(&mut self, begin: usize, length: usize, kind: HighlightType) {
        if self.accepts(begin, length) {
            self.tokens.push(Token::new(begin, length, kind));
        }
    }

    /// Append a token, or extend the previous one if it has the same kind
    /// and ends exactly at `begin`.
    pub fn emit_coalescing(&mut self, begin: usize, length: usize, kind: HighlightType) {
        if !self.accepts(begin, length) {
            return;
        }
        match self.tokens[self.scan_start..].last_mut() {
            Some(last) if last.kind == kind && last.end() == begin => last.length += length,
            _ => self.tokens.push(Token::new(begin, length, kind)),
        }
    }

    pub fn mark(&self) -> SinkMark {
        SinkMark {
            len: self.tokens.len(),
            last_length: self.tokens.last().map(|t| t.length),
        }
    }

    /// Discard everything emitted since `mark` was taken.
    pub fn rollback(&mut self, mark: SinkMark) {
        self.tokens.truncate(mark.len);
        self.scan_start = self.scan_start.min(mark.len);
        if let (Some(last), Some(length)) = (self.tokens.last_mut(), mark.last_length) {
            last.length = length;
        }
    }

    fn accepts(&mut self, begin: usize, length: usize) -> bool {
        if length == 0 {
            return false;
        }
        let previous_end = self.current_scan().last().map_or(0, Token::end);
        let in_order = begin >= previous_end;
        debug_assert!(
            in_order,
            "token at {begin} overlaps previous token ending at {previous_end}"
        );
        if !in_order {
            self.poisoned = true;
        }
        in_order
    }
}

impl<'a> IntoIterator for &'a TokenSink {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Apply the streaming merge to an existing, ordered token sequence.
pub fn coalesce(tokens: impl IntoIterator<Item = Token>) -> Vec<Token> {
    let mut sink = TokenSink::new();
    for token in tokens {
        sink.emit_coalescing(token.begin, token.length, token.kind);
    }
    sink.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_appends() {
        let mut sink = TokenSink::new();
        sink.emit(0, 1, HighlightType::SymPunc);
        sink.emit(1, 1, HighlightType::SymPunc);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_new_scan_restarts_offsets() {
        let mut sink = TokenSink::new();
        sink.emit(0, 3, HighlightType::Number);
        sink.start_scan();
        sink.emit(0, 1, HighlightType::Number);
        assert!(!sink.is_poisoned());
        assert_eq!(
            sink.tokens(),
            &[
                Token::new(0, 3, HighlightType::Number),
                Token::new(0, 1, HighlightType::Number),
            ]
        );
        assert_eq!(sink.current_scan(), &[Token::new(0, 1, HighlightType::Number)]);
    }

    #[test]
    fn test_coalescing_stops_at_scan_boundary() {
        let mut sink = TokenSink::new();
        sink.emit_coalescing(0, 2, HighlightType::String);
        sink.start_scan();
        sink.emit_coalescing(2, 1, HighlightType::String);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_new_scan_clears_poison() {
        let mut sink = TokenSink {
            poisoned: true,
            ..TokenSink::new()
        };
        sink.start_scan();
        assert!(!sink.is_poisoned());
    }

    #[test]
    fn test_zero_length_dropped() {
        let mut sink = TokenSink::new();
        sink.emit(3, 0, HighlightType::String);
        sink.emit_coalescing(3, 0, HighlightType::String);
        assert!(sink.is_empty());
        assert!(!sink.is_poisoned());
    }

    #[test]
    fn test_coalescing_merges_contiguous_same_kind() {
        let mut sink = TokenSink::new();
        sink.emit_coalescing(0, 2, HighlightType::String);
        sink.emit_coalescing(2, 3, HighlightType::String);
        assert_eq!(sink.tokens(), &[Token::new(0, 5, HighlightType::String)]);
    }

    #[test]
    fn test_coalescing_keeps_gaps_and_kinds_apart() {
        let mut sink = TokenSink::new();
        sink.emit_coalescing(0, 2, HighlightType::String);
        sink.emit_coalescing(3, 1, HighlightType::String);
        sink.emit_coalescing(4, 1, HighlightType::Escape);
        assert_eq!(
            sink.tokens(),
            &[
                Token::new(0, 2, HighlightType::String),
                Token::new(3, 1, HighlightType::String),
                Token::new(4, 1, HighlightType::Escape),
            ]
        );
    }

    #[test]
    fn test_rollback_restores_coalesced_length() {
        let mut sink = TokenSink::new();
        sink.emit_coalescing(0, 2, HighlightType::Comment);
        let mark = sink.mark();
        sink.emit_coalescing(2, 4, HighlightType::Comment);
        sink.emit_coalescing(6, 1, HighlightType::SymPunc);
        sink.rollback(mark);
        assert_eq!(sink.tokens(), &[Token::new(0, 2, HighlightType::Comment)]);
    }

    #[test]
    fn test_rollback_to_empty() {
        let mut sink = TokenSink::new();
        let mark = sink.mark();
        sink.emit(0, 2, HighlightType::Comment);
        sink.rollback(mark);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_coalesce_is_idempotent() {
        let tokens = vec![
            Token::new(0, 1, HighlightType::SymPunc),
            Token::new(1, 1, HighlightType::SymPunc),
            Token::new(3, 2, HighlightType::String),
        ];
        let once = coalesce(tokens.clone());
        assert_eq!(once.len(), 2);
        assert_eq!(coalesce(once.clone()), once);
    }

    #[test]
    fn test_highlight_type_ids_round_trip() {
        for (i, kind) in HighlightType::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, i);
            assert_eq!(HighlightType::from_u8(*kind as u8), Some(*kind));
        }
        assert_eq!(HighlightType::from_u8(200), None);
    }

    #[test]
    fn test_token_text() {
        let token = Token::new(1, 3, HighlightType::MarkupTag);
        assert_eq!(token.text("<abc>"), "abc");
        assert_eq!(token.end(), 4);
    }
}
