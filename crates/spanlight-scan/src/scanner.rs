use crate::token::{HighlightType, SinkMark, TokenSink};
use crate::HighlightOptions;

/// Cursor state shared by every language scanner.
///
/// Holds an immutable view of the source, the cursor, the sink and the
/// options. The source is never modified; scanning only moves `index`
/// forward (or back to a [`Checkpoint`] when an attempt fails).
///
/// A scanner may be bounded to a sub-range of the source so that embedded
/// regions (template substitutions, JSX expression containers) can be
/// highlighted by a nested scanner that emits into the same sink with
/// offsets relative to the whole source.
pub struct Scanner<'a, 's> {
    source: &'a str,
    index: usize,
    end: usize,
    sink: &'s mut TokenSink,
    options: HighlightOptions,
}

/// Position of a scanner and its sink, restored by [`Scanner::rollback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    index: usize,
    sink: SinkMark,
}

impl<'a, 's> Scanner<'a, 's> {
    pub fn new(sink: &'s mut TokenSink, source: &'a str, options: HighlightOptions) -> Self {
        Self {
            source,
            index: 0,
            end: source.len(),
            sink,
            options,
        }
    }

    /// A scanner over `source[begin..end]` that still reports absolute offsets.
    pub fn bounded(
        sink: &'s mut TokenSink,
        source: &'a str,
        begin: usize,
        end: usize,
        options: HighlightOptions,
    ) -> Self {
        debug_assert!(begin <= end && end <= source.len());
        Self {
            source,
            index: begin,
            end,
            sink,
            options,
        }
    }

    /// A nested scanner over `self.source[begin..end]` sharing this scanner's sink.
    pub fn nested(&mut self, begin: usize, end: usize) -> Scanner<'a, '_> {
        Scanner::bounded(&mut *self.sink, self.source, begin, end, self.options)
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn options(&self) -> HighlightOptions {
        self.options
    }

    /// The unconsumed part of the source.
    pub fn remainder(&self) -> &'a str {
        &self.source[self.index..self.end]
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.end
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.remainder().starts_with(prefix)
    }

    pub fn peek(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    /// The character before the cursor, if any.
    pub fn previous(&self) -> Option<char> {
        self.source[..self.index].chars().next_back()
    }

    pub fn advance(&mut self, length: usize) {
        debug_assert!(self.index + length <= self.end);
        self.index += length;
    }

    /// Record a token. Respects the coalescing option; drops empty spans.
    pub fn emit(&mut self, begin: usize, length: usize, kind: HighlightType) {
        debug_assert!(begin + length <= self.end);
        if self.options.coalescing {
            self.sink.emit_coalescing(begin, length, kind);
        } else {
            self.sink.emit(begin, length, kind);
        }
    }

    /// Emit `length` bytes at the cursor as `kind` and move past them.
    pub fn emit_and_advance(&mut self, length: usize, kind: HighlightType) {
        self.emit(self.index, length, kind);
        self.advance(length);
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            index: self.index,
            sink: self.sink.mark(),
        }
    }

    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.index = checkpoint.index;
        self.sink.rollback(checkpoint.sink);
    }

    /// Report that nothing matched at the cursor; always returns `false`.
    pub fn unmatched(&self, language: &'static str) -> bool {
        tracing::trace!(
            language,
            index = self.index,
            next = ?self.peek(),
            "no construct matches, aborting scan"
        );
        false
    }
}

/// A language scanner built around a [`Scanner`].
pub trait Highlighter<'a, 's>: Sized {
    fn scanner(&mut self) -> &mut Scanner<'a, 's>;

    /// Run `construct` transactionally: if it returns `false`, the cursor
    /// and the sink are restored to where they were before the attempt.
    fn attempt(&mut self, construct: impl FnOnce(&mut Self) -> bool) -> bool {
        let checkpoint = self.scanner().checkpoint();
        if construct(self) {
            return true;
        }
        self.scanner().rollback(checkpoint);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    struct Probe<'a, 's> {
        s: Scanner<'a, 's>,
    }

    impl<'a, 's> Highlighter<'a, 's> for Probe<'a, 's> {
        fn scanner(&mut self) -> &mut Scanner<'a, 's> {
            &mut self.s
        }
    }

    #[test]
    fn test_emit_and_advance() {
        let mut sink = TokenSink::new();
        let mut s = Scanner::new(&mut sink, "<a>", HighlightOptions::default());
        s.emit_and_advance(1, HighlightType::SymPunc);
        assert_eq!(s.remainder(), "a>");
        assert_eq!(s.index(), 1);
        assert_eq!(s.previous(), Some('<'));
        assert_eq!(sink.tokens(), &[Token::new(0, 1, HighlightType::SymPunc)]);
    }

    #[test]
    fn test_failed_attempt_rolls_back() {
        let mut sink = TokenSink::new();
        let mut probe = Probe {
            s: Scanner::new(&mut sink, "abc", HighlightOptions::default()),
        };
        let matched = probe.attempt(|p| {
            p.s.emit_and_advance(2, HighlightType::Identifier);
            false
        });
        assert!(!matched);
        assert_eq!(probe.s.index(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_successful_attempt_commits() {
        let mut sink = TokenSink::new();
        let mut probe = Probe {
            s: Scanner::new(&mut sink, "abc", HighlightOptions::default()),
        };
        assert!(probe.attempt(|p| {
            p.s.emit_and_advance(3, HighlightType::Identifier);
            true
        }));
        assert!(probe.s.is_at_end());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_bounded_scanner_uses_absolute_offsets() {
        let mut sink = TokenSink::new();
        let mut s = Scanner::bounded(&mut sink, "ab(cd)ef", 3, 5, HighlightOptions::default());
        assert_eq!(s.remainder(), "cd");
        s.emit_and_advance(2, HighlightType::Identifier);
        assert!(s.is_at_end());
        assert_eq!(sink.tokens(), &[Token::new(3, 2, HighlightType::Identifier)]);
    }

    #[test]
    fn test_coalescing_option_is_honored() {
        let mut sink = TokenSink::new();
        let options = HighlightOptions {
            coalescing: true,
            strict: false,
        };
        let mut s = Scanner::new(&mut sink, "''", options);
        s.emit_and_advance(1, HighlightType::String);
        s.emit_and_advance(1, HighlightType::String);
        assert_eq!(sink.tokens(), &[Token::new(0, 2, HighlightType::String)]);
    }
}
