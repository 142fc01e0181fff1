//! spanlight scanning engine
//!
//! Classifies byte ranges of source text for syntax highlighting. Given a
//! source string and a language, a hand-written scanner walks the text once
//! and appends `(begin, length, type)` tokens to a caller-owned
//! [`TokenSink`]. Tokens are ordered and never overlap; text that needs no
//! highlighting (plain markup content, insignificant whitespace) is left as
//! a gap.
//!
//! # Example
//!
//! ```
//! use spanlight_scan::{highlight, HighlightOptions, HighlightType, Lang, TokenSink};
//!
//! let mut sink = TokenSink::new();
//! highlight(&mut sink, "<br/>", Lang::Xml, HighlightOptions::default()).unwrap();
//! let kinds: Vec<_> = sink.tokens().iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [HighlightType::SymPunc, HighlightType::MarkupTag, HighlightType::SymPunc]
//! );
//! ```

pub mod chars;
pub mod lang;
pub mod scanner;
pub mod token;

#[cfg(test)]
mod tests;

pub use lang::{Lang, ScanFn, UnknownLang};
pub use token::{coalesce, HighlightType, Token, TokenSink};

/// Behavior toggles for a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Merge adjacent, contiguous tokens of the same type as they are emitted.
    pub coalescing: bool,
    /// Only recognize the canonical grammar: no extension keywords, no
    /// constructs borrowed from related languages (JSX, JSON comments).
    pub strict: bool,
}

/// Outcome of a scan as a plain code, for callers across FFI/WASM boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    BadCode = 1,
    BadLanguage = 2,
    BadState = 3,
}

/// Why a scan did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HighlightError {
    /// The source could not be fully tokenized under the language's grammar.
    /// The sink holds the tokens emitted before the offending construct.
    #[error("{lang} source could not be fully highlighted")]
    BadCode { lang: Lang },

    #[error("unknown language: {selector:?}")]
    BadLanguage { selector: String },

    /// A scanner violated the token ordering invariant. Always a bug.
    #[error("internal error while highlighting {lang}: token invariant violated")]
    BadState { lang: Lang },
}

impl HighlightError {
    pub fn status(&self) -> Status {
        match self {
            HighlightError::BadCode { .. } => Status::BadCode,
            HighlightError::BadLanguage { .. } => Status::BadLanguage,
            HighlightError::BadState { .. } => Status::BadState,
        }
    }
}

impl From<UnknownLang> for HighlightError {
    fn from(err: UnknownLang) -> Self {
        HighlightError::BadLanguage { selector: err.0 }
    }
}

impl From<&Result<(), HighlightError>> for Status {
    fn from(result: &Result<(), HighlightError>) -> Self {
        match result {
            Ok(()) => Status::Ok,
            Err(err) => err.status(),
        }
    }
}

/// Highlight `source` as `lang`, appending tokens to `sink`.
///
/// Each call is a separate scan: offsets of the new tokens start at 0 for
/// `source`, whatever the sink already holds.
#[tracing::instrument(level = "debug", skip_all, fields(%lang, len = source.len()))]
pub fn highlight(
    sink: &mut TokenSink,
    source: &str,
    lang: Lang,
    options: HighlightOptions,
) -> Result<(), HighlightError> {
    sink.start_scan();
    let completed = (lang.scanner())(sink, source, &options);

    if sink.is_poisoned() {
        tracing::error!("scanner emitted out-of-order tokens");
        return Err(HighlightError::BadState { lang });
    }
    tracing::debug!(completed, tokens = sink.current_scan().len(), "scan finished");
    if completed {
        Ok(())
    } else {
        Err(HighlightError::BadCode { lang })
    }
}

/// Like [`highlight`], but resolves the language from a selector such as
/// `"xml"`, `"c++"` or a file extension.
pub fn highlight_named(
    sink: &mut TokenSink,
    source: &str,
    selector: &str,
    options: HighlightOptions,
) -> Result<(), HighlightError> {
    let lang: Lang = selector.parse()?;
    highlight(sink, source, lang, options)
}
