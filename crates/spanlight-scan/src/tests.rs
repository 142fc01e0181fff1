//! Cross-language properties of the scanning entry points.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{
    coalesce, highlight, highlight_named, HighlightError, HighlightOptions, HighlightType, Lang,
    Status, Token, TokenSink,
};

fn options(coalescing: bool, strict: bool) -> HighlightOptions {
    HighlightOptions { coalescing, strict }
}

fn run(
    source: &str,
    lang: Lang,
    options: HighlightOptions,
) -> (Result<(), HighlightError>, Vec<Token>) {
    let mut sink = TokenSink::new();
    let result = highlight(&mut sink, source, lang, options);
    (result, sink.into_vec())
}

/// Ordered, non-overlapping, non-empty, in bounds, on character boundaries.
fn assert_well_formed(source: &str, tokens: &[Token]) {
    let mut previous_end = 0;
    for token in tokens {
        assert!(token.length > 0, "empty token {token:?}");
        assert!(token.begin >= previous_end, "{token:?} overlaps {previous_end}");
        assert!(token.end() <= source.len(), "{token:?} out of bounds");
        assert!(source.is_char_boundary(token.begin), "{token:?} splits a character");
        assert!(source.is_char_boundary(token.end()), "{token:?} splits a character");
        previous_end = token.end();
    }
}

fn check_invariants(source: &str) {
    for lang in Lang::ALL {
        for strict in [false, true] {
            let (result, plain) = run(source, lang, options(false, strict));
            let (coalesced_result, coalesced) = run(source, lang, options(true, strict));

            assert!(
                !matches!(result, Err(HighlightError::BadState { .. })),
                "{lang} broke the token invariant on {source:?}"
            );
            if lang != Lang::Xml {
                assert_eq!(result, Ok(()), "{lang} rejected {source:?}");
            }
            assert_eq!(result, coalesced_result);

            assert_well_formed(source, &plain);
            assert_well_formed(source, &coalesced);
            assert!(coalesced.len() <= plain.len());
            assert_eq!(coalesce(plain.iter().copied()), coalesced);
        }
    }
}

fn markup_text() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"[<>/!?&#;=:"' a-zA-Z0-9\[\]\-\n]{0,64}"#).expect("valid regex")
}

fn code_text() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"[a-z0-9 .+*/\\'"`${}<>()\[\]#=:,;&xeEn_\n\r-]{0,64}"#)
        .expect("valid regex")
}

proptest! {
    #[test]
    fn prop_arbitrary_text_is_well_formed(source in any::<String>()) {
        check_invariants(&source);
    }

    #[test]
    fn prop_markup_text_is_well_formed(source in markup_text()) {
        check_invariants(&source);
    }

    #[test]
    fn prop_code_text_is_well_formed(source in code_text()) {
        check_invariants(&source);
    }

    #[test]
    fn prop_coalesce_is_idempotent(source in code_text()) {
        let (_, plain) = run(&source, Lang::JavaScript, options(false, false));
        let once = coalesce(plain);
        prop_assert_eq!(coalesce(once.iter().copied()), once);
    }
}

#[test]
fn test_empty_source_yields_no_tokens() {
    for lang in Lang::ALL {
        let (result, tokens) = run("", lang, HighlightOptions::default());
        assert_eq!(result, Ok(()));
        assert!(tokens.is_empty(), "{lang}");
    }
}

#[test]
fn test_tokens_append_to_existing_sink() {
    let mut sink = TokenSink::new();
    highlight(&mut sink, "1", Lang::C, HighlightOptions::default()).unwrap();
    highlight(&mut sink, "2", Lang::C, HighlightOptions::default()).unwrap();
    assert_eq!(
        sink.tokens(),
        &[
            Token::new(0, 1, HighlightType::Number),
            Token::new(0, 1, HighlightType::Number),
        ]
    );
}

#[test]
fn test_sink_reuse_across_languages() {
    let mut sink = TokenSink::new();
    let coalescing = options(true, false);
    highlight(&mut sink, "<a>x</a>", Lang::Html, coalescing).unwrap();
    let first = sink.len();
    assert_eq!(highlight(&mut sink, "<!-- c -->", Lang::Xml, coalescing), Ok(()));
    assert_eq!(highlight(&mut sink, "[1]", Lang::Json, coalescing), Ok(()));
    assert_eq!(sink.len(), first + 6);
    assert_well_formed("[1]", sink.current_scan());
}

#[test]
fn test_deeply_nested_input_is_total() {
    for source in ["`${".repeat(20_000), "<a>{".repeat(20_000), "{".repeat(20_000)] {
        for lang in [Lang::JavaScript, Lang::Html, Lang::C, Lang::Json] {
            let (result, tokens) = run(&source, lang, options(true, false));
            assert_eq!(result, Ok(()), "{lang}");
            assert_well_formed(&source, &tokens);
        }
    }
}

#[test]
fn test_malformed_xml_is_bad_code() {
    let mut sink = TokenSink::new();
    let result = highlight(&mut sink, "<a/> <", Lang::Xml, HighlightOptions::default());
    assert_eq!(result, Err(HighlightError::BadCode { lang: Lang::Xml }));
    assert_eq!(Status::from(&result), Status::BadCode);
    assert_eq!(
        sink.tokens().iter().map(|t| t.kind).collect::<Vec<_>>(),
        [HighlightType::SymPunc, HighlightType::MarkupTag, HighlightType::SymPunc]
    );
}

#[test]
fn test_html_never_rejects() {
    let (result, _) = run("<a/> <", Lang::Html, HighlightOptions::default());
    assert_eq!(result, Ok(()));
}

#[test]
fn test_highlight_named() {
    let mut sink = TokenSink::new();
    assert_eq!(
        highlight_named(&mut sink, "true", "JSON", HighlightOptions::default()),
        Ok(())
    );
    assert_eq!(sink.tokens(), &[Token::new(0, 4, HighlightType::Bool)]);
}

#[test]
fn test_unknown_language() {
    let mut sink = TokenSink::new();
    let result = highlight_named(&mut sink, "x", "cobol", HighlightOptions::default());
    assert_eq!(
        result,
        Err(HighlightError::BadLanguage {
            selector: "cobol".to_string()
        })
    );
    assert_eq!(Status::from(&result), Status::BadLanguage);
    assert!(sink.is_empty());
}

#[test]
fn test_status_codes() {
    assert_eq!(Status::from(&Ok::<(), HighlightError>(())), Status::Ok);
    assert_eq!(Status::Ok as u8, 0);
    assert_eq!(Status::BadCode as u8, 1);
    assert_eq!(Status::BadLanguage as u8, 2);
    assert_eq!(Status::BadState as u8, 3);
}

#[test]
fn test_error_messages() {
    let err = HighlightError::BadCode { lang: Lang::Xml };
    assert_eq!(err.to_string(), "xml source could not be fully highlighted");
    let err = HighlightError::BadLanguage {
        selector: "cobol".to_string(),
    };
    assert_eq!(err.to_string(), "unknown language: \"cobol\"");
}
