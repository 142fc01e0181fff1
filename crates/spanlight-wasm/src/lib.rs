//! WASM bindings for the spanlight highlighting engine.
//!
//! Exposes `highlight()` and `highlight_flat()` to JavaScript via
//! wasm-bindgen. Both throw a JS error if the language is unknown or the
//! source cannot be fully highlighted.

use serde::Serialize;
use spanlight_scan::{HighlightError, HighlightOptions, Lang, Token, TokenSink};
use wasm_bindgen::prelude::*;

/// Result object handed to JavaScript.
#[derive(Debug, Serialize)]
struct Highlighted<'a> {
    lang: Lang,
    tokens: &'a [Token],
}

fn scan(
    source: &str,
    lang: &str,
    coalescing: bool,
    strict: bool,
) -> Result<(Lang, TokenSink), HighlightError> {
    let lang: Lang = lang.parse()?;
    let mut sink = TokenSink::new();
    let options = HighlightOptions { coalescing, strict };
    spanlight_scan::highlight(&mut sink, source, lang, options)?;
    Ok((lang, sink))
}

/// Highlight `source` as `lang` (a selector such as `"xml"` or `"c++"`).
///
/// Returns `{ lang: string, tokens: [{ begin, length, kind }] }` where
/// `begin` and `length` are UTF-8 byte offsets and `kind` is the short
/// type id (`"kw"`, `"str"`, ...).
#[wasm_bindgen]
pub fn highlight(
    source: &str,
    lang: &str,
    coalescing: bool,
    strict: bool,
) -> Result<JsValue, JsError> {
    let (lang, sink) =
        scan(source, lang, coalescing, strict).map_err(|e| JsError::new(&e.to_string()))?;

    let result = Highlighted {
        lang,
        tokens: sink.tokens(),
    };
    serde_wasm_bindgen::to_value(&result).map_err(|e| JsError::new(&e.to_string()))
}

/// Like [`highlight`], but returns a flat `Uint32Array` of
/// `[begin, length, kind, ...]` triples, `kind` being the numeric type id.
#[wasm_bindgen]
pub fn highlight_flat(
    source: &str,
    lang: &str,
    coalescing: bool,
    strict: bool,
) -> Result<js_sys::Uint32Array, JsError> {
    let (_, sink) =
        scan(source, lang, coalescing, strict).map_err(|e| JsError::new(&e.to_string()))?;
    let flat = flatten(sink.tokens()).ok_or_else(|| JsError::new("source too large"))?;
    Ok(js_sys::Uint32Array::from(flat.as_slice()))
}

/// `[begin, length, kind]` per token, or `None` if an offset exceeds `u32`.
fn flatten(tokens: &[Token]) -> Option<Vec<u32>> {
    let mut flat = Vec::with_capacity(tokens.len() * 3);
    for token in tokens {
        flat.push(u32::try_from(token.begin).ok()?);
        flat.push(u32::try_from(token.length).ok()?);
        flat.push(u32::from(token.kind as u8));
    }
    Some(flat)
}

/// Get the engine version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
