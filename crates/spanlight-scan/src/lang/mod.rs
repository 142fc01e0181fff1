//! Per-language scanners and the table that dispatches to them.
//!
//! Every scanner exposes a function with the [`ScanFn`] signature. Adding a
//! language means adding a [`Lang`] variant, its selector names, and one
//! conforming function.

pub mod c;
pub mod html;
pub mod js;
pub mod json;
pub mod xml;

use std::str::FromStr;

use crate::token::TokenSink;
use crate::HighlightOptions;

/// Uniform signature of a language scanner: `true` if the whole source was
/// consumed under the language's grammar.
pub type ScanFn = fn(&mut TokenSink, &str, &HighlightOptions) -> bool;

/// The closed set of supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lang {
    Xml,
    Html,
    C,
    Cpp,
    JavaScript,
    Json,
}

impl Lang {
    pub const ALL: [Lang; 6] = [
        Lang::Xml,
        Lang::Html,
        Lang::C,
        Lang::Cpp,
        Lang::JavaScript,
        Lang::Json,
    ];

    pub fn all() -> &'static [Lang] {
        &Self::ALL
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Lang::Xml => "xml",
            Lang::Html => "html",
            Lang::C => "c",
            Lang::Cpp => "cpp",
            Lang::JavaScript => "javascript",
            Lang::Json => "json",
        }
    }

    /// Selector names accepted by [`Lang::from_str`]; also used as file extensions.
    pub fn selectors(self) -> &'static [&'static str] {
        match self {
            Lang::Xml => &["xml", "svg", "xsd", "xsl", "xslt", "rss", "atom"],
            Lang::Html => &["html", "htm", "xhtml"],
            Lang::C => &["c", "h"],
            Lang::Cpp => &["cpp", "c++", "cxx", "cc", "hpp", "hxx", "hh"],
            Lang::JavaScript => &["js", "javascript", "mjs", "cjs", "jsx"],
            Lang::Json => &["json", "jsonc"],
        }
    }

    /// Resolve a language from a file extension (without the dot).
    pub fn from_extension(extension: &str) -> Option<Lang> {
        extension.parse().ok()
    }

    /// The scanner entry point for this language.
    pub fn scanner(self) -> ScanFn {
        match self {
            Lang::Xml => xml::highlight_xml,
            Lang::Html => html::highlight_html,
            Lang::C => c::highlight_c,
            Lang::Cpp => c::highlight_cpp,
            Lang::JavaScript => js::highlight_javascript,
            Lang::Json => json::highlight_json,
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a selector names no supported language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language: {0:?}")]
pub struct UnknownLang(pub String);

impl FromStr for Lang {
    type Err = UnknownLang;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        Lang::ALL
            .into_iter()
            .find(|lang| {
                lang.selectors()
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(selector))
            })
            .ok_or_else(|| UnknownLang(selector.to_string()))
    }
}
