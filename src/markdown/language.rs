//! Fence language classification and the registry of custom block languages.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// `language-xxx` marker inside a class attribute.
static LANGUAGE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)language-(\S+)").unwrap());

// =============================================================================
// Class Sources
// =============================================================================

/// Class information as handed over by the markdown parser.
///
/// Parsers disagree on whether a class is a single string or a list of
/// tokens; both are joined with spaces before matching.
pub trait ClassSource {
    fn joined(&self) -> Cow<'_, str>;
}

impl ClassSource for str {
    fn joined(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl ClassSource for String {
    fn joined(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<S: AsRef<str>> ClassSource for [S] {
    fn joined(&self) -> Cow<'_, str> {
        Cow::Owned(
            self.iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

impl<S: AsRef<str>> ClassSource for Vec<S> {
    fn joined(&self) -> Cow<'_, str> {
        self.as_slice().joined()
    }
}

/// Extract the fence language from class information.
///
/// Returns `None` when no `language-` marker is present.
pub fn classify<C: ClassSource + ?Sized>(class: &C) -> Option<String> {
    let joined = class.joined();
    LANGUAGE_CLASS
        .captures(&joined)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// =============================================================================
// Language Tag Registry
// =============================================================================

/// A classified fence language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageTag {
    Mermaid,
    StatBlock,
    Timeline,
    ComparisonTable,
    ProgressBar,
    /// Anything else: handed to the syntax highlighter, or shown plain.
    Other(String),
}

impl LanguageTag {
    /// Tags rendered by this crate instead of the syntax highlighter.
    pub const CUSTOM: [Self; 5] = [
        Self::Mermaid,
        Self::StatBlock,
        Self::Timeline,
        Self::ComparisonTable,
        Self::ProgressBar,
    ];

    pub fn from_tag(tag: &str) -> Self {
        Self::CUSTOM
            .into_iter()
            .find(|custom| custom.as_str() == tag)
            .unwrap_or_else(|| Self::Other(tag.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Mermaid => "mermaid",
            Self::StatBlock => "stat-block",
            Self::Timeline => "timeline",
            Self::ComparisonTable => "comparison-table",
            Self::ProgressBar => "progress-bar",
            Self::Other(tag) => tag,
        }
    }

    /// Whether this tag renders as a self-contained card.
    pub fn is_custom(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn is_infographic(&self) -> bool {
        self.is_custom() && *self != Self::Mermaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_single_string() {
        assert_eq!(classify("language-rust"), Some("rust".to_string()));
        assert_eq!(classify("hljs language-stat-block"), Some("stat-block".to_string()));
    }

    #[test]
    fn test_classify_token_list() {
        let tokens = vec!["code", "language-comparison-table"];
        assert_eq!(classify(&tokens), Some("comparison-table".to_string()));
        let owned = vec!["language-mermaid".to_string()];
        assert_eq!(classify(&owned), Some("mermaid".to_string()));
    }

    #[test]
    fn test_classify_no_language() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("highlight"), None);
        assert_eq!(classify("no-language-here"), None);
        let empty: Vec<String> = Vec::new();
        assert_eq!(classify(&empty), None);
    }

    #[test]
    fn test_registry_round_trip() {
        for tag in ["mermaid", "stat-block", "timeline", "comparison-table", "progress-bar"] {
            let lang = LanguageTag::from_tag(tag);
            assert!(lang.is_custom());
            assert_eq!(lang.as_str(), tag);
        }
        assert_eq!(LanguageTag::CUSTOM.map(|lang| lang.is_custom()), [true; 5]);
    }

    #[test]
    fn test_other_tags() {
        let lang = LanguageTag::from_tag("brainfudge");
        assert_eq!(lang, LanguageTag::Other("brainfudge".to_string()));
        assert!(!lang.is_custom());
        assert!(!LanguageTag::Mermaid.is_infographic());
        assert!(LanguageTag::Timeline.is_infographic());
    }
}
