//! Filename-based language tagging.
//!
//! The book format carries no explicit language field, so the tag is derived
//! once per document from its file name. Best-effort by design: a file the
//! table doesn't recognize is simply untagged and only reachable without a
//! scope restriction.

/// The host's "no particular language" scope. Treated as no restriction,
/// same as an absent scope.
pub const GENERIC_SCOPE: &str = "plaintext";

/// Ordered substring hints. Longer hints precede their prefixes so
/// "javascript" never tags as "java".
const LANGUAGE_HINTS: &[(&str, &str)] = &[
    ("javascript", "javascript"),
    ("typescript", "typescript"),
    ("python", "python"),
    ("java", "java"),
    ("rust", "rust"),
    ("csharp", "csharp"),
    ("golang", "go"),
];

/// Derive a language tag from a document file name, if any hint matches.
pub fn detect_language(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_lowercase();
    LANGUAGE_HINTS
        .iter()
        .find(|(hint, _)| lower.contains(hint))
        .map(|(_, tag)| *tag)
}

/// Whether a caller-supplied scope actually restricts the candidate set.
pub fn is_restricting(scope: Option<&str>) -> bool {
    matches!(scope, Some(s) if s != GENERIC_SCOPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_python() {
        assert_eq!(detect_language("python_basics.json"), Some("python"));
        assert_eq!(detect_language("Learn-Python-3.json"), Some("python"));
    }

    #[test]
    fn test_detects_java() {
        assert_eq!(detect_language("java_collections.json"), Some("java"));
    }

    #[test]
    fn test_javascript_not_tagged_as_java() {
        assert_eq!(detect_language("javascript_dom.json"), Some("javascript"));
    }

    #[test]
    fn test_unrecognized_is_untagged() {
        assert_eq!(detect_language("cooking_for_two.json"), None);
    }

    #[test]
    fn test_generic_scope_does_not_restrict() {
        assert!(!is_restricting(None));
        assert!(!is_restricting(Some(GENERIC_SCOPE)));
        assert!(is_restricting(Some("java")));
    }
}
