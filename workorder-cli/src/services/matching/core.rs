//! Core name-matching functions
//! Resolution is first-match-wins in registry order

use super::models::{MatchOutcome, MatchType};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Decompose to NFD and drop combining marks ("Muñoz" -> "Munoz")
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize a person or service name for comparison.
///
/// Accents are stripped, text is lowercased, punctuation is removed and
/// whitespace collapsed: `"Pérez, J."` -> `"perez j"`.
pub fn normalize_name(text: &str) -> String {
    let folded: String = strip_accents(text)
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() {
                Some(' ')
            } else {
                // Punctuation joins its neighbours ("O'Brien" -> "obrien")
                None
            }
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Precomputed (normalized, original) registry entries
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: Vec<(String, String)>,
}

impl NameIndex {
    /// Build an index over a canonical registry, preserving its order.
    /// Blank entries are skipped.
    pub fn new<I, S>(canonical: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = canonical
            .into_iter()
            .filter_map(|name| {
                let original = name.as_ref().trim();
                let normalized = normalize_name(original);
                if normalized.is_empty() {
                    None
                } else {
                    Some((normalized, original.to_string()))
                }
            })
            .collect();

        NameIndex { entries }
    }

    /// Number of registry entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose normalized form contains the normalized input
    pub fn match_name_info(&self, input: &str) -> MatchOutcome {
        let needle = normalize_name(input);
        if needle.is_empty() {
            return MatchOutcome::Unmatched(input.to_string());
        }

        self.entries
            .iter()
            .find(|(normalized, _)| normalized.contains(&needle))
            .map(|(_, original)| MatchOutcome::Canonical {
                name: original.clone(),
                match_type: MatchType::Contains,
            })
            .unwrap_or_else(|| MatchOutcome::Unmatched(input.trim().to_string()))
    }

    /// First entry whose normalized form equals the normalized input
    pub fn match_exact_info(&self, input: &str) -> MatchOutcome {
        let needle = normalize_name(input);
        if needle.is_empty() {
            return MatchOutcome::Unmatched(input.to_string());
        }

        self.entries
            .iter()
            .find(|(normalized, _)| *normalized == needle)
            .map(|(_, original)| MatchOutcome::Canonical {
                name: original.clone(),
                match_type: MatchType::Exact,
            })
            .unwrap_or_else(|| MatchOutcome::Unmatched(input.trim().to_string()))
    }

    /// Split on `,` or `;` and resolve each token independently, keeping order
    pub fn match_list_info(&self, input: &str) -> Vec<MatchOutcome> {
        input
            .split([',', ';'])
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| self.match_name_info(token))
            .collect()
    }
}

// Plain-string shorthands used by tests
#[cfg(test)]
impl NameIndex {
    /// Canonical name for a fuzzy reference, or the input as written
    pub fn match_name(&self, input: &str) -> String {
        self.match_name_info(input).into_value()
    }

    /// Canonical name for an exact reference, or the input as written
    pub fn match_exact(&self, input: &str) -> String {
        self.match_exact_info(input).into_value()
    }

    /// Canonical names for a delimited list of references
    pub fn match_list(&self, input: &str) -> Vec<String> {
        self.match_list_info(input)
            .into_iter()
            .map(MatchOutcome::into_value)
            .collect()
    }
}
