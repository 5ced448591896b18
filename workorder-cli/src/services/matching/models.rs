use serde::Serialize;

/// How a free-text reference was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchType {
    Exact,    // Normalized forms are equal
    Contains, // Canonical entry contains the normalized input
}

/// Result of resolving one reference against a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    /// Resolved to a registry entry
    Canonical { name: String, match_type: MatchType },
    /// No entry matched; the input is kept as written
    Unmatched(String),
}

impl MatchOutcome {
    /// The resolved value (canonical name or original input)
    pub fn value(&self) -> &str {
        match self {
            MatchOutcome::Canonical { name, .. } => name,
            MatchOutcome::Unmatched(input) => input,
        }
    }

    /// Consume into the resolved value
    pub fn into_value(self) -> String {
        match self {
            MatchOutcome::Canonical { name, .. } => name,
            MatchOutcome::Unmatched(input) => input,
        }
    }

    /// Check if the input resolved to a registry entry
    pub fn is_canonical(&self) -> bool {
        matches!(self, MatchOutcome::Canonical { .. })
    }
}
