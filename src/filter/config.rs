//! Filter Translation Configuration
//!
//! How clauses for the same field combine, and limits on untrusted input.

use serde::{Deserialize, Serialize};

/// How a second operator clause on the same field is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseMerge {
    /// Last clause wins: `{"age": {"gt": 5, "lt": 10}}` → `{"age": {"$lt": 10}}`
    #[default]
    Replace,
    /// Clauses share one object: `{"age": {"$gt": 5, "$lt": 10}}`
    Combine,
}

/// Filter translation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Same-field clause policy (default: "replace")
    #[serde(default)]
    pub clause_merge: ClauseMerge,

    /// Maximum element count of an `in` list (default: 1000)
    #[serde(default = "default_max_in_values")]
    pub max_in_values: usize,
}

fn default_max_in_values() -> usize {
    1000
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            clause_merge: ClauseMerge::default(),
            max_in_values: default_max_in_values(),
        }
    }
}

impl FilterConfig {
    /// Create a config with the given merge policy
    pub fn with_merge(clause_merge: ClauseMerge) -> Self {
        Self {
            clause_merge,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.clause_merge, ClauseMerge::Replace);
        assert_eq!(config.max_in_values, 1000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FilterConfig = serde_json::from_str(r#"{"clause_merge": "combine"}"#).unwrap();
        assert_eq!(config.clause_merge, ClauseMerge::Combine);
        assert_eq!(config.max_in_values, 1000);

        let config: FilterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn test_with_merge() {
        let config = FilterConfig::with_merge(ClauseMerge::Combine);
        assert_eq!(config.clause_merge, ClauseMerge::Combine);
        assert_eq!(config.max_in_values, 1000);
    }
}
