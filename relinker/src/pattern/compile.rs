//! Compilation of classified names into entry name predicates.

use regex::Regex;
use tracing::warn;

use super::classify::PatternKind;

/// Matcher for directory entry names.
#[derive(Debug, Clone)]
pub enum NamePredicate {
    /// Case-sensitive exact name match.
    Exact(String),
    /// Token pattern: literal prefix, digits, literal suffix.
    Pattern {
        /// Name with the token still in place.
        template: String,
        /// Kind of token that was expanded.
        kind: PatternKind,
        /// Anchored expression for the expanded name.
        regex: Regex,
    },
}

impl NamePredicate {
    /// Compile a desired name for the given pattern kind.
    ///
    /// UDIM tokens expand to exactly four ASCII digits, sequence tokens to
    /// one or more. When the token is missing the predicate falls back to
    /// an exact match.
    pub fn compile(desired_name: &str, pattern: PatternKind) -> Self {
        let Some((idx, token)) = pattern.find_token(desired_name) else {
            return NamePredicate::Exact(desired_name.to_string());
        };

        let prefix = &desired_name[..idx];
        let suffix = &desired_name[idx + token.len()..];
        let digits = match pattern {
            PatternKind::Udim => "[0-9]{4}",
            _ => "[0-9]+",
        };
        let expr = format!(
            "^{}{}{}$",
            regex::escape(prefix),
            digits,
            regex::escape(suffix)
        );

        match Regex::new(&expr) {
            Ok(regex) => NamePredicate::Pattern {
                template: desired_name.to_string(),
                kind: pattern,
                regex,
            },
            Err(e) => {
                warn!(name = desired_name, error = %e, "Pattern compile failed, using exact match");
                NamePredicate::Exact(desired_name.to_string())
            }
        }
    }

    /// Whether the entry name satisfies this predicate.
    pub fn matches(&self, entry_name: &str) -> bool {
        match self {
            NamePredicate::Exact(name) => name == entry_name,
            NamePredicate::Pattern { regex, .. } => regex.is_match(entry_name),
        }
    }

    /// Whether this predicate expands a token.
    pub fn is_pattern(&self) -> bool {
        matches!(self, NamePredicate::Pattern { .. })
    }

    /// Name this predicate was compiled from.
    pub fn desired_name(&self) -> &str {
        match self {
            NamePredicate::Exact(name) => name,
            NamePredicate::Pattern { template, .. } => template,
        }
    }
}
