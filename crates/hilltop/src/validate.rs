//! Holder-name validation.
//!
//! A proposed name is trimmed, then checked for emptiness, length, and
//! profanity. Profanity detection is a pluggable predicate so deployments
//! can swap in whatever filter they already use.

use std::collections::HashSet;
use std::sync::Arc;

/// Reason a proposed holder name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameRejection {
    #[error("name cannot be empty")]
    Empty,

    #[error("name cannot exceed {max} characters")]
    TooLong { max: usize },

    #[error("name contains inappropriate language")]
    Profane,
}

/// Black-box profanity predicate.
pub trait ProfanityFilter: Send + Sync {
    fn is_profane(&self, name: &str) -> bool;
}

/// Filter that never rejects anything.
pub struct PermissiveFilter;

impl ProfanityFilter for PermissiveFilter {
    fn is_profane(&self, _name: &str) -> bool {
        false
    }
}

/// Case-insensitive whole-token deny list.
///
/// A name is profane if any maximal alphanumeric token of it, lowercased,
/// appears on the list. Substrings inside longer tokens do not match.
pub struct DenyListFilter {
    words: HashSet<String>,
}

impl DenyListFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl ProfanityFilter for DenyListFilter {
    fn is_profane(&self, name: &str) -> bool {
        name.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .any(|token| self.words.contains(&token.to_lowercase()))
    }
}

/// Validates proposed holder names.
///
/// On success returns the canonical (trimmed) form of the name, which is
/// what gets stored.
pub trait NameValidator: Send + Sync {
    fn validate(&self, raw: &str) -> Result<String, NameRejection>;
}

/// Standard validator: trim, non-empty, bounded length, not profane.
pub struct DefaultNameValidator {
    max_len: usize,
    filter: Arc<dyn ProfanityFilter>,
}

impl DefaultNameValidator {
    pub fn new(max_len: usize, filter: Arc<dyn ProfanityFilter>) -> Self {
        Self { max_len, filter }
    }
}

impl NameValidator for DefaultNameValidator {
    fn validate(&self, raw: &str) -> Result<String, NameRejection> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(NameRejection::Empty);
        }
        if name.chars().count() > self.max_len {
            return Err(NameRejection::TooLong { max: self.max_len });
        }
        if self.filter.is_profane(name) {
            return Err(NameRejection::Profane);
        }
        Ok(name.to_string())
    }
}
