//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are storage-assigned positive integers; the newtypes keep a
//! subject id from being passed where an article id is expected.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a subject (an authenticated principal / user account).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(i64);

/// Identifier of an article.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = i64::from_str(s.trim())
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                if value <= 0 {
                    return Err(DomainError::invalid_id(format!("{}: must be positive", $name)));
                }
                Ok(Self(value))
            }
        }
    };
}

impl_int_newtype!(SubjectId, "SubjectId");
impl_int_newtype!(ArticleId, "ArticleId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids() {
        assert_eq!("42".parse::<ArticleId>().unwrap(), ArticleId::new(42));
        assert_eq!(" 7 ".parse::<SubjectId>().unwrap().get(), 7);
    }

    #[test]
    fn rejects_garbage_and_non_positive_ids() {
        assert!(matches!("abc".parse::<ArticleId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("0".parse::<SubjectId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("-3".parse::<SubjectId>(), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&SubjectId::new(5)).unwrap();
        assert_eq!(json, "5");
        let back: SubjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SubjectId::new(5));
    }
}
