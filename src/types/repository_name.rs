// ABOUTME: Registry repository name validation.
// ABOUTME: Enforces lowercase path components joined by single separators.

use std::fmt;
use thiserror::Error;

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 205;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryNameError {
    #[error("repository name cannot be empty")]
    Empty,

    #[error("repository name must be at least 2 characters")]
    TooShort,

    #[error("repository name exceeds maximum length of 205 characters")]
    TooLong,

    #[error("repository name must be lowercase")]
    NotLowercase,

    #[error("invalid character in repository name: '{0}'")]
    InvalidChar(char),

    #[error("repository name cannot start or end with a separator")]
    EdgeSeparator,

    #[error("repository name cannot contain consecutive separators")]
    ConsecutiveSeparators,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub fn new(value: &str) -> Result<Self, RepositoryNameError> {
        if value.is_empty() {
            return Err(RepositoryNameError::Empty);
        }

        if value.len() < MIN_LEN {
            return Err(RepositoryNameError::TooShort);
        }

        if value.len() > MAX_LEN {
            return Err(RepositoryNameError::TooLong);
        }

        let mut previous_separator = true;
        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(RepositoryNameError::NotLowercase);
            }

            if is_separator(c) {
                if previous_separator {
                    // A leading separator lands here too.
                    return Err(if value.starts_with(is_separator) {
                        RepositoryNameError::EdgeSeparator
                    } else {
                        RepositoryNameError::ConsecutiveSeparators
                    });
                }
                previous_separator = true;
            } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
                previous_separator = false;
            } else {
                return Err(RepositoryNameError::InvalidChar(c));
            }
        }

        if previous_separator {
            return Err(RepositoryNameError::EdgeSeparator);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, '.' | '_' | '-' | '/')
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RepositoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RepositoryName {
    type Error = RepositoryNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_namespaced_names() {
        let name = RepositoryName::new("team/app-server_v2.build").unwrap();
        assert_eq!(name.as_str(), "team/app-server_v2.build");
    }

    #[test]
    fn rejects_single_character() {
        assert_eq!(RepositoryName::new("a"), Err(RepositoryNameError::TooShort));
    }

    #[test]
    fn rejects_edge_separators() {
        assert_eq!(
            RepositoryName::new("-app"),
            Err(RepositoryNameError::EdgeSeparator)
        );
        assert_eq!(
            RepositoryName::new("app/"),
            Err(RepositoryNameError::EdgeSeparator)
        );
    }

    #[test]
    fn rejects_doubled_separators() {
        assert_eq!(
            RepositoryName::new("app//server"),
            Err(RepositoryNameError::ConsecutiveSeparators)
        );
    }

    #[test]
    fn rejects_uppercase_and_symbols() {
        assert_eq!(
            RepositoryName::new("MyApp"),
            Err(RepositoryNameError::NotLowercase)
        );
        assert_eq!(
            RepositoryName::new("my app"),
            Err(RepositoryNameError::InvalidChar(' '))
        );
    }
}
