use std::fmt;

/// An error constructing an interface or bus name.
#[derive(Debug)]
#[non_exhaustive]
pub enum NameError {
    /// The name is not a syntactically valid dotted D-Bus name.
    Invalid,
    /// A well-known bus name was expected, but a unique (`:`-prefixed) name
    /// was given.
    Unique,
}

impl fmt::Display for NameError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Invalid => write!(f, "Invalid D-Bus name"),
            NameError::Unique => write!(f, "Expected a well-known bus name, found a unique name"),
        }
    }
}

impl std::error::Error for NameError {}
