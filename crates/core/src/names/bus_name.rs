use std::fmt;

use super::validation::{is_unique_name, validate_dotted};
use super::NameError;

/// A validated, well-known D-Bus bus name, e.g. `org.example.Echo`.
///
/// Unique (connection-private, `:`-prefixed) names are rejected: a
/// simulated object is only ever requested to own well-known names.
#[derive(PartialEq, Eq, Hash, Clone)]
#[repr(transparent)]
pub struct BusName(str);

impl BusName {
    /// Construct a new validated well-known bus name.
    pub fn new<S>(name: &S) -> Result<&Self, NameError>
    where
        S: ?Sized + AsRef<str>,
    {
        let name = name.as_ref();

        if is_unique_name(name.as_bytes()) {
            return Err(NameError::Unique);
        }

        if !validate_dotted(name.as_bytes(), true) {
            return Err(NameError::Invalid);
        }

        // SAFETY: BusName is repr(transparent) over str.
        Ok(unsafe { &*(name as *const str as *const BusName) })
    }

    /// Get the bus name as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for BusName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ToOwned for BusName {
    type Owned = String;

    #[inline]
    fn to_owned(&self) -> Self::Owned {
        self.0.to_owned()
    }
}
