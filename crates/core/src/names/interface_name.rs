use std::fmt;

use super::validation::validate_dotted;
use super::NameError;

/// A validated D-Bus interface name, e.g. `org.freedesktop.DBus.Properties`.
#[derive(PartialEq, Eq, Hash, Clone)]
#[repr(transparent)]
pub struct InterfaceName(str);

impl InterfaceName {
    /// Construct a new validated interface name.
    pub fn new<S>(name: &S) -> Result<&Self, NameError>
    where
        S: ?Sized + AsRef<str>,
    {
        let name = name.as_ref();

        if !validate_dotted(name.as_bytes(), false) {
            return Err(NameError::Invalid);
        }

        // SAFETY: InterfaceName is repr(transparent) over str.
        Ok(unsafe { &*(name as *const str as *const InterfaceName) })
    }

    /// Get the interface name as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterfaceName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for InterfaceName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ToOwned for InterfaceName {
    type Owned = String;

    #[inline]
    fn to_owned(&self) -> Self::Owned {
        self.0.to_owned()
    }
}
