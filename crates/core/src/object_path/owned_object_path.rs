use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use super::ObjectPath;

/// A validated, owned D-Bus object path.
///
/// See [`ObjectPath`] for the validation rules this type enforces.
#[derive(Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct OwnedObjectPath(Vec<u8>);

impl OwnedObjectPath {
    /// Construct an owned object path from its raw underlying vector.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the vector contains a valid object path.
    #[inline]
    pub(super) unsafe fn from_raw_vec(data: Vec<u8>) -> Self {
        Self(data)
    }

    #[inline]
    fn to_object_path(&self) -> &ObjectPath {
        // SAFETY: This type ensures during construction that the object path
        // it contains is valid.
        unsafe { ObjectPath::new_unchecked(&self.0) }
    }
}

impl Deref for OwnedObjectPath {
    type Target = ObjectPath;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.to_object_path()
    }
}

impl Borrow<ObjectPath> for OwnedObjectPath {
    #[inline]
    fn borrow(&self) -> &ObjectPath {
        self
    }
}

impl AsRef<ObjectPath> for OwnedObjectPath {
    #[inline]
    fn as_ref(&self) -> &ObjectPath {
        self
    }
}

impl fmt::Debug for OwnedObjectPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_object_path().fmt(f)
    }
}

impl fmt::Display for OwnedObjectPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_object_path().fmt(f)
    }
}

impl TryFrom<&str> for OwnedObjectPath {
    type Error = super::ObjectPathError;

    #[inline]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(ObjectPath::new(value)?.to_owned())
    }
}
