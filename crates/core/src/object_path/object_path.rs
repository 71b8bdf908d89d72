use std::fmt;
use std::str::from_utf8_unchecked;

use super::{validate, Iter, ObjectPathError, OwnedObjectPath};

/// A validated D-Bus object path.
///
/// The following rules define a [valid object path]. Implementations must not
/// send or accept messages with invalid object paths.
///
/// [valid object path]: https://dbus.freedesktop.org/doc/dbus-specification.html#message-protocol-marshaling-object-path
///
/// * The path may be of any length.
/// * The path must begin with an ASCII '/' (integer 47) character, and must
///   consist of elements separated by slash characters.
/// * Each element must only contain the ASCII characters "[A-Z][a-z][0-9]_"
/// * No element may be the empty string.
/// * Multiple '/' characters cannot occur in sequence.
/// * A trailing '/' character is not allowed unless the path is the root path
///   (a single '/' character).
#[derive(PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ObjectPath([u8]);

impl ObjectPath {
    /// The special `"/"` object path.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_sim_core::object_path::ObjectPath;
    ///
    /// assert_eq!(ObjectPath::ROOT, ObjectPath::new(b"/")?);
    /// # Ok::<_, dbus_sim_core::object_path::ObjectPathError>(())
    /// ```
    pub const ROOT: &'static Self = Self::new_const(b"/");

    /// Construct a new object path.
    ///
    /// # Panics
    ///
    /// Panics if the argument is not a valid object path.
    #[track_caller]
    pub const fn new_const(path: &[u8]) -> &Self {
        if !validate(path) {
            panic!("Invalid D-Bus object path");
        }

        // SAFETY: The byte slice is repr transparent over this type.
        unsafe { Self::new_unchecked(path) }
    }

    /// Construct a new validated object path.
    ///
    /// # Errors
    ///
    /// Errors if the argument is not a valid object path.
    pub fn new<P>(path: &P) -> Result<&Self, ObjectPathError>
    where
        P: ?Sized + AsRef<[u8]>,
    {
        let path = path.as_ref();

        if !validate(path) {
            return Err(ObjectPathError);
        }

        // SAFETY: The byte slice is repr transparent over this type.
        unsafe { Ok(Self::new_unchecked(path)) }
    }

    /// Construct an iterator over the path's components.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_sim_core::object_path::ObjectPath;
    ///
    /// let mut it = ObjectPath::new_const(b"/foo/bar").iter();
    /// assert_eq!(it.next(), Some("foo"));
    /// assert_eq!(it.next(), Some("bar"));
    /// assert!(it.next().is_none());
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.0)
    }

    /// Test if this path starts with `other`.
    #[must_use]
    pub fn starts_with(&self, other: &ObjectPath) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Construct a new unchecked object path.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `path` is a valid object path.
    #[must_use]
    pub(super) const unsafe fn new_unchecked(path: &[u8]) -> &Self {
        &*(path as *const _ as *const Self)
    }

    /// Get the object path as a string.
    pub fn as_str(&self) -> &str {
        // SAFETY: Validation indirectly ensures that the path is valid UTF-8.
        unsafe { from_utf8_unchecked(&self.0) }
    }

    /// Get the object path as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ObjectPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl fmt::Debug for ObjectPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl AsRef<ObjectPath> for ObjectPath {
    #[inline]
    fn as_ref(&self) -> &ObjectPath {
        self
    }
}

impl AsRef<[u8]> for ObjectPath {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl ToOwned for ObjectPath {
    type Owned = OwnedObjectPath;

    #[inline]
    fn to_owned(&self) -> Self::Owned {
        // SAFETY: Type ensures that it contains a valid object path during
        // construction.
        unsafe { OwnedObjectPath::from_raw_vec(self.0.to_vec()) }
    }
}

impl PartialEq<OwnedObjectPath> for ObjectPath {
    #[inline]
    fn eq(&self, other: &OwnedObjectPath) -> bool {
        self.0 == *AsRef::<[u8]>::as_ref(&**other)
    }
}

impl<'a> IntoIterator for &'a ObjectPath {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
