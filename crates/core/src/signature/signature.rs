use std::fmt;
use std::str::from_utf8_unchecked;

use super::{validate, Iter, SignatureBuf, SignatureError};

/// A validated D-Bus signature, e.g. `a{sv}` or `(ss)`.
///
/// # Examples
///
/// ```
/// use dbus_sim_core::signature::Signature;
///
/// const SIG: &Signature = Signature::new_const(b"aaaai");
///
/// assert!(Signature::new(b"aai").is_ok());
/// ```
#[derive(Hash, PartialEq, Eq)]
#[repr(transparent)]
pub struct Signature([u8]);

impl Signature {
    /// The empty signature.
    pub const EMPTY: &'static Signature = Signature::new_const(b"");

    /// The signature of a [`Signature`].
    pub const SIGNATURE: &'static Signature = Signature::new_const(b"g");

    /// The signature of an object path.
    pub const OBJECT_PATH: &'static Signature = Signature::new_const(b"o");

    /// The signature of a string.
    pub const STRING: &'static Signature = Signature::new_const(b"s");

    /// The signature of a variant value.
    pub const VARIANT: &'static Signature = Signature::new_const(b"v");

    /// A single byte.
    pub const BYTE: &'static Signature = Signature::new_const(b"y");

    /// A boolean.
    pub const BOOLEAN: &'static Signature = Signature::new_const(b"b");

    /// Signed (two's complement) 16-bit integer.
    pub const INT16: &'static Signature = Signature::new_const(b"n");

    /// Unsigned 16-bit integer.
    pub const UINT16: &'static Signature = Signature::new_const(b"q");

    /// Signed (two's complement) 32-bit integer.
    pub const INT32: &'static Signature = Signature::new_const(b"i");

    /// Unsigned 32-bit integer.
    pub const UINT32: &'static Signature = Signature::new_const(b"u");

    /// Signed (two's complement) 64-bit integer (mnemonic: x and t are the
    /// first characters in "sixty" not already used for something more
    /// common).
    pub const INT64: &'static Signature = Signature::new_const(b"x");

    /// Unsigned 64-bit integer.
    pub const UINT64: &'static Signature = Signature::new_const(b"t");

    /// IEEE 754 double-precision floating point.
    pub const DOUBLE: &'static Signature = Signature::new_const(b"d");

    /// Unsigned 32-bit integer representing an index into an out-of-band
    /// array of file descriptors (mnemonic: h for handle).
    pub const UNIX_FD: &'static Signature = Signature::new_const(b"h");

    /// Construct a new signature with validation inside of a constant
    /// context.
    ///
    /// This will panic in case the signature is invalid.
    ///
    /// ```compile_fail
    /// use dbus_sim_core::signature::Signature;
    ///
    /// const BAD: &Signature = Signature::new_const(b"(a)");
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_sim_core::signature::Signature;
    ///
    /// const SIG: &Signature = Signature::new_const(b"i(ai)");
    /// ```
    #[inline]
    #[track_caller]
    pub const fn new_const(signature: &[u8]) -> &Signature {
        if validate(signature).is_err() {
            panic!("Invalid D-Bus signature")
        };

        // SAFETY: The byte slice is repr transparent over this type.
        unsafe { Self::new_unchecked(signature) }
    }

    /// Try to construct a new signature with validation.
    #[inline]
    pub fn new<S>(signature: &S) -> Result<&Signature, SignatureError>
    where
        S: ?Sized + AsRef<[u8]>,
    {
        let signature = signature.as_ref();
        validate(signature)?;
        // SAFETY: The byte slice is repr transparent over this type.
        unsafe { Ok(Self::new_unchecked(signature)) }
    }

    /// Construct a new signature without validation. The caller is
    /// responsible for ensuring that the signature is valid.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the signature is a valid signature.
    #[inline]
    pub const unsafe fn new_unchecked(signature: &[u8]) -> &Self {
        &*(signature as *const _ as *const Signature)
    }

    /// Construct a new empty signature.
    pub const fn empty() -> &'static Self {
        unsafe { Self::new_unchecked(&[]) }
    }

    /// Test if the signature is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the length of the signature in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the top-level types in this signature.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Get the signature as a string.
    pub fn as_str(&self) -> &str {
        // SAFETY: Validation indirectly ensures that the signature is valid UTF-8.
        unsafe { from_utf8_unchecked(&self.0) }
    }

    /// Get the signature as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl fmt::Display for Signature {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl AsRef<Signature> for Signature {
    #[inline]
    fn as_ref(&self) -> &Signature {
        self
    }
}

impl AsRef<[u8]> for Signature {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl ToOwned for Signature {
    type Owned = SignatureBuf;

    #[inline]
    fn to_owned(&self) -> Self::Owned {
        // SAFETY: `self` is already a validated signature.
        unsafe { SignatureBuf::from_slice_unchecked(&self.0) }
    }
}

/// Equality check between [`Signature`] and [`SignatureBuf`].
///
/// # Examples
///
/// ```
/// use dbus_sim_core::signature::{Signature, SignatureBuf};
///
/// assert_eq!(*Signature::EMPTY, SignatureBuf::empty());
/// assert_eq!(*Signature::STRING, SignatureBuf::new(b"s")?);
/// # Ok::<_, dbus_sim_core::signature::SignatureError>(())
/// ```
impl PartialEq<SignatureBuf> for Signature {
    #[inline]
    fn eq(&self, other: &SignatureBuf) -> bool {
        self.0 == *other.as_bytes()
    }
}

/// Equality check between [`SignatureBuf`] and a borrowed [`Signature`].
impl PartialEq<SignatureBuf> for &Signature {
    #[inline]
    fn eq(&self, other: &SignatureBuf) -> bool {
        self.0 == *other.as_bytes()
    }
}

/// Equality check between `[u8]` and a [`Signature`].
impl PartialEq<[u8]> for Signature {
    #[inline]
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == *other
    }
}

/// Equality check between `[u8; N]` and a [`Signature`].
impl<const N: usize> PartialEq<[u8; N]> for Signature {
    #[inline]
    fn eq(&self, other: &[u8; N]) -> bool {
        self.0 == other[..]
    }
}

/// Equality check between `str` and a [`Signature`].
impl PartialEq<str> for Signature {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0 == *other.as_bytes()
    }
}

impl From<&Signature> for Box<Signature> {
    #[inline]
    fn from(signature: &Signature) -> Self {
        // SAFETY: Signature is repr(transparent) over [u8].
        unsafe { Box::from_raw(Box::into_raw(Box::<[u8]>::from(&signature.0)) as *mut Signature) }
    }
}
