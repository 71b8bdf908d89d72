use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::MaybeUninit;
use std::ops::Deref;
use std::slice::from_raw_parts;

use super::{validate, Signature, SignatureError, MAX_SIGNATURE};

/// An owned, validated D-Bus signature.
///
/// This is the owned variant which dereferences to [`Signature`].
#[derive(Clone)]
pub struct SignatureBuf {
    data: [MaybeUninit<u8>; MAX_SIGNATURE],
    init: usize,
}

impl SignatureBuf {
    /// Construct a new empty signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_sim_core::signature::SignatureBuf;
    ///
    /// let sig = SignatureBuf::empty();
    /// assert!(sig.is_empty());
    /// ```
    pub const fn empty() -> Self {
        Self {
            data: unsafe { MaybeUninit::uninit().assume_init() },
            init: 0,
        }
    }

    /// Try to construct a new owned signature with validation.
    #[inline]
    pub fn new<S>(signature: &S) -> Result<Self, SignatureError>
    where
        S: ?Sized + AsRef<[u8]>,
    {
        let signature = signature.as_ref();
        validate(signature)?;
        // SAFETY: `validate` just confirmed this is a well-formed signature.
        unsafe { Ok(Self::from_slice_unchecked(signature)) }
    }

    /// Coerce an owned signature into its raw parts, for handing off to a
    /// [`SignatureBuilder`][super::SignatureBuilder].
    pub(crate) fn into_raw_parts(self) -> ([MaybeUninit<u8>; MAX_SIGNATURE], usize) {
        let init = self.init;
        (self.data, init)
    }

    /// Construct an owned signature from a slice.
    ///
    /// # Safety
    ///
    /// Caller must ensure that `bytes` is a valid signature no longer than
    /// [`MAX_SIGNATURE`][super::MAX_SIGNATURE].
    #[inline]
    pub(crate) unsafe fn from_slice_unchecked(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= MAX_SIGNATURE);
        let mut this = Self::empty();
        this.data
            .as_mut_ptr()
            .cast::<u8>()
            .copy_from_nonoverlapping(bytes.as_ptr(), bytes.len());
        this.init = bytes.len();
        this
    }

    #[inline]
    fn as_slice(&self) -> &[u8] {
        // SAFETY: `init` bytes of `data` were initialized by construction.
        unsafe { from_raw_parts(self.data.as_ptr().cast(), self.init) }
    }
}

impl fmt::Debug for SignatureBuf {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignatureBuf").field(&self.as_str()).finish()
    }
}

impl Deref for SignatureBuf {
    type Target = Signature;

    fn deref(&self) -> &Self::Target {
        // SAFETY: Construction of SignatureBuf ensures that the signature is
        // valid.
        unsafe { Signature::new_unchecked(self.as_slice()) }
    }
}

impl Borrow<Signature> for SignatureBuf {
    #[inline]
    fn borrow(&self) -> &Signature {
        self
    }
}

impl AsRef<Signature> for SignatureBuf {
    #[inline]
    fn as_ref(&self) -> &Signature {
        self
    }
}

impl Hash for SignatureBuf {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

/// Equality check between [`SignatureBuf`] and [`SignatureBuf`].
impl PartialEq<SignatureBuf> for SignatureBuf {
    #[inline]
    fn eq(&self, other: &SignatureBuf) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for SignatureBuf {}

/// Equality check between [`Signature`] and [`SignatureBuf`].
impl PartialEq<Signature> for SignatureBuf {
    #[inline]
    fn eq(&self, other: &Signature) -> bool {
        self.as_slice() == other.as_bytes()
    }
}

/// Equality check between a borrowed [`Signature`] and [`SignatureBuf`].
impl PartialEq<&Signature> for SignatureBuf {
    #[inline]
    fn eq(&self, other: &&Signature) -> bool {
        self.as_slice() == other.as_bytes()
    }
}
