//! Low-level type codes for the D-Bus signature alphabet.

use core::fmt;

raw_enum! {
    /// A single D-Bus type code, as it appears in a signature string.
    #[repr(u8)]
    pub enum Type {
        /// `y` - 8-bit unsigned integer.
        BYTE = b'y',
        /// `b` - boolean.
        BOOLEAN = b'b',
        /// `n` - 16-bit signed integer.
        INT16 = b'n',
        /// `q` - 16-bit unsigned integer.
        UINT16 = b'q',
        /// `i` - 32-bit signed integer.
        INT32 = b'i',
        /// `u` - 32-bit unsigned integer.
        UINT32 = b'u',
        /// `x` - 64-bit signed integer.
        INT64 = b'x',
        /// `t` - 64-bit unsigned integer.
        UINT64 = b't',
        /// `d` - IEEE 754 double.
        DOUBLE = b'd',
        /// `s` - UTF-8 string.
        STRING = b's',
        /// `o` - object path.
        OBJECT_PATH = b'o',
        /// `g` - signature.
        SIGNATURE = b'g',
        /// `v` - variant.
        VARIANT = b'v',
        /// `h` - unix file descriptor index.
        UNIX_FD = b'h',
        /// `a` - array.
        ARRAY = b'a',
        /// `(` - struct/tuple open.
        OPEN_PAREN = b'(',
        /// `)` - struct/tuple close.
        CLOSE_PAREN = b')',
        /// `{` - dict-entry open.
        OPEN_BRACE = b'{',
        /// `}` - dict-entry close.
        CLOSE_BRACE = b'}',
    }
}

impl Type {
    /// Get the raw byte for this type code.
    #[inline]
    pub const fn as_byte(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Type {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as char)
    }
}
