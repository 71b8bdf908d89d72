use std::fmt;

use dbus_sim_core::signature::{Signature, SignatureBuf};

use crate::error::{TypeError, TypeErrorKind};

/// A D-Bus variant type, extended with the two indefinite wildcard kinds
/// the simulation language's type inference needs.
///
/// `Any` (`*`) matches anything; `AnyBasic` (`?`) matches any non-container
/// kind. Both are "indefinite": a [`Value`][crate::value::Value] never
/// carries one, but a [`VariantType`] computed for a heterogeneous
/// array/dict literal, or named by a function's declared parameter type,
/// may.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariantType {
    Byte,
    Boolean,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Double,
    String,
    ObjectPath,
    Signature,
    /// A unix file descriptor, represented on the wire (and here) as a
    /// `u32` index into an out-of-band array of descriptors.
    UnixFd,
    Variant,
    Array(Box<VariantType>),
    Tuple(Vec<VariantType>),
    Dict(Box<VariantType>, Box<VariantType>),
    /// `*` — matches any type whatsoever.
    Any,
    /// `?` — matches any basic (non-container, non-variant) type.
    AnyBasic,
}

impl VariantType {
    pub fn array_of(element: VariantType) -> VariantType {
        VariantType::Array(Box::new(element))
    }

    pub fn tuple_of<I>(elements: I) -> VariantType
    where
        I: IntoIterator<Item = VariantType>,
    {
        VariantType::Tuple(elements.into_iter().collect())
    }

    pub fn dict_of(key: VariantType, value: VariantType) -> VariantType {
        VariantType::Dict(Box::new(key), Box::new(value))
    }

    /// Basic kinds are the scalar, non-container, non-wildcard types: the
    /// ones `?` (`AnyBasic`) can stand in for.
    pub fn is_basic(&self) -> bool {
        matches!(
            self,
            VariantType::Byte
                | VariantType::Boolean
                | VariantType::Int16
                | VariantType::Uint16
                | VariantType::Int32
                | VariantType::Uint32
                | VariantType::Int64
                | VariantType::Uint64
                | VariantType::Double
                | VariantType::String
                | VariantType::ObjectPath
                | VariantType::Signature
                | VariantType::UnixFd
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            VariantType::Byte
                | VariantType::Int16
                | VariantType::Uint16
                | VariantType::Int32
                | VariantType::Uint32
                | VariantType::Int64
                | VariantType::Uint64
                | VariantType::UnixFd
        )
    }

    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            VariantType::Int16 | VariantType::Int32 | VariantType::Int64
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, VariantType::Double)
    }

    /// A type is "indefinite" if it contains `Any` or `AnyBasic` anywhere
    /// in its structure.
    pub fn is_definite(&self) -> bool {
        match self {
            VariantType::Any | VariantType::AnyBasic => false,
            VariantType::Array(elem) => elem.is_definite(),
            VariantType::Tuple(elems) => elems.iter().all(VariantType::is_definite),
            VariantType::Dict(key, value) => key.is_definite() && value.is_definite(),
            _ => true,
        }
    }

    /// The D-Bus signature subtype relation: wildcards on the right match
    /// anything (suitably basic, for `?`); containers are covariant in
    /// their parameters; concrete kinds must match exactly.
    pub fn is_subtype_of(&self, other: &VariantType) -> bool {
        match other {
            VariantType::Any => true,
            VariantType::AnyBasic => self.is_basic(),
            _ => match (self, other) {
                (VariantType::Array(a), VariantType::Array(b)) => a.is_subtype_of(b),
                (VariantType::Tuple(a), VariantType::Tuple(b)) => {
                    a.len() == b.len()
                        && a.iter().zip(b.iter()).all(|(x, y)| x.is_subtype_of(y))
                }
                (VariantType::Dict(ka, va), VariantType::Dict(kb, vb)) => {
                    ka.is_subtype_of(kb) && va.is_subtype_of(vb)
                }
                _ => self == other,
            },
        }
    }

    /// The most specific type that is a supertype of every type in `ts`.
    ///
    /// Used to type heterogeneous array/dict literals: when every element
    /// shares one type, that type wins; otherwise the answer is the
    /// least-committal wildcard that still fits, `?` if every element was
    /// at least basic, `*` otherwise.
    pub fn least_general_supertype<'a, I>(ts: I) -> VariantType
    where
        I: IntoIterator<Item = &'a VariantType>,
    {
        let mut ts = ts.into_iter();
        let Some(first) = ts.next() else {
            return VariantType::Any;
        };

        let mut all_basic = first.is_basic();
        let mut all_equal = true;

        for t in ts {
            if t != first {
                all_equal = false;
            }
            all_basic &= t.is_basic();
        }

        if all_equal {
            first.clone()
        } else if all_basic {
            VariantType::AnyBasic
        } else {
            VariantType::Any
        }
    }

    /// Convert from a definite D-Bus signature naming exactly one complete
    /// type (as used by `@T` annotations, property types, and method
    /// argument types).
    pub fn from_signature(sig: &Signature) -> Result<VariantType, TypeError> {
        let mut iter = sig.iter();
        let Some(first) = iter.next() else {
            return Err(TypeError::new(TypeErrorKind::EmptySignature));
        };
        if iter.next().is_some() {
            return Err(TypeError::new(TypeErrorKind::NotASingleType(
                sig.as_str().into(),
            )));
        }
        from_sig_item(first)
    }

    /// Convert to a D-Bus signature, if this type is definite (wildcards
    /// have no wire representation).
    pub fn to_signature(&self) -> Option<SignatureBuf> {
        let mut out = String::new();
        write_signature(self, &mut out).ok()?;
        SignatureBuf::new(&out).ok()
    }
}

fn write_signature(ty: &VariantType, out: &mut String) -> Result<(), ()> {
    match ty {
        VariantType::Byte => out.push('y'),
        VariantType::Boolean => out.push('b'),
        VariantType::Int16 => out.push('n'),
        VariantType::Uint16 => out.push('q'),
        VariantType::Int32 => out.push('i'),
        VariantType::Uint32 => out.push('u'),
        VariantType::Int64 => out.push('x'),
        VariantType::Uint64 => out.push('t'),
        VariantType::Double => out.push('d'),
        VariantType::String => out.push('s'),
        VariantType::ObjectPath => out.push('o'),
        VariantType::Signature => out.push('g'),
        VariantType::UnixFd => out.push('h'),
        VariantType::Variant => out.push('v'),
        VariantType::Array(elem) => {
            out.push('a');
            write_signature(elem, out)?;
        }
        VariantType::Tuple(elems) => {
            out.push('(');
            for elem in elems {
                write_signature(elem, out)?;
            }
            out.push(')');
        }
        VariantType::Dict(key, value) => {
            out.push('{');
            write_signature(key, out)?;
            write_signature(value, out)?;
            out.push('}');
        }
        VariantType::Any | VariantType::AnyBasic => return Err(()),
    }
    Ok(())
}

fn from_sig_item(item: dbus_sim_core::signature::Type<'_>) -> Result<VariantType, TypeError> {
    use dbus_sim_core::proto;
    use dbus_sim_core::signature::Type;

    Ok(match item {
        Type::Signature(sig) => {
            let byte = sig.as_bytes()[0];
            let code = proto::Type::new(byte);
            match code {
                proto::Type::BYTE => VariantType::Byte,
                proto::Type::BOOLEAN => VariantType::Boolean,
                proto::Type::INT16 => VariantType::Int16,
                proto::Type::UINT16 => VariantType::Uint16,
                proto::Type::INT32 => VariantType::Int32,
                proto::Type::UINT32 => VariantType::Uint32,
                proto::Type::INT64 => VariantType::Int64,
                proto::Type::UINT64 => VariantType::Uint64,
                proto::Type::DOUBLE => VariantType::Double,
                proto::Type::STRING => VariantType::String,
                proto::Type::OBJECT_PATH => VariantType::ObjectPath,
                proto::Type::SIGNATURE => VariantType::Signature,
                proto::Type::VARIANT => VariantType::Variant,
                proto::Type::UNIX_FD => VariantType::UnixFd,
                _ => {
                    return Err(TypeError::new(TypeErrorKind::UnsupportedTypeCode(
                        byte as char,
                    )))
                }
            }
        }
        Type::Array(inner) => VariantType::array_of(VariantType::from_signature(inner)?),
        Type::Struct(inner) => {
            let mut elems = Vec::new();
            let mut it = inner.iter();
            while let Some(next) = it.next() {
                elems.push(from_sig_item(next)?);
            }
            VariantType::Tuple(elems)
        }
        Type::Dict(key, value) => VariantType::dict_of(
            VariantType::from_signature(key)?,
            VariantType::from_signature(value)?,
        ),
    })
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantType::Any => write!(f, "*"),
            VariantType::AnyBasic => write!(f, "?"),
            other => match other.to_signature() {
                Some(sig) => write!(f, "{sig}"),
                None => write!(f, "<indefinite>"),
            },
        }
    }
}
