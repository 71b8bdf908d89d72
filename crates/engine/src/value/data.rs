use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use dbus_sim_core::object_path::OwnedObjectPath;
use dbus_sim_core::signature::SignatureBuf;

use super::ty::VariantType;

/// A D-Bus value matching some [`VariantType`].
///
/// Ordering and equality are structural; basic kinds order the obvious
/// way, containers order lexicographically by element, and cross-kind
/// comparisons (which the language's type checker never permits to reach
/// the evaluator) order by a fixed kind precedence so that `Ord` stays
/// total.
#[derive(Debug, Clone)]
pub enum Value {
    Byte(u8),
    Boolean(bool),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Double(f64),
    String(Box<str>),
    ObjectPath(OwnedObjectPath),
    Signature(SignatureBuf),
    UnixFd(u32),
    Variant(Box<Value>),
    Array(VariantType, Vec<Value>),
    Tuple(Vec<Value>),
    /// Kept as an ordered association list (rather than a `HashMap`) so
    /// that equality, ordering, and deterministic iteration for `keys`/
    /// printing don't depend on hash order.
    Dict(VariantType, VariantType, Vec<(Value, Value)>),
}

impl Value {
    pub fn ty(&self) -> VariantType {
        match self {
            Value::Byte(_) => VariantType::Byte,
            Value::Boolean(_) => VariantType::Boolean,
            Value::Int16(_) => VariantType::Int16,
            Value::Uint16(_) => VariantType::Uint16,
            Value::Int32(_) => VariantType::Int32,
            Value::Uint32(_) => VariantType::Uint32,
            Value::Int64(_) => VariantType::Int64,
            Value::Uint64(_) => VariantType::Uint64,
            Value::Double(_) => VariantType::Double,
            Value::String(_) => VariantType::String,
            Value::ObjectPath(_) => VariantType::ObjectPath,
            Value::Signature(_) => VariantType::Signature,
            Value::UnixFd(_) => VariantType::UnixFd,
            Value::Variant(_) => VariantType::Variant,
            Value::Array(elem, _) => VariantType::array_of(elem.clone()),
            Value::Tuple(elems) => VariantType::tuple_of(elems.iter().map(Value::ty)),
            Value::Dict(k, v, _) => VariantType::dict_of(k.clone(), v.clone()),
        }
    }

    /// `true` iff this value's (always-definite) type is a subtype of
    /// `ty`, per `VariantType::is_subtype_of`.
    pub fn matches(&self, ty: &VariantType) -> bool {
        self.ty().is_subtype_of(ty)
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Byte(_) => 0,
            Value::Boolean(_) => 1,
            Value::Int16(_) => 2,
            Value::Uint16(_) => 3,
            Value::Int32(_) => 4,
            Value::Uint32(_) => 5,
            Value::Int64(_) => 6,
            Value::Uint64(_) => 7,
            Value::Double(_) => 8,
            Value::String(_) => 9,
            Value::ObjectPath(_) => 10,
            Value::Signature(_) => 11,
            Value::UnixFd(_) => 12,
            Value::Variant(_) => 13,
            Value::Array(..) => 14,
            Value::Tuple(_) => 15,
            Value::Dict(..) => 16,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Uint16(a), Value::Uint16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Uint32(a), Value::Uint32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Uint64(a), Value::Uint64(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::ObjectPath(a), Value::ObjectPath(b)) => a == b,
            (Value::Signature(a), Value::Signature(b)) => a == b,
            (Value::UnixFd(a), Value::UnixFd(b)) => a == b,
            (Value::Variant(a), Value::Variant(b)) => a == b,
            (Value::Array(ta, a), Value::Array(tb, b)) => ta == tb && a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(ka, va, a), Value::Dict(kb, vb, b)) => {
                ka == kb && va == vb && dict_eq(a, b)
            }
            _ => false,
        }
    }
}

fn dict_eq(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let to_map = |entries: &[(Value, Value)]| -> BTreeMap<String, &Value> {
        entries
            .iter()
            .map(|(k, v)| (format!("{k}"), v))
            .collect()
    };
    let ma = to_map(a);
    let mb = to_map(b);
    ma.len() == mb.len() && ma.iter().all(|(k, v)| mb.get(k) == Some(v))
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Byte(a), Value::Byte(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Int16(a), Value::Int16(b)) => a.cmp(b),
            (Value::Uint16(a), Value::Uint16(b)) => a.cmp(b),
            (Value::Int32(a), Value::Int32(b)) => a.cmp(b),
            (Value::Uint32(a), Value::Uint32(b)) => a.cmp(b),
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::Uint64(a), Value::Uint64(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::ObjectPath(a), Value::ObjectPath(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Signature(a), Value::Signature(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::UnixFd(a), Value::UnixFd(b)) => a.cmp(b),
            (Value::Variant(a), Value::Variant(b)) => a.cmp(b),
            (Value::Array(_, a), Value::Array(_, b)) => a.cmp(b),
            (Value::Tuple(a), Value::Tuple(b)) => a.cmp(b),
            (Value::Dict(_, _, a), Value::Dict(_, _, b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Uint16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Uint32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Uint64(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::ObjectPath(v) => write!(f, "{v}"),
            Value::Signature(v) => write!(f, "{}", v.as_str()),
            Value::UnixFd(v) => write!(f, "<fd {v}>"),
            Value::Variant(v) => write!(f, "<{v}>"),
            Value::Array(_, items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Dict(_, _, entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
