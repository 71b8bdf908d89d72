//! The fixed, compile-time-known function registry (C2): `keys`,
//! `pairKeys`, `inArray`. A host cannot register new functions — no such
//! operation is named in the simulation language.

use tracing::warn;

use crate::value::{Value, VariantType};

/// One registered function: its name, a type-checker that validates an
/// actual argument-type list and computes the return type, and an
/// evaluator over actual argument values.
pub struct FunctionSignature {
    pub name: &'static str,
    /// Validate `args` (the actual argument types, in call order) and
    /// compute the call's result type, or `None` if the arguments don't
    /// satisfy the function's contract.
    pub check_args: fn(args: &[VariantType]) -> Option<VariantType>,
    /// Evaluate the call given actual argument values. Only ever invoked
    /// after `check_args` has accepted the corresponding types.
    pub eval: fn(args: &[Value]) -> Value,
}

/// The full, fixed function registry.
pub const FUNCTIONS: &[FunctionSignature] = &[KEYS, PAIR_KEYS, IN_ARRAY];

pub fn lookup(name: &str) -> Option<&'static FunctionSignature> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

/// `keys : a{?*} -> a?` — the array of a dict's keys, in entry order.
const KEYS: FunctionSignature = FunctionSignature {
    name: "keys",
    check_args: |args| match args {
        [VariantType::Dict(k, _)] => Some(VariantType::array_of((**k).clone())),
        _ => None,
    },
    eval: |args| match &args[0] {
        Value::Dict(k, _, entries) => {
            Value::Array(k.clone(), entries.iter().map(|(k, _)| k.clone()).collect())
        }
        other => unreachable!("checker guaranteed a dict argument to `keys`, found {other:?}"),
    },
};

/// `pairKeys : (a? a*) -> a{?*}` — zips two equal-length arrays into a
/// dict. A length mismatch at runtime (array lengths are dynamic, so the
/// checker cannot rule this out statically) degrades to the shorter
/// length rather than aborting the transition, consistent with this
/// engine's "runtime warnings never unwind" policy.
const PAIR_KEYS: FunctionSignature = FunctionSignature {
    name: "pairKeys",
    check_args: |args| match args {
        [VariantType::Array(k), VariantType::Array(v)] => {
            Some(VariantType::dict_of((**k).clone(), (**v).clone()))
        }
        _ => None,
    },
    eval: |args| match (&args[0], &args[1]) {
        (Value::Array(k, ks), Value::Array(v, vs)) => {
            if ks.len() != vs.len() {
                warn!(
                    keys = ks.len(),
                    values = vs.len(),
                    "pairKeys called with mismatched array lengths; truncating to the shorter"
                );
            }
            let entries = ks
                .iter()
                .zip(vs.iter())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            Value::Dict(k.clone(), v.clone(), entries)
        }
        (a, b) => unreachable!("checker guaranteed two arrays to `pairKeys`, found {a:?}, {b:?}"),
    },
};

/// `inArray : (* a*) -> b` — `true` iff `x` structurally equals some
/// element of `xs`. The dependent constraint ("x's type must be a subtype
/// of the array's element type") is exactly what `check_args` verifies;
/// it cannot be expressed as a single static parameter-tuple type.
const IN_ARRAY: FunctionSignature = FunctionSignature {
    name: "inArray",
    check_args: |args| match args {
        [x, VariantType::Array(elem)] if x.is_subtype_of(elem) => Some(VariantType::Boolean),
        _ => None,
    },
    eval: |args| match &args[1] {
        Value::Array(_, items) => Value::Boolean(items.contains(&args[0])),
        other => unreachable!("checker guaranteed an array second argument, found {other:?}"),
    },
};
