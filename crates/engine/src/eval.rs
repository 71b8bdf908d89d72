//! The pure expression evaluator (C5): turns an [`Expression`] plus an
//! [`Environment`] into a [`Value`], with no side effects of its own.
//!
//! Evaluation never mutates the environment or emits output; statement
//! execution (`crate::exec`) is the only place evaluated values are
//! assigned or turned into D-Bus traffic. Arithmetic saturates rather
//! than panicking or wrapping, per spec.md §4.5.

use std::error;
use std::fmt;

use crate::ast::{BinaryOp, DataLiteral, DataLiteralKind, Expression, UnaryOp};
use crate::env::Environment;
use crate::value::{Value, VariantType};

/// An error raised while evaluating an expression against an
/// environment: a reference to a variable with no current value, or a
/// call to a function the fixed registry doesn't know. Both are ruled
/// out for transition bodies by `check()` (Phase C); they can still
/// arise while evaluating a `data` block entry that forward-references a
/// not-yet-assigned sibling.
#[derive(Debug)]
pub struct EvalError {
    kind: EvalErrorKind,
}

impl EvalError {
    fn undeclared_variable(name: &str) -> Self {
        Self {
            kind: EvalErrorKind::UndeclaredVariable(name.into()),
        }
    }

    fn unknown_function(name: &str) -> Self {
        Self {
            kind: EvalErrorKind::UnknownFunction(name.into()),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl error::Error for EvalError {}

#[derive(Debug)]
enum EvalErrorKind {
    UndeclaredVariable(Box<str>),
    UnknownFunction(Box<str>),
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErrorKind::UndeclaredVariable(name) => {
                write!(f, "variable `{name}` has no value yet")
            }
            EvalErrorKind::UnknownFunction(name) => write!(f, "unknown function `{name}`"),
        }
    }
}

/// Evaluate `expr` against `env`. Every sub-expression is re-evaluated in
/// full; no caching beyond the scalar literal cache already populated by
/// the checker (`DataLiteral::resolved`).
pub fn eval(expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
    match expr {
        Expression::Literal(lit) => eval_literal(lit, env),
        Expression::FunctionCall { name, args, .. } => {
            let sig = crate::functions::lookup(name).ok_or_else(|| EvalError::unknown_function(name))?;
            let values = args
                .iter()
                .map(|arg| eval(arg, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((sig.eval)(&values))
        }
        Expression::Unary { op, expr, .. } => {
            let value = eval(expr, env)?;
            Ok(eval_unary(*op, value))
        }
        Expression::Binary { op, lhs, rhs, .. } => {
            let l = eval(lhs, env)?;
            let r = eval(rhs, env)?;
            Ok(eval_binary(*op, l, r))
        }
    }
}

/// Evaluate a literal AST node to its current [`Value`]. Scalar kinds
/// reuse the checker's cached `resolved` value; containers and variable
/// references are re-derived every call, since their children may read
/// variables whose values change between invocations.
pub(crate) fn eval_literal(lit: &DataLiteral, env: &Environment) -> Result<Value, EvalError> {
    match &lit.kind {
        DataLiteralKind::Variable(name) => env
            .lookup_value(name)
            .cloned()
            .ok_or_else(|| EvalError::undeclared_variable(name)),
        DataLiteralKind::Array(elems) => {
            let elem_ty = array_elem_ty(lit);
            let values = elems
                .iter()
                .map(|e| eval(e, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(elem_ty, values))
        }
        DataLiteralKind::Tuple(elems) => {
            let values = elems
                .iter()
                .map(|e| eval(e, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Tuple(values))
        }
        DataLiteralKind::Dict(entries) => {
            let (key_ty, val_ty) = dict_kv_ty(lit);
            let mut out = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                out.push((eval(k, env)?, eval(v, env)?));
            }
            Ok(Value::Dict(key_ty, val_ty, out))
        }
        DataLiteralKind::Variant(inner) => Ok(Value::Variant(Box::new(eval(inner, env)?))),
        _ => Ok(lit
            .resolved
            .borrow()
            .clone()
            .expect("scalar literal has no resolved value; checker did not run")),
    }
}

pub(crate) fn array_elem_ty(lit: &DataLiteral) -> VariantType {
    match lit.inferred_ty.borrow().as_ref() {
        Some(VariantType::Array(elem)) => (**elem).clone(),
        _ => VariantType::Any,
    }
}

pub(crate) fn dict_kv_ty(lit: &DataLiteral) -> (VariantType, VariantType) {
    match lit.inferred_ty.borrow().as_ref() {
        Some(VariantType::Dict(k, v)) => ((**k).clone(), (**v).clone()),
        _ => (VariantType::Any, VariantType::Any),
    }
}

fn eval_unary(op: UnaryOp, value: Value) -> Value {
    match op {
        UnaryOp::Not => match value {
            Value::Boolean(b) => Value::Boolean(!b),
            other => unreachable!("checker guaranteed a boolean operand to `!`, found {other:?}"),
        },
    }
}

fn eval_binary(op: BinaryOp, l: Value, r: Value) -> Value {
    match op {
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Add | BinaryOp::Sub => {
            eval_arith(op, l, r)
        }
        BinaryOp::Lt => Value::Boolean(l < r),
        BinaryOp::Le => Value::Boolean(l <= r),
        BinaryOp::Gt => Value::Boolean(l > r),
        BinaryOp::Ge => Value::Boolean(l >= r),
        BinaryOp::Eq => Value::Boolean(l == r),
        BinaryOp::Ne => Value::Boolean(l != r),
        BinaryOp::And => Value::Boolean(as_bool(&l) && as_bool(&r)),
        BinaryOp::Or => Value::Boolean(as_bool(&l) || as_bool(&r)),
    }
}

fn as_bool(v: &Value) -> bool {
    match v {
        Value::Boolean(b) => *b,
        other => unreachable!("checker guaranteed a boolean operand, found {other:?}"),
    }
}

fn eval_arith(op: BinaryOp, l: Value, r: Value) -> Value {
    match (&l, &r) {
        (Value::Double(a), Value::Double(b)) => Value::Double(double_arith(op, *a, *b)),
        _ => {
            let ty = l.ty();
            let (min, max, signed) = int_bounds(&ty);
            let a = int_value(&l);
            let b = int_value(&r);
            let result = int_arith(op, a, b, min, max, signed);
            make_int(&ty, result)
        }
    }
}

/// `(min, max, signed)` for the eight integer-like kinds, widened into
/// `i128` so a single saturating implementation covers all of them —
/// `i128` comfortably holds every `u64`/`i64` value, so only
/// multiplication (whose product can exceed `i128::MAX` for two large
/// `u64` operands) needs an overflow check of its own.
fn int_bounds(ty: &VariantType) -> (i128, i128, bool) {
    match ty {
        VariantType::Byte => (0, u8::MAX as i128, false),
        VariantType::Int16 => (i16::MIN as i128, i16::MAX as i128, true),
        VariantType::Uint16 => (0, u16::MAX as i128, false),
        VariantType::Int32 => (i32::MIN as i128, i32::MAX as i128, true),
        VariantType::Uint32 => (0, u32::MAX as i128, false),
        VariantType::Int64 => (i64::MIN as i128, i64::MAX as i128, true),
        VariantType::Uint64 => (0, u64::MAX as i128, false),
        VariantType::UnixFd => (0, u32::MAX as i128, false),
        other => unreachable!("checker guaranteed an integer type, found {other:?}"),
    }
}

fn int_value(v: &Value) -> i128 {
    match v {
        Value::Byte(x) => *x as i128,
        Value::Int16(x) => *x as i128,
        Value::Uint16(x) => *x as i128,
        Value::Int32(x) => *x as i128,
        Value::Uint32(x) => *x as i128,
        Value::Int64(x) => *x as i128,
        Value::Uint64(x) => *x as i128,
        Value::UnixFd(x) => *x as i128,
        other => unreachable!("checker guaranteed an integer value, found {other:?}"),
    }
}

fn make_int(ty: &VariantType, n: i128) -> Value {
    match ty {
        VariantType::Byte => Value::Byte(n as u8),
        VariantType::Int16 => Value::Int16(n as i16),
        VariantType::Uint16 => Value::Uint16(n as u16),
        VariantType::Int32 => Value::Int32(n as i32),
        VariantType::Uint32 => Value::Uint32(n as u32),
        VariantType::Int64 => Value::Int64(n as i64),
        VariantType::Uint64 => Value::Uint64(n as u64),
        VariantType::UnixFd => Value::UnixFd(n as u32),
        other => unreachable!("checker guaranteed an integer type, found {other:?}"),
    }
}

/// Saturating integer arithmetic, per spec.md §4.5:
///
/// - `+`, `-`, `*` saturate at the type's bounds instead of wrapping.
/// - `/` truncates toward zero; `0 / 0 = 0`; any other `x / 0` saturates
///   toward the sign of `x` (unsigned types always saturate to `MAX`);
///   `MIN / -1` saturates to `MAX` rather than overflowing.
/// - `%` takes the sign of the dividend; `x % 0 = 0`.
fn int_arith(op: BinaryOp, a: i128, b: i128, min: i128, max: i128, signed: bool) -> i128 {
    match op {
        BinaryOp::Add => (a + b).clamp(min, max),
        BinaryOp::Sub => (a - b).clamp(min, max),
        BinaryOp::Mul => match a.checked_mul(b) {
            Some(p) => p.clamp(min, max),
            // Only reachable for two large `u64` operands, whose true
            // product is always positive and out of range.
            None => max,
        },
        BinaryOp::Div => {
            if b == 0 {
                if a == 0 {
                    0
                } else if !signed || a > 0 {
                    max
                } else {
                    min
                }
            } else if signed && a == min && b == -1 {
                max
            } else {
                a / b
            }
        }
        BinaryOp::Mod => {
            if b == 0 {
                0
            } else {
                let r = a.abs() % b.abs();
                if a < 0 {
                    -r
                } else {
                    r
                }
            }
        }
        other => unreachable!("{other:?} is not an arithmetic operator"),
    }
}

fn double_arith(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                0.0
            } else {
                a / b
            }
        }
        BinaryOp::Mod => {
            let ai = a.trunc() as i64 as i128;
            let bi = b.trunc() as i64 as i128;
            if bi == 0 {
                0.0
            } else {
                let r = ai.abs() % bi.abs();
                (if ai < 0 { -r } else { r }) as f64
            }
        }
        other => unreachable!("{other:?} is not an arithmetic operator"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::introspect::InterfaceInfo;

    fn span() -> Span {
        Span::new(1, 1, 0)
    }

    fn env() -> Environment {
        Environment::new(Vec::<InterfaceInfo>::new())
    }

    fn lit_i32(n: i32) -> DataLiteral {
        let lit = DataLiteral::new(DataLiteralKind::Integer(n.to_string()), span());
        *lit.inferred_ty.borrow_mut() = Some(VariantType::Int32);
        *lit.resolved.borrow_mut() = Some(Value::Int32(n));
        lit
    }

    fn bin(op: BinaryOp, lhs: i32, rhs: i32) -> Expression {
        Expression::Binary {
            op,
            lhs: Box::new(Expression::Literal(lit_i32(lhs))),
            rhs: Box::new(Expression::Literal(lit_i32(rhs))),
            span: span(),
        }
    }

    #[test]
    fn saturating_add_clamps_at_max() {
        let expr = bin(BinaryOp::Add, i32::MAX, 1);
        assert_eq!(eval(&expr, &env()).unwrap(), Value::Int32(i32::MAX));
    }

    #[test]
    fn saturating_sub_clamps_at_min() {
        let expr = bin(BinaryOp::Sub, i32::MIN, 1);
        assert_eq!(eval(&expr, &env()).unwrap(), Value::Int32(i32::MIN));
    }

    #[test]
    fn division_by_zero_of_zero_is_zero() {
        let expr = bin(BinaryOp::Div, 0, 0);
        assert_eq!(eval(&expr, &env()).unwrap(), Value::Int32(0));
    }

    #[test]
    fn division_by_zero_of_positive_saturates_to_max() {
        let expr = bin(BinaryOp::Div, 5, 0);
        assert_eq!(eval(&expr, &env()).unwrap(), Value::Int32(i32::MAX));
    }

    #[test]
    fn division_by_zero_of_negative_saturates_to_min() {
        let expr = bin(BinaryOp::Div, -5, 0);
        assert_eq!(eval(&expr, &env()).unwrap(), Value::Int32(i32::MIN));
    }

    #[test]
    fn min_divided_by_negative_one_saturates_to_max() {
        let expr = bin(BinaryOp::Div, i32::MIN, -1);
        assert_eq!(eval(&expr, &env()).unwrap(), Value::Int32(i32::MAX));
    }

    #[test]
    fn modulus_takes_dividend_sign() {
        let expr = bin(BinaryOp::Mod, -7, 2);
        assert_eq!(eval(&expr, &env()).unwrap(), Value::Int32(-1));
    }

    #[test]
    fn modulus_by_zero_is_zero() {
        let expr = bin(BinaryOp::Mod, 7, 0);
        assert_eq!(eval(&expr, &env()).unwrap(), Value::Int32(0));
    }

    #[test]
    fn uint64_multiplication_saturates_without_i128_overflow() {
        let lhs = DataLiteral::new(DataLiteralKind::Integer(u64::MAX.to_string()), span());
        *lhs.inferred_ty.borrow_mut() = Some(VariantType::Uint64);
        *lhs.resolved.borrow_mut() = Some(Value::Uint64(u64::MAX));
        let rhs = DataLiteral::new(DataLiteralKind::Integer("2".into()), span());
        *rhs.inferred_ty.borrow_mut() = Some(VariantType::Uint64);
        *rhs.resolved.borrow_mut() = Some(Value::Uint64(2));
        let expr = Expression::Binary {
            op: BinaryOp::Mul,
            lhs: Box::new(Expression::Literal(lhs)),
            rhs: Box::new(Expression::Literal(rhs)),
            span: span(),
        };
        assert_eq!(eval(&expr, &env()).unwrap(), Value::Uint64(u64::MAX));
    }

    #[test]
    fn double_division_by_zero_is_zero() {
        let lhs = DataLiteral::new(DataLiteralKind::Double(1.5), span());
        *lhs.resolved.borrow_mut() = Some(Value::Double(1.5));
        let rhs = DataLiteral::new(DataLiteralKind::Double(0.0), span());
        *rhs.resolved.borrow_mut() = Some(Value::Double(0.0));
        let expr = Expression::Binary {
            op: BinaryOp::Div,
            lhs: Box::new(Expression::Literal(lhs)),
            rhs: Box::new(Expression::Literal(rhs)),
            span: span(),
        };
        assert_eq!(eval(&expr, &env()).unwrap(), Value::Double(0.0));
    }

    #[test]
    fn undeclared_variable_is_an_error() {
        let lit = DataLiteral::new(DataLiteralKind::Variable("missing".into()), span());
        let expr = Expression::Literal(lit);
        assert!(eval(&expr, &env()).is_err());
    }
}
