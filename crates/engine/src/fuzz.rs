//! The structural fuzzer (C6): type-directed, weighted mutation of a
//! literal's evaluated value, per spec.md §4.6.
//!
//! Grounded in `dfsm-probabilities.c`'s non-uniform interval selector
//! (one uniform draw, then a linear scan subtracting interval widths)
//! and `dfsm-ast-data-structure.c`'s per-kind mutation tables from the
//! original C implementation this simulator's language is distilled
//! from; the concrete probabilities below are spec.md §4.6's.
//!
//! Fuzzing only ever applies to a literal expression directly (the `?`
//! weight suffix only parses after a primary expression, so it can only
//! ever attach to a [`DataLiteral`]); arithmetic, function calls and bare
//! variable reads are never fuzzed themselves, only the literal operands
//! they might contain.

use dbus_sim_core::object_path::OwnedObjectPath;
use dbus_sim_core::signature::SignatureBuf;
use rand::RngCore;
use tracing::warn;

use crate::ast::{DataLiteral, DataLiteralKind, Expression};
use crate::env::Environment;
use crate::eval;
use crate::value::{Value, VariantType};

/// Fuzz `value`, the already-evaluated result of `lit`, if `lit`'s
/// weight is positive and fuzzing is enabled. Returns `value` unchanged
/// otherwise (including for the non-fuzzable kinds — tuple, unix-fd,
/// variable — which log a warning instead).
pub fn fuzz(lit: &DataLiteral, value: Value, env: &Environment, rng: &mut dyn RngCore) -> Value {
    if lit.weight <= 0.0 {
        return value;
    }
    if !lit.is_fuzzable_leaf() && !matches!(lit.kind, DataLiteralKind::Array(_) | DataLiteralKind::Dict(_) | DataLiteralKind::Variant(_)) {
        warn!(kind = ?lit.kind, "fuzzing requested on a non-fuzzable literal; weight ignored");
        return value;
    }
    match (&lit.kind, value) {
        (_, Value::Byte(v)) => Value::Byte(fuzz_unsigned(v as u64, u8::MAX as u64, rng) as u8),
        (_, Value::Uint16(v)) => Value::Uint16(fuzz_unsigned(v as u64, u16::MAX as u64, rng) as u16),
        (_, Value::Uint32(v)) => Value::Uint32(fuzz_unsigned(v as u64, u32::MAX as u64, rng) as u32),
        (_, Value::Uint64(v)) => Value::Uint64(fuzz_unsigned(v, u64::MAX, rng)),
        (_, Value::Int16(v)) => {
            Value::Int16(fuzz_signed(v as i64, i16::MIN as i64, i16::MAX as i64, rng) as i16)
        }
        (_, Value::Int32(v)) => {
            Value::Int32(fuzz_signed(v as i64, i32::MIN as i64, i32::MAX as i64, rng) as i32)
        }
        (_, Value::Int64(v)) => Value::Int64(fuzz_signed(v, i64::MIN, i64::MAX, rng)),
        (_, Value::Boolean(b)) => Value::Boolean(fuzz_bool(b, rng)),
        (_, Value::Double(d)) => Value::Double(fuzz_double(d, rng)),
        (_, Value::String(s)) => Value::String(fuzz_string(&s, rng).into()),
        (_, Value::ObjectPath(p)) => Value::ObjectPath(fuzz_object_path(&p, rng)),
        (_, Value::Signature(s)) => Value::Signature(fuzz_signature(&s, rng)),
        (DataLiteralKind::Array(elems), Value::Array(elem_ty, items)) => {
            fuzz_array(elems, elem_ty, items, env, rng)
        }
        (DataLiteralKind::Dict(entries), Value::Dict(key_ty, val_ty, items)) => {
            fuzz_dict(entries, key_ty, val_ty, items, env, rng)
        }
        (DataLiteralKind::Variant(inner), Value::Variant(inner_val)) => {
            fuzz_variant(inner, *inner_val, env, rng)
        }
        (kind, other) => {
            warn!(?kind, value = %other, "fuzzing requested on a non-fuzzable literal; weight ignored");
            other
        }
    }
}

/// Draw one of `weights.len()` outcomes with probability proportional to
/// each entry, per `dfsm_random_nonuniform_distribution`: one uniform
/// draw over the total, then a linear scan subtracting interval widths.
/// Tolerant of `weights` summing to slightly more or less than `1.0`
/// (float rounding): the last arm always catches whatever the scan
/// didn't consume.
fn pick(weights: &[f64], rng: &mut dyn RngCore) -> usize {
    let total: f64 = weights.iter().sum();
    let mut x = rand::Rng::gen::<f64>(rng) * total;
    for (i, w) in weights.iter().enumerate() {
        if i == weights.len() - 1 || x < *w {
            return i;
        }
        x -= w;
    }
    weights.len() - 1
}

fn gen_range_u64(rng: &mut dyn RngCore, lo: u64, hi: u64) -> u64 {
    rand::Rng::gen_range(rng, lo..=hi)
}

fn gen_range_i64(rng: &mut dyn RngCore, lo: i64, hi: i64) -> i64 {
    rand::Rng::gen_range(rng, lo..=hi)
}

fn gen_bool(rng: &mut dyn RngCore, p: f64) -> bool {
    rand::Rng::gen_bool(rng, p.clamp(0.0, 1.0))
}

/// `SMALL [0,10]` 0.3, `DEFAULT` 0.3, `BOUNDARY {0, max}` 0.1, `LARGE`
/// uniform over the full range 0.3.
fn fuzz_unsigned(default: u64, max: u64, rng: &mut dyn RngCore) -> u64 {
    match pick(&[0.3, 0.3, 0.1, 0.3], rng) {
        0 => gen_range_u64(rng, 0, max.min(10)),
        1 => default,
        2 => {
            if gen_bool(rng, 0.5) {
                0
            } else {
                max
            }
        }
        _ => gen_range_u64(rng, 0, max),
    }
}

/// `SMALL [-5,5]` 0.3, `DEFAULT` 0.3, `BOUNDARY {min, max}` 0.1, `LARGE`
/// uniform over the full range 0.3.
fn fuzz_signed(default: i64, min: i64, max: i64, rng: &mut dyn RngCore) -> i64 {
    match pick(&[0.3, 0.3, 0.1, 0.3], rng) {
        0 => gen_range_i64(rng, (-5i64).max(min), 5i64.min(max)),
        1 => default,
        2 => {
            if gen_bool(rng, 0.5) {
                min
            } else {
                max
            }
        }
        _ => gen_range_i64(rng, min, max),
    }
}

/// `DEFAULT` 0.6, `FLIP` 0.4.
fn fuzz_bool(default: bool, rng: &mut dyn RngCore) -> bool {
    if gen_bool(rng, 0.6) {
        default
    } else {
        !default
    }
}

/// `SMALL [-5,5)` 0.3, `DEFAULT` 0.3, `LARGE` uniform over the finite
/// range 0.4. The large arm is drawn as a magnitude in `[0, f64::MAX]`
/// plus an independent sign, rather than `gen_range(-MAX..MAX)`, since
/// that width itself overflows to infinity.
fn fuzz_double(default: f64, rng: &mut dyn RngCore) -> f64 {
    match pick(&[0.3, 0.3, 0.4], rng) {
        0 => rand::Rng::gen_range(rng, -5.0..5.0),
        1 => default,
        _ => {
            let magnitude = rand::Rng::gen_range(rng, 0.0..=f64::MAX);
            if gen_bool(rng, 0.5) {
                magnitude
            } else {
                -magnitude
            }
        }
    }
}

const BLOCK_SEPARATORS: [char; 7] = ['/', '.', ':', ',', ';', '=', '\n'];

fn random_char(rng: &mut dyn RngCore) -> char {
    match pick(&[0.5, 0.4, 0.1], rng) {
        0 => (rand::Rng::gen_range(rng, 1u8..=127u8)) as char,
        1 => loop {
            let cp = rand::Rng::gen_range(rng, 1u32..=0x2_FFFF);
            if let Some(c) = char::from_u32(cp) {
                return c;
            }
        },
        _ => match rand::Rng::gen_range(rng, 0..4) {
            0 => char::from_u32(rand::Rng::gen_range(rng, 0xE000u32..=0xF8FF)).unwrap(),
            1 => char::from_u32(rand::Rng::gen_range(rng, 0xF_0000u32..=0xF_FFFD)).unwrap(),
            2 => char::from_u32(rand::Rng::gen_range(rng, 0x10_0000u32..=0x10_FFFD)).unwrap(),
            _ => '\u{FFFD}',
        },
    }
}

/// Byte-separator-aware block boundaries over a char buffer: offsets
/// right after each occurrence of a separator, falling back to every
/// codepoint offset when none is present. Always includes `0` and
/// `chars.len()`.
fn block_boundaries(chars: &[char]) -> Vec<usize> {
    let mut offsets: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| BLOCK_SEPARATORS.contains(c))
        .map(|(i, _)| i + 1)
        .collect();
    if offsets.is_empty() {
        offsets = (0..=chars.len()).collect();
    } else {
        if offsets.first() != Some(&0) {
            offsets.insert(0, 0);
        }
        if offsets.last() != Some(&chars.len()) {
            offsets.push(chars.len());
        }
    }
    offsets.dedup();
    offsets
}

fn random_block(chars: &[char], rng: &mut dyn RngCore) -> (usize, usize) {
    let offsets = block_boundaries(chars);
    if offsets.len() < 2 {
        return (0, chars.len());
    }
    let i = rand::Rng::gen_range(rng, 0..offsets.len() - 1);
    let j = rand::Rng::gen_range(rng, i + 1..offsets.len());
    (offsets[i], offsets[j])
}

fn case_flip_some(chars: &mut [char], rng: &mut dyn RngCore) {
    for c in chars.iter_mut() {
        if gen_bool(rng, 0.3) {
            *c = if c.is_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            };
        }
    }
}

fn replace_some_chars(chars: &mut [char], rng: &mut dyn RngCore) {
    for c in chars.iter_mut() {
        if gen_bool(rng, 0.3) {
            *c = random_char(rng);
        }
    }
}

fn delete_random_block(chars: &mut Vec<char>, rng: &mut dyn RngCore) {
    let (a, b) = random_block(chars, rng);
    chars.drain(a..b);
}

fn overwrite_random_block(chars: &mut [char], rng: &mut dyn RngCore) {
    let (a, b) = random_block(chars, rng);
    for c in chars[a..b].iter_mut() {
        *c = random_char(rng);
    }
}

fn clone_random_block(chars: &mut Vec<char>, rng: &mut dyn RngCore) {
    let (a, b) = random_block(chars, rng);
    let block: Vec<char> = chars[a..b].to_vec();
    chars.splice(b..b, block);
}

fn swap_random_blocks(chars: &mut Vec<char>, rng: &mut dyn RngCore) {
    let offsets = block_boundaries(chars);
    let n = offsets.len().saturating_sub(1);
    if n < 2 {
        return;
    }
    let i = rand::Rng::gen_range(rng, 0..n);
    let mut j = rand::Rng::gen_range(rng, 0..n);
    while j == i {
        j = rand::Rng::gen_range(rng, 0..n);
    }
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let (a1, b1) = (offsets[lo], offsets[lo + 1]);
    let (a2, b2) = (offsets[hi], offsets[hi + 1]);
    let block1: Vec<char> = chars[a1..b1].to_vec();
    let block2: Vec<char> = chars[a2..b2].to_vec();
    let mut out = Vec::with_capacity(chars.len());
    out.extend_from_slice(&chars[..a1]);
    out.extend_from_slice(&block2);
    out.extend_from_slice(&chars[b1..a2]);
    out.extend_from_slice(&block1);
    out.extend_from_slice(&chars[b2..]);
    *chars = out;
}

fn replace_chars_with_separators(chars: &mut [char], rng: &mut dyn RngCore) {
    for c in chars.iter_mut() {
        if gen_bool(rng, 0.2) {
            *c = BLOCK_SEPARATORS[rand::Rng::gen_range(rng, 0..BLOCK_SEPARATORS.len())];
        }
    }
}

/// One of seven structural edits to a non-empty string, then
/// independent 0.2 chances of a leading and/or trailing space.
fn fuzz_nonempty_string(s: &str, rng: &mut dyn RngCore) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    match pick(&[0.1, 0.2, 0.1, 0.2, 0.1, 0.2, 0.1], rng) {
        0 => case_flip_some(&mut chars, rng),
        1 => replace_some_chars(&mut chars, rng),
        2 => delete_random_block(&mut chars, rng),
        3 => overwrite_random_block(&mut chars, rng),
        4 => clone_random_block(&mut chars, rng),
        5 => swap_random_blocks(&mut chars, rng),
        _ => replace_chars_with_separators(&mut chars, rng),
    }
    let mut out: String = chars.into_iter().collect();
    if gen_bool(rng, 0.2) {
        out.insert(0, ' ');
    }
    if gen_bool(rng, 0.2) {
        out.push(' ');
    }
    out
}

fn random_unicode_string(rng: &mut dyn RngCore) -> String {
    let len = rand::Rng::gen_range(rng, 1..=256);
    (0..len).map(|_| random_char(rng)).collect()
}

/// Empty default: keep empty 0.6, else a random string of 1..=256
/// codepoints. Non-empty default: one of the seven structural edits.
fn fuzz_string(default: &str, rng: &mut dyn RngCore) -> String {
    if default.is_empty() {
        if gen_bool(rng, 0.6) {
            String::new()
        } else {
            random_unicode_string(rng)
        }
    } else {
        fuzz_nonempty_string(default, rng)
    }
}

/// `DEFAULT` 0.7, else append a random decimal digit group (`0..=99`) to
/// the path. Falls back to the default if the result doesn't validate
/// (appending digits to a path ending in a non-separator segment is
/// always valid, but this keeps the fuzzer from ever producing garbage).
fn fuzz_object_path(default: &OwnedObjectPath, rng: &mut dyn RngCore) -> OwnedObjectPath {
    if gen_bool(rng, 0.7) {
        return default.clone();
    }
    let suffix = rand::Rng::gen_range(rng, 0..=99);
    let mut text = default.as_str().to_string();
    text.push_str(&suffix.to_string());
    OwnedObjectPath::try_from(text.as_str()).unwrap_or_else(|_| default.clone())
}

const BASIC_CODES: [char; 11] = ['y', 'b', 'n', 'q', 'i', 'u', 'x', 't', 'd', 's', 'o'];

fn random_basic_code(rng: &mut dyn RngCore) -> char {
    BASIC_CODES[rand::Rng::gen_range(rng, 0..BASIC_CODES.len())]
}

fn random_signature_text(rng: &mut dyn RngCore, depth: u32) -> String {
    if depth == 0 {
        return random_basic_code(rng).to_string();
    }
    match pick(&[0.6, 0.1, 0.1, 0.1, 0.1], rng) {
        0 => random_basic_code(rng).to_string(),
        1 => "v".to_string(),
        2 => format!("a{}", random_signature_text(rng, depth - 1)),
        3 => {
            let n = rand::Rng::gen_range(rng, 0..=5);
            let inner: String = (0..n).map(|_| random_signature_text(rng, depth - 1)).collect();
            format!("({inner})")
        }
        _ => {
            let k = random_basic_code(rng);
            let v = random_signature_text(rng, depth - 1);
            format!("{{{k}{v}}}")
        }
    }
}

/// `DEFAULT` 0.6, else a freshly generated signature (basic 0.6, variant
/// 0.1, array 0.1, struct of 0..=5 members 0.1, dict entry 0.1),
/// recursing up to three container levels deep.
fn fuzz_signature(default: &SignatureBuf, rng: &mut dyn RngCore) -> SignatureBuf {
    if gen_bool(rng, 0.6) {
        return default.clone();
    }
    let text = random_signature_text(rng, 3);
    SignatureBuf::new(&text).unwrap_or_else(|_| default.clone())
}

/// Independently per element: delete with `min(1, 0.2w)`, clone with
/// `min(1, 0.2w)`, clone-and-mutate (only if the element is itself a
/// literal) with `min(1, 0.4w)`, where `w` is that element's own
/// expression weight. Additionally, empty the whole array with
/// probability `0.05` before considering any element.
fn fuzz_array(
    elems: &[Expression],
    elem_ty: VariantType,
    values: Vec<Value>,
    env: &Environment,
    rng: &mut dyn RngCore,
) -> Value {
    if gen_bool(rng, 0.05) {
        return Value::Array(elem_ty, Vec::new());
    }
    let mut out = Vec::with_capacity(values.len());
    for (expr, value) in elems.iter().zip(values.into_iter()) {
        let w = expr.weight();
        if gen_bool(rng, (0.2 * w).min(1.0)) {
            continue;
        }
        out.push(value.clone());
        if gen_bool(rng, (0.2 * w).min(1.0)) {
            out.push(value.clone());
        }
        if let Expression::Literal(child) = expr {
            if gen_bool(rng, (0.4 * w).min(1.0)) {
                out.push(fuzz(child, value, env, rng));
            }
        }
    }
    Value::Array(elem_ty, out)
}

/// Independently per entry: delete with `min(1, 0.2 w_k)`; otherwise keep
/// the original pair and, with `min(1, 0.6 w_k)`, additionally push a
/// cloned-and-mutated pair — mutating the key (if literal) and, with
/// `min(1, 0.5 w_v)`, also the value (if literal) — alongside it, rather
/// than overwriting it. Additionally, empty the whole dict with
/// probability `0.05`.
fn fuzz_dict(
    entries: &[(Expression, Expression)],
    key_ty: VariantType,
    val_ty: VariantType,
    values: Vec<(Value, Value)>,
    env: &Environment,
    rng: &mut dyn RngCore,
) -> Value {
    if gen_bool(rng, 0.05) {
        return Value::Dict(key_ty, val_ty, Vec::new());
    }
    let mut out = Vec::with_capacity(values.len());
    for ((k_expr, v_expr), (k_val, v_val)) in entries.iter().zip(values.into_iter()) {
        let wk = k_expr.weight();
        let wv = v_expr.weight();
        if gen_bool(rng, (0.2 * wk).min(1.0)) {
            continue;
        }
        out.push((k_val.clone(), v_val.clone()));
        if gen_bool(rng, (0.6 * wk).min(1.0)) {
            let mut new_key = k_val;
            let mut new_val = v_val;
            if let Expression::Literal(k_lit) = k_expr {
                new_key = fuzz(k_lit, new_key, env, rng);
            }
            if gen_bool(rng, (0.5 * wv).min(1.0)) {
                if let Expression::Literal(v_lit) = v_expr {
                    new_val = fuzz(v_lit, new_val, env, rng);
                }
            }
            out.push((new_key, new_val));
        }
    }
    Value::Dict(key_ty, val_ty, out)
}

/// With probability `0.2`, replace the wrapped value with a value of a
/// different basic type (a `u32` payload becomes a fuzzed string;
/// anything else becomes a fuzzed `u32`); otherwise keep the payload's
/// own kind and recurse into the inner literal's own weight, if it has
/// one.
fn fuzz_variant(
    inner_expr: &Expression,
    inner_value: Value,
    env: &Environment,
    rng: &mut dyn RngCore,
) -> Value {
    if gen_bool(rng, 0.2) {
        let replaced = match &inner_value {
            Value::Uint32(_) => Value::String(fuzz_string("", rng).into()),
            _ => Value::Uint32(fuzz_unsigned(0, u32::MAX as u64, rng) as u32),
        };
        return Value::Variant(Box::new(replaced));
    }
    let fuzzed_inner = if let Expression::Literal(inner_lit) = inner_expr {
        fuzz(inner_lit, inner_value, env, rng)
    } else {
        inner_value
    };
    Value::Variant(Box::new(fuzzed_inner))
}

/// Evaluate `expr` and, if `config.fuzz_enabled` and `expr` is a
/// weighted literal, fuzz the result before returning it. The one entry
/// point statement execution (`crate::exec`) uses to get a value that
/// may have been structurally mutated.
pub fn eval_and_fuzz(
    expr: &Expression,
    env: &Environment,
    fuzz_enabled: bool,
    rng: &mut dyn RngCore,
) -> Result<Value, eval::EvalError> {
    let value = eval::eval(expr, env)?;
    if !fuzz_enabled {
        return Ok(value);
    }
    Ok(match expr {
        Expression::Literal(lit) if lit.weight > 0.0 => fuzz(lit, value, env, rng),
        _ => value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(42)
    }

    #[test]
    fn fuzz_unsigned_stays_within_bounds() {
        let mut r = rng();
        for _ in 0..2000 {
            let v = fuzz_unsigned(5, 100, &mut r);
            assert!(v <= 100);
        }
    }

    #[test]
    fn fuzz_signed_stays_within_bounds() {
        let mut r = rng();
        for _ in 0..2000 {
            let v = fuzz_signed(0, -50, 50, &mut r);
            assert!((-50..=50).contains(&v));
        }
    }

    #[test]
    fn fuzz_signed_handles_full_i64_range_without_panicking() {
        let mut r = rng();
        for _ in 0..2000 {
            let v = fuzz_signed(0, i64::MIN, i64::MAX, &mut r);
            assert!(v >= i64::MIN && v <= i64::MAX);
        }
    }

    #[test]
    fn fuzz_double_never_produces_nan_or_infinite() {
        let mut r = rng();
        for _ in 0..2000 {
            let v = fuzz_double(1.5, &mut r);
            assert!(v.is_finite());
        }
    }

    #[test]
    fn fuzz_string_is_always_valid_utf8() {
        let mut r = rng();
        for _ in 0..500 {
            let s = fuzz_string("hello/world", &mut r);
            // `String` is always valid UTF-8 by construction; this just
            // exercises every mutation arm without panicking.
            let _ = s.len();
        }
        for _ in 0..500 {
            let s = fuzz_string("", &mut r);
            let _ = s.len();
        }
    }

    #[test]
    fn fuzz_object_path_always_produces_a_valid_path() {
        let default = OwnedObjectPath::try_from("/org/example/Thing").unwrap();
        let mut r = rng();
        for _ in 0..500 {
            let _ = fuzz_object_path(&default, &mut r);
        }
    }

    #[test]
    fn fuzz_signature_always_produces_a_valid_signature() {
        let default = SignatureBuf::new("u").unwrap();
        let mut r = rng();
        for _ in 0..500 {
            let _ = fuzz_signature(&default, &mut r);
        }
    }

    #[test]
    fn fuzz_array_length_is_bounded() {
        use crate::error::Span;

        let span = Span::new(1, 1, 0);
        let elems: Vec<Expression> = (0..3)
            .map(|i| {
                let lit = DataLiteral::new(DataLiteralKind::Integer(i.to_string()), span);
                *lit.inferred_ty.borrow_mut() = Some(VariantType::Int32);
                *lit.resolved.borrow_mut() = Some(Value::Int32(i));
                Expression::Literal(lit)
            })
            .collect();
        let values = vec![Value::Int32(0), Value::Int32(1), Value::Int32(2)];
        let env = Environment::new(Vec::new());
        let mut r = rng();
        for _ in 0..500 {
            let fuzzed = fuzz_array(&elems, VariantType::Int32, values.clone(), &env, &mut r);
            if let Value::Array(_, items) = fuzzed {
                assert!(items.len() <= 3 * values.len() + 1);
            } else {
                panic!("expected an array value");
            }
        }
    }

    #[test]
    fn fuzz_dict_clone_and_mutate_grows_rather_than_replaces() {
        use crate::error::Span;

        let span = Span::new(1, 1, 0);
        let key_lit = DataLiteral::new(DataLiteralKind::String("k".into()), span);
        *key_lit.inferred_ty.borrow_mut() = Some(VariantType::String);
        *key_lit.resolved.borrow_mut() = Some(Value::String("k".into()));
        let mut val_lit = DataLiteral::new(DataLiteralKind::String("v".into()), span);
        val_lit.weight = 2.0;
        *val_lit.inferred_ty.borrow_mut() = Some(VariantType::String);
        *val_lit.resolved.borrow_mut() = Some(Value::String("v".into()));

        let mut key_expr = key_lit;
        key_expr.weight = 2.0;
        let entries = vec![(Expression::Literal(key_expr), Expression::Literal(val_lit))];
        let values = vec![(Value::String("k".into()), Value::String("v".into()))];
        let env = Environment::new(Vec::new());

        // weight 2.0 saturates `min(1, 0.6w)` (clone-and-mutate) to
        // probability 1, but `min(1, 0.2w)` (delete) only reaches 0.4 —
        // it can still fire per entry. Rather than assume one seed dodges
        // it, run many seeds and only assert on the ones that don't: a
        // kept entry must always grow to 2 (the original plus the
        // clone), never shrink to 1 (which would mean the mutated pair
        // overwrote the original instead of joining it).
        let mut saw_a_kept_entry = false;
        for seed in 0..200u64 {
            let mut r = rand::rngs::StdRng::seed_from_u64(seed);
            let fuzzed = fuzz_dict(
                &entries,
                VariantType::String,
                VariantType::String,
                values.clone(),
                &env,
                &mut r,
            );
            let Value::Dict(_, _, out) = fuzzed else {
                panic!("expected a dict value");
            };
            match out.len() {
                0 => continue,
                2 => {
                    saw_a_kept_entry = true;
                    assert_eq!(out[0], values[0], "the original pair must survive unmodified");
                }
                n => panic!("clone-and-mutate must add a pair, not overwrite it (got {n} entries)"),
            }
        }
        assert!(saw_a_kept_entry, "no seed in range kept the entry; widen the seed range");
    }

    #[test]
    fn pick_respects_a_zero_weight_arm() {
        let mut r = rng();
        for _ in 0..1000 {
            assert_ne!(pick(&[0.0, 1.0, 0.0], &mut r), 0);
        }
    }

    #[test]
    fn fuzz_bool_can_flip_and_can_keep_the_default() {
        let mut r = rng();
        let mut seen_true = false;
        let mut seen_false = false;
        for _ in 0..200 {
            match fuzz_bool(true, &mut r) {
                true => seen_true = true,
                false => seen_false = true,
            }
        }
        assert!(seen_true && seen_false);
    }
}
