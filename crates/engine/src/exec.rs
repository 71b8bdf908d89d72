//! The statement executor (C7): runs `Assign`/`Emit`/`Reply`/`Throw`
//! against an environment and an [`OutputSequence`], per spec.md §4.7.
//!
//! Two behaviours here are deliberately preserved rather than
//! "improved", per Design Notes and DESIGN.md:
//!
//! - dict-lhs assignment leaves lhs-only keys unchanged and silently
//!   drops rhs-only keys;
//! - a runtime warning partway through a statement list does not abort
//!   the remaining statements (the caller, `crate::machine`, still
//!   commits the state transition).

use rand::RngCore;
use tracing::warn;

use crate::ast::{DataLiteral, DataLiteralKind, Expression, Statement};
use crate::env::{Environment, Scope};
use crate::error::RuntimeWarning;
use crate::fuzz;
use crate::introspect::InterfaceInfo;
use crate::output::OutputSequence;
use crate::value::Value;

/// Whether the enclosing transition was triggered by a method call
/// (`reply` is only meaningful there) and, if so, which method —
/// needed only for diagnostics.
#[derive(Debug, Clone, Copy)]
pub enum ExecContext<'a> {
    Method { name: &'a str },
    Property { name: &'a str },
    Arbitrary,
}

impl ExecContext<'_> {
    fn is_method(&self) -> bool {
        matches!(self, ExecContext::Method { .. })
    }
}

/// Run every statement in `statements`, in order, against `env` and
/// `out`. Never returns an error: runtime faults are logged as
/// [`RuntimeWarning`]s and execution continues with the next statement,
/// per spec.md §7 ("a transition that fails mid-execution ... logs a
/// warning ... partial side effects already queued remain").
pub fn exec_statements(
    statements: &[Statement],
    env: &mut Environment,
    interfaces: &[InterfaceInfo],
    ctx: ExecContext<'_>,
    fuzz_enabled: bool,
    rng: &mut dyn RngCore,
    out: &mut dyn OutputSequence,
) {
    for stmt in statements {
        exec_statement(stmt, env, interfaces, ctx, fuzz_enabled, rng, out);
    }
}

fn exec_statement(
    stmt: &Statement,
    env: &mut Environment,
    interfaces: &[InterfaceInfo],
    ctx: ExecContext<'_>,
    fuzz_enabled: bool,
    rng: &mut dyn RngCore,
    out: &mut dyn OutputSequence,
) {
    match stmt {
        Statement::Assign { lhs, rhs, .. } => {
            match fuzz::eval_and_fuzz(rhs, env, fuzz_enabled, rng) {
                Ok(value) => assign(lhs, value, env),
                Err(e) => warn!(error = %e, "assignment right-hand side failed to evaluate; statement skipped"),
            }
        }
        Statement::Emit {
            signal_name, value, ..
        } => {
            let Some(interface) = interfaces.iter().find(|i| i.signal(signal_name).is_some()) else {
                let warning = RuntimeWarning::UnknownSignal {
                    name: signal_name.as_str().into(),
                };
                warn!(%warning);
                return;
            };
            match fuzz::eval_and_fuzz(value, env, fuzz_enabled, rng) {
                Ok(v) => out.add_emit(interface.name.to_string(), signal_name.clone(), v),
                Err(e) => warn!(error = %e, "emit value failed to evaluate; statement skipped"),
            }
        }
        Statement::Reply { value, .. } => {
            if !ctx.is_method() {
                let warning = RuntimeWarning::ReplyOutsideMethodContext;
                warn!(%warning);
                return;
            }
            match fuzz::eval_and_fuzz(value, env, fuzz_enabled, rng) {
                Ok(v) => out.add_reply(v),
                Err(e) => warn!(error = %e, "reply value failed to evaluate; statement skipped"),
            }
        }
        Statement::Throw { error_name, .. } => {
            out.add_throw(error_name.clone(), synthesise_message(error_name));
        }
    }
}

/// Produce the message text accompanying a thrown D-Bus error. The
/// simulation language carries no user-authored message text (only the
/// error name), so one is synthesised from the name, matching the
/// original implementation's `dfsm_ast_statement_throw_execute`.
pub(crate) fn synthesise_message(error_name: &str) -> String {
    format!("simulated error: {error_name}")
}

/// Assign `value` to the constructor tree `lhs`, per spec.md §4.7.
/// `lhs` is guaranteed by `check::check_lvalue` to be a variable, or an
/// array/tuple/dict of constructors bottoming out in variables — this
/// walk never needs to fail.
fn assign(lhs: &DataLiteral, value: Value, env: &mut Environment) {
    match (&lhs.kind, value) {
        (DataLiteralKind::Variable(name), value) => {
            let scope = env.scope_of(name).unwrap_or(Scope::Object);
            env.set_value(scope, name, value);
        }
        (DataLiteralKind::Array(lhs_elems), Value::Array(_, rhs_items)) => {
            if lhs_elems.len() != rhs_items.len() {
                warn!(
                    lhs_len = lhs_elems.len(),
                    rhs_len = rhs_items.len(),
                    "array assignment length mismatch; statement skipped"
                );
                return;
            }
            for (lhs_elem, rhs_item) in lhs_elems.iter().zip(rhs_items) {
                if let Expression::Literal(child) = lhs_elem {
                    assign(child, rhs_item, env);
                }
            }
        }
        (DataLiteralKind::Tuple(lhs_elems), Value::Tuple(rhs_items)) => {
            if lhs_elems.len() != rhs_items.len() {
                warn!(
                    lhs_len = lhs_elems.len(),
                    rhs_len = rhs_items.len(),
                    "tuple assignment length mismatch; statement skipped"
                );
                return;
            }
            for (lhs_elem, rhs_item) in lhs_elems.iter().zip(rhs_items) {
                if let Expression::Literal(child) = lhs_elem {
                    assign(child, rhs_item, env);
                }
            }
        }
        (DataLiteralKind::Dict(lhs_entries), Value::Dict(_, _, rhs_entries)) => {
            assign_dict(lhs_entries, rhs_entries, env);
        }
        (kind, value) => {
            warn!(?kind, value = %value, "assignment left-hand side shape did not match the evaluated value; statement skipped");
        }
    }
}

/// Dict-lhs assignment: evaluate each lhs key expression once, building
/// a `key -> lhs variable` map; then, for every rhs entry whose key
/// appears in that map, assign its value to the matching variable.
///
/// Preserved open-question behaviour (spec.md §9): lhs keys absent from
/// the rhs are left with their previous value; rhs keys absent from the
/// lhs are silently dropped. This asymmetry is the original
/// implementation's behaviour, not a deliberate design choice of ours —
/// see DESIGN.md.
fn assign_dict(lhs_entries: &[(Expression, Expression)], rhs_entries: Vec<(Value, Value)>, env: &mut Environment) {
    let mut by_key: Vec<(Value, &Expression)> = Vec::with_capacity(lhs_entries.len());
    for (key_expr, val_expr) in lhs_entries {
        match crate::eval::eval(key_expr, env) {
            Ok(key) => by_key.push((key, val_expr)),
            Err(e) => {
                warn!(error = %e, "dict assignment key failed to evaluate; entry skipped");
            }
        }
    }

    for (rhs_key, rhs_value) in rhs_entries {
        if let Some((_, lhs_val_expr)) = by_key.iter().find(|(k, _)| *k == rhs_key) {
            if let Expression::Literal(child) = lhs_val_expr {
                assign(child, rhs_value, env);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::output::{Event, RecordingSequence};
    use crate::value::VariantType;
    use rand::SeedableRng;

    fn span() -> Span {
        Span::new(1, 1, 0)
    }

    fn var_lit(name: &str) -> DataLiteral {
        DataLiteral::new(DataLiteralKind::Variable(name.into()), span())
    }

    fn int_expr(n: i32) -> Expression {
        let lit = DataLiteral::new(DataLiteralKind::Integer(n.to_string()), span());
        *lit.inferred_ty.borrow_mut() = Some(VariantType::Int32);
        *lit.resolved.borrow_mut() = Some(Value::Int32(n));
        Expression::Literal(lit)
    }

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(0)
    }

    #[test]
    fn assign_sets_object_variable() {
        let mut env = Environment::new(Vec::new());
        env.set_type(Scope::Object, "counter", VariantType::Int32);
        env.set_value(Scope::Object, "counter", Value::Int32(0));

        let lhs = var_lit("counter");
        let rhs = int_expr(41);
        let stmt = Statement::Assign {
            lhs,
            rhs,
            span: span(),
        };
        let mut out = RecordingSequence::new();
        exec_statements(
            std::slice::from_ref(&stmt),
            &mut env,
            &[],
            ExecContext::Arbitrary,
            false,
            &mut rng(),
            &mut out,
        );
        assert_eq!(env.get_value(Scope::Object, "counter"), Some(&Value::Int32(41)));
    }

    #[test]
    fn reply_outside_method_context_is_skipped() {
        let mut env = Environment::new(Vec::new());
        let stmt = Statement::Reply {
            value: int_expr(1),
            span: span(),
        };
        let mut out = RecordingSequence::new();
        exec_statements(
            std::slice::from_ref(&stmt),
            &mut env,
            &[],
            ExecContext::Arbitrary,
            false,
            &mut rng(),
            &mut out,
        );
        assert!(out.events().is_empty());
    }

    #[test]
    fn reply_inside_method_context_is_recorded() {
        let mut env = Environment::new(Vec::new());
        let stmt = Statement::Reply {
            value: int_expr(7),
            span: span(),
        };
        let mut out = RecordingSequence::new();
        exec_statements(
            std::slice::from_ref(&stmt),
            &mut env,
            &[],
            ExecContext::Method { name: "Echo" },
            false,
            &mut rng(),
            &mut out,
        );
        assert_eq!(out.events(), &[Event::Reply(Value::Int32(7))]);
    }

    #[test]
    fn throw_synthesises_a_message() {
        let mut env = Environment::new(Vec::new());
        let stmt = Statement::Throw {
            error_name: "org.example.Err".into(),
            span: span(),
        };
        let mut out = RecordingSequence::new();
        exec_statements(
            std::slice::from_ref(&stmt),
            &mut env,
            &[],
            ExecContext::Method { name: "Echo" },
            false,
            &mut rng(),
            &mut out,
        );
        assert_eq!(
            out.events(),
            &[Event::Throw {
                error_name: "org.example.Err".into(),
                message: synthesise_message("org.example.Err"),
            }]
        );
    }

    #[test]
    fn dict_assignment_leaves_lhs_only_keys_untouched_and_drops_rhs_only_keys() {
        let mut env = Environment::new(Vec::new());
        env.set_type(Scope::Object, "a", VariantType::Int32);
        env.set_value(Scope::Object, "a", Value::Int32(1));
        env.set_type(Scope::Object, "b", VariantType::Int32);
        env.set_value(Scope::Object, "b", Value::Int32(2));

        let lhs_entries = vec![
            (int_expr(10), Expression::Literal(var_lit("a"))),
            (int_expr(20), Expression::Literal(var_lit("b"))),
        ];
        let lhs = DataLiteral::new(DataLiteralKind::Dict(lhs_entries), span());

        // rhs has key 10 (matches `a`) and key 30 (matches nothing on
        // the lhs); key 20 (which would match `b`) is simply absent.
        let rhs_value = Value::Dict(
            VariantType::Int32,
            VariantType::Int32,
            vec![(Value::Int32(10), Value::Int32(100)), (Value::Int32(30), Value::Int32(300))],
        );

        assign(&lhs, rhs_value, &mut env);

        assert_eq!(env.get_value(Scope::Object, "a"), Some(&Value::Int32(100)));
        assert_eq!(env.get_value(Scope::Object, "b"), Some(&Value::Int32(2)));
    }
}
