//! The transition selector and `Machine` (C8): the heart of the
//! simulation, per spec.md §4.8.
//!
//! A `Machine` owns one object's environment, its indexed transitions,
//! and a per-machine RNG (Design Note 3 — no process-wide statics; two
//! machines built with the same seed and program make identical
//! choices).

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::ast::{Precondition, Statement, Trigger};
use crate::check::{CheckedObject, ResolvedEdge};
use crate::config::EngineConfig;
use crate::env::{Environment, Scope, Snapshot};
use crate::error::RuntimeWarning;
use crate::exec::{self, ExecContext};
use crate::output::OutputSequence;
use crate::value::Value;

/// The three-way policy a transition's precondition list resolves to,
/// per Design Note 9 (the source signals this via a side-channel
/// `GError`; here it's the return type itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionCheck {
    Ok,
    FailedSilently,
    FailedWithDBusError(String),
}

fn check_preconditions(preconditions: &[Precondition], env: &Environment) -> PreconditionCheck {
    for pre in preconditions {
        if eval_condition(pre, env) {
            continue;
        }
        return match &pre.error_name {
            Some(name) => PreconditionCheck::FailedWithDBusError(name.clone()),
            None => PreconditionCheck::FailedSilently,
        };
    }
    PreconditionCheck::Ok
}

fn eval_condition(pre: &Precondition, env: &Environment) -> bool {
    match crate::eval::eval(&pre.condition, env) {
        Ok(Value::Boolean(b)) => b,
        Ok(_) => {
            warn!("precondition did not evaluate to a boolean; treated as failing");
            false
        }
        Err(e) => {
            warn!(error = %e, "precondition failed to evaluate; treated as failing");
            false
        }
    }
}

fn contains_throw(statements: &[Statement]) -> bool {
    statements.iter().any(|s| matches!(s, Statement::Throw { .. }))
}

/// Outcome of one run through the §4.8 selection algorithm, before the
/// per-context "none" fallback (default reply / property fallthrough /
/// no-op tick) is applied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionOutcome {
    Executed,
    ExecutedAsError,
    None,
}

/// A host hook run against every in-state candidate before the cyclic
/// scan (step 2 of §4.8); by default every candidate is accepted.
pub type CandidateFilter<'a> = dyn Fn(&ResolvedEdge) -> bool + 'a;

fn accept_all(_edge: &ResolvedEdge) -> bool {
    true
}

/// One loaded object's EFSM: environment, indexed transitions, current
/// state, and RNG.
pub struct Machine {
    env: Environment,
    states: Vec<String>,
    state: usize,
    edges: Vec<ResolvedEdge>,
    method_index: HashMap<String, Vec<usize>>,
    property_index: HashMap<String, Vec<usize>>,
    arbitrary: Vec<usize>,
    config: EngineConfig,
    rng: StdRng,
    initial_snapshot: Snapshot,
}

impl Machine {
    pub fn new(checked: CheckedObject, config: EngineConfig) -> Self {
        let mut method_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut property_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut arbitrary = Vec::new();

        for (i, edge) in checked.edges.iter().enumerate() {
            match &edge.definition.trigger {
                Trigger::MethodCall(name) => method_index.entry(name.clone()).or_default().push(i),
                Trigger::PropertySet(name) => property_index.entry(name.clone()).or_default().push(i),
                Trigger::Arbitrary => arbitrary.push(i),
            }
        }

        let initial_snapshot = checked.env.snapshot();
        let rng = StdRng::seed_from_u64(config.rng_seed);

        Self {
            env: checked.env,
            states: checked.states,
            state: checked.default_state,
            edges: checked.edges,
            method_index,
            property_index,
            arbitrary,
            config,
            rng,
            initial_snapshot,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    pub fn current_state(&self) -> usize {
        self.state
    }

    pub fn current_state_name(&self) -> &str {
        &self.states[self.state]
    }

    /// Restore state 0 and the environment taken at construction time
    /// (spec.md §3 "Machine").
    pub fn reset(&mut self) {
        self.state = 0;
        self.env.reset_to_snapshot(&self.initial_snapshot);
    }

    /// Drive a method call: binds the method's input arguments into the
    /// local scope, runs the selector, and synthesises a default empty
    /// reply if no transition executed (spec.md §4.8 step 5).
    pub fn handle_method_call(&mut self, method_name: &str, args: &[Value], out: &mut dyn OutputSequence) {
        self.handle_method_call_filtered(method_name, args, &accept_all, out)
    }

    pub fn handle_method_call_filtered(
        &mut self,
        method_name: &str,
        args: &[Value],
        filter: &CandidateFilter<'_>,
        out: &mut dyn OutputSequence,
    ) {
        let method = self.env.interfaces().iter().find_map(|i| i.method(method_name)).cloned();

        let Some(method) = method else {
            let warning = RuntimeWarning::UnknownMethod {
                member: method_name.into(),
            };
            warn!(%warning);
            out.add_reply(Value::Tuple(Vec::new()));
            return;
        };

        if method.in_args.len() != args.len() {
            let warning = RuntimeWarning::MismatchedInArgCount {
                method: method_name.into(),
                expected: method.in_args.len(),
                got: args.len(),
            };
            warn!(%warning);
        }

        let mut bound = Vec::new();
        for (arg, value) in method.in_args.iter().zip(args.iter()) {
            if let Some(name) = &arg.name {
                self.env.set_type(Scope::Local, name, arg.ty.clone());
                self.env.set_value(Scope::Local, name, value.clone());
                bound.push(name.clone());
            }
        }

        let candidates = self.method_index.get(method_name).cloned().unwrap_or_default();
        let outcome = self.select(&candidates, ExecContext::Method { name: method_name }, filter, out);

        for name in &bound {
            self.env.remove(Scope::Local, name);
        }

        if outcome == SelectionOutcome::None {
            let warning = RuntimeWarning::NoTransitionExecuted { context: "method call" };
            warn!(%warning);
            out.add_reply(Value::Tuple(Vec::new()));
        }
    }

    /// Drive a property set: binds `value` in the local scope, runs the
    /// selector, and falls through to a direct property update if no
    /// transition executed (spec.md §4.8 step 6).
    pub fn handle_property_set(&mut self, property_name: &str, new_value: Value, out: &mut dyn OutputSequence) {
        self.handle_property_set_filtered(property_name, new_value, &accept_all, out)
    }

    pub fn handle_property_set_filtered(
        &mut self,
        property_name: &str,
        new_value: Value,
        filter: &CandidateFilter<'_>,
        out: &mut dyn OutputSequence,
    ) {
        let property = self.env.interfaces().iter().find_map(|i| i.property(property_name)).cloned();

        let Some(property) = property else {
            let warning = RuntimeWarning::UnknownMethod {
                member: property_name.into(),
            };
            warn!(%warning);
            return;
        };

        self.env.set_type(Scope::Local, "value", property.ty.clone());
        self.env.set_value(Scope::Local, "value", new_value.clone());

        let candidates = self.property_index.get(property_name).cloned().unwrap_or_default();
        let outcome = self.select(&candidates, ExecContext::Property { name: property_name }, filter, out);

        self.env.remove(Scope::Local, "value");

        if outcome == SelectionOutcome::None {
            let current = self.env.get_value(Scope::Object, property_name).cloned();
            if current.as_ref() != Some(&new_value) {
                self.env.set_value(Scope::Object, property_name, new_value);
            }
        }
    }

    /// Answer a property read directly from the bound object-scope
    /// variable. There is no selector step for this (spec.md's trigger
    /// list has no "property get" trigger — a read has no transition to
    /// fire), so this isn't routed through `select`; it's a direct
    /// lookup, per SPEC_FULL.md's C9 section.
    pub fn handle_property_get(&self, property_name: &str) -> Option<&Value> {
        self.env.get_value(Scope::Object, property_name)
    }

    /// Drive one arbitrary ("random"/timer) tick. A `None` outcome does
    /// nothing (spec.md §4.8 step 7).
    pub fn handle_tick(&mut self, out: &mut dyn OutputSequence) {
        self.handle_tick_filtered(&accept_all, out)
    }

    pub fn handle_tick_filtered(&mut self, filter: &CandidateFilter<'_>, out: &mut dyn OutputSequence) {
        let candidates = self.arbitrary.clone();
        let _ = self.select(&candidates, ExecContext::Arbitrary, filter, out);
    }

    /// The selection algorithm itself, spec.md §4.8 steps 1-4.
    fn select(
        &mut self,
        candidate_indices: &[usize],
        ctx: ExecContext<'_>,
        filter: &CandidateFilter<'_>,
        out: &mut dyn OutputSequence,
    ) -> SelectionOutcome {
        let candidates: Vec<usize> = candidate_indices
            .iter()
            .copied()
            .filter(|&i| self.edges[i].from_state == self.state)
            .filter(|&i| filter(&self.edges[i]))
            .collect();

        if candidates.is_empty() {
            return SelectionOutcome::None;
        }

        let offset = rand::Rng::gen_range(&mut self.rng, 0..candidates.len());
        let mut first_error_candidate: Option<usize> = None;
        let mut throw_candidate: Option<usize> = None;

        for step in 0..candidates.len() {
            let idx = candidates[(offset + step) % candidates.len()];
            let def = self.edges[idx].definition.clone();

            match check_preconditions(&def.preconditions, &self.env) {
                PreconditionCheck::FailedWithDBusError(_) => {
                    if first_error_candidate.is_none() {
                        first_error_candidate = Some(idx);
                    }
                    continue;
                }
                PreconditionCheck::FailedSilently => continue,
                PreconditionCheck::Ok => {}
            }

            if contains_throw(&def.statements) && self.config.fuzz_enabled && rand::Rng::gen_bool(&mut self.rng, 0.8) {
                if throw_candidate.is_none() {
                    throw_candidate = Some(idx);
                }
                continue;
            }

            self.execute_edge(idx, ctx, out);
            return SelectionOutcome::Executed;
        }

        if let Some(idx) = first_error_candidate {
            let def = self.edges[idx].definition.clone();
            if let Some(pre) = def.preconditions.iter().find(|p| !eval_condition(p, &self.env)) {
                if let Some(name) = &pre.error_name {
                    out.add_throw(name.clone(), exec::synthesise_message(name));
                }
            }
            return SelectionOutcome::ExecutedAsError;
        }

        if let Some(idx) = throw_candidate {
            self.execute_edge(idx, ctx, out);
            return SelectionOutcome::Executed;
        }

        SelectionOutcome::None
    }

    /// Run one edge's statements and, unless they contain a `throw`
    /// (which never advances the machine, regardless of which path in
    /// the selector reached it — spec.md §4.8), move to its `to_state`.
    fn execute_edge(&mut self, idx: usize, ctx: ExecContext<'_>, out: &mut dyn OutputSequence) {
        let edge_to_state = self.edges[idx].to_state;
        let def = self.edges[idx].definition.clone();
        let interfaces = self.env.interfaces().to_vec();

        exec::exec_statements(
            &def.statements,
            &mut self.env,
            &interfaces,
            ctx,
            self.config.fuzz_enabled,
            &mut self.rng,
            out,
        );

        if !contains_throw(&def.statements) {
            self.state = edge_to_state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{check, pre_check_and_register, sanity_check};
    use crate::output::{Event, RecordingSequence};
    use crate::parser::parse_program;

    fn build(src: &str, xml: &str) -> Machine {
        let program = parse_program(src).unwrap();
        let node = dbus_sim_xml::parse_interface(xml).unwrap();
        let decl = &program.objects[0];
        sanity_check(decl);
        let checked = pre_check_and_register(decl, &node).unwrap();
        check(&checked, decl).unwrap();
        Machine::new(checked, EngineConfig { fuzz_enabled: false, rng_seed: 1 })
    }

    fn echo_xml() -> &'static str {
        r#"<node>
            <interface name="org.example.Thing">
                <method name="Echo">
                    <arg name="value" type="s" direction="in"/>
                    <arg name="value" type="s" direction="out"/>
                </method>
                <method name="Divide">
                    <arg name="a" type="i" direction="in"/>
                    <arg name="b" type="i" direction="in"/>
                    <arg name="result" type="i" direction="out"/>
                </method>
                <property name="counter" type="u" access="readwrite"/>
                <property name="arbitrary" type="s" access="readwrite"/>
            </interface>
        </node>"#
    }

    /// Seed scenario 1: method happy path.
    #[test]
    fn method_happy_path_replies_with_no_state_change() {
        let src = r#"
            object at "/a" implements org.example.Thing {
                states { Main; }
                transition from Main to Main on method Echo {
                    reply (value);
                }
            }
        "#;
        let mut m = build(src, echo_xml());
        let mut out = RecordingSequence::new();
        m.handle_method_call("Echo", &[Value::String("hi".into())], &mut out);
        assert_eq!(out.events(), &[Event::Reply(Value::String("hi".into()))]);
        assert_eq!(m.current_state(), 0);
    }

    /// Seed scenario 2: precondition throw.
    #[test]
    fn precondition_throw_yields_a_single_throw_event() {
        let src = r#"
            object at "/a" implements org.example.Thing {
                states { Main; }
                transition from Main to Main on method Divide {
                    precondition throwing org.example.DivByZero { b != 0 }
                    reply (a / b);
                }
            }
        "#;
        let mut m = build(src, echo_xml());
        let mut out = RecordingSequence::new();
        m.handle_method_call("Divide", &[Value::Int32(10), Value::Int32(0)], &mut out);
        assert_eq!(
            out.events(),
            &[Event::Throw {
                error_name: "org.example.DivByZero".into(),
                message: exec::synthesise_message("org.example.DivByZero"),
            }]
        );
    }

    /// Seed scenario 3: property set with counter-gated transition.
    #[test]
    fn property_set_counter_gated_transition() {
        let src = r#"
            object at "/a" implements org.example.Thing {
                data { counter <u> = 0; arbitrary <s> = ""; }
                states { Main; }
                transition from Main to Main on property arbitrary {
                    precondition { counter % 2 == 0 }
                    counter = counter + 1;
                }
            }
        "#;
        let mut m = build(src, echo_xml());
        let mut out = RecordingSequence::new();

        m.handle_property_set("arbitrary", Value::String("x".into()), &mut out);
        m.handle_property_set("arbitrary", Value::String("x".into()), &mut out);
        m.handle_property_set("arbitrary", Value::String("x".into()), &mut out);

        assert_eq!(m.env().get_value(Scope::Object, "counter"), Some(&Value::Uint32(1)));
        assert_eq!(
            m.env().get_value(Scope::Object, "arbitrary"),
            Some(&Value::String("x".into()))
        );
    }

    #[test]
    fn reset_restores_state_and_environment() {
        let src = r#"
            object at "/a" implements org.example.Thing {
                data { counter <u> = 0; arbitrary <s> = ""; }
                states { Other; Main; }
                transition from Main to Other on property arbitrary {
                    counter = counter + 1;
                }
            }
        "#;
        let mut m = build(src, echo_xml());
        let mut out = RecordingSequence::new();
        m.handle_property_set("arbitrary", Value::String("x".into()), &mut out);
        assert_eq!(m.current_state(), 1);
        assert_eq!(m.env().get_value(Scope::Object, "counter"), Some(&Value::Uint32(1)));

        m.reset();
        assert_eq!(m.current_state(), 0);
        assert_eq!(m.env().get_value(Scope::Object, "counter"), Some(&Value::Uint32(0)));
    }

    #[test]
    fn unknown_method_synthesises_an_empty_reply() {
        let src = r#"
            object at "/a" implements org.example.Thing {
                states { Main; }
            }
        "#;
        let mut m = build(src, echo_xml());
        let mut out = RecordingSequence::new();
        m.handle_method_call("Echo", &[Value::String("hi".into())], &mut out);
        assert_eq!(out.events(), &[Event::Reply(Value::Tuple(Vec::new()))]);
    }
}
