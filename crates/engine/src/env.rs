//! The two-scope environment (C2): per-object persistent variables and
//! per-call ephemeral locals, plus the introspection list used to resolve
//! signals and properties.

use std::collections::HashMap;

use crate::introspect::InterfaceInfo;
use crate::value::{Value, VariantType};

/// Which of the two variable scopes an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Per-object persistent variables, declared in `data` blocks and
    /// bound to properties; read/written by transitions and survives
    /// across invocations (until `reset`).
    Object,
    /// Per-method-call ephemeral variables: the method's input arguments,
    /// or the special name `value` during a property-set transition.
    /// Cleared at the end of the invocation that created them.
    Local,
}

/// A declared variable's type and (once initialised) current value.
#[derive(Debug, Clone)]
pub struct VariableInfo {
    pub ty: VariantType,
    pub value: Option<Value>,
}

impl VariableInfo {
    pub fn new(ty: VariantType) -> Self {
        Self { ty, value: None }
    }
}

/// A deep copy of the object scope, taken by `snapshot()` and restored by
/// `reset_to_snapshot()` to implement `Machine::reset`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    vars: HashMap<String, VariableInfo>,
}

/// The per-object environment: two variable scopes plus the object's
/// introspection.
#[derive(Debug, Clone)]
pub struct Environment {
    object: HashMap<String, VariableInfo>,
    local: HashMap<String, VariableInfo>,
    interfaces: Vec<InterfaceInfo>,
}

impl Environment {
    pub fn new(interfaces: Vec<InterfaceInfo>) -> Self {
        Self {
            object: HashMap::new(),
            local: HashMap::new(),
            interfaces,
        }
    }

    pub fn interfaces(&self) -> &[InterfaceInfo] {
        &self.interfaces
    }

    fn table(&self, scope: Scope) -> &HashMap<String, VariableInfo> {
        match scope {
            Scope::Object => &self.object,
            Scope::Local => &self.local,
        }
    }

    fn table_mut(&mut self, scope: Scope) -> &mut HashMap<String, VariableInfo> {
        match scope {
            Scope::Object => &mut self.object,
            Scope::Local => &mut self.local,
        }
    }

    pub fn has(&self, scope: Scope, name: &str) -> bool {
        self.table(scope).contains_key(name)
    }

    pub fn get_type(&self, scope: Scope, name: &str) -> Option<&VariantType> {
        self.table(scope).get(name).map(|v| &v.ty)
    }

    /// Declare `name`'s type in `scope`. Intended to be called once, at
    /// pre-check/binding time, before any `set_value`.
    pub fn set_type(&mut self, scope: Scope, name: &str, ty: VariantType) {
        self.table_mut(scope)
            .insert(name.to_owned(), VariableInfo::new(ty));
    }

    pub fn get_value(&self, scope: Scope, name: &str) -> Option<&Value> {
        self.table(scope).get(name).and_then(|v| v.value.as_ref())
    }

    /// Look up `name`, preferring the local scope (method/property-set
    /// bindings shadow object variables of the same name).
    pub fn lookup_value(&self, name: &str) -> Option<&Value> {
        self.get_value(Scope::Local, name)
            .or_else(|| self.get_value(Scope::Object, name))
    }

    pub fn lookup_type(&self, name: &str) -> Option<&VariantType> {
        self.get_type(Scope::Local, name)
            .or_else(|| self.get_type(Scope::Object, name))
    }

    /// The scope `name` is actually bound in, preferring local.
    pub fn scope_of(&self, name: &str) -> Option<Scope> {
        if self.has(Scope::Local, name) {
            Some(Scope::Local)
        } else if self.has(Scope::Object, name) {
            Some(Scope::Object)
        } else {
            None
        }
    }

    /// Set `name`'s value in `scope`. Returns `false` (and leaves the
    /// variable untouched) if `name` isn't declared in `scope`, or if
    /// `value`'s type isn't a subtype of the declared type — callers that
    /// have already type-checked never observe `false`.
    pub fn set_value(&mut self, scope: Scope, name: &str, value: Value) -> bool {
        let Some(info) = self.table_mut(scope).get_mut(name) else {
            return false;
        };
        if !value.matches(&info.ty) {
            return false;
        }
        info.value = Some(value);
        true
    }

    pub fn unset_value(&mut self, scope: Scope, name: &str) {
        if let Some(info) = self.table_mut(scope).get_mut(name) {
            info.value = None;
        }
    }

    /// Remove `name` from `scope` entirely (used to tear down locals at
    /// the end of a method call / property set, per spec.md §4.8).
    pub fn remove(&mut self, scope: Scope, name: &str) {
        self.table_mut(scope).remove(name);
    }

    /// Remove every local variable, e.g. after an invocation completes.
    pub fn clear_locals(&mut self) {
        self.local.clear();
    }

    /// Deep-copy the object scope for later restoration.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            vars: self.object.clone(),
        }
    }

    /// Restore the object scope from a prior `snapshot()`.
    pub fn reset_to_snapshot(&mut self, snapshot: &Snapshot) {
        self.object = snapshot.vars.clone();
    }

    /// Iterate the object scope's declared variable names, for
    /// diagnostics (reachability, tests).
    pub fn object_variable_names(&self) -> impl Iterator<Item = &str> {
        self.object.keys().map(String::as_str)
    }
}
