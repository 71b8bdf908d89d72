//! The object wrapper (C9): a thin adapter binding one [`Machine`] to the
//! host's view of a D-Bus object — its path, bus names, and registered
//! interfaces — per spec.md §4.9.

use dbus_sim_core::object_path::OwnedObjectPath;

use crate::check::CheckedObject;
use crate::config::EngineConfig;
use crate::introspect::InterfaceInfo;
use crate::machine::{CandidateFilter, Machine};
use crate::output::OutputSequence;
use crate::value::Value;

/// One simulated D-Bus object: its identity (path, bus names, declared
/// interfaces) plus the machine driving its behaviour. Exposes the same
/// three entry points as [`Machine`], plus `reset` and the identity
/// accessors a host needs to register the object on a connection.
pub struct Object {
    object_path: OwnedObjectPath,
    bus_names: Vec<String>,
    interfaces: Vec<InterfaceInfo>,
    machine: Machine,
}

impl Object {
    /// Build an `Object` from a checked declaration (the product of
    /// `check::pre_check_and_register` + `check::check`) and a config.
    pub fn new(checked: CheckedObject, config: EngineConfig) -> Self {
        let object_path = checked.object_path.clone();
        let bus_names = checked.bus_names.clone();
        let interfaces = checked.interfaces.clone();
        let machine = Machine::new(checked, config);

        Self {
            object_path,
            bus_names,
            interfaces,
            machine,
        }
    }

    pub fn object_path(&self) -> &OwnedObjectPath {
        &self.object_path
    }

    pub fn bus_names(&self) -> &[String] {
        &self.bus_names
    }

    pub fn interfaces(&self) -> &[InterfaceInfo] {
        &self.interfaces
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn reset(&mut self) {
        self.machine.reset();
    }

    pub fn handle_method_call(&mut self, method_name: &str, args: &[Value], out: &mut dyn OutputSequence) {
        self.machine.handle_method_call(method_name, args, out);
    }

    pub fn handle_method_call_filtered(
        &mut self,
        method_name: &str,
        args: &[Value],
        filter: &CandidateFilter<'_>,
        out: &mut dyn OutputSequence,
    ) {
        self.machine.handle_method_call_filtered(method_name, args, filter, out);
    }

    pub fn handle_property_set(&mut self, property_name: &str, new_value: Value, out: &mut dyn OutputSequence) {
        self.machine.handle_property_set(property_name, new_value, out);
    }

    pub fn handle_property_set_filtered(
        &mut self,
        property_name: &str,
        new_value: Value,
        filter: &CandidateFilter<'_>,
        out: &mut dyn OutputSequence,
    ) {
        self.machine
            .handle_property_set_filtered(property_name, new_value, filter, out);
    }

    /// Answer a property read directly, with no transition selection
    /// (spec.md's trigger list has no "property get" trigger).
    pub fn handle_property_get(&self, property_name: &str) -> Option<&Value> {
        self.machine.handle_property_get(property_name)
    }

    pub fn handle_tick(&mut self, out: &mut dyn OutputSequence) {
        self.machine.handle_tick(out);
    }

    pub fn handle_tick_filtered(&mut self, filter: &CandidateFilter<'_>, out: &mut dyn OutputSequence) {
        self.machine.handle_tick_filtered(filter, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{check, pre_check_and_register, sanity_check};
    use crate::output::{Event, RecordingSequence};
    use crate::parser::parse_program;

    fn xml_node() -> &'static str {
        r#"<node>
            <interface name="org.example.Thing">
                <method name="Echo">
                    <arg name="value" type="s" direction="in"/>
                    <arg name="value" type="s" direction="out"/>
                </method>
            </interface>
        </node>"#
    }

    #[test]
    fn object_exposes_identity_and_forwards_method_calls() {
        let src = r#"
            object at "/org/example/Thing" named org.example.App implements org.example.Thing {
                states { Main; }
                transition from Main to Main on method Echo {
                    reply (value);
                }
            }
        "#;
        let program = parse_program(src).unwrap();
        let node = dbus_sim_xml::parse_interface(xml_node()).unwrap();
        let decl = &program.objects[0];
        sanity_check(decl);
        let checked = pre_check_and_register(decl, &node).unwrap();
        check(&checked, decl).unwrap();

        let mut obj = Object::new(checked, EngineConfig::default());
        assert_eq!(obj.object_path().as_str(), "/org/example/Thing");
        assert_eq!(obj.bus_names(), &["org.example.App".to_string()]);

        let mut out = RecordingSequence::new();
        obj.handle_method_call("Echo", &[Value::String("hi".into())], &mut out);
        assert_eq!(out.events(), &[Event::Reply(Value::String("hi".into()))]);
    }

    #[test]
    fn handle_property_get_reads_the_bound_variable_directly() {
        let src = r#"
            object at "/org/example/Thing" named org.example.App implements org.example.Thing2 {
                data { counter <u> = 3; }
                states { Main; }
            }
        "#;
        let xml = r#"<node>
            <interface name="org.example.Thing2">
                <property name="counter" type="u" access="readwrite"/>
            </interface>
        </node>"#;
        let program = parse_program(src).unwrap();
        let node = dbus_sim_xml::parse_interface(xml).unwrap();
        let decl = &program.objects[0];
        sanity_check(decl);
        let checked = pre_check_and_register(decl, &node).unwrap();
        check(&checked, decl).unwrap();

        let obj = Object::new(checked, EngineConfig::default());
        assert_eq!(obj.handle_property_get("counter"), Some(&Value::Uint32(3)));
        assert_eq!(obj.handle_property_get("nonexistent"), None);
    }
}
