//! `dbus-sim`: simulate a D-Bus service endpoint from a declarative
//! extended-finite-state-machine description.
//!
//! A simulation program describes one or more D-Bus objects: their
//! object path, well-known bus names, the interfaces they implement
//! (resolved against a host-supplied introspection document), their
//! persistent variables, their states, and the transitions between
//! those states triggered by method calls, property sets, or an
//! arbitrary ("random"/timer) tick. [`Object`] is the entry point a host
//! drives; everything else in this crate is the machinery that gets one
//! loaded.
//!
//! # Loading a program
//!
//! ```no_run
//! use dbus_sim::{load, EngineConfig};
//!
//! let source = r#"
//!     object at "/org/example/Thing" implements org.example.Thing {
//!         states { Main; }
//!         transition from Main to Main on method Echo {
//!             reply (value);
//!         }
//!     }
//! "#;
//! let introspection = r#"<node>
//!     <interface name="org.example.Thing">
//!         <method name="Echo">
//!             <arg name="value" type="s" direction="in"/>
//!             <arg name="value" type="s" direction="out"/>
//!         </method>
//!     </interface>
//! </node>"#;
//!
//! let objects = load(source, introspection, EngineConfig::default()).unwrap();
//! ```

pub mod ast;
pub mod check;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod exec;
pub mod functions;
pub mod fuzz;
pub mod introspect;
pub mod lexer;
pub mod machine;
pub mod object;
pub mod output;
pub mod parser;
pub mod reachability;
pub mod value;

pub use check::{check, pre_check_and_register, sanity_check, CheckedObject, ResolvedEdge};
pub use config::EngineConfig;
pub use error::{CheckError, ParseError, PreCheckError, RuntimeWarning, Span};
pub use machine::Machine;
pub use object::Object;
pub use output::{Event, FlushError, NullSequence, OutputSequence, RecordingSequence};
pub use value::{Value, VariantType};

use std::fmt;

/// Everything that can go wrong while loading a program: the three
/// fatal load-time phases in order (spec.md §7), plus a malformed
/// introspection document (the host's input, checked before phase B
/// ever resolves an interface against it).
#[derive(Debug)]
pub enum LoadError {
    Xml(dbus_sim_xml::Error),
    Parse(ParseError),
    PreCheck(PreCheckError),
    Check(CheckError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Xml(e) => write!(f, "{e}"),
            LoadError::Parse(e) => write!(f, "{e}"),
            LoadError::PreCheck(e) => write!(f, "{e}"),
            LoadError::Check(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Xml(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            LoadError::PreCheck(e) => Some(e),
            LoadError::Check(e) => Some(e),
        }
    }
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}

impl From<PreCheckError> for LoadError {
    fn from(e: PreCheckError) -> Self {
        LoadError::PreCheck(e)
    }
}

impl From<CheckError> for LoadError {
    fn from(e: CheckError) -> Self {
        LoadError::Check(e)
    }
}

/// Parse `source`, resolve it against `introspection_xml`, run the full
/// three-phase check, and build one [`Object`] per `object at … { … }`
/// declaration. This is the convenience path a host that isn't
/// hand-rolling the phases itself should use.
pub fn load(source: &str, introspection_xml: &str, config: EngineConfig) -> Result<Vec<Object>, LoadError> {
    let program = parser::parse_program(source)?;
    let node = dbus_sim_xml::parse_interface(introspection_xml).map_err(LoadError::Xml)?;

    let mut objects = Vec::with_capacity(program.objects.len());
    for decl in &program.objects {
        sanity_check(decl);
        let checked = pre_check_and_register(decl, &node)?;
        check(&checked, decl)?;
        objects.push(Object::new(checked, config.clone()));
    }
    Ok(objects)
}
