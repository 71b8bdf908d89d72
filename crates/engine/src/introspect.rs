//! Owned introspection data built once, at load time, from a parsed
//! `dbus_sim_xml::Node`.
//!
//! `dbus_sim_xml`'s types borrow from the source XML string (so it can
//! stay a zero-copy streaming parser). The engine's [`Environment`][
//! crate::env::Environment] needs to hold its introspection list for the
//! lifetime of the `Machine`, independent of whatever buffer the XML was
//! read from, so we copy once into owned `InterfaceInfo`s here rather than
//! threading a borrow through the whole engine.

use dbus_sim_core::signature::Signature;
use dbus_sim_xml::{Direction as XmlDirection, Node, PropertyAccess as XmlPropertyAccess};

use crate::error::{PreCheckError, PreCheckErrorKind, TypeError};
use crate::value::VariantType;

/// One interface's methods, signals and properties, owned.
#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    pub name: Box<str>,
    pub methods: Vec<MethodInfo>,
    pub signals: Vec<SignalInfo>,
    pub properties: Vec<PropertyInfo>,
}

impl InterfaceInfo {
    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| &*m.name == name)
    }

    pub fn signal(&self, name: &str) -> Option<&SignalInfo> {
        self.signals.iter().find(|s| &*s.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| &*p.name == name)
    }
}

/// A method's in/out argument list.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: Box<str>,
    pub in_args: Vec<ArgumentInfo>,
    pub out_args: Vec<ArgumentInfo>,
}

/// A signal's (always-out) argument list.
#[derive(Debug, Clone)]
pub struct SignalInfo {
    pub name: Box<str>,
    pub args: Vec<ArgumentInfo>,
}

#[derive(Debug, Clone)]
pub struct ArgumentInfo {
    pub name: Option<Box<str>>,
    pub ty: VariantType,
}

#[derive(Debug, Clone)]
pub struct PropertyInfo {
    pub name: Box<str>,
    pub ty: VariantType,
    pub readable: bool,
    pub writable: bool,
}

/// Convert a parsed introspection document into the owned interface list
/// the environment carries, restricted to `wanted` interface names (the
/// object declaration's `implements` clause) in the order requested.
pub fn resolve_interfaces(
    node: &Node<'_>,
    wanted: &[&str],
) -> Result<Vec<InterfaceInfo>, PreCheckError> {
    let mut out = Vec::with_capacity(wanted.len());

    for &name in wanted {
        let interface = node
            .interfaces
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| {
                PreCheckError::new(
                    None,
                    PreCheckErrorKind::UnknownInterface(name.into()),
                )
            })?;

        let methods = interface
            .methods
            .iter()
            .map(|m| {
                let mut in_args = Vec::new();
                let mut out_args = Vec::new();
                for arg in m.arguments.iter() {
                    let info = ArgumentInfo {
                        name: arg.name.map(Into::into),
                        ty: parse_arg_type(arg.ty)?,
                    };
                    match arg.direction {
                        XmlDirection::In => in_args.push(info),
                        XmlDirection::Out => out_args.push(info),
                    }
                }
                Ok(MethodInfo {
                    name: m.name.into(),
                    in_args,
                    out_args,
                })
            })
            .collect::<Result<_, PreCheckError>>()?;

        let signals = interface
            .signals
            .iter()
            .map(|s| {
                let args = s
                    .arguments
                    .iter()
                    .map(|arg| {
                        Ok(ArgumentInfo {
                            name: arg.name.map(Into::into),
                            ty: parse_arg_type(arg.ty)?,
                        })
                    })
                    .collect::<Result<_, PreCheckError>>()?;
                Ok(SignalInfo {
                    name: s.name.into(),
                    args,
                })
            })
            .collect::<Result<_, PreCheckError>>()?;

        let properties = interface
            .properties
            .iter()
            .map(|p| {
                Ok(PropertyInfo {
                    name: p.name.into(),
                    ty: parse_arg_type(p.ty)?,
                    readable: p.access.is_readable(),
                    writable: matches!(p.access, XmlPropertyAccess::Write | XmlPropertyAccess::ReadWrite),
                })
            })
            .collect::<Result<_, PreCheckError>>()?;

        out.push(InterfaceInfo {
            name: name.into(),
            methods,
            signals,
            properties,
        });
    }

    Ok(out)
}

fn parse_arg_type(raw: &str) -> Result<VariantType, PreCheckError> {
    let sig = Signature::new(raw)
        .map_err(|e| PreCheckError::new(None, PreCheckErrorKind::InvalidSignature(e)))?;
    VariantType::from_signature(sig).map_err(|e: TypeError| PreCheckError::new(None, e.into()))
}
