//! Parser for D-Bus interface introspection documents.
//!
//! Unlike a wire-protocol client, the simulator needs more than method
//! shapes out of introspection: `emit` statements resolve against
//! `<signal>` elements and `property` triggers resolve against
//! `<property>` elements, so both are modelled here alongside `<method>`.

#[cfg(test)]
mod tests;

pub use self::error::{Error, Result};
mod error;

pub use self::elements::{
    Argument, Description, Direction, Doc, Interface, Method, Node, Property, PropertyAccess,
    Signal,
};
mod elements;

pub use self::parser::parse_interface;
mod parser;
