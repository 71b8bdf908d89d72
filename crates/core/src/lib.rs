//! Core D-Bus primitives shared by the simulation engine and its
//! introspection parser: validated signatures, object paths, and names.
//!
//! This is split into its own crate so that it can be depended on by both
//! `dbus-sim-xml` (introspection parsing) and `dbus-sim` (the engine)
//! without either depending on the other.

#![allow(clippy::module_inception)]

#[macro_use]
mod macros;

#[doc(hidden)]
pub mod proto;

pub mod signature;

pub mod object_path;

pub mod names;
