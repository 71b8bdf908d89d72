//! The D-Bus variant type and value model (C1).
//!
//! Split the way `dbus-sim-core`'s `signature` module is split: one file
//! per concern, re-exported from here.

pub use self::ty::VariantType;
mod ty;

pub use self::data::Value;
mod data;

#[cfg(test)]
mod tests;
