//! Validated D-Bus interface and bus names.

mod validation;

pub use self::name_error::NameError;
mod name_error;

pub use self::interface_name::InterfaceName;
mod interface_name;

pub use self::bus_name::BusName;
mod bus_name;

#[cfg(test)]
mod tests;
