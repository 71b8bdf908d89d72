use super::{BusName, InterfaceName};

#[test]
fn interface_name_requires_two_elements() {
    assert!(InterfaceName::new("org").is_err());
    assert!(InterfaceName::new("org.example.Echo").is_ok());
}

#[test]
fn interface_name_rejects_leading_digit() {
    assert!(InterfaceName::new("org.1example").is_err());
}

#[test]
fn bus_name_rejects_unique_names() {
    assert!(BusName::new(":1.52").is_err());
    assert!(BusName::new("org.example.Echo").is_ok());
}

#[test]
fn bus_name_allows_leading_digit_in_later_elements() {
    assert!(BusName::new("org.example.1Thing").is_ok());
}
