use super::ObjectPath;

#[test]
fn root_is_valid() {
    assert!(ObjectPath::new(b"/").is_ok());
}

#[test]
fn empty_is_invalid() {
    assert!(ObjectPath::new(b"").is_err());
}

#[test]
fn trailing_slash_is_invalid_unless_root() {
    assert!(ObjectPath::new(b"/foo/").is_err());
    assert!(ObjectPath::new(b"/").is_ok());
}

#[test]
fn double_slash_is_invalid() {
    assert!(ObjectPath::new(b"/foo//bar").is_err());
}

#[test]
fn underscore_is_allowed() {
    assert!(ObjectPath::new(b"/org/freedesktop/My_Object").is_ok());
}

#[test]
fn iterates_components() {
    let path = ObjectPath::new(b"/foo/bar/baz").unwrap();
    let parts: Vec<_> = path.iter().collect();
    assert_eq!(parts, ["foo", "bar", "baz"]);
}
