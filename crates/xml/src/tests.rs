use crate::{parse_interface, PropertyAccess, Result};

const SIMPLE: &str = r#"
<!DOCTYPE node PUBLIC
    "-//freedesktop//DTD D-BUS Object Introspection 1.0//EN"
    "http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd" >
<node xmlns:doc="http://www.freedesktop.org/dbus/1.0/doc.dtd">
  <interface name="com.example.MyService1.InterestingInterface">
    <method name="AddContact">
      <arg name="name" direction="in" type="s">
        <doc:doc><doc:summary>Name of new contact</doc:summary></doc:doc>
      </arg>
      <arg name="email" direction="in" type="s">
        <doc:doc><doc:summary>E-mail address of new contact</doc:summary></doc:doc>
      </arg>
      <arg name="id" direction="out" type="u">
        <doc:doc><doc:summary>ID of newly added contact</doc:summary></doc:doc>
      </arg>
      <doc:doc>
        <doc:description>
          <doc:para>
            Adds a new contact to the address book with their name and
            e-mail address.
          </doc:para>
        </doc:description>
      </doc:doc>
    </method>
    <signal name="ContactAdded">
      <arg name="id" type="u"/>
    </signal>
    <property name="ContactCount" type="u" access="read"/>
    <property name="Nickname" type="s" access="readwrite"/>
    <annotation name="org.freedesktop.DBus.Deprecated" value="false"/>
  </interface>
</node>
"#;

#[test]
fn test_simple() -> Result<()> {
    let node = parse_interface(SIMPLE)?;
    assert_eq!(
        node.interfaces[0].name,
        "com.example.MyService1.InterestingInterface"
    );
    assert_eq!(node.interfaces[0].methods[0].name, "AddContact");
    assert_eq!(node.interfaces[0].methods[0].arguments.len(), 3);
    Ok(())
}

#[test]
fn test_signal() -> Result<()> {
    let node = parse_interface(SIMPLE)?;
    let signal = &node.interfaces[0].signals[0];
    assert_eq!(signal.name, "ContactAdded");
    assert_eq!(signal.arguments[0].ty, "u");
    Ok(())
}

#[test]
fn test_property() -> Result<()> {
    let node = parse_interface(SIMPLE)?;
    let properties = &node.interfaces[0].properties;
    assert_eq!(properties[0].name, "ContactCount");
    assert_eq!(properties[0].ty, "u");
    assert_eq!(properties[0].access, PropertyAccess::Read);
    assert_eq!(properties[1].name, "Nickname");
    assert_eq!(properties[1].access, PropertyAccess::ReadWrite);
    Ok(())
}
