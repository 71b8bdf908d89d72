/// A D-Bus node: a named tree of interfaces, possibly with child nodes.
pub struct Node<'a> {
    /// Interfaces in the node.
    pub interfaces: Box<[Interface<'a>]>,
}

/// A single interface, with the methods, signals and properties it
/// declares.
///
/// `tokio-dbus-xml` only modelled `Method`; the simulation language also
/// needs `Signal` (for `emit` statements) and `Property` (for `property`
/// triggers and plain reads) resolved from introspection.
pub struct Interface<'a> {
    /// The name of the interface.
    pub name: &'a str,
    /// Methods associated with the interface.
    pub methods: Box<[Method<'a>]>,
    /// Signals associated with the interface.
    pub signals: Box<[Signal<'a>]>,
    /// Properties associated with the interface.
    pub properties: Box<[Property<'a>]>,
}

/// The direction of a method argument.
#[derive(Debug, Clone, Copy)]
pub enum Direction {
    /// Input argument.
    In,
    /// Output argument.
    Out,
}

/// A method or signal argument.
#[derive(Debug, Clone, Copy)]
pub struct Argument<'a> {
    /// The name of the argument.
    pub name: Option<&'a str>,
    /// The type of the argument.
    pub ty: &'a str,
    /// The direction of an argument. Signal arguments are always `Out`.
    pub direction: Direction,
}

/// A single method.
#[derive(Debug, Clone)]
pub struct Method<'a> {
    /// The name of the method.
    pub name: &'a str,
    /// Arguments to the method.
    pub arguments: Box<[Argument<'a>]>,
}

/// A single signal.
#[derive(Debug, Clone)]
pub struct Signal<'a> {
    /// The name of the signal.
    pub name: &'a str,
    /// Arguments carried by the signal. All implicitly `Out`.
    pub arguments: Box<[Argument<'a>]>,
}

/// Whether a property can be read, written, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAccess {
    /// `access="read"`.
    Read,
    /// `access="write"`.
    Write,
    /// `access="readwrite"`.
    ReadWrite,
}

impl PropertyAccess {
    /// Whether a client read is permitted.
    pub fn is_readable(self) -> bool {
        matches!(self, PropertyAccess::Read | PropertyAccess::ReadWrite)
    }

    /// Whether a client write is permitted.
    pub fn is_writable(self) -> bool {
        matches!(self, PropertyAccess::Write | PropertyAccess::ReadWrite)
    }
}

/// A single property.
#[derive(Debug, Clone)]
pub struct Property<'a> {
    /// The name of the property.
    pub name: &'a str,
    /// The D-Bus signature of the property's value.
    pub ty: &'a str,
    /// Whether the property is readable, writable, or both.
    pub access: PropertyAccess,
}

/// Documentation associated with an element.
#[derive(Debug, Default)]
pub struct Doc<'a> {
    /// Documentation summary.
    pub summary: Option<&'a str>,
    /// Description.
    pub description: Description<'a>,
}

/// The description of an element.
#[derive(Debug, Default)]
pub struct Description<'a> {
    /// Paragraph describing an element.
    pub paragraph: Option<&'a str>,
}
