use std::fmt::Write;

use dbus_sim_core::signature::Signature;
use xmlparser::{ElementEnd, Token};

use crate::error::ErrorKind;
use crate::{
    Argument, Description, Direction, Doc, Error, Interface, Method, Node, Property,
    PropertyAccess, Result, Signal,
};

/// Parse the contents of an interface introspection document.
pub fn parse_interface(interface: &str) -> Result<Node<'_>> {
    let tokenizer = xmlparser::Tokenizer::from(interface);

    let mut stack = vec![];
    let mut path = String::new();
    let mut root = NodeBuilder::default();

    macro_rules! expect_end {
        ($end:expr, $expected:literal) => {
            if let Some(end) = $end {
                if end != $expected {
                    return Err(Error::new(
                        path,
                        ErrorKind::MismatchingEnd {
                            expected: $expected.into(),
                            actual: end.into(),
                        },
                    ));
                }
            }
        };
    }

    for token in tokenizer {
        let token = match token {
            Ok(token) => token,
            Err(error) => return Err(Error::new(path, error)),
        };

        match token {
            Token::ElementStart { local, .. } => {
                match (stack.last(), local.as_str()) {
                    (None, "node") => {
                        stack.push(State::Node(NodeBuilder::default()));
                    }
                    (Some(State::Node(..)), "interface") => {
                        stack.push(State::Interface(InterfaceBuilder::default()));
                    }
                    (Some(State::Interface(..)), "method") => {
                        stack.push(State::Method(MethodBuilder::default()));
                    }
                    (Some(State::Interface(..)), "signal") => {
                        stack.push(State::Signal(SignalBuilder::default()));
                    }
                    (Some(State::Interface(..)), "property") => {
                        stack.push(State::Property(PropertyBuilder::default()));
                    }
                    (Some(State::Method(..) | State::Signal(..)), "arg") => {
                        stack.push(State::Argument(ArgumentBuilder::default()));
                    }
                    (
                        Some(
                            State::Argument(..)
                            | State::Method(..)
                            | State::Signal(..)
                            | State::Property(..),
                        ),
                        "doc",
                    ) => {
                        stack.push(State::Doc(Doc::default()));
                    }
                    (Some(State::Doc(..)), "summary") => {
                        stack.push(State::String("summary", StringBuilder::default()));
                    }
                    (Some(State::Doc(..)), "description") => {
                        stack.push(State::Description(Description::default()));
                    }
                    (Some(State::Description(..)), "para") => {
                        stack.push(State::String("para", StringBuilder::default()));
                    }
                    (Some(State::Interface(..)), "annotation") => {
                        stack.push(State::Annotation);
                    }
                    (_, element) => {
                        return Err(Error::new(
                            path,
                            ErrorKind::UnsupportedElementStart(element.into()),
                        ));
                    }
                }

                if !path.is_empty() {
                    path.push('/');
                }

                path.push_str(local.as_str());

                match &stack[..] {
                    [.., State::Node(node), State::Node(..)] => {
                        let _ = write!(path, "[{}]", node.nodes.len());
                    }
                    [.., State::Node(node), State::Interface(..)] => {
                        let _ = write!(path, "[{}]", node.interfaces.len());
                    }
                    [.., State::Interface(interface), State::Method(..)] => {
                        let _ = write!(path, "[{}]", interface.methods.len());
                    }
                    [.., State::Interface(interface), State::Signal(..)] => {
                        let _ = write!(path, "[{}]", interface.signals.len());
                    }
                    [.., State::Interface(interface), State::Property(..)] => {
                        let _ = write!(path, "[{}]", interface.properties.len());
                    }
                    [.., State::Method(method), State::Argument(..)] => {
                        let _ = write!(path, "[{}]", method.arguments.len());
                    }
                    [.., State::Signal(signal), State::Argument(..)] => {
                        let _ = write!(path, "[{}]", signal.arguments.len());
                    }
                    _ => {}
                }
            }
            Token::ElementEnd { end, .. } => {
                let name = match end {
                    ElementEnd::Open => {
                        continue;
                    }
                    ElementEnd::Close(_, name) => Some(name.as_str()),
                    ElementEnd::Empty => None,
                };

                let Some(top) = stack.pop() else {
                    return Err(Error::new(path, ErrorKind::UnsupportedElementEnd));
                };

                match (&mut stack[..], top) {
                    ([], State::Node(node)) => {
                        expect_end!(name, "node");
                        root.interfaces.extend(node.interfaces);
                        root.nodes.extend(node.nodes);
                    }
                    ([.., State::Node(node)], State::Interface(builder)) => {
                        expect_end!(name, "interface");
                        node.interfaces.push(
                            builder
                                .build()
                                .map_err(|kind| Error::new(path.as_str(), kind))?,
                        );
                    }
                    ([.., State::Node(node)], State::Node(builder)) => {
                        expect_end!(name, "node");
                        node.nodes.push(builder.build());
                    }
                    ([.., State::Interface(interface)], State::Method(builder)) => {
                        expect_end!(name, "method");
                        interface.methods.push(
                            builder
                                .build()
                                .map_err(|kind| Error::new(path.as_str(), kind))?,
                        );
                    }
                    ([.., State::Interface(interface)], State::Signal(builder)) => {
                        expect_end!(name, "signal");
                        interface.signals.push(
                            builder
                                .build()
                                .map_err(|kind| Error::new(path.as_str(), kind))?,
                        );
                    }
                    ([.., State::Interface(interface)], State::Property(builder)) => {
                        expect_end!(name, "property");
                        interface.properties.push(
                            builder
                                .build()
                                .map_err(|kind| Error::new(path.as_str(), kind))?,
                        );
                    }
                    ([.., State::Interface(..)], State::Annotation) => {
                        expect_end!(name, "annotation");
                    }
                    ([.., State::Method(method)], State::Argument(builder)) => {
                        expect_end!(name, "arg");
                        method.arguments.push(
                            builder
                                .build(Direction::In)
                                .map_err(|kind| Error::new(path.as_str(), kind))?,
                        );
                    }
                    ([.., State::Signal(signal)], State::Argument(builder)) => {
                        expect_end!(name, "arg");
                        signal.arguments.push(
                            builder
                                .build(Direction::Out)
                                .map_err(|kind| Error::new(path.as_str(), kind))?,
                        );
                    }
                    ([.., State::Argument(argument)], State::Doc(doc)) => {
                        expect_end!(name, "doc");
                        argument.doc = doc;
                    }
                    ([.., State::Method(method)], State::Doc(doc)) => {
                        expect_end!(name, "doc");
                        method.doc = doc;
                    }
                    ([.., State::Signal(signal)], State::Doc(doc)) => {
                        expect_end!(name, "doc");
                        signal.doc = doc;
                    }
                    ([.., State::Property(property)], State::Doc(doc)) => {
                        expect_end!(name, "doc");
                        property.doc = doc;
                    }
                    ([.., State::Doc(doc)], State::String("summary", string)) => {
                        expect_end!(name, "summary");
                        doc.summary = string.text;
                    }
                    ([.., State::Doc(doc)], State::Description(description)) => {
                        expect_end!(name, "description");
                        doc.description = description;
                    }
                    ([.., State::Description(description)], State::String("para", string)) => {
                        expect_end!(name, "para");
                        description.paragraph = string.text;
                    }
                    _ => return Err(Error::new(path, ErrorKind::UnsupportedElementEnd)),
                }

                if let Some(index) = path.rfind('/') {
                    path.truncate(index);
                } else {
                    path.clear();
                }
            }
            Token::Attribute {
                prefix,
                local,
                value,
                ..
            } => {
                let len = path.len();
                path.push(':');
                path.push_str(local.as_str());

                match (&mut stack[..], prefix.as_str(), local.as_str()) {
                    ([State::Node(..)], "xmlns", _) => {
                        // ignore xmlns attributes, while these would be good to
                        // validate, in practice they don't make much of a
                        // difference and are rarely used.
                    }
                    ([.., State::Interface(builder)], _, "name") => {
                        builder.name = Some(value.as_str());
                    }
                    ([.., State::Method(builder)], _, "name") => {
                        builder.name = Some(value.as_str());
                    }
                    ([.., State::Signal(builder)], _, "name") => {
                        builder.name = Some(value.as_str());
                    }
                    ([.., State::Property(builder)], _, "name") => {
                        builder.name = Some(value.as_str());
                    }
                    ([.., State::Property(builder)], _, "type") => {
                        builder.ty = Some(
                            Signature::new(value.as_str())
                                .map_err(|kind| Error::new(path.as_str(), kind))?,
                        );
                    }
                    ([.., State::Property(builder)], _, "access") => {
                        builder.access = Some(match value.as_str() {
                            "read" => PropertyAccess::Read,
                            "write" => PropertyAccess::Write,
                            "readwrite" => PropertyAccess::ReadWrite,
                            other => {
                                return Err(Error::new(
                                    path,
                                    ErrorKind::UnsupportedPropertyAccess(other.into()),
                                ))
                            }
                        });
                    }
                    ([.., State::Argument(builder)], _, "name") => {
                        builder.name = Some(value.as_str());
                    }
                    ([.., State::Argument(builder)], _, "direction") => {
                        builder.direction = Some(match value.as_str() {
                            "in" => Direction::In,
                            "out" => Direction::Out,
                            other => {
                                return Err(Error::new(
                                    path,
                                    ErrorKind::UnsupportedArgumentDirection(other.into()),
                                ))
                            }
                        });
                    }
                    ([.., State::Argument(builder)], _, "type") => {
                        builder.ty = Some(
                            Signature::new(value.as_str())
                                .map_err(|kind| Error::new(path.as_str(), kind))?,
                        );
                    }
                    ([.., State::Annotation], _, _) => {
                        // annotations (e.g. deprecation markers) carry no
                        // semantic weight for the simulator; ignore.
                    }
                    (_, _, name) => {
                        return Err(Error::new(
                            path,
                            ErrorKind::UnsupportedAttribute(name.into()),
                        ));
                    }
                }

                path.truncate(len);
            }
            Token::Text { text } => match stack.last_mut() {
                Some(State::String(_, string)) => {
                    string.text = Some(text.as_str());
                }
                _ => {
                    if !text.as_str().trim().is_empty() {
                        return Err(Error::new(path, ErrorKind::UnsupportedText));
                    }
                }
            },
            _ => {}
        }
    }

    Ok(root.build())
}

#[derive(Debug, Default)]
struct NodeBuilder<'a> {
    interfaces: Vec<Interface<'a>>,
    nodes: Vec<Node<'a>>,
}

impl<'a> NodeBuilder<'a> {
    fn build(self) -> Node<'a> {
        Node {
            interfaces: self.interfaces.into(),
        }
    }
}

#[derive(Debug, Default)]
struct InterfaceBuilder<'a> {
    name: Option<&'a str>,
    methods: Vec<Method<'a>>,
    signals: Vec<Signal<'a>>,
    properties: Vec<Property<'a>>,
}

impl<'a> InterfaceBuilder<'a> {
    fn build(self) -> Result<Interface<'a>, ErrorKind> {
        let name = self.name.ok_or(ErrorKind::MissingInterfaceName)?;
        Ok(Interface {
            name,
            methods: self.methods.into(),
            signals: self.signals.into(),
            properties: self.properties.into(),
        })
    }
}

#[derive(Debug, Default)]
struct MethodBuilder<'a> {
    name: Option<&'a str>,
    arguments: Vec<Argument<'a>>,
    doc: Doc<'a>,
}

impl<'a> MethodBuilder<'a> {
    fn build(self) -> Result<Method<'a>, ErrorKind> {
        let name = self.name.ok_or(ErrorKind::MissingMethodName)?;
        Ok(Method {
            name,
            arguments: self.arguments.into(),
        })
    }
}

#[derive(Debug, Default)]
struct SignalBuilder<'a> {
    name: Option<&'a str>,
    arguments: Vec<Argument<'a>>,
    doc: Doc<'a>,
}

impl<'a> SignalBuilder<'a> {
    fn build(self) -> Result<Signal<'a>, ErrorKind> {
        let name = self.name.ok_or(ErrorKind::MissingSignalName)?;
        Ok(Signal {
            name,
            arguments: self.arguments.into(),
        })
    }
}

#[derive(Debug, Default)]
struct PropertyBuilder<'a> {
    name: Option<&'a str>,
    ty: Option<&'a Signature>,
    access: Option<PropertyAccess>,
    doc: Doc<'a>,
}

impl<'a> PropertyBuilder<'a> {
    fn build(self) -> Result<Property<'a>, ErrorKind> {
        let name = self.name.ok_or(ErrorKind::MissingPropertyName)?;
        let ty = self.ty.ok_or(ErrorKind::MissingPropertyType)?;
        let access = self.access.ok_or(ErrorKind::MissingPropertyAccess)?;
        Ok(Property {
            name,
            ty: ty.as_str(),
            access,
        })
    }
}

#[derive(Debug, Default)]
struct ArgumentBuilder<'a> {
    name: Option<&'a str>,
    ty: Option<&'a Signature>,
    direction: Option<Direction>,
    doc: Doc<'a>,
}

impl<'a> ArgumentBuilder<'a> {
    fn build(self, default_direction: Direction) -> Result<Argument<'a>, ErrorKind> {
        let ty = self.ty.ok_or(ErrorKind::MissingArgumentType)?;
        let direction = self.direction.unwrap_or(default_direction);

        Ok(Argument {
            name: self.name,
            ty: ty.as_str(),
            direction,
        })
    }
}

#[derive(Debug, Default)]
struct StringBuilder<'a> {
    text: Option<&'a str>,
}

#[derive(Debug)]
enum State<'a> {
    Node(NodeBuilder<'a>),
    Interface(InterfaceBuilder<'a>),
    Method(MethodBuilder<'a>),
    Signal(SignalBuilder<'a>),
    Property(PropertyBuilder<'a>),
    Argument(ArgumentBuilder<'a>),
    Annotation,
    Doc(Doc<'a>),
    Description(Description<'a>),
    String(&'static str, StringBuilder<'a>),
}
