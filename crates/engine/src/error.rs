//! Error types for the three fatal load-time phases (lexing/parsing,
//! pre-check, check) plus the non-fatal runtime warning catalogue.
//!
//! Each fatal error follows the same shape used throughout this workspace
//! (see `dbus_sim_core::signature::SignatureError` and
//! `dbus_sim_xml::Error`): a public opaque struct wrapping a private
//! `ErrorKind`, with `Display`/`std::error::Error` hand-written rather than
//! derived.

use std::error;
use std::fmt;

use dbus_sim_core::names::NameError;
use dbus_sim_core::object_path::ObjectPathError;
use dbus_sim_core::signature::SignatureError;

/// A position in simulation-language source: line and column are
/// 1-indexed; `offset` is the 0-indexed byte offset, used to render a
/// caret under the offending text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Span {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Render a two-line `<source line>\n<caret>` diagnostic against the
    /// original source text.
    pub fn caret(&self, source: &str) -> String {
        let line_text = source.lines().nth((self.line.saturating_sub(1)) as usize);
        match line_text {
            Some(text) => {
                let column = self.column.saturating_sub(1) as usize;
                let mut caret = String::new();
                for _ in 0..column {
                    caret.push(' ');
                }
                caret.push('^');
                format!("{text}\n{caret}")
            }
            None => String::new(),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Result alias for [`ParseError`].
pub type ParseResult<T> = Result<T, ParseError>;

/// A syntax error. Fatal for the load phase; no partial AST is returned.
#[derive(Debug)]
pub struct ParseError {
    span: Span,
    kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(span: Span, kind: ParseErrorKind) -> Self {
        Self { span, kind }
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.kind)
    }
}

impl error::Error for ParseError {}

#[derive(Debug)]
pub(crate) enum ParseErrorKind {
    UnexpectedToken {
        expected: Box<str>,
        found: Box<str>,
    },
    UnexpectedEof {
        expected: Box<str>,
    },
    InvalidEscape(char),
    UnterminatedString,
    InvalidNumber(Box<str>),
    InvalidCharacter(char),
    InvalidTypeAnnotation(Box<str>),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, found `{found}`")
            }
            ParseErrorKind::UnexpectedEof { expected } => {
                write!(f, "expected {expected}, found end of input")
            }
            ParseErrorKind::InvalidEscape(c) => write!(f, "invalid escape sequence `\\{c}`"),
            ParseErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            ParseErrorKind::InvalidNumber(text) => write!(f, "invalid integer literal `{text}`"),
            ParseErrorKind::InvalidCharacter(c) => write!(f, "unexpected character `{c}`"),
            ParseErrorKind::InvalidTypeAnnotation(text) => {
                write!(f, "`{text}` is not a valid type signature")
            }
        }
    }
}

/// Result alias for [`PreCheckError`].
pub type PreCheckResult<T> = Result<T, PreCheckError>;

/// An error raised while pre-checking and registering an [`ObjectDecl`][
/// crate::ast::ObjectDecl]: invalid D-Bus names, integer overflow in a
/// literal, duplicate identifiers, or an unresolvable state reference.
/// Fatal; no environment is populated.
#[derive(Debug)]
pub struct PreCheckError {
    span: Option<Span>,
    kind: PreCheckErrorKind,
}

impl PreCheckError {
    pub(crate) fn new(span: Option<Span>, kind: PreCheckErrorKind) -> Self {
        Self { span, kind }
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

impl fmt::Display for PreCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{span}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl error::Error for PreCheckError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            PreCheckErrorKind::InvalidObjectPath(error) => Some(error),
            PreCheckErrorKind::InvalidName(error) => Some(error),
            PreCheckErrorKind::InvalidSignature(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) enum PreCheckErrorKind {
    IntegerTooWide { text: Box<str>, ty: Box<str> },
    InvalidObjectPath(ObjectPathError),
    InvalidName(NameError),
    InvalidSignature(SignatureError),
    InvalidUtf8,
    DuplicateIdentifier(Box<str>),
    NoInterfaces,
    UnknownInterface(Box<str>),
    TypeMismatch { expected: Box<str>, found: Box<str> },
    IndefiniteTypeNeedsAnnotation,
    UnknownState(Box<str>),
    MissingDefaultState,
    EmptySignatureLiteral,
    NotASingleType(Box<str>),
    UnsupportedTypeCode(char),
    DataLiteralEvalFailed(Box<str>),
}

impl From<TypeError> for PreCheckErrorKind {
    fn from(error: TypeError) -> Self {
        match error.kind {
            TypeErrorKind::EmptySignature => PreCheckErrorKind::EmptySignatureLiteral,
            TypeErrorKind::NotASingleType(sig) => PreCheckErrorKind::NotASingleType(sig),
            TypeErrorKind::UnsupportedTypeCode(c) => PreCheckErrorKind::UnsupportedTypeCode(c),
        }
    }
}

impl fmt::Display for PreCheckErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreCheckErrorKind::IntegerTooWide { text, ty } => {
                write!(f, "integer literal `{text}` too wide for type `{ty}`")
            }
            PreCheckErrorKind::InvalidObjectPath(error) => error.fmt(f),
            PreCheckErrorKind::InvalidName(error) => error.fmt(f),
            PreCheckErrorKind::InvalidSignature(error) => error.fmt(f),
            PreCheckErrorKind::InvalidUtf8 => write!(f, "literal is not valid UTF-8"),
            PreCheckErrorKind::DuplicateIdentifier(name) => {
                write!(f, "duplicate identifier `{name}`")
            }
            PreCheckErrorKind::NoInterfaces => {
                write!(f, "object declares no interfaces")
            }
            PreCheckErrorKind::UnknownInterface(name) => {
                write!(f, "interface `{name}` not present in introspection")
            }
            PreCheckErrorKind::TypeMismatch { expected, found } => {
                write!(f, "expected type `{expected}`, found `{found}`")
            }
            PreCheckErrorKind::IndefiniteTypeNeedsAnnotation => {
                write!(f, "indefinite type requires an explicit `@T` annotation")
            }
            PreCheckErrorKind::UnknownState(name) => {
                write!(f, "unknown state `{name}`")
            }
            PreCheckErrorKind::MissingDefaultState => {
                write!(f, "object declares no default state")
            }
            PreCheckErrorKind::EmptySignatureLiteral => {
                write!(f, "empty type signature")
            }
            PreCheckErrorKind::NotASingleType(sig) => {
                write!(f, "signature `{sig}` does not name a single type")
            }
            PreCheckErrorKind::UnsupportedTypeCode(c) => {
                write!(f, "unsupported D-Bus type code `{c}`")
            }
            PreCheckErrorKind::DataLiteralEvalFailed(msg) => {
                write!(f, "could not evaluate data-block initial value: {msg}")
            }
        }
    }
}

/// Result alias for [`CheckError`].
pub type CheckResult<T> = Result<T, CheckError>;

/// A type error raised during the full type-check of expressions and
/// statements. Fatal.
#[derive(Debug)]
pub struct CheckError {
    span: Option<Span>,
    kind: CheckErrorKind,
}

impl CheckError {
    pub(crate) fn new(span: Option<Span>, kind: CheckErrorKind) -> Self {
        Self { span, kind }
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{span}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl error::Error for CheckError {}

#[derive(Debug)]
pub(crate) enum CheckErrorKind {
    UndeclaredVariable(Box<str>),
    UnknownFunction(Box<str>),
    AssignmentTypeMismatch { lhs: Box<str>, rhs: Box<str> },
    ArithmeticNonNumeric(Box<str>),
    ArithmeticTypeMismatch { lhs: Box<str>, rhs: Box<str> },
    ComparisonTypeMismatch { lhs: Box<str>, rhs: Box<str> },
    LogicNonBoolean(Box<str>),
    FunctionArgMismatch { name: Box<str> },
    PropertySignatureMismatch { name: Box<str>, declared: Box<str>, property: Box<str> },
    PreconditionNotBoolean,
    LhsNotAssignable,
    UnknownSignal(Box<str>),
    UnknownTrigger(Box<str>),
    TupleOrArrayLengthMismatch,
    /// A literal failed its own pre-check validation (integer overflow,
    /// invalid object-path/signature text, or an indefinite inferred type
    /// with no `@T` annotation). Spec.md §7 classifies these as
    /// `PreCheckError`s; when raised while checking a transition body
    /// (rather than a `data` block entry) they still surface here, and
    /// [`crate::check::pre_check_and_register`] re-wraps the equivalent
    /// case for its own data-block walk.
    InvalidLiteral(Box<str>),
}

impl fmt::Display for CheckErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckErrorKind::UndeclaredVariable(name) => {
                write!(f, "undeclared variable `{name}`")
            }
            CheckErrorKind::UnknownFunction(name) => {
                write!(f, "unknown function `{name}`")
            }
            CheckErrorKind::AssignmentTypeMismatch { lhs, rhs } => {
                write!(f, "cannot assign value of type `{rhs}` to `{lhs}`")
            }
            CheckErrorKind::ArithmeticNonNumeric(ty) => {
                write!(f, "arithmetic requires numeric operands, found `{ty}`")
            }
            CheckErrorKind::ArithmeticTypeMismatch { lhs, rhs } => {
                write!(f, "arithmetic requires matching operand types, found `{lhs}` and `{rhs}`")
            }
            CheckErrorKind::ComparisonTypeMismatch { lhs, rhs } => {
                write!(f, "comparison requires matching types, found `{lhs}` and `{rhs}`")
            }
            CheckErrorKind::LogicNonBoolean(ty) => {
                write!(f, "logical operator requires boolean operands, found `{ty}`")
            }
            CheckErrorKind::FunctionArgMismatch { name } => {
                write!(f, "arguments to `{name}` do not match its declared parameter type")
            }
            CheckErrorKind::PropertySignatureMismatch {
                name,
                declared,
                property,
            } => {
                write!(
                    f,
                    "variable `{name}` has type `{declared}` but property `{property}` requires an exact match"
                )
            }
            CheckErrorKind::PreconditionNotBoolean => {
                write!(f, "precondition must be of type `boolean`")
            }
            CheckErrorKind::LhsNotAssignable => {
                write!(f, "left-hand side of assignment must be a variable or a tree of constructors over variables")
            }
            CheckErrorKind::UnknownSignal(name) => {
                write!(f, "signal `{name}` not declared by any implemented interface")
            }
            CheckErrorKind::UnknownTrigger(name) => {
                write!(f, "trigger `{name}` not declared by any implemented interface")
            }
            CheckErrorKind::TupleOrArrayLengthMismatch => {
                write!(f, "tuple or array assignment requires matching lengths")
            }
            CheckErrorKind::InvalidLiteral(msg) => write!(f, "{msg}"),
        }
    }
}

/// Internal helper error for [`crate::value::VariantType`] signature
/// conversion; always folded into a [`PreCheckError`] at the call site.
#[derive(Debug)]
pub(crate) struct TypeError {
    kind: TypeErrorKind,
}

impl TypeError {
    pub(crate) fn new(kind: TypeErrorKind) -> Self {
        Self { kind }
    }
}

#[derive(Debug)]
pub(crate) enum TypeErrorKind {
    EmptySignature,
    NotASingleType(Box<str>),
    UnsupportedTypeCode(char),
}

/// A recoverable runtime condition: logged via `tracing::warn!`, never
/// returned as an `Err` and never unwinds a transition (spec.md §7).
#[derive(Debug, Clone)]
pub enum RuntimeWarning {
    UnknownMethod {
        member: Box<str>,
    },
    UnknownSignal {
        name: Box<str>,
    },
    ReplyOutsideMethodContext,
    MismatchedInArgCount {
        method: Box<str>,
        expected: usize,
        got: usize,
    },
    NoTransitionExecuted {
        context: &'static str,
    },
    UnfuzzableLiteral {
        kind: &'static str,
    },
}

impl fmt::Display for RuntimeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeWarning::UnknownMethod { member } => {
                write!(f, "no transition handles method `{member}`; synthesising empty reply")
            }
            RuntimeWarning::UnknownSignal { name } => {
                write!(f, "no interface declares signal `{name}`; emit skipped")
            }
            RuntimeWarning::ReplyOutsideMethodContext => {
                write!(f, "reply statement executed outside a method-call context; skipped")
            }
            RuntimeWarning::MismatchedInArgCount {
                method,
                expected,
                got,
            } => {
                write!(
                    f,
                    "method `{method}` expects {expected} input argument(s), got {got}; continuing with what was bound"
                )
            }
            RuntimeWarning::NoTransitionExecuted { context } => {
                write!(f, "no transition executed for {context}")
            }
            RuntimeWarning::UnfuzzableLiteral { kind } => {
                write!(f, "fuzzing requested on non-fuzzable `{kind}` literal; weight ignored")
            }
        }
    }
}
