use std::fmt::Display;

use thiserror::Error;

/// Which construct demanded type agreement when a unification failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    ReturnValue,
    Initializer,
    Assignment,
    Condition,
    ComparisonOperands,
    ArrayIndex,
    ArrayBase,
    LoopBound,
    CallArgument,
}

impl Display for Construct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Construct::ReturnValue => write!(f, "return value"),
            Construct::Initializer => write!(f, "declaration initializer"),
            Construct::Assignment => write!(f, "assignment"),
            Construct::Condition => write!(f, "condition"),
            Construct::ComparisonOperands => write!(f, "comparison operands"),
            Construct::ArrayIndex => write!(f, "array index"),
            Construct::ArrayBase => write!(f, "indexed value"),
            Construct::LoopBound => write!(f, "loop bound"),
            Construct::CallArgument => write!(f, "call argument"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorKind,
    function: Option<String>,
}

impl Error {
    pub fn new(error_kind: ErrorKind) -> Self {
        Error {
            internal_error: error_kind,
            function: None,
        }
    }

    pub fn in_function(error_kind: ErrorKind, function: &str) -> Self {
        Error {
            internal_error: error_kind,
            function: Some(function.to_string()),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.internal_error
    }

    pub fn get_function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorKind::AlreadyDeclared { .. } => "AlreadyDeclared",
            ErrorKind::UnknownVariable { .. } => "UnknownVariable",
            ErrorKind::UnknownFunction { .. } => "UnknownFunction",
            ErrorKind::TypeMismatch { .. } => "TypeMismatch",
            ErrorKind::InvalidNumeral { .. } => "InvalidNumeral",
            ErrorKind::ArityMismatch { .. } => "ArityMismatch",
            ErrorKind::MalformedSyntaxTree { .. } => "MalformedSyntaxTree",
            ErrorKind::UnknownDirective { .. } => "UnknownDirective",
            ErrorKind::UnsupportedNativeType { .. } => "UnsupportedNativeType",
            ErrorKind::NativeCompilerFailed { .. } => "NativeCompilerFailed",
            ErrorKind::NativeLoadFailed { .. } => "NativeLoadFailed",
            ErrorKind::Io { .. } => "Io",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorKind::AlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Name `{}` already declared in this block", variable))
            }
            ErrorKind::UnknownVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorKind::UnknownFunction { function } => {
                ErrorTip::Suggestion(format!("Function `{}` not declared", function))
            }
            ErrorKind::TypeMismatch {
                construct,
                left,
                right,
            } => ErrorTip::Suggestion(format!(
                "Expected matching types for {}, got `{}` and `{}`",
                construct, left, right
            )),
            ErrorKind::InvalidNumeral { literal } => ErrorTip::Suggestion(format!(
                "Invalid numeral: `{}`, is every glyph a digit, unit or group glyph?",
                literal
            )),
            ErrorKind::ArityMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorKind::MalformedSyntaxTree { message } => {
                ErrorTip::Suggestion(format!("The syntax tree dump did not decode: {}", message))
            }
            ErrorKind::UnknownDirective { directive } => ErrorTip::Suggestion(format!(
                "Escape text must start with `前書` or `本文`, found `{}`",
                directive
            )),
            ErrorKind::UnsupportedNativeType { type_ } => ErrorTip::Suggestion(format!(
                "Type `{}` cannot cross the native boundary",
                type_
            )),
            ErrorKind::NativeCompilerFailed { message } => ErrorTip::Suggestion(message.clone()),
            ErrorKind::NativeLoadFailed { message } => ErrorTip::Suggestion(message.clone()),
            ErrorKind::Io { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.function {
            Some(function) => write!(f, "{} (in function {})", self.internal_error, function),
            None => write!(f, "{}", self.internal_error),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::Io {
            message: err.to_string(),
        })
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorKind {
    #[error("name {variable:?} already declared")]
    AlreadyDeclared { variable: String },
    #[error("variable {variable:?} not found")]
    UnknownVariable { variable: String },
    #[error("function {function:?} not found")]
    UnknownFunction { function: String },
    #[error("types do not match for {construct}: {left:?} and {right:?}")]
    TypeMismatch {
        construct: Construct,
        left: String,
        right: String,
    },
    #[error("illegal numeral literal: {literal:?}")]
    InvalidNumeral { literal: String },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    ArityMismatch { expected: usize, received: usize },
    #[error("malformed syntax tree: {message}")]
    MalformedSyntaxTree { message: String },
    #[error("unknown escape directive: {directive:?}")]
    UnknownDirective { directive: String },
    #[error("type {type_:?} has no native representation")]
    UnsupportedNativeType { type_: String },
    #[error("native compiler failed: {message}")]
    NativeCompilerFailed { message: String },
    #[error("failed to load native library: {message}")]
    NativeLoadFailed { message: String },
    #[error("io error: {message}")]
    Io { message: String },
}
