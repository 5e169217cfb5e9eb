//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Construct, Error, ErrorKind, ErrorTip};

#[test]
fn test_error_creation() {
    let error = Error::new(ErrorKind::InvalidNumeral {
        literal: "壱あ".to_string(),
    });

    assert_eq!(error.get_error_name(), "InvalidNumeral");
    assert_eq!(error.get_function(), None);
}

#[test]
fn test_error_function_context() {
    let error = Error::in_function(
        ErrorKind::UnknownVariable {
            variable: "乙".to_string(),
        },
        "甲",
    );

    assert_eq!(error.get_function(), Some("甲"));
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(ErrorKind::TypeMismatch {
        construct: Construct::ReturnValue,
        left: "bool".to_string(),
        right: "string".to_string(),
    });

    assert_eq!(error.get_error_name(), "TypeMismatch");
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => {
            assert!(tip.contains("return value"));
            assert!(tip.contains("bool"));
            assert!(tip.contains("string"));
        }
        ErrorTip::None => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_already_declared_error() {
    let error = Error::new(ErrorKind::AlreadyDeclared {
        variable: "乙".to_string(),
    });

    assert_eq!(error.get_error_name(), "AlreadyDeclared");
}

#[test]
fn test_unknown_variable_error() {
    let error = Error::new(ErrorKind::UnknownVariable {
        variable: "乙".to_string(),
    });

    assert_eq!(error.get_error_name(), "UnknownVariable");
}

#[test]
fn test_unknown_function_error() {
    let error = Error::new(ErrorKind::UnknownFunction {
        function: "無之儀".to_string(),
    });

    assert_eq!(error.get_error_name(), "UnknownFunction");
}

#[test]
fn test_arity_mismatch_error() {
    let error = Error::new(ErrorKind::ArityMismatch {
        expected: 2,
        received: 3,
    });

    assert_eq!(error.get_error_name(), "ArityMismatch");
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "Expected 2 arguments, received 3"),
        ErrorTip::None => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_unknown_directive_error() {
    let error = Error::new(ErrorKind::UnknownDirective {
        directive: "謎の".to_string(),
    });

    assert_eq!(error.get_error_name(), "UnknownDirective");
}

#[test]
fn test_unsupported_native_type_error() {
    let error = Error::new(ErrorKind::UnsupportedNativeType {
        type_: "[number]".to_string(),
    });

    assert_eq!(error.get_error_name(), "UnsupportedNativeType");
}

#[test]
fn test_io_error_tip_none() {
    let error = Error::new(ErrorKind::Io {
        message: "missing".to_string(),
    });

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_includes_function() {
    let error = Error::in_function(
        ErrorKind::UnknownVariable {
            variable: "乙".to_string(),
        },
        "甲",
    );

    let rendered = error.to_string();
    assert!(rendered.contains("乙"));
    assert!(rendered.contains("in function 甲"));
}

#[test]
fn test_construct_display() {
    assert_eq!(Construct::ReturnValue.to_string(), "return value");
    assert_eq!(Construct::Initializer.to_string(), "declaration initializer");
    assert_eq!(Construct::LoopBound.to_string(), "loop bound");
    assert_eq!(Construct::CallArgument.to_string(), "call argument");
}
