#![allow(clippy::module_inception)]

use crate::ast::ast::Func;
use crate::errors::errors::{Error, ErrorKind, ErrorTip};
use crate::type_checker::type_checker::check;
use crate::type_checker::typed_ast::TypedProgram;

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod type_checker;

/// Code generation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Js,
    C99,
}

/// Decodes the parser's serialized syntax tree dump into the untyped tree.
pub fn parse_program(dump: &str) -> Result<Vec<Func>, Error> {
    serde_json::from_str(dump).map_err(|err| {
        Error::new(ErrorKind::MalformedSyntaxTree {
            message: err.to_string(),
        })
    })
}

/// Emits source text for the given target from a fully checked program.
pub fn generate(program: &TypedProgram, backend: Backend) -> Result<String, Error> {
    match backend {
        Backend::Js => compiler::js::generate(program),
        Backend::C99 => compiler::c99::generate(program),
    }
}

/// Full pipeline: serialized tree in, target source text out.
pub fn compile(dump: &str, backend: Backend) -> Result<String, Error> {
    let tree = parse_program(dump)?;
    let typed = check(&tree)?;
    generate(&typed, backend)
}

pub fn display_error(error: &Error) {
    /*
        Error: TypeMismatch (Expected matching types for return value, ...)
        -> in function 甲
    */

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    if let Some(function) = error.get_function() {
        println!("-> in function {}", function);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_program_rejects_garbage() {
        let result = parse_program("[{\"type\": 12}]");
        assert!(result.is_err());
        assert_eq!(
            result.err().unwrap().get_error_name(),
            "MalformedSyntaxTree"
        );
    }

    #[test]
    fn test_compile_pipeline() {
        let dump = r#"[
            {
                "type": "type",
                "name": "値",
                "params": [],
                "body": [{"type": "return", "value": {"type": "bool", "value": true}}]
            }
        ]"#;
        let generated = compile(dump, Backend::Js).unwrap();
        assert!(generated.contains("export function 値("));
        assert!(generated.contains("return true;"));
    }
}
