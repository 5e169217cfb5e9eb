//! Type checking and type inference module.
//!
//! This module transforms the untyped tree into a typed tree while:
//!
//! - Resolving variable and function references through lexical scopes
//! - Assigning and propagating types via substitution-based unification
//! - Decoding numeral-word literals into numeric values
//! - Registering every function signature before any body is visited,
//!   so forward references and recursion resolve
//! - Replacing every residual type variable in a final resolve pass
//!
//! The checker owns its own unification environment and scope stack, so
//! independent compilations in one process never interfere.

pub mod numerals;
pub mod scope;
pub mod type_checker;
pub mod typed_ast;
pub mod types;
