//! AST (Abstract Syntax Tree) module
//! Contains all definitions related to the untyped tree structure
//!
//! The tree is produced by the upstream grammar-driven parser and handed
//! to this crate as a tagged JSON dump; the types here are its serde
//! model. Numeral literals arrive as raw literal words, not decoded
//! values.

pub mod ast;
