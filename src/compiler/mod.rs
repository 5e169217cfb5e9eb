//! Code generation module for the compiler.
//!
//! This module contains the two source-text emitters that consume the
//! typed tree, plus the native execution harness. It handles:
//!
//! - Emission of scripting-target source (one exported function per
//!   source function, names preserved verbatim)
//! - Emission of C99 source with the native type mapping
//! - Foreign-code escape placement (header vs. body directives)
//! - Compiling generated C to a shared library and loading it

pub mod c99;
pub mod js;
pub mod runtime;
