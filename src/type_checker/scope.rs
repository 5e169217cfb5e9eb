//! Lexical scope stack for name resolution.

use std::collections::HashMap;

use crate::errors::errors::ErrorKind;

use super::typed_ast::VarId;

/// Stack of lexical blocks, each mapping a name to its arena handle.
///
/// A block is pushed when entering a function body, an `if`/`else`
/// branch body, a loop body, or a loop header. Redeclaring a name in the
/// topmost block is an error; shadowing an outer block resolves to the
/// innermost match.
#[derive(Debug, Default)]
pub struct ScopeStack {
    blocks: Vec<HashMap<String, VarId>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack { blocks: vec![] }
    }

    pub fn push(&mut self) {
        self.blocks.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        self.blocks.pop();
    }

    pub fn declare(&mut self, name: &str, var: VarId) -> Result<(), ErrorKind> {
        let block = self
            .blocks
            .last_mut()
            .expect("declare called with no open scope");
        if block.contains_key(name) {
            Err(ErrorKind::AlreadyDeclared {
                variable: name.to_string(),
            })
        } else {
            block.insert(name.to_string(), var);
            Ok(())
        }
    }

    pub fn lookup(&self, name: &str) -> Option<VarId> {
        for block in self.blocks.iter().rev() {
            if let Some(var) = block.get(name) {
                return Some(*var);
            }
        }
        None
    }
}
