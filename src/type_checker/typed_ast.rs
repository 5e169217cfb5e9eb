//! Typed Abstract Syntax Tree definitions.
//!
//! This module contains the typed variants of tree nodes produced by
//! the checker. The typed tree mirrors the untyped one but includes:
//!
//! - Resolved types on every type-carrying node
//! - Validated function signatures
//! - Variable references resolved to arena handles
//!
//! Declared identifiers live in a single `VarArena`; every referencing
//! node holds a `VarId` into it rather than a copy, so a type refined
//! late in inference is visible at every earlier use site. After the
//! final resolve pass no `Var` or node type contains a type variable or
//! `Unknown`, which the code generators rely on.

use indexmap::IndexMap;

use super::types::Type;

/// Handle to one declared identifier in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarId(usize);

/// One declared identifier (parameter, local, or loop counter).
#[derive(Debug, Clone)]
pub struct Var {
    pub name: String,
    pub dtype: Type,
}

/// Owns every `Var` of one compilation unit.
#[derive(Debug, Default)]
pub struct VarArena {
    vars: Vec<Var>,
}

impl VarArena {
    pub fn new() -> Self {
        VarArena { vars: vec![] }
    }

    pub fn alloc(&mut self, name: String, dtype: Type) -> VarId {
        self.vars.push(Var { name, dtype });
        VarId(self.vars.len() - 1)
    }

    pub fn get(&self, id: VarId) -> &Var {
        &self.vars[id.0]
    }

    pub fn get_mut(&mut self, id: VarId) -> &mut Var {
        &mut self.vars[id.0]
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Var> {
        self.vars.iter_mut()
    }
}

/// A function's type: parameter types and result type. Registered before
/// any body is checked, which is what lets forward references and
/// recursive calls resolve.
#[derive(Debug, Clone)]
pub struct FuncSig {
    pub params: Vec<Type>,
    pub result: Type,
}

impl FuncSig {
    pub fn as_type(&self) -> Type {
        Type::Function(self.params.clone(), Box::new(self.result.clone()))
    }
}

#[derive(Debug)]
pub struct TypedFunc {
    pub signature: FuncSig,
    pub params: Vec<VarId>,
    pub body: Vec<Statement>,
}

/// The checked compilation unit: functions in declaration order plus the
/// variable arena their bodies reference.
#[derive(Debug)]
pub struct TypedProgram {
    pub funcs: IndexMap<String, TypedFunc>,
    pub vars: VarArena,
}

#[derive(Debug)]
pub enum Statement {
    Return {
        value: Expr,
    },
    Declare {
        variable: VarId,
        value: Option<Expr>,
    },
    Assign {
        variable: VarId,
        value: Expr,
    },
    Call {
        call: CallExpr,
    },
    If {
        conds: Vec<Condition>,
        else_body: Option<Vec<Statement>>,
    },
    For {
        variable: VarId,
        init: Expr,
        end: Expr,
        call: CallExpr,
        body: Vec<Statement>,
    },
    While {
        cond: Expr,
        body: Vec<Statement>,
    },
    /// Foreign-code escape, passed through unchanged and untyped.
    Inline {
        content: String,
    },
}

#[derive(Debug)]
pub struct Condition {
    pub cond: Expr,
    pub body: Vec<Statement>,
}

#[derive(Debug)]
pub struct CallExpr {
    pub funcname: String,
    pub args: Vec<Expr>,
    /// The callee's signature as seen from this call site.
    pub signature: FuncSig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

#[derive(Debug)]
pub enum Expr {
    Bool(bool),
    Str(String),
    Number(f64),
    Ident(VarId),
    And {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Or {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not {
        value: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        /// The unified operand type; generators pick a comparison
        /// strategy from it.
        dtype: Type,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Index {
        value: Box<Expr>,
        index: Box<Expr>,
        /// The element type this index yields.
        dtype: Type,
    },
    Call(CallExpr),
}
