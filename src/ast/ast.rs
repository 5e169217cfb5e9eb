//! Core definitions of the untyped syntax tree.
//!
//! Every node is a closed enum tagged the way the parser dumps it
//! (`{"type": "declare", ...}`), so the whole tree round-trips through
//! `serde_json` unchanged. Unknown object keys (such as the dump's
//! redundant `"type"` field on function records) are ignored.

use serde::{Deserialize, Serialize};

/// One function definition, in source order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Func {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Param {
    pub dtype: DType,
    pub name: String,
}

/// Declared type tags, spelled as in source.
///
/// Parameters only ever carry the three scalar tags; declarations and
/// loop headers may also wrap them in `列` for arrays.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum DType {
    #[serde(rename = "数")]
    Number,
    #[serde(rename = "文句")]
    String,
    #[serde(rename = "陰陽")]
    Bool,
    #[serde(rename = "列")]
    Array(Box<DType>),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Statement {
    None,
    Return {
        value: Expr,
    },
    Declare {
        dtype: DType,
        name: String,
        #[serde(default)]
        value: Option<Expr>,
    },
    Assign {
        name: String,
        value: Expr,
    },
    If {
        conds: Vec<Condition>,
        #[serde(default, rename = "else")]
        else_body: Option<Vec<Statement>>,
    },
    For {
        dtype: DType,
        name: String,
        init: Expr,
        end: Expr,
        call: CallExpr,
        body: Vec<Statement>,
    },
    While {
        cond: Expr,
        body: Vec<Statement>,
    },
    Call(CallExpr),
    /// Foreign-code escape. The payload is opaque here; its directive
    /// marker is interpreted by the code generators.
    Inline {
        content: String,
    },
}

/// One `if`/`else-if` arm.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Condition {
    pub cond: Expr,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallExpr {
    pub funcname: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Expr {
    Bool {
        value: bool,
    },
    #[serde(rename = "string")]
    Str {
        value: String,
    },
    /// A numeral literal, still in its source spelling.
    Number {
        value: String,
    },
    Ident {
        name: String,
    },
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
    Eq {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Ne {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Gt {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Lt {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Ge {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Le {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Index {
        value: Box<Expr>,
        index: Box<Expr>,
    },
    Call(CallExpr),
}
