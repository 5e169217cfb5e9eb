//! Type representation and the unification engine.
//!
//! `Type` is a closed sum; every consumer (the checker, the resolver,
//! each code generator) matches it exhaustively. `UnifyEnv` is the
//! substitution store: a growable vector from type-variable id to its
//! binding, owned by one checking session.

use std::collections::HashMap;
use std::fmt::Display;

use crate::errors::errors::{Construct, ErrorKind};

pub type TypeVarId = u32;

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Void,
    Number,
    String,
    Bool,
    Array(Box<Type>),
    Function(Vec<Type>, Box<Type>),
    /// Solver placeholder, looked up in the unification environment.
    Var(TypeVarId),
    /// Transient "no information yet" placeholder. Never stored in the
    /// unification environment; absorbed by whatever it meets.
    Unknown,
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Number => write!(f, "number"),
            Type::String => write!(f, "string"),
            Type::Bool => write!(f, "bool"),
            Type::Array(base) => write!(f, "[{}]", base),
            Type::Function(params, result) => {
                write!(f, "fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ") -> {}", result)
            }
            Type::Var(id) => write!(f, "?{}", id),
            Type::Unknown => write!(f, "unknown"),
        }
    }
}

/// Substitution store for one checking session.
///
/// A variable id is bound at most once; `resolve` follows bindings to a
/// fixed point. The store is acyclic by construction, since a variable
/// is only ever bound to a type computed before the bind.
#[derive(Debug, Default)]
pub struct UnifyEnv {
    bindings: Vec<Option<Type>>,
}

impl UnifyEnv {
    pub fn new() -> Self {
        UnifyEnv { bindings: vec![] }
    }

    /// Mints a fresh, unbound type variable.
    pub fn fresh_var(&mut self) -> Type {
        Type::Var(self.fresh_var_id())
    }

    fn fresh_var_id(&mut self) -> TypeVarId {
        let id = self.bindings.len() as TypeVarId;
        self.bindings.push(None);
        id
    }

    /// Follows bindings until an unbound variable or a concrete type is
    /// reached, rebuilding compound types along the way. Idempotent.
    pub fn resolve(&self, ty: &Type) -> Type {
        match ty {
            Type::Function(params, result) => Type::Function(
                params.iter().map(|param| self.resolve(param)).collect(),
                Box::new(self.resolve(result)),
            ),
            Type::Array(base) => Type::Array(Box::new(self.resolve(base))),
            Type::Var(id) => match self.bindings.get(*id as usize) {
                Some(Some(bound)) => self.resolve(bound),
                _ => ty.clone(),
            },
            _ => ty.clone(),
        }
    }

    /// Makes two types agree, binding free variables as needed, and
    /// returns the unified type. `construct` names the construct that
    /// demanded agreement and is carried by the failure.
    pub fn unify(&mut self, a: &Type, b: &Type, construct: Construct) -> Result<Type, ErrorKind> {
        let a = self.resolve(a);
        let b = self.resolve(b);
        match (&a, &b) {
            (Type::Var(x), Type::Var(y)) if x == y => Ok(a.clone()),
            // Unknown absorbs before variable binding runs, so it can
            // never end up stored in the environment.
            (Type::Unknown, _) => Ok(b.clone()),
            (_, Type::Unknown) => Ok(a.clone()),
            (Type::Var(id), _) => {
                self.bindings[*id as usize] = Some(b.clone());
                Ok(b.clone())
            }
            (_, Type::Var(id)) => {
                self.bindings[*id as usize] = Some(a.clone());
                Ok(a.clone())
            }
            (Type::Function(params_a, result_a), Type::Function(params_b, result_b)) => {
                if params_a.len() != params_b.len() {
                    return Err(self.mismatch(&a, &b, construct));
                }
                let params = params_a
                    .iter()
                    .zip(params_b.iter())
                    .map(|(x, y)| self.unify(x, y, construct))
                    .collect::<Result<Vec<Type>, ErrorKind>>()?;
                let result = self.unify(result_a, result_b, construct)?;
                Ok(Type::Function(params, Box::new(result)))
            }
            (Type::Array(base_a), Type::Array(base_b)) => Ok(Type::Array(Box::new(
                self.unify(base_a, base_b, construct)?,
            ))),
            _ if a == b => Ok(a.clone()),
            _ => Err(self.mismatch(&a, &b, construct)),
        }
    }

    fn mismatch(&self, a: &Type, b: &Type, construct: Construct) -> ErrorKind {
        ErrorKind::TypeMismatch {
            construct,
            left: a.to_string(),
            right: b.to_string(),
        }
    }

    /// Deep-copies a type for one use site, minting a fresh id for each
    /// distinct variable it contains. Repeated occurrences of one id map
    /// to the same fresh id within a single call. The result position of
    /// a function type stays shared with the registered signature; only
    /// parameter positions are freshened per call site.
    pub fn clone_with_fresh_vars(&mut self, ty: &Type) -> Type {
        let mut map = HashMap::new();
        self.clone_with_map(ty, &mut map)
    }

    fn clone_with_map(&mut self, ty: &Type, map: &mut HashMap<TypeVarId, TypeVarId>) -> Type {
        match ty {
            Type::Function(params, result) => Type::Function(
                params
                    .iter()
                    .map(|param| self.clone_with_map(param, map))
                    .collect(),
                result.clone(),
            ),
            Type::Array(base) => Type::Array(Box::new(self.clone_with_map(base, map))),
            Type::Var(id) => {
                if let Some(fresh) = map.get(id) {
                    Type::Var(*fresh)
                } else {
                    let fresh = self.fresh_var_id();
                    map.insert(*id, fresh);
                    Type::Var(fresh)
                }
            }
            _ => ty.clone(),
        }
    }
}
