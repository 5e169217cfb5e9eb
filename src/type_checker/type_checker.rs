use indexmap::IndexMap;

use crate::ast::ast;
use crate::errors::errors::{Construct, Error, ErrorKind};

use super::numerals::decode_numeral;
use super::scope::ScopeStack;
use super::typed_ast::{
    CallExpr, CompareOp, Condition, Expr, FuncSig, Statement, TypedFunc, TypedProgram, VarArena,
    VarId,
};
use super::types::{Type, UnifyEnv};

/// Checks a whole compilation unit and returns the typed tree.
///
/// The first error encountered in tree order aborts the check; no
/// partial tree is ever returned.
pub fn check(program: &[ast::Func]) -> Result<TypedProgram, Error> {
    let mut checker = Checker::new();
    for func in program {
        checker.register_signature(func)?;
    }
    for func in program {
        checker.construct_function(func)?;
    }
    checker.apply_inferred_types();
    Ok(TypedProgram {
        funcs: checker.funcs,
        vars: checker.vars,
    })
}

fn convert_dtype(dtype: &ast::DType) -> Type {
    match dtype {
        ast::DType::Number => Type::Number,
        ast::DType::String => Type::String,
        ast::DType::Bool => Type::Bool,
        ast::DType::Array(base) => Type::Array(Box::new(convert_dtype(base))),
    }
}

/// One checking session. Owns the unification environment, the scope
/// stack and the variable arena for a single compilation unit.
#[derive(Debug)]
pub struct Checker {
    funcs: IndexMap<String, TypedFunc>,
    vars: VarArena,
    scope: ScopeStack,
    unify_env: UnifyEnv,
    has_return: bool,
    result_type: Type,
    current_function: String,
}

impl Checker {
    fn new() -> Self {
        Checker {
            funcs: IndexMap::new(),
            vars: VarArena::new(),
            scope: ScopeStack::new(),
            unify_env: UnifyEnv::new(),
            has_return: false,
            result_type: Type::Unknown,
            current_function: String::new(),
        }
    }

    fn err(&self, kind: ErrorKind) -> Error {
        Error::in_function(kind, &self.current_function)
    }

    fn unify(&mut self, a: &Type, b: &Type, construct: Construct) -> Result<Type, Error> {
        self.unify_env
            .unify(a, b, construct)
            .map_err(|kind| self.err(kind))
    }

    /// Registers the function's signature under its name, with a fresh
    /// type variable standing in for the not-yet-known result. Runs for
    /// every function before any body is visited, so every name is
    /// resolvable regardless of declaration order.
    fn register_signature(&mut self, func: &ast::Func) -> Result<(), Error> {
        if self.funcs.contains_key(&func.name) {
            return Err(Error::in_function(
                ErrorKind::AlreadyDeclared {
                    variable: func.name.clone(),
                },
                &func.name,
            ));
        }
        let params: Vec<VarId> = func
            .params
            .iter()
            .map(|param| {
                self.vars
                    .alloc(param.name.clone(), convert_dtype(&param.dtype))
            })
            .collect();
        let param_types = params
            .iter()
            .map(|id| self.vars.get(*id).dtype.clone())
            .collect();
        let result = self.unify_env.fresh_var();
        self.funcs.insert(
            func.name.clone(),
            TypedFunc {
                signature: FuncSig {
                    params: param_types,
                    result,
                },
                params,
                body: vec![],
            },
        );
        Ok(())
    }

    fn construct_function(&mut self, func: &ast::Func) -> Result<(), Error> {
        self.current_function = func.name.clone();
        let typed_func = &self.funcs[&func.name];
        self.result_type = typed_func.signature.result.clone();
        self.has_return = false;
        let param_ids = typed_func.params.clone();

        self.scope.push();
        for id in &param_ids {
            let name = self.vars.get(*id).name.clone();
            self.scope.declare(&name, *id).map_err(|kind| self.err(kind))?;
        }
        let body = self.construct_block(&func.body)?;
        self.scope.pop();

        if !self.has_return {
            let result_type = self.result_type.clone();
            self.unify(&result_type, &Type::Void, Construct::ReturnValue)?;
        }
        self.funcs[&func.name].body = body;
        Ok(())
    }

    /// No-op statements disappear here; everything else keeps its order.
    fn construct_block(&mut self, stmts: &[ast::Statement]) -> Result<Vec<Statement>, Error> {
        let mut body = vec![];
        for stmt in stmts {
            if let Some(typed) = self.construct_statement(stmt)? {
                body.push(typed);
            }
        }
        Ok(body)
    }

    fn construct_statement(&mut self, stmt: &ast::Statement) -> Result<Option<Statement>, Error> {
        match stmt {
            ast::Statement::None => Ok(None),
            ast::Statement::Return { value } => {
                let (value, value_type) = self.construct_expr(value)?;
                let result_type = self.result_type.clone();
                self.unify(&result_type, &value_type, Construct::ReturnValue)?;
                self.has_return = true;
                Ok(Some(Statement::Return { value }))
            }
            ast::Statement::Declare { dtype, name, value } => {
                let (value, value_type) = match value {
                    Some(expr) => {
                        let (value, value_type) = self.construct_expr(expr)?;
                        (Some(value), value_type)
                    }
                    None => (None, Type::Unknown),
                };
                let declared = convert_dtype(dtype);
                let concrete = self.unify(&value_type, &declared, Construct::Initializer)?;
                let variable = self.vars.alloc(name.clone(), concrete);
                self.scope
                    .declare(name, variable)
                    .map_err(|kind| self.err(kind))?;
                Ok(Some(Statement::Declare { variable, value }))
            }
            ast::Statement::Assign { name, value } => {
                let variable = self.scope.lookup(name).ok_or_else(|| {
                    self.err(ErrorKind::UnknownVariable {
                        variable: name.clone(),
                    })
                })?;
                let (value, value_type) = self.construct_expr(value)?;
                let var_type = self.vars.get(variable).dtype.clone();
                self.unify(&var_type, &value_type, Construct::Assignment)?;
                Ok(Some(Statement::Assign { variable, value }))
            }
            ast::Statement::If { conds, else_body } => {
                let mut typed_conds = vec![];
                for condition in conds {
                    let (cond, cond_type) = self.construct_expr(&condition.cond)?;
                    self.unify(&cond_type, &Type::Bool, Construct::Condition)?;
                    self.scope.push();
                    let body = self.construct_block(&condition.body)?;
                    self.scope.pop();
                    typed_conds.push(Condition { cond, body });
                }
                let else_body = match else_body {
                    Some(stmts) => {
                        self.scope.push();
                        let body = self.construct_block(stmts)?;
                        self.scope.pop();
                        Some(body)
                    }
                    None => None,
                };
                Ok(Some(Statement::If {
                    conds: typed_conds,
                    else_body,
                }))
            }
            ast::Statement::For {
                dtype,
                name,
                init,
                end,
                call,
                body,
            } => {
                let var_type = convert_dtype(dtype);
                let (init, init_type) = self.construct_expr(init)?;
                self.unify(&var_type, &init_type, Construct::LoopBound)?;
                let (end, end_type) = self.construct_expr(end)?;
                self.unify(&var_type, &end_type, Construct::LoopBound)?;

                let variable = self.vars.alloc(name.clone(), var_type);
                self.scope.push();
                self.scope
                    .declare(name, variable)
                    .map_err(|kind| self.err(kind))?;
                // The advance call receives the loop variable as its
                // implicit first argument.
                let mut advance = call.clone();
                advance.args.insert(
                    0,
                    ast::Expr::Ident {
                        name: name.clone(),
                    },
                );
                let (call, _) = self.construct_call(&advance)?;
                let body = self.construct_block(body)?;
                self.scope.pop();
                Ok(Some(Statement::For {
                    variable,
                    init,
                    end,
                    call,
                    body,
                }))
            }
            ast::Statement::While { cond, body } => {
                let (cond, cond_type) = self.construct_expr(cond)?;
                self.unify(&cond_type, &Type::Bool, Construct::Condition)?;
                self.scope.push();
                let body = self.construct_block(body)?;
                self.scope.pop();
                Ok(Some(Statement::While { cond, body }))
            }
            ast::Statement::Call(call) => {
                let (call, _) = self.construct_call(call)?;
                Ok(Some(Statement::Call { call }))
            }
            ast::Statement::Inline { content } => Ok(Some(Statement::Inline {
                content: content.clone(),
            })),
        }
    }

    fn construct_expr(&mut self, expr: &ast::Expr) -> Result<(Expr, Type), Error> {
        match expr {
            ast::Expr::Bool { value } => Ok((Expr::Bool(*value), Type::Bool)),
            ast::Expr::Str { value } => Ok((Expr::Str(value.clone()), Type::String)),
            ast::Expr::Number { value } => {
                let number = decode_numeral(value).ok_or_else(|| {
                    self.err(ErrorKind::InvalidNumeral {
                        literal: value.clone(),
                    })
                })?;
                Ok((Expr::Number(number), Type::Number))
            }
            ast::Expr::Ident { name } => {
                let variable = self.scope.lookup(name).ok_or_else(|| {
                    self.err(ErrorKind::UnknownVariable {
                        variable: name.clone(),
                    })
                })?;
                let dtype = self.vars.get(variable).dtype.clone();
                Ok((Expr::Ident(variable), dtype))
            }
            ast::Expr::And { left, right } => {
                let (left, right) = self.construct_bool_pair(left, right)?;
                Ok((
                    Expr::And {
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    Type::Bool,
                ))
            }
            ast::Expr::Or { left, right } => {
                let (left, right) = self.construct_bool_pair(left, right)?;
                Ok((
                    Expr::Or {
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    Type::Bool,
                ))
            }
            ast::Expr::Not { value } => {
                let (value, value_type) = self.construct_expr(value)?;
                self.unify(&value_type, &Type::Bool, Construct::Condition)?;
                Ok((
                    Expr::Not {
                        value: Box::new(value),
                    },
                    Type::Bool,
                ))
            }
            ast::Expr::Eq { left, right } => self.construct_compare(CompareOp::Eq, left, right),
            ast::Expr::Ne { left, right } => self.construct_compare(CompareOp::Ne, left, right),
            ast::Expr::Gt { left, right } => self.construct_compare(CompareOp::Gt, left, right),
            ast::Expr::Lt { left, right } => self.construct_compare(CompareOp::Lt, left, right),
            ast::Expr::Ge { left, right } => self.construct_compare(CompareOp::Ge, left, right),
            ast::Expr::Le { left, right } => self.construct_compare(CompareOp::Le, left, right),
            ast::Expr::Index { value, index } => {
                let (value, value_type) = self.construct_expr(value)?;
                let (index, index_type) = self.construct_expr(index)?;
                self.unify(&index_type, &Type::Number, Construct::ArrayIndex)?;
                let element = self.unify_env.fresh_var();
                self.unify(
                    &value_type,
                    &Type::Array(Box::new(element.clone())),
                    Construct::ArrayBase,
                )?;
                Ok((
                    Expr::Index {
                        value: Box::new(value),
                        index: Box::new(index),
                        dtype: element.clone(),
                    },
                    element,
                ))
            }
            ast::Expr::Call(call) => {
                let (call, result) = self.construct_call(call)?;
                Ok((Expr::Call(call), result))
            }
        }
    }

    fn construct_bool_pair(
        &mut self,
        left: &ast::Expr,
        right: &ast::Expr,
    ) -> Result<(Expr, Expr), Error> {
        let (left, left_type) = self.construct_expr(left)?;
        let (right, right_type) = self.construct_expr(right)?;
        self.unify(&left_type, &Type::Bool, Construct::Condition)?;
        self.unify(&right_type, &Type::Bool, Construct::Condition)?;
        Ok((left, right))
    }

    fn construct_compare(
        &mut self,
        op: CompareOp,
        left: &ast::Expr,
        right: &ast::Expr,
    ) -> Result<(Expr, Type), Error> {
        let (left, left_type) = self.construct_expr(left)?;
        let (right, right_type) = self.construct_expr(right)?;
        let dtype = self.unify(&left_type, &right_type, Construct::ComparisonOperands)?;
        Ok((
            Expr::Compare {
                op,
                dtype,
                left: Box::new(left),
                right: Box::new(right),
            },
            Type::Bool,
        ))
    }

    /// Checks a call against the callee's registered signature. The
    /// signature is instantiated freshly for this call site, so argument
    /// types at one site never constrain a sibling site.
    fn construct_call(&mut self, call: &ast::CallExpr) -> Result<(CallExpr, Type), Error> {
        let mut args = vec![];
        let mut arg_types = vec![];
        for arg in &call.args {
            let (arg, arg_type) = self.construct_expr(arg)?;
            args.push(arg);
            arg_types.push(arg_type);
        }

        let callee = self.funcs.get(&call.funcname).ok_or_else(|| {
            self.err(ErrorKind::UnknownFunction {
                function: call.funcname.clone(),
            })
        })?;
        let expected = callee.signature.params.len();
        if args.len() != expected {
            return Err(self.err(ErrorKind::ArityMismatch {
                expected,
                received: args.len(),
            }));
        }

        let instantiated = self.unify_env.clone_with_fresh_vars(&callee.signature.as_type());
        let call_shape = Type::Function(arg_types, Box::new(Type::Unknown));
        let unified = self.unify(&call_shape, &instantiated, Construct::CallArgument)?;
        let Type::Function(params, result) = unified else {
            unreachable!("unifying two function shapes yields a function shape");
        };
        let result = *result;
        Ok((
            CallExpr {
                funcname: call.funcname.clone(),
                args,
                signature: FuncSig {
                    params,
                    result: result.clone(),
                },
            },
            result,
        ))
    }

    /// Final pass: replace every stored type with its resolved form,
    /// defaulting any still-unbound variable to `Void`. Idempotent, so
    /// visiting order does not matter.
    fn apply_inferred_types(&mut self) {
        let env = &self.unify_env;
        for var in self.vars.iter_mut() {
            var.dtype = resolve_final(env, &var.dtype);
        }
        for (_, func) in self.funcs.iter_mut() {
            func.signature.params = func
                .signature
                .params
                .iter()
                .map(|param| resolve_final(env, param))
                .collect();
            func.signature.result = resolve_final(env, &func.signature.result);
            for stmt in &mut func.body {
                resolve_statement(env, stmt);
            }
        }
    }
}

fn resolve_final(env: &UnifyEnv, ty: &Type) -> Type {
    finalize(env.resolve(ty))
}

/// An unbound result variable means no `return` ever pinned it down;
/// it defaults to "no value returned".
fn finalize(ty: Type) -> Type {
    match ty {
        Type::Var(_) | Type::Unknown => Type::Void,
        Type::Array(base) => Type::Array(Box::new(finalize(*base))),
        Type::Function(params, result) => Type::Function(
            params.into_iter().map(finalize).collect(),
            Box::new(finalize(*result)),
        ),
        other => other,
    }
}

fn resolve_statement(env: &UnifyEnv, stmt: &mut Statement) {
    match stmt {
        Statement::Return { value } => resolve_expr(env, value),
        Statement::Declare { value, .. } => {
            if let Some(value) = value {
                resolve_expr(env, value);
            }
        }
        Statement::Assign { value, .. } => resolve_expr(env, value),
        Statement::Call { call } => resolve_call(env, call),
        Statement::If { conds, else_body } => {
            for condition in conds {
                resolve_expr(env, &mut condition.cond);
                for stmt in &mut condition.body {
                    resolve_statement(env, stmt);
                }
            }
            if let Some(else_body) = else_body {
                for stmt in else_body {
                    resolve_statement(env, stmt);
                }
            }
        }
        Statement::For {
            init,
            end,
            call,
            body,
            ..
        } => {
            resolve_expr(env, init);
            resolve_expr(env, end);
            resolve_call(env, call);
            for stmt in body {
                resolve_statement(env, stmt);
            }
        }
        Statement::While { cond, body } => {
            resolve_expr(env, cond);
            for stmt in body {
                resolve_statement(env, stmt);
            }
        }
        Statement::Inline { .. } => {}
    }
}

fn resolve_expr(env: &UnifyEnv, expr: &mut Expr) {
    match expr {
        Expr::Bool(_) | Expr::Str(_) | Expr::Number(_) | Expr::Ident(_) => {}
        Expr::And { left, right } | Expr::Or { left, right } => {
            resolve_expr(env, left);
            resolve_expr(env, right);
        }
        Expr::Not { value } => resolve_expr(env, value),
        Expr::Compare {
            dtype, left, right, ..
        } => {
            *dtype = resolve_final(env, dtype);
            resolve_expr(env, left);
            resolve_expr(env, right);
        }
        Expr::Index {
            value,
            index,
            dtype,
        } => {
            *dtype = resolve_final(env, dtype);
            resolve_expr(env, value);
            resolve_expr(env, index);
        }
        Expr::Call(call) => resolve_call(env, call),
    }
}

fn resolve_call(env: &UnifyEnv, call: &mut CallExpr) {
    call.signature.params = call
        .signature
        .params
        .iter()
        .map(|param| resolve_final(env, param))
        .collect();
    call.signature.result = resolve_final(env, &call.signature.result);
    for arg in &mut call.args {
        resolve_expr(env, arg);
    }
}
