//! C99 backend.
//!
//! Emits one native function per source function with the mapping
//! number→`double`, string→`const char *`, bool→`int`. Comparison nodes
//! carry their unified operand type, which decides the comparison
//! strategy: string operands go through `strcmp`, everything else uses
//! the value operators. Header-placement escape text accumulates and is
//! prepended once; body-placement escape text is emitted in place.

use crate::errors::errors::{Error, ErrorKind};
use crate::type_checker::typed_ast::{
    CallExpr, CompareOp, Expr, Statement, TypedFunc, TypedProgram,
};
use crate::type_checker::types::Type;

pub fn generate(program: &TypedProgram) -> Result<String, Error> {
    Generator::new().generate(program)
}

struct Generator {
    headers: Vec<String>,
    result: String,
    indent: usize,
    bol: bool,
}

impl Generator {
    fn new() -> Self {
        Generator {
            headers: vec![],
            result: String::new(),
            indent: 0,
            bol: true,
        }
    }

    fn print(&mut self, str: &str) {
        if self.bol && !str.is_empty() {
            self.result.push_str(&"\t".repeat(self.indent));
            self.bol = false;
        }
        self.result.push_str(str);
    }

    fn println(&mut self, str: &str) {
        self.print(str);
        self.result.push('\n');
        self.bol = true;
    }

    fn require_header(&mut self, header: &str) {
        if !self.headers.iter().any(|existing| existing == header) {
            self.headers.push(header.to_string());
        }
    }

    fn generate(mut self, program: &TypedProgram) -> Result<String, Error> {
        for (name, func) in &program.funcs {
            self.generate_func(program, name, func)?;
        }
        if !self.headers.is_empty() {
            self.result = format!("{}\n{}", self.headers.join("\n\n"), self.result);
        }
        Ok(self.result)
    }

    fn generate_type(&self, ty: &Type) -> Result<&'static str, Error> {
        match ty {
            Type::Void => Ok("void"),
            Type::Number => Ok("double"),
            Type::String => Ok("const char *"),
            Type::Bool => Ok("int"),
            Type::Array(_) | Type::Function(..) | Type::Var(_) | Type::Unknown => {
                Err(Error::new(ErrorKind::UnsupportedNativeType {
                    type_: ty.to_string(),
                }))
            }
        }
    }

    fn generate_func(
        &mut self,
        program: &TypedProgram,
        name: &str,
        func: &TypedFunc,
    ) -> Result<(), Error> {
        let result_type = self.generate_type(&func.signature.result)?;
        self.print(&format!("{} {}(", result_type, name));
        let params = func
            .params
            .iter()
            .map(|param| {
                let var = program.vars.get(*param);
                Ok(format!("{} {}", self.generate_type(&var.dtype)?, var.name))
            })
            .collect::<Result<Vec<String>, Error>>()?
            .join(", ");
        self.print(&params);
        self.println(") {");
        self.indent += 1;
        for stmt in &func.body {
            self.generate_stmt(program, stmt)?;
        }
        self.indent -= 1;
        self.println("}");
        self.println("");
        Ok(())
    }

    fn generate_stmt(&mut self, program: &TypedProgram, stmt: &Statement) -> Result<(), Error> {
        match stmt {
            Statement::Return { value } => {
                let value = self.generate_expr(program, value);
                self.println(&format!("return {};", value));
            }
            Statement::Declare { variable, value } => {
                let var = program.vars.get(*variable);
                let var_type = self.generate_type(&var.dtype)?;
                self.print(&format!("{} {}", var_type, var.name));
                if let Some(value) = value {
                    let value = self.generate_expr(program, value);
                    self.print(&format!(" = {}", value));
                }
                self.println(";");
            }
            Statement::Assign { variable, value } => {
                let value = self.generate_expr(program, value);
                self.println(&format!(
                    "{} = {};",
                    program.vars.get(*variable).name,
                    value
                ));
            }
            Statement::Call { call } => {
                let call = self.generate_call(program, call);
                self.println(&format!("{};", call));
            }
            Statement::Inline { content } => {
                let content = content.trim();
                if let Some(header) = content.strip_prefix("前書") {
                    self.headers.push(header.to_string());
                } else if let Some(body) = content.strip_prefix("本文") {
                    self.println(body);
                } else {
                    return Err(Error::new(ErrorKind::UnknownDirective {
                        directive: content.chars().take(2).collect(),
                    }));
                }
            }
            Statement::If { conds, else_body } => {
                for condition in conds {
                    let cond = self.generate_expr(program, &condition.cond);
                    self.println(&format!("if ({}) {{", cond));
                    self.indent += 1;
                    for stmt in &condition.body {
                        self.generate_stmt(program, stmt)?;
                    }
                    self.indent -= 1;
                    self.print("} else ");
                }
                if let Some(else_body) = else_body {
                    self.println("{");
                    self.indent += 1;
                    for stmt in else_body {
                        self.generate_stmt(program, stmt)?;
                    }
                    self.indent -= 1;
                    self.println("}");
                } else {
                    self.println(";");
                }
            }
            Statement::For {
                variable,
                init,
                end,
                call,
                body,
            } => {
                let var = program.vars.get(*variable);
                let var_type = self.generate_type(&var.dtype)?;
                let name = var.name.clone();
                self.print("for (");
                let init = self.generate_expr(program, init);
                self.print(&format!("{} {} = {};", var_type, name, init));
                let end = self.generate_expr(program, end);
                self.print(&format!("{} != {};", name, end));
                let call = self.generate_call(program, call);
                self.println(&format!("{} = {}) {{", name, call));
                self.indent += 1;
                for stmt in body {
                    self.generate_stmt(program, stmt)?;
                }
                self.indent -= 1;
                self.println("}");
            }
            Statement::While { cond, body } => {
                let cond = self.generate_expr(program, cond);
                self.println(&format!("while ({}) {{", cond));
                self.indent += 1;
                for stmt in body {
                    self.generate_stmt(program, stmt)?;
                }
                self.indent -= 1;
                self.println("}");
            }
        }
        Ok(())
    }

    fn generate_expr(&mut self, program: &TypedProgram, expr: &Expr) -> String {
        match expr {
            Expr::Str(value) => format!("\"{}\"", value),
            Expr::Bool(value) => format!("{}", if *value { 1 } else { 0 }),
            Expr::Number(value) => format!("{}", value),
            Expr::Ident(variable) => program.vars.get(*variable).name.clone(),
            Expr::And { left, right } => format!(
                "({}) && ({})",
                self.generate_expr(program, left),
                self.generate_expr(program, right)
            ),
            Expr::Or { left, right } => format!(
                "({}) || ({})",
                self.generate_expr(program, left),
                self.generate_expr(program, right)
            ),
            Expr::Not { value } => format!("!({})", self.generate_expr(program, value)),
            Expr::Compare {
                op,
                dtype,
                left,
                right,
            } => {
                let left = self.generate_expr(program, left);
                let right = self.generate_expr(program, right);
                if *dtype == Type::String {
                    self.require_header("#include <string.h>");
                    let relation = match op {
                        CompareOp::Eq => "== 0",
                        CompareOp::Ne => "!= 0",
                        CompareOp::Gt => "> 0",
                        CompareOp::Lt => "< 0",
                        CompareOp::Ge => ">= 0",
                        CompareOp::Le => "<= 0",
                    };
                    format!("strcmp({}, {}) {}", left, right, relation)
                } else {
                    let operator = match op {
                        CompareOp::Eq => "==",
                        CompareOp::Ne => "!=",
                        CompareOp::Gt => ">",
                        CompareOp::Lt => "<",
                        CompareOp::Ge => ">=",
                        CompareOp::Le => "<=",
                    };
                    format!("({}) {} ({})", left, operator, right)
                }
            }
            Expr::Index { value, index, .. } => format!(
                "({})[(int)({})]",
                self.generate_expr(program, value),
                self.generate_expr(program, index)
            ),
            Expr::Call(call) => self.generate_call(program, call),
        }
    }

    fn generate_call(&mut self, program: &TypedProgram, call: &CallExpr) -> String {
        let args = call
            .args
            .iter()
            .map(|arg| self.generate_expr(program, arg))
            .collect::<Vec<String>>()
            .join(", ");
        format!("{}({})", call.funcname, args)
    }
}
