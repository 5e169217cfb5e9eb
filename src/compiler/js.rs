//! Scripting-target backend.
//!
//! Emits one `export function` per source function. The target runtime
//! is dynamically typed, so declared types never appear in the output;
//! only names and structure survive.

use crate::errors::errors::{Error, ErrorKind};
use crate::type_checker::typed_ast::{
    CallExpr, CompareOp, Expr, Statement, TypedFunc, TypedProgram,
};

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

    fn generate(mut self, program: &TypedProgram) -> Result<String, Error> {
        for (name, func) in &program.funcs {
            self.generate_func(program, name, func)?;
        }
        if !self.headers.is_empty() {
            self.result = format!("{}\n{}", self.headers.join("\n\n"), self.result);
        }
        Ok(self.result)
    }

    fn generate_func(
        &mut self,
        program: &TypedProgram,
        name: &str,
        func: &TypedFunc,
    ) -> Result<(), Error> {
        self.print(&format!("export function {}(", name));
        let params = func
            .params
            .iter()
            .map(|param| program.vars.get(*param).name.clone())
            .collect::<Vec<String>>()
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
                self.print(&format!("let {}", program.vars.get(*variable).name));
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
                let name = &program.vars.get(*variable).name;
                self.print("for (");
                let init = self.generate_expr(program, init);
                self.print(&format!("let {} = {};", name, init));
                let end = self.generate_expr(program, end);
                self.print(&format!("{} !== {};", name, end));
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

    fn generate_expr(&self, program: &TypedProgram, expr: &Expr) -> String {
        match expr {
            Expr::Str(value) => format!("\"{}\"", value),
            Expr::Bool(value) => format!("{}", value),
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
                op, left, right, ..
            } => {
                let operator = match op {
                    CompareOp::Eq => "===",
                    CompareOp::Ne => "!==",
                    CompareOp::Gt => ">",
                    CompareOp::Lt => "<",
                    CompareOp::Ge => ">=",
                    CompareOp::Le => "<=",
                };
                format!(
                    "({}) {} ({})",
                    self.generate_expr(program, left),
                    operator,
                    self.generate_expr(program, right)
                )
            }
            Expr::Index { value, index, .. } => format!(
                "{}[{}]",
                self.generate_expr(program, value),
                self.generate_expr(program, index)
            ),
            Expr::Call(call) => self.generate_call(program, call),
        }
    }

    fn generate_call(&self, program: &TypedProgram, call: &CallExpr) -> String {
        format!(
            "{}({})",
            call.funcname,
            call.args
                .iter()
                .map(|arg| self.generate_expr(program, arg))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}
