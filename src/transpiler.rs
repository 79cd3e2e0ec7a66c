//! Java source generation from an analyzed tree.
//!
//! The generator is a read-only [`Visitor`]: it relies on the analyzer's
//! annotations for types and builtin target names, falling back to the
//! declared type names when a node was never analyzed.

use crate::ast::{Declaration, Expression, Field, Literal, Method, Source, Statement, Visitor};
use crate::types::{Function, Type, Variable};

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct Transpiler {
    output: String,
    indent: usize,
}

impl Transpiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `source` as a Java `Main` class.
    pub fn transpile(source: &Source) -> String {
        let mut transpiler = Self::new();
        transpiler.visit_source(source);
        transpiler.output
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn newline(&mut self, indent: usize) {
        self.output.push('\n');
        for _ in 0..indent {
            self.output.push_str(INDENT);
        }
    }

    fn write_block(&mut self, statements: &[Statement]) {
        self.write("{");
        self.indent += 1;
        for statement in statements {
            let indent = self.indent;
            self.newline(indent);
            self.visit_statement(statement);
        }
        self.indent -= 1;
        let indent = self.indent;
        self.newline(indent);
        self.write("}");
    }

    fn write_arguments(&mut self, arguments: &[Expression]) {
        self.write("(");
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }
            self.visit_expression(argument);
        }
        self.write(")");
    }

    /// Writes `name = value` without the statement terminator.
    fn write_assignment(&mut self, receiver: &Expression, value: &Expression) {
        self.visit_expression(receiver);
        self.write(" = ");
        self.visit_expression(value);
    }
}

fn variable_type(variable: Option<&Variable>, type_name: Option<&str>) -> &'static str {
    variable
        .map(|variable| variable.ty)
        .or_else(|| type_name.and_then(Type::from_name))
        .unwrap_or(Type::Any)
        .target_name()
}

fn return_type(method: &Method) -> &'static str {
    let ty = method
        .function
        .as_ref()
        .map(|function| function.return_type)
        .or_else(|| method.return_type_name.as_deref().and_then(Type::from_name))
        .unwrap_or(Type::Nil);
    match ty {
        Type::Nil => "void",
        other => other.target_name(),
    }
}

fn escape(text: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{8}' => escaped.push_str("\\b"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\\' => escaped.push_str("\\\\"),
            c if c == quote => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped
}

impl Visitor for Transpiler {
    type Output = ();

    fn visit_source(&mut self, source: &Source) {
        self.write("public class Main {");
        self.newline(0);
        self.indent += 1;

        for field in &source.fields {
            self.newline(self.indent);
            self.visit_field(field);
        }
        if !source.fields.is_empty() {
            self.newline(0);
        }

        self.newline(self.indent);
        self.write("public static void main(String[] args) {");
        self.newline(self.indent + 1);
        self.write("System.exit(new Main().main());");
        self.newline(self.indent);
        self.write("}");
        self.newline(0);

        for method in &source.methods {
            self.newline(self.indent);
            self.visit_method(method);
            self.newline(0);
        }

        self.indent -= 1;
        self.newline(0);
        self.write("}");
        self.newline(0);
    }

    fn visit_field(&mut self, field: &Field) {
        if field.constant {
            self.write("final ");
        }
        let ty = variable_type(field.variable.as_ref(), field.type_name.as_deref());
        self.write(ty);
        self.write(" ");
        self.write(&field.name);
        if let Some(value) = &field.value {
            self.write(" = ");
            self.visit_expression(value);
        }
        self.write(";");
    }

    fn visit_method(&mut self, method: &Method) {
        self.write(return_type(method));
        self.write(" ");
        self.write(&method.name);
        self.write("(");
        let parameter_types = method
            .function
            .as_ref()
            .map(|function| function.parameter_types.clone())
            .unwrap_or_default();
        for (index, parameter) in method.parameters.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }
            let ty = parameter_types
                .get(index)
                .copied()
                .or_else(|| parameter.type_name.as_deref().and_then(Type::from_name))
                .unwrap_or(Type::Any);
            self.write(ty.target_name());
            self.write(" ");
            self.write(&parameter.name);
        }
        self.write(") ");
        self.write_block(&method.statements);
    }

    fn visit_expression_statement(&mut self, expression: &Expression) {
        self.visit_expression(expression);
        self.write(";");
    }

    fn visit_declaration(&mut self, declaration: &Declaration) {
        let ty = variable_type(declaration.variable.as_ref(), declaration.type_name.as_deref());
        self.write(ty);
        self.write(" ");
        let name = declaration
            .variable
            .as_ref()
            .map_or(declaration.name.as_str(), |variable| variable.target_name.as_str());
        self.write(name);
        if let Some(value) = &declaration.value {
            self.write(" = ");
            self.visit_expression(value);
        }
        self.write(";");
    }

    fn visit_assignment(&mut self, receiver: &Expression, value: &Expression) {
        self.visit_expression(receiver);
        self.write(" = ");
        self.visit_expression(value);
        self.write(";");
    }

    fn visit_if(
        &mut self,
        condition: &Expression,
        then_statements: &[Statement],
        else_statements: &[Statement],
    ) {
        self.write("if (");
        self.visit_expression(condition);
        self.write(") ");
        self.write_block(then_statements);
        if !else_statements.is_empty() {
            self.write(" else ");
            self.write_block(else_statements);
        }
    }

    fn visit_for(
        &mut self,
        initialization: Option<&Statement>,
        condition: &Expression,
        increment: Option<&Statement>,
        statements: &[Statement],
    ) {
        self.write("for (");
        if let Some(Statement::Assignment { receiver, value }) = initialization {
            self.write_assignment(receiver, value);
        }
        self.write("; ");
        self.visit_expression(condition);
        self.write(";");
        if let Some(Statement::Assignment { receiver, value }) = increment {
            self.write(" ");
            self.write_assignment(receiver, value);
        }
        self.write(") ");
        self.write_block(statements);
    }

    fn visit_while(&mut self, condition: &Expression, statements: &[Statement]) {
        self.write("while (");
        self.visit_expression(condition);
        self.write(") ");
        self.write_block(statements);
    }

    fn visit_return(&mut self, value: &Expression) {
        self.write("return ");
        self.visit_expression(value);
        self.write(";");
    }

    fn visit_literal(&mut self, _expression: &Expression, literal: &Literal) {
        let text = match literal {
            Literal::Nil => "null".to_string(),
            Literal::Boolean(value) => value.to_string(),
            Literal::Integer(value) => value.to_string(),
            Literal::Decimal(value) => value.to_string(),
            Literal::Character(value) => format!("'{}'", escape(&value.to_string(), '\'')),
            Literal::String(value) => format!("\"{}\"", escape(value, '"')),
        };
        self.write(&text);
    }

    fn visit_group(&mut self, _expression: &Expression, inner: &Expression) {
        self.write("(");
        self.visit_expression(inner);
        self.write(")");
    }

    fn visit_binary(
        &mut self,
        _expression: &Expression,
        operator: &str,
        left: &Expression,
        right: &Expression,
    ) {
        self.visit_expression(left);
        self.write(" ");
        self.write(operator);
        self.write(" ");
        self.visit_expression(right);
    }

    fn visit_access(
        &mut self,
        _expression: &Expression,
        receiver: Option<&Expression>,
        name: &str,
        variable: Option<&Variable>,
    ) {
        if let Some(receiver) = receiver {
            self.visit_expression(receiver);
            self.write(".");
        }
        self.write(variable.map_or(name, |variable| variable.target_name.as_str()));
    }

    fn visit_function(
        &mut self,
        _expression: &Expression,
        receiver: Option<&Expression>,
        name: &str,
        arguments: &[Expression],
        function: Option<&Function>,
    ) {
        if let Some(receiver) = receiver {
            self.visit_expression(receiver);
            self.write(".");
        }
        self.write(function.map_or(name, |function| function.target_name.as_str()));
        self.write_arguments(arguments);
    }
}
