use num_traits::ToPrimitive;
use tracing::{debug, trace};

use crate::ast::{
    BinaryOperator, Declaration, Expression, ExpressionKind, Field, Literal, Method, Source,
    Statement,
};
use crate::builtins::BuiltinFunction;
use crate::types::{Function, Type, TypeRegistry, Variable};

mod error;
mod scope;

pub use error::{TypeError, TypeResult};
pub use scope::Scope;

/// Resolves names and checks types, annotating the tree in place.
///
/// The analyzer owns its current scope; blocks push a child scope and pop it
/// again on every exit path, including errors.
pub struct Analyzer {
    scope: Scope,
    types: TypeRegistry,
    return_type: Option<Type>,
}

impl Analyzer {
    pub fn new(parent: Scope) -> Self {
        let mut scope = Scope::child(parent);
        for builtin in BuiltinFunction::ALL {
            scope.define_function(builtin.signature());
        }
        Self {
            scope,
            types: TypeRegistry::new(),
            return_type: None,
        }
    }

    /// Uses `types` for member lookups on receivers.
    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.types = types;
        self
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn into_scope(self) -> Scope {
        self.scope
    }

    pub fn analyze(&mut self, source: &mut Source) -> TypeResult<()> {
        for field in &mut source.fields {
            self.visit_field(field)?;
        }
        for method in &mut source.methods {
            self.visit_method(method)?;
        }

        let has_main = source.methods.iter().any(|method| {
            method.name == "main"
                && method.parameters.is_empty()
                && method.return_type_name.as_deref() == Some(Type::Integer.name())
        });
        if !has_main {
            return Err(TypeError::MissingMain);
        }
        debug!(
            fields = source.fields.len(),
            methods = source.methods.len(),
            "analyzed source"
        );
        Ok(())
    }

    fn visit_field(&mut self, field: &mut Field) -> TypeResult<()> {
        let declared = field
            .type_name
            .as_deref()
            .map(|name| named_type(name, field.offset))
            .transpose()?;
        let ty = match &mut field.value {
            Some(value) => {
                let found = self.visit_expression(value)?;
                match declared {
                    Some(declared) => {
                        require_assignable(declared, found, value.offset)?;
                        declared
                    }
                    None => found,
                }
            }
            None if field.constant => {
                return Err(TypeError::ConstantWithoutValue {
                    name: field.name.clone(),
                    offset: field.offset,
                });
            }
            None => declared.unwrap_or(Type::Any),
        };
        let variable = self.define_variable(
            Variable::new(&field.name, ty, field.constant),
            field.offset,
        )?;
        field.variable = Some(variable);
        Ok(())
    }

    fn visit_method(&mut self, method: &mut Method) -> TypeResult<()> {
        let parameter_types = method
            .parameters
            .iter()
            .map(|parameter| {
                resolve_type(parameter.type_name.as_deref(), Type::Any, parameter.offset)
            })
            .collect::<TypeResult<Vec<_>>>()?;
        let return_type =
            resolve_type(method.return_type_name.as_deref(), Type::Nil, method.offset)?;

        if self
            .scope
            .declares_function(&method.name, parameter_types.len())
        {
            return Err(TypeError::Redefinition {
                name: method.name.clone(),
                offset: method.offset,
            });
        }
        let function = Function::new(
            &method.name,
            &method.name,
            parameter_types.clone(),
            return_type,
        );
        self.scope.define_function(function.clone());
        method.function = Some(function);
        trace!(method = %method.name, arity = parameter_types.len(), "analyzing method");

        let enclosing = self.return_type.replace(return_type);
        let result = self.in_child_scope(|analyzer| {
            for (parameter, ty) in method.parameters.iter().zip(parameter_types) {
                analyzer
                    .define_variable(Variable::new(&parameter.name, ty, false), parameter.offset)?;
            }
            method
                .statements
                .iter_mut()
                .try_for_each(|statement| analyzer.visit_statement(statement))
        });
        self.return_type = enclosing;
        result
    }

    fn visit_statement(&mut self, statement: &mut Statement) -> TypeResult<()> {
        match statement {
            Statement::Expression(expression) => {
                if !expression.is_call() {
                    return Err(TypeError::ExpressionStatement {
                        offset: expression.offset,
                    });
                }
                self.visit_expression(expression)?;
            }
            Statement::Declaration(declaration) => self.visit_declaration(declaration)?,
            Statement::Assignment { receiver, value } => self.visit_assignment(receiver, value)?,
            Statement::If {
                condition,
                then_statements,
                else_statements,
            } => {
                self.visit_condition(condition)?;
                if then_statements.is_empty() {
                    return Err(TypeError::EmptyThen {
                        offset: condition.offset,
                    });
                }
                self.visit_block(then_statements)?;
                self.visit_block(else_statements)?;
            }
            Statement::For {
                initialization,
                condition,
                increment,
                statements,
            } => {
                if let Some(initialization) = initialization {
                    self.visit_statement(initialization)?;
                }
                self.visit_condition(condition)?;
                if let Some(increment) = increment {
                    self.visit_statement(increment)?;
                }
                self.visit_block(statements)?;
            }
            Statement::While {
                condition,
                statements,
            } => {
                self.visit_condition(condition)?;
                self.visit_block(statements)?;
            }
            Statement::Return(value) => {
                let found = self.visit_expression(value)?;
                let expected = self.return_type.unwrap_or(Type::Nil);
                require_assignable(expected, found, value.offset)?;
            }
        }
        Ok(())
    }

    fn visit_declaration(&mut self, declaration: &mut Declaration) -> TypeResult<()> {
        let declared = declaration
            .type_name
            .as_deref()
            .map(|name| named_type(name, declaration.offset))
            .transpose()?;
        let ty = match (declared, &mut declaration.value) {
            (Some(declared), Some(value)) => {
                let found = self.visit_expression(value)?;
                require_assignable(declared, found, value.offset)?;
                declared
            }
            (None, Some(value)) => self.visit_expression(value)?,
            (Some(declared), None) => declared,
            (None, None) => {
                return Err(TypeError::MissingDeclarationType {
                    name: declaration.name.clone(),
                    offset: declaration.offset,
                });
            }
        };
        let variable = self.define_variable(
            Variable::new(&declaration.name, ty, false),
            declaration.offset,
        )?;
        declaration.variable = Some(variable);
        Ok(())
    }

    fn visit_assignment(
        &mut self,
        receiver: &mut Expression,
        value: &mut Expression,
    ) -> TypeResult<()> {
        if !receiver.is_access() {
            return Err(TypeError::InvalidAssignmentTarget {
                offset: receiver.offset,
            });
        }
        let target = self.visit_expression(receiver)?;
        if let ExpressionKind::Access {
            variable: Some(variable),
            ..
        } = &receiver.kind
            && variable.constant
        {
            return Err(TypeError::AssignToConstant {
                name: variable.name.clone(),
                offset: receiver.offset,
            });
        }
        let found = self.visit_expression(value)?;
        require_assignable(target, found, value.offset)
    }

    fn visit_condition(&mut self, condition: &mut Expression) -> TypeResult<()> {
        let found = self.visit_expression(condition)?;
        require_assignable(Type::Boolean, found, condition.offset)
    }

    fn visit_block(&mut self, statements: &mut [Statement]) -> TypeResult<()> {
        self.in_child_scope(|analyzer| {
            statements
                .iter_mut()
                .try_for_each(|statement| analyzer.visit_statement(statement))
        })
    }

    fn visit_expression(&mut self, expression: &mut Expression) -> TypeResult<Type> {
        let offset = expression.offset;
        let ty = match &mut expression.kind {
            ExpressionKind::Literal(literal) => literal_type(literal, offset)?,
            ExpressionKind::Group(inner) => {
                let ty = self.visit_expression(inner)?;
                if !matches!(inner.kind, ExpressionKind::Binary { .. }) {
                    return Err(TypeError::InvalidGroup { offset });
                }
                ty
            }
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => self.visit_binary(operator, left, right, offset)?,
            ExpressionKind::Access {
                receiver,
                name,
                variable,
            } => {
                let resolved = self.resolve_access(receiver.as_deref_mut(), name, offset)?;
                let ty = resolved.ty;
                *variable = Some(resolved);
                ty
            }
            ExpressionKind::Function {
                receiver,
                name,
                arguments,
                function,
            } => {
                let resolved =
                    self.visit_function(receiver.as_deref_mut(), name, arguments, offset)?;
                let ty = resolved.return_type;
                *function = Some(resolved);
                ty
            }
        };
        expression.ty = Some(ty);
        Ok(ty)
    }

    fn visit_binary(
        &mut self,
        operator: &str,
        left: &mut Expression,
        right: &mut Expression,
        offset: usize,
    ) -> TypeResult<Type> {
        let Some(binary) = BinaryOperator::from_symbol(operator) else {
            return Err(TypeError::UnknownOperator {
                operator: operator.to_string(),
                offset,
            });
        };
        let left_type = self.visit_expression(left)?;
        let right_type = self.visit_expression(right)?;

        if binary.is_logical() {
            require_assignable(Type::Boolean, left_type, left.offset)?;
            require_assignable(Type::Boolean, right_type, right.offset)?;
            return Ok(Type::Boolean);
        }
        if binary.is_comparison() {
            require_assignable(Type::Comparable, left_type, left.offset)?;
            require_assignable(Type::Comparable, right_type, right.offset)?;
            return Ok(Type::Boolean);
        }
        if binary == BinaryOperator::Add
            && (left_type == Type::String || right_type == Type::String)
        {
            return Ok(Type::String);
        }
        if left_type == right_type && left_type.is_numeric() {
            return Ok(left_type);
        }
        Err(TypeError::IncompatibleOperands {
            operator: operator.to_string(),
            left: left_type,
            right: right_type,
            offset,
        })
    }

    fn resolve_access(
        &mut self,
        receiver: Option<&mut Expression>,
        name: &str,
        offset: usize,
    ) -> TypeResult<Variable> {
        match receiver {
            Some(receiver) => {
                let owner = self.visit_expression(receiver)?;
                self.types
                    .field(owner, name)
                    .cloned()
                    .ok_or_else(|| TypeError::UnknownMember {
                        owner,
                        name: name.to_string(),
                        offset,
                    })
            }
            None => self
                .scope
                .lookup_variable(name)
                .cloned()
                .ok_or_else(|| TypeError::UndefinedVariable {
                    name: name.to_string(),
                    offset,
                }),
        }
    }

    fn visit_function(
        &mut self,
        receiver: Option<&mut Expression>,
        name: &str,
        arguments: &mut [Expression],
        offset: usize,
    ) -> TypeResult<Function> {
        let (function, parameter_types): (Function, Vec<Type>) = match receiver {
            Some(receiver) => {
                let owner = self.visit_expression(receiver)?;
                let function = self
                    .types
                    .method(owner, name, arguments.len())
                    .cloned()
                    .ok_or_else(|| TypeError::UnknownMember {
                        owner,
                        name: name.to_string(),
                        offset,
                    })?;
                // The first parameter is the receiver itself.
                let parameter_types = function.parameter_types.iter().skip(1).copied().collect();
                (function, parameter_types)
            }
            None => {
                let function = self
                    .scope
                    .lookup_function(name, arguments.len())
                    .cloned()
                    .ok_or_else(|| TypeError::UndefinedFunction {
                        name: name.to_string(),
                        arity: arguments.len(),
                        offset,
                    })?;
                let parameter_types = function.parameter_types.clone();
                (function, parameter_types)
            }
        };

        for (argument, expected) in arguments.iter_mut().zip(parameter_types) {
            let found = self.visit_expression(argument)?;
            require_assignable(expected, found, argument.offset)?;
        }
        Ok(function)
    }

    fn define_variable(&mut self, variable: Variable, offset: usize) -> TypeResult<Variable> {
        if self.scope.declares_variable(&variable.name) {
            return Err(TypeError::Redefinition {
                name: variable.name,
                offset,
            });
        }
        self.scope.define_variable(variable.clone());
        Ok(variable)
    }

    fn in_child_scope<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> TypeResult<T>,
    ) -> TypeResult<T> {
        let parent = std::mem::take(&mut self.scope);
        self.scope = Scope::child(parent);
        let result = body(self);
        let scope = std::mem::take(&mut self.scope);
        self.scope = scope.into_parent().unwrap_or_default();
        result
    }
}

/// Fails unless a value of type `ty` may be stored where `target` is expected.
pub fn require_assignable(target: Type, ty: Type, offset: usize) -> TypeResult<()> {
    if target.accepts(ty) {
        Ok(())
    } else {
        Err(TypeError::NotAssignable {
            expected: target,
            found: ty,
            offset,
        })
    }
}

fn named_type(name: &str, offset: usize) -> TypeResult<Type> {
    Type::from_name(name).ok_or_else(|| TypeError::UnknownType {
        name: name.to_string(),
        offset,
    })
}

fn resolve_type(name: Option<&str>, default: Type, offset: usize) -> TypeResult<Type> {
    name.map_or(Ok(default), |name| named_type(name, offset))
}

fn literal_type(literal: &Literal, offset: usize) -> TypeResult<Type> {
    let ty = match literal {
        Literal::Nil => Type::Nil,
        Literal::Boolean(_) => Type::Boolean,
        Literal::Integer(value) => {
            if value.to_i32().is_none() {
                return Err(TypeError::IntegerOutOfRange { offset });
            }
            Type::Integer
        }
        Literal::Decimal(_) => Type::Decimal,
        Literal::Character(_) => Type::Character,
        Literal::String(_) => Type::String,
    };
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use indoc::indoc;

    fn analyze_with(input: &str, types: TypeRegistry) -> TypeResult<Source> {
        let tokens = tokenize(input).expect("lex failed");
        let mut source = parse(&tokens).expect("parse failed");
        Analyzer::new(Scope::new())
            .with_types(types)
            .analyze(&mut source)?;
        Ok(source)
    }

    fn analyze_text(input: &str) -> TypeResult<Source> {
        analyze_with(input, TypeRegistry::new())
    }

    fn in_main(body: &str) -> String {
        format!("DEF main(): Integer DO\n{body}\nRETURN 0;\nEND\n")
    }

    fn offset_of(input: &str, needle: &str) -> usize {
        input.find(needle).expect("needle present")
    }

    #[test]
    fn accepts_minimal_main() {
        let source = analyze_text("DEF main(): Integer DO RETURN 0; END").expect("analysis failed");
        let function = source.methods[0].function.as_ref().expect("annotated");
        assert_eq!(function.return_type, Type::Integer);
        assert_eq!(function.arity(), 0);
    }

    #[test]
    fn requires_main_with_integer_return() {
        for input in [
            "DEF notMain(): Integer DO RETURN 0; END",
            "DEF main() DO END",
            "DEF main(): Decimal DO RETURN 0.0; END",
            "DEF main(x): Integer DO RETURN 0; END",
        ] {
            assert_eq!(analyze_text(input).expect_err(input), TypeError::MissingMain);
        }
    }

    #[test]
    fn fields_infer_or_default_to_any() {
        let input = format!(
            "LET x = 1;\nLET y;\nLET CONST z: Decimal = 1.5;\n{}",
            in_main("")
        );
        let source = analyze_text(&input).expect("analysis failed");
        let types: Vec<_> = source
            .fields
            .iter()
            .map(|field| field.variable.as_ref().map(|variable| variable.ty))
            .collect();
        assert_eq!(
            types,
            vec![Some(Type::Integer), Some(Type::Any), Some(Type::Decimal)]
        );
        assert!(source.fields[2].variable.as_ref().is_some_and(|v| v.constant));
    }

    #[test]
    fn constant_field_needs_a_value() {
        let error =
            analyze_text(&format!("LET CONST z;\n{}", in_main(""))).expect_err("should fail");
        assert_eq!(
            error,
            TypeError::ConstantWithoutValue {
                name: "z".to_string(),
                offset: 10,
            }
        );
        assert_eq!(error.offset(), Some(10));
    }

    #[test]
    fn declaration_keeps_declared_type_and_checks_value() {
        let source = analyze_text(&in_main("LET c: Comparable = 1;")).expect("analysis failed");
        let Statement::Declaration(declaration) = &source.methods[0].statements[0] else {
            panic!("expected a declaration");
        };
        assert_eq!(
            declaration.variable.as_ref().map(|variable| variable.ty),
            Some(Type::Comparable)
        );

        let input = in_main("LET d: Decimal = 1;");
        assert_eq!(
            analyze_text(&input).expect_err("should fail"),
            TypeError::NotAssignable {
                expected: Type::Decimal,
                found: Type::Integer,
                offset: offset_of(&input, "1;"),
            }
        );

        let input = in_main("LET n;");
        assert_eq!(
            analyze_text(&input).expect_err("should fail"),
            TypeError::MissingDeclarationType {
                name: "n".to_string(),
                offset: offset_of(&input, "n;"),
            }
        );
    }

    #[test]
    fn expression_statement_must_be_a_call() {
        let input = in_main("LET x = 1; x;");
        assert_eq!(
            analyze_text(&input).expect_err("should fail"),
            TypeError::ExpressionStatement {
                offset: offset_of(&input, "x;"),
            }
        );
    }

    #[test]
    fn assignment_targets_must_be_mutable_accesses() {
        let error = analyze_text(&in_main("print(1) = 1;")).expect_err("should fail");
        assert!(matches!(error, TypeError::InvalidAssignmentTarget { .. }));

        let input = format!("LET CONST limit = 1;\n{}", in_main("limit = 2;"));
        let error = analyze_text(&input).expect_err("should fail");
        assert!(matches!(error, TypeError::AssignToConstant { ref name, .. } if name == "limit"));

        let error = analyze_text(&in_main("LET s = \"a\"; s = 1;")).expect_err("should fail");
        assert!(matches!(
            error,
            TypeError::NotAssignable {
                expected: Type::String,
                found: Type::Integer,
                ..
            }
        ));
    }

    #[test]
    fn conditions_must_be_boolean_and_then_blocks_non_empty() {
        let error = analyze_text(&in_main("IF 1 DO print(1); END")).expect_err("should fail");
        assert!(matches!(
            error,
            TypeError::NotAssignable {
                expected: Type::Boolean,
                found: Type::Integer,
                ..
            }
        ));

        let error =
            analyze_text(&in_main("IF TRUE DO ELSE print(1); END")).expect_err("should fail");
        assert!(matches!(error, TypeError::EmptyThen { .. }));

        let error = analyze_text(&in_main("WHILE 'c' DO END")).expect_err("should fail");
        assert!(matches!(error, TypeError::NotAssignable { .. }));
    }

    #[test]
    fn block_scopes_end_with_the_block() {
        let error = analyze_text(&in_main("IF TRUE DO LET x = 1; END print(x);"))
            .expect_err("should fail");
        assert!(matches!(error, TypeError::UndefinedVariable { ref name, .. } if name == "x"));

        analyze_text(&in_main(indoc! {"
            LET i = 0;
            FOR (i = 0; i < 3; i = i + 1) LET x = i; print(x); END
            WHILE i > 0 DO LET x = 'x'; i = i - 1; END
        "}))
        .expect("loops analyze");
    }

    #[test]
    fn redefinition_in_same_scope_is_rejected() {
        let input = in_main("LET x = 1; LET x = 2;");
        let error = analyze_text(&input).expect_err("should fail");
        assert_eq!(
            error,
            TypeError::Redefinition {
                name: "x".to_string(),
                offset: offset_of(&input, "x = 2"),
            }
        );

        let input = format!("DEF f(a) DO END\nDEF f(b) DO END\n{}", in_main(""));
        assert_eq!(
            analyze_text(&input).expect_err("should fail").offset(),
            Some(offset_of(&input, "f(b)"))
        );

        let input = in_main("").replace("main()", "main(p, p)");
        assert_eq!(
            analyze_text(&input).expect_err("should fail").offset(),
            Some(offset_of(&input, "p)"))
        );
        analyze_text(&in_main("LET x = 1; IF TRUE DO LET x = \"shadow\"; print(x); END"))
            .expect("shadowing analyzes");
    }

    #[test]
    fn binary_operator_types() {
        let source = analyze_text(&in_main(indoc! {r#"
            LET a = "n" + 1;
            LET b = 1.5 * 2.0;
            LET c = 1 < 2 && 'a' != 'b';
        "#}))
        .expect("analysis failed");
        let types: Vec<_> = source.methods[0]
            .statements
            .iter()
            .filter_map(|statement| match statement {
                Statement::Declaration(declaration) => declaration.variable.as_ref().map(|v| v.ty),
                _ => None,
            })
            .collect();
        assert_eq!(types, vec![Type::String, Type::Decimal, Type::Boolean]);

        let error = analyze_text(&in_main("LET x = 1 + 1.0;")).expect_err("should fail");
        assert!(matches!(error, TypeError::IncompatibleOperands { .. }));

        let error = analyze_text(&in_main("LET x = TRUE < FALSE;")).expect_err("should fail");
        assert!(matches!(
            error,
            TypeError::NotAssignable {
                expected: Type::Comparable,
                found: Type::Boolean,
                ..
            }
        ));

        let error = analyze_text(&in_main("LET x = 1 && TRUE;")).expect_err("should fail");
        assert!(matches!(
            error,
            TypeError::NotAssignable {
                expected: Type::Boolean,
                ..
            }
        ));
    }

    #[test]
    fn integer_literals_must_fit_32_bits() {
        analyze_text(&in_main("LET x = -2147483648; LET y = 2147483647;")).expect("in range");
        let input = in_main("LET x = 2147483648;");
        assert_eq!(
            analyze_text(&input).expect_err("should fail"),
            TypeError::IntegerOutOfRange {
                offset: offset_of(&input, "2147483648"),
            }
        );
    }

    #[test]
    fn groups_must_wrap_binary_expressions() {
        analyze_text(&in_main("LET x = (1 + 2) * 3;")).expect("binary group");
        let error = analyze_text(&in_main("LET x = (1);")).expect_err("should fail");
        assert!(matches!(error, TypeError::InvalidGroup { .. }));
    }

    #[test]
    fn return_value_must_match_method_type() {
        let input = indoc! {"
            DEF name(): String DO RETURN 1; END
            DEF main(): Integer DO RETURN 0; END
        "};
        let error = analyze_text(input).expect_err("should fail");
        assert!(matches!(
            error,
            TypeError::NotAssignable {
                expected: Type::String,
                found: Type::Integer,
                ..
            }
        ));
    }

    #[test]
    fn calls_resolve_builtins_and_methods() {
        let source = analyze_text(indoc! {"
            DEF sum(x: Integer, y: Integer): Integer DO RETURN x + y; END
            DEF main(): Integer DO
                print(log(2.0));
                RETURN sum(1, 2);
            END
        "})
        .expect("analysis failed");
        let Statement::Expression(call) = &source.methods[1].statements[0] else {
            panic!("expected a call statement");
        };
        let ExpressionKind::Function {
            function: Some(function),
            arguments,
            ..
        } = &call.kind
        else {
            panic!("expected a resolved call");
        };
        assert_eq!(function.target_name, "System.out.println");
        assert_eq!(arguments[0].ty, Some(Type::Decimal));

        let error = analyze_text(&in_main("print(log(1));")).expect_err("should fail");
        assert!(matches!(
            error,
            TypeError::NotAssignable {
                expected: Type::Decimal,
                found: Type::Integer,
                ..
            }
        ));

        let error = analyze_text(&in_main("missing(1);")).expect_err("should fail");
        assert!(matches!(
            error,
            TypeError::UndefinedFunction { arity: 1, .. }
        ));
    }

    #[test]
    fn receivers_resolve_through_the_type_registry() {
        let mut types = TypeRegistry::new();
        types.register_field(Type::String, "length", Type::Integer, true);
        types.register_method(Type::String, "charAt", vec![Type::Integer], Type::Character);

        let source = analyze_with(
            indoc! {r#"
                DEF main(): Integer DO
                    LET s = "abc";
                    print(s.charAt(0));
                    RETURN s.length;
                END
            "#},
            types,
        )
        .expect("analysis failed");
        let Statement::Return(value) = &source.methods[0].statements[2] else {
            panic!("expected a return");
        };
        assert_eq!(value.ty, Some(Type::Integer));

        let error = analyze_text(&in_main("LET n = 1; print(n.size);")).expect_err("should fail");
        assert!(matches!(
            error,
            TypeError::UnknownMember {
                owner: Type::Integer,
                ..
            }
        ));
    }

    #[test]
    fn unknown_type_names_are_rejected() {
        let input = in_main("LET x: Float = 1.0;");
        let error = analyze_text(&input).expect_err("should fail");
        assert_eq!(
            error,
            TypeError::UnknownType {
                name: "Float".to_string(),
                offset: offset_of(&input, "x: Float"),
            }
        );

        let input = "DEF f(a: Real) DO END";
        assert_eq!(
            analyze_text(input).expect_err("should fail").offset(),
            Some(offset_of(input, "a: Real"))
        );
    }
}
