use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use tracing::debug;

use crate::ast::{Declaration, Expression, Field, Literal, Method, Parameter, Source, Statement};
use crate::lexer::unescape;
use crate::token::{Token, TokenKind};

mod error;

pub use error::{ParseError, ParseResult};

const LOGICAL: &[&str] = &["&&", "||"];
const COMPARISON: &[&str] = &["<", "<=", ">", ">=", "==", "!="];
const ADDITIVE: &[&str] = &["+", "-"];
const MULTIPLICATIVE: &[&str] = &["*", "/"];

pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    index: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn parse_source(mut self) -> ParseResult<Source> {
        let mut source = Source::default();
        while self.peek_text("LET") {
            source.fields.push(self.parse_field()?);
        }
        while self.peek_text("DEF") {
            source.methods.push(self.parse_method()?);
        }
        if self.current().is_some() {
            return Err(self.error("DEF"));
        }
        debug!(
            fields = source.fields.len(),
            methods = source.methods.len(),
            "parsed source"
        );
        Ok(source)
    }

    fn parse_field(&mut self) -> ParseResult<Field> {
        self.expect("LET")?;
        let constant = self.consume("CONST");
        let offset = self.current_offset();
        let name = self.expect_identifier()?;
        let type_name = self.parse_type_annotation()?;
        let value = if self.consume("=") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(";")?;
        Ok(Field::new(&name, type_name.as_deref(), constant, value).at(offset))
    }

    fn parse_method(&mut self) -> ParseResult<Method> {
        self.expect("DEF")?;
        let offset = self.current_offset();
        let name = self.expect_identifier()?;
        self.expect("(")?;
        let mut parameters = Vec::new();
        if !self.peek_text(")") {
            loop {
                let parameter_offset = self.current_offset();
                let parameter = self.expect_identifier()?;
                let type_name = self.parse_type_annotation()?;
                parameters
                    .push(Parameter::new(&parameter, type_name.as_deref()).at(parameter_offset));
                if !self.consume(",") {
                    break;
                }
            }
        }
        self.expect(")")?;
        let return_type_name = self.parse_type_annotation()?;
        self.expect("DO")?;
        let statements = self.parse_block(&["END"])?;
        self.expect("END")?;
        Ok(Method::new(
            &name,
            parameters,
            return_type_name.as_deref(),
            statements,
        )
        .at(offset))
    }

    fn parse_type_annotation(&mut self) -> ParseResult<Option<String>> {
        if self.consume(":") {
            Ok(Some(self.expect_identifier()?))
        } else {
            Ok(None)
        }
    }

    /// Parses statements up to (not including) one of `terminators`.
    fn parse_block(&mut self, terminators: &[&str]) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        while !terminators.iter().any(|terminator| self.peek_text(terminator)) {
            if self.current().is_none() {
                return Err(self.error(terminators[0]));
            }
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        if self.peek_text("LET") {
            return self.parse_declaration();
        }
        if self.peek_text("IF") {
            return self.parse_if();
        }
        if self.peek_text("FOR") {
            return self.parse_for();
        }
        if self.peek_text("WHILE") {
            return self.parse_while();
        }
        if self.peek_text("RETURN") {
            return self.parse_return();
        }

        let receiver = self.parse_expression()?;
        let statement = if self.consume("=") {
            let value = self.parse_expression()?;
            Statement::Assignment { receiver, value }
        } else {
            Statement::Expression(receiver)
        };
        self.expect(";")?;
        Ok(statement)
    }

    fn parse_declaration(&mut self) -> ParseResult<Statement> {
        self.expect("LET")?;
        let offset = self.current_offset();
        let name = self.expect_identifier()?;
        let type_name = self.parse_type_annotation()?;
        let value = if self.consume("=") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(";")?;
        Ok(Statement::Declaration(
            Declaration::new(&name, type_name.as_deref(), value).at(offset),
        ))
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        self.expect("IF")?;
        let condition = self.parse_expression()?;
        self.expect("DO")?;
        let then_statements = self.parse_block(&["END", "ELSE"])?;
        let else_statements = if self.consume("ELSE") {
            self.parse_block(&["END"])?
        } else {
            Vec::new()
        };
        self.expect("END")?;
        Ok(Statement::If {
            condition,
            then_statements,
            else_statements,
        })
    }

    fn parse_for(&mut self) -> ParseResult<Statement> {
        self.expect("FOR")?;
        self.expect("(")?;
        let initialization = self.parse_for_assignment()?;
        self.expect(";")?;
        let condition = self.parse_expression()?;
        self.expect(";")?;
        let increment = self.parse_for_assignment()?;
        self.expect(")")?;
        let statements = self.parse_block(&["END"])?;
        self.expect("END")?;
        Ok(Statement::For {
            initialization: initialization.map(Box::new),
            condition,
            increment: increment.map(Box::new),
            statements,
        })
    }

    /// The optional `name = expr` clause of a FOR header.
    fn parse_for_assignment(&mut self) -> ParseResult<Option<Statement>> {
        let Some(token) = self.current() else {
            return Ok(None);
        };
        if token.kind != TokenKind::Identifier {
            return Ok(None);
        }
        let name = self.expect_identifier()?;
        let receiver = Expression::access(None, &name).at(token.offset);
        self.expect("=")?;
        let value = self.parse_expression()?;
        Ok(Some(Statement::Assignment { receiver, value }))
    }

    fn parse_while(&mut self) -> ParseResult<Statement> {
        self.expect("WHILE")?;
        let condition = self.parse_expression()?;
        self.expect("DO")?;
        let statements = self.parse_block(&["END"])?;
        self.expect("END")?;
        Ok(Statement::While {
            condition,
            statements,
        })
    }

    fn parse_return(&mut self) -> ParseResult<Statement> {
        self.expect("RETURN")?;
        let value = self.parse_expression()?;
        self.expect(";")?;
        Ok(Statement::Return(value))
    }

    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_logical()
    }

    fn parse_logical(&mut self) -> ParseResult<Expression> {
        self.parse_binary_tier(LOGICAL, Self::parse_comparison)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        self.parse_binary_tier(COMPARISON, Self::parse_additive)
    }

    fn parse_additive(&mut self) -> ParseResult<Expression> {
        self.parse_binary_tier(ADDITIVE, Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expression> {
        self.parse_binary_tier(MULTIPLICATIVE, Self::parse_secondary)
    }

    fn parse_binary_tier(
        &mut self,
        operators: &[&str],
        operand: fn(&mut Self) -> ParseResult<Expression>,
    ) -> ParseResult<Expression> {
        let mut expression = operand(self)?;
        while let Some(token) = self.current()
            && token.kind == TokenKind::Operator
            && operators.contains(&token.text)
        {
            self.advance();
            let right = operand(self)?;
            expression = Expression::binary(token.text, expression, right).at(token.offset);
        }
        Ok(expression)
    }

    fn parse_secondary(&mut self) -> ParseResult<Expression> {
        let mut expression = self.parse_primary()?;
        while let Some(dot) = self.current()
            && dot.is(".")
        {
            self.advance();
            let name = self.expect_identifier()?;
            let member = if self.consume("(") {
                let arguments = self.parse_arguments()?;
                Expression::call(Some(expression), &name, arguments)
            } else {
                Expression::access(Some(expression), &name)
            };
            expression = member.at(dot.offset);
        }
        Ok(expression)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let Some(token) = self.current() else {
            return Err(self.error("expression"));
        };
        let offset = token.offset;

        let literal = match token.kind {
            TokenKind::Identifier => match token.text {
                "NIL" => Some(Literal::Nil),
                "TRUE" => Some(Literal::Boolean(true)),
                "FALSE" => Some(Literal::Boolean(false)),
                _ => None,
            },
            TokenKind::Integer => Some(Literal::Integer(parse_integer(&token)?)),
            TokenKind::Decimal => Some(Literal::Decimal(parse_decimal(&token)?)),
            TokenKind::Character => Some(Literal::Character(parse_character(&token)?)),
            TokenKind::String => Some(Literal::String(unescape(quoted_body(token.text)))),
            TokenKind::Operator => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(Expression::literal(literal).at(offset));
        }

        if self.consume("(") {
            let inner = self.parse_expression()?;
            self.expect(")")?;
            return Ok(Expression::group(inner).at(offset));
        }

        let name = self.expect_identifier()?;
        if self.consume("(") {
            let arguments = self.parse_arguments()?;
            Ok(Expression::call(None, &name, arguments).at(offset))
        } else {
            Ok(Expression::access(None, &name).at(offset))
        }
    }

    /// Parses a comma-separated argument list after the opening parenthesis.
    fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();
        if !self.peek_text(")") {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.consume(",") {
                    break;
                }
            }
        }
        self.expect(")")?;
        Ok(arguments)
    }

    fn current(&self) -> Option<Token<'a>> {
        self.tokens.get(self.index).copied()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn peek_text(&self, text: &str) -> bool {
        self.current().is_some_and(|token| token.is(text))
    }

    fn consume(&mut self, text: &str) -> bool {
        let matched = self.peek_text(text);
        if matched {
            self.advance();
        }
        matched
    }

    fn expect(&mut self, text: &str) -> ParseResult<()> {
        if self.consume(text) {
            Ok(())
        } else {
            Err(self.error(&format!("'{text}'")))
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.current() {
            Some(token) if token.kind == TokenKind::Identifier => {
                self.advance();
                Ok(token.text.to_string())
            }
            _ => Err(self.error("identifier")),
        }
    }

    /// Offset of the current token, or of end-of-input.
    fn current_offset(&self) -> usize {
        self.current()
            .map_or_else(|| self.tokens.last().map_or(0, Token::end), |token| token.offset)
    }

    fn error(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(token) => ParseError::Expected {
                expected: expected.to_string(),
                found: token.text.to_string(),
                offset: token.offset,
            },
            None => ParseError::UnexpectedEnd {
                expected: expected.to_string(),
                offset: self.tokens.last().map_or(0, Token::end),
            },
        }
    }
}

fn invalid_literal(kind: &'static str, token: &Token<'_>) -> ParseError {
    ParseError::InvalidLiteral {
        kind,
        literal: token.text.to_string(),
        offset: token.offset,
    }
}

fn parse_integer(token: &Token<'_>) -> ParseResult<BigInt> {
    let digits = token.text.strip_prefix('+').unwrap_or(token.text);
    BigInt::from_str(digits).map_err(|_| invalid_literal("integer", token))
}

fn parse_decimal(token: &Token<'_>) -> ParseResult<BigDecimal> {
    let digits = token.text.strip_prefix('+').unwrap_or(token.text);
    BigDecimal::from_str(digits).map_err(|_| invalid_literal("decimal", token))
}

fn parse_character(token: &Token<'_>) -> ParseResult<char> {
    let value = unescape(quoted_body(token.text));
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(invalid_literal("character", token)),
    }
}

fn quoted_body(text: &str) -> &str {
    text.get(1..text.len().saturating_sub(1)).unwrap_or_default()
}

pub fn parse(tokens: &[Token<'_>]) -> ParseResult<Source> {
    Parser::new(tokens).parse_source()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExpressionKind;
    use crate::lexer::tokenize;
    use indoc::indoc;

    fn parse_text(input: &str) -> ParseResult<Source> {
        let tokens = tokenize(input).expect("lex failed");
        parse(&tokens)
    }

    fn parse_expression_text(input: &str) -> Expression {
        let tokens = tokenize(input).expect("lex failed");
        let mut parser = Parser::new(&tokens);
        parser.parse_expression().expect("parse failed")
    }

    fn int(value: i64) -> Expression {
        Expression::literal(Literal::Integer(BigInt::from(value)))
    }

    /// Clears offsets so trees can be compared structurally.
    fn strip(expression: Expression) -> Expression {
        let kind = match expression.kind {
            ExpressionKind::Group(inner) => ExpressionKind::Group(Box::new(strip(*inner))),
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => ExpressionKind::Binary {
                operator,
                left: Box::new(strip(*left)),
                right: Box::new(strip(*right)),
            },
            ExpressionKind::Access {
                receiver,
                name,
                variable,
            } => ExpressionKind::Access {
                receiver: receiver.map(|receiver| Box::new(strip(*receiver))),
                name,
                variable,
            },
            ExpressionKind::Function {
                receiver,
                name,
                arguments,
                function,
            } => ExpressionKind::Function {
                receiver: receiver.map(|receiver| Box::new(strip(*receiver))),
                name,
                arguments: arguments.into_iter().map(strip).collect(),
                function,
            },
            literal @ ExpressionKind::Literal(_) => literal,
        };
        Expression::new(kind, 0)
    }

    #[test]
    fn parses_fields_and_methods() {
        let source = parse_text(indoc! {"
            LET CONST limit: Integer = 10;
            LET name;
            DEF main(): Integer DO
                print(limit);
                RETURN 0;
            END
        "})
        .expect("parse failed");

        assert_eq!(source.fields.len(), 2);
        assert!(source.fields[0].constant);
        assert_eq!(source.fields[0].type_name.as_deref(), Some("Integer"));
        assert!(!source.fields[1].constant);
        assert_eq!(source.fields[1].value, None);

        let main = &source.methods[0];
        assert_eq!(main.name, "main");
        assert!(main.parameters.is_empty());
        assert_eq!(main.return_type_name.as_deref(), Some("Integer"));
        assert_eq!(main.statements.len(), 2);
        assert!(matches!(main.statements[1], Statement::Return(_)));
    }

    #[test]
    fn parses_typed_and_untyped_parameters() {
        let source = parse_text("DEF sum(x: Integer, y) DO END").expect("parse failed");
        assert_eq!(
            source.methods[0].parameters,
            vec![
                Parameter::new("x", Some("Integer")).at(8),
                Parameter::new("y", None).at(20),
            ]
        );
        assert_eq!(source.methods[0].return_type_name, None);
    }

    #[test]
    fn declarations_record_their_name_offsets() {
        let source = parse_text("LET CONST a = 1;\nDEF f(p) DO LET b; END").expect("parse failed");
        assert_eq!(source.fields[0].offset, 10);
        assert_eq!(source.methods[0].offset, 21);
        assert_eq!(source.methods[0].parameters[0].offset, 23);
        let Statement::Declaration(declaration) = &source.methods[0].statements[0] else {
            panic!("expected a declaration");
        };
        assert_eq!(declaration.offset, 33);
    }

    #[test]
    fn binary_tiers_bind_by_precedence() {
        let expression = strip(parse_expression_text("1 + 2 * 3 < 4 && TRUE"));
        let expected = Expression::binary(
            "&&",
            Expression::binary(
                "<",
                Expression::binary("+", int(1), Expression::binary("*", int(2), int(3))),
                int(4),
            ),
            Expression::literal(Literal::Boolean(true)),
        );
        assert_eq!(expression, expected);
    }

    #[test]
    fn binary_tiers_are_left_associative() {
        let expression = strip(parse_expression_text("8 - 4 - 2"));
        let expected = Expression::binary("-", Expression::binary("-", int(8), int(4)), int(2));
        assert_eq!(expression, expected);
    }

    #[test]
    fn secondary_chains_grow_the_receiver() {
        let expression = strip(parse_expression_text("a.b.c(1)"));
        let receiver = Expression::access(Some(Expression::access(None, "a")), "b");
        let expected = Expression::call(Some(receiver), "c", vec![int(1)]);
        assert_eq!(expression, expected);
    }

    #[test]
    fn parses_literals() {
        let expression = parse_expression_text(r#"f(NIL, FALSE, 1.50, 'a', '\n', "x\ty", -3)"#);
        let ExpressionKind::Function { arguments, .. } = expression.kind else {
            panic!("expected a call, got {expression:?}");
        };
        let literals: Vec<_> = arguments
            .into_iter()
            .map(|argument| match argument.kind {
                ExpressionKind::Literal(literal) => literal,
                other => panic!("expected a literal, got {other:?}"),
            })
            .collect();
        assert_eq!(
            literals,
            vec![
                Literal::Nil,
                Literal::Boolean(false),
                Literal::Decimal(BigDecimal::from_str("1.50").expect("decimal")),
                Literal::Character('a'),
                Literal::Character('\n'),
                Literal::String("x\ty".to_string()),
                Literal::Integer(BigInt::from(-3)),
            ]
        );
    }

    #[test]
    fn records_expression_offsets() {
        let expression = parse_expression_text("x + f(y)");
        assert_eq!(expression.offset, 2);
        let ExpressionKind::Binary { left, right, .. } = expression.kind else {
            panic!("expected a binary expression");
        };
        assert_eq!(left.offset, 0);
        assert_eq!(right.offset, 4);
    }

    #[test]
    fn assignment_keeps_any_receiver_for_the_analyzer() {
        let source = parse_text("DEF main() DO f() = 1; x.y = 2; END").expect("parse failed");
        let statements = &source.methods[0].statements;
        let Statement::Assignment { receiver, .. } = &statements[0] else {
            panic!("expected an assignment");
        };
        assert!(receiver.is_call());
        let Statement::Assignment { receiver, .. } = &statements[1] else {
            panic!("expected an assignment");
        };
        assert!(receiver.is_access());
    }

    #[test]
    fn parses_control_flow() {
        let source = parse_text(indoc! {"
            DEF main() DO
                IF x < 1 DO print(1); ELSE print(2); print(3); END
                FOR (i = 0; i < 10; i = i + 1) print(i); END
                FOR (; TRUE;) END
                WHILE FALSE DO END
            END
        "})
        .expect("parse failed");
        let statements = &source.methods[0].statements;

        let Statement::If {
            then_statements,
            else_statements,
            ..
        } = &statements[0]
        else {
            panic!("expected IF");
        };
        assert_eq!(then_statements.len(), 1);
        assert_eq!(else_statements.len(), 2);

        let Statement::For {
            initialization,
            increment,
            statements: body,
            ..
        } = &statements[1]
        else {
            panic!("expected FOR");
        };
        assert!(matches!(
            initialization.as_deref(),
            Some(Statement::Assignment { .. })
        ));
        assert!(increment.is_some());
        assert_eq!(body.len(), 1);

        let Statement::For {
            initialization,
            increment,
            ..
        } = &statements[2]
        else {
            panic!("expected FOR");
        };
        assert!(initialization.is_none());
        assert!(increment.is_none());
        assert!(matches!(statements[3], Statement::While { .. }));
    }

    #[test]
    fn rejects_field_after_method() {
        let error = parse_text("DEF main() DO END LET x = 1;").expect_err("should fail");
        assert_eq!(
            error,
            ParseError::Expected {
                expected: "DEF".to_string(),
                found: "LET".to_string(),
                offset: 18,
            }
        );
    }

    #[test]
    fn reports_end_of_input_at_last_token_end() {
        let error = parse_text("DEF main() DO").expect_err("should fail");
        assert_eq!(
            error,
            ParseError::UnexpectedEnd {
                expected: "'END'".to_string(),
                offset: 13,
            }
        );
        assert_eq!(parse_text("").expect("empty source"), Source::default());
    }

    #[test]
    fn missing_semicolon_points_at_offending_token() {
        let error = parse_text("LET x = 1 LET y;").expect_err("should fail");
        assert_eq!(error.offset(), 10);
    }

    #[test]
    fn unknown_operator_survives_parsing() {
        let tokens = tokenize("1 % 2").expect("lex failed");
        let mut parser = Parser::new(&tokens);
        let expression = parser.parse_expression().expect("parse failed");
        assert_eq!(strip(expression), int(1));
        assert_eq!(parser.current().map(|token| token.text), Some("%"));
    }
}
