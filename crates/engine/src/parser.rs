//! Recursive-descent parser (C3) building the tagged-variant AST from a
//! token stream. Grammar per spec.md §4.3/§6.

use std::rc::Rc;

use dbus_sim_core::signature::Signature;

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind, ParseResult, Span};
use crate::lexer::{Lexer, SpannedToken, Token};
use crate::value::VariantType;

pub fn parse_program(source: &str) -> ParseResult<Program> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        source,
    };
    parser.parse_program()
}

struct Parser<'a> {
    tokens: Vec<SpannedToken>,
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn advance(&mut self) -> SpannedToken {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Token::Eof => ParseError::new(
                self.span(),
                ParseErrorKind::UnexpectedEof {
                    expected: expected.into(),
                },
            ),
            other => ParseError::new(
                self.span(),
                ParseErrorKind::UnexpectedToken {
                    expected: expected.into(),
                    found: describe(other).into(),
                },
            ),
        }
    }

    fn eat_punct(&mut self, want: &Token, name: &str) -> ParseResult<Span> {
        if std::mem::discriminant(self.peek()) == std::mem::discriminant(want) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(name))
        }
    }

    fn check_punct(&self, want: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(want)
    }

    fn eat_ident(&mut self) -> ParseResult<String> {
        match self.peek().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn eat_string(&mut self) -> ParseResult<String> {
        match self.peek().clone() {
            Token::String(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.unexpected("a string literal")),
        }
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        let mut objects = Vec::new();
        while !matches!(self.peek(), Token::Eof) {
            objects.push(self.parse_object()?);
        }
        if objects.is_empty() {
            return Err(self.unexpected("at least one `object` declaration"));
        }
        Ok(Program { objects })
    }

    fn parse_object(&mut self) -> ParseResult<ObjectDecl> {
        let span = self.span();
        self.eat_punct(&Token::Object, "`object`")?;
        self.eat_punct(&Token::At, "`at`")?;
        let object_path = self.eat_string()?;

        let mut bus_names = Vec::new();
        if self.check_punct(&Token::Named) {
            self.advance();
            bus_names.push(self.eat_ident()?);
            while self.check_punct(&Token::Comma) {
                self.advance();
                bus_names.push(self.eat_ident()?);
            }
        }

        self.eat_punct(&Token::Implements, "`implements`")?;
        let mut interface_names = vec![self.eat_ident()?];
        while self.check_punct(&Token::Comma) {
            self.advance();
            interface_names.push(self.eat_ident()?);
        }

        self.eat_punct(&Token::LBrace, "`{`")?;

        let mut data_blocks = Vec::new();
        let mut state_blocks = Vec::new();
        let mut transition_blocks = Vec::new();

        while !self.check_punct(&Token::RBrace) {
            match self.peek() {
                Token::Data => data_blocks.push(self.parse_data_block()?),
                Token::States => state_blocks.push(self.parse_states_block()?),
                Token::Transition => transition_blocks.push(self.parse_transition_block()?),
                _ => return Err(self.unexpected("`data`, `states`, or `transition`")),
            }
        }
        self.eat_punct(&Token::RBrace, "`}`")?;

        Ok(ObjectDecl {
            object_path,
            bus_names,
            interface_names,
            data_blocks,
            state_blocks,
            transition_blocks,
            span,
        })
    }

    fn parse_data_block(&mut self) -> ParseResult<DataBlock> {
        self.eat_punct(&Token::Data, "`data`")?;
        self.eat_punct(&Token::LBrace, "`{`")?;
        let mut entries = Vec::new();
        while !self.check_punct(&Token::RBrace) {
            let span = self.span();
            let name = self.eat_ident()?;
            let annotation = if self.check_punct(&Token::LAngle) {
                Some(self.parse_angle_type()?)
            } else {
                None
            };
            self.eat_punct(&Token::Assign, "`=`")?;
            let value = self.parse_expr()?;
            self.eat_punct(&Token::Semicolon, "`;`")?;
            entries.push(DataEntry {
                name,
                annotation,
                value,
                span,
            });
        }
        self.eat_punct(&Token::RBrace, "`}`")?;
        Ok(DataBlock { entries })
    }

    /// `"<" type ">"`, where `type` is a D-Bus signature. Consumed by
    /// slicing the original source between the matching angle brackets,
    /// since a signature's own `{}()` makes naive token-by-token
    /// reconstruction fragile.
    fn parse_angle_type(&mut self) -> ParseResult<VariantType> {
        self.eat_punct(&Token::LAngle, "`<`")?;
        let start = self.span().offset as usize;
        let mut depth = 0i32;
        loop {
            match self.peek() {
                Token::LBrace | Token::LParen => {
                    depth += 1;
                    self.advance();
                }
                Token::RBrace | Token::RParen => {
                    depth -= 1;
                    self.advance();
                }
                Token::RAngle if depth <= 0 => break,
                Token::Eof => return Err(self.unexpected("`>`")),
                _ => {
                    self.advance();
                }
            }
        }
        let end = self.span().offset as usize;
        let text = self.source[start..end].trim();
        self.eat_punct(&Token::RAngle, "`>`")?;
        signature_to_type(text, self.span())
    }

    fn parse_states_block(&mut self) -> ParseResult<Vec<String>> {
        self.eat_punct(&Token::States, "`states`")?;
        self.eat_punct(&Token::LBrace, "`{`")?;
        let mut names = vec![self.eat_ident()?];
        while self.check_punct(&Token::Semicolon) {
            self.advance();
            if self.check_punct(&Token::RBrace) {
                break;
            }
            names.push(self.eat_ident()?);
        }
        self.eat_punct(&Token::RBrace, "`}`")?;
        Ok(names)
    }

    fn parse_transition_block(&mut self) -> ParseResult<TransitionBlock> {
        let span = self.span();
        self.eat_punct(&Token::Transition, "`transition`")?;

        let name = if let Token::Ident(_) = self.peek() {
            Some(self.eat_ident()?)
        } else {
            None
        };

        // Self-loop sugar: `transition NAME inside STATE on trigger {…}`.
        if self.check_punct(&Token::Inside) {
            self.advance();
            let state = self.eat_ident()?;
            let (def, nickname) = self.parse_transition_body(name)?;
            return Ok(TransitionBlock {
                definition: Rc::new(def),
                edges: vec![TransitionEdge {
                    from_state: state.clone(),
                    to_state: state,
                    nickname,
                    span,
                }],
            });
        }

        self.eat_punct(&Token::From, "`from`")?;
        let from_state = self.eat_ident()?;
        self.eat_punct(&Token::To, "`to`")?;
        let to_state = self.eat_ident()?;
        let (def, nickname) = self.parse_transition_body(name)?;
        Ok(TransitionBlock {
            definition: Rc::new(def),
            edges: vec![TransitionEdge {
                from_state,
                to_state,
                nickname,
                span,
            }],
        })
    }

    fn parse_transition_body(
        &mut self,
        name: Option<String>,
    ) -> ParseResult<(TransitionDef, Option<String>)> {
        let span = self.span();
        let nickname = if self.check_punct(&Token::Colon) {
            self.advance();
            Some(self.eat_ident()?)
        } else {
            None
        };

        self.eat_punct(&Token::On, "`on`")?;
        let trigger = self.parse_trigger()?;

        self.eat_punct(&Token::LBrace, "`{`")?;
        let mut preconditions = Vec::new();
        while self.check_punct(&Token::Precondition) {
            preconditions.push(self.parse_precondition()?);
        }
        let mut statements = Vec::new();
        while !self.check_punct(&Token::RBrace) {
            statements.push(self.parse_statement()?);
        }
        self.eat_punct(&Token::RBrace, "`}`")?;

        Ok((
            TransitionDef {
                name,
                trigger,
                preconditions,
                statements,
                span,
            },
            nickname,
        ))
    }

    fn parse_trigger(&mut self) -> ParseResult<Trigger> {
        match self.peek().clone() {
            Token::Method => {
                self.advance();
                Ok(Trigger::MethodCall(self.eat_ident()?))
            }
            Token::Property => {
                self.advance();
                Ok(Trigger::PropertySet(self.eat_ident()?))
            }
            Token::Random => {
                self.advance();
                Ok(Trigger::Arbitrary)
            }
            _ => Err(self.unexpected("`method`, `property`, or `random`")),
        }
    }

    fn parse_precondition(&mut self) -> ParseResult<Precondition> {
        let span = self.span();
        self.eat_punct(&Token::Precondition, "`precondition`")?;
        let error_name = if self.check_punct(&Token::Throwing) {
            self.advance();
            Some(self.eat_ident()?)
        } else {
            None
        };
        self.eat_punct(&Token::LBrace, "`{`")?;
        let condition = self.parse_expr()?;
        self.eat_punct(&Token::RBrace, "`}`")?;
        Ok(Precondition {
            error_name,
            condition,
            span,
        })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let span = self.span();
        match self.peek().clone() {
            Token::Emit => {
                self.advance();
                let signal_name = self.eat_ident()?;
                let value = self.parse_expr()?;
                self.eat_punct(&Token::Semicolon, "`;`")?;
                Ok(Statement::Emit {
                    signal_name,
                    value,
                    span,
                })
            }
            Token::Reply => {
                self.advance();
                let value = self.parse_expr()?;
                self.eat_punct(&Token::Semicolon, "`;`")?;
                Ok(Statement::Reply { value, span })
            }
            Token::Throw => {
                self.advance();
                let error_name = self.eat_ident()?;
                self.eat_punct(&Token::Semicolon, "`;`")?;
                Ok(Statement::Throw { error_name, span })
            }
            _ => {
                let lhs_expr = self.parse_expr()?;
                let lhs = match lhs_expr {
                    Expression::Literal(lit) => lit,
                    _ => return Err(self.unexpected("an assignable left-hand side")),
                };
                self.eat_punct(&Token::Assign, "`=`")?;
                let rhs = self.parse_expr()?;
                self.eat_punct(&Token::Semicolon, "`;`")?;
                Ok(Statement::Assign { lhs, rhs, span })
            }
        }
    }

    // ---- Expressions: precedence-climbing recursive descent ----
    //
    // or  -> and (`||` and)*
    // and -> cmp (`&&` cmp)*
    // cmp -> add ((`==`|`!=`|`<`|`<=`|`>`|`>=`) add)*
    // add -> mul ((`+`|`-`) mul)*
    // mul -> unary ((`*`|`/`|`%`) unary)*
    // unary -> `!` unary | postfix
    // postfix -> primary (`?` weight?)?
    // primary -> literal | `@`type primary | `(` … `)` | `[` … `]`
    //          | `{` … `}` | `<` expr `>` | ident(`(`args`)`)? | ident

    fn parse_expr(&mut self) -> ParseResult<Expression> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_and()?;
        while self.check_punct(&Token::OrOr) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expression::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_cmp()?;
        while self.check_punct(&Token::AndAnd) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_cmp()?;
            lhs = Expression::Binary {
                op: BinaryOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_cmp(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_add()?;
        loop {
            let op = match self.peek() {
                Token::EqEq => BinaryOp::Eq,
                Token::NotEq => BinaryOp::Ne,
                Token::LtEq => BinaryOp::Le,
                Token::GtEq => BinaryOp::Ge,
                // Bare `<`/`>` at this position are comparisons; variant
                // wrap `<expr>` is only recognised at the primary
                // position, where a comparison could never legally start.
                Token::LAngle => BinaryOp::Lt,
                Token::RAngle => BinaryOp::Gt,
                _ => break,
            };
            let span = self.span();
            self.advance();
            let rhs = self.parse_add()?;
            lhs = Expression::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_add(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_mul()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            let span = self.span();
            self.advance();
            let rhs = self.parse_mul()?;
            lhs = Expression::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_mul(&mut self) -> ParseResult<Expression> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Mod,
                _ => break,
            };
            let span = self.span();
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expression::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        if self.check_punct(&Token::Bang) {
            let span = self.span();
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(Expression::Unary {
                op: UnaryOp::Not,
                expr: Box::new(expr),
                span,
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let primary = self.parse_primary()?;
        if !self.check_punct(&Token::Question) {
            return Ok(primary);
        }
        self.advance();
        let weight = match self.peek().clone() {
            Token::Integer(text) => {
                self.advance();
                text.parse::<f64>().unwrap_or(1.0)
            }
            Token::Double(v) => {
                self.advance();
                v
            }
            _ => 1.0,
        };
        match primary {
            Expression::Literal(mut lit) => {
                lit.weight = weight;
                Ok(Expression::Literal(lit))
            }
            other => Ok(other),
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        // `@T` type annotation: binds to the literal/expression that
        // follows.
        if let Token::Annotation(text) = self.peek().clone() {
            let span = self.span();
            self.advance();
            let ty = signature_to_type(&text, span)?;
            let inner = self.parse_primary()?;
            return Ok(match inner {
                Expression::Literal(mut lit) => {
                    lit.annotation = Some(ty);
                    Expression::Literal(lit)
                }
                other => other,
            });
        }

        let span = self.span();
        match self.peek().clone() {
            Token::Integer(text) => {
                self.advance();
                Ok(Expression::Literal(DataLiteral::new(
                    DataLiteralKind::Integer(text),
                    span,
                )))
            }
            Token::Double(value) => {
                self.advance();
                Ok(Expression::Literal(DataLiteral::new(
                    DataLiteralKind::Double(value),
                    span,
                )))
            }
            Token::ObjectPathLit(text) => {
                self.advance();
                Ok(Expression::Literal(DataLiteral::new(
                    DataLiteralKind::ObjectPath(text),
                    span,
                )))
            }
            Token::SignatureLit(text) => {
                self.advance();
                Ok(Expression::Literal(DataLiteral::new(
                    DataLiteralKind::Signature(text),
                    span,
                )))
            }
            Token::UnixFd => {
                self.advance();
                Ok(Expression::Literal(DataLiteral::new(
                    DataLiteralKind::UnixFd,
                    span,
                )))
            }
            Token::Minus => {
                // Negative number literal sugar: `-123`, `-1.5`.
                self.advance();
                match self.peek().clone() {
                    Token::Integer(text) => {
                        self.advance();
                        Ok(Expression::Literal(DataLiteral::new(
                            DataLiteralKind::Integer(format!("-{text}")),
                            span,
                        )))
                    }
                    Token::Double(value) => {
                        self.advance();
                        Ok(Expression::Literal(DataLiteral::new(
                            DataLiteralKind::Double(-value),
                            span,
                        )))
                    }
                    _ => Err(self.unexpected("an integer or double literal after unary `-`")),
                }
            }
            Token::True => {
                self.advance();
                Ok(Expression::Literal(DataLiteral::new(
                    DataLiteralKind::Boolean(true),
                    span,
                )))
            }
            Token::False => {
                self.advance();
                Ok(Expression::Literal(DataLiteral::new(
                    DataLiteralKind::Boolean(false),
                    span,
                )))
            }
            Token::String(text) => {
                self.advance();
                Ok(Expression::Literal(DataLiteral::new(
                    DataLiteralKind::String(text),
                    span,
                )))
            }
            Token::LBracket => self.parse_array_literal(span),
            Token::LBrace => self.parse_dict_literal(span),
            Token::LParen => self.parse_paren_or_tuple(span),
            Token::LAngle => self.parse_variant_literal(span),
            Token::Ident(_) => self.parse_ident_expr(span),
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_array_literal(&mut self, span: Span) -> ParseResult<Expression> {
        self.eat_punct(&Token::LBracket, "`[`")?;
        let mut elements = Vec::new();
        if !self.check_punct(&Token::RBracket) {
            elements.push(self.parse_expr()?);
            while self.check_punct(&Token::Comma) {
                self.advance();
                if self.check_punct(&Token::RBracket) {
                    break;
                }
                elements.push(self.parse_expr()?);
            }
        }
        self.eat_punct(&Token::RBracket, "`]`")?;
        Ok(Expression::Literal(DataLiteral::new(
            DataLiteralKind::Array(elements),
            span,
        )))
    }

    fn parse_dict_literal(&mut self, span: Span) -> ParseResult<Expression> {
        self.eat_punct(&Token::LBrace, "`{`")?;
        let mut entries = Vec::new();
        if !self.check_punct(&Token::RBrace) {
            entries.push(self.parse_dict_entry()?);
            while self.check_punct(&Token::Comma) {
                self.advance();
                if self.check_punct(&Token::RBrace) {
                    break;
                }
                entries.push(self.parse_dict_entry()?);
            }
        }
        self.eat_punct(&Token::RBrace, "`}`")?;
        Ok(Expression::Literal(DataLiteral::new(
            DataLiteralKind::Dict(entries),
            span,
        )))
    }

    fn parse_dict_entry(&mut self) -> ParseResult<(Expression, Expression)> {
        let key = self.parse_expr()?;
        self.eat_punct(&Token::Colon, "`:`")?;
        let value = self.parse_expr()?;
        Ok((key, value))
    }

    fn parse_paren_or_tuple(&mut self, span: Span) -> ParseResult<Expression> {
        self.eat_punct(&Token::LParen, "`(`")?;
        if self.check_punct(&Token::RParen) {
            self.advance();
            return Ok(Expression::Literal(DataLiteral::new(
                DataLiteralKind::Tuple(Vec::new()),
                span,
            )));
        }
        let first = self.parse_expr()?;
        if self.check_punct(&Token::Comma) {
            let mut elements = vec![first];
            while self.check_punct(&Token::Comma) {
                self.advance();
                if self.check_punct(&Token::RParen) {
                    break;
                }
                elements.push(self.parse_expr()?);
            }
            self.eat_punct(&Token::RParen, "`)`")?;
            Ok(Expression::Literal(DataLiteral::new(
                DataLiteralKind::Tuple(elements),
                span,
            )))
        } else {
            self.eat_punct(&Token::RParen, "`)`")?;
            Ok(first)
        }
    }

    fn parse_variant_literal(&mut self, span: Span) -> ParseResult<Expression> {
        self.eat_punct(&Token::LAngle, "`<`")?;
        let inner = self.parse_expr()?;
        self.eat_punct(&Token::RAngle, "`>`")?;
        Ok(Expression::Literal(DataLiteral::new(
            DataLiteralKind::Variant(Box::new(inner)),
            span,
        )))
    }

    fn parse_ident_expr(&mut self, span: Span) -> ParseResult<Expression> {
        let name = self.eat_ident()?;
        if self.check_punct(&Token::LParen) {
            self.advance();
            let mut args = Vec::new();
            if !self.check_punct(&Token::RParen) {
                args.push(self.parse_expr()?);
                while self.check_punct(&Token::Comma) {
                    self.advance();
                    args.push(self.parse_expr()?);
                }
            }
            self.eat_punct(&Token::RParen, "`)`")?;
            Ok(Expression::FunctionCall { name, args, span })
        } else {
            Ok(Expression::Literal(DataLiteral::new(
                DataLiteralKind::Variable(name),
                span,
            )))
        }
    }
}

fn signature_to_type(text: &str, span: Span) -> ParseResult<VariantType> {
    let sig = Signature::new(text)
        .map_err(|_| ParseError::new(span, ParseErrorKind::InvalidTypeAnnotation(text.into())))?;
    VariantType::from_signature(sig)
        .map_err(|_| ParseError::new(span, ParseErrorKind::InvalidTypeAnnotation(text.into())))
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(name) => format!("identifier `{name}`"),
        Token::Integer(text) => format!("integer `{text}`"),
        Token::String(text) => format!("string {text:?}"),
        Token::Annotation(text) => format!("annotation `@{text}`"),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_object() {
        let src = r#"
            object at "/a" implements org.example.Thing {
                states { Main; }
                transition on method Echo {
                    reply (value);
                }
            }
        "#;
        let program = parse_program(src).unwrap();
        assert_eq!(program.objects.len(), 1);
        let obj = &program.objects[0];
        assert_eq!(obj.object_path, "/a");
        assert_eq!(obj.interface_names, vec!["org.example.Thing".to_string()]);
        assert_eq!(obj.state_blocks, vec![vec!["Main".to_string()]]);
        assert_eq!(obj.transition_blocks.len(), 1);
    }

    #[test]
    fn parses_data_block_with_annotation_and_weight() {
        let src = r#"
            object at "/a" implements org.example.Thing {
                data {
                    counter <u> = 0?;
                }
                states { Main; }
            }
        "#;
        let program = parse_program(src).unwrap();
        let entry = &program.objects[0].data_blocks[0].entries[0];
        assert_eq!(entry.name, "counter");
        assert_eq!(entry.annotation, Some(VariantType::Uint32));
        match &entry.value {
            Expression::Literal(lit) => assert_eq!(lit.weight, 1.0),
            _ => panic!("expected literal"),
        }
    }

    #[test]
    fn parses_precondition_and_throw() {
        let src = r#"
            object at "/a" implements I {
                states { Main; }
                transition from Main to Main on method Divide {
                    precondition throwing org.example.DivByZero { b != 0 }
                    reply (a / b);
                }
            }
        "#;
        let program = parse_program(src).unwrap();
        let block = &program.objects[0].transition_blocks[0];
        assert_eq!(block.edges[0].from_state, "Main");
        assert_eq!(block.definition.preconditions.len(), 1);
        assert_eq!(
            block.definition.preconditions[0].error_name.as_deref(),
            Some("org.example.DivByZero")
        );
    }

    #[test]
    fn parses_array_dict_tuple_and_variant_literals() {
        let src = r#"
            object at "/a" implements I {
                data {
                    xs = [1, 2, 3];
                    d = { "a": 1, "b": 2 };
                    t = (1, "x");
                    v = <1>;
                }
                states { Main; }
            }
        "#;
        let program = parse_program(src).unwrap();
        let entries = &program.objects[0].data_blocks[0].entries;
        assert!(matches!(
            entries[0].value,
            Expression::Literal(DataLiteral {
                kind: DataLiteralKind::Array(_),
                ..
            })
        ));
        assert!(matches!(
            entries[1].value,
            Expression::Literal(DataLiteral {
                kind: DataLiteralKind::Dict(_),
                ..
            })
        ));
        assert!(matches!(
            entries[2].value,
            Expression::Literal(DataLiteral {
                kind: DataLiteralKind::Tuple(_),
                ..
            })
        ));
        assert!(matches!(
            entries[3].value,
            Expression::Literal(DataLiteral {
                kind: DataLiteralKind::Variant(_),
                ..
            })
        ));
    }

    #[test]
    fn parses_double_object_path_and_signature_literals() {
        let src = r#"
            object at "/a" implements I {
                data {
                    ratio = 1.5;
                    neg = -2.25;
                    target = o"/a/b";
                    sig = g"ii";
                    fd = unixfd;
                }
                states { Main; }
            }
        "#;
        let program = parse_program(src).unwrap();
        let entries = &program.objects[0].data_blocks[0].entries;
        assert!(matches!(
            entries[0].value,
            Expression::Literal(DataLiteral { kind: DataLiteralKind::Double(v), .. }) if v == 1.5
        ));
        assert!(matches!(
            entries[1].value,
            Expression::Literal(DataLiteral { kind: DataLiteralKind::Double(v), .. }) if v == -2.25
        ));
        assert!(matches!(
            &entries[2].value,
            Expression::Literal(DataLiteral { kind: DataLiteralKind::ObjectPath(s), .. }) if s == "/a/b"
        ));
        assert!(matches!(
            &entries[3].value,
            Expression::Literal(DataLiteral { kind: DataLiteralKind::Signature(s), .. }) if s == "ii"
        ));
        assert!(matches!(
            entries[4].value,
            Expression::Literal(DataLiteral { kind: DataLiteralKind::UnixFd, .. })
        ));
    }

    #[test]
    fn rejects_unterminated_block() {
        let src = r#"object at "/a" implements I { states { Main; }"#;
        assert!(parse_program(src).is_err());
    }
}
