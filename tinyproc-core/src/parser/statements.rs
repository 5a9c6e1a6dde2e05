use std::rc::Rc;

use log::trace;

use super::error::ParseError;
use super::expressions::parse_expression;
use crate::ast::{Block, Expr, Function, Prototype};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;

/// Parses the rest of a `begin ... end` block; `begin` is already consumed.
pub fn parse_block(parser: &mut Parser) -> Result<Block, ParseError> {
    if parser.next_if_kind(&TokenKind::End) {
        return Ok(Block { body: None });
    }

    let body = parse_sequence(parser)?;
    parser.expect_token(TokenKind::End)?;
    trace!("parsed block: {}", body);

    Ok(Block { body: Some(body) })
}

/// `stmt (; stmt)*`, nested to the right. A `;` right before `end` closes the
/// sequence without a right-hand side.
pub fn parse_sequence(parser: &mut Parser) -> Result<Expr, ParseError> {
    let mut statements = Vec::new();
    let mut last = parse_expression(parser)?;
    let mut trailing_semicolon = false;

    while parser.next_if_kind(&TokenKind::SemiColon) {
        if parser.peek_kind() == Some(&TokenKind::End) {
            trailing_semicolon = true;
            break;
        }
        let next = parse_expression(parser)?;
        statements.push(std::mem::replace(&mut last, next));
    }

    let mut sequence = if trailing_semicolon {
        Expr::Sequence {
            first: Box::new(last),
            rest: None,
        }
    } else {
        last
    };
    for statement in statements.into_iter().rev() {
        sequence = Expr::Sequence {
            first: Box::new(statement),
            rest: Some(Box::new(sequence)),
        };
    }

    Ok(sequence)
}

/// `function NAME ( [param, ...] ) ; begin [stmts] end`, after `function`.
pub fn parse_function(parser: &mut Parser) -> Result<Expr, ParseError> {
    let name = parser.parse_ident()?;
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_parameters(parser)?;
    parser.expect_token(TokenKind::SemiColon)?;
    parser.expect_token(TokenKind::Begin)?;

    let body = if parser.next_if_kind(&TokenKind::End) {
        None
    } else {
        let body = parse_sequence(parser)?;
        parser.expect_token(TokenKind::End)?;
        Some(Box::new(body))
    };

    Ok(Expr::Function(Rc::new(Function {
        prototype: Prototype { name, parameters },
        body,
    })))
}

fn parse_parameters(parser: &mut Parser) -> Result<Vec<crate::ast::Identifier>, ParseError> {
    let mut identifiers = Vec::new();
    if parser.next_if_kind(&TokenKind::RParen) {
        return Ok(identifiers);
    }

    loop {
        identifiers.push(parser.parse_ident()?);

        let next = parser.next_token()?;
        match next {
            Some(Token {
                kind: TokenKind::Comma,
                ..
            }) => continue,
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => return Ok(identifiers),
            _ => return Err(ParseError::unexpected_token(TokenKind::RParen, next)),
        }
    }
}

/// `read ( ident )`, after `read`.
pub fn parse_read(parser: &mut Parser) -> Result<Expr, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let name = parser.parse_ident()?;
    parser.expect_token(TokenKind::RParen)?;
    Ok(Expr::Read(name))
}

/// `write ( expr )`, after `write`.
pub fn parse_write(parser: &mut Parser) -> Result<Expr, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let expression = parse_expression(parser)?;
    parser.expect_token(TokenKind::RParen)?;
    Ok(Expr::Write(Box::new(expression)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Identifier;
    use crate::lexer::Tokenizer;

    #[test]
    fn test_sequence_shape() {
        let mut parser = Parser::new(Tokenizer::new("a; b; end"));
        let sequence = parse_sequence(&mut parser).unwrap();

        assert_eq!(
            sequence,
            Expr::Sequence {
                first: Box::new(Expr::Variable(Identifier::new("a"))),
                rest: Some(Box::new(Expr::Sequence {
                    first: Box::new(Expr::Variable(Identifier::new("b"))),
                    rest: None,
                })),
            }
        );
        assert_eq!(parser.peek_kind(), Some(&TokenKind::End));
    }

    #[test]
    fn test_long_sequence() {
        let count = 10_000;
        let input = format!("{} end", vec!["x := 1"; count].join("; "));
        let mut parser = Parser::new(Tokenizer::new(&input));
        let sequence = parse_sequence(&mut parser).unwrap();

        let mut current = &sequence;
        let mut statements = 1;
        while let Expr::Sequence {
            rest: Some(rest), ..
        } = current
        {
            statements += 1;
            current = &**rest;
        }
        assert_eq!(statements, count);
        assert_eq!(current.to_string(), "(x := 1)");
    }

    #[test]
    fn test_single_statement_is_not_wrapped() {
        let mut parser = Parser::new(Tokenizer::new("write(1) end"));
        let statement = parse_sequence(&mut parser).unwrap();

        assert_eq!(statement, Expr::Write(Box::new(Expr::Number(1))));
    }

    #[test]
    fn test_function_definition() {
        let mut parser = Parser::new(Tokenizer::new("g(x, y); begin end"));
        let function = parse_function(&mut parser).unwrap();

        assert_eq!(
            function,
            Expr::Function(Rc::new(Function {
                prototype: Prototype {
                    name: Identifier::new("g"),
                    parameters: vec![Identifier::new("x"), Identifier::new("y")],
                },
                body: None,
            }))
        );
    }
}
