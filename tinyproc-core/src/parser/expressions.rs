use super::error::ParseError;
use super::statements::{parse_function, parse_read, parse_write};
use crate::ast::{BinaryOp, Expr, Identifier};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;
use crate::{STACK_GROW_SIZE, STACK_RED_ZONE};

/// Binding strength of an operator. Anything that is not a binary operator
/// has strength 0 and ends an expression.
pub fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Multiply => 40,
        BinaryOp::Plus | BinaryOp::Minus => 20,
        BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => 10,
        BinaryOp::Equal | BinaryOp::NotEqual => 9,
        BinaryOp::Assign => 5,
    }
}

pub fn binary_op(token: &TokenKind) -> Option<BinaryOp> {
    match token {
        TokenKind::Assign => Some(BinaryOp::Assign),
        TokenKind::Plus => Some(BinaryOp::Plus),
        TokenKind::Minus => Some(BinaryOp::Minus),
        TokenKind::Asterisk => Some(BinaryOp::Multiply),
        TokenKind::Less => Some(BinaryOp::Less),
        TokenKind::Greater => Some(BinaryOp::Greater),
        TokenKind::LessEqual => Some(BinaryOp::LessEqual),
        TokenKind::GreaterEqual => Some(BinaryOp::GreaterEqual),
        TokenKind::Equal => Some(BinaryOp::Equal),
        TokenKind::NotEqual => Some(BinaryOp::NotEqual),
        _ => None,
    }
}

fn peek_precedence(parser: &mut Parser) -> u8 {
    parser.peek_kind().and_then(binary_op).map_or(0, precedence)
}

pub fn parse_expression(parser: &mut Parser) -> Result<Expr, ParseError> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
        let lhs = parse_primary(parser)?;
        parse_binary_rhs(parser, 1, lhs)
    })
}

/// Precedence climbing over the operator tail of an expression.
fn parse_binary_rhs(
    parser: &mut Parser,
    min_precedence: u8,
    mut lhs: Expr,
) -> Result<Expr, ParseError> {
    loop {
        let Some(op) = parser.peek_kind().and_then(binary_op) else {
            return Ok(lhs);
        };
        let op_precedence = precedence(op);
        if op_precedence < min_precedence {
            return Ok(lhs);
        }
        parser.next_token()?;

        let mut rhs = parse_primary(parser)?;
        if op_precedence < peek_precedence(parser) {
            rhs = parse_binary_rhs(parser, op_precedence + 1, rhs)?;
        }

        lhs = Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        };
    }
}

pub fn parse_primary(parser: &mut Parser) -> Result<Expr, ParseError> {
    let Some(token) = parser.next_token()? else {
        return Err(ParseError::premature_end_expected_expression());
    };
    match token.kind {
        TokenKind::Number(value) => Ok(Expr::Number(value)),
        TokenKind::Ident(name) => parse_identifier_expression(parser, Identifier { name }),
        TokenKind::LParen => parse_grouped_expression(parser),
        TokenKind::If => parse_condition(parser),
        TokenKind::Read => parse_read(parser),
        TokenKind::Write => parse_write(parser),
        TokenKind::Integer => parse_declaration(parser),
        TokenKind::Function => parse_function(parser),
        _ => Err(ParseError::NoPrefixFunction(token)),
    }
}

/// A variable reference, or a call when the name is followed by `(`.
fn parse_identifier_expression(
    parser: &mut Parser,
    identifier: Identifier,
) -> Result<Expr, ParseError> {
    if !parser.next_if_kind(&TokenKind::LParen) {
        return Ok(Expr::Variable(identifier));
    }

    let arguments = parse_arguments(parser)?;
    Ok(Expr::Call {
        callee: identifier,
        arguments,
    })
}

fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expr>, ParseError> {
    let mut arguments = Vec::new();
    if parser.next_if_kind(&TokenKind::RParen) {
        return Ok(arguments);
    }

    loop {
        arguments.push(parse_expression(parser)?);

        let next = parser.next_token()?;
        match next {
            Some(Token {
                kind: TokenKind::Comma,
                ..
            }) => continue,
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => return Ok(arguments),
            _ => return Err(ParseError::unexpected_token(TokenKind::RParen, next)),
        }
    }
}

fn parse_grouped_expression(parser: &mut Parser) -> Result<Expr, ParseError> {
    let expression = parse_expression(parser)?;
    parser.expect_token(TokenKind::RParen)?;
    Ok(expression)
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, ParseError> {
    let condition = Box::new(parse_expression(parser)?);
    parser.expect_token(TokenKind::Then)?;
    let consequence = Box::new(parse_expression(parser)?);
    parser.expect_token(TokenKind::Else)?;
    let alternative = Box::new(parse_expression(parser)?);

    Ok(Expr::Condition {
        condition,
        consequence,
        alternative,
    })
}

/// `integer x`, `integer f(...)` or `integer function ...`.
fn parse_declaration(parser: &mut Parser) -> Result<Expr, ParseError> {
    let token = parser.next_token()?;
    match token {
        Some(Token {
            kind: TokenKind::Ident(name),
            ..
        }) => parse_identifier_expression(parser, Identifier { name }),
        Some(Token {
            kind: TokenKind::Function,
            ..
        }) => parse_function(parser),
        _ => Err(ParseError::unexpected_other(
            super::error::Expected::Identifier,
            token,
        )),
    }
}
