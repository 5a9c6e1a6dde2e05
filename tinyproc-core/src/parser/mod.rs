pub mod error;
pub mod expressions;
pub mod statements;

use log::warn;

use crate::ast::{Block, Identifier, Program};
use crate::lexer::{Token, TokenKind};
pub use error::ParseError;
use statements::parse_block;

pub struct Parser<'a> {
    pub iter: std::iter::Peekable<crate::lexer::Tokenizer<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: crate::lexer::Tokenizer<'a>) -> Self {
        let iter = tokenizer.peekable();
        Self { iter }
    }

    /// Consumes the next token, turning an illegal one into a lexical error.
    pub(crate) fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        match self.iter.next() {
            Some(Token {
                kind: TokenKind::Illegal(error),
                start,
                end,
            }) => Err(ParseError::Lexical { error, start, end }),
            token => Ok(token),
        }
    }

    pub(crate) fn peek_kind(&mut self) -> Option<&TokenKind> {
        self.iter.peek().map(|token| &token.kind)
    }

    /// Consumes the next token only if it is of `kind`.
    pub(crate) fn next_if_kind(&mut self, kind: &TokenKind) -> bool {
        self.iter.next_if(|token| token.kind == *kind).is_some()
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Identifier, ParseError> {
        let token = self.next_token()?;
        match token {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(Identifier { name }),
            _ => Err(ParseError::unexpected_other(
                error::Expected::Identifier,
                token,
            )),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        let token = self.next_token()?;
        match token {
            Some(Token { ref kind, .. }) if *kind == token_kind => Ok(()),
            _ => Err(ParseError::unexpected_token(token_kind, token)),
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, Vec<ParseError>> {
        let mut blocks = Vec::new();
        let mut errors = Vec::new();

        for block in self.by_ref() {
            match block {
                Ok(block) => blocks.push(block),
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() {
            Ok(Program { blocks })
        } else {
            Err(errors)
        }
    }
}

/// Top-level dispatch: yields one item per `begin ... end` block. Semicolons
/// between blocks are skipped and any other stray token is ignored.
impl<'a> Iterator for Parser<'a> {
    type Item = Result<Block, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let token = match self.next_token() {
                Ok(token) => token?,
                Err(err) => return Some(Err(err)),
            };
            match token.kind {
                TokenKind::SemiColon => {}
                TokenKind::Begin => return Some(parse_block(self)),
                _ => warn!("ignoring {} outside of a block", token),
            }
        }
    }
}
