use std::fmt::Display;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LexError {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("`:` must be followed by `=`")]
    ColonWithoutEquals,
    #[error("integer literal {0} does not fit in 64 bits")]
    IntegerOverflow(Rc<str>),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    Illegal(LexError),
    Ident(Rc<str>),
    Number(i64),

    // Operators
    Assign,
    Plus,
    Minus,
    Asterisk,

    Equal,
    NotEqual,

    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    Comma,
    SemiColon,
    LParen,
    RParen,

    // Keywords
    Begin,
    End,
    Read,
    Write,
    Integer,
    If,
    Then,
    Else,
    Function,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "function" => Some(TokenKind::Function),
        "integer" => Some(TokenKind::Integer),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "then" => Some(TokenKind::Then),
        "read" => Some(TokenKind::Read),
        "write" => Some(TokenKind::Write),
        "begin" => Some(TokenKind::Begin),
        "end" => Some(TokenKind::End),
        _ => None,
    }
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self { input, iter }
    }

    fn read_identifier(&mut self, start: usize) -> TokenKind {
        while self
            .iter
            .next_if(|(_, ch)| ch.is_ascii_alphanumeric())
            .is_some()
        {}

        let ident = &self.input[start..self.next_idx()];
        keywords(ident).unwrap_or_else(|| TokenKind::Ident(ident.into()))
    }

    fn read_number(&mut self, start: usize) -> TokenKind {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        let digits = &self.input[start..self.next_idx()];
        match digits.parse() {
            Ok(value) => TokenKind::Number(value),
            Err(_) => TokenKind::Illegal(LexError::IntegerOverflow(digits.into())),
        }
    }

    /// Picks `double` when the next character is `second`, `single` otherwise.
    fn either(&mut self, second: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.iter.next_if(|(_, ch)| *ch == second).is_some() {
            double
        } else {
            single
        }
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.iter.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}

        let (idx, ch) = self.iter.next()?;
        let kind = match ch {
            '<' => {
                if self.iter.next_if(|(_, ch)| *ch == '>').is_some() {
                    TokenKind::NotEqual
                } else {
                    self.either('=', TokenKind::LessEqual, TokenKind::Less)
                }
            }
            '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::Greater),
            ':' => self.either(
                '=',
                TokenKind::Assign,
                TokenKind::Illegal(LexError::ColonWithoutEquals),
            ),
            '=' => TokenKind::Equal,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ';' => TokenKind::SemiColon,
            ',' => TokenKind::Comma,
            c if c.is_ascii_alphabetic() => self.read_identifier(idx),
            c if c.is_ascii_digit() => self.read_number(idx),
            _ => TokenKind::Illegal(LexError::UnexpectedCharacter(ch)),
        };

        Some(Token {
            kind,
            start: idx,
            end: self.next_idx(),
        })
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TokenKind::*;
        match self {
            Illegal(error) => write!(f, "illegal token ({})", error),
            Ident(name) => write!(f, "identifier `{}`", name),
            Number(value) => write!(f, "number {}", value),
            other => write!(f, "`{}`", other.to_str()),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}..{}", self.kind, self.start, self.end)
    }
}

impl TokenKind {
    fn to_str(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Illegal(_) | Ident(_) | Number(_) => "",
            Assign => ":=",
            Plus => "+",
            Minus => "-",
            Asterisk => "*",
            Equal => "=",
            NotEqual => "<>",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Comma => ",",
            SemiColon => ";",
            LParen => "(",
            RParen => ")",
            Begin => "begin",
            End => "end",
            Read => "read",
            Write => "write",
            Integer => "integer",
            If => "if",
            Then => "then",
            Else => "else",
            Function => "function",
        }
    }
}
