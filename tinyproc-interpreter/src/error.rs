use std::rc::Rc;

use thiserror::Error;
use tinyproc_core::ast::BinaryOp;
use tinyproc_core::parser::ParseError;

use crate::io::InputError;

#[derive(Debug, PartialEq, Error)]
pub enum RuntimeError {
    #[error("assignment to undeclared variable `{0}`")]
    UndeclaredVariable(Rc<str>),
    #[error("cannot assign to `{0}`, it is not a variable")]
    InvalidAssignmentTarget(String),
    #[error("no function named `{0}` in this scope")]
    UndefinedFunction(Rc<str>),
    #[error("function `{function}` expects {expected} arguments, got {actual}")]
    WrongArgumentCount {
        function: Rc<str>,
        expected: usize,
        actual: usize,
    },
    #[error("integer overflow in `{lhs} {} {rhs}`", .op.to_str())]
    Overflow { op: BinaryOp, lhs: i64, rhs: i64 },
    #[error("call depth limit of {0} exceeded")]
    CallDepthExceeded(usize),
    #[error("read failed: {0}")]
    Input(#[from] InputError),
    #[error("write failed: {0}")]
    Output(std::io::ErrorKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Only the construct being parsed is dropped.
    Recoverable,
    /// Ends the current block, and the process under the default policy.
    Fatal,
}

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn severity(&self) -> Severity {
        match self {
            Error::Parse(err) if !err.is_fatal() => Severity::Recoverable,
            _ => Severity::Fatal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinyproc_core::lexer::LexError;

    #[test]
    fn test_severity() {
        let tests = vec![
            (
                Error::Parse(ParseError::premature_end_expected_expression()),
                Severity::Recoverable,
            ),
            (
                Error::Parse(ParseError::Lexical {
                    error: LexError::UnexpectedCharacter('#'),
                    start: 0,
                    end: 1,
                }),
                Severity::Fatal,
            ),
            (
                Error::Runtime(RuntimeError::UndefinedFunction("f".into())),
                Severity::Fatal,
            ),
        ];

        for (error, expected) in tests {
            assert_eq!(error.severity(), expected, "{error}");
        }
    }

    #[test]
    fn test_messages() {
        let tests = vec![
            (
                RuntimeError::WrongArgumentCount {
                    function: "f".into(),
                    expected: 1,
                    actual: 2,
                },
                "function `f` expects 1 arguments, got 2",
            ),
            (
                RuntimeError::Overflow {
                    op: BinaryOp::Multiply,
                    lhs: i64::MAX,
                    rhs: 2,
                },
                "integer overflow in `9223372036854775807 * 2`",
            ),
            (
                RuntimeError::UndeclaredVariable("x".into()),
                "assignment to undeclared variable `x`",
            ),
        ];

        for (error, expected) in tests {
            assert_eq!(error.to_string(), expected);
        }
    }
}
