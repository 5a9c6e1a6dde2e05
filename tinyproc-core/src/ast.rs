use std::fmt::Display;
use std::rc::Rc;

use crate::{STACK_GROW_SIZE, STACK_RED_ZONE};

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Number(i64),
    Variable(Identifier),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `first; rest`. A missing `rest` is the trailing `stmt;` right before `end`.
    Sequence {
        first: Box<Expr>,
        rest: Option<Box<Expr>>,
    },
    Condition {
        condition: Box<Expr>,
        consequence: Box<Expr>,
        alternative: Box<Expr>,
    },
    Call {
        callee: Identifier,
        arguments: Vec<Expr>,
    },
    Function(Rc<Function>),
    Read(Identifier),
    Write(Box<Expr>),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOp {
    Assign,
    Plus,
    Minus,
    Multiply,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Identifier {
    pub name: Rc<str>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Prototype {
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
}

#[derive(Debug, PartialEq)]
pub struct Function {
    pub prototype: Prototype,
    /// `None` for an empty `begin end` body.
    pub body: Option<Box<Expr>>,
}

/// One top-level `begin ... end` unit.
#[derive(Debug, PartialEq)]
pub struct Block {
    pub body: Option<Expr>,
}

#[derive(Debug)]
pub struct Program {
    pub blocks: Vec<Block>,
}

impl Identifier {
    pub fn new(name: &str) -> Self {
        Identifier { name: name.into() }
    }
}

impl Default for Expr {
    fn default() -> Self {
        Expr::Number(0)
    }
}

/// Nested nodes are released from a worklist, so dropping a deep tree does
/// not recurse.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

impl Expr {
    fn detach_children(&mut self, pending: &mut Vec<Expr>) {
        use std::mem::take;
        match self {
            Expr::Binary { lhs, rhs, .. } => {
                pending.push(take(&mut **lhs));
                pending.push(take(&mut **rhs));
            }
            Expr::Sequence { first, rest } => {
                pending.push(take(&mut **first));
                if let Some(rest) = rest.take() {
                    pending.push(*rest);
                }
            }
            Expr::Condition {
                condition,
                consequence,
                alternative,
            } => {
                pending.push(take(&mut **condition));
                pending.push(take(&mut **consequence));
                pending.push(take(&mut **alternative));
            }
            Expr::Call { arguments, .. } => pending.append(arguments),
            Expr::Write(expr) => pending.push(take(&mut **expr)),
            Expr::Number(_) | Expr::Variable(_) | Expr::Function(_) | Expr::Read(_) => {}
        }
    }

    fn write_to(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expr::*;
        match self {
            Number(val) => write!(f, "{}", val),
            Variable(ident) => write!(f, "{}", ident.name),
            Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.to_str(), rhs),
            Sequence { first, rest } => match rest {
                Some(rest) => write!(f, "{}; {}", first, rest),
                None => write!(f, "{};", first),
            },
            Condition {
                condition,
                consequence,
                alternative,
            } => write!(
                f,
                "if {} then {} else {}",
                condition, consequence, alternative
            ),
            Call { callee, arguments } => {
                write!(
                    f,
                    "{}({})",
                    callee.name,
                    arguments
                        .iter()
                        .map(|arg| arg.to_string())
                        .collect::<Vec<String>>()
                        .join(", ")
                )
            }
            Function(function) => write!(f, "{}", function),
            Read(ident) => write!(f, "read({})", ident.name),
            Write(expr) => write!(f, "write({})", expr),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.write_to(f))
    }
}

impl Display for Prototype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "function {}({})",
            self.name.name,
            self.parameters
                .iter()
                .map(|id| id.name.as_ref())
                .collect::<Box<[&str]>>()
                .join(", ")
        )
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{}; begin {} end", self.prototype, body),
            None => write!(f, "{}; begin end", self.prototype),
        }
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.body {
            Some(body) => write!(f, "begin {} end", body),
            None => write!(f, "begin end"),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for block in &self.blocks {
            writeln!(f, "{}", block)?;
        }
        Ok(())
    }
}

impl BinaryOp {
    pub fn to_str(&self) -> &'static str {
        use BinaryOp::*;
        match self {
            Assign => ":=",
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "=",
            NotEqual => "<>",
        }
    }
}
