use std::io::Write;
use std::rc::Rc;

use log::{debug, trace};
use tinyproc_core::ast::{BinaryOp, Block, Expr, Function, Identifier};
use tinyproc_core::{STACK_GROW_SIZE, STACK_RED_ZONE};

use crate::context::{CallGuard, Context};
use crate::error::RuntimeError;
use crate::io::IntegerSource;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Tree-walking evaluator. Every node can be run for its effect
/// ([`Evaluator::interpret`], statement position) or for its value
/// ([`Evaluator::value`], expression position); the caller picks the mode.
pub struct Evaluator<'io> {
    input: &'io mut dyn IntegerSource,
    output: &'io mut dyn Write,
    max_call_depth: usize,
}

impl<'io> Evaluator<'io> {
    pub fn new(input: &'io mut dyn IntegerSource, output: &'io mut dyn Write) -> Self {
        Self {
            input,
            output,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Runs a top-level block in a fresh context and hands the context back.
    pub fn run_block(&mut self, block: &Block) -> Result<Context, RuntimeError> {
        let mut context = Context::new();
        if let Some(body) = &block.body {
            self.interpret(body, &mut context)?;
        }
        Ok(context)
    }

    pub fn interpret(&mut self, expr: &Expr, context: &mut Context) -> Result<(), RuntimeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.interpret_expression(expr, context)
        })
    }

    pub fn value(&mut self, expr: &Expr, context: &mut Context) -> Result<i64, RuntimeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.expression_value(expr, context)
        })
    }

    fn interpret_expression(
        &mut self,
        expr: &Expr,
        context: &mut Context,
    ) -> Result<(), RuntimeError> {
        match expr {
            Expr::Variable(ident) => {
                context.declare(&ident.name);
            }
            Expr::Binary {
                op: BinaryOp::Assign,
                lhs,
                rhs,
            } => {
                self.assign(lhs, rhs, context)?;
            }
            Expr::Sequence { .. } => self.interpret_sequence(expr, context)?,
            Expr::Condition {
                condition,
                consequence,
                alternative,
            } => {
                if self.value(condition, context)? != 0 {
                    self.interpret(consequence, context)?;
                } else {
                    self.interpret(alternative, context)?;
                }
            }
            Expr::Call { callee, arguments } => {
                self.call(callee, arguments, context)?;
            }
            Expr::Function(function) => {
                debug!("defining function `{}`", function.prototype.name.name);
                context.define_function(function.clone());
            }
            Expr::Read(ident) => {
                let value = self.input.next_integer()?;
                trace!("read {} into `{}`", value, ident.name);
                context.set(ident.name.clone(), value);
            }
            Expr::Write(expr) => {
                let value = self.value(expr, context)?;
                writeln!(self.output, "{}", value)
                    .map_err(|err| RuntimeError::Output(err.kind()))?;
            }
            Expr::Number(_) | Expr::Binary { .. } => {}
        }
        Ok(())
    }

    fn expression_value(&mut self, expr: &Expr, context: &mut Context) -> Result<i64, RuntimeError> {
        match expr {
            Expr::Number(value) => Ok(*value),
            Expr::Variable(ident) => Ok(context.declare(&ident.name)),
            Expr::Binary { op, lhs, rhs } => match host_operation(*op) {
                None => self.assign(lhs, rhs, context),
                Some(operation) => {
                    let lhs = self.value(lhs, context)?;
                    let rhs = self.value(rhs, context)?;
                    operation(lhs, rhs).ok_or(RuntimeError::Overflow { op: *op, lhs, rhs })
                }
            },
            Expr::Call { callee, arguments } => self.call(callee, arguments, context),
            Expr::Sequence { .. }
            | Expr::Condition { .. }
            | Expr::Function(_)
            | Expr::Read(_)
            | Expr::Write(_) => Ok(0),
        }
    }

    /// Runs `first; rest` chains without recursing into `rest`.
    fn interpret_sequence(&mut self, expr: &Expr, context: &mut Context) -> Result<(), RuntimeError> {
        let mut current = expr;
        while let Expr::Sequence { first, rest } = current {
            self.interpret(first, context)?;
            match rest {
                Some(rest) => current = &**rest,
                None => return Ok(()),
            }
        }
        self.interpret(current, context)
    }

    fn assign(
        &mut self,
        target: &Expr,
        value: &Expr,
        context: &mut Context,
    ) -> Result<i64, RuntimeError> {
        let Expr::Variable(ident) = target else {
            return Err(RuntimeError::InvalidAssignmentTarget(target.to_string()));
        };
        if context.variable(&ident.name).is_none() {
            return Err(RuntimeError::UndeclaredVariable(ident.name.clone()));
        }

        let value = self.value(value, context)?;
        trace!("`{}` := {}", ident.name, value);
        context.set(ident.name.clone(), value);
        Ok(value)
    }

    fn call(
        &mut self,
        callee: &Identifier,
        arguments: &[Expr],
        context: &mut Context,
    ) -> Result<i64, RuntimeError> {
        let function = context
            .function(&callee.name)
            .ok_or_else(|| RuntimeError::UndefinedFunction(callee.name.clone()))?;

        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.value(argument, context)?);
        }

        if context.depth() >= self.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded(self.max_call_depth));
        }

        debug!("calling `{}` with {:?}", callee.name, values);
        let mut guard = CallGuard::enter(context);
        let frame = guard.attach(values);
        frame.declare(&callee.name);
        self.invoke(&function, frame)?;

        let result = frame.variable(&callee.name).unwrap_or_default();
        debug!("`{}` returned {}", callee.name, result);
        Ok(result)
    }

    /// Runs `function` inside `frame`, which already holds the arguments.
    fn invoke(&mut self, function: &Rc<Function>, frame: &mut Context) -> Result<(), RuntimeError> {
        let prototype = &function.prototype;
        frame.define_function(function.clone());

        if prototype.parameters.len() != frame.args().len() {
            return Err(RuntimeError::WrongArgumentCount {
                function: prototype.name.name.clone(),
                expected: prototype.parameters.len(),
                actual: frame.args().len(),
            });
        }
        let arguments = frame.args().to_vec();
        for (parameter, argument) in prototype.parameters.iter().zip(arguments) {
            frame.set(parameter.name.clone(), argument);
        }

        if let Some(body) = &function.body {
            self.interpret(body, frame)?;
        }
        Ok(())
    }
}

/// Checked host arithmetic or comparison behind `op`; `None` for `:=`, which
/// needs the operand as a place rather than a value.
fn host_operation(op: BinaryOp) -> Option<fn(i64, i64) -> Option<i64>> {
    let operation: fn(i64, i64) -> Option<i64> = match op {
        BinaryOp::Assign => return None,
        BinaryOp::Plus => i64::checked_add,
        BinaryOp::Minus => i64::checked_sub,
        BinaryOp::Multiply => i64::checked_mul,
        BinaryOp::Less => |lhs, rhs| Some(i64::from(lhs < rhs)),
        BinaryOp::Greater => |lhs, rhs| Some(i64::from(lhs > rhs)),
        BinaryOp::LessEqual => |lhs, rhs| Some(i64::from(lhs <= rhs)),
        BinaryOp::GreaterEqual => |lhs, rhs| Some(i64::from(lhs >= rhs)),
        BinaryOp::Equal => |lhs, rhs| Some(i64::from(lhs == rhs)),
        BinaryOp::NotEqual => |lhs, rhs| Some(i64::from(lhs != rhs)),
    };
    Some(operation)
}
