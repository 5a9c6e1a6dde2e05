use std::io::Write;
use std::ops::ControlFlow;

use log::info;
use tinyproc_core::ast::Block;
use tinyproc_core::lexer::Tokenizer;
use tinyproc_core::parser::{ParseError, Parser};
use tinyproc_interpreter::error::{Error, Severity};
use tinyproc_interpreter::evaluator::Evaluator;
use tinyproc_interpreter::io::IntegerSource;

use crate::printer;
use crate::ErrorPolicy;

/// Runs parsed blocks one after the other, each in a fresh context, and
/// decides after every failure whether to keep going.
pub struct Session<I, W> {
    input: I,
    output: W,
    policy: ErrorPolicy,
    max_call_depth: usize,
}

impl<I: IntegerSource, W: Write> Session<I, W> {
    pub fn new(input: I, output: W, policy: ErrorPolicy, max_call_depth: usize) -> Self {
        Self {
            input,
            output,
            policy,
            max_call_depth,
        }
    }

    /// Parses and runs every block in `source`. Breaks on the first error the
    /// policy says to stop at.
    pub fn run_source(&mut self, source: &str) -> ControlFlow<()> {
        for item in Parser::new(Tokenizer::new(source)) {
            self.handle(item)?;
        }
        ControlFlow::Continue(())
    }

    pub fn handle(&mut self, item: Result<Block, ParseError>) -> ControlFlow<()> {
        let result = item.map_err(Error::from).and_then(|block| self.run(&block));
        match result {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => self.fail(&err),
        }
    }

    fn run(&mut self, block: &Block) -> Result<(), Error> {
        Evaluator::new(&mut self.input, &mut self.output)
            .with_max_call_depth(self.max_call_depth)
            .run_block(block)?;
        Ok(())
    }

    fn fail(&self, err: &Error) -> ControlFlow<()> {
        printer::report(err);
        match (err.severity(), self.policy) {
            (Severity::Fatal, ErrorPolicy::Terminate) => ControlFlow::Break(()),
            (Severity::Fatal, ErrorPolicy::AbortBlock) => {
                info!("abandoning block, continuing with the next one");
                ControlFlow::Continue(())
            }
            (Severity::Recoverable, _) => ControlFlow::Continue(()),
        }
    }
}
