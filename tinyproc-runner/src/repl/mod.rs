mod reader;

use std::io::Stdout;
use std::ops::ControlFlow;
use std::process::ExitCode;

use rustyline::DefaultEditor;

use reader::{ReadOutput, Reader};
use tinyproc_interpreter::io::StdinSource;

use crate::session::Session;

struct Repl {
    reader: Reader,
    session: Session<StdinSource, Stdout>,
}

impl Repl {
    fn run(mut self) -> ExitCode {
        loop {
            match self.reader.read() {
                ReadOutput::Exit => return ExitCode::SUCCESS,
                ReadOutput::Pending => continue,
                ReadOutput::Value(source) => {
                    if let ControlFlow::Break(()) = self.session.run_source(&source) {
                        return ExitCode::FAILURE;
                    }
                }
            }
        }
    }
}

pub fn start(session: Session<StdinSource, Stdout>) -> anyhow::Result<ExitCode> {
    let rl = DefaultEditor::new()?;

    Ok(Repl {
        reader: Reader::new(rl),
        session,
    }
    .run())
}
