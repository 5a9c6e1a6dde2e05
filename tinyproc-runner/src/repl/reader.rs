use log::warn;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use tinyproc_core::lexer::{TokenKind, Tokenizer};

const PROMPT: &str = "ready> ";
const CONTINUATION_PROMPT: &str = "  ...> ";

pub enum ReadOutput {
    Exit,
    /// Nothing to run yet: the buffer was cleared or a block is still open.
    Pending,
    Value(String),
}

/// Collects lines until every `begin` read so far has its `end`.
pub struct Reader {
    rl: Editor<(), DefaultHistory>,
    buffer: String,
}

impl Reader {
    pub fn new(rl: Editor<(), DefaultHistory>) -> Self {
        Self {
            rl,
            buffer: String::new(),
        }
    }

    pub fn read(&mut self) -> ReadOutput {
        let prompt = if self.buffer.is_empty() {
            PROMPT
        } else {
            CONTINUATION_PROMPT
        };

        let line = match self.rl.readline(prompt) {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                self.buffer.clear();
                return ReadOutput::Pending;
            }
            Err(ReadlineError::Eof) => {
                if !self.buffer.trim().is_empty() {
                    warn!("discarding unterminated block");
                }
                return ReadOutput::Exit;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                return ReadOutput::Exit;
            }
            Ok(line) => {
                if let Err(err) = self.rl.add_history_entry(line.as_str()) {
                    warn!("could not record history: {err}");
                }
                line
            }
        };

        self.buffer.push_str(&line);
        self.buffer.push('\n');

        if is_complete(&self.buffer) {
            ReadOutput::Value(std::mem::take(&mut self.buffer))
        } else {
            ReadOutput::Pending
        }
    }
}

/// Whether `source` can be handed to the parser. An illegal token makes it
/// complete so the error surfaces right away instead of waiting for `end`.
fn is_complete(source: &str) -> bool {
    let mut depth = 0usize;
    for token in Tokenizer::new(source) {
        match token.kind {
            TokenKind::Begin => depth += 1,
            TokenKind::End => depth = depth.saturating_sub(1),
            TokenKind::Illegal(_) => return true,
            _ => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete() {
        let tests = vec![
            ("", true),
            ("begin write(1) end", true),
            ("begin", false),
            ("begin integer x;\n x := 1", false),
            ("begin function f(); begin end; write(f())", false),
            ("begin function f(); begin end; write(f()) end", true),
            ("end begin", false),
            ("begin x := 1 end begin", false),
            ("begin ?", true),
            ("x := 1", true),
        ];

        for (input, expected) in tests {
            assert_eq!(is_complete(input), expected, "{input:?}");
        }
    }
}
