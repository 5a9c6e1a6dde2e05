use std::collections::VecDeque;
use std::io::BufRead;

use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum InputError {
    #[error("end of input")]
    EndOfInput,
    #[error("`{0}` is not an integer")]
    NotAnInteger(String),
    #[error("{0}")]
    Io(std::io::ErrorKind),
}

/// Where `read(x)` takes its integers from.
pub trait IntegerSource {
    fn next_integer(&mut self) -> Result<i64, InputError>;
}

/// Whitespace-separated words not consumed yet, refilled one line at a time.
#[derive(Debug, Default)]
struct PendingWords {
    words: VecDeque<String>,
}

impl PendingWords {
    fn next_integer(
        &mut self,
        mut read_line: impl FnMut(&mut String) -> std::io::Result<usize>,
    ) -> Result<i64, InputError> {
        while self.words.is_empty() {
            let mut line = String::new();
            let read = read_line(&mut line).map_err(|err| InputError::Io(err.kind()))?;
            if read == 0 {
                return Err(InputError::EndOfInput);
            }
            self.words
                .extend(line.split_whitespace().map(str::to_owned));
        }

        let word = self.words.pop_front().unwrap_or_default();
        word.parse().map_err(|_| InputError::NotAnInteger(word))
    }
}

/// Reads integers from any buffered reader.
pub struct LineSource<R> {
    reader: R,
    pending: PendingWords,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: PendingWords::default(),
        }
    }
}

impl<R: BufRead> IntegerSource for LineSource<R> {
    fn next_integer(&mut self) -> Result<i64, InputError> {
        let reader = &mut self.reader;
        self.pending.next_integer(|line| reader.read_line(line))
    }
}

/// Reads integers from standard input without holding the stdin lock between
/// reads, so a line editor can share the same stream.
#[derive(Debug, Default)]
pub struct StdinSource {
    pending: PendingWords,
}

impl StdinSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntegerSource for StdinSource {
    fn next_integer(&mut self) -> Result<i64, InputError> {
        self.pending
            .next_integer(|line| std::io::stdin().read_line(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_source() {
        let mut source = LineSource::new("1 -2\n\n  30\n".as_bytes());

        assert_eq!(source.next_integer(), Ok(1));
        assert_eq!(source.next_integer(), Ok(-2));
        assert_eq!(source.next_integer(), Ok(30));
        assert_eq!(source.next_integer(), Err(InputError::EndOfInput));
    }

    #[test]
    fn test_not_an_integer() {
        let mut source = LineSource::new("4 x 5".as_bytes());

        assert_eq!(source.next_integer(), Ok(4));
        assert_eq!(
            source.next_integer(),
            Err(InputError::NotAnInteger("x".to_owned()))
        );
        assert_eq!(source.next_integer(), Ok(5));
    }
}
