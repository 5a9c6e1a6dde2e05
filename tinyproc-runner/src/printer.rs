use tinyproc_interpreter::error::{Error, Severity};

/// Writes a diagnostic to stderr. Recoverable parse errors keep the
/// `Error:` prefix the REPL has always shown.
pub fn report(err: &Error) {
    match err.severity() {
        Severity::Recoverable => eprintln!("Error: {err}"),
        Severity::Fatal => eprintln!("error: {err}"),
    }
}
