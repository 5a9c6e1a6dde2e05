use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use log::info;
use tinyproc_interpreter::io::IntegerSource;

use crate::session::Session;

pub fn execute<I: IntegerSource, W: Write>(
    path: &Path,
    session: &mut Session<I, W>,
) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    info!("running {}", path.display());

    Ok(match session.run_source(&source) {
        ControlFlow::Continue(()) => ExitCode::SUCCESS,
        ControlFlow::Break(()) => ExitCode::FAILURE,
    })
}
