use std::fmt;
use std::io;

/// Failure to move bytes in or out of the renderer. Markup problems are never
/// errors; they come back as diagnostics alongside the output.
#[derive(Debug)]
pub enum EmitError {
    Read(io::Error),
    Write(io::Error),
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::Read(err) => write!(f, "failed to read input: {}", err),
            EmitError::Write(err) => write!(f, "failed to write output: {}", err),
        }
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmitError::Read(err) | EmitError::Write(err) => Some(err),
        }
    }
}
