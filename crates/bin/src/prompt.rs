//! Interactive portfolio size entry.

use rvscreen::{AllocationError, Budget};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

/// Errors that end budget entry.
#[derive(Debug, Error)]
pub(crate) enum PromptError {
    #[error("failed to read portfolio size: {0}")]
    Io(#[from] io::Error),

    #[error("input closed before a portfolio size was entered")]
    Eof,
}

/// Ask for a portfolio size until a valid one is entered.
///
/// Each rejected line gets a message and a fresh prompt. End of input is an
/// error rather than a default.
pub(crate) fn prompt_budget<R, W>(input: &mut R, output: &mut W) -> Result<Budget, PromptError>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(output, "Portfolio Size: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(PromptError::Eof);
        }

        match line.parse::<Budget>() {
            Ok(budget) => return Ok(budget),
            Err(AllocationError::NegativeBudget(_)) => {
                writeln!(output, "Cannot have a negative portfolio size")?;
            }
            Err(err) => {
                debug!(%err, "rejected portfolio size");
                writeln!(output, "Invalid amount, try again!")?;
            }
        }
    }
}

/// Use `preset` when given, otherwise prompt for a portfolio size.
pub(crate) fn resolve_budget<R, W>(
    preset: Option<Budget>,
    input: &mut R,
    output: &mut W,
) -> Result<Budget, PromptError>
where
    R: BufRead,
    W: Write,
{
    match preset {
        Some(budget) => Ok(budget),
        None => prompt_budget(input, output),
    }
}
